//! Force model: link springs, many-body repulsion, centering and collision.
//!
//! Each force reads the pre-tick snapshot of node positions and adds a
//! velocity increment per node, already scaled by alpha. Forces are applied
//! in a fixed order so that trajectories are reproducible. [`separate`] is
//! the exception: it corrects positions after integration.

use std::f64::consts::TAU;

use super::config::SimulationConfig;
use super::graph::Graph;
use super::transform::Point;

/// Distances below this are treated as coincident.
const EPSILON: f64 = 1e-6;

/// Velocity increments for the current tick, one per node.
///
/// Contributions that are not finite are dropped so that one degenerate
/// node cannot poison the nodes it interacts with.
pub struct Deltas<'a>(&'a mut [Point]);

impl<'a> Deltas<'a> {
	pub fn new(slots: &'a mut [Point]) -> Self {
		slots.fill(Point::ZERO);
		Self(slots)
	}

	fn add(&mut self, idx: usize, delta: Point) {
		if delta.is_finite() {
			self.0[idx] += delta;
		}
	}
}

/// Deterministic separation axis for coincident nodes.
fn fallback_direction(a: usize, b: usize) -> Point {
	let angle = ((a as f64) * 0.618_034 + (b as f64) * 0.414_214) * TAU;
	Point::new(angle.cos(), angle.sin())
}

/// Unit vector from `from` to `to` and the distance between them.
fn direction(from: Point, to: Point, a: usize, b: usize) -> (Point, f64) {
	let delta = to - from;
	let distance = delta.length();
	if distance > EPSILON {
		(delta * (1.0 / distance), distance)
	} else {
		(fallback_direction(a, b), 0.0)
	}
}

/// Springs pulling linked nodes toward their rest length.
///
/// The correction is split so that the node with the larger radius moves
/// less.
pub fn link(graph: &Graph, positions: &[Point], alpha: f64, deltas: &mut Deltas<'_>) {
	let nodes = graph.nodes();
	for link in graph.links() {
		let (s, t) = (link.source, link.target);
		let mut delta = positions[t] - positions[s];
		let mut distance = delta.length();
		if distance < EPSILON {
			delta = Point::new(EPSILON, 0.0);
			distance = EPSILON;
		}

		let k = (distance - link.target_distance) / distance * alpha * link.strength;
		let pull = delta * k;
		let (ms, mt) = (nodes[s].base_radius, nodes[t].base_radius);
		let bias = ms / (ms + mt);

		deltas.add(t, pull * -bias);
		deltas.add(s, pull * (1.0 - bias));
	}
}

/// Pairwise inverse-square repulsion. Larger nodes push harder.
pub fn many_body(
	graph: &Graph,
	positions: &[Point],
	config: &SimulationConfig,
	alpha: f64,
	deltas: &mut Deltas<'_>,
) {
	if config.charge_strength == 0.0 {
		return;
	}
	let nodes = graph.nodes();
	for i in 0..positions.len() {
		for j in (i + 1)..positions.len() {
			let (unit, distance) = direction(positions[i], positions[j], i, j);
			let clamped = distance.max(config.charge_distance_min);
			let base = config.charge_strength * alpha / (clamped * clamped);

			deltas.add(i, unit * (-base * nodes[j].base_radius));
			deltas.add(j, unit * (base * nodes[i].base_radius));
		}
	}
}

/// Pulls every node toward `center`, proportional to its offset.
pub fn center(
	positions: &[Point],
	center: Point,
	config: &SimulationConfig,
	alpha: f64,
	deltas: &mut Deltas<'_>,
) {
	let gain = config.center_strength * alpha;
	for (idx, &position) in positions.iter().enumerate() {
		deltas.add(idx, (center - position) * gain);
	}
}

/// Separates nodes whose circles (plus padding) overlap.
pub fn collision(
	graph: &Graph,
	positions: &[Point],
	config: &SimulationConfig,
	alpha: f64,
	deltas: &mut Deltas<'_>,
) {
	let nodes = graph.nodes();
	for i in 0..positions.len() {
		for j in (i + 1)..positions.len() {
			let (ri, rj) = (nodes[i].base_radius, nodes[j].base_radius);
			let reach = ri + rj + config.collision_padding;
			let (unit, distance) = direction(positions[i], positions[j], i, j);
			if distance >= reach {
				continue;
			}

			let push = (reach - distance) * config.collision_strength * alpha;
			let (wi, wj) = (ri * ri, rj * rj);
			let share_i = wj / (wi + wj);

			deltas.add(i, unit * (-push * share_i));
			deltas.add(j, unit * (push * (1.0 - share_i)));
		}
	}
}

/// One separation pass over node positions.
///
/// Every overlapping pair is moved apart by the full overlap along the line
/// between their centers, split by squared radius. Pairs are visited in index
/// order and see the corrections made earlier in the same pass. Nodes marked
/// in `fixed` never move; their partner takes the whole correction. Returns
/// whether any node moved.
pub fn separate(graph: &Graph, positions: &mut [Point], fixed: &[bool], padding: f64) -> bool {
	let nodes = graph.nodes();
	let mut moved = false;
	for i in 0..positions.len() {
		for j in (i + 1)..positions.len() {
			if fixed[i] && fixed[j] {
				continue;
			}
			let (ri, rj) = (nodes[i].base_radius, nodes[j].base_radius);
			let reach = ri + rj + padding;
			let (unit, distance) = direction(positions[i], positions[j], i, j);
			if !distance.is_finite() || distance >= reach {
				continue;
			}

			let overlap = reach - distance;
			let share_i = if fixed[i] {
				0.0
			} else if fixed[j] {
				1.0
			} else {
				let (wi, wj) = (ri * ri, rj * rj);
				wj / (wi + wj)
			};
			let pi = positions[i] - unit * (overlap * share_i);
			let pj = positions[j] + unit * (overlap * (1.0 - share_i));
			if pi.is_finite() && pj.is_finite() {
				positions[i] = pi;
				positions[j] = pj;
				moved = true;
			}
		}
	}
	moved
}

/// Applies all forces in order: link, many-body, center, collision.
pub fn accumulate(
	graph: &Graph,
	positions: &[Point],
	center_point: Point,
	config: &SimulationConfig,
	alpha: f64,
	deltas: &mut Deltas<'_>,
) {
	link(graph, positions, alpha, deltas);
	many_body(graph, positions, config, alpha, deltas);
	center(positions, center_point, config, alpha, deltas);
	collision(graph, positions, config, alpha, deltas);
}
