//! Simulation engine: per-node kinematics, cooling schedule and the tick loop.
//!
//! The engine is cooperative. The host asks for one tick per animation frame
//! and renders in between, so pointer events interleave with ticks but never
//! run during one.

use std::f64::consts::PI;

use log::{debug, info, warn};

use super::config::SimulationConfig;
use super::forces::{self, Deltas};
use super::graph::{Graph, NodeIndex};
use super::transform::Point;

/// Kinematic state of one node.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Body {
	pub position: Point,
	pub velocity: Point,
	/// Fixed position override set while the node is dragged.
	pub pin: Option<Point>,
}

/// Cooling schedule state.
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationState {
	pub alpha: f64,
	pub alpha_target: f64,
	pub running: bool,
	pub dragging: bool,
	/// Ticks run since creation.
	pub ticks: u64,
}

impl Default for SimulationState {
	fn default() -> Self {
		Self {
			alpha: 1.0,
			alpha_target: 0.0,
			running: true,
			dragging: false,
			ticks: 0,
		}
	}
}

/// What happened during a tick.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TickReport {
	pub alpha: f64,
	/// Nodes reverted to their pre-tick state because they went non-finite.
	pub diverged: Vec<NodeIndex>,
}

/// Result of [`Simulation::tick`].
#[derive(Clone, Debug, PartialEq)]
pub enum TickOutcome {
	/// The simulation is settled; nothing moved.
	Idle,
	/// Positions changed and the simulation keeps running.
	Ticked(TickReport),
	/// Positions changed and the simulation just settled.
	Settled(TickReport),
}

impl TickOutcome {
	pub fn moved(&self) -> bool {
		!matches!(self, TickOutcome::Idle)
	}
}

/// Layout engine: owns every node's kinematic state and the cooling
/// schedule. Driven one [`Simulation::tick`] at a time.
pub struct Simulation {
	config: SimulationConfig,
	state: SimulationState,
	bodies: Vec<Body>,
	center: Point,
	snapshot: Vec<Point>,
	deltas: Vec<Point>,
	fixed: Vec<bool>,
}

impl Simulation {
	/// Places nodes on a circle around `center`, ready for the first tick.
	pub fn new(graph: &Graph, config: SimulationConfig, center: Point) -> Self {
		let count = graph.len();
		let bodies = (0..count)
			.map(|i| {
				let angle = (i as f64) * 2.0 * PI / count as f64;
				Body {
					position: Point::new(
						center.x + config.initial_radius * angle.cos(),
						center.y + config.initial_radius * angle.sin(),
					),
					..Body::default()
				}
			})
			.collect();

		Self {
			config,
			state: SimulationState::default(),
			bodies,
			center,
			snapshot: Vec::with_capacity(count),
			deltas: vec![Point::ZERO; count],
			fixed: Vec::with_capacity(count),
		}
	}

	pub fn config(&self) -> &SimulationConfig {
		&self.config
	}

	pub fn state(&self) -> &SimulationState {
		&self.state
	}

	pub fn alpha(&self) -> f64 {
		self.state.alpha
	}

	pub fn is_active(&self) -> bool {
		self.state.running
	}

	pub fn bodies(&self) -> &[Body] {
		&self.bodies
	}

	pub fn position(&self, idx: NodeIndex) -> Option<Point> {
		self.bodies.get(idx).map(|body| body.position)
	}

	pub fn center(&self) -> Point {
		self.center
	}

	pub fn set_center(&mut self, center: Point) {
		if center.is_finite() {
			self.center = center;
		}
	}

	/// Fixes a node at `at` from the next tick on.
	pub fn pin(&mut self, idx: NodeIndex, at: Point) {
		if let Some(body) = self.bodies.get_mut(idx) {
			body.pin = Some(at);
		}
	}

	pub fn unpin(&mut self, idx: NodeIndex) {
		if let Some(body) = self.bodies.get_mut(idx) {
			body.pin = None;
		}
	}

	/// Raises alpha and keeps it up until [`Simulation::end_drag`].
	pub fn begin_drag(&mut self) {
		self.state.dragging = true;
		self.state.alpha_target = self.config.reheat_alpha;
		self.reheat();
		debug!("reheated for drag, alpha {:.3}", self.state.alpha);
	}

	/// Lets the simulation cool down normally again.
	pub fn end_drag(&mut self) {
		self.state.dragging = false;
		self.state.alpha_target = 0.0;
	}

	/// Raises alpha to at least the reheat value and resumes ticking.
	pub fn reheat(&mut self) {
		self.state.alpha = self.state.alpha.max(self.config.reheat_alpha);
		self.state.running = true;
	}

	/// Restarts the layout from full temperature.
	pub fn restart(&mut self) {
		self.state.alpha = 1.0;
		self.state.running = true;
	}

	/// Advances the layout by one step. Does nothing once settled.
	pub fn tick(&mut self, graph: &Graph) -> TickOutcome {
		if !self.state.running {
			return TickOutcome::Idle;
		}

		let state = &mut self.state;
		state.alpha += (state.alpha_target - state.alpha) * self.config.alpha_decay;
		state.ticks += 1;
		let alpha = state.alpha;

		self.snapshot.clear();
		self.snapshot.extend(self.bodies.iter().map(|body| body.position));
		self.deltas.resize(self.bodies.len(), Point::ZERO);
		let mut deltas = Deltas::new(&mut self.deltas);
		forces::accumulate(
			graph,
			&self.snapshot,
			self.center,
			&self.config,
			alpha,
			&mut deltas,
		);

		let friction = 1.0 - self.config.velocity_decay;
		let mut report = TickReport {
			alpha,
			diverged: Vec::new(),
		};

		for (idx, body) in self.bodies.iter_mut().enumerate() {
			if let Some(pin) = body.pin {
				body.position = pin;
				body.velocity = Point::ZERO;
				continue;
			}

			let velocity = (body.velocity + self.deltas[idx]) * friction;
			let position = body.position + velocity;
			if velocity.is_finite() && position.is_finite() {
				body.velocity = velocity;
				body.position = position;
			} else {
				warn!(
					"node {} diverged on tick {}; keeping its previous state",
					graph.node(idx).map_or("?", |node| node.id.as_str()),
					self.state.ticks
				);
				if !body.velocity.is_finite() {
					body.velocity = Point::ZERO;
				}
				report.diverged.push(idx);
			}
		}

		self.separate_overlaps(graph, &report.diverged);

		if self.state.alpha < self.config.alpha_min && !self.state.dragging {
			self.state.running = false;
			info!("layout settled after {} ticks", self.state.ticks);
			TickOutcome::Settled(report)
		} else {
			TickOutcome::Ticked(report)
		}
	}

	/// Pushes overlapping nodes apart on positions. This does not fade with
	/// alpha, so overlap cannot survive into a settled layout. Pinned and
	/// reverted nodes keep their position.
	fn separate_overlaps(&mut self, graph: &Graph, reverted: &[NodeIndex]) {
		self.snapshot.clear();
		self.snapshot.extend(self.bodies.iter().map(|body| body.position));
		self.fixed.clear();
		self.fixed.extend(self.bodies.iter().map(|body| body.pin.is_some()));
		for &idx in reverted {
			self.fixed[idx] = true;
		}

		for _ in 0..self.config.collision_iterations {
			if !forces::separate(
				graph,
				&mut self.snapshot,
				&self.fixed,
				self.config.collision_padding,
			) {
				break;
			}
		}
		for (body, &position) in self.bodies.iter_mut().zip(&self.snapshot) {
			body.position = position;
		}
	}

	/// Ticks until the layout settles or `max_ticks` is reached. Returns the
	/// number of ticks run.
	pub fn run_until_settled(&mut self, graph: &Graph, max_ticks: usize) -> usize {
		let mut ticks = 0;
		while ticks < max_ticks && self.tick(graph).moved() {
			ticks += 1;
			if !self.state.running {
				break;
			}
		}
		ticks
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::types::{SitemapData, SitemapLink, SitemapNode};

	const CENTER: Point = Point::new(400.0, 300.0);

	fn graph(nodes: Vec<SitemapNode>, links: Vec<SitemapLink>) -> Graph {
		Graph::build(
			&SitemapData {
				nodes,
				links,
				config: None,
			},
			&SimulationConfig::default(),
		)
		.unwrap()
	}

	fn two_nodes() -> Graph {
		graph(
			vec![SitemapNode::new("A", 10.0), SitemapNode::new("B", 10.0)],
			vec![
				SitemapLink::new("A", "B")
					.with_strength(1.0)
					.with_target_distance(80.0),
			],
		)
	}

	fn distance(sim: &Simulation, a: NodeIndex, b: NodeIndex) -> f64 {
		sim.bodies()[a].position.distance(sim.bodies()[b].position)
	}

	#[test]
	fn single_link_converges_to_target_distance() {
		let graph = two_nodes();
		let config = SimulationConfig {
			charge_strength: 0.0,
			..SimulationConfig::default()
		};
		let mut sim = Simulation::new(&graph, config, CENTER);
		// Start off-axis and uneven.
		sim.bodies[0].position = Point::new(150.0, 20.0);
		sim.bodies[1].position = Point::new(520.0, 410.0);

		sim.run_until_settled(&graph, 10_000);

		assert!(!sim.is_active());
		assert!(sim.alpha() < sim.config().alpha_min);
		let d = distance(&sim, 0, 1);
		assert!((d - 80.0).abs() <= 80.0 * 0.05, "distance {d}");
	}

	#[test]
	fn literal_pair_scenario_settles_around_center() {
		let graph = two_nodes();
		let mut sim = Simulation::new(&graph, SimulationConfig::default(), CENTER);
		sim.run_until_settled(&graph, 10_000);

		let (a, b) = (sim.bodies()[0].position, sim.bodies()[1].position);
		let d = a.distance(b);
		assert!((d - 80.0).abs() <= 4.0, "distance {d}");
		let midpoint = (a + b) * 0.5;
		assert!(midpoint.distance(CENTER) < 1.0, "midpoint {midpoint:?}");
	}

	#[test]
	fn triangle_converges_to_equilateral() {
		let graph = graph(
			vec![
				SitemapNode::new("a", 10.0),
				SitemapNode::new("b", 10.0),
				SitemapNode::new("c", 10.0),
			],
			vec![
				SitemapLink::new("a", "b").with_strength(1.0).with_target_distance(60.0),
				SitemapLink::new("b", "c").with_strength(1.0).with_target_distance(60.0),
				SitemapLink::new("c", "a").with_strength(1.0).with_target_distance(60.0),
			],
		);
		let mut sim = Simulation::new(&graph, SimulationConfig::default(), CENTER);
		sim.bodies[0].position = Point::new(380.0, 250.0);
		sim.bodies[1].position = Point::new(470.0, 310.0);
		sim.bodies[2].position = Point::new(360.0, 330.0);

		sim.run_until_settled(&graph, 10_000);

		let sides = [distance(&sim, 0, 1), distance(&sim, 1, 2), distance(&sim, 2, 0)];
		let mean = sides.iter().sum::<f64>() / 3.0;
		for side in sides {
			assert!((side - mean).abs() < mean * 0.02, "sides {sides:?}");
		}
		assert!((mean - 60.0).abs() < 6.0, "mean side {mean}");
	}

	fn assert_no_overlap(graph: &Graph, sim: &Simulation) {
		let bodies = sim.bodies();
		for i in 0..bodies.len() {
			for j in (i + 1)..bodies.len() {
				let reach = graph.nodes()[i].base_radius + graph.nodes()[j].base_radius;
				let d = bodies[i].position.distance(bodies[j].position);
				assert!(d >= reach - 1.0, "nodes {i} and {j} overlap: {d} < {reach}");
			}
		}
	}

	/// A hub with `leaves` children linked by hierarchy links.
	fn star(hub_radius: f64, leaves: usize, leaf_radius: f64) -> Graph {
		let mut nodes = vec![SitemapNode::new("hub", hub_radius)];
		let mut links = Vec::new();
		for i in 0..leaves {
			let id = format!("leaf{i}");
			nodes.push(SitemapNode::new(id.clone(), leaf_radius));
			links.push(SitemapLink::new("hub", id));
		}
		graph(nodes, links)
	}

	#[test]
	fn converged_layout_has_no_overlap() {
		let mut nodes = vec![SitemapNode::new("root", 20.0)];
		let mut links = Vec::new();
		for i in 0..6 {
			let id = format!("page{i}");
			nodes.push(SitemapNode::new(id.clone(), 10.0));
			links.push(SitemapLink::new("root", id));
		}
		links.push(SitemapLink::new("page0", "page3").cross());
		nodes.push(SitemapNode::new("orphan", 10.0));
		let graph = graph(nodes, links);

		let mut sim = Simulation::new(&graph, SimulationConfig::default(), CENTER);
		sim.run_until_settled(&graph, 10_000);
		assert_no_overlap(&graph, &sim);
	}

	#[test]
	fn crowded_hub_children_do_not_overlap() {
		let graph = star(20.0, 24, 10.0);
		let mut sim = Simulation::new(&graph, SimulationConfig::default(), CENTER);
		sim.run_until_settled(&graph, 10_000);
		assert!(!sim.is_active());
		assert_no_overlap(&graph, &sim);
	}

	#[test]
	fn many_equal_nodes_do_not_overlap() {
		for leaves in [35, 60] {
			let graph = star(8.0, leaves, 8.0);
			let mut sim = Simulation::new(&graph, SimulationConfig::default(), CENTER);
			sim.run_until_settled(&graph, 10_000);
			assert_no_overlap(&graph, &sim);
		}

		// Mixed hierarchy: three sections, each with a dozen pages.
		let mut nodes = vec![SitemapNode::new("docs", 18.0)];
		let mut links = Vec::new();
		for section in 0..3 {
			let section_id = format!("section{section}");
			nodes.push(SitemapNode::new(section_id.clone(), 12.0));
			links.push(SitemapLink::new("docs", section_id.clone()));
			for page in 0..12 {
				let page_id = format!("page{section}-{page}");
				nodes.push(SitemapNode::new(page_id.clone(), 8.0));
				links.push(SitemapLink::new(section_id.clone(), page_id));
			}
		}
		links.push(SitemapLink::new("page0-0", "page2-5").cross());
		let graph = graph(nodes, links);
		let mut sim = Simulation::new(&graph, SimulationConfig::default(), CENTER);
		sim.run_until_settled(&graph, 10_000);
		assert_no_overlap(&graph, &sim);
	}

	#[test]
	fn pinned_node_pushes_neighbours_instead_of_moving() {
		let graph = star(8.0, 12, 8.0);
		let mut sim = Simulation::new(&graph, SimulationConfig::default(), CENTER);
		sim.run_until_settled(&graph, 10_000);

		// Drop the hub onto a leaf and hold it there.
		let target = sim.bodies()[3].position;
		sim.begin_drag();
		sim.pin(0, target);
		for _ in 0..100 {
			sim.tick(&graph);
			assert_eq!(sim.bodies()[0].position, target);
		}
		assert_no_overlap(&graph, &sim);
	}

	#[test]
	fn pinned_node_stays_exactly_at_pin() {
		let graph = two_nodes();
		let mut sim = Simulation::new(&graph, SimulationConfig::default(), CENTER);
		let pin = Point::new(123.25, -40.5);
		sim.begin_drag();
		sim.pin(0, pin);

		for step in 0..50 {
			// Drag moves around while forces keep pulling.
			let at = pin + Point::new(step as f64, 0.0);
			sim.pin(0, at);
			sim.tick(&graph);
			assert_eq!(sim.bodies()[0].position, at);
			assert_eq!(sim.bodies()[0].velocity, Point::ZERO);
		}
		assert!(sim.is_active());
	}

	#[test]
	fn drag_reheats_a_settled_simulation() {
		let graph = two_nodes();
		let mut sim = Simulation::new(&graph, SimulationConfig::default(), CENTER);
		sim.run_until_settled(&graph, 10_000);
		assert!(!sim.is_active());
		assert_eq!(sim.tick(&graph), TickOutcome::Idle);

		sim.begin_drag();
		assert!(sim.is_active());
		assert!(sim.alpha() > sim.config().alpha_min);

		// Alpha is held near the reheat value while dragging.
		for _ in 0..500 {
			assert!(matches!(sim.tick(&graph), TickOutcome::Ticked(_)));
		}
		assert!(sim.alpha() > sim.config().alpha_min);

		sim.end_drag();
		sim.run_until_settled(&graph, 10_000);
		assert!(!sim.is_active());
	}

	#[test]
	fn restart_runs_a_full_cooling_cycle() {
		let graph = two_nodes();
		let mut sim = Simulation::new(&graph, SimulationConfig::default(), CENTER);
		sim.run_until_settled(&graph, 10_000);
		let first = sim.state().ticks;

		sim.restart();
		assert_eq!(sim.alpha(), 1.0);
		let again = sim.run_until_settled(&graph, 10_000) as u64;
		assert!(again + 2 >= first && again <= first + 2, "{again} vs {first}");
	}

	#[test]
	fn settling_tick_reports_transition_once() {
		let graph = two_nodes();
		let mut sim = Simulation::new(&graph, SimulationConfig::default(), CENTER);
		let mut settled = 0;
		for _ in 0..1_000 {
			match sim.tick(&graph) {
				TickOutcome::Settled(_) => settled += 1,
				TickOutcome::Ticked(_) | TickOutcome::Idle => {}
			}
		}
		assert_eq!(settled, 1);
		assert!(sim.state().ticks > 250 && sim.state().ticks < 350);
	}

	#[test]
	fn divergent_node_is_contained() {
		let graph = graph(
			vec![
				SitemapNode::new("a", 10.0),
				SitemapNode::new("b", 10.0),
				SitemapNode::new("c", 10.0),
			],
			vec![SitemapLink::new("b", "c")],
		);
		let mut sim = Simulation::new(&graph, SimulationConfig::default(), CENTER);
		let stuck = Point::new(f64::MAX, 0.0);
		sim.bodies[0].position = stuck;
		sim.bodies[0].velocity = Point::new(f64::MAX, 0.0);

		for _ in 0..20 {
			let outcome = sim.tick(&graph);
			let TickOutcome::Ticked(report) = outcome else {
				panic!("expected an active tick");
			};
			assert_eq!(report.diverged, vec![0]);
			assert_eq!(sim.bodies()[0].position, stuck);
			for body in &sim.bodies()[1..] {
				assert!(body.position.is_finite() && body.velocity.is_finite());
			}
		}
	}

	#[test]
	fn far_away_linked_node_never_makes_neighbours_non_finite() {
		let graph = graph(
			vec![
				SitemapNode::new("a", 10.0),
				SitemapNode::new("b", 10.0),
				SitemapNode::new("c", 10.0),
			],
			vec![SitemapLink::new("a", "b"), SitemapLink::new("b", "c")],
		);
		let mut sim = Simulation::new(&graph, SimulationConfig::default(), CENTER);
		sim.bodies[0].position = Point::new(f64::MAX, f64::MAX);
		sim.bodies[0].velocity = Point::new(f64::MAX, f64::MAX);

		for _ in 0..50 {
			sim.tick(&graph);
			for body in sim.bodies() {
				assert!(body.position.is_finite());
			}
		}
	}

	#[test]
	fn non_finite_velocity_is_reset_on_revert() {
		let graph = two_nodes();
		let mut sim = Simulation::new(&graph, SimulationConfig::default(), CENTER);
		let before = sim.bodies()[1].position;
		sim.bodies[1].velocity = Point::new(f64::NAN, 1.0);

		let TickOutcome::Ticked(report) = sim.tick(&graph) else {
			panic!("expected an active tick");
		};
		assert_eq!(report.diverged, vec![1]);
		assert_eq!(sim.bodies()[1].position, before);
		assert_eq!(sim.bodies()[1].velocity, Point::ZERO);
		assert!(sim.bodies()[0].position.is_finite());

		sim.tick(&graph);
		assert!(sim.bodies()[1].position.is_finite());
	}

	#[test]
	fn identical_inputs_give_identical_layouts() {
		let graph = two_nodes();
		let mut first = Simulation::new(&graph, SimulationConfig::default(), CENTER);
		let mut second = Simulation::new(&graph, SimulationConfig::default(), CENTER);
		first.run_until_settled(&graph, 10_000);
		second.run_until_settled(&graph, 10_000);
		assert_eq!(first.bodies(), second.bodies());
	}
}
