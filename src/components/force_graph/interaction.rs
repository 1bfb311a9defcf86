//! Pointer, wheel and pan handling.
//!
//! Node dragging is an explicit `Idle -> Dragging -> Idle` state machine whose
//! transitions are pure; the controller applies the resulting effects to the
//! simulation. The view transform is owned here and never touched by the
//! simulation.

use log::{debug, info};

use super::config::ViewConfig;
use super::graph::{Graph, NodeIndex};
use super::simulation::Simulation;
use super::transform::{Point, ViewTransform, zoom_factor};

/// Node drag state.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum DragPhase {
	#[default]
	Idle,
	Dragging {
		node: NodeIndex,
		/// Last pointer position in screen space.
		last: Point,
		/// Accumulated screen-space pointer travel.
		travel: f64,
	},
}

/// Input to the drag state machine. Positions carry both spaces: world for
/// pinning, screen for click detection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DragEvent {
	Start {
		node: NodeIndex,
		world: Point,
		screen: Point,
	},
	Move {
		world: Point,
		screen: Point,
	},
	/// Pointer released.
	End,
	/// Interaction cancelled by the host (pointer left, focus lost).
	Abort,
}

/// Side effects requested by a drag transition.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DragEffect {
	Pin { node: NodeIndex, at: Point },
	Release { node: NodeIndex },
	Reheat,
	Cool,
	Click { node: NodeIndex },
}

impl DragPhase {
	pub fn dragged_node(&self) -> Option<NodeIndex> {
		match self {
			DragPhase::Idle => None,
			DragPhase::Dragging { node, .. } => Some(*node),
		}
	}

	/// Computes the next phase and its effects. Events that make no sense in
	/// the current phase are ignored.
	pub fn transition(self, event: DragEvent, click_threshold: f64) -> (DragPhase, Vec<DragEffect>) {
		match (self, event) {
			(DragPhase::Idle, DragEvent::Start { node, world, screen }) => (
				DragPhase::Dragging {
					node,
					last: screen,
					travel: 0.0,
				},
				vec![DragEffect::Pin { node, at: world }, DragEffect::Reheat],
			),
			(DragPhase::Dragging { node, last, travel }, DragEvent::Move { world, screen }) => (
				DragPhase::Dragging {
					node,
					last: screen,
					travel: travel + last.distance(screen),
				},
				vec![DragEffect::Pin { node, at: world }],
			),
			(DragPhase::Dragging { node, travel, .. }, DragEvent::End) => {
				let mut effects = vec![DragEffect::Release { node }, DragEffect::Cool];
				if travel <= click_threshold {
					effects.push(DragEffect::Click { node });
				}
				(DragPhase::Idle, effects)
			}
			(DragPhase::Dragging { node, .. }, DragEvent::Abort) => (
				DragPhase::Idle,
				vec![DragEffect::Release { node }, DragEffect::Cool],
			),
			(phase, _) => (phase, Vec::new()),
		}
	}
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
enum PanPhase {
	#[default]
	Idle,
	Panning {
		last: Point,
	},
}

/// What the renderer needs to know about the pointer.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InteractionState {
	pub drag: DragPhase,
	pub hovered: Option<NodeIndex>,
	/// Last known pointer position in screen space, for tooltip placement.
	pub pointer: Option<Point>,
}

impl InteractionState {
	pub fn dragged_node(&self) -> Option<NodeIndex> {
		self.drag.dragged_node()
	}
}

/// A qualifying click on a node with a URL.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Navigation {
	pub url: String,
}

/// Raw pointer coordinates as delivered by the host; either may be missing.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerSample {
	pub x: Option<f64>,
	pub y: Option<f64>,
}

impl PointerSample {
	pub fn at(x: f64, y: f64) -> Self {
		Self {
			x: Some(x),
			y: Some(y),
		}
	}

	fn point(self) -> Option<Point> {
		Point::from_raw(self.x, self.y)
	}
}

/// Top-most node whose circle, widened by `slop`, contains `world`.
pub fn node_at(graph: &Graph, sim: &Simulation, world: Point, slop: f64) -> Option<NodeIndex> {
	graph
		.nodes()
		.iter()
		.zip(sim.bodies())
		.enumerate()
		.rev()
		.find(|(_, (node, body))| body.position.distance(world) <= node.base_radius + slop)
		.map(|(idx, _)| idx)
}

/// Turns host input into pins, reheats, view changes and navigations.
pub struct InteractionController {
	config: ViewConfig,
	state: InteractionState,
	transform: ViewTransform,
	pan: PanPhase,
}

impl InteractionController {
	pub fn new(config: ViewConfig) -> Self {
		let transform = ViewTransform::new(config.scale_min, config.scale_max);
		Self {
			config,
			state: InteractionState::default(),
			transform,
			pan: PanPhase::Idle,
		}
	}

	pub fn config(&self) -> &ViewConfig {
		&self.config
	}

	pub fn state(&self) -> &InteractionState {
		&self.state
	}

	pub fn transform(&self) -> &ViewTransform {
		&self.transform
	}

	fn step(
		&mut self,
		graph: &Graph,
		sim: &mut Simulation,
		event: DragEvent,
	) -> Option<Navigation> {
		let (phase, effects) = self.state.drag.transition(event, self.config.click_threshold);
		self.state.drag = phase;

		let mut navigation = None;
		for effect in effects {
			match effect {
				DragEffect::Pin { node, at } => sim.pin(node, at),
				DragEffect::Release { node } => sim.unpin(node),
				DragEffect::Reheat => sim.begin_drag(),
				DragEffect::Cool => sim.end_drag(),
				DragEffect::Click { node } => {
					let Some(node) = graph.node(node) else {
						continue;
					};
					if let Some(url) = node.link_target() {
						info!("navigating to {url} from {}", node.id);
						navigation = Some(Navigation {
							url: url.to_string(),
						});
					}
				}
			}
		}
		navigation
	}

	/// Pins `node` under the pointer and reheats the simulation.
	pub fn on_drag_start(
		&mut self,
		graph: &Graph,
		sim: &mut Simulation,
		node: NodeIndex,
		screen: Point,
	) {
		if node >= graph.len() {
			return;
		}
		let world = self.transform.screen_to_world(screen);
		self.step(graph, sim, DragEvent::Start { node, world, screen });
		if self.state.dragged_node() == Some(node) {
			debug!("drag start on {}", graph.nodes()[node].id);
			self.state.hovered = Some(node);
		}
	}

	/// Moves the pin of the dragged node, if any.
	pub fn on_drag_move(&mut self, graph: &Graph, sim: &mut Simulation, screen: Point) {
		let world = self.transform.screen_to_world(screen);
		self.step(graph, sim, DragEvent::Move { world, screen });
	}

	/// Releases the dragged node. Returns a navigation if the drag was short
	/// enough to count as a click on a node with a URL.
	pub fn on_drag_end(&mut self, graph: &Graph, sim: &mut Simulation) -> Option<Navigation> {
		self.step(graph, sim, DragEvent::End)
	}

	pub fn on_wheel(&mut self, delta: f64, screen: Point) {
		if !delta.is_finite() {
			return;
		}
		self.transform
			.zoom_at(zoom_factor(delta, self.config.zoom_sensitivity), screen);
	}

	pub fn on_pan_drag(&mut self, dx: f64, dy: f64) {
		self.transform.pan_by(dx, dy);
	}

	/// Updates the hovered node. Returns whether it changed.
	pub fn on_pointer_move(&mut self, graph: &Graph, sim: &Simulation, screen: Point) -> bool {
		self.state.pointer = Some(screen);
		if self.state.dragged_node().is_some() {
			return false;
		}
		let world = self.transform.screen_to_world(screen);
		let hovered = node_at(graph, sim, world, self.config.hover_slop);
		let changed = hovered != self.state.hovered;
		self.state.hovered = hovered;
		changed
	}

	/// Pointer pressed: drags the node under it, or pans the background.
	pub fn pointer_down(&mut self, graph: &Graph, sim: &mut Simulation, sample: PointerSample) {
		let Some(screen) = sample.point() else {
			return;
		};
		self.state.pointer = Some(screen);
		let world = self.transform.screen_to_world(screen);
		match node_at(graph, sim, world, self.config.hover_slop) {
			Some(node) => self.on_drag_start(graph, sim, node, screen),
			None => self.pan = PanPhase::Panning { last: screen },
		}
	}

	pub fn pointer_move(&mut self, graph: &Graph, sim: &mut Simulation, sample: PointerSample) {
		let Some(screen) = sample.point() else {
			return;
		};
		if self.state.dragged_node().is_some() {
			self.state.pointer = Some(screen);
			self.on_drag_move(graph, sim, screen);
		} else if let PanPhase::Panning { last } = self.pan {
			self.state.pointer = Some(screen);
			self.on_pan_drag(screen.x - last.x, screen.y - last.y);
			self.pan = PanPhase::Panning { last: screen };
		} else {
			self.on_pointer_move(graph, sim, screen);
		}
	}

	pub fn pointer_up(&mut self, graph: &Graph, sim: &mut Simulation) -> Option<Navigation> {
		self.pan = PanPhase::Idle;
		self.on_drag_end(graph, sim)
	}

	/// Host-side cancellation: ends drag and pan without clicking and clears
	/// hover.
	pub fn pointer_leave(&mut self, graph: &Graph, sim: &mut Simulation) {
		self.pan = PanPhase::Idle;
		self.step(graph, sim, DragEvent::Abort);
		self.state.hovered = None;
		self.state.pointer = None;
	}

	pub fn wheel(&mut self, delta: Option<f64>, sample: PointerSample) {
		if let (Some(delta), Some(screen)) = (delta, sample.point()) {
			self.on_wheel(delta, screen);
		}
	}
}
