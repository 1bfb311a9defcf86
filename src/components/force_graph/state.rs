//! Widget-lifetime state: one graph, its simulation and its interaction.

use log::{debug, info};

use super::config::SitemapConfig;
use super::error::ConfigurationError;
use super::graph::Graph;
use super::interaction::{InteractionController, Navigation, PointerSample};
use super::render::{Frame, Renderer};
use super::simulation::{Simulation, TickOutcome};
use super::transform::Point;
use super::types::SitemapData;

/// A sitemap document that passed validation: its tuning and resolved graph.
#[derive(Clone, Debug)]
pub struct Sitemap {
	pub graph: Graph,
	pub config: SitemapConfig,
}

impl Sitemap {
	/// Checks the tuning, then builds the graph. Either fails as a whole.
	pub fn from_data(data: &SitemapData) -> Result<Self, ConfigurationError> {
		let config = data.config.clone().unwrap_or_default();
		config.validate()?;
		let graph = Graph::build(data, &config.simulation)?;
		Ok(Self { graph, config })
	}
}

/// Everything the widget mutates between frames.
pub struct SitemapState {
	pub graph: Graph,
	pub simulation: Simulation,
	pub controller: InteractionController,
	pub width: f64,
	pub height: f64,
	dirty: bool,
}

impl SitemapState {
	/// Places the nodes around the canvas center.
	pub fn new(sitemap: Sitemap, width: f64, height: f64) -> Self {
		let Sitemap { graph, config } = sitemap;
		let SitemapConfig { simulation, view } = config;
		let simulation = Simulation::new(&graph, simulation, Point::new(width / 2.0, height / 2.0));
		info!(
			"sitemap graph ready: {} nodes, {} links",
			graph.len(),
			graph.links().len()
		);

		Self {
			graph,
			simulation,
			controller: InteractionController::new(view),
			width,
			height,
			dirty: true,
		}
	}

	pub fn frame(&self) -> Frame<'_> {
		Frame {
			graph: &self.graph,
			bodies: self.simulation.bodies(),
			transform: self.controller.transform(),
			interaction: self.controller.state(),
			view: self.controller.config(),
			width: self.width,
			height: self.height,
		}
	}

	/// One animation frame: tick while active, then render. A settled
	/// simulation only renders when input changed something.
	pub fn advance(&mut self, renderer: &mut impl Renderer) -> TickOutcome {
		let outcome = self.simulation.tick(&self.graph);
		if outcome.moved() || self.dirty {
			renderer.render(&self.frame());
			self.dirty = false;
		}
		outcome
	}

	pub fn needs_frame(&self) -> bool {
		self.dirty || self.simulation.is_active()
	}

	pub fn pointer_down(&mut self, sample: PointerSample) {
		self.controller
			.pointer_down(&self.graph, &mut self.simulation, sample);
		self.dirty = true;
	}

	pub fn pointer_move(&mut self, sample: PointerSample) {
		self.controller
			.pointer_move(&self.graph, &mut self.simulation, sample);
		self.dirty = true;
	}

	pub fn pointer_up(&mut self) -> Option<Navigation> {
		self.dirty = true;
		self.controller.pointer_up(&self.graph, &mut self.simulation)
	}

	pub fn pointer_leave(&mut self) {
		self.controller
			.pointer_leave(&self.graph, &mut self.simulation);
		self.dirty = true;
	}

	pub fn wheel(&mut self, delta: Option<f64>, sample: PointerSample) {
		self.controller.wheel(delta, sample);
		self.dirty = true;
	}

	/// Follows a canvas resize: recenters the layout and lets it adjust.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
		self.simulation
			.set_center(Point::new(width / 2.0, height / 2.0));
		self.simulation.reheat();
		self.dirty = true;
		debug!("resized to {width}x{height}");
	}
}
