//! Rendering contract and the canvas 2D implementation.

use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::config::ViewConfig;
use super::graph::{Graph, Link, NodeIndex};
use super::interaction::InteractionState;
use super::simulation::Body;
use super::transform::{Point, ViewTransform};

const COLORS: &[&str] = &[
	"#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
	"#bcbd22", "#17becf",
];

/// Everything a renderer may read for one frame.
pub struct Frame<'a> {
	pub graph: &'a Graph,
	pub bodies: &'a [Body],
	pub transform: &'a ViewTransform,
	pub interaction: &'a InteractionState,
	pub view: &'a ViewConfig,
	pub width: f64,
	pub height: f64,
}

/// Tooltip content and its screen-space anchor.
#[derive(Clone, Debug, PartialEq)]
pub struct Tooltip<'a> {
	pub text: &'a str,
	pub url: Option<&'a str>,
	pub at: Point,
}

impl<'a> Frame<'a> {
	pub fn position(&self, idx: NodeIndex) -> Point {
		self.bodies[idx].position
	}

	/// Drawn radius: the base radius, enlarged while hovered.
	pub fn node_radius(&self, idx: NodeIndex) -> f64 {
		let base = self.graph.nodes()[idx].base_radius;
		if self.interaction.hovered == Some(idx) {
			base * self.view.hover_scale
		} else {
			base
		}
	}

	pub fn has_highlight(&self) -> bool {
		self.interaction.hovered.is_some()
	}

	/// The hovered node and its neighbours.
	pub fn is_highlighted(&self, idx: NodeIndex) -> bool {
		match self.interaction.hovered {
			Some(hovered) => hovered == idx || self.graph.neighbors(hovered).contains(&idx),
			None => false,
		}
	}

	/// Links with their current endpoint positions.
	pub fn links(&self) -> impl Iterator<Item = (&'a Link, Point, Point)> + '_ {
		self.graph
			.links()
			.iter()
			.map(|link| (link, self.position(link.source), self.position(link.target)))
	}

	pub fn tooltip(&self) -> Option<Tooltip<'a>> {
		let idx = self.interaction.hovered?;
		let node = self.graph.node(idx)?;
		let at = self
			.interaction
			.pointer
			.unwrap_or_else(|| self.transform.world_to_screen(self.position(idx)));
		Some(Tooltip {
			text: &node.label,
			url: node.link_target(),
			at,
		})
	}
}

/// Draws a frame. Implementations must draw links as lines between endpoint
/// positions, nodes as circles of [`Frame::node_radius`], apply the view
/// transform to the scene, and show [`Frame::tooltip`] near the pointer.
pub trait Renderer {
	fn render(&mut self, frame: &Frame<'_>);
}

/// [`Renderer`] drawing into a 2D canvas context.
pub struct CanvasRenderer {
	ctx: CanvasRenderingContext2d,
}

impl CanvasRenderer {
	pub fn new(ctx: CanvasRenderingContext2d) -> Self {
		Self { ctx }
	}
}

impl Renderer for CanvasRenderer {
	fn render(&mut self, frame: &Frame<'_>) {
		let ctx = &self.ctx;
		ctx.set_fill_style_str("#1a1a2e");
		ctx.fill_rect(0.0, 0.0, frame.width, frame.height);
		ctx.save();
		let _ = ctx.translate(frame.transform.translate_x, frame.transform.translate_y);
		let _ = ctx.scale(frame.transform.scale(), frame.transform.scale());
		draw_links(frame, ctx);
		draw_nodes(frame, ctx);
		ctx.restore();
		draw_tooltip(frame, ctx);
	}
}

fn group_color(group: u32) -> &'static str {
	COLORS[group as usize % COLORS.len()]
}

fn draw_links(frame: &Frame<'_>, ctx: &CanvasRenderingContext2d) {
	let k = frame.transform.scale();
	let dimmed = frame.has_highlight();

	for (link, from, to) in frame.links() {
		let highlighted = frame.is_highlighted(link.source) && frame.is_highlighted(link.target);
		let alpha = match (dimmed, highlighted) {
			(false, _) => 0.6,
			(true, true) => 0.9,
			(true, false) => 0.15,
		};
		let width = link.strength * 2.0 / k;

		ctx.set_stroke_style_str(&format!("rgba(100, 180, 255, {})", alpha));
		ctx.set_line_width(width.max(0.75 / k));
		ctx.begin_path();
		ctx.move_to(from.x, from.y);
		ctx.line_to(to.x, to.y);
		ctx.stroke();
	}
}

fn draw_nodes(frame: &Frame<'_>, ctx: &CanvasRenderingContext2d) {
	let k = frame.transform.scale();
	let dimmed = frame.has_highlight();

	for (idx, node) in frame.graph.nodes().iter().enumerate() {
		let Point { x, y } = frame.position(idx);
		let radius = frame.node_radius(idx);
		let alpha = if dimmed && !frame.is_highlighted(idx) {
			0.3
		} else {
			1.0
		};

		ctx.set_global_alpha(alpha);
		ctx.begin_path();
		let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(group_color(node.group));
		ctx.fill();

		if frame.interaction.hovered == Some(idx) {
			ctx.begin_path();
			let _ = ctx.arc(x, y, radius + 2.0 / k, 0.0, 2.0 * PI);
			ctx.set_stroke_style_str("rgba(255, 255, 255, 0.7)");
			ctx.set_line_width(1.5 / k);
			ctx.stroke();
		}

		ctx.set_fill_style_str(&format!("rgba(255, 255, 255, {})", alpha * 0.8));
		ctx.set_font(&format!("{}px sans-serif", 10.0 / k.max(0.5)));
		let _ = ctx.fill_text(&node.label, x + radius + 3.0, y + 3.0);
		ctx.set_global_alpha(1.0);
	}
}

fn draw_tooltip(frame: &Frame<'_>, ctx: &CanvasRenderingContext2d) {
	let Some(tooltip) = frame.tooltip() else {
		return;
	};
	let text = match tooltip.url {
		Some(url) => format!("{} ({})", tooltip.text, url),
		None => tooltip.text.to_string(),
	};

	ctx.set_font("12px sans-serif");
	let width = ctx
		.measure_text(&text)
		.map(|metrics| metrics.width())
		.unwrap_or(text.len() as f64 * 7.0);
	let (x, y) = (tooltip.at.x + 12.0, tooltip.at.y + 12.0);

	ctx.set_fill_style_str("rgba(20, 20, 35, 0.9)");
	ctx.fill_rect(x, y, width + 12.0, 22.0);
	ctx.set_fill_style_str("white");
	let _ = ctx.fill_text(&text, x + 6.0, y + 15.0);
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::config::SimulationConfig;
	use crate::components::force_graph::simulation::Simulation;
	use crate::components::force_graph::types::{SitemapData, SitemapLink, SitemapNode};

	fn graph() -> Graph {
		let mut root = SitemapNode::new("root", 20.0);
		root.label = Some("Documentation".into());
		Graph::build(
			&SitemapData {
				nodes: vec![
					root,
					SitemapNode::new("a", 10.0).with_url("a.html"),
					SitemapNode::new("b", 10.0),
					SitemapNode::new("c", 10.0),
				],
				links: vec![
					SitemapLink::new("root", "a"),
					SitemapLink::new("root", "b"),
					SitemapLink::new("b", "c"),
				],
				config: None,
			},
			&SimulationConfig::default(),
		)
		.unwrap()
	}

	#[test]
	fn frame_exposes_highlight_and_tooltip() {
		let graph = graph();
		let sim = Simulation::new(&graph, SimulationConfig::default(), Point::new(0.0, 0.0));
		let transform = ViewTransform::new(0.3, 3.0);
		let view = ViewConfig::default();
		let interaction = InteractionState {
			hovered: Some(0),
			pointer: Some(Point::new(40.0, 30.0)),
			..InteractionState::default()
		};
		let frame = Frame {
			graph: &graph,
			bodies: sim.bodies(),
			transform: &transform,
			interaction: &interaction,
			view: &view,
			width: 800.0,
			height: 600.0,
		};

		assert!(frame.has_highlight());
		assert!(frame.is_highlighted(0) && frame.is_highlighted(1) && frame.is_highlighted(2));
		assert!(!frame.is_highlighted(3));
		assert_eq!(frame.node_radius(0), 20.0 * view.hover_scale);
		assert_eq!(frame.node_radius(1), 10.0);
		assert_eq!(
			frame.tooltip(),
			Some(Tooltip {
				text: "Documentation",
				url: None,
				at: Point::new(40.0, 30.0),
			})
		);

		let endpoints: Vec<_> = frame.links().map(|(_, from, to)| (from, to)).collect();
		assert_eq!(endpoints.len(), 3);
		assert_eq!(endpoints[2], (sim.bodies()[2].position, sim.bodies()[3].position));
	}

	#[test]
	fn no_tooltip_without_hover() {
		let graph = graph();
		let sim = Simulation::new(&graph, SimulationConfig::default(), Point::ZERO);
		let transform = ViewTransform::new(0.3, 3.0);
		let view = ViewConfig::default();
		let interaction = InteractionState::default();
		let frame = Frame {
			graph: &graph,
			bodies: sim.bodies(),
			transform: &transform,
			interaction: &interaction,
			view: &view,
			width: 800.0,
			height: 600.0,
		};
		assert!(frame.tooltip().is_none());
		assert!(!frame.is_highlighted(0));
	}
}
