//! Sitemap document structures supplied to the graph widget.
//!
//! The documentation build embeds one of these as JSON in the generated page.
//! Field names follow the JSON convention (`baseRadius`, `targetDistance`).

use serde::Deserialize;

use super::config::SitemapConfig;

/// Radius used when a node does not specify one.
pub const DEFAULT_BASE_RADIUS: f64 = 8.0;

fn default_base_radius() -> f64 {
	DEFAULT_BASE_RADIUS
}

/// A category or page in the sitemap.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SitemapNode {
	/// Unique identifier. Links refer to nodes by this value.
	pub id: String,
	/// Display text. Falls back to `id` when absent.
	#[serde(default)]
	pub label: Option<String>,
	/// Category tag used for color mapping.
	#[serde(default)]
	pub group: u32,
	/// Nominal size; doubles as collision radius and mass proxy.
	#[serde(default = "default_base_radius")]
	pub base_radius: f64,
	/// Navigation target for content pages.
	#[serde(default)]
	pub url: Option<String>,
}

/// Hierarchy weight of a link.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkKind {
	/// Parent category to child page or sub-category.
	#[default]
	Hierarchy,
	/// "See also" style link between unrelated branches.
	Cross,
}

/// A link between two sitemap nodes, by id.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SitemapLink {
	pub source: String,
	pub target: String,
	#[serde(default)]
	pub kind: LinkKind,
	/// Spring stiffness override in (0, 1].
	#[serde(default)]
	pub strength: Option<f64>,
	/// Rest length override.
	#[serde(default)]
	pub target_distance: Option<f64>,
}

/// Complete sitemap document: nodes, links and optional tuning.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct SitemapData {
	pub nodes: Vec<SitemapNode>,
	#[serde(default)]
	pub links: Vec<SitemapLink>,
	#[serde(default)]
	pub config: Option<SitemapConfig>,
}

impl SitemapNode {
	pub fn new(id: impl Into<String>, base_radius: f64) -> Self {
		Self {
			id: id.into(),
			label: None,
			group: 0,
			base_radius,
			url: None,
		}
	}

	pub fn with_url(mut self, url: impl Into<String>) -> Self {
		self.url = Some(url.into());
		self
	}
}

impl SitemapLink {
	pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
		Self {
			source: source.into(),
			target: target.into(),
			kind: LinkKind::Hierarchy,
			strength: None,
			target_distance: None,
		}
	}

	pub fn cross(mut self) -> Self {
		self.kind = LinkKind::Cross;
		self
	}

	pub fn with_strength(mut self, strength: f64) -> Self {
		self.strength = Some(strength);
		self
	}

	pub fn with_target_distance(mut self, distance: f64) -> Self {
		self.target_distance = Some(distance);
		self
	}
}
