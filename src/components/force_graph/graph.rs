//! Immutable sitemap graph: validated nodes, resolved links and adjacency.

use std::collections::HashMap;

use log::debug;

use super::config::SimulationConfig;
use super::error::ConfigurationError;
use super::types::{LinkKind, SitemapData};

/// Position of a node in the graph's node arena.
pub type NodeIndex = usize;

/// A sitemap entry: a category or a page.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
	/// Unique within the graph.
	pub id: String,
	/// Display text; the id when the document gives none.
	pub label: String,
	/// Color category.
	pub group: u32,
	/// Drawn radius, also the collision radius and repulsion weight.
	pub base_radius: f64,
	/// Raw navigation target; see [`Node::link_target`].
	pub url: Option<String>,
}

impl Node {
	/// Navigation target, if the node has a non-empty one.
	pub fn link_target(&self) -> Option<&str> {
		self.url.as_deref().filter(|url| !url.trim().is_empty())
	}
}

/// A spring between two resolved nodes.
#[derive(Clone, Debug, PartialEq)]
pub struct Link {
	pub source: NodeIndex,
	pub target: NodeIndex,
	pub kind: LinkKind,
	/// Spring stiffness in `(0, 1]`.
	pub strength: f64,
	/// Rest length in world units.
	pub target_distance: f64,
}

/// Nodes, links and adjacency. Built once, never mutated afterwards.
#[derive(Clone, Debug)]
pub struct Graph {
	nodes: Vec<Node>,
	links: Vec<Link>,
	adjacency: Vec<Vec<NodeIndex>>,
	index: HashMap<String, NodeIndex>,
}

impl Graph {
	/// Validates the document and resolves every link endpoint.
	///
	/// Fails on duplicate ids, unknown or self-referencing endpoints, and
	/// out-of-range radii or strengths.
	pub fn build(data: &SitemapData, config: &SimulationConfig) -> Result<Self, ConfigurationError> {
		let mut index = HashMap::with_capacity(data.nodes.len());
		let mut nodes = Vec::with_capacity(data.nodes.len());

		for raw in &data.nodes {
			if !(raw.base_radius.is_finite() && raw.base_radius > 0.0) {
				return Err(ConfigurationError::InvalidRadius {
					id: raw.id.clone(),
					radius: raw.base_radius,
				});
			}
			if index.insert(raw.id.clone(), nodes.len()).is_some() {
				return Err(ConfigurationError::DuplicateNodeId(raw.id.clone()));
			}
			nodes.push(Node {
				id: raw.id.clone(),
				label: raw.label.clone().unwrap_or_else(|| raw.id.clone()),
				group: raw.group,
				base_radius: raw.base_radius,
				url: raw.url.clone(),
			});
		}

		let mut links = Vec::with_capacity(data.links.len());
		let mut adjacency = vec![Vec::new(); nodes.len()];

		for raw in &data.links {
			let resolve = |id: &String| {
				index
					.get(id)
					.copied()
					.ok_or_else(|| ConfigurationError::UnknownLinkEndpoint {
						source_id: raw.source.clone(),
						target_id: raw.target.clone(),
						missing: id.clone(),
					})
			};
			let source = resolve(&raw.source)?;
			let target = resolve(&raw.target)?;
			if source == target {
				return Err(ConfigurationError::SelfLink(raw.source.clone()));
			}

			let strength = raw.strength.unwrap_or(match raw.kind {
				LinkKind::Hierarchy => config.hierarchy_strength,
				LinkKind::Cross => config.cross_link_strength,
			});
			if !(strength.is_finite() && strength > 0.0 && strength <= 1.0) {
				return Err(ConfigurationError::InvalidStrength {
					source_id: raw.source.clone(),
					target_id: raw.target.clone(),
					strength,
				});
			}

			let target_distance = raw.target_distance.unwrap_or(
				nodes[source].base_radius + nodes[target].base_radius + config.link_spacing,
			);
			if !(target_distance.is_finite() && target_distance >= 0.0) {
				return Err(ConfigurationError::InvalidTargetDistance {
					source_id: raw.source.clone(),
					target_id: raw.target.clone(),
					distance: target_distance,
				});
			}

			if !adjacency[source].contains(&target) {
				adjacency[source].push(target);
				adjacency[target].push(source);
			}
			links.push(Link {
				source,
				target,
				kind: raw.kind,
				strength,
				target_distance,
			});
		}

		debug!("graph built: {} nodes, {} links", nodes.len(), links.len());

		Ok(Self {
			nodes,
			links,
			adjacency,
			index,
		})
	}

	pub fn nodes(&self) -> &[Node] {
		&self.nodes
	}

	pub fn node(&self, idx: NodeIndex) -> Option<&Node> {
		self.nodes.get(idx)
	}

	pub fn links(&self) -> &[Link] {
		&self.links
	}

	/// Nodes sharing at least one link with `idx`.
	pub fn neighbors(&self, idx: NodeIndex) -> &[NodeIndex] {
		self.adjacency.get(idx).map(Vec::as_slice).unwrap_or(&[])
	}

	pub fn index_of(&self, id: &str) -> Option<NodeIndex> {
		self.index.get(id).copied()
	}

	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}
}
