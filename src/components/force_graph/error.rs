//! Errors raised while turning a sitemap document into a graph.

use thiserror::Error;

/// The sitemap document or its tuning is unusable. Construction fails as a
/// whole; no partial graph is ever produced.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigurationError {
	/// Two nodes share an id.
	#[error("duplicate node id: {0}")]
	DuplicateNodeId(String),

	/// A link endpoint names no node.
	#[error("link {source_id} -> {target_id} references unknown node {missing}")]
	UnknownLinkEndpoint {
		source_id: String,
		target_id: String,
		missing: String,
	},

	/// A link whose source and target are the same node.
	#[error("link {0} -> {0} connects a node to itself")]
	SelfLink(String),

	/// A node radius that is zero, negative or not finite.
	#[error("node {id} has invalid radius {radius}: must be finite and positive")]
	InvalidRadius { id: String, radius: f64 },

	/// A link strength outside `(0, 1]`.
	#[error("link {source_id} -> {target_id} has invalid strength {strength}: must be in (0, 1]")]
	InvalidStrength {
		source_id: String,
		target_id: String,
		strength: f64,
	},

	/// A negative or non-finite rest length.
	#[error("link {source_id} -> {target_id} has invalid target distance {distance}")]
	InvalidTargetDistance {
		source_id: String,
		target_id: String,
		distance: f64,
	},

	/// A simulation or view constant out of range. `field` is the JSON name.
	#[error("invalid tuning value for {field}: {value}")]
	InvalidTuning { field: &'static str, value: f64 },
}

/// Failure to obtain a usable sitemap from the page.
#[derive(Debug, Error)]
pub enum LoadError {
	/// The page has no sitemap element (or no window at all).
	#[error("sitemap data element #{0} not found")]
	MissingElement(&'static str),

	/// The embedded document does not deserialize.
	#[error("sitemap data is not valid JSON: {0}")]
	Parse(#[from] serde_json::Error),

	/// The document deserialized but failed validation.
	#[error(transparent)]
	Configuration(#[from] ConfigurationError),
}
