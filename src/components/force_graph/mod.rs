//! Interactive force-directed sitemap graph.

mod component;
pub mod config;
pub mod error;
pub mod forces;
pub mod graph;
pub mod interaction;
pub mod render;
pub mod simulation;
pub mod state;
pub mod transform;
pub mod types;

pub use component::SitemapGraph;
pub use config::{SimulationConfig, SitemapConfig, ViewConfig};
pub use error::{ConfigurationError, LoadError};
pub use graph::{Graph, Link, Node, NodeIndex};
pub use interaction::{InteractionController, InteractionState, Navigation, PointerSample};
pub use render::{Frame, Renderer};
pub use simulation::{Simulation, SimulationState, TickOutcome};
pub use state::{Sitemap, SitemapState};
pub use transform::{Point, ViewTransform};
pub use types::{LinkKind, SitemapData, SitemapLink, SitemapNode};
