pub mod api;
pub mod endpoints;
pub mod error;
pub mod gsql;
pub mod normalize;
pub mod query;
pub mod traverse;

pub use api::{Body, ParamValue, Payload, QueryParams, TigerGraphApi};
pub use endpoints::{EndpointRegistry, Method, ResolvedEndpoint, Versioned};
pub use error::{Error, Result};
pub use normalize::Table;
pub use query::{get_edges, get_neighbors, get_nodes, FrontierExpander};
pub use traverse::{bfs, NeighborSource};

// Re-export common types for convenience
pub use tigerlink_common::{Auth, ConnectionConfig, EdgeSpec, NeighborSpec, NodeSpec, PortRole};
