pub mod config;
pub mod spec;

pub use config::{Auth, ConnectionConfig, PortRole};
pub use spec::{EdgeSpec, NeighborSpec, NodeSpec};
