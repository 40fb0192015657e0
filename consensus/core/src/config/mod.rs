pub mod milestones;
pub mod network;
pub mod params;

pub use milestones::{compose_milestones, Milestone};
pub use network::{NetworkBuilder, NetworkConfig, ProvisionalNetwork};
pub use params::Params;
