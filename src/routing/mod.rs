//! Sourcing route selection.

mod optimizer;
pub use optimizer::{find_optimal_sources, subsets};

mod orchestrator;
pub use orchestrator::{SourcingOrchestrator, SourcingRequest};
