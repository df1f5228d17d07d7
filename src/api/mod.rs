//! HTTP API.
//!
//! ```text
//! {prefix}
//! ├── /estimate-sourcing-routes/{chainId}/{token}  GET  - Cheapest sourcing plan
//! ├── /estimate-fees-with-actions                  POST - Fee quote for a cast
//! └── /health                                      GET  - Health check
//! ```

mod handlers;
pub use handlers::{
    AppState, EstimateWithActionsBody, SourcingRoutesQuery, estimate_fees_with_actions,
    estimate_sourcing_routes, health,
};

mod routes;
pub use routes::create_router;
