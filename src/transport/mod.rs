//! Transport layers of the chain RPC clients.

mod timeout;
pub use timeout::{TimeoutLayer, TimeoutService};
