mod instadapp;
pub use instadapp::{Instadapp, InstadappClient};

/// List of supported price fetchers.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum PriceFetcher {
    /// Instadapp price API.
    Instadapp,
}
