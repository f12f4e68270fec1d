//! Application wiring: shared state, startup, and window management.

pub mod setup;
mod state;
pub mod windows;

pub use state::AppState;
