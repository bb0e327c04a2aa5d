mod auth;
mod fleet;
mod global;

pub use auth::AuthArgs;
pub use fleet::FleetArgs;
pub use global::GlobalArgs;
