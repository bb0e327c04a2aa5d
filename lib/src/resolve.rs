mod endpoint;
mod grouping;
mod hosting;
pub mod inventory;
mod resolver;
mod target;

pub use endpoint::Choice;
pub use endpoint::ResolvedEndpoint;
pub use endpoint::Selection;
pub use resolver::Resolver;
pub use target::AppTargetSpec;
pub use target::IntoAppTarget;
pub use target::IntoTarget;
pub use target::TargetSpec;
