//! Install/remove orchestration.
//!
//! Turns a resolved, dependency-ordered list of distributions plus the
//! currently installed sets into a concrete, minimal sequence of
//! fetch/remove/install actions, then drives those actions through the
//! external fetch and installer primitives.
//!
//! The plan/execute split keeps the policy testable: [`ActionPlan::compute`]
//! is pure, [`Orchestrator::execute`] owns the side effects.

mod error;
mod fetch;
mod orchestrator;
mod plan;
mod tool;
mod traits;

pub use error::InstallError;
pub use fetch::HttpEggFetcher;
pub use orchestrator::{check_writable, Orchestrator};
pub use plan::{ActionPlan, ForceMode, RemovalReason};
pub use tool::CommandEggTool;
pub use traits::{EggFetcher, EggTool, Resolver};
