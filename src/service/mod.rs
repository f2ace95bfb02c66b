//! The service facade and its lifecycle bookkeeping.
mod action;
mod builder;
mod context;
#[allow(clippy::module_inception)]
mod service;
mod stats;
mod status;

pub use action::*;
pub use builder::*;
pub use context::*;
pub use service::*;
pub use stats::*;
pub use status::*;
