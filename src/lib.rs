//! # custom-service
//!
//! An in-process platform service: a permission-gated key/value and record
//! store with runtime options, subscriber broadcasts, a background worker and
//! a pluggable analytics engine.
//!
//! ## Quick start
//! ```ignore
//! use std::sync::Arc;
//! use custom_service::{LocalSubscriber, ServiceBuilder, StaticContext};
//!
//! let service = ServiceBuilder::from_env()?.build();
//! let ctx = StaticContext::system();
//!
//! let (subscriber, events) = LocalSubscriber::channel();
//! service.register_callback(&ctx, subscriber)?;
//! service.system_ready()?;
//!
//! service.set_data(&ctx, "greeting", "hello")?;
//! assert_eq!(service.get_data(&ctx, "greeting")?.as_deref(), Some("hello"));
//! ```
mod ai;
mod callback;
mod client;
mod config;
mod constants;
mod errors;
pub mod metrics;
mod service;
mod storage;
mod utils;
mod worker;

pub use ai::*;
pub use callback::*;
pub use client::*;
pub use config::*;
pub use constants::*;
pub use errors::*;
pub use service::*;
pub use storage::*;
pub use worker::*;

//-----------------------------------------------------------
// Test utils

#[cfg(test)]
pub mod test_utils;
