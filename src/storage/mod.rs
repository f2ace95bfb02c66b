//! In-memory state owned by the service: the keyed data store, the record
//! store, the runtime configuration store and the analysis result cache.
mod analysis_cache;
mod config_store;
mod data_store;
mod record;

pub use analysis_cache::*;
pub use config_store::*;
pub use data_store::*;
pub use record::*;

#[cfg(test)]
mod record_test;
