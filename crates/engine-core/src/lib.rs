pub mod connectors;
pub mod context;
pub mod error;
pub mod metrics;
pub mod progress;
pub mod sync;

#[cfg(test)]
pub(crate) mod testing;
