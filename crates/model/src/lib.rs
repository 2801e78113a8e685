pub mod core;
pub mod dataset;
pub mod records;
