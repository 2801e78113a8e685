pub mod ckan;
pub mod error;
pub mod sql;
