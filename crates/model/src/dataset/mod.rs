pub mod descriptor;
pub mod filter;
pub mod freshness;
