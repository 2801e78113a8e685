pub mod page;
pub mod record;
