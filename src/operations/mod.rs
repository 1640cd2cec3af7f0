pub mod modification;
pub mod query;
