//! Application layer: result query handlers over the stores.

pub mod query_handlers;
