//! Progress reporting while a query is in flight

pub mod reporter;
