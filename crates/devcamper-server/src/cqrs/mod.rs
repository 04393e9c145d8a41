//! CQRS building blocks
//!
//! Every write operation is a command and every read a query. Both are
//! plain data structs implementing [`mediator::Request`] with their result
//! type, plus one of the marker traits in [`middleware`]. Each has a
//! standalone `handle` function that the feature routes call with the
//! shared state.

pub mod middleware;

pub use middleware::{Command, Query};
