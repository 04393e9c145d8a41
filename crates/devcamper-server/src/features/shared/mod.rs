//! Shared utilities and types for feature modules
//!
//! # Contents
//!
//! - **query_filter**: query-string to filter translation
//! - **advanced_results**: paginated list execution with population
//! - **ownership**: owner-or-admin checked reads and writes
//! - **aggregates**: bootcamp averages maintained from courses and reviews
//! - **pagination**: page request and pagination metadata
//! - **validation**: input validation utilities
//! - **test_helpers**: fixtures for handler tests (test-only)

pub mod advanced_results;
pub mod aggregates;
pub mod ownership;
pub mod pagination;
pub mod query_filter;
pub mod validation;

#[cfg(test)]
pub mod test_helpers;

pub use advanced_results::{execute, AdvancedResults, Population};
pub use ownership::{OwnershipError, Resource};
pub use pagination::{PageLink, PageRequest, Pagination};
pub use query_filter::{translate, ListQuery, QueryError};
