//! Command/query classification

/// A request that modifies state
pub trait Command {}

/// A request that only reads state
pub trait Query {}
