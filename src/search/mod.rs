//! Search over mixes: the index artifact and the query engine working on it.

pub mod index;
pub mod query;
