//! Adapter implementations
//!
//! Adapters implement the port traits with concrete technologies:
//! - DuckDB for both repository ports

pub mod duckdb;
