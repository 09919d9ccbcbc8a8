//! Utility functions for SQLite storage operations.

/// Largest id list bound into a single `IN (...)` clause.
///
/// SQLite caps the number of bound parameters per statement (historically 999),
/// so lookups over an unbounded list of parents are split into chunks of this size.
pub const SQLITE_MAX_PARAMS_CHUNK: usize = 500;

/// Splits a slice into chunks that stay under SQLite's parameter limit.
pub fn chunk_for_sqlite<T>(items: &[T]) -> impl Iterator<Item = &[T]> {
    items.chunks(SQLITE_MAX_PARAMS_CHUNK)
}
