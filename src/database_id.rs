//! Database ID type definition.

/// Alias for the integer type used for mapping to database IDs.
pub type DatabaseId = i64;

/// The ID of an item that has not been added to a repository yet.
pub const UNASSIGNED_ID: DatabaseId = 0;
