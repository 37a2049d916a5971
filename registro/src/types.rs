//! Common type definitions.

/// Identifier assigned by the store (SQLite `INTEGER PRIMARY KEY AUTOINCREMENT`).
pub type EmployeeId = i64;
