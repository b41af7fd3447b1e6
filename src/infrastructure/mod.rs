//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain layer.
//!
//! # Modules
//!
//! - [`persistence`] - PostgreSQL repository implementations
//! - [`spreadsheet`] - Read-only record store over published spreadsheet CSV
//! - [`rendering`] - Printable document renderers
//! - [`drafts`] - In-memory reorder working copies

pub mod drafts;
pub mod persistence;
pub mod rendering;
pub mod spreadsheet;
