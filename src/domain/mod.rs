//! Domain layer containing business entities and logic.
//!
//! Everything here is independent of HTTP, SQL and templates. The ordering,
//! pagination, reorder and document modules are pure and synchronous; I/O only
//! happens behind the repository, renderer and auth traits.
//!
//! # Architecture
//!
//! - [`entities`] - Buildings, residents, users and sessions
//! - [`repositories`] - Record store trait definitions
//! - [`collation`] - Icelandic string comparison
//! - [`ordering`] - Sort by name, group by apartment, sort by priority
//! - [`pagination`] - Mailbox label sheets
//! - [`reorder`] - Priority reordering state machine
//! - [`document`] - Printable document trees and the renderer trait
//! - [`auth`] - Authentication capability
//!
//! # Data Flow
//!
//! 1. Residents are fetched through [`repositories::ResidentRepository`]
//! 2. [`ordering`] sorts and groups them
//! 3. [`pagination`] and [`document`] lay them out
//! 4. A [`document::DocumentRenderer`] turns the tree into a file

pub mod auth;
pub mod collation;
pub mod document;
pub mod entities;
pub mod ordering;
pub mod pagination;
pub mod reorder;
pub mod repositories;
