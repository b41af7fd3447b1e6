//! Utility functions shared by the API and web layers.
//!
//! - [`filename`] - ASCII download filenames for printable documents
//! - [`session_token`] - Session token generation and cookie handling

pub mod filename;
pub mod session_token;
