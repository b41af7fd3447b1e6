//! Web front end for administrators.
//!
//! Server-rendered HTML pages for managing residents, reordering apartments
//! and printing documents. Uses Askama templates.
//!
//! # Modules
//!
//! - [`handlers`] - Page handlers
//! - [`middleware`] - Cookie session authentication
//! - [`routes`] - Page route configuration

pub mod handlers;
pub mod middleware;
pub mod routes;
