//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod auth;
pub mod buildings;
pub mod documents;
pub mod health;
pub mod reorder;
pub mod residents;

pub use auth::{login_handler, logout_handler, me_handler};
pub use buildings::building_list_handler;
pub use documents::{apartment_label_handler, document_handler};
pub use health::health_handler;
pub use reorder::{
    begin_reorder_handler, cancel_reorder_handler, get_reorder_handler, move_resident_handler,
    save_reorder_handler,
};
pub use residents::{
    apartment_list_handler, batch_create_handler, create_resident_handler,
    delete_resident_handler, resident_list_handler, update_resident_handler,
};
