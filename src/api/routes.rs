//! API route configuration.
//!
//! Everything except login requires a session via
//! [`crate::api::middleware::auth`].

use crate::api::handlers::{
    apartment_label_handler, apartment_list_handler, batch_create_handler, begin_reorder_handler,
    building_list_handler, cancel_reorder_handler, create_resident_handler,
    delete_resident_handler, document_handler, get_reorder_handler, login_handler,
    logout_handler, me_handler, move_resident_handler, resident_list_handler,
    save_reorder_handler, update_resident_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, patch, post},
};

/// API routes protected by session authentication.
///
/// # Endpoints
///
/// - `POST   /auth/logout`                                   - End the session
/// - `GET    /auth/me`                                       - Current administrator
/// - `GET    /buildings`                                     - List buildings
/// - `GET    /buildings/{id}/residents`                      - List residents
/// - `POST   /buildings/{id}/residents`                      - Register a resident
/// - `POST   /buildings/{id}/residents/batch`                - Bulk intake
/// - `GET    /buildings/{id}/apartments`                     - Apartments with residents
/// - `GET    /buildings/{id}/apartments/{apt}/label`         - Single apartment label
/// - `GET|POST|DELETE /buildings/{id}/apartments/{apt}/reorder` - View, start, cancel
/// - `POST   /buildings/{id}/apartments/{apt}/reorder/moves` - Move a resident
/// - `POST   /buildings/{id}/apartments/{apt}/reorder/save`  - Persist priorities
/// - `GET    /buildings/{id}/documents/{kind}`               - Directory or labels
/// - `PATCH  /residents/{id}`                                - Update a resident
/// - `DELETE /residents/{id}`                                - Delete a resident
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/logout", post(logout_handler))
        .route("/auth/me", get(me_handler))
        .route("/buildings", get(building_list_handler))
        .route(
            "/buildings/{id}/residents",
            get(resident_list_handler).post(create_resident_handler),
        )
        .route("/buildings/{id}/residents/batch", post(batch_create_handler))
        .route("/buildings/{id}/apartments", get(apartment_list_handler))
        .route(
            "/buildings/{id}/apartments/{apt}/label",
            get(apartment_label_handler),
        )
        .route(
            "/buildings/{id}/apartments/{apt}/reorder",
            get(get_reorder_handler)
                .post(begin_reorder_handler)
                .delete(cancel_reorder_handler),
        )
        .route(
            "/buildings/{id}/apartments/{apt}/reorder/moves",
            post(move_resident_handler),
        )
        .route(
            "/buildings/{id}/apartments/{apt}/reorder/save",
            post(save_reorder_handler),
        )
        .route("/buildings/{id}/documents/{kind}", get(document_handler))
        .route(
            "/residents/{id}",
            patch(update_resident_handler).delete(delete_resident_handler),
        )
}

/// API routes reachable without a session.
///
/// # Endpoints
///
/// - `POST /auth/login` - Exchange credentials for a session token
pub fn public_routes() -> Router<AppState> {
    Router::new().route("/auth/login", post(login_handler))
}
