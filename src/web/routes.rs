//! Web page route configuration.

use crate::state::AppState;
use crate::web::handlers::{
    add_resident_handler, apartment_label_print_handler, building_handler, buildings_handler,
    delete_resident_handler, edit_resident_handler, intake_handler, login_form_handler,
    login_handler, logout_handler, print_handler, reorder_cancel_handler, reorder_move_handler,
    reorder_page_handler, reorder_save_handler, reorder_start_handler,
};
use axum::{
    Router,
    response::Redirect,
    routing::{get, post},
};

/// Pages requiring a browser session.
///
/// Protected via [`crate::web::middleware::web_auth`].
///
/// # Endpoints
///
/// - `GET  /` - Redirect to `/buildings`
/// - `GET  /buildings` - Building list
/// - `GET  /buildings/{id}` - Resident manager
/// - `POST /buildings/{id}/residents` - Add a resident
/// - `POST /buildings/{id}/residents/batch` - Bulk intake
/// - `POST /buildings/{id}/residents/{resident_id}/edit` - Update a resident
/// - `POST /buildings/{id}/residents/{resident_id}/delete` - Delete a resident
/// - `GET  /buildings/{id}/apartments/{apt}/reorder` - Reorder page
/// - `POST /buildings/{id}/apartments/{apt}/reorder/{start|move|save|cancel}`
/// - `GET  /buildings/{id}/print/{directory|labels}` - Printable document
/// - `GET  /buildings/{id}/print/apartments/{apt}` - Single apartment label
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(|| async { Redirect::to("/buildings") }))
        .route("/buildings", get(buildings_handler))
        .route("/buildings/{id}", get(building_handler))
        .route("/buildings/{id}/residents", post(add_resident_handler))
        .route("/buildings/{id}/residents/batch", post(intake_handler))
        .route(
            "/buildings/{id}/residents/{resident_id}/edit",
            post(edit_resident_handler),
        )
        .route(
            "/buildings/{id}/residents/{resident_id}/delete",
            post(delete_resident_handler),
        )
        .route(
            "/buildings/{id}/apartments/{apt}/reorder",
            get(reorder_page_handler),
        )
        .route(
            "/buildings/{id}/apartments/{apt}/reorder/start",
            post(reorder_start_handler),
        )
        .route(
            "/buildings/{id}/apartments/{apt}/reorder/move",
            post(reorder_move_handler),
        )
        .route(
            "/buildings/{id}/apartments/{apt}/reorder/save",
            post(reorder_save_handler),
        )
        .route(
            "/buildings/{id}/apartments/{apt}/reorder/cancel",
            post(reorder_cancel_handler),
        )
        .route("/buildings/{id}/print/{kind}", get(print_handler))
        .route(
            "/buildings/{id}/print/apartments/{apt}",
            get(apartment_label_print_handler),
        )
}

/// Pages reachable without a session.
///
/// # Endpoints
///
/// - `GET  /login` - Login form
/// - `POST /login` - Sign in
/// - `POST /logout` - Sign out
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(login_form_handler).post(login_handler))
        .route("/logout", post(logout_handler))
}
