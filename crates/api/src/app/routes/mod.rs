use axum::{
    Router,
    routing::{delete, get, patch, post},
};

pub mod rooms;
pub mod system;

/// Routes open to anonymous readers.
pub fn public_router() -> Router {
    Router::new().route("/rooms/:room_id", get(rooms::get_room))
}

/// Routes that require an authenticated caller.
pub fn protected_router() -> Router {
    Router::new()
        .route("/rooms", post(rooms::create_room))
        .route("/rooms/:room_id", delete(rooms::end_room))
        .route("/rooms/:room_id/questions", post(rooms::create_question))
        .route(
            "/rooms/:room_id/questions/:question_id",
            patch(rooms::update_question).delete(rooms::delete_question),
        )
        .route("/rooms/:room_id/questions/:question_id/likes", post(rooms::like_question))
        .route(
            "/rooms/:room_id/questions/:question_id/likes/:like_id",
            delete(rooms::deslike_question),
        )
        .route("/whoami", get(system::whoami))
}
