use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;
use tracing::error;

use letmeask_infra::RoomServiceError;

pub fn service_error_to_response(err: RoomServiceError) -> axum::response::Response {
    match err {
        RoomServiceError::RoomNotFound => json_error(StatusCode::NOT_FOUND, "room_not_found", "room not found"),
        RoomServiceError::QuestionNotFound => {
            json_error(StatusCode::NOT_FOUND, "question_not_found", "question not found")
        }
        RoomServiceError::Forbidden => json_error(
            StatusCode::FORBIDDEN,
            "forbidden",
            "only the room author can do this",
        ),
        RoomServiceError::InvalidReference(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_reference", msg),
        RoomServiceError::Validation(msg) => json_error(StatusCode::UNPROCESSABLE_ENTITY, "validation_error", msg),
        RoomServiceError::Storage(msg) => {
            error!(error = %msg, "storage failure");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "storage_error", "storage failure")
        }
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
