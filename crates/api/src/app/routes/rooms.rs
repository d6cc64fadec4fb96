use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
};

use letmeask_infra::RoomServiceError;
use letmeask_rooms::{Question, Room};

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::UserContext;

fn respond(status: StatusCode, result: Result<Room, RoomServiceError>) -> axum::response::Response {
    match result {
        Ok(room) => (status, Json(room)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn create_room(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<UserContext>,
    Json(body): Json<dto::CreateRoomRequest>,
) -> axum::response::Response {
    let room = Room::new(body.title, body.author.into_author(user.user_id()));
    respond(StatusCode::CREATED, services.rooms.create(room).await)
}

pub async fn get_room(
    Extension(services): Extension<Arc<AppServices>>,
    Path(room_id): Path<String>,
) -> axum::response::Response {
    respond(StatusCode::OK, services.rooms.find_by_id(&room_id).await)
}

pub async fn end_room(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<UserContext>,
    Path(room_id): Path<String>,
) -> axum::response::Response {
    let caller = user.user_id().to_string();
    respond(StatusCode::OK, services.rooms.end_room(&caller, &room_id).await)
}

pub async fn create_question(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<UserContext>,
    Path(room_id): Path<String>,
    Json(body): Json<dto::CreateQuestionRequest>,
) -> axum::response::Response {
    let question = Question::new(body.content, body.author.into_author(user.user_id()));
    respond(
        StatusCode::CREATED,
        services.rooms.create_question(&room_id, question).await,
    )
}

pub async fn update_question(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<UserContext>,
    Path((room_id, question_id)): Path<(String, String)>,
    Json(body): Json<dto::UpdateQuestionRequest>,
) -> axum::response::Response {
    let caller = user.user_id().to_string();
    respond(
        StatusCode::OK,
        services
            .rooms
            .update_question(&caller, &room_id, &question_id, body)
            .await,
    )
}

pub async fn delete_question(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<UserContext>,
    Path((room_id, question_id)): Path<(String, String)>,
) -> axum::response::Response {
    let caller = user.user_id().to_string();
    respond(
        StatusCode::OK,
        services.rooms.delete_question(&caller, &room_id, &question_id).await,
    )
}

pub async fn like_question(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<UserContext>,
    Path((room_id, question_id)): Path<(String, String)>,
    Json(body): Json<dto::LikeQuestionRequest>,
) -> axum::response::Response {
    let author = body.author.into_author(user.user_id());
    respond(
        StatusCode::OK,
        services.rooms.like_question(&room_id, &question_id, author).await,
    )
}

pub async fn deslike_question(
    Extension(services): Extension<Arc<AppServices>>,
    Path((room_id, question_id, like_id)): Path<(String, String, String)>,
) -> axum::response::Response {
    respond(
        StatusCode::OK,
        services
            .rooms
            .deslike_question(&room_id, &question_id, &like_id)
            .await,
    )
}
