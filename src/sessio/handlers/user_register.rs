use crate::{password, store};
use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::PgPool;
use tracing::{debug, error, instrument};
use utoipa::ToSchema;

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct UserRegister {
    username: String,
    email: String,
    password: String,
}

#[utoipa::path(
    post,
    path= "/register",
    request_body = UserRegister,
    responses (
        (status = 201, description = "Registration successful", content_type = "application/json"),
        (status = 400, description = "User with the specified username or email already exists"),
        (status = 500, description = "Store failure"),
    ),
    tag= "register"
)]
// axum handler for registration. Every new account gets role "user"; the
// payload has no role field and the insert does not take one.
#[instrument(skip_all)]
pub async fn register(
    pool: Extension<PgPool>,
    payload: Option<Json<UserRegister>>,
) -> impl IntoResponse {
    let user: UserRegister = match payload {
        Some(Json(payload)) => payload,
        None => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({"message": "Missing payload"})),
            )
        }
    };

    debug!("registration request for username: {}", user.username);

    // check if user exists, username or email both count
    match store::find_by_username_or_email(&pool, &user.username, &user.email).await {
        Ok(Some(_)) => {
            debug!("User already exists");
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({"message": "User already exists"})),
            );
        }
        Ok(None) => (),
        Err(e) => {
            error!("Error checking if user exists: {:?}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"message": "Server error"})),
            );
        }
    }

    let password_hash = match password::hash(&user.password) {
        Ok(hash) => hash,
        Err(e) => {
            error!("Error hashing password: {:?}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"message": "Server error"})),
            );
        }
    };

    match store::insert(&pool, &user.username, &user.email, &password_hash).await {
        Ok(()) => (
            StatusCode::CREATED,
            Json(json!({"message": "User registered successfully!"})),
        ),
        // the loser of a concurrent registration race lands here
        Err(e) if store::is_unique_violation(&e) => (
            StatusCode::BAD_REQUEST,
            Json(json!({"message": "User already exists"})),
        ),
        Err(e) => {
            error!("Error inserting user: {:?}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"message": "Server error"})),
            )
        }
    }
}
