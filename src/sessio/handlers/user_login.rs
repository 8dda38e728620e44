use crate::{
    cli::globals::GlobalArgs,
    password,
    token::{self, SessionClaims},
    store,
};
use axum::{
    extract::Extension,
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::PgPool;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, error, instrument};
use utoipa::ToSchema;

/// Cookie lifetime in seconds. The codec itself never enforces expiry; this
/// is the only lifetime mechanism a token has.
const COOKIE_MAX_AGE_SECONDS: u64 = 3600;

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct UserLogin {
    username: String,
    password: String,
}

#[utoipa::path(
    post,
    path= "/login",
    request_body = UserLogin,
    responses (
        (status = 200, description = "Login successful, session token in body and cookie", content_type = "application/json"),
        (status = 400, description = "Invalid credentials"),
        (status = 500, description = "Store failure"),
    ),
    tag= "login"
)]
// axum handler for login. Lookup is by username only; an unknown username
// and a wrong password produce the same response, so the endpoint leaks no
// enumeration signal.
#[instrument(skip_all)]
pub async fn login(
    pool: Extension<PgPool>,
    globals: Extension<GlobalArgs>,
    payload: Option<Json<UserLogin>>,
) -> impl IntoResponse {
    let user: UserLogin = match payload {
        Some(Json(payload)) => payload,
        None => {
            return (
                StatusCode::BAD_REQUEST,
                HeaderMap::new(),
                Json(json!({"message": "Missing payload"})),
            )
        }
    };

    debug!("login request for username: {}", user.username);

    let record = match store::find_by_username(&pool, &user.username).await {
        Ok(Some(record)) => record,
        Ok(None) => {
            debug!("User not found");
            return (
                StatusCode::BAD_REQUEST,
                HeaderMap::new(),
                Json(json!({"message": "Invalid credentials"})),
            );
        }
        Err(e) => {
            error!("Error getting user from database: {:?}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                HeaderMap::new(),
                Json(json!({"message": "Server error"})),
            );
        }
    };

    match password::verify(&user.password, &record.password_hash) {
        Ok(true) => (),
        Ok(false) => {
            debug!("Password mismatch");
            return (
                StatusCode::BAD_REQUEST,
                HeaderMap::new(),
                Json(json!({"message": "Invalid credentials"})),
            );
        }
        Err(e) => {
            // corrupt stored hash, not a caller problem
            error!("Error verifying password: {:?}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                HeaderMap::new(),
                Json(json!({"message": "Server error"})),
            );
        }
    }

    // claims come from the stored record, never from the request
    let mut claims = SessionClaims::new(&record.username, &record.role);
    claims.iat = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .ok()
        .and_then(|d| i64::try_from(d.as_secs()).ok());

    let token = match token::encode(&claims, globals.secret.expose_secret()) {
        Ok(token) => token,
        Err(e) => {
            error!("Error encoding session token: {:?}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                HeaderMap::new(),
                Json(json!({"message": "Server error"})),
            );
        }
    };

    // Readable and editable by the holder on purpose: no HttpOnly.
    let mut headers = HeaderMap::new();
    if let Ok(cookie) =
        format!("token={token}; Path=/; Max-Age={COOKIE_MAX_AGE_SECONDS}").parse()
    {
        headers.insert(SET_COOKIE, cookie);
    }

    debug!("Login successful");

    (
        StatusCode::OK,
        headers,
        Json(json!({"message": "Login successful!", "token": token})),
    )
}
