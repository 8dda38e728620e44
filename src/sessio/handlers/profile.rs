use crate::{
    access::{self, Error},
    cli::globals::GlobalArgs,
    sessio::handlers::{cookie_value, TOKEN_COOKIE},
};
use axum::{
    extract::Extension,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde_json::json;
use tracing::{debug, instrument};

#[utoipa::path(
    get,
    path= "/profile-data",
    responses (
        (status = 200, description = "Profile for the presented token; includes the flag when the role claim is admin", content_type = "application/json"),
        (status = 400, description = "Token present but not decodable"),
        (status = 401, description = "No token cookie presented"),
    ),
    tag= "profile"
)]
// axum handler for the protected resource. The token comes from the `token`
// cookie and its claims are trusted without signature verification; the
// access decision lives in `access::evaluate`.
#[instrument(skip_all)]
pub async fn profile_data(
    globals: Extension<GlobalArgs>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let token = cookie_value(&headers, TOKEN_COOKIE);

    match access::evaluate(token.as_deref(), &globals.flag) {
        Ok(response) => (StatusCode::OK, Json(json!(response))),
        Err(Error::Unauthenticated) => {
            debug!("No token presented");
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({"message": "Not authenticated"})),
            )
        }
        Err(Error::InvalidToken) => {
            debug!("Token did not decode");
            (
                StatusCode::BAD_REQUEST,
                Json(json!({"message": "Invalid token"})),
            )
        }
    }
}
