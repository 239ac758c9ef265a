//! Authentication endpoints.
//!
//! ```text
//! POST /api/auth/login/   {"username":"juandelacruz","password":"password123"}
//! POST /api/auth/refresh/ {"refresh":"<token>"}
//! GET  /api/auth/me/
//! POST /api/auth/logout/
//! ```

use actix_web::{HttpRequest, HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use utoipa::ToSchema;

use crate::domain::{AuthError, Error, LoginCredentials, LoginValidationError, User};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::cookies::{
    ACCESS_COOKIE, REFRESH_COOKIE, credential_cookie, removal_cookie,
};
use crate::inbound::http::state::HttpState;

const FIELD_REQUIRED: &str = "This field is required.";
const FIELD_BLANK: &str = "This field may not be blank.";

/// Login request body. `uername` is read when `username` is absent.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct LoginRequest {
    #[serde(default)]
    #[schema(example = "juandelacruz")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(ignore)]
    pub uername: Option<String>,
    #[serde(default)]
    #[schema(example = "password123")]
    pub password: Option<String>,
}

/// Tokens and profile returned by a successful login.
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub access: String,
    pub refresh: String,
    pub user: User,
}

#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct RefreshRequest {
    #[serde(default)]
    pub refresh: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AccessResponse {
    pub access: String,
}

fn required(field: &'static str) -> Error {
    Error::invalid_request(FIELD_REQUIRED).with_details(json!({ "field": field, "code": "required" }))
}

fn map_login_validation_error(err: LoginValidationError) -> Error {
    let field = err.field();
    match err {
        LoginValidationError::EmptyUsername | LoginValidationError::EmptyPassword => {
            Error::invalid_request(FIELD_BLANK)
                .with_details(json!({ "field": field, "code": "blank" }))
        }
        LoginValidationError::UsernameTooLong { .. }
        | LoginValidationError::PasswordTooLong { .. } => Error::invalid_request(err.to_string())
            .with_details(json!({ "field": field, "code": "max_length" })),
    }
}

/// Authenticate and receive an access/refresh token pair.
///
/// Both tokens are also set as HttpOnly cookies so browser clients and the
/// WebSocket endpoint can use them without touching JavaScript storage.
#[utoipa::path(
    post,
    path = "/api/auth/login/",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = LoginResponse,
            headers(("Set-Cookie" = String, description = "access_token and refresh_token cookies"))),
        (status = 400, description = "Missing or blank field", body = Error),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 503, description = "User storage unavailable", body = Error)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login/")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let LoginRequest {
        username,
        uername,
        password,
    } = payload.into_inner();
    let username = username.or(uername).ok_or_else(|| required("username"))?;
    let password = password.ok_or_else(|| required("password"))?;
    let credentials = LoginCredentials::try_from_parts(&username, &password)
        .map_err(map_login_validation_error)?;

    let user = state.login.authenticate(&credentials).await?;
    let tokens = state.tokens.issue_pair(user.id())?;
    let lifetimes = state.tokens.lifetimes();
    info!(user_id = %user.id(), "user logged in");

    Ok(HttpResponse::Ok()
        .cookie(credential_cookie(
            ACCESS_COOKIE,
            tokens.access.clone(),
            lifetimes.access,
            state.cookies,
        ))
        .cookie(credential_cookie(
            REFRESH_COOKIE,
            tokens.refresh.clone(),
            lifetimes.refresh,
            state.cookies,
        ))
        .json(LoginResponse {
            access: tokens.access,
            refresh: tokens.refresh,
            user,
        }))
}

/// Exchange a refresh token for a new access token.
///
/// The token is read from the `refresh` body field, falling back to the
/// `refresh_token` cookie.
#[utoipa::path(
    post,
    path = "/api/auth/refresh/",
    request_body(content = RefreshRequest, description = "Optional when the refresh_token cookie is sent"),
    responses(
        (status = 200, description = "New access token", body = AccessResponse),
        (status = 401, description = "Missing, expired or invalid refresh token", body = Error)
    ),
    tags = ["auth"],
    operation_id = "refreshToken",
    security([])
)]
#[post("/auth/refresh/")]
pub async fn refresh(
    state: web::Data<HttpState>,
    req: HttpRequest,
    payload: Option<web::Json<RefreshRequest>>,
) -> ApiResult<HttpResponse> {
    let from_body = payload.and_then(|body| body.into_inner().refresh);
    let from_cookie = || req.cookie(REFRESH_COOKIE).map(|c| c.value().to_owned());
    let raw = from_body
        .or_else(from_cookie)
        .ok_or(AuthError::AuthenticationFailed)?;

    let user_id = state.tokens.validate_refresh(&raw)?;
    let access = state.tokens.issue_access(user_id)?;

    Ok(HttpResponse::Ok()
        .cookie(credential_cookie(
            ACCESS_COOKIE,
            access.clone(),
            state.tokens.lifetimes().access,
            state.cookies,
        ))
        .json(AccessResponse { access }))
}

/// Return the authenticated caller's profile.
#[utoipa::path(
    get,
    path = "/api/auth/me/",
    responses(
        (status = 200, description = "Current user", body = User),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["auth"],
    operation_id = "currentUser"
)]
#[get("/auth/me/")]
pub async fn current_user(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
) -> ApiResult<web::Json<User>> {
    let user = state.profile.fetch_profile(caller.id()).await?;
    Ok(web::Json(user))
}

/// Clear both credential cookies.
#[utoipa::path(
    post,
    path = "/api/auth/logout/",
    responses((status = 204, description = "Cookies cleared")),
    tags = ["auth"],
    operation_id = "logout",
    security([])
)]
#[post("/auth/logout/")]
pub async fn logout(state: web::Data<HttpState>) -> HttpResponse {
    HttpResponse::NoContent()
        .cookie(removal_cookie(ACCESS_COOKIE, state.cookies))
        .cookie(removal_cookie(REFRESH_COOKIE, state.cookies))
        .finish()
}

#[cfg(test)]
#[path = "users_tests.rs"]
mod tests;
