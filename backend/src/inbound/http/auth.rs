//! Account API handlers.
//!
//! ```text
//! POST /api/v1/signup  {"email":"you@example.com","password":"...","displayName":"You"}
//! POST /api/v1/login   {"email":"you@example.com","password":"..."}
//! POST /api/v1/logout
//! GET  /api/v1/session
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::ports::AuthenticatedSession;
use crate::domain::{AuthValidationError, Error, SignInCredentials, SignUpRequest};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Sign-up request body.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignUpBody {
    pub email: String,
    pub password: String,
    pub display_name: String,
}

/// Sign-in request body.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginBody {
    pub email: String,
    pub password: String,
}

/// The signed-in user as returned to the browser.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub id: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_color: Option<String>,
}

impl From<&AuthenticatedSession> for SessionUser {
    fn from(session: &AuthenticatedSession) -> Self {
        Self {
            id: session.identity().id().to_string(),
            email: session.identity().email().to_string(),
            display_name: session
                .profile()
                .map(|profile| profile.display_name().to_string()),
            avatar_color: session
                .profile()
                .map(|profile| profile.avatar_color().to_string()),
        }
    }
}

/// Tri-state session response: the browser renders a loading state until
/// this resolves, then either the login screen or the gallery.
#[derive(Debug, Serialize, ToSchema)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum SessionBody {
    Unauthenticated,
    Authenticated { user: SessionUser },
}

impl SessionBody {
    fn authenticated(session: &AuthenticatedSession) -> Self {
        Self::Authenticated {
            user: SessionUser::from(session),
        }
    }
}

fn map_auth_validation_error(err: AuthValidationError) -> Error {
    let (field, code) = match &err {
        AuthValidationError::EmptyEmail => ("email", "empty_email"),
        AuthValidationError::InvalidEmail => ("email", "invalid_email"),
        AuthValidationError::EmptyPassword => ("password", "empty_password"),
        AuthValidationError::DisplayName(_) => ("displayName", "invalid_display_name"),
    };
    Error::invalid_request(err.to_string()).with_details(json!({ "field": field, "code": code }))
}

/// Register a new account and establish a session.
#[utoipa::path(
    post,
    path = "/api/v1/signup",
    request_body = SignUpBody,
    responses(
        (status = 200, description = "Account created and signed in", body = SessionBody,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = Error),
        (status = 409, description = "Email already registered", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["accounts"],
    operation_id = "signUp",
    security([])
)]
#[post("/signup")]
pub async fn sign_up(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<SignUpBody>,
) -> ApiResult<web::Json<SessionBody>> {
    let body = payload.into_inner();
    let request = SignUpRequest::try_from_parts(&body.email, &body.password, &body.display_name)
        .map_err(map_auth_validation_error)?;

    let account = state.accounts.sign_up(&request).await?;
    session.persist_user(account.identity().id())?;
    Ok(web::Json(SessionBody::authenticated(&account)))
}

/// Authenticate existing credentials and establish a session.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginBody,
    responses(
        (status = 200, description = "Signed in", body = SessionBody,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["accounts"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginBody>,
) -> ApiResult<web::Json<SessionBody>> {
    let body = payload.into_inner();
    let credentials = SignInCredentials::try_from_parts(&body.email, &body.password)
        .map_err(map_auth_validation_error)?;

    let account = state.accounts.sign_in(&credentials).await?;
    session.persist_user(account.identity().id())?;
    Ok(web::Json(SessionBody::authenticated(&account)))
}

/// End the session.
///
/// Always clears the cookie, even when server-side revocation fails, so a
/// browser can never get stuck signed in.
#[utoipa::path(
    post,
    path = "/api/v1/logout",
    responses(
        (status = 204, description = "Signed out"),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["accounts"],
    operation_id = "logout",
    security([])
)]
#[post("/logout")]
pub async fn logout(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    if let Some(user) = session.user_id()? {
        state.accounts.sign_out(&user).await;
    }
    session.purge();
    Ok(HttpResponse::NoContent().finish())
}

/// Resolve the current session.
#[utoipa::path(
    get,
    path = "/api/v1/session",
    responses(
        (status = 200, description = "Session state", body = SessionBody),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["accounts"],
    operation_id = "getSession",
    security([])
)]
#[get("/session")]
pub async fn get_session(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<SessionBody>> {
    let Some(user) = session.user_id()? else {
        return Ok(web::Json(SessionBody::Unauthenticated));
    };

    match state.accounts.session_for(&user).await? {
        Some(account) => Ok(web::Json(SessionBody::authenticated(&account))),
        None => {
            // Stale cookie, e.g. signed out from another tab.
            session.purge();
            Ok(web::Json(SessionBody::Unauthenticated))
        }
    }
}
