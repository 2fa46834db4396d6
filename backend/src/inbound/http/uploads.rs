//! Upload workflow API handlers.
//!
//! ```text
//! GET    /api/v1/uploads
//! POST   /api/v1/uploads?filename=deck.jpg   (raw image bytes in the body)
//! DELETE /api/v1/uploads/{id}
//! PUT    /api/v1/uploads/caption             {"caption":"Sunset!"}
//! POST   /api/v1/uploads/submit
//! ```
//!
//! Every endpoint operates on the authenticated user's own draft.

use actix_web::{HttpRequest, delete, get, post, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{DraftView, SubmitOutcome};
use crate::domain::{Error, StagedFileId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Largest accepted image body.
///
/// Raised above actix's 256 KB default, which would reject ordinary photos;
/// the app must register `web::PayloadConfig::new(MAX_IMAGE_BYTES)`.
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

/// Query parameters for staging a file.
#[derive(Debug, Deserialize)]
pub struct StageQuery {
    /// Original filename, used for type validation and the storage key.
    pub filename: String,
}

/// Caption update request body.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CaptionBody {
    pub caption: String,
}

/// One photo created by a submitted batch.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatedPhotoDto {
    pub id: String,
    pub image_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Response body for a successful submit.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    pub created: Vec<CreatedPhotoDto>,
}

impl From<SubmitOutcome> for SubmitResponse {
    fn from(outcome: SubmitOutcome) -> Self {
        Self {
            created: outcome
                .created()
                .iter()
                .map(|photo| CreatedPhotoDto {
                    id: photo.id().to_string(),
                    image_url: photo.image_url().to_string(),
                    caption: photo.caption().map(ToString::to_string),
                    created_at: photo.created_at(),
                })
                .collect(),
        }
    }
}

/// Fetch the current draft.
#[utoipa::path(
    get,
    path = "/api/v1/uploads",
    responses(
        (status = 200, description = "Current draft", body = DraftView),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["uploads"],
    operation_id = "getDraft"
)]
#[get("/uploads")]
pub async fn get_draft(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<DraftView>> {
    let user = session.require_user_id()?;
    Ok(web::Json(state.uploads.draft(&user).await?))
}

/// Stage a file into the draft.
#[utoipa::path(
    post,
    path = "/api/v1/uploads",
    params(("filename" = String, Query, description = "Original filename")),
    request_body(content = Vec<u8>, description = "Raw image bytes"),
    responses(
        (status = 200, description = "Updated draft", body = DraftView),
        (status = 400, description = "Unsupported file type", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 409, description = "Submit in flight", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["uploads"],
    operation_id = "stageFile"
)]
#[post("/uploads")]
pub async fn stage_file(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<StageQuery>,
    request: HttpRequest,
    body: web::Bytes,
) -> ApiResult<web::Json<DraftView>> {
    let user = session.require_user_id()?;
    let content_type = request
        .headers()
        .get(actix_web::http::header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok());

    let draft = state
        .uploads
        .stage(&user, &query.filename, content_type, body.to_vec())
        .await?;
    Ok(web::Json(draft))
}

/// Remove a staged file from the draft.
#[utoipa::path(
    delete,
    path = "/api/v1/uploads/{id}",
    params(("id" = String, Path, description = "Staged file id")),
    responses(
        (status = 200, description = "Updated draft", body = DraftView),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "No such staged file", body = Error),
        (status = 409, description = "Submit in flight", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["uploads"],
    operation_id = "removeStagedFile"
)]
#[delete("/uploads/{id}")]
pub async fn remove_staged_file(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<DraftView>> {
    let user = session.require_user_id()?;
    let id = StagedFileId::from_raw(path.into_inner());
    Ok(web::Json(state.uploads.remove(&user, &id).await?))
}

/// Replace the caption shared by the batch.
#[utoipa::path(
    put,
    path = "/api/v1/uploads/caption",
    request_body = CaptionBody,
    responses(
        (status = 200, description = "Updated draft", body = DraftView),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 409, description = "Submit in flight", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["uploads"],
    operation_id = "setCaption"
)]
#[put("/uploads/caption")]
pub async fn set_caption(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CaptionBody>,
) -> ApiResult<web::Json<DraftView>> {
    let user = session.require_user_id()?;
    let draft = state
        .uploads
        .set_caption(&user, payload.into_inner().caption)
        .await?;
    Ok(web::Json(draft))
}

/// Submit the draft as one all-or-nothing batch.
#[utoipa::path(
    post,
    path = "/api/v1/uploads/submit",
    responses(
        (status = 200, description = "Photos created", body = SubmitResponse),
        (status = 400, description = "Nothing staged", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 409, description = "Submit already in flight", body = Error),
        (status = 503, description = "Storage unavailable; draft retained", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["uploads"],
    operation_id = "submitDraft"
)]
#[post("/uploads/submit")]
pub async fn submit_draft(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<SubmitResponse>> {
    let user = session.require_user_id()?;
    let outcome = state.uploads.submit(&user).await?;
    Ok(web::Json(SubmitResponse::from(outcome)))
}
