//! Feed API handler.
//!
//! ```text
//! GET /api/v1/photos
//! ```
//!
//! Returns the whole gallery, newest first. Each entry carries the author
//! attribution and a pre-rendered relative-time label so the browser does
//! not need its own clock logic.

use actix_web::{get, web};
use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{Error, FeedPhoto};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Author attribution for one feed entry.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeedAuthorDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    pub avatar_color: String,
    /// Uppercase initial for the avatar badge, `?` for unresolved authors.
    pub initial: String,
}

/// One feed entry.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeedPhotoDto {
    pub id: String,
    pub image_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Relative age, e.g. `Just now`, `5m ago`, `3d ago`, `Jun 12`.
    pub posted_label: String,
    pub author: FeedAuthorDto,
}

impl FeedPhotoDto {
    fn from_entry(entry: &FeedPhoto, now: DateTime<Utc>) -> Self {
        let photo = entry.photo();
        let author = entry.author();
        Self {
            id: photo.id().to_string(),
            image_url: photo.image_url().to_string(),
            caption: photo.caption().map(ToString::to_string),
            created_at: photo.created_at(),
            posted_label: posted_label(photo.created_at(), now),
            author: FeedAuthorDto {
                display_name: author.display_name().map(ToString::to_string),
                avatar_color: author.avatar_color().to_string(),
                initial: author.initial().to_string(),
            },
        }
    }
}

const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Render a relative age label.
///
/// Under a minute reads `Just now`; then minutes, hours and days; anything
/// older than a week shows the calendar date, e.g. `Jun 12`.
pub fn posted_label(created_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    const MINUTE: i64 = 60;
    const HOUR: i64 = 60 * MINUTE;
    const DAY: i64 = 24 * HOUR;
    const WEEK: i64 = 7 * DAY;

    let secs = now.signed_duration_since(created_at).num_seconds().max(0);
    if secs < MINUTE {
        "Just now".to_owned()
    } else if secs < HOUR {
        format!("{}m ago", secs / MINUTE)
    } else if secs < DAY {
        format!("{}h ago", secs / HOUR)
    } else if secs < WEEK {
        format!("{}d ago", secs / DAY)
    } else {
        let month = MONTH_ABBREVIATIONS
            .get(created_at.month0() as usize)
            .copied()
            .unwrap_or("???");
        format!("{} {}", month, created_at.day())
    }
}

/// List the gallery feed.
#[utoipa::path(
    get,
    path = "/api/v1/photos",
    responses(
        (status = 200, description = "Feed entries, newest first", body = [FeedPhotoDto]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["feed"],
    operation_id = "listPhotos"
)]
#[get("/photos")]
pub async fn list_photos(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<FeedPhotoDto>>> {
    session.require_user_id()?;
    let feed = state.feed.feed().await?;
    let now = Utc::now();
    Ok(web::Json(
        feed.iter()
            .map(|entry| FeedPhotoDto::from_entry(entry, now))
            .collect(),
    ))
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test, web};
    use chrono::{Duration, TimeZone};
    use rstest::rstest;
    use serde_json::Value;
    use std::sync::Arc;

    use crate::inbound::http::auth::{SignUpBody, sign_up};
    use crate::inbound::http::test_utils;

    #[rstest]
    #[case(0, "Just now")]
    #[case(59, "Just now")]
    #[case(60, "1m ago")]
    #[case(59 * 60, "59m ago")]
    #[case(60 * 60, "1h ago")]
    #[case(23 * 60 * 60, "23h ago")]
    #[case(24 * 60 * 60, "1d ago")]
    #[case(6 * 24 * 60 * 60, "6d ago")]
    fn labels_relative_ages(#[case] elapsed_secs: i64, #[case] expected: &str) {
        let created = Utc.with_ymd_and_hms(2026, 6, 12, 12, 0, 0).single().expect("valid date");
        let now = created + Duration::seconds(elapsed_secs);
        assert_eq!(posted_label(created, now), expected);
    }

    #[rstest]
    fn labels_older_photos_with_the_calendar_date() {
        let created = Utc.with_ymd_and_hms(2026, 6, 12, 12, 0, 0).single().expect("valid date");
        let now = created + Duration::days(8);
        assert_eq!(posted_label(created, now), "Jun 12");
    }

    #[rstest]
    fn clock_skew_never_produces_negative_ages() {
        let created = Utc.with_ymd_and_hms(2026, 6, 12, 12, 0, 0).single().expect("valid date");
        let now = created - Duration::seconds(30);
        assert_eq!(posted_label(created, now), "Just now");
    }

    fn test_app(
        state: crate::inbound::http::state::HttpState,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(web::Data::new(state))
            .wrap(test_utils::test_session_middleware())
            .service(web::scope("/api/v1").service(sign_up).service(list_photos))
    }

    #[actix_web::test]
    async fn rejects_without_session() {
        let app = actix_test::init_service(test_app(test_utils::memory_http_state())).await;
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/photos")
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn returns_submitted_photos_in_camel_case() {
        let state = test_utils::memory_http_state();
        let uploads = Arc::clone(&state.uploads);
        let app = actix_test::init_service(test_app(state)).await;

        let signed_up = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/signup")
                .set_json(SignUpBody {
                    email: "alice@example.com".into(),
                    password: "secret".into(),
                    display_name: "Alice".into(),
                })
                .to_request(),
        )
        .await;
        assert!(signed_up.status().is_success());
        let cookie = signed_up
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie")
            .into_owned();
        let body: Value =
            serde_json::from_slice(&actix_test::read_body(signed_up).await).expect("JSON body");
        let user_id = body
            .get("user")
            .and_then(|u| u.get("id"))
            .and_then(Value::as_str)
            .expect("user id");
        let user = crate::domain::UserId::new(user_id).expect("valid id");

        uploads
            .stage(&user, "sunset.jpg", None, vec![0xff, 0xd8])
            .await
            .expect("staged");
        uploads
            .set_caption(&user, "Sunset!".into())
            .await
            .expect("caption set");
        uploads.submit(&user).await.expect("batch succeeds");

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/photos")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let value: Value =
            serde_json::from_slice(&actix_test::read_body(response).await).expect("JSON body");
        let entries = value.as_array().expect("array");
        assert_eq!(entries.len(), 1);
        let entry = &entries[0];
        assert_eq!(
            entry.get("caption").and_then(Value::as_str),
            Some("Sunset!")
        );
        assert_eq!(
            entry.get("postedLabel").and_then(Value::as_str),
            Some("Just now")
        );
        assert_eq!(
            entry
                .get("author")
                .and_then(|a| a.get("displayName"))
                .and_then(Value::as_str),
            Some("Alice")
        );
        assert_eq!(
            entry
                .get("author")
                .and_then(|a| a.get("initial"))
                .and_then(Value::as_str),
            Some("A")
        );
        assert!(entry.get("imageUrl").and_then(Value::as_str).is_some());
        assert!(entry.get("image_url").is_none());
    }
}
