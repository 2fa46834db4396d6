//! Backend entry-point: wires the REST endpoints, WebSocket entry, and
//! OpenAPI docs to the configured adapters.

use std::env;
use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};
use url::Url;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use voyage_backend::doc::ApiDoc;
use voyage_backend::domain::ports::{FeedEvents, ObjectStorage};
use voyage_backend::domain::{AccountService, FeedService, UploadService};
use voyage_backend::inbound::http::auth::{get_session, login, logout, sign_up};
use voyage_backend::inbound::http::feed::list_photos;
use voyage_backend::inbound::http::health::{HealthState, live, ready};
use voyage_backend::inbound::http::state::HttpState;
use voyage_backend::inbound::http::uploads::{
    MAX_IMAGE_BYTES, get_draft, remove_staged_file, set_caption, stage_file, submit_draft,
};
use voyage_backend::inbound::ws;
use voyage_backend::inbound::ws::state::WsState;
use voyage_backend::outbound::{
    DirObjectStorage, FeedBroadcaster, MemoryIdentityProvider, MemoryObjectStorage,
    MemoryPhotoRepository, MemoryProfileRepository,
};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let key = load_session_key()?;
    let cookie_secure = env::var("SESSION_COOKIE_SECURE")
        .map(|v| v != "0")
        .unwrap_or(true);
    let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".into());

    let storage = open_object_storage()?;
    let identities = Arc::new(MemoryIdentityProvider::new());
    let profiles = Arc::new(MemoryProfileRepository::new());
    let photos = Arc::new(MemoryPhotoRepository::new());
    let events: Arc<dyn FeedEvents> = Arc::new(FeedBroadcaster::new(64));

    let http_state = web::Data::new(HttpState::new(
        Arc::new(AccountService::new(identities, Arc::clone(&profiles) as _)),
        Arc::new(FeedService::new(Arc::clone(&photos) as _, profiles)),
        Arc::new(UploadService::new(storage, photos, Arc::clone(&events))),
    ));
    let ws_state = web::Data::new(WsState::new(events));

    let health_state = web::Data::new(HealthState::new());
    // Clone for the server factory so the readiness probe stays reachable.
    let server_health_state = health_state.clone();
    let server = HttpServer::new(move || {
        build_app(
            server_health_state.clone(),
            http_state.clone(),
            ws_state.clone(),
            key.clone(),
            cookie_secure,
        )
    })
    .bind(bind_addr)?;

    health_state.mark_ready();
    server.run().await
}

fn load_session_key() -> std::io::Result<Key> {
    let key_path =
        env::var("SESSION_KEY_FILE").unwrap_or_else(|_| "/var/run/secrets/session_key".into());
    match std::fs::read(&key_path) {
        Ok(bytes) => Ok(Key::derive_from(&bytes)),
        Err(e) => {
            let allow_dev = env::var("SESSION_ALLOW_EPHEMERAL").ok().as_deref() == Some("1");
            if cfg!(debug_assertions) || allow_dev {
                warn!(path = %key_path, error = %e, "using temporary session key (dev only)");
                Ok(Key::generate())
            } else {
                Err(std::io::Error::other(format!(
                    "failed to read session key at {key_path}: {e}"
                )))
            }
        }
    }
}

/// Open the image store.
///
/// With `STORAGE_ROOT` set, images are written under that directory and
/// `PUBLIC_BASE_URL` must point at whatever serves it (a CDN or static file
/// server). Without it, images live in process memory and vanish on
/// restart, which is only suitable for development.
fn open_object_storage() -> std::io::Result<Arc<dyn ObjectStorage>> {
    let Ok(root) = env::var("STORAGE_ROOT") else {
        warn!("STORAGE_ROOT is not set; using in-memory object storage (dev only)");
        return Ok(Arc::new(MemoryObjectStorage::new()));
    };

    let raw_base = env::var("PUBLIC_BASE_URL").map_err(|_| {
        std::io::Error::other("PUBLIC_BASE_URL must be set when STORAGE_ROOT is used")
    })?;
    let public_base = Url::parse(&raw_base)
        .map_err(|e| std::io::Error::other(format!("invalid PUBLIC_BASE_URL: {e}")))?;

    let storage = DirObjectStorage::open(&root, public_base)
        .map_err(|e| std::io::Error::other(e.to_string()))?;
    Ok(Arc::new(storage))
}

fn build_app(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    ws_state: web::Data<WsState>,
    key: Key,
    cookie_secure: bool,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let session = SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".into())
        .cookie_path("/".into())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_same_site(SameSite::Lax)
        .build();

    let api = web::scope("/api/v1")
        .wrap(session)
        .service(sign_up)
        .service(login)
        .service(logout)
        .service(get_session)
        .service(list_photos)
        .service(get_draft)
        .service(stage_file)
        .service(remove_staged_file)
        .service(set_caption)
        .service(submit_draft);

    let app = App::new()
        .app_data(web::PayloadConfig::new(MAX_IMAGE_BYTES))
        .app_data(health_state)
        .app_data(http_state)
        .app_data(ws_state)
        .service(api)
        .service(ws::ws_entry)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
    #[cfg(not(debug_assertions))]
    let app = app;

    app
}
