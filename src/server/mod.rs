//! HTTP front end: JSON in, base64 PNG out.

mod handlers;
mod icon_cache;

pub use handlers::{ErrorBody, JsonReply};
pub use icon_cache::IconCache;

use anyhow::Context;
use serde_json::Value;
use std::convert::Infallible;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use warp::http::StatusCode;
use warp::{Filter, Rejection, Reply};

use crate::config::{Config, ServerSettings};
use crate::render::Renderer;

/// Shared by every request.
#[derive(Clone)]
pub struct AppState {
    pub renderer: Arc<Renderer>,
    pub icons: Arc<IconCache>,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self {
            renderer: Arc::new(Renderer::new(config)),
            icons: Arc::new(IconCache::new(config.render.icon_dir.clone())),
        }
    }
}

fn with_state(state: AppState) -> impl Filter<Extract = (AppState,), Error = Infallible> + Clone {
    warp::any().map(move || state.clone())
}

fn json_body(limit: u64) -> impl Filter<Extract = (Value,), Error = Rejection> + Clone {
    warp::body::content_length_limit(limit).and(warp::body::json())
}

pub fn routes(
    state: AppState,
    body_limit: u64,
) -> impl Filter<Extract = (impl Reply,), Error = Infallible> + Clone {
    let health = warp::path!("health")
        .and(warp::get())
        .and_then(handlers::health);

    let render_swot = warp::path!("render-swot")
        .and(warp::post())
        .and(json_body(body_limit))
        .and(with_state(state.clone()))
        .and_then(handlers::render_swot);

    let render_bmc = warp::path!("render-bmc")
        .and(warp::post())
        .and(json_body(body_limit))
        .and(with_state(state.clone()))
        .and_then(handlers::render_bmc);

    let render_matrix = warp::path!("render-matrix")
        .and(warp::post())
        .and(json_body(body_limit))
        .and(with_state(state))
        .and_then(handlers::render_matrix);

    let debug_swot = warp::path!("test-parsing")
        .or(warp::path!("debug-swot"))
        .unify()
        .and(warp::post())
        .and(json_body(body_limit))
        .and_then(handlers::debug_swot);

    let debug_matrix = warp::path!("debug-matrix")
        .and(warp::post())
        .and(json_body(body_limit))
        .and_then(handlers::debug_matrix);

    health
        .or(render_swot)
        .or(render_bmc)
        .or(render_matrix)
        .or(debug_swot)
        .or(debug_matrix)
        .recover(handle_rejection)
}

async fn handle_rejection(err: Rejection) -> Result<JsonReply, Infallible> {
    let (status, message) = if err.is_not_found() {
        (StatusCode::NOT_FOUND, "route inconnue".to_string())
    } else if let Some(cause) = err.find::<warp::filters::body::BodyDeserializeError>() {
        (StatusCode::BAD_REQUEST, format!("JSON invalide: {cause}"))
    } else if err.find::<warp::reject::PayloadTooLarge>().is_some() {
        (StatusCode::PAYLOAD_TOO_LARGE, "corps de requête trop volumineux".to_string())
    } else if err.find::<warp::reject::LengthRequired>().is_some() {
        (StatusCode::LENGTH_REQUIRED, "Content-Length requis".to_string())
    } else if err.find::<warp::reject::UnsupportedMediaType>().is_some() {
        (StatusCode::UNSUPPORTED_MEDIA_TYPE, "JSON attendu".to_string())
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        (StatusCode::METHOD_NOT_ALLOWED, "méthode non autorisée".to_string())
    } else {
        tracing::error!(?err, "unhandled rejection");
        (StatusCode::INTERNAL_SERVER_ERROR, "erreur interne".to_string())
    };
    Ok(handlers::error_reply(status, message, None))
}

pub fn bind_address(settings: &ServerSettings) -> anyhow::Result<SocketAddr> {
    let ip: IpAddr = settings
        .host
        .parse()
        .with_context(|| format!("invalid listen host {:?}", settings.host))?;
    Ok(SocketAddr::new(ip, settings.port))
}

/// Serves until the process is stopped.
pub async fn serve(config: Config, settings: ServerSettings) -> anyhow::Result<()> {
    let addr = bind_address(&settings)?;
    let state = AppState::new(&config);
    let routes = routes(state, settings.body_limit_bytes).with(warp::trace::request());
    tracing::info!(%addr, "renderer listening");
    warp::serve(routes).run(addr).await;
    Ok(())
}
