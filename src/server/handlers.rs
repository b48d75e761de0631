use serde::Serialize;
use serde_json::{Value, json};
use std::convert::Infallible;
use std::sync::Arc;
use warp::http::StatusCode;
use warp::reply::{Json, WithStatus};

use super::AppState;
use crate::canvas_input::canvas_from_value;
use crate::error::RenderError;
use crate::icons::IconSet;
use crate::ir::{DocumentKind, ParsedDocument};
use crate::parser::{parse_matrix, parse_swot};

pub type JsonReply = WithStatus<Json>;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

pub fn error_reply(
    status: StatusCode,
    error: impl Into<String>,
    details: Option<String>,
) -> JsonReply {
    let body = ErrorBody {
        error: error.into(),
        details,
    };
    warp::reply::with_status(warp::reply::json(&body), status)
}

fn ok_reply(body: &Value) -> JsonReply {
    warp::reply::with_status(warp::reply::json(body), StatusCode::OK)
}

/// Non-blank string field of the request body.
fn text_field<'a>(body: &'a Value, name: &str) -> Option<&'a str> {
    body.get(name)
        .and_then(Value::as_str)
        .filter(|text| !text.trim().is_empty())
}

pub async fn health() -> Result<JsonReply, Infallible> {
    Ok(ok_reply(&json!({ "status": "ok" })))
}

pub async fn render_swot(body: Value, state: AppState) -> Result<JsonReply, Infallible> {
    let Some(text) = text_field(&body, "swotText") else {
        tracing::debug!("render-swot without swotText");
        let reply = error_reply(StatusCode::BAD_REQUEST, "swotText manquant", None);
        return Ok(reply);
    };
    let doc = parse_swot(text);
    Ok(render_document(&state, doc).await)
}

pub async fn render_matrix(body: Value, state: AppState) -> Result<JsonReply, Infallible> {
    let Some(text) = text_field(&body, "matrixText") else {
        tracing::debug!("render-matrix without matrixText");
        let reply = error_reply(StatusCode::BAD_REQUEST, "matrixText manquant", None);
        return Ok(reply);
    };
    let doc = parse_matrix(text);
    Ok(render_document(&state, doc).await)
}

pub async fn render_bmc(body: Value, state: AppState) -> Result<JsonReply, Infallible> {
    let doc = match canvas_from_value(body.get("bmc")) {
        Ok(doc) => doc,
        Err(err) => {
            tracing::debug!(error = %err, "render-bmc rejected");
            return Ok(error_reply(StatusCode::BAD_REQUEST, err.to_string(), None));
        }
    };
    Ok(render_document(&state, doc).await)
}

/// Parsed SWOT sections, for checking how text is segmented.
pub async fn debug_swot(body: Value) -> Result<JsonReply, Infallible> {
    let doc = parse_swot(body.get("swotText").and_then(Value::as_str).unwrap_or(""));
    Ok(ok_reply(&parsed_body(&doc)))
}

pub async fn debug_matrix(body: Value) -> Result<JsonReply, Infallible> {
    let doc = parse_matrix(body.get("matrixText").and_then(Value::as_str).unwrap_or(""));
    Ok(ok_reply(&parsed_body(&doc)))
}

fn parsed_body(doc: &ParsedDocument) -> Value {
    let mut body = serde_json::Map::new();
    body.insert("success".to_string(), Value::Bool(true));
    for (key, bullets) in doc.iter() {
        body.insert(key.as_str().to_string(), json!(bullets));
    }
    Value::Object(body)
}

async fn render_document(state: &AppState, doc: ParsedDocument) -> JsonReply {
    let kind = doc.kind();
    let icons = if kind == DocumentKind::BusinessModelCanvas {
        match state.icons.get().await {
            Ok(icons) => icons,
            Err(err) => return internal_error(kind, &err),
        }
    } else {
        Arc::new(IconSet::empty())
    };

    let renderer = Arc::clone(&state.renderer);
    let result = tokio::task::spawn_blocking(move || renderer.render_png_base64(&doc, &icons))
        .await
        .unwrap_or_else(|err| Err(RenderError::Join(err.to_string())));

    match result {
        Ok(png_base64) => ok_reply(&json!({ "success": true, "png_base64": png_base64 })),
        Err(err) => internal_error(kind, &err),
    }
}

fn internal_error(kind: DocumentKind, err: &RenderError) -> JsonReply {
    tracing::error!(kind = kind.as_str(), error = %err, "render failed");
    let details = std::error::Error::source(err).map(|source| source.to_string());
    error_reply(StatusCode::INTERNAL_SERVER_ERROR, err.to_string(), details)
}
