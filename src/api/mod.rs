use axum::{
    Router,
    extract::{
        Json, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::core::{PersonalInputs, ProjectionEngine, ProjectionError};
use crate::render::{Dashboard, RenderError, build_dashboard};

const INDEX_HTML: &str = include_str!("../../web/index.html");
const STYLES_CSS: &str = include_str!("../../web/styles.css");
const APP_JS: &str = include_str!("../../web/app.js");

/// Shared read-only state. Each request builds its own tables, so nothing
/// mutable is shared between sessions.
type AppState = Arc<ProjectionEngine>;

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ForecastPayload {
    income: Option<f64>,
    housing: Option<f64>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

pub fn app_router(engine: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/index.html", get(index_handler))
        .route("/styles.css", get(styles_handler))
        .route("/app.js", get(app_js_handler))
        .route(
            "/api/forecast",
            get(forecast_get_handler).post(forecast_post_handler),
        )
        .fallback(not_found_handler)
        .with_state(engine)
}

pub async fn run_http_server(engine: ProjectionEngine, port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = app_router(Arc::new(engine));

    let listener = TcpListener::bind(addr).await?;
    tracing::info!("forecast dashboard listening on http://{addr}");
    tracing::info!("local access: http://127.0.0.1:{port}/");

    axum::serve(listener, app).await
}

async fn index_handler() -> impl IntoResponse {
    with_cache_control(Html(INDEX_HTML))
}

async fn styles_handler() -> impl IntoResponse {
    with_cache_control((
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        STYLES_CSS,
    ))
}

async fn app_js_handler() -> impl IntoResponse {
    with_cache_control((
        [(
            header::CONTENT_TYPE,
            "application/javascript; charset=utf-8",
        )],
        APP_JS,
    ))
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn forecast_get_handler(
    State(engine): State<AppState>,
    query: Result<Query<ForecastPayload>, QueryRejection>,
) -> Response {
    match query {
        Ok(Query(payload)) => forecast_handler_impl(&engine, payload),
        Err(rejection) => rejected_payload_response(rejection.body_text()),
    }
}

async fn forecast_post_handler(
    State(engine): State<AppState>,
    body: Result<Json<ForecastPayload>, JsonRejection>,
) -> Response {
    match body {
        Ok(Json(payload)) => forecast_handler_impl(&engine, payload),
        Err(rejection) => rejected_payload_response(rejection.body_text()),
    }
}

fn rejected_payload_response(msg: String) -> Response {
    tracing::warn!(error = %msg, "rejected forecast payload");
    error_response(StatusCode::BAD_REQUEST, &msg)
}

fn forecast_handler_impl(engine: &ProjectionEngine, payload: ForecastPayload) -> Response {
    let inputs = inputs_from_payload(payload);
    tracing::debug!(
        income = inputs.income,
        housing = inputs.housing,
        "recomputing forecast"
    );
    match build_forecast(engine, inputs) {
        Ok(dashboard) => json_response(StatusCode::OK, dashboard),
        Err((status, msg)) => error_response(status, &msg),
    }
}

fn inputs_from_payload(payload: ForecastPayload) -> PersonalInputs {
    let mut inputs = PersonalInputs::default();
    if let Some(v) = payload.income {
        inputs.income = v;
    }
    if let Some(v) = payload.housing {
        inputs.housing = v;
    }
    inputs
}

fn build_forecast(
    engine: &ProjectionEngine,
    inputs: PersonalInputs,
) -> Result<Dashboard, (StatusCode, String)> {
    build_dashboard(engine, inputs).map_err(|err| {
        let status = match &err {
            RenderError::Projection(
                ProjectionError::InvalidInput { .. } | ProjectionError::Overflow { .. },
            ) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status == StatusCode::BAD_REQUEST {
            tracing::warn!(error = %err, "rejected forecast input");
        } else {
            tracing::error!(error = %err, "forecast failed");
        }
        (status, err.to_string())
    })
}

fn with_cache_control<R: IntoResponse>(response: R) -> Response {
    let mut response = response.into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-store"),
    );
    response
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    with_cache_control((status, Json(body)))
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

#[cfg(test)]
fn inputs_from_json(json: &str) -> Result<PersonalInputs, String> {
    let payload = serde_json::from_str::<ForecastPayload>(json)
        .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
    Ok(inputs_from_payload(payload))
}
