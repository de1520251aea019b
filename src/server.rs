use crate::app::CompanyService;
use crate::common::constants::UPLOAD_FIELD;
use crate::common::error::CompanyError;
use crate::config::ServerConfig;
use axum::{
    extract::{multipart::MultipartError, DefaultBodyLimit, Multipart, Path, State},
    http::{header::CONTENT_TYPE, Method, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use hyper::Server;
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Error body shape the web client expects: `{"erro": "..."}`
struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl From<CompanyError> for ApiError {
    fn from(err: CompanyError) -> Self {
        match err {
            CompanyError::UnsupportedFormat { .. } => {
                ApiError::new(StatusCode::BAD_REQUEST, err.to_string())
            }
            // Cause is logged by the service; clients get a generic message
            CompanyError::Decode { format, .. } => ApiError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to process {} file", format),
            ),
            CompanyError::NotFound(_) => ApiError::new(StatusCode::NOT_FOUND, "Company not found"),
            _ => ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "erro": self.message }))).into_response()
    }
}

/// Map a multipart read failure. Chunked bodies that trip the upload limit
/// surface here rather than as an early 413 from the limit layer.
fn multipart_error(err: MultipartError, message: &'static str) -> ApiError {
    let status = err.status();
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        warn!("Upload exceeds the configured size limit");
        return ApiError::new(status, "Uploaded file is too large");
    }
    warn!("{}: {}", message, err.body_text());
    ApiError::new(StatusCode::BAD_REQUEST, message)
}

/// Health check endpoint
async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "service": "cnpj-sheets",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Accept a multipart upload and ingest the `planilha` field
async fn upload(
    State(service): State<Arc<CompanyService>>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let mut file: Option<(String, Vec<u8>)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, "Malformed upload request"))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| multipart_error(e, "Failed to read uploaded file"))?;
        file = Some((filename, bytes.to_vec()));
    }

    let (filename, bytes) =
        file.ok_or_else(|| ApiError::new(StatusCode::BAD_REQUEST, "No file uploaded"))?;

    let summary = service.ingest(bytes, &filename).await?;
    Ok(Json(json!({
        "sucesso": true,
        "mensagem": format!("{} companies processed successfully", summary.count),
        "total": summary.count,
    })))
}

async fn list_companies(State(service): State<Arc<CompanyService>>) -> impl IntoResponse {
    Json(service.list().await)
}

async fn clear_companies(State(service): State<Arc<CompanyService>>) -> impl IntoResponse {
    service.clear().await;
    Json(json!({ "sucesso": true, "mensagem": "Data cleared successfully" }))
}

async fn get_company(
    State(service): State<Arc<CompanyService>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(service.get_by_id(&id).await?))
}

/// Create the HTTP router with all API routes
pub fn create_server(service: Arc<CompanyService>, config: &ServerConfig) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE]);

    let router = Router::new()
        .route("/health", get(health))
        .route("/api/upload", post(upload))
        .route("/api/empresas", get(list_companies).delete(clear_companies))
        .route("/api/empresa/:id", get(get_company));

    // Serve the pre-built web client when one is configured
    let router = match &config.static_dir {
        Some(dir) => router.fallback_service(ServeDir::new(dir)),
        None => router,
    };

    router
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(config.max_upload_bytes))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(service)
}

/// Start the HTTP server and run until Ctrl-C
pub async fn start_server(
    service: Arc<CompanyService>,
    config: &ServerConfig,
) -> anyhow::Result<()> {
    let app = create_server(service, config);
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    info!("HTTP server running on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    Server::bind(&addr)
        .serve(app.into_make_service())
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown signal received");
        })
        .await?;

    Ok(())
}
