use crate::application::{to_records, PlotSweepUseCase, Record, SpreadsheetIngestUseCase};
use crate::domain::error::{AppError, Result};
use crate::infrastructure::artifact_store::ArtifactStore;
use crate::infrastructure::config::ServerConfig;
use crate::infrastructure::render::PngChartRenderer;
use actix_cors::Cors;
use actix_multipart::form::{bytes::Bytes, MultipartForm, MultipartFormConfig};
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::http::StatusCode;
use actix_web::{
    dev::Server, get, post, web, App, HttpResponse, HttpServer, Responder, ResponseError,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

const ARCHIVE_FILE_NAME: &str = "all_plots.zip";

pub struct HttpState {
    pub config: ServerConfig,
    pub store: Arc<ArtifactStore>,
    pub ingest: SpreadsheetIngestUseCase,
    pub plot_sweep: PlotSweepUseCase,
}

impl HttpState {
    pub fn new(config: ServerConfig, store: Arc<ArtifactStore>) -> Self {
        let renderer = Arc::new(PngChartRenderer::new().with_scale(config.plot_scale));
        let plot_sweep = PlotSweepUseCase::new(renderer, store.clone());
        Self {
            config,
            store,
            ingest: SpreadsheetIngestUseCase::new(),
            plot_sweep,
        }
    }
}

// ============================================================
// ERRORS
// ============================================================

/// Error response with a `{"detail": ...}` JSON body
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    detail: String,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    detail: &'a str,
}

impl ApiError {
    pub fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        let detail = detail.into();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), %detail, "Request failed");
        } else {
            tracing::warn!(status = status.as_u16(), %detail, "Request rejected");
        }
        Self { status, detail }
    }

    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, detail)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.detail)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        self.status
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status).json(ErrorBody {
            detail: &self.detail,
        })
    }
}

fn upload_error(err: AppError) -> ApiError {
    match err {
        AppError::InvalidFileFormat => ApiError::bad_request(err.to_string()),
        AppError::ParseError(_)
        | AppError::NoNumericColumns
        | AppError::RenderError(_)
        | AppError::NotFound(_)
        | AppError::ValidationError(_)
        | AppError::IoError(_)
        | AppError::Internal(_) => ApiError::bad_request(format!(
            "An error occurred while processing the file: {}",
            err
        )),
    }
}

fn plots_error(err: AppError) -> ApiError {
    match err {
        AppError::InvalidFileFormat => ApiError::bad_request(err.to_string()),
        AppError::ParseError(_)
        | AppError::NoNumericColumns
        | AppError::RenderError(_)
        | AppError::NotFound(_)
        | AppError::ValidationError(_)
        | AppError::IoError(_)
        | AppError::Internal(_) => ApiError::bad_request(format!(
            "An error occurred while creating plots: {}",
            err
        )),
    }
}

fn download_plot_error(err: AppError) -> ApiError {
    match err {
        AppError::NotFound(_) => ApiError::new(StatusCode::NOT_FOUND, "Plot not found"),
        AppError::InvalidFileFormat
        | AppError::ParseError(_)
        | AppError::NoNumericColumns
        | AppError::RenderError(_)
        | AppError::ValidationError(_)
        | AppError::IoError(_)
        | AppError::Internal(_) => {
            ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
    }
}

fn download_all_error(err: AppError) -> ApiError {
    ApiError::new(
        StatusCode::INTERNAL_SERVER_ERROR,
        format!("An error occurred while creating the zip file: {}", err),
    )
}

/// Run parsing, rendering and file I/O off the async workers.
async fn run_blocking<F, T>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    web::block(f)
        .await
        .map_err(|e| AppError::Internal(format!("Blocking task failed: {}", e)))?
}

// ============================================================
// HANDLERS
// ============================================================

#[derive(MultipartForm)]
pub struct UploadForm {
    pub file: Bytes,
}

impl UploadForm {
    fn into_parts(self) -> (String, Vec<u8>) {
        let file_name = self.file.file_name.unwrap_or_default();
        (file_name, self.file.data.to_vec())
    }
}

#[derive(Serialize)]
pub struct UploadResponse<'a> {
    pub message: &'static str,
    pub num_rows: usize,
    pub data: Vec<Record<'a>>,
}

#[derive(Serialize, Deserialize)]
pub struct PlotsResponse {
    pub message: String,
    pub plots: Vec<String>,
    pub download_all: String,
}

#[derive(Deserialize)]
pub struct PlotQuery {
    pub plot_name: String,
}

#[post("/upload/")]
async fn upload(
    data: web::Data<HttpState>,
    MultipartForm(form): MultipartForm<UploadForm>,
) -> std::result::Result<HttpResponse, ApiError> {
    let (file_name, bytes) = form.into_parts();
    tracing::info!(file = %file_name, bytes = bytes.len(), "Upload received");

    let ingest = data.ingest.clone();
    let table = run_blocking(move || ingest.execute(&file_name, &bytes))
        .await
        .map_err(upload_error)?;

    Ok(HttpResponse::Ok().json(UploadResponse {
        message: "File processed successfully",
        num_rows: table.num_rows(),
        data: to_records(&table),
    }))
}

#[post("/generate-plots/")]
async fn generate_plots(
    data: web::Data<HttpState>,
    MultipartForm(form): MultipartForm<UploadForm>,
) -> std::result::Result<HttpResponse, ApiError> {
    let (file_name, bytes) = form.into_parts();
    tracing::info!(file = %file_name, bytes = bytes.len(), "Plot request received");

    let ingest = data.ingest.clone();
    let sweep = data.plot_sweep.clone();
    let names = run_blocking(move || {
        let table = ingest.execute(&file_name, &bytes)?;
        sweep.execute(&table)
    })
    .await
    .map_err(plots_error)?;

    Ok(HttpResponse::Ok().json(PlotsResponse {
        message: "Plots generated successfully".to_string(),
        plots: names.iter().map(|n| data.config.plot_url(n)).collect(),
        download_all: data.config.download_all_url(),
    }))
}

#[get("/download-plot/")]
async fn download_plot(
    data: web::Data<HttpState>,
    query: web::Query<PlotQuery>,
) -> std::result::Result<HttpResponse, ApiError> {
    let name = query.into_inner().plot_name;
    let store = data.store.clone();
    let lookup = name.clone();
    let bytes = run_blocking(move || store.get(&lookup))
        .await
        .map_err(download_plot_error)?;

    Ok(HttpResponse::Ok()
        .content_type("image/png")
        .insert_header(attachment(name))
        .body(bytes))
}

#[get("/download-all-plots/")]
async fn download_all_plots(data: web::Data<HttpState>) -> impl Responder {
    let store = data.store.clone();
    match run_blocking(move || store.archive_all()).await {
        Ok(bytes) => {
            tracing::info!(bytes = bytes.len(), "Archive built");
            HttpResponse::Ok()
                .content_type("application/zip")
                .insert_header(attachment(ARCHIVE_FILE_NAME.to_string()))
                .body(bytes)
        }
        Err(e) => download_all_error(e).error_response(),
    }
}

fn attachment(file_name: String) -> ContentDisposition {
    ContentDisposition {
        disposition: DispositionType::Attachment,
        parameters: vec![DispositionParam::Filename(file_name)],
    }
}

// ============================================================
// SERVER
// ============================================================

fn multipart_config(limit: usize) -> MultipartFormConfig {
    MultipartFormConfig::default()
        .total_limit(limit)
        .memory_limit(limit)
        .error_handler(|err, _req| ApiError::bad_request(err.to_string()).into())
}

fn query_config() -> web::QueryConfig {
    web::QueryConfig::default()
        .error_handler(|err, _req| ApiError::bad_request(err.to_string()).into())
}

/// Register state, extractor limits and every route.
pub fn configure_app(cfg: &mut web::ServiceConfig, state: web::Data<HttpState>) {
    let limit = state.config.max_upload_bytes;
    cfg.app_data(state)
        .app_data(multipart_config(limit))
        .app_data(query_config())
        .service(upload)
        .service(generate_plots)
        .service(download_plot)
        .service(download_all_plots);
}

pub fn start_server(state: web::Data<HttpState>) -> std::io::Result<Server> {
    let bind = state.config.bind_addr();
    let cors_permissive = state.config.cors_permissive;

    let server = HttpServer::new(move || {
        let cors = if cors_permissive {
            Cors::permissive()
        } else {
            Cors::default()
        };
        let state = state.clone();
        App::new()
            .wrap(cors)
            .configure(move |cfg| configure_app(cfg, state))
    })
    .bind(bind)?
    .run();

    Ok(server)
}
