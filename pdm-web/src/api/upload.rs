//! Batch upload and result download
//!
//! `POST /upload` accepts a multipart `file` field. Anything that is not a
//! usable CSV upload is sent back to the form without touching the model;
//! a processed upload redirects to its result file under `/uploads/`.

use axum::{
    body::Bytes,
    extract::{multipart::MultipartRejection, Multipart, Path, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Router,
};
use tracing::info;

use crate::api::ui::pages;
use crate::batch::BatchFlow;
use crate::error::{WebError, WebResult};
use crate::filename::{allowed_file, secure_filename};
use crate::AppState;

/// Multipart field carrying the CSV
pub const FILE_FIELD: &str = "file";

struct UploadedFile {
    file_name: String,
    bytes: Bytes,
}

/// First multipart field named `file`, if any
async fn read_file_field(multipart: &mut Multipart) -> WebResult<Option<UploadedFile>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| WebError::BadRequest(e.to_string()))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| WebError::BadRequest(e.to_string()))?;
        return Ok(Some(UploadedFile { file_name, bytes }));
    }
    Ok(None)
}

fn back_to_form(reason: &str) -> Response {
    info!("Upload rejected: {}", reason);
    Redirect::to("/upload").into_response()
}

fn upload_error(err: WebError) -> Response {
    let (status, _, message) = err.describe();
    err.log(status);
    let text = format!("Error processing file: {}", message);
    (status, Html(pages::upload_page(Some(&text)))).into_response()
}

/// GET /upload
pub async fn upload_form() -> Html<String> {
    Html(pages::upload_page(None))
}

/// POST /upload
pub async fn upload(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let mut multipart = match multipart {
        Ok(m) => m,
        Err(rejection) => return back_to_form(&rejection.body_text()),
    };

    let file = match read_file_field(&mut multipart).await {
        Ok(Some(file)) => file,
        Ok(None) => return back_to_form("no file field"),
        Err(e) => return upload_error(e),
    };

    if file.file_name.is_empty() {
        return back_to_form("empty filename");
    }
    if !allowed_file(&file.file_name) {
        return back_to_form("extension not allowed");
    }
    let safe_name = secure_filename(&file.file_name);
    if safe_name.is_empty() || !allowed_file(&safe_name) {
        return back_to_form("filename unusable after sanitizing");
    }

    let flow = BatchFlow {
        gateway: &state.failure_type,
        store: &state.uploads,
        identifier_column: state.config.identifier_column.as_deref(),
    };
    match flow.run(&safe_name, &file.bytes).await {
        Ok(job) => Redirect::to(&format!("/uploads/{}", job.output_name)).into_response(),
        Err(e) => upload_error(WebError::from(e)),
    }
}

/// GET /uploads/:filename
///
/// Serves a stored file as a download; repeated calls return the same bytes.
pub async fn download(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> WebResult<Response> {
    let bytes = state.uploads.read(&filename).await?;
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        bytes,
    )
        .into_response())
}

/// Build upload and download routes
pub fn upload_routes() -> Router<AppState> {
    Router::new()
        .route("/upload", get(upload_form).post(upload))
        .route("/uploads/:filename", get(download))
}
