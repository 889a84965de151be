//! Axum route handler for the generation endpoint.

use axum::extract::{Multipart, State};
use axum::Json;
use tracing::{info_span, Instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::generation::generator::{generate_resume, GenerationRequest, UploadedFile};
use crate::models::resume::ResumeDocument;
use crate::state::AppState;

const DEFAULT_UPLOAD_MIME: &str = "application/octet-stream";

/// Raw multipart fields before validation.
#[derive(Debug, Default)]
struct GenerateForm {
    job_description: Option<String>,
    user_details: Option<String>,
    model_provider: Option<String>,
    file: Option<UploadedFile>,
}

/// POST /api/generate-resume
///
/// Multipart fields: `file` (optional), `jobDescription`, `userDetails` (optional),
/// `modelProvider` (optional, defaults to the primary provider).
pub async fn handle_generate_resume(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ResumeDocument>, AppError> {
    let form = read_form(&mut multipart).await?;

    let request_id = Uuid::new_v4();
    let span = info_span!(
        "generate_resume",
        %request_id,
        provider = form.model_provider.as_deref().unwrap_or("default")
    );

    let request = GenerationRequest {
        user_details: form.user_details.unwrap_or_default(),
        job_description: form.job_description.unwrap_or_default(),
        file: form.file,
        model_provider: form.model_provider,
    };

    let document = generate_resume(&state.providers, request)
        .instrument(span)
        .await?;

    Ok(Json(document))
}

async fn read_form(multipart: &mut Multipart) -> Result<GenerateForm, AppError> {
    let mut form = GenerateForm::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let mime_type = field
                    .content_type()
                    .unwrap_or(DEFAULT_UPLOAD_MIME)
                    .to_string();
                let file_name = field.file_name().map(str::to_string);
                let bytes = field.bytes().await?;
                // Browsers send an empty part when no file was chosen.
                if !bytes.is_empty() {
                    form.file = Some(UploadedFile {
                        bytes,
                        mime_type,
                        file_name,
                    });
                }
            }
            "jobDescription" => form.job_description = Some(read_text(field).await?),
            "userDetails" => form.user_details = Some(read_text(field).await?),
            "modelProvider" => form.model_provider = Some(read_text(field).await?),
            _ => {}
        }
    }

    Ok(form)
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String, AppError> {
    Ok(field.text().await?)
}
