//! Resume Generation: the request orchestrator.
//!
//! Flow: extract uploaded file (optional) → validate inputs → build prompt →
//!       provider call → normalize → return.
//!
//! Nothing is persisted. Input and extraction problems surface as 400-class errors.
//! Provider selection is resolved only once the inputs are known to be usable; it and
//! anything after it fail as 500-class errors.

use bytes::Bytes;
use tracing::{debug, info};

use crate::errors::AppError;
use crate::extraction;
use crate::generation::normalizer::normalize;
use crate::generation::prompts::build_prompt;
use crate::llm_client::{LlmError, Provider, ProviderRegistry};
use crate::models::resume::ResumeDocument;

/// Heading placed above text pulled from an uploaded résumé.
const EXTRACTED_HEADING: &str = "\n\nEXTRACTED RESUME DATA:\n";

/// A file received with the request, held in memory.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub bytes: Bytes,
    pub mime_type: String,
    pub file_name: Option<String>,
}

/// Everything one generation needs. Created per request and dropped with it.
#[derive(Debug, Clone, Default)]
pub struct GenerationRequest {
    pub user_details: String,
    pub job_description: String,
    pub file: Option<UploadedFile>,
    /// Raw `modelProvider` selector; `None` or blank means the primary provider.
    pub model_provider: Option<String>,
}

/// Runs the generation pipeline for one request.
///
/// Steps:
/// 1. context = user details
/// 2. uploaded file → extracted text appended under `EXTRACTED RESUME DATA:`
/// 3. no details and no file → `MissingUserData`
/// 4. no job description → `MissingJobDescription`
/// 5. resolve the provider selector (unknown name → `InvalidProvider`)
/// 6. build_prompt()
/// 7. providers.generate() (unimplemented provider → `ProviderNotSupported`)
/// 8. normalize()
pub async fn generate_resume(
    providers: &ProviderRegistry,
    request: GenerationRequest,
) -> Result<ResumeDocument, AppError> {
    let GenerationRequest {
        user_details,
        job_description,
        file,
        model_provider,
    } = request;

    let mut context = user_details;
    let has_file = file.is_some();

    if let Some(file) = file {
        info!(
            "Extracting text from upload {:?} ({}, {} bytes)",
            file.file_name.as_deref().unwrap_or("<unnamed>"),
            file.mime_type,
            file.bytes.len()
        );
        let extracted = extract_upload(file).await?;
        context.push_str(EXTRACTED_HEADING);
        context.push_str(&extracted);
    }

    if context.trim().is_empty() && !has_file {
        return Err(AppError::MissingUserData);
    }

    if job_description.trim().is_empty() {
        return Err(AppError::MissingJobDescription);
    }

    let provider = Provider::from_selector(model_provider.as_deref())
        .map_err(|e| AppError::InvalidProvider(e.0))?;

    let prompt = build_prompt(&context, &job_description);
    info!("Generating resume with {provider} provider");

    let raw = providers
        .generate(&prompt, &provider)
        .await
        .map_err(|e| match e {
            LlmError::NotSupported(name) => AppError::ProviderNotSupported(name),
            other => AppError::GenerationFailed(format!("{provider} provider call failed: {other}")),
        })?;

    let document = normalize(&raw).map_err(|e| {
        debug!("Rejected model output: {raw}");
        AppError::GenerationFailed(e.to_string())
    })?;

    info!(
        "Resume generated: {} skills, {} experience entries, {} projects",
        document.skills.len(),
        document.experience.len(),
        document.projects.len()
    );
    Ok(document)
}

/// Runs the CPU-bound extraction on the blocking pool.
async fn extract_upload(file: UploadedFile) -> Result<String, AppError> {
    let UploadedFile {
        bytes, mime_type, ..
    } = file;

    tokio::task::spawn_blocking(move || extraction::extract(&bytes, &mime_type))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("extraction task failed: {e}")))?
        .map_err(AppError::from)
}
