use crate::dtos::UploadResponse;
use crate::error::ApiError;
use crate::services::upload_store::is_supported_image_extension;
use crate::services::{StoredUpload, UploadedImage};
use crate::startup::AppState;
use crate::utils::to_data_url;
use axum::{
    Json,
    extract::{Multipart, State},
    http::StatusCode,
    response::IntoResponse,
};
use metrics::{counter, histogram};
use std::time::Instant;

/// Form fields accepted by the upload endpoint.
#[derive(Debug, Default)]
struct UploadForm {
    question: Option<String>,
    image: Option<UploadedImage>,
}

/// Answer a question about an uploaded image.
///
/// The image lands on disk before validation runs, and the release point below
/// removes it on every path out of this handler, including the rejection ones.
pub async fn upload_image(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let form = collect_upload_form(multipart).await?;

    if let Some(image) = &form.image {
        tracing::info!(
            filename = %image.filename,
            size = image.data.len(),
            "Received image upload"
        );
    }

    let stored = match &form.image {
        Some(image) => Some(state.store.save(image).await?),
        None => None,
    };

    let result = answer_question(&state, &form, stored.as_ref()).await;

    if let Some(upload) = &stored {
        if let Err(err) = state.store.remove(upload).await {
            tracing::warn!(
                path = %upload.path.display(),
                "Failed to remove temporary upload: {}",
                err
            );
        }
    }

    counter!("image_uploads_total", "outcome" => outcome_label(&result)).increment(1);

    let answer = result?;
    Ok(Json(UploadResponse::answered(answer)))
}

/// Validate the form, encode the stored image and ask the provider.
///
/// Checks run in contract order: question presence, file presence, then file
/// type against the stored upload.
async fn answer_question(
    state: &AppState,
    form: &UploadForm,
    stored: Option<&StoredUpload>,
) -> Result<String, ApiError> {
    let question = form
        .question
        .as_deref()
        .filter(|question| !question.is_empty())
        .ok_or(ApiError::QuestionRequired)?;

    let upload = stored.ok_or(ApiError::ImageRequired)?;

    if !is_supported_image_extension(&upload.extension) {
        return Err(ApiError::InvalidFileType);
    }

    let data = state.store.read(upload).await?;
    let image_data_url = to_data_url(&upload.mime_type, &data);

    let started = Instant::now();
    let answer = state.provider.answer(question, &image_data_url).await?;
    histogram!("inference_request_duration_seconds").record(started.elapsed().as_secs_f64());

    tracing::info!(
        model = %state.config.openai.model,
        answer_len = answer.len(),
        "Answered image question"
    );

    Ok(answer)
}

/// Collect the `question` and `file` fields, ignoring anything else. A body
/// that fails to decode before its first field is treated as an empty form;
/// later decode failures and over-limit bodies propagate as multipart errors.
async fn collect_upload_form(mut multipart: Multipart) -> Result<UploadForm, ApiError> {
    let mut form = UploadForm::default();
    let mut saw_field = false;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            // A body carrying no parts at all fails to decode before the
            // first field is produced. Validation owns that case as an empty
            // form; anything else keeps the status the multipart layer
            // assigned.
            Err(err) if !saw_field && err.status() == StatusCode::BAD_REQUEST => break,
            Err(err) => return Err(err.into()),
        };
        saw_field = true;

        let name = field.name().map(|name| name.to_string());

        match name.as_deref() {
            Some("question") => {
                form.question = Some(field.text().await?);
            }
            Some("file") => {
                let filename = field.file_name().unwrap_or("unnamed").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let data = field.bytes().await?.to_vec();

                form.image = Some(UploadedImage {
                    filename,
                    content_type,
                    data,
                });
            }
            _ => {}
        }
    }

    Ok(form)
}

fn outcome_label(result: &Result<String, ApiError>) -> &'static str {
    match result {
        Ok(_) => "answered",
        Err(ApiError::QuestionRequired | ApiError::ImageRequired | ApiError::InvalidFileType) => {
            "rejected"
        }
        Err(_) => "failed",
    }
}
