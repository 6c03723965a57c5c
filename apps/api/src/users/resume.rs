//! Resume upload: PDF in, plain text out for the plan prompt.
//! The original PDF is kept in S3; only the text is stored on the user.

use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;

pub const MAX_RESUME_BYTES: usize = 10 * 1024 * 1024;
/// Extracted text beyond this is dropped to keep prompts bounded.
pub const MAX_RESUME_CHARS: usize = 20_000;

const PDF_MAGIC: &[u8] = b"%PDF-";

pub fn is_pdf(bytes: &[u8]) -> bool {
    bytes.starts_with(PDF_MAGIC)
}

/// Extracts text from a PDF on the blocking pool.
///
/// Malformed PDFs can make the extractor panic; the panic is contained in the
/// blocking task and reported as an unprocessable upload.
pub async fn extract_resume_text(pdf: Bytes) -> Result<String, AppError> {
    if !is_pdf(&pdf) {
        return Err(AppError::Validation(
            "Resume must be a PDF document".to_string(),
        ));
    }

    let extracted = tokio::task::spawn_blocking(move || {
        pdf_extract::extract_text_from_mem(&pdf).map_err(|e| e.to_string())
    })
    .await
    .map_err(|e| AppError::UnprocessableEntity(format!("Could not read resume PDF: {e}")))?
    .map_err(|e| AppError::UnprocessableEntity(format!("Could not read resume PDF: {e}")))?;

    let text = normalize_resume_text(&extracted);
    if text.is_empty() {
        return Err(AppError::UnprocessableEntity(
            "Resume PDF contains no extractable text".to_string(),
        ));
    }
    Ok(text)
}

/// Collapses whitespace runs (keeping line breaks) and caps the length.
pub fn normalize_resume_text(raw: &str) -> String {
    let mut lines: Vec<String> = Vec::new();
    for line in raw.lines() {
        let line = line.split_whitespace().collect::<Vec<_>>().join(" ");
        if !line.is_empty() {
            lines.push(line);
        }
    }
    lines.join("\n").chars().take(MAX_RESUME_CHARS).collect()
}

pub fn resume_key(user_id: Uuid) -> String {
    format!("resumes/{}/{}.pdf", user_id, Uuid::new_v4())
}

/// Uploads the original PDF and returns its object key.
pub async fn upload_resume(
    s3: &aws_sdk_s3::Client,
    bucket: &str,
    user_id: Uuid,
    pdf: Bytes,
) -> Result<String, AppError> {
    let key = resume_key(user_id);
    s3.put_object()
        .bucket(bucket)
        .key(&key)
        .body(ByteStream::from(pdf))
        .content_type("application/pdf")
        .send()
        .await
        .map_err(|e| AppError::S3(format!("Resume upload failed: {e}")))?;

    info!("Uploaded resume to s3://{}/{}", bucket, key);
    Ok(key)
}
