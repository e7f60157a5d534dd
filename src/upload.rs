// src/upload.rs

use crate::config::Config;
use crate::error::ExtractError;
use crate::fence;
use crate::normalize::{self, InvoiceData};
use crate::sniff;
use reqwest::Client;
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use std::path::Path;
use tracing::{info, warn};

/// Hard cap on upload size: 5 MiB.
pub const MAX_FILE_BYTES: usize = 5 * 1024 * 1024;

/// Pre-flight checks on the picked file. Pure: runs before any client is
/// touched, so an invalid file never reaches the wire. Returns the MIME
/// type to declare on the multipart part.
pub fn validate_upload(bytes: &[u8], path: &Path) -> Result<&'static str, ExtractError> {
    if bytes.is_empty() {
        return Err(ExtractError::NoFileProvided);
    }
    let mime = sniff::detect_mime(bytes, path).ok_or(ExtractError::InvalidFileType)?;
    if !sniff::ALLOWED_TYPES.contains(&mime) {
        return Err(ExtractError::InvalidFileType);
    }
    if bytes.len() > MAX_FILE_BYTES {
        return Err(ExtractError::FileTooLarge);
    }
    Ok(mime)
}

/// Read and validate one upload candidate.
pub fn read_and_validate(path: &Path) -> Result<(Vec<u8>, &'static str), ExtractError> {
    let bytes = std::fs::read(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ExtractError::NoFileProvided
        } else {
            ExtractError::FileRead(e)
        }
    })?;
    let mime = validate_upload(&bytes, path)?;
    Ok((bytes, mime))
}

/// Submit a validated file to the extraction service and normalize the
/// reply. One POST, no retry; timeouts are left to the transport.
pub async fn submit(
    client: &Client,
    config: &Config,
    bytes: Vec<u8>,
    mime: &str,
    path: &Path,
) -> Result<InvoiceData, ExtractError> {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("upload")
        .to_string();

    info!(
        file = %file_name,
        mime,
        bytes = bytes.len(),
        endpoint = %config.endpoint(),
        "Submitting file for extraction"
    );

    let part = Part::bytes(bytes).file_name(file_name).mime_str(mime)?;
    let form = Form::new().part("file", part);

    let response = client
        .post(config.endpoint())
        .multipart(form)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body: Value = response.json().await.unwrap_or_default();
        let message = body
            .get("error")
            .and_then(|e| e.as_str())
            .map(str::to_string)
            .unwrap_or_else(|| format!("Server error: {}", status.as_u16()));
        warn!(status = status.as_u16(), %message, "Extraction service rejected the upload");
        return Err(ExtractError::ServerError(message));
    }

    let body: Value = response.json().await.map_err(|_| ExtractError::ParseError)?;
    let raw = fence::unwrap_result(&body)?;
    Ok(normalize::normalize(&raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pdf_of_size(total: usize) -> Vec<u8> {
        let mut bytes = b"%PDF-1.4\n".to_vec();
        bytes.resize(total, 0);
        bytes
    }

    #[test]
    fn test_oversized_pdf_rejected_before_any_network_call() {
        // validate_upload takes no client: rejection here proves the
        // network layer sees zero calls for an oversized file.
        let six_mib = pdf_of_size(6 * 1024 * 1024);
        let result = validate_upload(&six_mib, Path::new("big.pdf"));
        assert!(matches!(result, Err(ExtractError::FileTooLarge)));
    }

    #[test]
    fn test_size_cap_is_inclusive() {
        let at_cap = pdf_of_size(MAX_FILE_BYTES);
        assert!(validate_upload(&at_cap, Path::new("cap.pdf")).is_ok());
        let over = pdf_of_size(MAX_FILE_BYTES + 1);
        assert!(matches!(
            validate_upload(&over, Path::new("cap.pdf")),
            Err(ExtractError::FileTooLarge)
        ));
    }

    #[test]
    fn test_disallowed_type_rejected() {
        let result = validate_upload(b"GIF89a....", Path::new("anim.gif"));
        assert!(matches!(result, Err(ExtractError::InvalidFileType)));
    }

    #[test]
    fn test_empty_selection_rejected() {
        let result = validate_upload(b"", Path::new(""));
        assert!(matches!(result, Err(ExtractError::NoFileProvided)));
    }

    #[test]
    fn test_valid_png_passes() {
        let png = [0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a, 0x01];
        assert!(matches!(
            validate_upload(&png, Path::new("scan.png")),
            Ok("image/png")
        ));
    }

    #[test]
    fn test_missing_file_maps_to_no_file_provided() {
        let result = read_and_validate(Path::new("/nonexistent/invoice.pdf"));
        assert!(matches!(result, Err(ExtractError::NoFileProvided)));
    }
}
