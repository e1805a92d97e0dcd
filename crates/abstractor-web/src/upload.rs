use axum::extract::Multipart;

/// An uploaded PDF with its (sanitized) client-supplied filename.
#[derive(Debug)]
pub struct UploadedPdf {
    pub filename: String,
    pub data: Vec<u8>,
}

/// Parse the multipart form: a single `file` field holding the PDF.
///
/// Input validation happens here, before anything touches the core: a
/// missing field or an empty filename is a client error.
pub async fn parse_multipart(mut multipart: Multipart) -> Result<UploadedPdf, String> {
    let mut file: Option<UploadedPdf> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| format!("Failed to read form field: {}", e))?
    {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "file" => {
                let filename = field.file_name().unwrap_or("").to_string();
                if filename.is_empty() {
                    return Err("Filename is empty.".to_string());
                }
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| format!("Failed to read file data: {}", e))?
                    .to_vec();
                file = Some(UploadedPdf {
                    filename: sanitize_filename(&filename),
                    data,
                });
            }
            _ => {
                // Ignore unknown fields
                let _ = field.bytes().await;
            }
        }
    }

    file.ok_or_else(|| "No file uploaded.".to_string())
}

/// Reduce a client filename to a safe token for the upload log: keep
/// alphanumerics, dot, dash and underscore; everything else becomes `_`.
pub fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let trimmed = cleaned.trim_matches('.');
    if trimmed.is_empty() {
        "upload.pdf".to_string()
    } else {
        trimmed.to_string()
    }
}
