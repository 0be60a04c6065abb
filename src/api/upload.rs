use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use futures::StreamExt;
use std::path::Path;

use crate::utils::error::AppError;

/// Extensões aceitas, em minúsculas
pub fn allowed_extension(filename: &str) -> Option<String> {
    let ext = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())?
        .to_lowercase();

    if matches!(ext.as_str(), "jpg" | "jpeg" | "png") {
        Some(ext)
    } else {
        None
    }
}

/// Extensão E MIME type precisam bater com o whitelist de imagem
pub fn allowed_mime(mime: &str) -> bool {
    matches!(mime, "image/jpeg" | "image/jpg" | "image/png")
}

/// `<fieldname>-<epoch-ms>.<ext>` - timestamp evita colisão de nomes
pub fn stored_filename(field_name: &str, epoch_ms: i64, ext: &str) -> String {
    format!("{}-{}.{}", field_name, epoch_ms, ext)
}

fn upload_dir() -> String {
    std::env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".to_string())
}

/// POST /api/upload - um arquivo de imagem por requisição.
/// Arquivo fora do whitelist responde 400 no envelope padrão.
pub async fn upload_image(mut payload: Multipart) -> Result<HttpResponse, AppError> {
    while let Some(item) = payload.next().await {
        let mut field =
            item.map_err(|e| AppError::BadRequest(format!("Invalid multipart payload: {}", e)))?;

        let (field_name, filename) = match field.content_disposition() {
            Some(cd) => (
                cd.get_name().unwrap_or("image").to_string(),
                cd.get_filename().map(ToString::to_string),
            ),
            None => continue,
        };

        // Campos de formulário sem arquivo são ignorados
        let Some(filename) = filename else { continue };

        let mime = field
            .content_type()
            .map(|m| m.essence_str().to_string())
            .unwrap_or_default();

        let ext = allowed_extension(&filename)
            .filter(|_| allowed_mime(&mime))
            .ok_or_else(|| AppError::BadRequest("Images only!".to_string()))?;

        let mut data: Vec<u8> = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk
                .map_err(|e| AppError::BadRequest(format!("Failed to read upload: {}", e)))?;
            data.extend_from_slice(&chunk);
        }

        let stored = stored_filename(&field_name, chrono::Utc::now().timestamp_millis(), &ext);
        let path = Path::new(&upload_dir()).join(&stored);

        web::block(move || std::fs::write(path, data))
            .await
            .map_err(|e| AppError::Database(format!("Blocking task failed: {}", e)))?
            .map_err(|e| AppError::Database(format!("Failed to store upload: {}", e)))?;

        log::info!("🖼️ Image stored: {}", stored);

        return Ok(HttpResponse::Ok().json(serde_json::json!({
            "message": "Image uploaded successfully",
            "image": format!("/uploads/{}", stored),
        })));
    }

    Err(AppError::BadRequest("No image file provided".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_whitelist() {
        assert_eq!(allowed_extension("photo.jpg").as_deref(), Some("jpg"));
        assert_eq!(allowed_extension("photo.JPEG").as_deref(), Some("jpeg"));
        assert_eq!(allowed_extension("photo.PNG").as_deref(), Some("png"));

        assert!(allowed_extension("photo.gif").is_none());
        assert!(allowed_extension("script.sh").is_none());
        assert!(allowed_extension("no-extension").is_none());
        // extensão válida no meio do nome não conta
        assert!(allowed_extension("photo.png.exe").is_none());
    }

    #[test]
    fn test_mime_whitelist() {
        assert!(allowed_mime("image/jpeg"));
        assert!(allowed_mime("image/png"));

        assert!(!allowed_mime("image/gif"));
        assert!(!allowed_mime("application/octet-stream"));
        assert!(!allowed_mime(""));
    }

    #[test]
    fn test_stored_filename_format() {
        assert_eq!(
            stored_filename("image", 1704896400000, "jpg"),
            "image-1704896400000.jpg"
        );
    }
}
