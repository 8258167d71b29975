// Image codec - raw files to transport form and back

use super::error::{EditorError, Result};
use super::types::EncodedImage;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::path::Path;

const FALLBACK_NAME: &str = "image.png";

/// Encode raw image bytes.
///
/// The media type is sniffed from the magic bytes. When sniffing fails a
/// declared `image/*` type is trusted, which covers formats without a
/// signature such as SVG.
pub fn encode(name: &str, bytes: &[u8], declared: Option<&str>) -> Result<EncodedImage> {
    if bytes.is_empty() {
        return Err(EditorError::UnsupportedFormat(format!("{} is empty", name)));
    }

    let media_type = match infer::get(bytes) {
        Some(kind) if kind.matcher_type() == infer::MatcherType::Image => kind.mime_type().to_string(),
        Some(kind) => {
            return Err(EditorError::UnsupportedFormat(format!(
                "{} is {}, not an image",
                name,
                kind.mime_type()
            )));
        }
        None => match declared {
            Some(mime) if mime.starts_with("image/") => mime.to_string(),
            _ => {
                return Err(EditorError::UnsupportedFormat(format!(
                    "{} is not a recognised image",
                    name
                )));
            }
        },
    };

    Ok(EncodedImage::new(name, STANDARD.encode(bytes), media_type))
}

/// Read and encode an image file
pub async fn encode_file(path: impl AsRef<Path>) -> Result<EncodedImage> {
    let path = path.as_ref();
    let bytes = tokio::fs::read(path).await?;

    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(FALLBACK_NAME);
    let declared = path
        .extension()
        .and_then(|e| e.to_str())
        .and_then(media_type_from_extension);

    encode(name, &bytes, declared)
}

/// Back to raw bytes, e.g. for saving
pub fn decode(image: &EncodedImage) -> Result<Vec<u8>> {
    Ok(STANDARD.decode(image.content.as_bytes())?)
}

/// `data:` URI for display or download
pub fn renderable_uri(image: &EncodedImage) -> String {
    format!("data:{};base64,{}", image.media_type, image.content)
}

/// File name offered when saving an edited image
pub fn download_name(image: &EncodedImage) -> String {
    let base = if image.name.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        image.name.clone()
    };

    let has_extension = Path::new(&base).extension().is_some();
    let name = match extension_for(&image.media_type) {
        Some(ext) if !has_extension => format!("{}.{}", base, ext),
        _ => base,
    };

    format!("edited-{}", name)
}

pub fn media_type_from_extension(ext: &str) -> Option<&'static str> {
    match ext.to_lowercase().as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "bmp" => Some("image/bmp"),
        "svg" => Some("image/svg+xml"),
        "heic" => Some("image/heic"),
        "avif" => Some("image/avif"),
        "tif" | "tiff" => Some("image/tiff"),
        _ => None,
    }
}

pub fn extension_for(media_type: &str) -> Option<&'static str> {
    match media_type {
        "image/png" => Some("png"),
        "image/jpeg" => Some("jpg"),
        "image/gif" => Some("gif"),
        "image/webp" => Some("webp"),
        "image/bmp" => Some("bmp"),
        "image/svg+xml" => Some("svg"),
        "image/heic" | "image/heif" => Some("heic"),
        "image/avif" => Some("avif"),
        "image/tiff" => Some("tiff"),
        _ => None,
    }
}
