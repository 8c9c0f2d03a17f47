use std::path::Path;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

use crate::error::{AnalyzerError, AnalyzerResult};

/// Chart screenshot as it travels to the model: base64 payload plus media type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartImage {
    pub mime_type: String,
    pub data: String,
}

impl ChartImage {
    pub fn from_bytes(mime_type: &str, bytes: &[u8]) -> AnalyzerResult<Self> {
        if !mime_type.starts_with("image/") {
            return Err(AnalyzerError::InvalidImage(format!(
                "expected an image/* media type, got '{}'",
                mime_type
            )));
        }
        Ok(Self {
            mime_type: mime_type.to_string(),
            data: STANDARD.encode(bytes),
        })
    }

    /// Split a `data:<mime>;base64,<payload>` URL.
    /// The payload is everything after the first ','.
    /// The media type sits between ':' and the first ';'.
    pub fn from_data_url(url: &str) -> AnalyzerResult<Self> {
        let (header, payload) = url
            .split_once(',')
            .ok_or_else(|| {
                AnalyzerError::InvalidImage("data URL has no ',' separator".to_string())
            })?;

        let mime_type = header
            .split(';')
            .next()
            .and_then(|h| h.split_once(':'))
            .map(|(_, mime)| mime)
            .ok_or_else(|| AnalyzerError::InvalidImage("data URL has no media type".to_string()))?;

        if payload.is_empty() {
            return Err(AnalyzerError::InvalidImage("data URL payload is empty".to_string()));
        }

        Ok(Self {
            mime_type: mime_type.to_string(),
            data: payload.to_string(),
        })
    }

    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }

    /// Load a chart from disk. The extension must name an image type and the
    /// content must start with a known image signature, which decides the media type.
    pub async fn from_path(path: impl AsRef<Path>) -> AnalyzerResult<Self> {
        let path = path.as_ref();
        let mime_type = mime_from_extension(path).ok_or_else(|| {
            AnalyzerError::InvalidImage(format!("{} is not an image file", path.display()))
        })?;

        let bytes = tokio::fs::read(path).await?;
        if bytes.is_empty() {
            return Err(AnalyzerError::InvalidImage(format!("{} is empty", path.display())));
        }

        let sniffed = sniff_mime(&bytes).ok_or_else(|| {
            AnalyzerError::InvalidImage(format!("{} does not contain image data", path.display()))
        })?;
        if sniffed != mime_type {
            tracing::debug!(
                path = %path.display(),
                extension = mime_type,
                sniffed,
                "Extension does not match content"
            );
        }

        tracing::debug!(
            path = %path.display(),
            mime_type = sniffed,
            bytes = bytes.len(),
            "Loaded chart image"
        );
        Self::from_bytes(sniffed, &bytes)
    }

    /// Decoded size of the payload in bytes (approximate for padded input).
    pub fn byte_len(&self) -> usize {
        let padding = self.data.bytes().rev().take_while(|b| *b == b'=').count();
        ((self.data.len() / 4) * 3).saturating_sub(padding.min(2))
    }
}

fn mime_from_extension(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "bmp" => Some("image/bmp"),
        "heic" => Some("image/heic"),
        "heif" => Some("image/heif"),
        _ => None,
    }
}

/// Media type from the file signature.
fn sniff_mime(bytes: &[u8]) -> Option<&'static str> {
    match bytes {
        [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, ..] => Some("image/png"),
        [0xFF, 0xD8, 0xFF, ..] => Some("image/jpeg"),
        [b'G', b'I', b'F', b'8', b'7' | b'9', b'a', ..] => Some("image/gif"),
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => Some("image/webp"),
        [b'B', b'M', ..] => Some("image/bmp"),
        [_, _, _, _, b'f', b't', b'y', b'p', brand @ ..] if brand.len() >= 4 => {
            match &brand[..4] {
                b"heic" | b"heix" | b"hevc" | b"hevx" => Some("image/heic"),
                b"mif1" | b"msf1" | b"heif" => Some("image/heif"),
                _ => None,
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PIXEL_PNG: &str =
        "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

    #[test]
    fn test_from_data_url() {
        let url = format!("data:image/png;base64,{}", PIXEL_PNG);
        let image = ChartImage::from_data_url(&url).unwrap();
        assert_eq!(image.mime_type, "image/png");
        assert_eq!(image.data, PIXEL_PNG);
        assert_eq!(image.to_data_url(), url);
    }

    #[test]
    fn test_from_data_url_rejects_missing_parts() {
        assert!(ChartImage::from_data_url("image/png;base64").is_err());
        assert!(ChartImage::from_data_url("data;base64,AAAA").is_err());
        assert!(ChartImage::from_data_url("data:image/png;base64,").is_err());
    }

    #[test]
    fn test_from_bytes_rejects_non_image() {
        assert!(ChartImage::from_bytes("text/plain", b"hello").is_err());
        let image = ChartImage::from_bytes("image/jpeg", &[1, 2, 3]).unwrap();
        assert_eq!(image.data, "AQID");
        assert_eq!(image.byte_len(), 3);
    }

    #[test]
    fn test_mime_from_extension() {
        assert_eq!(mime_from_extension(Path::new("chart.PNG")), Some("image/png"));
        assert_eq!(mime_from_extension(Path::new("chart.jpeg")), Some("image/jpeg"));
        assert_eq!(mime_from_extension(Path::new("notes.txt")), None);
        assert_eq!(mime_from_extension(Path::new("no_extension")), None);
    }

    #[tokio::test]
    async fn test_from_path_round_trip() {
        let path = std::env::temp_dir().join(format!("fx_chart_{}.png", std::process::id()));
        let bytes = STANDARD.decode(PIXEL_PNG).unwrap();
        tokio::fs::write(&path, &bytes).await.unwrap();

        let image = ChartImage::from_path(&path).await.unwrap();
        assert_eq!(image.mime_type, "image/png");
        assert_eq!(image.data, PIXEL_PNG);

        let _ = tokio::fs::remove_file(&path).await;
    }

    #[test]
    fn test_sniff_mime() {
        assert_eq!(sniff_mime(&STANDARD.decode(PIXEL_PNG).unwrap()), Some("image/png"));
        assert_eq!(sniff_mime(&[0xFF, 0xD8, 0xFF, 0xE0, 0, 0]), Some("image/jpeg"));
        assert_eq!(sniff_mime(b"GIF89a\x01\x00"), Some("image/gif"));
        assert_eq!(sniff_mime(b"RIFF\x24\x00\x00\x00WEBPVP8 "), Some("image/webp"));
        assert_eq!(sniff_mime(b"\x00\x00\x00\x18ftypheic\x00\x00"), Some("image/heic"));
        assert_eq!(sniff_mime(b"\x00\x00\x00\x18ftypisom\x00\x00"), None);
        assert_eq!(sniff_mime(b"EUR/USD notes"), None);
        assert_eq!(sniff_mime(&[]), None);
    }

    #[tokio::test]
    async fn test_from_path_rejects_renamed_text_file() {
        let path = std::env::temp_dir().join(format!("fx_chart_text_{}.png", std::process::id()));
        tokio::fs::write(&path, b"not really a chart").await.unwrap();

        let result = ChartImage::from_path(&path).await;
        let _ = tokio::fs::remove_file(&path).await;
        assert!(matches!(result, Err(AnalyzerError::InvalidImage(_))));
    }

    #[tokio::test]
    async fn test_from_path_uses_content_type() {
        // PNG bytes behind a .jpg extension
        let name = format!("fx_chart_misnamed_{}.jpg", std::process::id());
        let path = std::env::temp_dir().join(name);
        tokio::fs::write(&path, STANDARD.decode(PIXEL_PNG).unwrap()).await.unwrap();

        let result = ChartImage::from_path(&path).await;
        let _ = tokio::fs::remove_file(&path).await;
        assert_eq!(result.unwrap().mime_type, "image/png");
    }

    #[tokio::test]
    async fn test_from_path_rejects_text_file() {
        let result = ChartImage::from_path("notes.txt").await;
        assert!(matches!(result, Err(AnalyzerError::InvalidImage(_))));
    }
}
