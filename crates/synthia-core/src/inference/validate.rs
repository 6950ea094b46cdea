//! Response body validation.
//!
//! Turns the body of an accepted (HTTP 200) response into `Success`,
//! `EmptyResult` or `Malformed`. No I/O happens here; the same body always
//! yields the same outcome.

use image::{GenericImageView, ImageFormat};
use serde::Deserialize;
use std::io::Cursor;

use super::outcome::{GeneratedImage, Outcome, Payload};
use super::request::EndpointKind;

/// One element of a text or caption response array.
#[derive(Deserialize)]
struct GeneratedRecord {
    generated_text: Option<String>,
}

/// Validate `body` for the given endpoint kind.
///
/// `prompt` is the original prompt for text generation; it is ignored for
/// the other kinds.
pub fn validate(kind: EndpointKind, prompt: Option<&str>, body: &[u8]) -> Outcome {
    match kind {
        EndpointKind::TextGeneration => validate_text(body, prompt.unwrap_or_default()),
        EndpointKind::ImageCaptioning => validate_caption(body),
        EndpointKind::ImageGeneration => validate_image(body),
    }
}

/// Extract generated text, dropping the first echo of `prompt`.
pub fn validate_text(body: &[u8], prompt: &str) -> Outcome {
    let text = match first_generated_text(body) {
        Ok(Some(text)) => text,
        Ok(None) => return Outcome::EmptyResult,
        Err(reason) => return Outcome::Malformed { reason },
    };

    let stripped = if prompt.is_empty() {
        text
    } else {
        text.replacen(prompt, "", 1)
    };
    let trimmed = stripped.trim();
    if trimmed.is_empty() {
        return Outcome::EmptyResult;
    }
    Outcome::Success(Payload::Text(trimmed.to_string()))
}

/// Extract a caption. The caption text is returned as the model produced it.
pub fn validate_caption(body: &[u8]) -> Outcome {
    match first_generated_text(body) {
        Ok(Some(caption)) if !caption.trim().is_empty() => Outcome::Success(Payload::Text(caption)),
        Ok(_) => Outcome::EmptyResult,
        Err(reason) => Outcome::Malformed { reason },
    }
}

/// Decode a generated image to prove the bytes are well-formed.
pub fn validate_image(body: &[u8]) -> Outcome {
    let reader = match image::ImageReader::new(Cursor::new(body)).with_guessed_format() {
        Ok(reader) => reader,
        Err(e) => {
            return Outcome::Malformed {
                reason: format!("Cannot detect image format: {e}"),
            }
        }
    };
    let Some(format) = reader.format() else {
        return Outcome::Malformed {
            reason: "The response content is not a valid image".to_string(),
        };
    };
    match reader.decode() {
        Ok(decoded) => {
            let (width, height) = decoded.dimensions();
            Outcome::Success(Payload::Image(GeneratedImage {
                bytes: body.to_vec(),
                format: format_to_string(format),
                width,
                height,
            }))
        }
        Err(e) => Outcome::Malformed {
            reason: format!("Image decode failed: {e}"),
        },
    }
}

/// `generated_text` of the first record; `Ok(None)` when the array is empty
/// or the field is absent.
/// Trailing records are never inspected.
fn first_generated_text(body: &[u8]) -> Result<Option<String>, String> {
    let records: Vec<serde_json::Value> = serde_json::from_slice(body)
        .map_err(|e| format!("Expected an array of generation records: {e}"))?;
    let Some(first) = records.into_iter().next() else {
        return Ok(None);
    };
    let record: GeneratedRecord = serde_json::from_value(first)
        .map_err(|e| format!("Unexpected generation record: {e}"))?;
    Ok(record.generated_text)
}

/// Convert an ImageFormat to a string representation.
pub fn format_to_string(format: ImageFormat) -> String {
    match format {
        ImageFormat::Jpeg => "jpeg".to_string(),
        ImageFormat::Png => "png".to_string(),
        ImageFormat::WebP => "webp".to_string(),
        ImageFormat::Gif => "gif".to_string(),
        ImageFormat::Tiff => "tiff".to_string(),
        ImageFormat::Bmp => "bmp".to_string(),
        ImageFormat::Avif => "avif".to_string(),
        _ => "unknown".to_string(),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use image::{DynamicImage, RgbImage};

    /// Encode a small solid image in the given format.
    pub(crate) fn encoded_image(format: ImageFormat) -> Vec<u8> {
        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(4, 3, image::Rgb([200, 40, 90])));
        let mut buf = Cursor::new(Vec::new());
        image.write_to(&mut buf, format).unwrap();
        buf.into_inner()
    }

    #[test]
    fn test_text_strips_prompt_echo() {
        let body = br#"[{"generated_text": "Hello worldHow are you?"}]"#;
        assert_eq!(
            validate_text(body, "Hello world"),
            Outcome::Success(Payload::Text("How are you?".to_string()))
        );
    }

    #[test]
    fn test_text_strips_only_first_occurrence() {
        let body = br#"[{"generated_text": "echo says echo"}]"#;
        assert_eq!(
            validate_text(body, "echo"),
            Outcome::Success(Payload::Text("says echo".to_string()))
        );
    }

    #[test]
    fn test_text_without_echo_is_trimmed() {
        let body = br#"[{"generated_text": "  fresh text \n"}]"#;
        assert_eq!(validate_text(body, "prompt").text(), Some("fresh text"));
    }

    #[test]
    fn test_text_uses_first_record() {
        let body = br#"[{"generated_text": "first"}, {"generated_text": "second"}]"#;
        assert_eq!(validate_text(body, "").text(), Some("first"));
    }

    #[test]
    fn test_trailing_records_are_ignored() {
        let body = br#"[{"generated_text": "ok"}, "junk", 42]"#;
        assert_eq!(
            validate_text(body, ""),
            Outcome::Success(Payload::Text("ok".to_string()))
        );
        assert_eq!(
            validate_caption(body),
            Outcome::Success(Payload::Text("ok".to_string()))
        );
    }

    #[test]
    fn test_empty_array_is_empty_result() {
        assert_eq!(validate_text(b"[]", "p"), Outcome::EmptyResult);
        assert_eq!(validate_caption(b"[]"), Outcome::EmptyResult);
    }

    #[test]
    fn test_missing_field_is_empty_result() {
        let body = br#"[{"score": 0.4}]"#;
        assert_eq!(validate_text(body, "p"), Outcome::EmptyResult);
        assert_eq!(validate_caption(body), Outcome::EmptyResult);
    }

    #[test]
    fn test_prompt_only_echo_is_empty_result() {
        let body = br#"[{"generated_text": "Tell me  "}]"#;
        assert_eq!(validate_text(body, "Tell me"), Outcome::EmptyResult);
    }

    #[test]
    fn test_non_array_body_is_malformed() {
        let body = br#"{"error": "Model is overloaded"}"#;
        assert!(matches!(validate_text(body, "p"), Outcome::Malformed { .. }));
        assert!(matches!(validate_caption(body), Outcome::Malformed { .. }));
        assert!(matches!(validate_text(b"not json", "p"), Outcome::Malformed { .. }));
    }

    #[test]
    fn test_wrong_field_type_is_malformed() {
        let body = br#"[{"generated_text": 42}]"#;
        assert!(matches!(validate_caption(body), Outcome::Malformed { .. }));
    }

    #[test]
    fn test_caption_kept_verbatim() {
        let body = br#"[{"generated_text": "a cat sitting on a mat "}]"#;
        assert_eq!(validate_caption(body).text(), Some("a cat sitting on a mat "));
    }

    #[test]
    fn test_png_image_succeeds() {
        let png = encoded_image(ImageFormat::Png);
        let outcome = validate_image(&png);
        let image = outcome.image().expect("png should decode");
        assert_eq!(image.format, "png");
        assert_eq!((image.width, image.height), (4, 3));
        assert_eq!(image.bytes, png);
    }

    #[test]
    fn test_jpeg_image_succeeds() {
        let jpeg = encoded_image(ImageFormat::Jpeg);
        let outcome = validate_image(&jpeg);
        assert_eq!(outcome.image().map(|i| i.format.as_str()), Some("jpeg"));
    }

    #[test]
    fn test_non_image_bytes_are_malformed() {
        let body = br#"{"error": "Model is loading", "estimated_time": 20.0}"#;
        assert!(matches!(validate_image(body), Outcome::Malformed { .. }));
        assert!(matches!(validate_image(b""), Outcome::Malformed { .. }));
    }

    #[test]
    fn test_truncated_png_is_malformed() {
        let png = encoded_image(ImageFormat::Png);
        assert!(matches!(
            validate_image(&png[..png.len() / 2]),
            Outcome::Malformed { .. }
        ));
    }

    #[test]
    fn test_validation_is_idempotent() {
        let body = br#"[{"generated_text": "Hello worldHow are you?"}]"#;
        let first = validate(EndpointKind::TextGeneration, Some("Hello world"), body);
        let second = validate(EndpointKind::TextGeneration, Some("Hello world"), body);
        assert_eq!(first, second);

        let png = encoded_image(ImageFormat::Png);
        assert_eq!(
            validate(EndpointKind::ImageGeneration, None, &png),
            validate(EndpointKind::ImageGeneration, None, &png)
        );
    }
}
