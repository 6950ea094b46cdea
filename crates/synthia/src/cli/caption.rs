//! The `synthia caption` command.

use anyhow::Context;
use clap::Args;
use std::path::PathBuf;
use std::process::ExitCode;
use synthia_core::{EndpointKind, InferenceRequest, Outcome, Payload};

use super::{render, Session};

/// Arguments for the `caption` command.
#[derive(Args, Debug)]
pub struct CaptionArgs {
    /// JPEG or PNG image to caption
    pub image: PathBuf,
}

/// Execute the caption command.
pub async fn execute(args: CaptionArgs, session: Session) -> anyhow::Result<ExitCode> {
    let bytes = read_upload(&args.image, session.config.limits.max_upload_size_mb).await?;
    let request = InferenceRequest::image_captioning(bytes)
        .with_context(|| format!("Cannot caption {}", args.image.display()))?;
    let outcome = session.run(&request).await?;

    if session.json {
        return render::print_json(EndpointKind::ImageCaptioning, &outcome, None);
    }
    match &outcome {
        Outcome::Success(Payload::Text(caption)) => {
            println!("{caption}");
            Ok(ExitCode::SUCCESS)
        }
        other => Ok(render::report_failure(EndpointKind::ImageCaptioning, other)),
    }
}

/// Read an upload, refusing files over the configured size.
async fn read_upload(path: &std::path::Path, max_mb: u64) -> anyhow::Result<Vec<u8>> {
    let metadata = tokio::fs::metadata(path)
        .await
        .with_context(|| format!("Cannot read {}", path.display()))?;
    let max_bytes = max_mb.saturating_mul(1024 * 1024);
    if metadata.len() > max_bytes {
        anyhow::bail!(
            "File too large: {} ({}MB > {}MB)",
            path.display(),
            metadata.len() / (1024 * 1024),
            max_mb
        );
    }
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Cannot read {}", path.display()))?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_read_upload_within_limit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("small.png");
        std::fs::write(&path, [0x89, b'P', b'N', b'G']).unwrap();
        assert_eq!(read_upload(&path, 1).await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_read_upload_rejects_large_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.jpg");
        std::fs::write(&path, vec![0u8; 1024 * 1024 + 1]).unwrap();
        let err = read_upload(&path, 1).await.unwrap_err();
        assert!(err.to_string().contains("File too large"));
    }

    #[tokio::test]
    async fn test_read_upload_with_huge_limit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("small.jpg");
        std::fs::write(&path, [0xFF, 0xD8, 0xFF]).unwrap();
        assert_eq!(read_upload(&path, u64::MAX).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_read_upload_missing_file() {
        let err = read_upload(std::path::Path::new("/nonexistent/synthia.png"), 1)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Cannot read"));
    }
}
