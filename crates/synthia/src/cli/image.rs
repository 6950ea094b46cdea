//! The `synthia image` command.

use anyhow::Context;
use clap::Args;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::{SystemTime, UNIX_EPOCH};
use synthia_core::{EndpointKind, GeneratedImage, InferenceRequest, Outcome, Payload};

use super::{render, Session};

/// Arguments for the `image` command.
#[derive(Args, Debug)]
pub struct ImageArgs {
    /// Prompt describing the image to generate
    pub prompt: String,

    /// Where to write the image (defaults to output.image_dir/synthia-<timestamp>.<ext>)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Execute the image command.
pub async fn execute(args: ImageArgs, session: Session) -> anyhow::Result<ExitCode> {
    let request = InferenceRequest::image_generation(args.prompt)?;
    let outcome = session.run(&request).await?;

    let saved = match &outcome {
        Outcome::Success(Payload::Image(image)) => {
            let path = match &args.output {
                Some(path) => expand(path),
                None => default_path(&session.config.image_dir(), image, unix_timestamp()),
            };
            save(&path, image).await?;
            tracing::info!(
                "Saved {}x{} {} image to {}",
                image.width,
                image.height,
                image.format,
                path.display()
            );
            Some(path)
        }
        _ => None,
    };

    if session.json {
        return render::print_json(EndpointKind::ImageGeneration, &outcome, saved.as_deref());
    }
    match saved {
        Some(path) => {
            println!("{}", path.display());
            Ok(ExitCode::SUCCESS)
        }
        None => Ok(render::report_failure(EndpointKind::ImageGeneration, &outcome)),
    }
}

/// File extension for a detected image format.
fn extension(format: &str) -> &str {
    match format {
        "jpeg" => "jpg",
        "unknown" => "img",
        other => other,
    }
}

fn default_path(dir: &Path, image: &GeneratedImage, timestamp: u64) -> PathBuf {
    dir.join(format!("synthia-{timestamp}.{}", extension(&image.format)))
}

fn expand(path: &Path) -> PathBuf {
    let path_str = path.to_string_lossy();
    PathBuf::from(shellexpand::tilde(&path_str).into_owned())
}

fn unix_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

async fn save(path: &Path, image: &GeneratedImage) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Cannot create {}", parent.display()))?;
    }
    tokio::fs::write(path, &image.bytes)
        .await
        .with_context(|| format!("Cannot write {}", path.display()))?;
    Ok(())
}
