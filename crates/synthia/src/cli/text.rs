//! The `synthia text` command.

use clap::Args;
use std::process::ExitCode;
use synthia_core::{EndpointKind, InferenceRequest, Outcome, Payload};

use super::{render, Session};

/// Arguments for the `text` command.
#[derive(Args, Debug)]
pub struct TextArgs {
    /// Prompt to send to the text generation model
    pub prompt: String,

    /// Maximum tokens to generate (defaults to inference.max_new_tokens)
    #[arg(long)]
    pub max_new_tokens: Option<u32>,
}

/// Execute the text command.
pub async fn execute(args: TextArgs, session: Session) -> anyhow::Result<ExitCode> {
    let max_new_tokens = args
        .max_new_tokens
        .unwrap_or(session.config.inference.max_new_tokens);
    let request = InferenceRequest::text_generation(args.prompt, Some(max_new_tokens))?;
    let outcome = session.run(&request).await?;

    if session.json {
        return render::print_json(EndpointKind::TextGeneration, &outcome, None);
    }
    match &outcome {
        Outcome::Success(Payload::Text(text)) => {
            println!("{text}");
            Ok(ExitCode::SUCCESS)
        }
        other => Ok(render::report_failure(EndpointKind::TextGeneration, other)),
    }
}
