//! Presentation of outcomes: plain text for humans, JSON reports for scripts.

use serde::Serialize;
use std::path::Path;
use std::process::ExitCode;
use synthia_core::{EndpointKind, Outcome, Payload};

/// Machine-readable summary of one outcome.
#[derive(Debug, Serialize)]
pub struct OutcomeReport<'a> {
    pub endpoint: EndpointKind,
    pub outcome: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_format: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attempts: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<&'a str>,
}

impl<'a> OutcomeReport<'a> {
    /// Build a report; `image_path` is where a generated image was saved.
    pub fn new(kind: EndpointKind, outcome: &'a Outcome, image_path: Option<&Path>) -> Self {
        let mut report = Self {
            endpoint: kind,
            outcome: outcome.label(),
            text: None,
            image_path: image_path.map(|p| p.display().to_string()),
            image_format: None,
            width: None,
            height: None,
            status_code: None,
            attempts: None,
            detail: None,
        };
        match outcome {
            Outcome::Success(Payload::Text(text)) => report.text = Some(text),
            Outcome::Success(Payload::Image(image)) => {
                report.image_format = Some(&image.format);
                report.width = Some(image.width);
                report.height = Some(image.height);
            }
            Outcome::EmptyResult => {}
            Outcome::Malformed { reason } => report.detail = Some(reason),
            Outcome::ExhaustedRetries {
                attempts,
                last_body,
            } => {
                report.attempts = Some(*attempts);
                report.detail = Some(last_body);
            }
            Outcome::HttpError { status_code, body } => {
                report.status_code = Some(*status_code);
                report.detail = Some(body);
            }
        }
        report
    }
}

/// Print the JSON report for `outcome` and pick the exit code.
pub fn print_json(
    kind: EndpointKind,
    outcome: &Outcome,
    image_path: Option<&Path>,
) -> anyhow::Result<ExitCode> {
    let report = OutcomeReport::new(kind, outcome, image_path);
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(exit_code(outcome))
}

/// Print a non-success outcome to stderr the way a user should see it.
pub fn report_failure(kind: EndpointKind, outcome: &Outcome) -> ExitCode {
    for line in failure_lines(kind, outcome) {
        eprintln!("{line}");
    }
    exit_code(outcome)
}

pub fn exit_code(outcome: &Outcome) -> ExitCode {
    if outcome.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// User-facing lines for a non-success outcome.
pub fn failure_lines(kind: EndpointKind, outcome: &Outcome) -> Vec<String> {
    match outcome {
        Outcome::Success(_) => Vec::new(),
        Outcome::EmptyResult => vec![match kind {
            EndpointKind::TextGeneration => "No response from Synthia.".to_string(),
            EndpointKind::ImageCaptioning => "No caption generated.".to_string(),
            EndpointKind::ImageGeneration => "No image generated.".to_string(),
        }],
        Outcome::Malformed { reason } => {
            let headline = match kind {
                EndpointKind::ImageGeneration => "The response content is not a valid image.",
                _ => "The model returned an unexpected response.",
            };
            vec![headline.to_string(), format!("Details: {reason}")]
        }
        Outcome::ExhaustedRetries {
            attempts,
            last_body,
        } => vec![
            format!("Model is still loading after {attempts} attempt(s). Please try again later."),
            format!("Response content: {last_body}"),
        ],
        Outcome::HttpError { status_code, body } => vec![
            format!("Failed to {}. Status code: {status_code}", action(kind)),
            format!("Response content: {body}"),
        ],
    }
}

fn action(kind: EndpointKind) -> &'static str {
    match kind {
        EndpointKind::TextGeneration => "generate text",
        EndpointKind::ImageCaptioning => "generate caption",
        EndpointKind::ImageGeneration => "generate image",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use synthia_core::GeneratedImage;

    #[test]
    fn test_http_error_lines_include_status_and_body() {
        let outcome = Outcome::HttpError {
            status_code: 401,
            body: "Invalid credentials".to_string(),
        };
        let lines = failure_lines(EndpointKind::ImageGeneration, &outcome);
        assert_eq!(lines[0], "Failed to generate image. Status code: 401");
        assert_eq!(lines[1], "Response content: Invalid credentials");
    }

    #[test]
    fn test_empty_result_messages() {
        assert_eq!(
            failure_lines(EndpointKind::TextGeneration, &Outcome::EmptyResult),
            vec!["No response from Synthia.".to_string()]
        );
        assert_eq!(
            failure_lines(EndpointKind::ImageCaptioning, &Outcome::EmptyResult),
            vec!["No caption generated.".to_string()]
        );
    }

    #[test]
    fn test_success_has_no_failure_lines() {
        let outcome = Outcome::Success(Payload::Text("ok".to_string()));
        assert!(failure_lines(EndpointKind::TextGeneration, &outcome).is_empty());
    }

    #[test]
    fn test_report_for_exhausted_retries() {
        let outcome = Outcome::ExhaustedRetries {
            attempts: 5,
            last_body: "loading".to_string(),
        };
        let report = OutcomeReport::new(EndpointKind::ImageGeneration, &outcome, None);
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["endpoint"], "image_generation");
        assert_eq!(value["outcome"], "exhausted_retries");
        assert_eq!(value["attempts"], 5);
        assert_eq!(value["detail"], "loading");
        assert!(value.get("text").is_none());
    }

    #[test]
    fn test_report_for_saved_image() {
        let outcome = Outcome::Success(Payload::Image(GeneratedImage {
            bytes: vec![1, 2, 3],
            format: "png".to_string(),
            width: 1024,
            height: 768,
        }));
        let report = OutcomeReport::new(
            EndpointKind::ImageGeneration,
            &outcome,
            Some(Path::new("out/image.png")),
        );
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["outcome"], "success");
        assert_eq!(value["image_path"], "out/image.png");
        assert_eq!(value["image_format"], "png");
        assert_eq!(value["width"], 1024);
        assert!(value.get("status_code").is_none());
    }
}
