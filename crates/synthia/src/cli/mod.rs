//! Subcommands and the shared plumbing that runs one inference call.

pub mod caption;
pub mod config;
pub mod image;
pub mod prompts;
pub mod render;
pub mod text;

use clap::Args;
use synthia_core::{invoke_configured, Config, InferenceRequest, Outcome};
use tokio_util::sync::CancellationToken;

/// Flags shared by the inference subcommands.
#[derive(Args, Debug, Default)]
pub struct SessionArgs {
    /// Print the outcome as a JSON report on stdout
    #[arg(long, global = true)]
    pub json: bool,

    /// Override retry.max_attempts for this run
    #[arg(long, global = true, env = "SYNTHIA_MAX_ATTEMPTS")]
    pub max_attempts: Option<u32>,

    /// Override retry.delay_seconds for this run
    #[arg(long, global = true, env = "SYNTHIA_DELAY_SECONDS")]
    pub delay_seconds: Option<u64>,
}

impl SessionArgs {
    /// Apply overrides to the loaded config and re-validate it.
    pub fn apply(&self, mut config: Config) -> anyhow::Result<Session> {
        if let Some(max_attempts) = self.max_attempts {
            config.retry.max_attempts = max_attempts;
        }
        if let Some(delay_seconds) = self.delay_seconds {
            config.retry.delay_seconds = delay_seconds;
        }
        config.validate()?;
        Ok(Session {
            config,
            json: self.json,
        })
    }
}

/// Effective settings for one command invocation.
#[derive(Debug)]
pub struct Session {
    pub config: Config,
    pub json: bool,
}

impl Session {
    /// Send `request` and wait for its outcome.
    ///
    /// Retry notices go to stderr. Ctrl-C cancels the call.
    pub async fn run(&self, request: &InferenceRequest) -> anyhow::Result<Outcome> {
        let cancel = CancellationToken::new();

        let ctrl_c = {
            let cancel = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    cancel.cancel();
                }
            })
        };

        let result =
            invoke_configured(&self.config, request, &cancel, |notice| eprintln!("{notice}"))
                .await;
        ctrl_c.abort();

        Ok(result?)
    }
}
