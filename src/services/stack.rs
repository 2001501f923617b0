//! Compose stack definition and launch
//!
//! Writes the static three-service definition into the working directory,
//! then pulls images and starts everything detached.

use std::time::Duration;

use tracing::{info, warn};

use crate::config::{constants, StackConfig};
use crate::error::{BootstrapError, BootstrapResult};
use crate::infra::command::{self, CommandRunner};

/// Which compose flavor is installed on the host
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ComposeCommand {
    /// Standalone `docker-compose` binary
    Standalone,
    /// `docker compose` plugin
    Plugin,
}

impl ComposeCommand {
    /// Detect which docker-compose command to use
    /// (prefer docker-compose, fallback to docker compose)
    pub async fn detect() -> Self {
        if command::which("docker-compose").await {
            ComposeCommand::Standalone
        } else {
            ComposeCommand::Plugin
        }
    }

    /// Build the full command line for a compose invocation
    pub fn command_line<'a>(&self, tail: &[&'a str]) -> (&'static str, Vec<&'a str>) {
        match self {
            ComposeCommand::Standalone => ("docker-compose", tail.to_vec()),
            ComposeCommand::Plugin => {
                let mut args: Vec<&'a str> = vec!["compose"];
                args.extend_from_slice(tail);
                ("docker", args)
            }
        }
    }

    /// Human-readable name for logs
    pub fn describe(&self) -> &'static str {
        match self {
            ComposeCommand::Standalone => "docker-compose",
            ComposeCommand::Plugin => "docker compose",
        }
    }
}

/// Render the compose definition for the three services
pub fn render_compose(config: &StackConfig) -> String {
    format!(
        r#"services:
  {model_service}:
    image: {model_image}
    ports:
      - "{model_port}:{model_port}"
    volumes:
      - {volume}:/root/.ollama
    restart: unless-stopped

  {ui_service}:
    image: {ui_image}
    ports:
      - "{native_port}:{internal_port}"
    environment:
      - OLLAMA_BASE_URL=http://{model_service}:{model_port}
    depends_on:
      - {model_service}
    restart: unless-stopped

  {db_service}:
    image: {db_image}
    ports:
      - "{db_host_port}:{db_container_port}"
    restart: unless-stopped

volumes:
  {volume}:
"#,
        model_service = constants::MODEL_RUNTIME_SERVICE,
        model_image = constants::MODEL_RUNTIME_IMAGE,
        model_port = constants::MODEL_RUNTIME_PORT,
        ui_service = constants::WEB_UI_SERVICE,
        ui_image = constants::WEB_UI_IMAGE,
        native_port = config.native_port,
        internal_port = config.internal_port,
        db_service = constants::VECTOR_DB_SERVICE,
        db_image = constants::VECTOR_DB_IMAGE,
        db_host_port = constants::VECTOR_DB_HOST_PORT,
        db_container_port = constants::VECTOR_DB_CONTAINER_PORT,
        volume = constants::MODEL_VOLUME,
    )
}

/// Write the compose file into the current working directory.
/// Overwrites any previous run's file.
pub async fn write_compose_file(config: &StackConfig) -> BootstrapResult<()> {
    tokio::fs::write(&config.compose_file, render_compose(config)).await?;
    info!(file = %config.compose_file, "Compose definition written");
    Ok(())
}

/// Pull images and start all declared services detached
pub async fn launch_stack(compose: ComposeCommand, config: &StackConfig) -> BootstrapResult<()> {
    // Pull first so `up` is quick; pull problems are warnings because
    // `up` pulls missing images itself and surfaces real failures.
    let (program, args) = compose.command_line(&["-f", config.compose_file.as_str(), "pull"]);
    info!(">>> {} {}", program, args.join(" "));
    match CommandRunner::run_streamed(program, &args, None).await {
        Ok(result) if result.status.success() => {}
        Ok(_) => warn!("compose pull had issues, continuing"),
        Err(e) => warn!(error = %e, "Failed to run compose pull, continuing"),
    }

    let (program, args) = compose.command_line(&["-f", config.compose_file.as_str(), "up", "-d"]);
    info!(">>> {} {}", program, args.join(" "));
    let result = CommandRunner::run_streamed(program, &args, None).await?;
    if !result.status.success() {
        return Err(BootstrapError::command_failed(
            compose.describe(),
            format!(
                "up -d exited with code {}",
                result.status.code().unwrap_or(-1)
            ),
        ));
    }

    // Show the service table; informational only
    let (program, args) = compose.command_line(&["-f", config.compose_file.as_str(), "ps"]);
    match CommandRunner::run(program, &args, Some(Duration::from_secs(30))).await {
        Ok(output) if output.status.success() => {
            for line in String::from_utf8_lossy(&output.stdout).lines() {
                info!("{}", line);
            }
        }
        _ => warn!("Failed to show service status, continuing"),
    }

    info!("Stack is up");
    Ok(())
}
