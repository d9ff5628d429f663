pub mod chat;
pub mod config;
pub mod menu;
pub mod replay;

use frajola_agent::{
    CompletionClient, ConversationSession, DisabledCompletionClient, HttpCompletionClient,
};
use frajola_core::config::{AppConfig, LoadOptions, LogFormat, LoggingConfig};
use frajola_core::catalog::fixtures::demo_menu;
use frajola_core::{DialogueEngine, JsonFileMenuProvider, MenuCatalog, MenuProvider};
use serde::Serialize;
use tracing::info;

pub const EXIT_CONFIG_FAILURE: u8 = 2;
pub const EXIT_MENU_FAILURE: u8 = 3;

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct CommandOutcome {
    command: String,
    status: String,
    error_class: Option<String>,
    message: String,
}

impl CommandResult {
    pub fn success(command: &str, message: impl Into<String>) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "ok".to_string(),
            error_class: None,
            message: message.into(),
        };
        Self::payload(0, &payload)
    }

    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: Some(error_class.to_string()),
            message: message.into(),
        };
        Self::payload(exit_code, &payload)
    }

    /// Wraps a command-specific report.
    pub fn payload<T: Serialize>(exit_code: u8, payload: &T) -> Self {
        Self { exit_code, output: serialize_payload(payload) }
    }
}

fn serialize_payload<T: Serialize>(payload: &T) -> String {
    serde_json::to_string(payload).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"unknown\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\"}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    })
}

pub(crate) type Session = ConversationSession<Box<dyn CompletionClient>>;

/// Everything a conversational command needs, loaded in startup order.
pub(crate) struct Assistant {
    pub config: AppConfig,
    pub catalog: MenuCatalog,
}

impl Assistant {
    pub fn load(command: &str) -> Result<Self, CommandResult> {
        let config = load_config(command)?;
        init_logging(&config.logging);
        let catalog = load_menu(command, &config)?;
        Ok(Self { config, catalog })
    }

    pub fn session(&self, command: &str) -> Result<Session, CommandResult> {
        let client: Box<dyn CompletionClient> =
            match HttpCompletionClient::from_config(&self.config.completion) {
                Ok(Some(client)) => {
                    info!(
                        event_name = "system.completion.configured",
                        endpoint_url = client.endpoint_url(),
                        "completion delegation enabled"
                    );
                    Box::new(client)
                }
                Ok(None) => Box::new(DisabledCompletionClient),
                Err(error) => {
                    return Err(CommandResult::failure(
                        command,
                        "config_validation",
                        format!("could not build completion client: {error}"),
                        EXIT_CONFIG_FAILURE,
                    ))
                }
            };

        let engine = DialogueEngine::new(self.config.dialogue_config());
        Ok(ConversationSession::new(engine, client)
            .with_completion_timeout(self.config.completion_timeout()))
    }
}

pub(crate) fn load_config(command: &str) -> Result<AppConfig, CommandResult> {
    AppConfig::load(LoadOptions::default()).map_err(|error| {
        CommandResult::failure(
            command,
            "config_validation",
            format!("configuration validation failed: {error}"),
            EXIT_CONFIG_FAILURE,
        )
    })
}

/// A configured menu file must load; without one the built-in demo menu is
/// served with the configured delivery estimate.
pub(crate) fn load_menu(command: &str, config: &AppConfig) -> Result<MenuCatalog, CommandResult> {
    let Some(path) = config.menu.path.as_deref() else {
        return Ok(demo_menu()
            .with_estimated_delivery_minutes(config.menu.estimated_delivery_minutes));
    };

    let catalog = JsonFileMenuProvider::new(path).load().map_err(|error| {
        CommandResult::failure(command, error.error_class(), error.to_string(), EXIT_MENU_FAILURE)
    })?;
    info!(
        event_name = "system.menu.loaded",
        path = %path.display(),
        items = catalog.items().len(),
        available = catalog.available_count(),
        "menu loaded"
    );
    Ok(catalog)
}

/// Logs go to stderr so stdout carries only command output.
pub(crate) fn init_logging(config: &LoggingConfig) {
    use tracing::Level;

    let log_level = config.level.parse::<Level>().unwrap_or(Level::INFO);
    let builder = tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(log_level)
        .with_writer(std::io::stderr);

    // Tests drive several commands in one process; only the first one installs.
    let _ = match config.format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
}

pub(crate) fn current_thread_runtime(
    command: &str,
) -> Result<tokio::runtime::Runtime, CommandResult> {
    tokio::runtime::Builder::new_current_thread().enable_all().build().map_err(|error| {
        CommandResult::failure(
            command,
            "runtime",
            format!("failed to initialize async runtime: {error}"),
            1,
        )
    })
}
