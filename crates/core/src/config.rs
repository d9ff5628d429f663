use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::DEFAULT_ESTIMATED_DELIVERY_MINUTES;
use crate::flows::engine::{
    DialogueConfig, DEFAULT_ASSISTANT_NAME, DEFAULT_CONTEXT_WINDOW, DEFAULT_MENU_PIZZA_LIMIT,
};
use crate::resolver::ResolverSettings;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub completion: CompletionConfig,
    pub dialogue: DialogueSettings,
    pub menu: MenuConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct CompletionConfig {
    /// Delegation is disabled when unset; off-topic messages get the canned reply.
    pub endpoint_url: Option<String>,
    pub api_key: Option<SecretString>,
    pub timeout_secs: u64,
    pub context_window: usize,
}

#[derive(Clone, Debug)]
pub struct DialogueSettings {
    pub assistant_name: String,
    pub keyword_threshold: f64,
    pub name_threshold: f64,
    pub min_query_chars: usize,
    pub menu_pizza_limit: usize,
}

#[derive(Clone, Debug)]
pub struct MenuConfig {
    /// JSON menu file; the built-in demo menu is used when unset.
    pub path: Option<PathBuf>,
    pub estimated_delivery_minutes: u32,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl LogFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Compact => "compact",
            Self::Pretty => "pretty",
            Self::Json => "json",
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub completion_endpoint_url: Option<String>,
    pub completion_api_key: Option<String>,
    pub completion_timeout_secs: Option<u64>,
    pub assistant_name: Option<String>,
    pub menu_path: Option<PathBuf>,
    pub log_level: Option<String>,
    pub log_format: Option<LogFormat>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        let resolver = ResolverSettings::default();
        Self {
            completion: CompletionConfig {
                endpoint_url: None,
                api_key: None,
                timeout_secs: 30,
                context_window: DEFAULT_CONTEXT_WINDOW,
            },
            dialogue: DialogueSettings {
                assistant_name: DEFAULT_ASSISTANT_NAME.to_string(),
                keyword_threshold: resolver.keyword_threshold,
                name_threshold: resolver.name_threshold,
                min_query_chars: resolver.min_query_chars,
                menu_pizza_limit: DEFAULT_MENU_PIZZA_LIMIT,
            },
            menu: MenuConfig {
                path: None,
                estimated_delivery_minutes: DEFAULT_ESTIMATED_DELIVERY_MINUTES,
            },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

fn secret_value(value: String) -> SecretString {
    value.into()
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("frajola.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.logging.level = config.logging.level.trim().to_ascii_lowercase();
        config.validate()?;

        Ok(config)
    }

    pub fn dialogue_config(&self) -> DialogueConfig {
        DialogueConfig {
            assistant_name: self.dialogue.assistant_name.clone(),
            resolver: ResolverSettings {
                min_query_chars: self.dialogue.min_query_chars,
                keyword_threshold: self.dialogue.keyword_threshold,
                name_threshold: self.dialogue.name_threshold,
            },
            menu_pizza_limit: self.dialogue.menu_pizza_limit,
            context_window: self.completion.context_window,
        }
    }

    pub fn completion_timeout(&self) -> Duration {
        Duration::from_secs(self.completion.timeout_secs)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(completion) = patch.completion {
            if let Some(endpoint_url) = completion.endpoint_url {
                self.completion.endpoint_url = Some(endpoint_url);
            }
            if let Some(api_key_value) = completion.api_key {
                self.completion.api_key = Some(secret_value(api_key_value));
            }
            if let Some(timeout_secs) = completion.timeout_secs {
                self.completion.timeout_secs = timeout_secs;
            }
            if let Some(context_window) = completion.context_window {
                self.completion.context_window = context_window;
            }
        }

        if let Some(dialogue) = patch.dialogue {
            if let Some(assistant_name) = dialogue.assistant_name {
                self.dialogue.assistant_name = assistant_name;
            }
            if let Some(keyword_threshold) = dialogue.keyword_threshold {
                self.dialogue.keyword_threshold = keyword_threshold;
            }
            if let Some(name_threshold) = dialogue.name_threshold {
                self.dialogue.name_threshold = name_threshold;
            }
            if let Some(min_query_chars) = dialogue.min_query_chars {
                self.dialogue.min_query_chars = min_query_chars;
            }
            if let Some(menu_pizza_limit) = dialogue.menu_pizza_limit {
                self.dialogue.menu_pizza_limit = menu_pizza_limit;
            }
        }

        if let Some(menu) = patch.menu {
            if let Some(path) = menu.path {
                self.menu.path = Some(path);
            }
            if let Some(minutes) = menu.estimated_delivery_minutes {
                self.menu.estimated_delivery_minutes = minutes;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("FRAJOLA_COMPLETION_ENDPOINT_URL") {
            self.completion.endpoint_url = Some(value);
        }
        if let Some(value) = read_env("FRAJOLA_COMPLETION_API_KEY") {
            self.completion.api_key = Some(secret_value(value));
        }
        if let Some(value) = read_env("FRAJOLA_COMPLETION_TIMEOUT_SECS") {
            self.completion.timeout_secs = parse_u64("FRAJOLA_COMPLETION_TIMEOUT_SECS", &value)?;
        }
        if let Some(value) = read_env("FRAJOLA_COMPLETION_CONTEXT_WINDOW") {
            self.completion.context_window =
                parse_usize("FRAJOLA_COMPLETION_CONTEXT_WINDOW", &value)?;
        }

        if let Some(value) = read_env("FRAJOLA_DIALOGUE_ASSISTANT_NAME") {
            self.dialogue.assistant_name = value;
        }
        if let Some(value) = read_env("FRAJOLA_DIALOGUE_KEYWORD_THRESHOLD") {
            self.dialogue.keyword_threshold =
                parse_f64("FRAJOLA_DIALOGUE_KEYWORD_THRESHOLD", &value)?;
        }
        if let Some(value) = read_env("FRAJOLA_DIALOGUE_NAME_THRESHOLD") {
            self.dialogue.name_threshold = parse_f64("FRAJOLA_DIALOGUE_NAME_THRESHOLD", &value)?;
        }
        if let Some(value) = read_env("FRAJOLA_DIALOGUE_MIN_QUERY_CHARS") {
            self.dialogue.min_query_chars =
                parse_usize("FRAJOLA_DIALOGUE_MIN_QUERY_CHARS", &value)?;
        }
        if let Some(value) = read_env("FRAJOLA_DIALOGUE_MENU_PIZZA_LIMIT") {
            self.dialogue.menu_pizza_limit =
                parse_usize("FRAJOLA_DIALOGUE_MENU_PIZZA_LIMIT", &value)?;
        }

        if let Some(value) = read_env("FRAJOLA_MENU_PATH") {
            self.menu.path = Some(PathBuf::from(value));
        }
        if let Some(value) = read_env("FRAJOLA_MENU_ESTIMATED_DELIVERY_MINUTES") {
            self.menu.estimated_delivery_minutes =
                parse_u32("FRAJOLA_MENU_ESTIMATED_DELIVERY_MINUTES", &value)?;
        }

        let log_level =
            read_env("FRAJOLA_LOGGING_LEVEL").or_else(|| read_env("FRAJOLA_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("FRAJOLA_LOGGING_FORMAT").or_else(|| read_env("FRAJOLA_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(endpoint_url) = overrides.completion_endpoint_url {
            self.completion.endpoint_url = Some(endpoint_url);
        }
        if let Some(api_key) = overrides.completion_api_key {
            self.completion.api_key = Some(secret_value(api_key));
        }
        if let Some(timeout_secs) = overrides.completion_timeout_secs {
            self.completion.timeout_secs = timeout_secs;
        }
        if let Some(assistant_name) = overrides.assistant_name {
            self.dialogue.assistant_name = assistant_name;
        }
        if let Some(menu_path) = overrides.menu_path {
            self.menu.path = Some(menu_path);
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
        if let Some(log_format) = overrides.log_format {
            self.logging.format = log_format;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_completion(&self.completion)?;
        validate_dialogue(&self.dialogue)?;
        validate_menu(&self.menu)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("frajola.toml"), PathBuf::from("config/frajola.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn validate_completion(completion: &CompletionConfig) -> Result<(), ConfigError> {
    if let Some(url) = &completion.endpoint_url {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ConfigError::Validation(
                "completion.endpoint_url must start with http:// or https://".to_string(),
            ));
        }
    }

    if completion.timeout_secs == 0 || completion.timeout_secs > 120 {
        return Err(ConfigError::Validation(
            "completion.timeout_secs must be in range 1..=120".to_string(),
        ));
    }

    if completion.context_window == 0 || completion.context_window > 20 {
        return Err(ConfigError::Validation(
            "completion.context_window must be in range 1..=20".to_string(),
        ));
    }

    Ok(())
}

fn validate_dialogue(dialogue: &DialogueSettings) -> Result<(), ConfigError> {
    if dialogue.assistant_name.trim().is_empty() {
        return Err(ConfigError::Validation(
            "dialogue.assistant_name must not be empty".to_string(),
        ));
    }

    for (key, value) in [
        ("dialogue.keyword_threshold", dialogue.keyword_threshold),
        ("dialogue.name_threshold", dialogue.name_threshold),
    ] {
        if !(value > 0.0 && value <= 1.0) {
            return Err(ConfigError::Validation(format!("{key} must be in range (0, 1]")));
        }
    }

    if dialogue.min_query_chars == 0 {
        return Err(ConfigError::Validation(
            "dialogue.min_query_chars must be greater than zero".to_string(),
        ));
    }

    if dialogue.menu_pizza_limit == 0 {
        return Err(ConfigError::Validation(
            "dialogue.menu_pizza_limit must be greater than zero".to_string(),
        ));
    }

    Ok(())
}

fn validate_menu(menu: &MenuConfig) -> Result<(), ConfigError> {
    if menu.estimated_delivery_minutes == 0 || menu.estimated_delivery_minutes > 240 {
        return Err(ConfigError::Validation(
            "menu.estimated_delivery_minutes must be in range 1..=240".to_string(),
        ));
    }

    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn invalid_env(key: &str, value: &str) -> ConfigError {
    ConfigError::InvalidEnvOverride { key: key.to_string(), value: value.to_string() }
}

fn parse_u32(key: &str, value: &str) -> Result<u32, ConfigError> {
    value.parse::<u32>().map_err(|_| invalid_env(key, value))
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.parse::<u64>().map_err(|_| invalid_env(key, value))
}

fn parse_usize(key: &str, value: &str) -> Result<usize, ConfigError> {
    value.parse::<usize>().map_err(|_| invalid_env(key, value))
}

fn parse_f64(key: &str, value: &str) -> Result<f64, ConfigError> {
    value.parse::<f64>().map_err(|_| invalid_env(key, value))
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    completion: Option<CompletionPatch>,
    dialogue: Option<DialoguePatch>,
    menu: Option<MenuPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct CompletionPatch {
    endpoint_url: Option<String>,
    api_key: Option<String>,
    timeout_secs: Option<u64>,
    context_window: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
struct DialoguePatch {
    assistant_name: Option<String>,
    keyword_threshold: Option<f64>,
    name_threshold: Option<f64>,
    min_query_chars: Option<usize>,
    menu_pizza_limit: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
struct MenuPatch {
    path: Option<PathBuf>,
    estimated_delivery_minutes: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}
