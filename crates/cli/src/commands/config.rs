use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use frajola_core::config::AppConfig;
use secrecy::ExposeSecret;
use toml::Value;

use super::{load_config, CommandResult};

const COMMAND: &str = "config";

pub fn run() -> CommandResult {
    let config = match load_config(COMMAND) {
        Ok(config) => config,
        Err(result) => return result,
    };

    let config_file_path = detect_config_path();
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];
    for (key, value, env_keys) in effective_values(&config) {
        let source =
            field_source(key, env_keys, config_file_doc.as_ref(), config_file_path.as_deref());
        lines.push(render_line(key, &value, source));
    }

    CommandResult { exit_code: 0, output: lines.join("\n") }
}

type Entry = (&'static str, String, &'static [&'static str]);

fn effective_values(config: &AppConfig) -> Vec<Entry> {
    let completion = &config.completion;
    let dialogue = &config.dialogue;
    let api_key = completion.api_key.as_ref().map(|key| redact_token(key.expose_secret()));

    vec![
        entry(
            "completion.endpoint_url",
            completion.endpoint_url.clone().unwrap_or_else(|| "<unset>".to_string()),
            &["FRAJOLA_COMPLETION_ENDPOINT_URL"],
        ),
        entry(
            "completion.api_key",
            api_key.unwrap_or_else(|| "<unset>".to_string()),
            &["FRAJOLA_COMPLETION_API_KEY"],
        ),
        entry(
            "completion.timeout_secs",
            completion.timeout_secs.to_string(),
            &["FRAJOLA_COMPLETION_TIMEOUT_SECS"],
        ),
        entry(
            "completion.context_window",
            completion.context_window.to_string(),
            &["FRAJOLA_COMPLETION_CONTEXT_WINDOW"],
        ),
        entry(
            "dialogue.assistant_name",
            dialogue.assistant_name.clone(),
            &["FRAJOLA_DIALOGUE_ASSISTANT_NAME"],
        ),
        entry(
            "dialogue.keyword_threshold",
            dialogue.keyword_threshold.to_string(),
            &["FRAJOLA_DIALOGUE_KEYWORD_THRESHOLD"],
        ),
        entry(
            "dialogue.name_threshold",
            dialogue.name_threshold.to_string(),
            &["FRAJOLA_DIALOGUE_NAME_THRESHOLD"],
        ),
        entry(
            "dialogue.min_query_chars",
            dialogue.min_query_chars.to_string(),
            &["FRAJOLA_DIALOGUE_MIN_QUERY_CHARS"],
        ),
        entry(
            "dialogue.menu_pizza_limit",
            dialogue.menu_pizza_limit.to_string(),
            &["FRAJOLA_DIALOGUE_MENU_PIZZA_LIMIT"],
        ),
        entry(
            "menu.path",
            config
                .menu
                .path
                .as_ref()
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "<built-in demo menu>".to_string()),
            &["FRAJOLA_MENU_PATH"],
        ),
        entry(
            "menu.estimated_delivery_minutes",
            config.menu.estimated_delivery_minutes.to_string(),
            &["FRAJOLA_MENU_ESTIMATED_DELIVERY_MINUTES"],
        ),
        entry(
            "logging.level",
            config.logging.level.clone(),
            &["FRAJOLA_LOGGING_LEVEL", "FRAJOLA_LOG_LEVEL"],
        ),
        entry(
            "logging.format",
            config.logging.format.as_str().to_string(),
            &["FRAJOLA_LOGGING_FORMAT", "FRAJOLA_LOG_FORMAT"],
        ),
    ]
}

fn entry(key: &'static str, value: String, env_keys: &'static [&'static str]) -> Entry {
    (key, value, env_keys)
}

fn detect_config_path() -> Option<PathBuf> {
    [PathBuf::from("frajola.toml"), PathBuf::from("config/frajola.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = env_keys.iter().find(|key| env::var_os(key).is_some()) {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}

/// Keeps a recognizable `sk-`-style prefix and hides the rest.
fn redact_token(token: &str) -> String {
    let trimmed = token.trim();
    if trimmed.is_empty() {
        return "<empty>".to_string();
    }

    if let Some((prefix, _)) = trimmed.split_once('-') {
        return format!("{prefix}-***");
    }

    "<redacted>".to_string()
}

#[cfg(test)]
mod tests {
    use toml::Value;

    use super::{contains_path, redact_token};

    #[test]
    fn redaction_keeps_only_the_prefix() {
        assert_eq!(redact_token("sk-live-abc123"), "sk-***");
        assert_eq!(redact_token("abc123"), "<redacted>");
        assert_eq!(redact_token("   "), "<empty>");
    }

    #[test]
    fn nested_key_paths_are_found_in_the_file_document() {
        let doc: Value = "[dialogue]\nassistant_name = \"Mia\"\n".parse().expect("valid toml");
        assert!(contains_path(&doc, "dialogue.assistant_name"));
        assert!(!contains_path(&doc, "dialogue.name_threshold"));
        assert!(!contains_path(&doc, "menu.path"));
    }
}
