//! Global settings loaded from TOML.
//!
//! - `init_custom(toml_content)` sets a custom TOML before first `settings()` call
//! - `settings()` returns `&'static Settings` (lazy-init singleton)
//! - Default values are embedded via `include_str!("default_settings.toml")`

use std::sync::OnceLock;

use serde::Deserialize;

pub const DEFAULT_SETTINGS_TOML: &str = include_str!("default_settings.toml");

/// Smallest accepted `codec.buffer_size`.
pub const MIN_BUFFER_SIZE: usize = 16;

static CUSTOM_TOML: OnceLock<String> = OnceLock::new();

/// Set custom TOML before first `settings()` call.
pub fn init_custom(toml_content: String) -> Result<(), SettingsError> {
    parse_settings_toml(&toml_content)?;
    CUSTOM_TOML
        .set(toml_content)
        .map_err(|_| SettingsError::AlreadyInitialized)
}

/// Get or initialize the global settings singleton.
pub fn settings() -> &'static Settings {
    static INSTANCE: OnceLock<Settings> = OnceLock::new();
    INSTANCE.get_or_init(|| {
        let toml_str = CUSTOM_TOML
            .get()
            .map(|s| s.as_str())
            .unwrap_or(DEFAULT_SETTINGS_TOML);
        parse_settings_toml(toml_str).expect("settings TOML must be valid")
    })
}

/// Returns the embedded default settings TOML content.
pub fn default_toml() -> &'static str {
    DEFAULT_SETTINGS_TOML
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("TOML parse error: {0}")]
    Parse(String),
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
    #[error("settings already initialized")]
    AlreadyInitialized,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub completion: CompletionSettings,
    pub storage: StorageSettings,
    pub codec: CodecSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CompletionSettings {
    pub max_suggestions: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    pub dict_file: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CodecSettings {
    pub buffer_size: usize,
}

pub fn parse_settings_toml(toml_str: &str) -> Result<Settings, SettingsError> {
    let s: Settings = toml::from_str(toml_str).map_err(|e| SettingsError::Parse(e.to_string()))?;
    validate(&s)?;
    Ok(s)
}

fn validate(s: &Settings) -> Result<(), SettingsError> {
    if s.completion.max_suggestions == 0 {
        return Err(SettingsError::InvalidValue {
            field: "completion.max_suggestions".to_string(),
            reason: "must be positive".to_string(),
        });
    }
    if s.storage.dict_file.is_empty() {
        return Err(SettingsError::InvalidValue {
            field: "storage.dict_file".to_string(),
            reason: "must not be empty".to_string(),
        });
    }
    if s.codec.buffer_size < MIN_BUFFER_SIZE {
        return Err(SettingsError::InvalidValue {
            field: "codec.buffer_size".to_string(),
            reason: format!("must be at least {MIN_BUFFER_SIZE}"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_default_toml() {
        let s = parse_settings_toml(DEFAULT_SETTINGS_TOML).unwrap();
        assert_eq!(s.completion.max_suggestions, 10);
        assert_eq!(s.storage.dict_file, "dict.hdc");
        assert_eq!(s.codec.buffer_size, 1024);
    }

    #[test]
    fn parse_valid_custom_toml() {
        let toml = r#"
[completion]
max_suggestions = 3

[storage]
dict_file = "/tmp/words.hdc"

[codec]
buffer_size = 4096
"#;
        let s = parse_settings_toml(toml).unwrap();
        assert_eq!(s.completion.max_suggestions, 3);
        assert_eq!(s.storage.dict_file, "/tmp/words.hdc");
        assert_eq!(s.codec.buffer_size, 4096);
    }

    #[test]
    fn error_zero_suggestions() {
        let toml = r#"
[completion]
max_suggestions = 0

[storage]
dict_file = "dict.hdc"

[codec]
buffer_size = 1024
"#;
        let err = parse_settings_toml(toml).unwrap_err();
        assert!(matches!(err, SettingsError::InvalidValue { .. }));
        assert!(err.to_string().contains("completion.max_suggestions"));
    }

    #[test]
    fn error_small_buffer() {
        let toml = r#"
[completion]
max_suggestions = 10

[storage]
dict_file = "dict.hdc"

[codec]
buffer_size = 8
"#;
        let err = parse_settings_toml(toml).unwrap_err();
        assert!(err.to_string().contains("codec.buffer_size"));
    }

    #[test]
    fn error_empty_dict_file() {
        let toml = r#"
[completion]
max_suggestions = 10

[storage]
dict_file = ""

[codec]
buffer_size = 1024
"#;
        let err = parse_settings_toml(toml).unwrap_err();
        assert!(err.to_string().contains("storage.dict_file"));
    }

    #[test]
    fn error_invalid_toml() {
        let err = parse_settings_toml("not valid toml {{{").unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }

    #[test]
    fn error_missing_section() {
        let toml = r#"
[completion]
max_suggestions = 10
"#;
        let err = parse_settings_toml(toml).unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }
}
