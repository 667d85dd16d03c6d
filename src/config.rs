use serde::Deserialize;
use std::env;
use std::sync::OnceLock;
use thiserror::Error;

/// Default OpenAI-compatible endpoint used for page summaries.
pub const DEFAULT_SUMMARIZATION_BASE_URL: &str = "https://api.groq.com/openai/v1";
/// Default chat model used for every page of every document.
pub const DEFAULT_SUMMARIZATION_MODEL: &str = "llama-3.1-8b-instant";
/// Render resolution handed to the rasterizer before OCR.
pub const DEFAULT_OCR_DPI: u32 = 300;
const DEFAULT_MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Errors encountered while loading configuration from environment variables.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required environment variable was not provided.
    #[error("Missing environment variable: {0}")]
    MissingVariable(String),
    /// Environment variable contained a value that could not be parsed.
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

/// Runtime configuration for the summarizer.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Credential for the chat-completions provider. Absence is not fatal at load time; every
    /// page summary then reports the missing credential inline.
    pub groq_api_key: Option<String>,
    /// Base URL of the OpenAI-compatible API (without the `/chat/completions` suffix).
    pub summarization_base_url: String,
    /// Model identifier sent with every request.
    pub summarization_model: String,
    /// OCR fallback settings for pages without a text layer.
    pub ocr: OcrConfig,
    /// Optional override for the HTTP server port.
    pub server_port: Option<u16>,
    /// Maximum accepted request body on the HTTP surface.
    pub max_upload_bytes: usize,
}

/// Settings for the rasterize-then-recognize OCR fallback.
#[derive(Debug, Clone, Deserialize)]
pub struct OcrConfig {
    /// When false, image-only pages are treated as empty without invoking any tool.
    pub enabled: bool,
    /// Resolution used when rendering a page to an image.
    pub dpi: u32,
    /// Tesseract language pack identifier.
    pub language: String,
    /// Path or name of the `pdftoppm` executable.
    pub pdftoppm_bin: String,
    /// Path or name of the `tesseract` executable.
    pub tesseract_bin: String,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            dpi: DEFAULT_OCR_DPI,
            language: "eng".into(),
            pdftoppm_bin: "pdftoppm".into(),
            tesseract_bin: "tesseract".into(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            groq_api_key: None,
            summarization_base_url: DEFAULT_SUMMARIZATION_BASE_URL.into(),
            summarization_model: DEFAULT_SUMMARIZATION_MODEL.into(),
            ocr: OcrConfig::default(),
            server_port: None,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl Config {
    /// Load configuration from environment variables, performing validation along the way.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = OcrConfig::default();
        Ok(Self {
            groq_api_key: load_env_optional("GROQ_API_KEY"),
            summarization_base_url: load_env_optional("SUMMARIZATION_BASE_URL")
                .unwrap_or_else(|| DEFAULT_SUMMARIZATION_BASE_URL.to_string()),
            summarization_model: load_env_optional("SUMMARIZATION_MODEL")
                .unwrap_or_else(|| DEFAULT_SUMMARIZATION_MODEL.to_string()),
            ocr: OcrConfig {
                enabled: parse_optional("OCR_ENABLED", parse_bool)?.unwrap_or(defaults.enabled),
                dpi: parse_optional("OCR_DPI", |value| {
                    value.parse().ok().filter(|dpi: &u32| *dpi > 0)
                })?
                .unwrap_or(defaults.dpi),
                language: load_env_optional("OCR_LANGUAGE").unwrap_or(defaults.language),
                pdftoppm_bin: load_env_optional("PDFTOPPM_BIN").unwrap_or(defaults.pdftoppm_bin),
                tesseract_bin: load_env_optional("TESSERACT_BIN")
                    .unwrap_or(defaults.tesseract_bin),
            },
            server_port: parse_optional("SERVER_PORT", |value| value.parse().ok())?,
            max_upload_bytes: parse_optional("MAX_UPLOAD_BYTES", |value| value.parse().ok())?
                .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
        })
    }

    /// Return the API credential, failing when none was configured.
    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        self.groq_api_key
            .as_deref()
            .ok_or_else(|| ConfigError::MissingVariable("GROQ_API_KEY".into()))
    }
}

fn load_env_optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_optional<T>(
    key: &str,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<Option<T>, ConfigError> {
    load_env_optional(key)
        .map(|value| parse(value.trim()).ok_or_else(|| ConfigError::InvalidValue(key.to_string())))
        .transpose()
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Global configuration cache populated during process start.
pub static CONFIG: OnceLock<Config> = OnceLock::new();

/// Load configuration from the environment and install it in the global cache.
pub fn init_config() -> Result<&'static Config, ConfigError> {
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;
    tracing::debug!(
        base_url = %config.summarization_base_url,
        model = %config.summarization_model,
        api_key_present = config.groq_api_key.is_some(),
        ocr_enabled = config.ocr.enabled,
        ocr_dpi = config.ocr.dpi,
        server_port = ?config.server_port,
        "Loaded configuration"
    );
    Ok(CONFIG.get_or_init(|| config))
}
