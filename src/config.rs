use once_cell::sync::Lazy;
use std::fs;

/// Secret used for JWT verification. Must be set via the `JWT_SECRET` env variable.
pub static JWT_SECRET: Lazy<String> =
    Lazy::new(|| std::env::var("JWT_SECRET").expect("JWT_SECRET must be set"));

/// Address the HTTP server should bind to. Defaults to `0.0.0.0`.
pub static BIND_ADDRESS: Lazy<String> =
    Lazy::new(|| std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0".to_string()));

/// Port the HTTP server should listen on. Defaults to `3000`.
pub static BIND_PORT: Lazy<u16> = Lazy::new(|| {
    std::env::var("BIND_PORT")
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(3000)
});

/// When set to a truthy value, allows the application to continue running even if database
/// migrations fail. Defaults to `false`.
pub static ALLOW_MIGRATION_FAILURE: Lazy<bool> = Lazy::new(|| {
    std::env::var("ALLOW_MIGRATION_FAILURE")
        .ok()
        .map(|value| {
            let normalized = value.trim().to_ascii_lowercase();
            matches!(normalized.as_str(), "1" | "true" | "yes")
        })
        .unwrap_or(false)
});

/// Base URL of the OpenAI-compatible chat completion API.
pub static TEXT_API_BASE: Lazy<String> = Lazy::new(|| {
    std::env::var("TEXT_API_BASE")
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| "https://generativelanguage.googleapis.com/v1beta/openai".to_string())
});

/// API key presented to the chat completion API.
pub static TEXT_API_KEY: Lazy<String> = Lazy::new(|| {
    read_secret_env("TEXT_API_KEY", "TEXT_API_KEY_FILE").expect("TEXT_API_KEY must be set")
});

/// Model requested for every completion. Defaults to `gemini-2.0-flash`.
pub static TEXT_MODEL: Lazy<String> =
    Lazy::new(|| std::env::var("TEXT_MODEL").unwrap_or_else(|_| "gemini-2.0-flash".to_string()));

/// Endpoint of the text-to-image synthesis API.
pub static IMAGE_SYNTH_ENDPOINT: Lazy<String> = Lazy::new(|| {
    std::env::var("IMAGE_SYNTH_ENDPOINT")
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| "https://clipdrop-api.co/text-to-image/v1".to_string())
});

/// API key presented to the text-to-image synthesis API.
pub static IMAGE_SYNTH_API_KEY: Lazy<String> = Lazy::new(|| {
    read_secret_env("IMAGE_SYNTH_API_KEY", "IMAGE_SYNTH_API_KEY_FILE")
        .expect("IMAGE_SYNTH_API_KEY must be set")
});

/// Base URL of the image vault (storage + transformation) service.
pub static IMAGE_VAULT_ADDR: Lazy<String> =
    Lazy::new(|| std::env::var("IMAGE_VAULT_ADDR").expect("IMAGE_VAULT_ADDR must be set"));

/// Bearer token presented to the image vault service.
pub static IMAGE_VAULT_TOKEN: Lazy<String> = Lazy::new(|| {
    read_secret_env("IMAGE_VAULT_TOKEN", "IMAGE_VAULT_TOKEN_FILE")
        .expect("IMAGE_VAULT_TOKEN must be set")
});

/// Base URL of the document text extraction service.
pub static DOC_EXTRACT_ADDR: Lazy<String> =
    Lazy::new(|| std::env::var("DOC_EXTRACT_ADDR").expect("DOC_EXTRACT_ADDR must be set"));

/// Bearer token presented to the document text extraction service.
pub static DOC_EXTRACT_TOKEN: Lazy<String> = Lazy::new(|| {
    read_secret_env("DOC_EXTRACT_TOKEN", "DOC_EXTRACT_TOKEN_FILE")
        .expect("DOC_EXTRACT_TOKEN must be set")
});

fn read_optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn read_secret_env(value_key: &str, file_key: &str) -> Option<String> {
    if let Some(path) = read_optional_env(file_key) {
        match fs::read_to_string(&path) {
            Ok(contents) => {
                let trimmed = contents.trim().to_string();
                if !trimmed.is_empty() {
                    return Some(trimmed);
                }
            }
            Err(err) => panic!("failed to read {file_key} from {path}: {err}"),
        }
    }

    read_optional_env(value_key)
}
