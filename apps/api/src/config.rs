use anyhow::{Context, Result};

pub const DEFAULT_IDENTITY_API_URL: &str = "https://identitytoolkit.googleapis.com";
pub const DEFAULT_SIGN_IN_LINK_URL: &str = "http://localhost:5173/auth";
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Object storage settings. Present only when `S3_BUCKET` is set.
#[derive(Debug, Clone)]
pub struct S3Config {
    pub bucket: String,
    pub endpoint: String,
    pub access_key_id: String,
    pub secret_access_key: String,
}

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    /// Without a database the service runs on the in-memory store.
    pub database_url: Option<String>,
    pub s3: Option<S3Config>,
    pub identity_api_url: String,
    pub identity_api_key: String,
    /// Where passwordless sign-in links return to.
    pub sign_in_link_url: String,
    pub max_upload_bytes: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let s3 = match optional_env("S3_BUCKET") {
            Some(bucket) => Some(S3Config {
                bucket,
                endpoint: require_env("S3_ENDPOINT")?,
                access_key_id: require_env("AWS_ACCESS_KEY_ID")?,
                secret_access_key: require_env("AWS_SECRET_ACCESS_KEY")?,
            }),
            None => None,
        };

        Ok(Config {
            database_url: optional_env("DATABASE_URL"),
            s3,
            identity_api_url: optional_env("IDENTITY_API_URL")
                .unwrap_or_else(|| DEFAULT_IDENTITY_API_URL.to_string()),
            identity_api_key: require_env("IDENTITY_API_KEY")?,
            sign_in_link_url: optional_env("SIGN_IN_LINK_URL")
                .unwrap_or_else(|| DEFAULT_SIGN_IN_LINK_URL.to_string()),
            max_upload_bytes: match optional_env("MAX_UPLOAD_BYTES") {
                Some(v) => v
                    .parse::<usize>()
                    .context("MAX_UPLOAD_BYTES must be a byte count")?,
                None => DEFAULT_MAX_UPLOAD_BYTES,
            },
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
impl Config {
    pub fn for_tests() -> Self {
        Config {
            database_url: None,
            s3: None,
            identity_api_url: DEFAULT_IDENTITY_API_URL.to_string(),
            identity_api_key: "test-key".to_string(),
            sign_in_link_url: DEFAULT_SIGN_IN_LINK_URL.to_string(),
            max_upload_bytes: 1024,
            port: 0,
            rust_log: "debug".to_string(),
        }
    }
}
