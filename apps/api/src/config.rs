use anyhow::{ensure, Context, Result};

/// Longest idle lifetime accepted for a session (one week).
const MAX_SESSION_TTL_MINUTES: i64 = 7 * 24 * 60;
/// Largest accepted request body, in megabytes.
const MAX_UPLOAD_MB_LIMIT: usize = 1024;

/// Application configuration loaded from environment variables.
/// Fails at startup if the model API key is missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub google_api_key: String,
    pub port: u16,
    pub rust_log: String,
    pub session_ttl_minutes: i64,
    pub max_upload_mb: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let config = Config {
            google_api_key: require_env("GOOGLE_API_KEY")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            session_ttl_minutes: std::env::var("SESSION_TTL_MINUTES")
                .unwrap_or_else(|_| "60".to_string())
                .parse::<i64>()
                .context("SESSION_TTL_MINUTES must be a whole number of minutes")?,
            max_upload_mb: std::env::var("MAX_UPLOAD_MB")
                .unwrap_or_else(|_| "20".to_string())
                .parse::<usize>()
                .context("MAX_UPLOAD_MB must be a whole number of megabytes")?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Range checks for values that are later turned into durations and byte counts.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            (1..=MAX_SESSION_TTL_MINUTES).contains(&self.session_ttl_minutes),
            "SESSION_TTL_MINUTES must be between 1 and {MAX_SESSION_TTL_MINUTES}, got {}",
            self.session_ttl_minutes
        );
        ensure!(
            (1..=MAX_UPLOAD_MB_LIMIT).contains(&self.max_upload_mb),
            "MAX_UPLOAD_MB must be between 1 and {MAX_UPLOAD_MB_LIMIT}, got {}",
            self.max_upload_mb
        );
        Ok(())
    }

    pub fn session_ttl(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.session_ttl_minutes)
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb.saturating_mul(1024 * 1024)
    }
}

fn require_env(key: &str) -> Result<String> {
    let value = std::env::var(key)
        .with_context(|| format!("Required environment variable '{key}' is not set"))?;
    if value.trim().is_empty() {
        anyhow::bail!("Required environment variable '{key}' is empty");
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(session_ttl_minutes: i64, max_upload_mb: usize) -> Config {
        Config {
            google_api_key: "test-key".to_string(),
            port: 8080,
            rust_log: "info".to_string(),
            session_ttl_minutes,
            max_upload_mb,
        }
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = config(60, 20);
        assert!(config.validate().is_ok());
        assert_eq!(config.max_upload_bytes(), 20 * 1024 * 1024);
        assert_eq!(config.session_ttl(), chrono::Duration::minutes(60));
    }

    #[test]
    fn test_session_ttl_out_of_range_is_rejected() {
        for ttl in [0, -5, MAX_SESSION_TTL_MINUTES + 1, i64::MAX] {
            let err = config(ttl, 20).validate().unwrap_err();
            assert!(err.to_string().contains("SESSION_TTL_MINUTES"), "got {err}");
        }
        assert!(config(MAX_SESSION_TTL_MINUTES, 20).validate().is_ok());
    }

    #[test]
    fn test_upload_limit_out_of_range_is_rejected() {
        for mb in [0, MAX_UPLOAD_MB_LIMIT + 1, usize::MAX] {
            let err = config(60, mb).validate().unwrap_err();
            assert!(err.to_string().contains("MAX_UPLOAD_MB"), "got {err}");
        }
        assert!(config(60, MAX_UPLOAD_MB_LIMIT).validate().is_ok());
    }
}
