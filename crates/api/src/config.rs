use cardex_core::design_patch::{validate_batch_size, DEFAULT_BATCH_SIZE};

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Time allowed for in-flight requests to drain on shutdown (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// Cards updated concurrently per design patch batch (default: `20`).
    pub design_patch_batch_size: usize,
    /// Validation settings for tokens issued by the auth provider.
    pub jwt: JwtConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                   | Default                    |
    /// |---------------------------|----------------------------|
    /// | `HOST`                    | `0.0.0.0`                  |
    /// | `PORT`                    | `3000`                     |
    /// | `CORS_ORIGINS`            | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`    | `30`                       |
    /// | `SHUTDOWN_TIMEOUT_SECS`   | `30`                       |
    /// | `DESIGN_PATCH_BATCH_SIZE` | `20`                       |
    ///
    /// # Panics
    ///
    /// Panics on unparsable or out-of-range values, so misconfiguration fails
    /// at startup.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let design_patch_batch_size = parse_batch_size(
            &std::env::var("DESIGN_PATCH_BATCH_SIZE")
                .unwrap_or_else(|_| DEFAULT_BATCH_SIZE.to_string()),
        )
        .unwrap_or_else(|e| panic!("Invalid DESIGN_PATCH_BATCH_SIZE: {e}"));

        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            design_patch_batch_size,
            jwt,
        }
    }
}

/// Parse a design patch batch size and check it is within the allowed range.
fn parse_batch_size(raw: &str) -> Result<usize, String> {
    let size: usize = raw
        .trim()
        .parse()
        .map_err(|_| format!("expected a positive integer, got {raw:?}"))?;
    validate_batch_size(size).map_err(|e| e.to_string())?;
    Ok(size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardex_core::design_patch::MAX_BATCH_SIZE;

    #[test]
    fn batch_size_accepts_range() {
        assert_eq!(parse_batch_size("1"), Ok(1));
        assert_eq!(parse_batch_size(" 50 "), Ok(50));
        assert_eq!(parse_batch_size(&MAX_BATCH_SIZE.to_string()), Ok(MAX_BATCH_SIZE));
    }

    #[test]
    fn batch_size_rejects_zero_and_oversized() {
        assert!(parse_batch_size("0").unwrap_err().contains("between 1 and"));
        let too_big = (MAX_BATCH_SIZE + 1).to_string();
        assert!(parse_batch_size(&too_big).unwrap_err().contains("between 1 and"));
    }

    #[test]
    fn batch_size_rejects_non_numbers() {
        assert!(parse_batch_size("twenty").unwrap_err().contains("positive integer"));
        assert!(parse_batch_size("-5").is_err());
    }
}
