use std::path::PathBuf;

/// Service configuration resolved from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    /// Port the HTTP server binds to.
    pub port: u16,
    /// Location of the persisted scoring-rules artifact.
    pub rules_path: PathBuf,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?,
            rules_path: std::env::var("RULES_PATH")
                .map_err(|_| ())
                .and_then(|p| if p.trim().is_empty() { Err(()) } else { Ok(p) })
                .unwrap_or_else(|_| "rules.json".to_string())
                .into(),
        };

        tracing::info!("Configuration loaded successfully");
        tracing::debug!("Server port: {}", config.port);
        tracing::debug!("Rules artifact: {}", config.rules_path.display());

        Ok(config)
    }
}
