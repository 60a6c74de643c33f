use dotenv::dotenv;
use std::env;

const DEFAULT_JWT_SECRET: &str = "development-only-secret-change-me";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub server_host: String,
    pub server_port: u16,
    pub max_connections: u32,
    pub app_env: String,
    pub cors_allowed_origin: Option<String>,
    pub llm: LlmSettings,
}

/// Settings for the hosted completion endpoint
#[derive(Debug, Clone)]
pub struct LlmSettings {
    /// Read from the environment only, never compiled in
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.groq.com/openai/v1".to_string(),
            model: "llama-3.3-70b-versatile".to_string(),
            timeout_secs: 60,
        }
    }
}

impl Config {
    /// Loads the configuration from environment variables.
    /// Calls dotenv() so a local `.env` file is honoured.
    pub fn from_env() -> Result<Self, String> {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://algorithms.db?mode=rwc".to_string());

        let app_env = env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        let jwt_secret = Self::resolve_jwt_secret(
            env::var("JWT_SECRET").ok(),
            app_env.eq_ignore_ascii_case("production"),
        )?;

        let server_host = env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let server_port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| "Invalid SERVER_PORT: must be a number between 0-65535".to_string())?;

        let max_connections = env::var("MAX_DB_CONNECTIONS")
            .unwrap_or_else(|_| "10".to_string())
            .parse::<u32>()
            .map_err(|_| "Invalid MAX_DB_CONNECTIONS: must be a positive number".to_string())?;

        let cors_allowed_origin = env::var("CORS_ALLOWED_ORIGIN")
            .ok()
            .filter(|origin| !origin.trim().is_empty());

        let defaults = LlmSettings::default();
        let llm = LlmSettings {
            api_key: env::var("GROQ_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty()),
            base_url: env::var("GROQ_BASE_URL").unwrap_or(defaults.base_url),
            model: env::var("GROQ_MODEL").unwrap_or(defaults.model),
            timeout_secs: env::var("LLM_TIMEOUT_SECS")
                .unwrap_or_else(|_| defaults.timeout_secs.to_string())
                .parse::<u64>()
                .map_err(|_| "Invalid LLM_TIMEOUT_SECS: must be a positive number".to_string())?,
        };

        Ok(Config {
            database_url,
            jwt_secret,
            server_host,
            server_port,
            max_connections,
            app_env,
            cors_allowed_origin,
            llm,
        })
    }

    /// The built-in development secret is refused in production, where it
    /// would let anyone forge tokens
    fn resolve_jwt_secret(secret: Option<String>, production: bool) -> Result<String, String> {
        match secret.filter(|s| !s.trim().is_empty()) {
            Some(secret) => Ok(secret),
            None if production => {
                Err("JWT_SECRET must be set when APP_ENV=production".to_string())
            }
            None => {
                eprintln!("WARNING: JWT_SECRET not set, using default (not secure for production!)");
                Ok(DEFAULT_JWT_SECRET.to_string())
            }
        }
    }

    pub fn is_production(&self) -> bool {
        self.app_env.eq_ignore_ascii_case("production")
    }

    /// Logs the configuration with secrets hidden
    pub fn print_info(&self) {
        tracing::info!("Environment: {}", self.app_env);
        tracing::info!("Server address: {}:{}", self.server_host, self.server_port);
        tracing::info!("Database: {}", Self::mask_url(&self.database_url));
        tracing::info!("Max DB connections: {}", self.max_connections);
        tracing::info!(
            "JWT secret: {}",
            if self.jwt_secret == DEFAULT_JWT_SECRET {
                "USING DEFAULT (INSECURE!)"
            } else {
                "custom secret configured"
            }
        );
        tracing::info!(
            "Completion API: {} model={} key={}",
            self.llm.base_url,
            self.llm.model,
            if self.llm.api_key.is_some() {
                "configured"
            } else {
                "MISSING (generation endpoints will answer 503)"
            }
        );
    }

    /// Masks credentials embedded in a connection url
    fn mask_url(url: &str) -> String {
        if let Some(at_pos) = url.find('@') {
            if let Some(scheme_end) = url.find("://") {
                let scheme = &url[..scheme_end + 3];
                let after_at = &url[at_pos..];
                return format!("{}***{}", scheme, after_at);
            }
        }
        url.split('?').next().unwrap_or_default().to_string()
    }
}
