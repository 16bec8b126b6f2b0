use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
}

/// Credentials and connection settings for the Edamam Recipe Search API.
#[derive(Debug, Clone, Deserialize)]
pub struct EdamamConfig {
    pub app_id: String,
    pub app_key: String,
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub edamam: EdamamConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
        };
        let edamam = EdamamConfig {
            app_id: std::env::var("EDAMAM_API_APP_ID")?,
            app_key: std::env::var("EDAMAM_API_APP_KEY")?,
            base_url: std::env::var("EDAMAM_API_BASE_URL")
                .unwrap_or_else(|_| "https://api.edamam.com/api".into()),
            timeout_secs: std::env::var("EDAMAM_API_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(5),
        };
        Ok(Self {
            database_url,
            jwt,
            edamam,
        })
    }
}
