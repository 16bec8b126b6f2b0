use std::time::Duration;

use axum::async_trait;
use tracing::debug;

use crate::config::EdamamConfig;
use crate::recipes::dto::{RecipeDocument, RecipePage};

/// External recipe collaborator: either a recipe document comes back or an
/// error does; nothing here interprets the payload beyond deserializing it.
#[async_trait]
pub trait RecipeApi: Send + Sync {
    async fn search(&self, params: &[(String, String)]) -> anyhow::Result<RecipePage>;
    async fn by_id(&self, id: &str) -> anyhow::Result<RecipeDocument>;
    /// Bare search call used by the connectivity probe; returns the
    /// upstream status code without treating non-2xx as an error.
    async fn ping(&self) -> anyhow::Result<u16>;
}

pub struct EdamamClient {
    http: reqwest::Client,
    base_url: String,
    app_id: String,
    app_key: String,
}

impl EdamamClient {
    pub fn new(config: &EdamamConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            app_id: config.app_id.clone(),
            app_key: config.app_key.clone(),
        })
    }

    fn credentials(&self) -> [(&'static str, &str); 3] {
        [
            ("type", "public"),
            ("app_id", &self.app_id),
            ("app_key", &self.app_key),
        ]
    }
}

#[async_trait]
impl RecipeApi for EdamamClient {
    async fn search(&self, params: &[(String, String)]) -> anyhow::Result<RecipePage> {
        let page = self
            .http
            .get(format!("{}/recipes/v2", self.base_url))
            .query(&self.credentials())
            .query(params)
            .send()
            .await?
            .error_for_status()?
            .json::<RecipePage>()
            .await?;
        debug!(hits = page.hits.len(), "recipe search response received");
        Ok(page)
    }

    async fn by_id(&self, id: &str) -> anyhow::Result<RecipeDocument> {
        let document = self
            .http
            .get(format!("{}/recipes/v2/{id}", self.base_url))
            .query(&self.credentials())
            .send()
            .await?
            .error_for_status()?
            .json::<RecipeDocument>()
            .await?;
        Ok(document)
    }

    async fn ping(&self) -> anyhow::Result<u16> {
        let response = self
            .http
            .get(format!("{}/recipes/v2", self.base_url))
            .query(&self.credentials())
            .send()
            .await?;
        Ok(response.status().as_u16())
    }
}
