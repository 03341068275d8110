use async_trait::async_trait;
use log::debug;
use reqwest::Client;

use crate::config::BrowserConfig;
use crate::error::BrowserError;
use crate::gateway::RecipeGateway;
use crate::model::{MealEnvelope, Recipe};

/// [`RecipeGateway`] backed by TheMealDB's JSON API.
pub struct MealDbGateway {
    client: Client,
    base_url: String,
}

impl MealDbGateway {
    pub fn new(config: &BrowserConfig) -> Result<Self, BrowserError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    #[doc(hidden)]
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        MealDbGateway {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn get(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
    ) -> Result<MealEnvelope, BrowserError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        debug!("GET {} {:?}", url, query);

        let response = self.client.get(&url).query(query).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(BrowserError::Status {
                status: status.as_u16(),
                url,
            });
        }

        // TheMealDB answers some misses with an empty body rather than {"meals": null}
        let body = response.text().await?;
        if body.trim().is_empty() {
            return Ok(MealEnvelope::default());
        }
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl RecipeGateway for MealDbGateway {
    async fn search_by_name(&self, text: &str) -> Result<Vec<Recipe>, BrowserError> {
        let envelope = self.get("search.php", &[("s", text)]).await?;
        Ok(envelope.into_recipes())
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<Recipe>, BrowserError> {
        let envelope = self.get("lookup.php", &[("i", id)]).await?;
        Ok(envelope.into_recipes().into_iter().next())
    }

    async fn list_categories(&self) -> Result<Vec<String>, BrowserError> {
        let envelope = self.get("list.php", &[("c", "list")]).await?;
        Ok(envelope.into_names("strCategory"))
    }

    async fn list_areas(&self) -> Result<Vec<String>, BrowserError> {
        let envelope = self.get("list.php", &[("a", "list")]).await?;
        Ok(envelope.into_names("strArea"))
    }
}
