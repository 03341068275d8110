use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use crate::error::BrowserError;
use crate::gateway::RecipeGateway;
use crate::model::Recipe;

pub(crate) fn recipe(id: &str, name: &str, category: &str, area: &str) -> Recipe {
    Recipe {
        id: id.to_string(),
        name: name.to_string(),
        category: category.to_string(),
        area: area.to_string(),
        ..Default::default()
    }
}

fn unavailable(what: &str) -> BrowserError {
    BrowserError::Status {
        status: 503,
        url: what.to_string(),
    }
}

/// In-memory gateway that records every call it receives.
#[derive(Default)]
pub(crate) struct FakeGateway {
    pub recipes: Vec<Recipe>,
    pub categories: Vec<String>,
    pub areas: Vec<String>,
    pub fail_search: bool,
    pub fail_lookup: bool,
    pub fail_categories: bool,
    pub fail_areas: bool,
    /// Artificial latency per search text
    pub delays: HashMap<String, Duration>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeGateway {
    pub fn with_recipes(recipes: Vec<Recipe>) -> Self {
        Self {
            recipes,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl RecipeGateway for FakeGateway {
    async fn search_by_name(&self, text: &str) -> Result<Vec<Recipe>, BrowserError> {
        self.record(format!("search:{}", text));
        if let Some(delay) = self.delays.get(text) {
            tokio::time::sleep(*delay).await;
        }
        if self.fail_search {
            return Err(unavailable("search"));
        }
        let needle = text.to_lowercase();
        Ok(self
            .recipes
            .iter()
            .filter(|r| r.name.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<Recipe>, BrowserError> {
        self.record(format!("lookup:{}", id));
        if self.fail_lookup {
            return Err(unavailable("lookup"));
        }
        Ok(self.recipes.iter().find(|r| r.id == id).cloned())
    }

    async fn list_categories(&self) -> Result<Vec<String>, BrowserError> {
        self.record("categories".to_string());
        if self.fail_categories {
            return Err(unavailable("categories"));
        }
        Ok(self.categories.clone())
    }

    async fn list_areas(&self) -> Result<Vec<String>, BrowserError> {
        self.record("areas".to_string());
        if self.fail_areas {
            return Err(unavailable("areas"));
        }
        Ok(self.areas.clone())
    }
}
