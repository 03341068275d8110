mod mealdb;

pub use mealdb::MealDbGateway;

use async_trait::async_trait;

use crate::error::BrowserError;
use crate::model::Recipe;

/// Read-only lookups against the remote recipe API.
///
/// Every call may fail with a transport or parse error. Absence is not an
/// error: searches return an empty list and lookups return `None`.
#[async_trait]
pub trait RecipeGateway: Send + Sync {
    /// Recipes whose name matches `text`. Summary records.
    async fn search_by_name(&self, text: &str) -> Result<Vec<Recipe>, BrowserError>;

    /// Full recipe, including ingredients and instructions.
    async fn get_by_id(&self, id: &str) -> Result<Option<Recipe>, BrowserError>;

    async fn list_categories(&self) -> Result<Vec<String>, BrowserError>;

    async fn list_areas(&self) -> Result<Vec<String>, BrowserError>;
}

#[cfg(test)]
pub(crate) mod fake;
