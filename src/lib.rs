pub mod config;
pub mod debounce;
pub mod error;
pub mod filter;
pub mod gateway;
pub mod model;
pub mod navigator;
pub mod route;
pub mod search;

use std::sync::Arc;

pub use config::BrowserConfig;
pub use error::BrowserError;
pub use filter::{filter_recipes, FilterController, SelectionSet};
pub use gateway::{MealDbGateway, RecipeGateway};
pub use model::{Ingredient, Recipe, SortKey, SortOrder};
pub use navigator::{DetailNavigator, DetailState, DetailView, ListContext};
pub use route::{History, Route};
pub use search::{sort_recipes, SearchController};

/// Build the HTTP gateway described by `config`.
pub fn connect(config: &BrowserConfig) -> Result<Arc<dyn RecipeGateway>, BrowserError> {
    Ok(Arc::new(MealDbGateway::new(config)?))
}

/// One-shot search: fetch recipes matching `query` and order them.
///
/// Unlike [`SearchController`] this does not debounce and propagates
/// gateway errors. A blank query returns an empty list without a request.
pub async fn search_recipes(
    gateway: &dyn RecipeGateway,
    query: &str,
    sort_by: SortKey,
    order: SortOrder,
) -> Result<Vec<Recipe>, BrowserError> {
    if query.trim().is_empty() {
        return Ok(Vec::new());
    }
    let recipes = gateway.search_by_name(query).await?;
    Ok(sort_recipes(&recipes, sort_by, order))
}
