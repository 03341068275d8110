//! Single-recipe detail with previous/next stepping through the list the
//! user came from.

use log::{debug, error, info};
use std::sync::Arc;

use crate::gateway::RecipeGateway;
use crate::model::Recipe;

/// The ordered list a detail view was opened from.
///
/// Captured once and shared unchanged by every step of the same navigation
/// session. Cloning is cheap.
#[derive(Debug, Clone, PartialEq)]
pub struct ListContext {
    recipes: Arc<[Recipe]>,
}

impl ListContext {
    pub fn new(recipes: Vec<Recipe>) -> Self {
        Self {
            recipes: recipes.into(),
        }
    }

    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Recipe> {
        self.recipes.get(index)
    }

    /// Position of the first recipe with identifier `id`.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.recipes.iter().position(|recipe| recipe.id == id)
    }

    /// Whether two contexts are the very same captured list.
    pub fn same_list(&self, other: &ListContext) -> bool {
        Arc::ptr_eq(&self.recipes, &other.recipes)
    }
}

impl Default for ListContext {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl From<Vec<Recipe>> for ListContext {
    fn from(recipes: Vec<Recipe>) -> Self {
        Self::new(recipes)
    }
}

/// A fully loaded recipe and its place in the list context.
#[derive(Debug, Clone)]
pub struct DetailView {
    recipe: Recipe,
    context: ListContext,
    index: usize,
}

impl DetailView {
    pub fn recipe(&self) -> &Recipe {
        &self.recipe
    }

    pub fn context(&self) -> &ListContext {
        &self.context
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.context.len()
    }

    pub fn is_empty(&self) -> bool {
        self.context.is_empty()
    }

    pub fn has_previous(&self) -> bool {
        self.index > 0
    }

    pub fn has_next(&self) -> bool {
        self.index + 1 < self.context.len()
    }

    pub fn previous_id(&self) -> Option<&str> {
        if !self.has_previous() {
            return None;
        }
        self.context.get(self.index - 1).map(|r| r.id.as_str())
    }

    pub fn next_id(&self) -> Option<&str> {
        if !self.has_next() {
            return None;
        }
        self.context.get(self.index + 1).map(|r| r.id.as_str())
    }

    /// One-based position, e.g. "2 of 3".
    pub fn position_label(&self) -> String {
        format!("{} of {}", self.index + 1, self.context.len())
    }
}

/// What the detail view shows after a lookup has finished.
#[derive(Debug, Clone)]
pub enum DetailState {
    Loaded(DetailView),
    /// The lookup found nothing; only going back is possible.
    NotFound { id: String },
}

impl DetailState {
    pub fn view(&self) -> Option<&DetailView> {
        match self {
            DetailState::Loaded(view) => Some(view),
            DetailState::NotFound { .. } => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, DetailState::NotFound { .. })
    }
}

/// Drives one detail session: the initial lookup and any previous/next steps.
pub struct DetailNavigator {
    gateway: Arc<dyn RecipeGateway>,
    state: DetailState,
}

impl DetailNavigator {
    /// Look up `id` and place it within `context`.
    ///
    /// Without a context (or with an empty one) the session is the single
    /// fetched recipe. If `id` is not in the context the index falls back to 0.
    pub async fn open(
        gateway: Arc<dyn RecipeGateway>,
        id: &str,
        context: Option<ListContext>,
    ) -> Self {
        let state = match fetch_full(gateway.as_ref(), id).await {
            Some(recipe) => {
                let (context, index) = match context.filter(|c| !c.is_empty()) {
                    Some(context) => {
                        let index = context.position(id).unwrap_or_else(|| {
                            debug!("Recipe {} not in list context, showing it first", id);
                            0
                        });
                        (context, index)
                    }
                    None => (ListContext::new(vec![recipe.clone()]), 0),
                };
                DetailState::Loaded(DetailView {
                    recipe,
                    context,
                    index,
                })
            }
            None => DetailState::NotFound { id: id.to_string() },
        };

        Self { gateway, state }
    }

    pub fn state(&self) -> &DetailState {
        &self.state
    }

    pub fn has_previous(&self) -> bool {
        self.state.view().is_some_and(DetailView::has_previous)
    }

    pub fn has_next(&self) -> bool {
        self.state.view().is_some_and(DetailView::has_next)
    }

    /// Step to the previous recipe in the same list. Returns false when
    /// there is nothing before the current one.
    pub async fn previous(&mut self) -> bool {
        let target = match self.state.view() {
            Some(view) if view.has_previous() => view.index - 1,
            _ => return false,
        };
        self.step_to(target).await;
        true
    }

    /// Step to the next recipe in the same list. Returns false at the end.
    pub async fn next(&mut self) -> bool {
        let target = match self.state.view() {
            Some(view) if view.has_next() => view.index + 1,
            _ => return false,
        };
        self.step_to(target).await;
        true
    }

    async fn step_to(&mut self, index: usize) {
        let Some(view) = self.state.view() else {
            return;
        };
        let context = view.context.clone();
        let Some(id) = context.get(index).map(|r| r.id.clone()) else {
            return;
        };

        // List entries are summaries, so every step fetches the full record
        self.state = match fetch_full(self.gateway.as_ref(), &id).await {
            Some(recipe) => DetailState::Loaded(DetailView {
                recipe,
                context,
                index,
            }),
            None => DetailState::NotFound { id },
        };
    }
}

async fn fetch_full(gateway: &dyn RecipeGateway, id: &str) -> Option<Recipe> {
    match gateway.get_by_id(id).await {
        Ok(Some(recipe)) => {
            info!("Loaded recipe {} ({})", id, recipe.name);
            Some(recipe)
        }
        Ok(None) => {
            debug!("Recipe {} not found", id);
            None
        }
        Err(e) => {
            error!("Error fetching meal details for {}: {}", id, e);
            None
        }
    }
}
