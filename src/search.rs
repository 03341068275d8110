//! Search-as-you-type over the recipe API with client-side ordering.

use icu_collator::{Collator, CollatorOptions};
use log::{debug, error, info, warn};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::debounce::Debouncer;
use crate::gateway::RecipeGateway;
use crate::model::{Recipe, SortKey, SortOrder};
use crate::navigator::ListContext;

/// State shared with the debounced search task.
#[derive(Debug, Default)]
struct SearchState {
    query: String,
    /// Bumped on every query change; a search only publishes its results
    /// while its generation is still the latest.
    generation: u64,
    loading: bool,
    fetched: Vec<Recipe>,
}

fn lock(state: &Mutex<SearchState>) -> MutexGuard<'_, SearchState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

pub struct SearchController {
    gateway: Arc<dyn RecipeGateway>,
    state: Arc<Mutex<SearchState>>,
    sort_by: SortKey,
    sort_order: SortOrder,
    debouncer: Debouncer,
}

impl SearchController {
    pub fn new(gateway: Arc<dyn RecipeGateway>, debounce: Duration) -> Self {
        Self {
            gateway,
            state: Arc::new(Mutex::new(SearchState::default())),
            sort_by: SortKey::default(),
            sort_order: SortOrder::default(),
            debouncer: Debouncer::new(debounce),
        }
    }

    /// Replace the query and (re)start the quiet interval.
    ///
    /// A blank query clears the results straight away without a request.
    /// Setting the query it already holds does nothing.
    pub fn set_query(&mut self, query: impl Into<String>) {
        let query: String = query.into();
        let blank = query.trim().is_empty();

        let generation = {
            let mut state = lock(&self.state);
            if state.query == query {
                debug!("Query '{}' unchanged", query);
                return;
            }
            state.query = query.clone();
            state.generation += 1;
            // Any running search is aborted below
            state.loading = false;
            if blank {
                state.fetched.clear();
            }
            state.generation
        };

        if blank {
            debug!("Query cleared");
            self.debouncer.cancel();
            return;
        }

        let gateway = self.gateway.clone();
        let state = self.state.clone();
        self.debouncer
            .schedule(run_search(gateway, state, query, generation));
    }

    pub fn set_sort_by(&mut self, key: SortKey) {
        self.sort_by = key;
    }

    pub fn set_sort_order(&mut self, order: SortOrder) {
        self.sort_order = order;
    }

    pub fn query(&self) -> String {
        lock(&self.state).query.clone()
    }

    pub fn sort_by(&self) -> SortKey {
        self.sort_by
    }

    pub fn sort_order(&self) -> SortOrder {
        self.sort_order
    }

    pub fn is_loading(&self) -> bool {
        lock(&self.state).loading
    }

    /// True while a search is waiting out the quiet interval or in flight.
    pub fn is_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// The fetched results in the current sort order, as a fresh list.
    pub fn results(&self) -> Vec<Recipe> {
        let state = lock(&self.state);
        sort_recipes(&state.fetched, self.sort_by, self.sort_order)
    }

    /// Whether the view should say nothing matched the query.
    pub fn show_no_results(&self) -> bool {
        let state = lock(&self.state);
        !state.loading && !state.query.trim().is_empty() && state.fetched.is_empty()
    }

    /// The visible list, captured for the detail navigator.
    pub fn list_context(&self) -> ListContext {
        ListContext::from(self.results())
    }

    /// Wait until the pending search, if any, has published its results.
    pub async fn settle(&mut self) {
        self.debouncer.settle().await;
    }
}

async fn run_search(
    gateway: Arc<dyn RecipeGateway>,
    state: Arc<Mutex<SearchState>>,
    query: String,
    generation: u64,
) {
    {
        let mut state = lock(&state);
        if state.generation != generation {
            return;
        }
        state.loading = true;
    }

    debug!("Searching for '{}'", query);
    let outcome = gateway.search_by_name(&query).await;

    let mut state = lock(&state);
    if state.generation != generation {
        warn!("Discarding stale results for '{}'", query);
        return;
    }
    match outcome {
        Ok(recipes) => {
            info!("Search for '{}' returned {} recipes", query, recipes.len());
            state.fetched = recipes;
        }
        Err(e) => {
            error!("Error fetching search results for '{}': {}", query, e);
            state.fetched.clear();
        }
    }
    state.loading = false;
}

/// Stable sort of `recipes` by `key` using Unicode collation (root locale).
/// Descending is the exact reverse of ascending. The input is left untouched.
pub fn sort_recipes(recipes: &[Recipe], key: SortKey, order: SortOrder) -> Vec<Recipe> {
    let mut sorted = recipes.to_vec();
    match Collator::try_new(&Default::default(), CollatorOptions::new()) {
        Ok(collator) => {
            sorted.sort_by(|a, b| collator.compare(a.sort_field(key), b.sort_field(key)))
        }
        Err(e) => {
            warn!("Collation unavailable ({}), ordering by lowercase text", e);
            sorted.sort_by_cached_key(|recipe| recipe.sort_field(key).to_lowercase());
        }
    }
    if order == SortOrder::Descending {
        sorted.reverse();
    }
    sorted
}
