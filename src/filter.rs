//! Gallery filtering by category and area over an eagerly loaded collection.

use log::{debug, error, info};
use std::collections::HashSet;
use std::sync::Arc;

use crate::gateway::RecipeGateway;
use crate::model::Recipe;
use crate::navigator::ListContext;

/// A multi-select filter axis. Empty means the axis does not constrain anything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    values: HashSet<String>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `value` if absent, remove it if present. Returns whether it is now selected.
    pub fn toggle(&mut self, value: &str) -> bool {
        if self.values.remove(value) {
            false
        } else {
            self.values.insert(value.to_string());
            true
        }
    }

    pub fn contains(&self, value: &str) -> bool {
        self.values.contains(value)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    /// True when the axis is unconstrained or `value` is selected.
    pub fn admits(&self, value: &str) -> bool {
        self.is_empty() || self.contains(value)
    }

    /// Selected values in alphabetical order.
    pub fn sorted(&self) -> Vec<&str> {
        let mut values: Vec<&str> = self.values.iter().map(String::as_str).collect();
        values.sort_unstable();
        values
    }
}

impl<S: Into<String>> FromIterator<S> for SelectionSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Recipes from `base` admitted by both axes, in `base` order.
pub fn filter_recipes(
    base: &[Recipe],
    categories: &SelectionSet,
    areas: &SelectionSet,
) -> Vec<Recipe> {
    base.iter()
        .filter(|recipe| categories.admits(&recipe.category) && areas.admits(&recipe.area))
        .cloned()
        .collect()
}

#[derive(Debug, Default)]
pub struct FilterController {
    base: Vec<Recipe>,
    categories: Vec<String>,
    areas: Vec<String>,
    selected_categories: SelectionSet,
    selected_areas: SelectionSet,
    filtered: Vec<Recipe>,
}

impl FilterController {
    /// Fetch the base collection (recipes matching `seed`), the category list
    /// and the area list concurrently. A failed load leaves its part empty.
    pub async fn load(gateway: Arc<dyn RecipeGateway>, seed: &str) -> Self {
        let (recipes, categories, areas) = tokio::join!(
            gateway.search_by_name(seed),
            gateway.list_categories(),
            gateway.list_areas()
        );

        let base = recipes.unwrap_or_else(|e| {
            error!("Error fetching gallery recipes: {}", e);
            Vec::new()
        });
        let categories = categories.unwrap_or_else(|e| {
            error!("Error fetching categories: {}", e);
            Vec::new()
        });
        let areas = areas.unwrap_or_else(|e| {
            error!("Error fetching areas: {}", e);
            Vec::new()
        });

        info!(
            "Gallery loaded: {} recipes, {} categories, {} areas",
            base.len(),
            categories.len(),
            areas.len()
        );
        Self::with_base(base, categories, areas)
    }

    /// Build a controller over an already loaded collection.
    pub fn with_base(base: Vec<Recipe>, categories: Vec<String>, areas: Vec<String>) -> Self {
        let mut controller = Self {
            base,
            categories,
            areas,
            ..Default::default()
        };
        controller.recompute();
        controller
    }

    pub fn toggle_category(&mut self, category: &str) {
        let selected = self.selected_categories.toggle(category);
        debug!("Category '{}' selected: {}", category, selected);
        self.recompute();
    }

    pub fn toggle_area(&mut self, area: &str) {
        let selected = self.selected_areas.toggle(area);
        debug!("Area '{}' selected: {}", area, selected);
        self.recompute();
    }

    pub fn clear_filters(&mut self) {
        self.selected_categories.clear();
        self.selected_areas.clear();
        self.recompute();
    }

    /// Swap in a new base collection, keeping the current selections.
    pub fn set_base(&mut self, base: Vec<Recipe>) {
        self.base = base;
        self.recompute();
    }

    fn recompute(&mut self) {
        self.filtered = filter_recipes(&self.base, &self.selected_categories, &self.selected_areas);
    }

    pub fn base(&self) -> &[Recipe] {
        &self.base
    }

    /// All categories offered by the API.
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// All areas offered by the API.
    pub fn areas(&self) -> &[String] {
        &self.areas
    }

    pub fn selected_categories(&self) -> &SelectionSet {
        &self.selected_categories
    }

    pub fn selected_areas(&self) -> &SelectionSet {
        &self.selected_areas
    }

    pub fn is_category_selected(&self, category: &str) -> bool {
        self.selected_categories.contains(category)
    }

    pub fn is_area_selected(&self, area: &str) -> bool {
        self.selected_areas.contains(area)
    }

    pub fn filtered(&self) -> &[Recipe] {
        &self.filtered
    }

    pub fn list_context(&self) -> ListContext {
        ListContext::from(self.filtered.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::fake::{recipe, FakeGateway};

    fn base() -> Vec<Recipe> {
        vec![
            recipe("1", "Apple Frangipan Tart", "Dessert", "British"),
            recipe("2", "Apam balik", "Dessert", "Malaysian"),
            recipe("3", "Ayam Percik", "Chicken", "Malaysian"),
            recipe("4", "Arrabiata", "Vegetarian", "Italian"),
            recipe("5", "Apple & Blackberry Crumble", "Dessert", "British"),
        ]
    }

    fn ids(recipes: &[Recipe]) -> Vec<&str> {
        recipes.iter().map(|r| r.id.as_str()).collect()
    }

    fn controller() -> FilterController {
        FilterController::with_base(
            base(),
            vec!["Chicken".into(), "Dessert".into(), "Vegetarian".into()],
            vec!["British".into(), "Italian".into(), "Malaysian".into()],
        )
    }

    #[test]
    fn test_no_selection_shows_everything() {
        let controller = controller();
        assert_eq!(controller.filtered(), controller.base());
    }

    #[test]
    fn test_single_axis_preserves_order() {
        let mut controller = controller();
        controller.toggle_category("Dessert");
        assert_eq!(ids(controller.filtered()), vec!["1", "2", "5"]);
    }

    #[test]
    fn test_axes_intersect() {
        let mut controller = controller();
        controller.toggle_category("Dessert");
        controller.toggle_category("Chicken");
        controller.toggle_area("Malaysian");
        assert_eq!(ids(controller.filtered()), vec!["2", "3"]);
        for recipe in controller.filtered() {
            assert!(controller.is_area_selected(&recipe.area));
            assert!(controller.is_category_selected(&recipe.category));
        }
    }

    #[test]
    fn test_no_match() {
        let mut controller = controller();
        controller.toggle_category("Vegetarian");
        controller.toggle_area("British");
        assert!(controller.filtered().is_empty());
    }

    #[test]
    fn test_toggle_twice_is_identity() {
        let mut controller = controller();
        controller.toggle_area("Italian");
        let before = controller.selected_categories().clone();

        controller.toggle_category("Dessert");
        controller.toggle_category("Dessert");

        assert_eq!(controller.selected_categories(), &before);
        assert_eq!(ids(controller.filtered()), vec!["4"]);
    }

    #[test]
    fn test_clear_filters_restores_base() {
        let mut controller = controller();
        controller.toggle_category("Dessert");
        controller.toggle_area("British");
        controller.clear_filters();

        assert!(controller.selected_categories().is_empty());
        assert!(controller.selected_areas().is_empty());
        assert_eq!(controller.filtered(), controller.base());
    }

    #[test]
    fn test_set_base_reapplies_selection() {
        let mut controller = controller();
        controller.toggle_area("Italian");
        controller.set_base(vec![
            recipe("9", "Lasagne", "Pasta", "Italian"),
            recipe("10", "Sushi", "Seafood", "Japanese"),
        ]);
        assert_eq!(ids(controller.filtered()), vec!["9"]);
    }

    #[test]
    fn test_selection_set() {
        let mut set: SelectionSet = ["Thai", "Greek"].into_iter().collect();
        assert!(set.admits("Thai"));
        assert!(!set.admits("French"));
        assert!(!set.toggle("Thai"));
        assert!(set.toggle("French"));
        assert_eq!(set.sorted(), vec!["French", "Greek"]);
        set.clear();
        assert!(set.admits("anything"));
    }

    #[tokio::test]
    async fn test_load_fetches_all_three() {
        let gateway = Arc::new(FakeGateway {
            categories: vec!["Dessert".into()],
            areas: vec!["British".into()],
            ..FakeGateway::with_recipes(base())
        });
        let controller = FilterController::load(gateway.clone(), "a").await;

        assert_eq!(controller.base().len(), 5);
        assert_eq!(controller.categories(), ["Dessert".to_string()]);
        assert_eq!(controller.areas(), ["British".to_string()]);
        let mut calls = gateway.calls();
        calls.sort();
        assert_eq!(calls, vec!["areas", "categories", "search:a"]);
    }

    #[tokio::test]
    async fn test_category_failure_does_not_block_rest() {
        let gateway = Arc::new(FakeGateway {
            areas: vec!["British".into(), "Malaysian".into()],
            fail_categories: true,
            ..FakeGateway::with_recipes(base())
        });
        let controller = FilterController::load(gateway, "a").await;

        assert!(controller.categories().is_empty());
        assert_eq!(controller.areas().len(), 2);
        assert_eq!(controller.base().len(), 5);
        assert_eq!(controller.filtered().len(), 5);
    }

    #[tokio::test]
    async fn test_search_failure_leaves_empty_gallery() {
        let gateway = Arc::new(FakeGateway {
            categories: vec!["Dessert".into()],
            fail_search: true,
            ..FakeGateway::with_recipes(base())
        });
        let mut controller = FilterController::load(gateway, "a").await;

        assert!(controller.filtered().is_empty());
        assert_eq!(controller.categories().len(), 1);
        controller.toggle_category("Dessert");
        assert!(controller.filtered().is_empty());
    }
}
