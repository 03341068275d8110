use log::warn;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use crate::error::BrowserError;

/// Number of numbered ingredient/measure slots in an API record.
pub const INGREDIENT_SLOTS: usize = 20;

/// One (ingredient, measure) line of a recipe. The measure may be empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ingredient {
    pub name: String,
    pub measure: String,
}

/// A recipe as returned by the API.
///
/// Records coming from search or list calls are summaries: the instructions
/// and ingredients may be present but are not guaranteed. Records from
/// [`RecipeGateway::get_by_id`](crate::gateway::RecipeGateway::get_by_id) are full.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Recipe {
    pub id: String,
    pub name: String,
    pub thumbnail: String,
    pub category: String,
    pub area: String,
    pub instructions: String,
    pub tags: Option<String>,
    pub ingredients: Vec<Ingredient>,
}

impl Recipe {
    /// Build a recipe from one raw API record.
    ///
    /// Returns `None` when the record has no identifier. Missing text fields
    /// become empty strings.
    pub fn from_record(record: &Map<String, Value>) -> Option<Self> {
        let id = text_field(record, "idMeal");
        if id.trim().is_empty() {
            warn!("Dropping recipe record without idMeal");
            return None;
        }

        let tags = text_field(record, "strTags");
        let tags = if tags.trim().is_empty() {
            None
        } else {
            Some(tags)
        };

        Some(Recipe {
            id,
            name: text_field(record, "strMeal"),
            thumbnail: text_field(record, "strMealThumb"),
            category: text_field(record, "strCategory"),
            area: text_field(record, "strArea"),
            instructions: text_field(record, "strInstructions"),
            tags,
            ingredients: flatten_ingredients(record),
        })
    }

    /// Instructions split into paragraphs, one per line. Both `\n` and
    /// `\r\n` line endings are accepted.
    pub fn instruction_paragraphs(&self) -> Vec<&str> {
        self.instructions.lines().collect()
    }

    /// Tags as a list, split on commas.
    pub fn tag_list(&self) -> Vec<&str> {
        self.tags
            .as_deref()
            .map(|tags| {
                tags.split(',')
                    .map(str::trim)
                    .filter(|tag| !tag.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Field value used when ordering by `key`.
    pub fn sort_field(&self, key: SortKey) -> &str {
        match key {
            SortKey::Name => &self.name,
            SortKey::Category => &self.category,
            SortKey::Area => &self.area,
        }
    }
}

fn text_field(record: &Map<String, Value>, key: &str) -> String {
    record
        .get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_default()
}

/// Collect `strIngredientN`/`strMeasureN` pairs in slot order, skipping slots
/// whose ingredient is blank.
fn flatten_ingredients(record: &Map<String, Value>) -> Vec<Ingredient> {
    (1..=INGREDIENT_SLOTS)
        .filter_map(|slot| {
            let name = text_field(record, &format!("strIngredient{}", slot));
            let name = name.trim();
            if name.is_empty() {
                return None;
            }
            let measure = text_field(record, &format!("strMeasure{}", slot));
            Some(Ingredient {
                name: name.to_string(),
                measure: measure.trim().to_string(),
            })
        })
        .collect()
}

/// Response envelope shared by every endpoint: `{"meals": [...] | null}`.
#[derive(Debug, Deserialize, Default)]
pub(crate) struct MealEnvelope {
    #[serde(default)]
    pub meals: Option<Vec<Map<String, Value>>>,
}

impl MealEnvelope {
    pub fn into_records(self) -> Vec<Map<String, Value>> {
        self.meals.unwrap_or_default()
    }

    pub fn into_recipes(self) -> Vec<Recipe> {
        self.into_records()
            .iter()
            .filter_map(Recipe::from_record)
            .collect()
    }

    /// Values of `key` across all records, e.g. `strCategory` for the category list.
    pub fn into_names(self, key: &str) -> Vec<String> {
        self.into_records()
            .iter()
            .map(|record| text_field(record, key))
            .filter(|name| !name.is_empty())
            .collect()
    }
}

/// Field a result list can be ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Name,
    Category,
    Area,
}

impl FromStr for SortKey {
    type Err = BrowserError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "name" => Ok(SortKey::Name),
            "category" => Ok(SortKey::Category),
            "area" => Ok(SortKey::Area),
            _ => Err(BrowserError::InvalidSortKey(s.to_string())),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SortKey::Name => "name",
            SortKey::Category => "category",
            SortKey::Area => "area",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl FromStr for SortOrder {
    type Err = BrowserError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortOrder::Ascending),
            "desc" | "descending" => Ok(SortOrder::Descending),
            _ => Err(BrowserError::InvalidSortOrder(s.to_string())),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Ascending => f.write_str("asc"),
            SortOrder::Descending => f.write_str("desc"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_from_record_full() {
        let rec = record(json!({
            "idMeal": "52772",
            "strMeal": "Teriyaki Chicken Casserole",
            "strMealThumb": "https://example.com/t.jpg",
            "strCategory": "Chicken",
            "strArea": "Japanese",
            "strInstructions": "Preheat oven.\r\nBake.",
            "strTags": "Meat,Casserole",
            "strIngredient1": "soy sauce",
            "strMeasure1": "3/4 cup",
            "strIngredient2": " water ",
            "strMeasure2": null,
            "strIngredient3": "  ",
            "strMeasure3": "1 tbsp",
            "strIngredient4": "brown sugar",
            "strMeasure4": " 1/2 cup "
        }));

        let recipe = Recipe::from_record(&rec).unwrap();
        assert_eq!(recipe.id, "52772");
        assert_eq!(recipe.category, "Chicken");
        assert_eq!(recipe.tags.as_deref(), Some("Meat,Casserole"));
        assert_eq!(
            recipe.ingredients,
            vec![
                Ingredient {
                    name: "soy sauce".to_string(),
                    measure: "3/4 cup".to_string()
                },
                Ingredient {
                    name: "water".to_string(),
                    measure: String::new()
                },
                Ingredient {
                    name: "brown sugar".to_string(),
                    measure: "1/2 cup".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_from_record_partial() {
        let rec = record(json!({ "idMeal": "1", "strMeal": "Toast", "strTags": null }));
        let recipe = Recipe::from_record(&rec).unwrap();
        assert_eq!(recipe.name, "Toast");
        assert_eq!(recipe.category, "");
        assert!(recipe.tags.is_none());
        assert!(recipe.ingredients.is_empty());
    }

    #[test]
    fn test_from_record_without_id_is_dropped() {
        let rec = record(json!({ "strMeal": "Nameless" }));
        assert!(Recipe::from_record(&rec).is_none());
    }

    #[test]
    fn test_instruction_paragraphs_and_tags() {
        let recipe = Recipe {
            instructions: "Step one\r\n\r\nStep two\nStep three\r\n".to_string(),
            tags: Some("Pasta, ,Curry".to_string()),
            ..Default::default()
        };
        assert_eq!(
            recipe.instruction_paragraphs(),
            vec!["Step one", "", "Step two", "Step three"]
        );
        assert_eq!(recipe.tag_list(), vec!["Pasta", "Curry"]);
    }

    #[test]
    fn test_envelope_null_meals() {
        let envelope: MealEnvelope = serde_json::from_str(r#"{"meals": null}"#).unwrap();
        assert!(envelope.into_recipes().is_empty());

        let envelope: MealEnvelope = serde_json::from_str("{}").unwrap();
        assert!(envelope.into_records().is_empty());
    }

    #[test]
    fn test_envelope_names() {
        let envelope: MealEnvelope = serde_json::from_str(
            r#"{"meals": [{"strArea": "Italian"}, {"strArea": ""}, {"strArea": "Thai"}]}"#,
        )
        .unwrap();
        assert_eq!(envelope.into_names("strArea"), vec!["Italian", "Thai"]);
    }

    #[test]
    fn test_sort_key_and_order_parse() {
        assert_eq!("Category".parse::<SortKey>().unwrap(), SortKey::Category);
        assert_eq!("desc".parse::<SortOrder>().unwrap(), SortOrder::Descending);
        assert!(matches!(
            "rating".parse::<SortKey>(),
            Err(BrowserError::InvalidSortKey(_))
        ));
        assert!(matches!(
            "up".parse::<SortOrder>(),
            Err(BrowserError::InvalidSortOrder(_))
        ));
        assert_eq!(SortKey::Area.to_string(), "area");
    }
}
