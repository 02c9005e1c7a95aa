/*
 * Responsibility
 * - Drinks の request/response DTO
 * - short / long の 2 つの projection (権限によって返す形が変わるだけで、実体は同じ Drink)
 * - request は validate() で必須項目を確認してから DrinkDraft に変換する
 */
use serde::{Deserialize, Serialize};

use crate::repos::{Drink, DrinkDraft, Ingredient, Recipe};

/// `recipe` may arrive as a list or as a single ingredient object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RecipeInput {
    Many(Vec<Ingredient>),
    One(Ingredient),
}

impl From<RecipeInput> for Recipe {
    fn from(input: RecipeInput) -> Self {
        match input {
            RecipeInput::Many(items) => Recipe(items),
            RecipeInput::One(item) => Recipe(vec![item]),
        }
    }
}

// POST / PATCH 共通 (PATCH も全項目置き換え)
#[derive(Debug, Deserialize)]
pub struct DrinkRequest {
    pub title: Option<String>,
    pub recipe: Option<RecipeInput>,
}

impl DrinkRequest {
    pub fn validate(self) -> Result<DrinkDraft, &'static str> {
        let title = match self.title {
            Some(title) if !title.trim().is_empty() => title,
            _ => return Err("title is required"),
        };
        let recipe = self.recipe.ok_or("recipe is required")?;

        Ok(DrinkDraft {
            title,
            recipe: recipe.into(),
        })
    }
}

#[derive(Debug, Serialize)]
pub struct IngredientShort {
    pub color: String,
    pub parts: u32,
}

/// Public view: no ingredient names.
#[derive(Debug, Serialize)]
pub struct DrinkShort {
    pub id: i64,
    pub title: String,
    pub recipe: Vec<IngredientShort>,
}

impl From<Drink> for DrinkShort {
    fn from(drink: Drink) -> Self {
        Self {
            id: drink.id,
            title: drink.title,
            recipe: drink
                .recipe
                .0
                .into_iter()
                .map(|i| IngredientShort {
                    color: i.color,
                    parts: i.parts,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DrinkLong {
    pub id: i64,
    pub title: String,
    pub recipe: Vec<Ingredient>,
}

impl From<Drink> for DrinkLong {
    fn from(drink: Drink) -> Self {
        Self {
            id: drink.id,
            title: drink.title,
            recipe: drink.recipe.0,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DrinksResponse<T> {
    pub drinks: Vec<T>,
}

impl<T> DrinksResponse<T> {
    pub fn from_drinks(drinks: impl IntoIterator<Item = Drink>) -> Self
    where
        T: From<Drink>,
    {
        Self {
            drinks: drinks.into_iter().map(T::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub delete_id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn latte() -> Drink {
        Drink {
            id: 3,
            title: "Latte".to_string(),
            recipe: Recipe(vec![
                Ingredient {
                    name: "Espresso".to_string(),
                    color: "brown".to_string(),
                    parts: 1,
                },
                Ingredient {
                    name: "Milk".to_string(),
                    color: "white".to_string(),
                    parts: 3,
                },
            ]),
        }
    }

    #[test]
    fn short_projection_drops_names() {
        let body = serde_json::to_value(DrinkShort::from(latte())).unwrap();
        assert_eq!(
            body,
            json!({
                "id": 3,
                "title": "Latte",
                "recipe": [
                    {"color": "brown", "parts": 1},
                    {"color": "white", "parts": 3},
                ],
            })
        );
    }

    #[test]
    fn long_projection_keeps_order_and_names() {
        let body = serde_json::to_value(DrinkLong::from(latte())).unwrap();
        assert_eq!(body["recipe"][0]["name"], "Espresso");
        assert_eq!(body["recipe"][1]["name"], "Milk");
    }

    #[test]
    fn single_ingredient_object_becomes_a_list() {
        let req: DrinkRequest = serde_json::from_value(json!({
            "title": "Water",
            "recipe": {"name": "water", "color": "blue", "parts": 1},
        }))
        .unwrap();

        let draft = req.validate().unwrap();
        assert_eq!(draft.recipe.ingredients().len(), 1);
        assert_eq!(draft.recipe.ingredients()[0].color, "blue");
    }

    #[test]
    fn title_and_recipe_are_required() {
        let no_title: DrinkRequest =
            serde_json::from_value(json!({"recipe": []})).unwrap();
        assert_eq!(no_title.validate().unwrap_err(), "title is required");

        let blank_title: DrinkRequest =
            serde_json::from_value(json!({"title": "  ", "recipe": []})).unwrap();
        assert_eq!(blank_title.validate().unwrap_err(), "title is required");

        let no_recipe: DrinkRequest =
            serde_json::from_value(json!({"title": "Mocha"})).unwrap();
        assert_eq!(no_recipe.validate().unwrap_err(), "recipe is required");
    }

    #[test]
    fn malformed_recipe_does_not_deserialize() {
        let bad = serde_json::from_value::<DrinkRequest>(json!({
            "title": "Mocha",
            "recipe": [{"name": "cocoa", "color": "brown", "parts": "lots"}],
        }));
        assert!(bad.is_err());
    }
}
