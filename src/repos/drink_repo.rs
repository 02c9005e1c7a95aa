/*
 * Responsibility
 * - Drink / Recipe の型と、永続化の境界 (DrinkRepo trait)
 * - recipe は JSON 文字列で保存し、読み出し時に型付きで decode する
 * - 見つからない場合は Option / bool で返す (404 への変換は handler 側)
 */
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::repos::error::RepoError;

pub const TITLE_MAX_LEN: usize = 80;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    pub color: String,
    pub parts: u32,
}

/// Ordered ingredient list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Recipe(pub Vec<Ingredient>);

impl Recipe {
    pub fn ingredients(&self) -> &[Ingredient] {
        &self.0
    }

    pub fn encode(&self) -> Result<String, RepoError> {
        serde_json::to_string(self).map_err(RepoError::Encode)
    }

    // A stored recipe that does not parse is a data error, never an empty default.
    pub fn decode(id: i64, raw: &str) -> Result<Self, RepoError> {
        serde_json::from_str(raw).map_err(|source| RepoError::CorruptRecipe { id, source })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Drink {
    pub id: i64,
    pub title: String,
    pub recipe: Recipe,
}

/// Fields written by insert/update. Update replaces both wholesale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrinkDraft {
    pub title: String,
    pub recipe: Recipe,
}

impl DrinkDraft {
    // Same rules the drinks table enforces with NOT NULL / CHECK / VARCHAR(80).
    pub fn check_constraints(&self) -> Result<(), RepoError> {
        if self.title.trim().is_empty() {
            return Err(RepoError::Constraint("title must not be blank"));
        }
        if self.title.chars().count() > TITLE_MAX_LEN {
            return Err(RepoError::Constraint("title too long"));
        }
        Ok(())
    }
}

#[async_trait]
pub trait DrinkRepo: Send + Sync {
    // Returns the backend name (for logging).
    fn backend_name(&self) -> &'static str;

    // All drinks ordered by id ascending.
    async fn list_all(&self) -> Result<Vec<Drink>, RepoError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Drink>, RepoError>;

    async fn insert(&self, draft: &DrinkDraft) -> Result<Drink, RepoError>;

    // Ok(None) when the id does not exist.
    async fn update(&self, id: i64, draft: &DrinkDraft) -> Result<Option<Drink>, RepoError>;

    // Ok(false) when the id does not exist.
    async fn delete(&self, id: i64) -> Result<bool, RepoError>;
}

/// Sample row inserted when the store is reset on start.
pub fn sample_drink() -> DrinkDraft {
    DrinkDraft {
        title: "water".to_string(),
        recipe: Recipe(vec![Ingredient {
            name: "water".to_string(),
            color: "blue".to_string(),
            parts: 1,
        }]),
    }
}
