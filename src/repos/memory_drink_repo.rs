//! In-process drink repository.
//!
//! Used when no `DATABASE_URL` is configured and by the HTTP tests. It keeps the
//! same observable rules as the drinks table: serial ids that are never reused,
//! unique non-blank titles, recipes stored as JSON text.
use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::repos::{
    drink_repo::{Drink, DrinkDraft, DrinkRepo, Recipe},
    error::RepoError,
};

#[derive(Debug)]
struct StoredDrink {
    title: String,
    recipe: String,
}

#[derive(Debug, Default)]
struct Inner {
    last_id: i64,
    rows: BTreeMap<i64, StoredDrink>,
}

impl Inner {
    fn title_taken(&self, title: &str, except: Option<i64>) -> bool {
        self.rows
            .iter()
            .any(|(id, row)| Some(*id) != except && row.title == title)
    }
}

#[derive(Debug, Default)]
pub struct MemoryDrinkRepo {
    inner: RwLock<Inner>,
}

impl MemoryDrinkRepo {
    pub fn new() -> Self {
        Self::default()
    }

    // Test hook: overwrite the raw stored recipe text.
    #[doc(hidden)]
    pub async fn put_raw_recipe(&self, id: i64, raw: &str) -> bool {
        let mut inner = self.inner.write().await;
        match inner.rows.get_mut(&id) {
            Some(row) => {
                row.recipe = raw.to_string();
                true
            }
            None => false,
        }
    }
}

fn to_drink(id: i64, row: &StoredDrink) -> Result<Drink, RepoError> {
    Ok(Drink {
        id,
        title: row.title.clone(),
        recipe: Recipe::decode(id, &row.recipe)?,
    })
}

#[async_trait]
impl DrinkRepo for MemoryDrinkRepo {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn list_all(&self) -> Result<Vec<Drink>, RepoError> {
        let inner = self.inner.read().await;
        inner
            .rows
            .iter()
            .map(|(id, row)| to_drink(*id, row))
            .collect()
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Drink>, RepoError> {
        let inner = self.inner.read().await;
        inner.rows.get(&id).map(|row| to_drink(id, row)).transpose()
    }

    async fn insert(&self, draft: &DrinkDraft) -> Result<Drink, RepoError> {
        draft.check_constraints()?;
        let recipe = draft.recipe.encode()?;

        let mut inner = self.inner.write().await;
        if inner.title_taken(&draft.title, None) {
            return Err(RepoError::Constraint("title must be unique"));
        }

        inner.last_id += 1;
        let id = inner.last_id;
        inner.rows.insert(
            id,
            StoredDrink {
                title: draft.title.clone(),
                recipe,
            },
        );

        Ok(Drink {
            id,
            title: draft.title.clone(),
            recipe: draft.recipe.clone(),
        })
    }

    async fn update(&self, id: i64, draft: &DrinkDraft) -> Result<Option<Drink>, RepoError> {
        let recipe = draft.recipe.encode()?;

        let mut inner = self.inner.write().await;
        if !inner.rows.contains_key(&id) {
            return Ok(None);
        }
        draft.check_constraints()?;
        if inner.title_taken(&draft.title, Some(id)) {
            return Err(RepoError::Constraint("title must be unique"));
        }

        inner.rows.insert(
            id,
            StoredDrink {
                title: draft.title.clone(),
                recipe,
            },
        );

        Ok(Some(Drink {
            id,
            title: draft.title.clone(),
            recipe: draft.recipe.clone(),
        }))
    }

    async fn delete(&self, id: i64) -> Result<bool, RepoError> {
        let mut inner = self.inner.write().await;
        Ok(inner.rows.remove(&id).is_some())
    }
}
