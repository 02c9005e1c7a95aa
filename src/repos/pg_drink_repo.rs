/*
 * Responsibility
 * - drinks テーブル向け SQLx 操作
 * - PgPool を受け取り CRUD を提供 (接続は 1 呼び出しごとに pool から借りて返す)
 * - DB エラーは RepoError::from_sqlx で意味付けして返す
 */
use async_trait::async_trait;
use sqlx::{FromRow, PgPool};

use crate::repos::{
    drink_repo::{Drink, DrinkDraft, DrinkRepo, Recipe},
    error::RepoError,
};

#[derive(Debug, FromRow)]
struct DrinkRow {
    id: i64,
    title: String,
    recipe: String,
}

impl DrinkRow {
    fn into_drink(self) -> Result<Drink, RepoError> {
        let recipe = Recipe::decode(self.id, &self.recipe)?;
        Ok(Drink {
            id: self.id,
            title: self.title,
            recipe,
        })
    }
}

#[derive(Clone, Debug)]
pub struct PgDrinkRepo {
    db: PgPool,
}

impl PgDrinkRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create the drinks table if missing. With `reset`, drop it first.
    pub async fn ensure_schema(&self, reset: bool) -> Result<(), RepoError> {
        if reset {
            sqlx::query("DROP TABLE IF EXISTS drinks")
                .execute(&self.db)
                .await?;
        }

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS drinks (
                id BIGSERIAL PRIMARY KEY,
                title VARCHAR(80) NOT NULL UNIQUE CHECK (btrim(title) <> ''),
                recipe TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.db)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl DrinkRepo for PgDrinkRepo {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    async fn list_all(&self) -> Result<Vec<Drink>, RepoError> {
        let rows = sqlx::query_as::<_, DrinkRow>(
            r#"
            SELECT id, title, recipe
            FROM drinks
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.db)
        .await
        .map_err(RepoError::from_sqlx)?;

        rows.into_iter().map(DrinkRow::into_drink).collect()
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Drink>, RepoError> {
        let row = sqlx::query_as::<_, DrinkRow>(
            r#"
            SELECT id, title, recipe
            FROM drinks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .map_err(RepoError::from_sqlx)?;

        row.map(DrinkRow::into_drink).transpose()
    }

    async fn insert(&self, draft: &DrinkDraft) -> Result<Drink, RepoError> {
        let recipe = draft.recipe.encode()?;

        let row = sqlx::query_as::<_, DrinkRow>(
            r#"
            INSERT INTO drinks (title, recipe)
            VALUES ($1, $2)
            RETURNING id, title, recipe
            "#,
        )
        .bind(&draft.title)
        .bind(recipe)
        .fetch_one(&self.db)
        .await
        .map_err(RepoError::from_sqlx)?;

        row.into_drink()
    }

    async fn update(&self, id: i64, draft: &DrinkDraft) -> Result<Option<Drink>, RepoError> {
        let recipe = draft.recipe.encode()?;

        let row = sqlx::query_as::<_, DrinkRow>(
            r#"
            UPDATE drinks
            SET
                title = $2,
                recipe = $3
            WHERE id = $1
            RETURNING id, title, recipe
            "#,
        )
        .bind(id)
        .bind(&draft.title)
        .bind(recipe)
        .fetch_optional(&self.db)
        .await
        .map_err(RepoError::from_sqlx)?;

        row.map(DrinkRow::into_drink).transpose()
    }

    async fn delete(&self, id: i64) -> Result<bool, RepoError> {
        let result = sqlx::query(
            r#"
            DELETE FROM drinks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.db)
        .await
        .map_err(RepoError::from_sqlx)?;

        Ok(result.rows_affected() > 0)
    }
}

// 実 DB が必要なので既定では走らない:
// DATABASE_URL=postgres://... cargo test -- --ignored
// テストごとに専用 schema を作り、その中だけで DROP / CREATE する
#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use sqlx::postgres::{PgConnectOptions, PgPoolOptions};

    use super::*;
    use crate::repos::drink_repo::{Ingredient, sample_drink};

    async fn repo(schema: &str) -> PgDrinkRepo {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

        let admin = PgPool::connect(&url).await.unwrap();
        sqlx::query(&format!("CREATE SCHEMA IF NOT EXISTS {schema}"))
            .execute(&admin)
            .await
            .unwrap();

        let options = PgConnectOptions::from_str(&url)
            .unwrap()
            .options([("search_path", schema)]);
        let pool = PgPoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .unwrap();

        let repo = PgDrinkRepo::new(pool);
        repo.ensure_schema(true).await.unwrap();
        repo
    }

    fn draft(title: &str) -> DrinkDraft {
        DrinkDraft {
            title: title.to_string(),
            recipe: Recipe(vec![Ingredient {
                name: "espresso".to_string(),
                color: "brown".to_string(),
                parts: 1,
            }]),
        }
    }

    #[tokio::test]
    #[ignore = "needs DATABASE_URL"]
    async fn crud_against_postgres() {
        let repo = repo("drinks_test_crud").await;

        let water = repo.insert(&sample_drink()).await.unwrap();
        let mocha = repo.insert(&draft("mocha")).await.unwrap();
        assert!(water.id < mocha.id);
        assert_eq!(
            repo.list_all().await.unwrap(),
            vec![water.clone(), mocha.clone()]
        );

        let renamed = repo
            .update(mocha.id, &draft("mocha grande"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(renamed.title, "mocha grande");
        assert!(repo.update(9_999, &draft("ghost")).await.unwrap().is_none());

        assert!(repo.delete(mocha.id).await.unwrap());
        assert!(!repo.delete(mocha.id).await.unwrap());
        assert!(repo.find_by_id(mocha.id).await.unwrap().is_none());
    }

    #[tokio::test]
    #[ignore = "needs DATABASE_URL"]
    async fn table_constraints_surface_as_constraint_errors() {
        let repo = repo("drinks_test_constraints").await;
        repo.insert(&draft("latte")).await.unwrap();

        let duplicate = repo.insert(&draft("latte")).await.unwrap_err();
        assert!(matches!(duplicate, RepoError::Constraint("title must be unique")));

        let blank = repo.insert(&draft("   ")).await.unwrap_err();
        assert!(matches!(blank, RepoError::Constraint("title must not be blank")));

        let long = repo.insert(&draft(&"x".repeat(81))).await.unwrap_err();
        assert!(matches!(long, RepoError::Constraint("title too long")));
    }

    #[tokio::test]
    #[ignore = "needs DATABASE_URL"]
    async fn unreadable_recipe_is_corrupt() {
        let repo = repo("drinks_test_corrupt").await;
        let drink = repo.insert(&draft("flat white")).await.unwrap();

        sqlx::query("UPDATE drinks SET recipe = $2 WHERE id = $1")
            .bind(drink.id)
            .bind("not json")
            .execute(&repo.db)
            .await
            .unwrap();

        assert!(matches!(
            repo.find_by_id(drink.id).await.unwrap_err(),
            RepoError::CorruptRecipe { id, .. } if id == drink.id
        ));
    }
}
