/**
 * Responsibility
 * - repo が上位に伝える意味の定義
 */
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("db error")]
    Db(#[from] sqlx::Error),
    #[error("constraint violated: {0}")]
    Constraint(&'static str),
    #[error("stored recipe of drink {id} is not valid json")]
    CorruptRecipe {
        id: i64,
        #[source]
        source: serde_json::Error,
    },
    #[error("recipe could not be serialized")]
    Encode(#[source] serde_json::Error),
}

impl RepoError {
    pub fn from_sqlx(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(dbe) = &e {
            match dbe.code().as_deref() {
                Some("23505") => return RepoError::Constraint("title must be unique"),
                Some("23502") => return RepoError::Constraint("required field missing"),
                Some("23514") => return RepoError::Constraint("title must not be blank"),
                Some("22001") => return RepoError::Constraint("title too long"),
                _ => {}
            }
        }
        RepoError::Db(e)
    }
}
