/*
 * Responsibility
 * - 永続化の入口 (trait と実装の re-export)
 */
pub mod drink_repo;
pub mod error;
pub mod memory_drink_repo;
pub mod pg_drink_repo;

pub use drink_repo::{Drink, DrinkDraft, DrinkRepo, Ingredient, Recipe};
pub use error::RepoError;
pub use memory_drink_repo::MemoryDrinkRepo;
pub use pg_drink_repo::PgDrinkRepo;
