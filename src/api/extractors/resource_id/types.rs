/**
 * Responsibility
 *  - リソースごとの「意味付きID型」を宣言する
 */
use super::core::ResourceId;

// drinks
pub enum DrinkTag {}
pub type DrinkId = ResourceId<DrinkTag>;
