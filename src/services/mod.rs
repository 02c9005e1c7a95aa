/*
 * Responsibility
 * - handler から使うドメイン横断のサービス (認証など)
 */
pub mod auth;
