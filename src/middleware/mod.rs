/*
 * Responsibility
 * - middlware の公開インターフェース (re-export)
 * - auth::requires_auth(...), cors::apply(...) など
 */
pub mod auth;
pub mod cors;
pub mod http;
pub mod security_headers;
