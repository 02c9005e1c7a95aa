/*
 * Responsibility
 * - モジュールの公開 (main.rs と tests/ の両方から Router を組み立てられるように)
 */
pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod repos;
pub mod services;
pub mod state;
