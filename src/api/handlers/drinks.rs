/*
 * Responsibility
 * - /drinks 系 CRUD handler
 * - 認可は routes 側の requires_auth で済んでいる前提 (ここでは AuthCtx をログ相関にだけ使う)
 * - body は Result<Json<_>, JsonRejection> で受け、壊れた JSON も 422 に揃える
 */
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};

use crate::{
    api::{
        dto::drinks::{DeleteResponse, DrinkLong, DrinkRequest, DrinkShort, DrinksResponse},
        extractors::{AuthCtxExtractor, DrinkId},
    },
    error::AppError,
    repos::DrinkDraft,
    state::AppState,
};

fn into_draft(payload: Result<Json<DrinkRequest>, JsonRejection>) -> Result<DrinkDraft, AppError> {
    let Json(req) = payload.map_err(|rejection| match rejection.status() {
        // DefaultBodyLimit 超過
        StatusCode::PAYLOAD_TOO_LARGE => AppError::PayloadTooLarge,
        _ => AppError::unprocessable(rejection.body_text()),
    })?;
    req.validate().map_err(AppError::unprocessable)
}

pub async fn list_drinks(
    State(state): State<AppState>,
) -> Result<Json<DrinksResponse<DrinkShort>>, AppError> {
    let drinks = state.drinks.list_all().await?;
    Ok(Json(DrinksResponse::from_drinks(drinks)))
}

pub async fn list_drinks_detail(
    State(state): State<AppState>,
    AuthCtxExtractor(_ctx): AuthCtxExtractor,
) -> Result<Json<DrinksResponse<DrinkLong>>, AppError> {
    let drinks = state.drinks.list_all().await?;
    Ok(Json(DrinksResponse::from_drinks(drinks)))
}

pub async fn create_drink(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    payload: Result<Json<DrinkRequest>, JsonRejection>,
) -> Result<Json<DrinksResponse<DrinkLong>>, AppError> {
    let draft = into_draft(payload)?;

    let drink = state.drinks.insert(&draft).await?;
    tracing::info!(
        drink_id = drink.id,
        sub = ctx.subject_or_anonymous(),
        "drink created"
    );

    Ok(Json(DrinksResponse::from_drinks([drink])))
}

pub async fn update_drink(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    drink_id: DrinkId,
    payload: Result<Json<DrinkRequest>, JsonRejection>,
) -> Result<Json<DrinksResponse<DrinkLong>>, AppError> {
    // unknown id は body の中身に関係なく 404
    state
        .drinks
        .find_by_id(drink_id.id)
        .await?
        .ok_or(AppError::NotFound)?;

    let draft = into_draft(payload)?;

    let drink = state
        .drinks
        .update(drink_id.id, &draft)
        .await?
        .ok_or(AppError::NotFound)?;
    tracing::info!(
        drink_id = drink.id,
        sub = ctx.subject_or_anonymous(),
        "drink updated"
    );

    Ok(Json(DrinksResponse::from_drinks([drink])))
}

pub async fn delete_drink(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    drink_id: DrinkId,
) -> Result<Json<DeleteResponse>, AppError> {
    let deleted = state.drinks.delete(drink_id.id).await?;
    if !deleted {
        return Err(AppError::NotFound);
    }
    tracing::info!(
        drink_id = drink_id.id,
        sub = ctx.subject_or_anonymous(),
        "drink deleted"
    );

    Ok(Json(DeleteResponse {
        delete_id: drink_id.id,
    }))
}
