//! Route handlers.

use crate::error::{ApiError, ApiResult};
use crate::AppState;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use shelfwise_core::{Product, Shelf, User};
use shelfwise_http::rows_from_document;
use shelfwise_normalize::{Normalized, Normalizer, ProductFilter, UserFilter};
use shelfwise_slotting::{evaluate, FeeTable, GridEvaluation};
use std::sync::Arc;

type SharedState = State<Arc<AppState>>;

/// Health check response.
#[derive(Serialize, Deserialize)]
pub struct Health {
    /// Server status ("ok" when healthy).
    pub status: String,
    /// Server version from Cargo.toml.
    pub version: String,
}

/// Health check endpoint handler.
pub async fn health() -> Json<Health> {
    Json(Health {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
pub struct NormalizeQuery {
    pub store: Option<String>,
}

/// Normalize a posted envelope or bare rows array.
pub async fn normalize(
    State(state): SharedState,
    Query(query): Query<NormalizeQuery>,
    Json(document): Json<JsonValue>,
) -> ApiResult<Json<Normalized>> {
    let rows = rows_from_document(&document)?;
    let normalizer = Normalizer::new(state.config.columns.clone()).with_options(state.views);
    Ok(Json(normalizer.normalize_for_store(&rows, query.store.as_deref())))
}

#[derive(Debug, Deserialize)]
pub struct SlotsRequest {
    pub price: f64,
    pub margin: f64,
    pub rows: Option<usize>,
    pub cols: Option<usize>,
    pub fee: Option<f64>,
    #[serde(default)]
    pub standard: bool,
}

/// Score every cell of a uniform or standard fee grid.
pub async fn slots(
    State(state): SharedState,
    Json(req): Json<SlotsRequest>,
) -> ApiResult<Json<GridEvaluation>> {
    if !req.price.is_finite() || !req.margin.is_finite() {
        return Err(ApiError::BadRequest(
            "price and margin must be finite numbers".to_string(),
        ));
    }

    let table = if req.standard {
        FeeTable::standard()
    } else {
        let grid = &state.config.grid;
        let rows = req.rows.unwrap_or(grid.rows);
        let cols = req.cols.unwrap_or(grid.cols);
        let fee = req.fee.unwrap_or(grid.default_fee);
        FeeTable::uniform(rows, cols, fee)?
    };

    Ok(Json(evaluate(req.price, req.margin, &table)))
}

// Shelves

#[derive(Debug, Deserialize)]
pub struct CreateShelf {
    pub name: String,
    pub rows: Option<usize>,
    pub cols: Option<usize>,
}

pub async fn list_shelves(State(state): SharedState) -> ApiResult<Json<Vec<Shelf>>> {
    Ok(Json(state.store.read().await.shelves()?))
}

pub async fn create_shelf(
    State(state): SharedState,
    Json(req): Json<CreateShelf>,
) -> ApiResult<(StatusCode, Json<Shelf>)> {
    let rows = req.rows.unwrap_or(state.config.grid.rows);
    let cols = req.cols.unwrap_or(state.config.grid.cols);
    let shelf = state.store.write().await.create_shelf(&req.name, rows, cols)?;
    Ok((StatusCode::CREATED, Json(shelf)))
}

pub async fn get_shelf(
    State(state): SharedState,
    Path(id): Path<String>,
) -> ApiResult<Json<Shelf>> {
    let shelf = state.store.read().await.shelf(&id)?;
    shelf
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("shelf '{id}' not found")))
}

pub async fn delete_shelf(
    State(state): SharedState,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    if state.store.write().await.delete_shelf(&id)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(format!("shelf '{id}' not found")))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceProduct {
    pub product_id: String,
    pub position: String,
}

pub async fn place_product(
    State(state): SharedState,
    Path(id): Path<String>,
    Json(req): Json<PlaceProduct>,
) -> ApiResult<Json<Shelf>> {
    let shelf = state
        .store
        .write()
        .await
        .place_product(&id, &req.product_id, &req.position)?;
    Ok(Json(shelf))
}

pub async fn remove_placement(
    State(state): SharedState,
    Path((id, position)): Path<(String, String)>,
) -> ApiResult<StatusCode> {
    if state.store.write().await.remove_placement(&id, &position)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(format!(
            "nothing placed at {position} on shelf '{id}'"
        )))
    }
}

// Products and users

pub async fn list_products(
    State(state): SharedState,
    Query(filter): Query<ProductFilter>,
) -> ApiResult<Json<Vec<Product>>> {
    let products = state.store.read().await.products()?;
    Ok(Json(products.into_iter().filter(|p| filter.matches(p)).collect()))
}

pub async fn save_product(
    State(state): SharedState,
    Json(product): Json<Product>,
) -> ApiResult<(StatusCode, Json<Product>)> {
    let saved = state.store.write().await.save_product(product)?;
    Ok((StatusCode::CREATED, Json(saved)))
}

pub async fn delete_product(
    State(state): SharedState,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    if state.store.write().await.delete_product(&id)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(format!("product '{id}' not found")))
    }
}

pub async fn list_users(
    State(state): SharedState,
    Query(filter): Query<UserFilter>,
) -> ApiResult<Json<Vec<User>>> {
    let users = state.store.read().await.users()?;
    Ok(Json(users.into_iter().filter(|u| filter.matches(u)).collect()))
}
