//! Flower API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::api::convert::parse_record_id;
use crate::core::ServerState;
use crate::db::models::{Flower, FlowerCreate, FlowerUpdate};
use crate::db::repository::FlowerRepository;
use crate::utils::{AppError, AppResponse, AppResult, ok, ok_with_message};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Optional case-insensitive name filter
    pub name: Option<String>,
}

/// GET /api/flowers - 获取商品列表
///
/// `?name=rose` filters by substring, case-insensitive
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<AppResponse<Vec<Flower>>>> {
    let repo = FlowerRepository::new(state.get_db());
    let flowers = match query.name.as_deref() {
        Some(name) if !name.trim().is_empty() => repo.search_by_name(name).await?,
        _ => repo.find_all().await?,
    };
    Ok(ok(flowers))
}

/// GET /api/flowers/:id - 获取单个商品
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<Flower>>> {
    let id = parse_record_id("flower", &id)?;
    let repo = FlowerRepository::new(state.get_db());
    let flower = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Flower {}", id)))?;
    Ok(ok(flower))
}

/// POST /api/flowers - 创建商品 (管理员)
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<FlowerCreate>,
) -> AppResult<Json<AppResponse<Flower>>> {
    let repo = FlowerRepository::new(state.get_db());
    let flower = repo.create(payload).await?;

    tracing::info!(
        flower = %flower.id.as_ref().map(|id| id.to_string()).unwrap_or_default(),
        name = %flower.name,
        "Flower created"
    );

    Ok(ok(flower))
}

/// PUT /api/flowers/:id - 更新商品 (管理员)
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<FlowerUpdate>,
) -> AppResult<Json<AppResponse<Flower>>> {
    let id = parse_record_id("flower", &id)?;
    let repo = FlowerRepository::new(state.get_db());
    let flower = repo.update(&id, payload).await?;
    Ok(ok(flower))
}

/// DELETE /api/flowers/:id - 删除商品 (管理员)
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<()>>> {
    let id = parse_record_id("flower", &id)?;
    let repo = FlowerRepository::new(state.get_db());
    repo.delete(&id).await?;

    tracing::info!(flower = %id, "Flower deleted");

    Ok(ok_with_message((), "Flower deleted"))
}
