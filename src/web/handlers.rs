use axum::{
    extract::{Path, State},
    response::Json,
};
use serde::{Deserialize, Serialize};

use super::{ApiResponse, AppError, AppState};
use crate::models::TrackedProduct;

#[derive(Debug, Serialize, Deserialize)]
pub struct AddProductRequest {
    pub url: String,
}

pub async fn list_products(
    State(state): State<AppState>,
) -> Json<ApiResponse<Vec<TrackedProduct>>> {
    let products = state.product_manager.list_products().await;
    tracing::debug!(count = products.len(), "listing tracked products");
    Json(ApiResponse::success(products))
}

pub async fn add_product(
    State(state): State<AppState>,
    Json(request): Json<AddProductRequest>,
) -> Result<Json<ApiResponse<TrackedProduct>>, AppError> {
    if request.url.trim().is_empty() {
        return Err(AppError::bad_request("Product url is required"));
    }

    match state.product_manager.add_product(&request.url).await {
        Ok(product) => {
            tracing::info!("Tracking product: {} ({})", product.name, product.id);
            Ok(Json(ApiResponse::success(product)))
        }
        Err(crate::AppError::Validation(msg)) => Err(AppError::bad_request(msg)),
        Err(e) => {
            tracing::error!("Failed to add product: {}", e);
            Err(AppError::internal("Failed to add product"))
        }
    }
}

pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    if id.trim().is_empty() {
        return Err(AppError::bad_request("Product ID is required"));
    }

    match state.product_manager.remove_product(&id).await {
        Ok(()) => {
            tracing::info!("Removed product: {}", id);
            Ok(Json(ApiResponse::success(serde_json::json!({ "id": id }))))
        }
        Err(e) => {
            tracing::error!("Failed to remove product {}: {}", id, e);
            Err(AppError::internal("Failed to remove product"))
        }
    }
}
