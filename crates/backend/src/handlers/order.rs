use axum::extract::Query;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use contracts::sync::{ErrorResponse, OrderStateDto, SaveOrderRequest, SaveOrderResponse};

use crate::domain::order_record::service::{self, OrderServiceError};

#[derive(Debug, Deserialize)]
pub struct ScopeQuery {
    pub scope: String,
}

fn status_for(error: &OrderServiceError) -> StatusCode {
    match error {
        OrderServiceError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        OrderServiceError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// GET /api/order?scope=
pub async fn get_order(
    Query(query): Query<ScopeQuery>,
) -> Result<Json<OrderStateDto>, StatusCode> {
    match service::get_by_scope(&query.scope).await {
        Ok(Some(record)) => Ok(Json(OrderStateDto {
            order: record.order,
            hidden: record.hidden,
        })),
        Ok(None) => Err(StatusCode::NOT_FOUND),
        Err(e) => {
            tracing::error!("get_order failed: {}", e);
            Err(status_for(&e))
        }
    }
}

/// POST /api/order
pub async fn save_order(
    Json(request): Json<SaveOrderRequest>,
) -> Result<Json<SaveOrderResponse>, (StatusCode, Json<ErrorResponse>)> {
    match service::save(request).await {
        Ok(()) => Ok(Json(SaveOrderResponse {
            success: true,
            message: "Расстановка сохранена".into(),
        })),
        Err(e @ OrderServiceError::InvalidRequest(_)) => Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )),
        Err(e) => {
            tracing::error!("save_order failed: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Внутренняя ошибка сервера".into(),
                }),
            ))
        }
    }
}

/// DELETE /api/order?scope=
pub async fn reset_order(Query(query): Query<ScopeQuery>) -> StatusCode {
    match service::reset(&query.scope).await {
        Ok(true) => StatusCode::OK,
        Ok(false) => StatusCode::NOT_FOUND,
        Err(e) => {
            tracing::error!("reset_order failed: {}", e);
            status_for(&e)
        }
    }
}
