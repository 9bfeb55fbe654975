use contracts::collection::order::{OrderRecord, ScopeKey};
use contracts::sync::SaveOrderRequest;
use thiserror::Error;

use super::repository;

#[derive(Debug, Error)]
pub enum OrderServiceError {
    /// Ошибка входных данных — на границе HTTP это 400, не 500.
    #[error("{0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

fn require_scope(scope: &str) -> Result<(), OrderServiceError> {
    if scope.trim().is_empty() {
        return Err(OrderServiceError::InvalidRequest(
            "Ключ области не может быть пустым".into(),
        ));
    }
    Ok(())
}

/// Чтение расстановки по области
pub async fn get_by_scope(scope: &str) -> Result<Option<OrderRecord>, OrderServiceError> {
    require_scope(scope)?;
    Ok(repository::get_by_scope(scope).await?)
}

/// Сохранение расстановки (создание или обновление)
pub async fn save(request: SaveOrderRequest) -> Result<(), OrderServiceError> {
    let mut record = OrderRecord::new(ScopeKey::new(request.scope), request.order);
    record.hidden = request.hidden;

    // Валидация
    record.validate().map_err(OrderServiceError::InvalidRequest)?;

    Ok(repository::upsert(&record).await?)
}

/// Явный сброс расстановки
pub async fn reset(scope: &str) -> Result<bool, OrderServiceError> {
    require_scope(scope)?;
    Ok(repository::delete_by_scope(scope).await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(scope: &str, order: &[&str]) -> SaveOrderRequest {
        SaveOrderRequest {
            scope: scope.into(),
            order: order.iter().map(|s| s.to_string()).collect(),
            hidden: vec![],
        }
    }

    #[tokio::test]
    async fn test_get_rejects_empty_scope_as_invalid_request() {
        let err = get_by_scope("  ").await.unwrap_err();
        assert!(matches!(err, OrderServiceError::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn test_reset_rejects_empty_scope_as_invalid_request() {
        let err = reset("").await.unwrap_err();
        assert!(matches!(err, OrderServiceError::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn test_save_rejects_duplicates_and_empty_ids() {
        let err = save(request("s", &["a", "a"])).await.unwrap_err();
        assert!(matches!(err, OrderServiceError::InvalidRequest(_)));

        let err = save(request("s", &["a", ""])).await.unwrap_err();
        assert!(matches!(err, OrderServiceError::InvalidRequest(_)));

        let err = save(request("", &["a"])).await.unwrap_err();
        assert!(matches!(err, OrderServiceError::InvalidRequest(_)));
    }
}
