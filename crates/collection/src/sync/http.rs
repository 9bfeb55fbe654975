//! HTTP-реализация границы persistence API.
//!
//! Маршруты: `GET /api/order?scope=`, `POST /api/order`,
//! `DELETE /api/order?scope=`. Конкретные имена маршрутов — деталь
//! продукта; контракт ядра — только семантика Result/Ack/SyncError.

use async_trait::async_trait;
use contracts::collection::ScopeKey;
use contracts::sync::{ErrorResponse, OrderStateDto, SaveOrderRequest, SaveOrderResponse};

use super::{OrderBackend, SyncAck, SyncError};

pub struct HttpOrderBackend {
    base_url: String,
    client: reqwest::Client,
}

impl HttpOrderBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    fn order_url(&self, scope: Option<&ScopeKey>) -> String {
        match scope {
            Some(scope) => format!(
                "{}/api/order?scope={}",
                self.base_url,
                urlencoding::encode(scope.as_str())
            ),
            None => format!("{}/api/order", self.base_url),
        }
    }

    /// Вытащить сообщение из тела ошибки; при нечитаемом теле — статус.
    async fn error_from(response: reqwest::Response) -> SyncError {
        let status = response.status().as_u16();
        let message = match response.json::<ErrorResponse>().await {
            Ok(body) => body.error,
            Err(_) => format!("HTTP {}", status),
        };
        SyncError::Http { status, message }
    }
}

#[async_trait]
impl OrderBackend for HttpOrderBackend {
    async fn pull(&self, scope: &ScopeKey) -> Result<Option<OrderStateDto>, SyncError> {
        let response = self
            .client
            .get(self.order_url(Some(scope)))
            .send()
            .await
            .map_err(|e| SyncError::Network(e.to_string()))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            // Запись еще не создавалась — это не ошибка
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }

        let state = response
            .json::<OrderStateDto>()
            .await
            .map_err(|e| SyncError::Decode(e.to_string()))?;
        Ok(Some(state))
    }

    async fn push(&self, request: &SaveOrderRequest) -> Result<SyncAck, SyncError> {
        let response = self
            .client
            .post(self.order_url(None))
            .json(request)
            .send()
            .await
            .map_err(|e| SyncError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }

        let body = response
            .json::<SaveOrderResponse>()
            .await
            .map_err(|e| SyncError::Decode(e.to_string()))?;
        if !body.success {
            return Err(SyncError::Rejected(body.message));
        }
        Ok(SyncAck {
            message: body.message,
        })
    }

    async fn reset(&self, scope: &ScopeKey) -> Result<(), SyncError> {
        let response = self
            .client
            .delete(self.order_url(Some(scope)))
            .send()
            .await
            .map_err(|e| SyncError::Network(e.to_string()))?;

        // Отсутствующая запись уже "сброшена"
        if response.status() == reqwest::StatusCode::NOT_FOUND || response.status().is_success() {
            return Ok(());
        }
        Err(Self::error_from(response).await)
    }
}
