use serde::{Deserialize, Serialize};

/// Состояние расстановки, как его отдает и принимает persistence API.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct OrderStateDto {
    pub order: Vec<String>,
    #[serde(default)]
    pub hidden: Vec<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SaveOrderRequest {
    pub scope: String,
    pub order: Vec<String>,
    #[serde(default)]
    pub hidden: Vec<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct SaveOrderResponse {
    pub success: bool,
    pub message: String,
}

/// Тело ответа сервера при ошибке (не-2xx).
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ErrorResponse {
    pub error: String,
}
