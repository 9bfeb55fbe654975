use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Scope
// ============================================================================

/// Ключ области хранения пользовательской расстановки
/// (например `"dashboard:user-17"` или `"board:tenders"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScopeKey(pub String);

impl ScopeKey {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ScopeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Order Record
// ============================================================================

/// Сохраненная пользовательская расстановка: перестановка идентификаторов
/// плюс скрытые элементы.
///
/// Создается при первой настройке, обновляется при каждом успешном
/// переупорядочивании или переключении видимости, живет до явного сброса.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub scope: ScopeKey,
    pub order: Vec<String>,
    #[serde(default)]
    pub hidden: Vec<String>,
    pub updated_at: DateTime<Utc>,
}

impl OrderRecord {
    pub fn new(scope: ScopeKey, order: Vec<String>) -> Self {
        Self {
            scope,
            order,
            hidden: Vec::new(),
            updated_at: Utc::now(),
        }
    }

    /// Валидация данных
    pub fn validate(&self) -> Result<(), String> {
        if self.scope.as_str().trim().is_empty() {
            return Err("Ключ области не может быть пустым".into());
        }
        if self.order.iter().any(|id| id.trim().is_empty()) {
            return Err("Порядок содержит пустой идентификатор".into());
        }
        let mut seen = std::collections::HashSet::new();
        for id in &self.order {
            if !seen.insert(id.as_str()) {
                return Err(format!("Порядок содержит дубликат: {}", id));
            }
        }
        Ok(())
    }
}
