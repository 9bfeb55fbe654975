use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::collection::group::GroupId;

// ============================================================================
// ID Type
// ============================================================================

/// Стабильный идентификатор элемента коллекции (виджет, карточка, событие).
///
/// Идентификатор всегда приходит из источника данных — он никогда не
/// выводится из внутренних ключей рендеринга.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub String);

impl ItemId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Пустой идентификатор — ошибка данных, такой элемент отклоняется
    /// при загрузке в реестр.
    pub fn is_valid(&self) -> bool {
        !self.0.trim().is_empty()
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

// ============================================================================
// Item
// ============================================================================

/// Элемент упорядочиваемой коллекции.
///
/// Ядро переставляет и перегруппировывает элементы, но не порождает их
/// содержимое: `payload` непрозрачен и отдается рендеру как есть.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,

    /// Родительская группа; None — элемент верхнего уровня (вне групп).
    pub group: Option<GroupId>,

    pub title: String,

    /// Непрозрачная нагрузка для отображения.
    #[serde(default)]
    pub payload: serde_json::Value,

    #[serde(default = "default_visible")]
    pub visible: bool,

    /// Денежное значение в минорных единицах (копейках). Перевод в рубли
    /// происходит только на границе рендера.
    #[serde(default)]
    pub amount: Option<i64>,

    /// Диапазон дат `[starts_on, ends_on]`, обе границы включительно.
    #[serde(default)]
    pub starts_on: Option<NaiveDate>,
    #[serde(default)]
    pub ends_on: Option<NaiveDate>,
}

fn default_visible() -> bool {
    true
}

impl Item {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: ItemId::new(id),
            group: None,
            title: title.into(),
            payload: serde_json::Value::Null,
            visible: true,
            amount: None,
            starts_on: None,
            ends_on: None,
        }
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(GroupId::new(group));
        self
    }

    pub fn with_amount(mut self, amount: i64) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn with_dates(mut self, starts_on: NaiveDate, ends_on: NaiveDate) -> Self {
        self.starts_on = Some(starts_on);
        self.ends_on = Some(ends_on);
        self
    }
}
