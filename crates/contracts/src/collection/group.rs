use serde::{Deserialize, Serialize};

use crate::collection::item::ItemId;

// ============================================================================
// ID Type
// ============================================================================

/// Идентификатор группы (колонка канбана, секция дашборда).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(pub String);

impl GroupId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for GroupId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GroupId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

// ============================================================================
// Group
// ============================================================================

/// Контейнер элементов со своим порядком детей.
///
/// Инвариант (поддерживается ядром): каждый элемент из `children` существует
/// в реестре и числится ровно в одной группе.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub name: String,

    /// Упорядоченный список дочерних элементов.
    #[serde(default)]
    pub children: Vec<ItemId>,

    /// Мягкий WIP-лимит. Не запрещает перенос — только подсвечивается
    /// в интерфейсе как переполнение.
    #[serde(default)]
    pub wip_limit: Option<usize>,
}

impl Group {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: GroupId::new(id),
            name: name.into(),
            children: Vec::new(),
            wip_limit: None,
        }
    }

    pub fn with_children(mut self, children: Vec<ItemId>) -> Self {
        self.children = children;
        self
    }

    pub fn with_wip_limit(mut self, limit: usize) -> Self {
        self.wip_limit = Some(limit);
        self
    }
}
