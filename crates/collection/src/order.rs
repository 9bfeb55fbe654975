//! Хранилище порядка: сохраненная перестановка идентификаторов поверх
//! живого набора элементов.
//!
//! Сохраненный порядок всегда сверяется с живым набором перед использованием:
//! исчезнувшие идентификаторы отбрасываются, новые дописываются в хвост
//! в своем естественном порядке.

use std::collections::HashSet;

use contracts::collection::{Item, ScopeKey};
use contracts::sync::{OrderStateDto, SaveOrderRequest};

/// Сверка сохраненного порядка с живым набором.
///
/// Результат: `stored`, отфильтрованный до живых идентификаторов, затем
/// живые идентификаторы, которых нет в `stored`, в их относительном порядке.
/// Идемпотентна; результат — всегда перестановка живого набора (дубликаты
/// на входе схлопываются до первого вхождения).
pub fn reconcile(stored: &[String], live: &[String]) -> Vec<String> {
    let live_set: HashSet<&str> = live.iter().map(|s| s.as_str()).collect();
    let mut result: Vec<String> = Vec::with_capacity(live.len());
    let mut taken: HashSet<&str> = HashSet::with_capacity(live.len());

    for id in stored {
        if live_set.contains(id.as_str()) && taken.insert(id.as_str()) {
            result.push(id.clone());
        }
    }
    for id in live {
        if taken.insert(id.as_str()) {
            result.push(id.clone());
        }
    }

    result
}

/// Перенос `moved` на позицию `new_index` (с зажимом в `[0, len-1]`).
///
/// Возвращает равный список, если индекс не меняется или идентификатор
/// отсутствует.
pub fn apply_move(order: &[String], moved: &str, new_index: usize) -> Vec<String> {
    let Some(current) = order.iter().position(|id| id == moved) else {
        return order.to_vec();
    };
    let clamped = new_index.min(order.len().saturating_sub(1));
    if clamped == current {
        return order.to_vec();
    }

    let mut result = order.to_vec();
    let id = result.remove(current);
    result.insert(clamped, id);
    result
}

/// Проверка формы сохраненного порядка.
///
/// Все, что не является массивом строк, считается отсутствующим состоянием:
/// пишем предупреждение и откатываемся к естественному порядку, не роняя
/// вызывающего.
pub fn parse_stored_order(value: &serde_json::Value) -> Option<Vec<String>> {
    let Some(entries) = value.as_array() else {
        log::warn!("Сохраненный порядок имеет неверную форму: не массив");
        return None;
    };
    let mut order = Vec::with_capacity(entries.len());
    for entry in entries {
        match entry.as_str() {
            Some(s) => order.push(s.to_string()),
            None => {
                log::warn!("Сохраненный порядок содержит не-строку: {}", entry);
                return None;
            }
        }
    }
    Some(order)
}

// ============================================================================
// Order Store
// ============================================================================

/// Текущее состояние расстановки для одной области.
///
/// Владеет перестановкой и набором скрытых элементов; каждая мутация
/// увеличивает `revision` — по нему очередь синхронизации понимает, что
/// локальное состояние новее уже отправленного (last-write-wins).
#[derive(Debug, Clone)]
pub struct OrderStore {
    scope: ScopeKey,
    order: Vec<String>,
    hidden: HashSet<String>,
    revision: u64,
}

impl OrderStore {
    /// Инициализация из состояния, полученного с сервера (или пустого),
    /// сверенного с живым набором.
    pub fn seed(scope: ScopeKey, pulled: Option<OrderStateDto>, live: &[String]) -> Self {
        let pulled = pulled.unwrap_or_default();
        Self {
            scope,
            order: reconcile(&pulled.order, live),
            hidden: pulled.hidden.into_iter().collect(),
            revision: 0,
        }
    }

    pub fn scope(&self) -> &ScopeKey {
        &self.scope
    }

    pub fn order(&self) -> &[String] {
        &self.order
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn is_hidden(&self, id: &str) -> bool {
        self.hidden.contains(id)
    }

    /// Видимые идентификаторы в текущем порядке.
    pub fn visible_order(&self) -> Vec<String> {
        self.order
            .iter()
            .filter(|id| !self.hidden.contains(id.as_str()))
            .cloned()
            .collect()
    }

    /// Элементы к показу в порядке расстановки.
    ///
    /// Пропускаются и скрытые пользователем (`hidden`), и выключенные
    /// самим источником (`visible == false`) элементы.
    pub fn display_items<'a>(&self, items: &'a [Item]) -> Vec<&'a Item> {
        self.order
            .iter()
            .filter(|id| !self.hidden.contains(id.as_str()))
            .filter_map(|id| {
                items
                    .iter()
                    .find(|item| item.id.as_str() == id.as_str())
                    .filter(|item| item.visible)
            })
            .collect()
    }

    /// Повторная сверка после изменения живого набора
    /// (элементы добавились или пропали между обновлениями).
    pub fn sync_with_live(&mut self, live: &[String]) {
        let next = reconcile(&self.order, live);
        if next != self.order {
            self.order = next;
            self.hidden.retain(|id| self.order.iter().any(|o| o == id));
            self.revision += 1;
        }
    }

    /// Перенос элемента; ревизия растет только при фактическом изменении.
    pub fn move_to(&mut self, id: &str, new_index: usize) -> bool {
        let next = apply_move(&self.order, id, new_index);
        if next == self.order {
            return false;
        }
        self.order = next;
        self.revision += 1;
        true
    }

    pub fn set_hidden(&mut self, id: &str, hidden: bool) {
        let changed = if hidden {
            self.hidden.insert(id.to_string())
        } else {
            self.hidden.remove(id)
        };
        if changed {
            self.revision += 1;
        }
    }

    pub fn toggle_hidden(&mut self, id: &str) {
        let hidden = !self.is_hidden(id);
        self.set_hidden(id, hidden);
    }

    /// Снимок для отправки на сервер. `hidden` отдается в порядке общей
    /// перестановки, чтобы снимок был детерминированным.
    pub fn snapshot(&self) -> SaveOrderRequest {
        SaveOrderRequest {
            scope: self.scope.as_str().to_string(),
            order: self.order.clone(),
            hidden: self
                .order
                .iter()
                .filter(|id| self.hidden.contains(id.as_str()))
                .cloned()
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn v(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_reconcile_natural_order_when_nothing_stored() {
        let live = v(&["budget", "trends", "expenses"]);
        assert_eq!(reconcile(&[], &live), live);
    }

    #[test]
    fn test_reconcile_appends_new_ids() {
        let stored = v(&["budget", "trends"]);
        let live = v(&["budget", "trends", "expenses"]);
        assert_eq!(reconcile(&stored, &live), v(&["budget", "trends", "expenses"]));
    }

    #[test]
    fn test_reconcile_drops_removed_ids() {
        let stored = v(&["budget", "trends", "expenses"]);
        let live = v(&["budget", "expenses"]);
        assert_eq!(reconcile(&stored, &live), v(&["budget", "expenses"]));
    }

    #[test]
    fn test_reconcile_is_idempotent() {
        let stored = v(&["c", "x", "a"]);
        let live = v(&["a", "b", "c"]);
        let once = reconcile(&stored, &live);
        let twice = reconcile(&once, &live);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_reconcile_output_is_permutation_of_live() {
        let stored = v(&["z", "b", "b", "q"]);
        let live = v(&["a", "b", "c", "b"]);
        let result = reconcile(&stored, &live);

        let mut sorted = result.clone();
        sorted.sort();
        assert_eq!(sorted, v(&["a", "b", "c"]));
    }

    #[test]
    fn test_apply_move_noop_on_same_index() {
        let order = v(&["a", "b", "c"]);
        assert_eq!(apply_move(&order, "b", 1), order);
    }

    #[test]
    fn test_apply_move_reorders() {
        let order = v(&["budget", "trends", "expenses"]);
        assert_eq!(
            apply_move(&order, "expenses", 0),
            v(&["expenses", "budget", "trends"])
        );
    }

    #[test]
    fn test_apply_move_clamps_index() {
        let order = v(&["a", "b", "c"]);
        assert_eq!(apply_move(&order, "a", 99), v(&["b", "c", "a"]));
    }

    #[test]
    fn test_apply_move_is_permutation() {
        let order = v(&["a", "b", "c", "d"]);
        let mut moved = apply_move(&order, "c", 0);
        moved.sort();
        assert_eq!(moved, v(&["a", "b", "c", "d"]));
    }

    #[test]
    fn test_apply_move_unknown_id_is_noop() {
        let order = v(&["a", "b"]);
        assert_eq!(apply_move(&order, "ghost", 0), order);
    }

    #[test]
    fn test_parse_stored_order_accepts_string_array() {
        let value = json!(["a", "b"]);
        assert_eq!(parse_stored_order(&value), Some(v(&["a", "b"])));
    }

    #[test]
    fn test_parse_stored_order_rejects_malformed() {
        assert_eq!(parse_stored_order(&json!({"order": []})), None);
        assert_eq!(parse_stored_order(&json!(["a", 5])), None);
        assert_eq!(parse_stored_order(&json!(42)), None);
    }

    #[test]
    fn test_store_widget_reorder_scenario() {
        let live = v(&["budget", "trends", "expenses"]);
        let mut store = OrderStore::seed(ScopeKey::new("dashboard:u1"), None, &live);
        assert_eq!(store.order(), v(&["budget", "trends", "expenses"]));

        assert!(store.move_to("expenses", 0));
        assert_eq!(store.order(), v(&["expenses", "budget", "trends"]));
        assert_eq!(store.revision(), 1);
    }

    #[test]
    fn test_store_noop_move_keeps_revision() {
        let live = v(&["a", "b"]);
        let mut store = OrderStore::seed(ScopeKey::new("s"), None, &live);
        assert!(!store.move_to("a", 0));
        assert_eq!(store.revision(), 0);
    }

    #[test]
    fn test_store_hidden_roundtrip_and_snapshot() {
        let live = v(&["a", "b", "c"]);
        let mut store = OrderStore::seed(ScopeKey::new("s"), None, &live);
        store.toggle_hidden("b");
        assert!(store.is_hidden("b"));
        assert_eq!(store.visible_order(), v(&["a", "c"]));

        let snapshot = store.snapshot();
        assert_eq!(snapshot.order, v(&["a", "b", "c"]));
        assert_eq!(snapshot.hidden, v(&["b"]));
    }

    #[test]
    fn test_display_items_honor_source_visibility_flag() {
        let mut off = Item::new("b", "Выключен источником");
        off.visible = false;
        let items = vec![Item::new("a", "A"), off, Item::new("c", "C")];
        let live = v(&["a", "b", "c"]);

        let mut store = OrderStore::seed(ScopeKey::new("s"), None, &live);
        store.move_to("c", 0);
        store.set_hidden("a", true);

        // "b" отсекает флаг источника, "a" — пользовательское скрытие
        let shown: Vec<&str> = store
            .display_items(&items)
            .iter()
            .map(|i| i.id.as_str())
            .collect();
        assert_eq!(shown, vec!["c"]);
    }

    #[test]
    fn test_store_sync_with_live_drops_hidden_ghosts() {
        let live = v(&["a", "b"]);
        let mut store = OrderStore::seed(ScopeKey::new("s"), None, &live);
        store.set_hidden("b", true);

        store.sync_with_live(&v(&["a"]));
        assert_eq!(store.order(), v(&["a"]));
        assert!(store.snapshot().hidden.is_empty());
    }
}
