//! Реестр элементов: слияние нескольких источников в один стабильный список.
//!
//! Календарь собирается из событий, спринтов и загрузки сотрудников — реестр
//! склеивает такие наборы в один упорядоченный список без дубликатов.

use std::collections::HashSet;

use contracts::collection::{Item, ItemId};

/// Элемент, отклоненный при загрузке (пустой идентификатор).
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedItem {
    /// Метка источника, из которого пришел элемент.
    pub source: String,
    /// Позиция внутри источника.
    pub index: usize,
    pub title: String,
}

/// Результат слияния источников.
#[derive(Debug, Clone, Default)]
pub struct IngestOutcome {
    pub items: Vec<Item>,
    /// Ошибки данных: отклонено, но не потеряно молча.
    pub rejected: Vec<RejectedItem>,
}

/// Разница между двумя срезами реестра.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ItemDiff {
    pub added: Vec<ItemId>,
    pub removed: Vec<ItemId>,
}

impl ItemDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Слияние помеченных источников в один список без дубликатов.
///
/// Ключ дедупликации — идентификатор элемента; при коллизии побеждает
/// первый по порядку аргументов источник. Порядок результата: весь первый
/// источник как есть, затем еще не встречавшиеся элементы второго и т.д.
///
/// Элементы без идентификатора не попадают в результат, но возвращаются
/// в `rejected` и пишутся в лог.
pub fn ingest(sources: Vec<(&str, Vec<Item>)>) -> IngestOutcome {
    let mut outcome = IngestOutcome::default();
    let mut seen: HashSet<ItemId> = HashSet::new();

    for (tag, items) in sources {
        for (index, item) in items.into_iter().enumerate() {
            if !item.id.is_valid() {
                log::warn!(
                    "Элемент без идентификатора отклонен: источник '{}', позиция {}",
                    tag,
                    index
                );
                outcome.rejected.push(RejectedItem {
                    source: tag.to_string(),
                    index,
                    title: item.title,
                });
                continue;
            }
            if seen.insert(item.id.clone()) {
                outcome.items.push(item);
            }
        }
    }

    outcome
}

/// Разница между предыдущим и следующим срезом реестра.
///
/// Используется хранилищем порядка для сверки сохраненной перестановки.
/// Порядок в `added`/`removed` — порядок обнаружения.
pub fn diff(previous: &[Item], next: &[Item]) -> ItemDiff {
    let prev_ids: HashSet<&ItemId> = previous.iter().map(|i| &i.id).collect();
    let next_ids: HashSet<&ItemId> = next.iter().map(|i| &i.id).collect();

    ItemDiff {
        added: next
            .iter()
            .filter(|i| !prev_ids.contains(&i.id))
            .map(|i| i.id.clone())
            .collect(),
        removed: previous
            .iter()
            .filter(|i| !next_ids.contains(&i.id))
            .map(|i| i.id.clone())
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(items: &[Item]) -> Vec<&str> {
        items.iter().map(|i| i.id.as_str()).collect()
    }

    #[test]
    fn test_ingest_merges_in_source_order() {
        let events = vec![Item::new("e1", "Событие 1"), Item::new("e2", "Событие 2")];
        let sprints = vec![Item::new("s1", "Спринт 1")];

        let outcome = ingest(vec![("events", events), ("sprints", sprints)]);

        assert_eq!(ids(&outcome.items), vec!["e1", "e2", "s1"]);
        assert!(outcome.rejected.is_empty());
    }

    #[test]
    fn test_ingest_first_source_wins_on_collision() {
        let events = vec![Item::new("x", "Из событий")];
        let sprints = vec![Item::new("x", "Из спринтов"), Item::new("s1", "Спринт")];

        let outcome = ingest(vec![("events", events), ("sprints", sprints)]);

        assert_eq!(ids(&outcome.items), vec!["x", "s1"]);
        assert_eq!(outcome.items[0].title, "Из событий");
    }

    #[test]
    fn test_ingest_rejects_empty_id() {
        let items = vec![Item::new("", "Без идентификатора"), Item::new("a", "Ок")];

        let outcome = ingest(vec![("events", items)]);

        assert_eq!(ids(&outcome.items), vec!["a"]);
        assert_eq!(outcome.rejected.len(), 1);
        assert_eq!(outcome.rejected[0].source, "events");
        assert_eq!(outcome.rejected[0].index, 0);
    }

    #[test]
    fn test_diff_added_and_removed() {
        let prev = vec![Item::new("a", "A"), Item::new("b", "B")];
        let next = vec![Item::new("b", "B"), Item::new("c", "C")];

        let d = diff(&prev, &next);

        assert_eq!(d.added, vec![ItemId::new("c")]);
        assert_eq!(d.removed, vec![ItemId::new("a")]);
    }

    #[test]
    fn test_diff_empty_on_same_sets() {
        let prev = vec![Item::new("a", "A")];
        let next = vec![Item::new("a", "A")];
        assert!(diff(&prev, &next).is_empty());
    }
}
