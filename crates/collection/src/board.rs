//! Доска: группы с упорядоченными детьми плюс реестр элементов.
//!
//! Единственное место, где элемент меняет родителя. Перенос между группами —
//! одна атомарная операция: снаружи не наблюдается состояние, в котором
//! элемент числится в нуле или в двух группах.

use std::collections::{HashMap, HashSet};

use contracts::collection::{Group, GroupId, Item, ItemId};
use thiserror::Error;

use crate::order::apply_move;

#[derive(Debug, Error, PartialEq)]
pub enum BoardError {
    #[error("элемент не найден: {0}")]
    UnknownItem(String),
    #[error("группа не найдена: {0}")]
    UnknownGroup(String),
}

/// Доска из упорядоченных групп и принадлежащих им элементов.
#[derive(Debug, Clone)]
pub struct Board {
    groups: Vec<Group>,
    items: HashMap<ItemId, Item>,
    /// Элементы верхнего уровня (вне групп) в порядке поступления.
    top_level: Vec<ItemId>,
}

impl Board {
    /// Сборка доски из определений групп и результата реестра.
    ///
    /// Ссылки детей на несуществующие элементы отбрасываются; элементы
    /// с несуществующим или пустым родителем попадают на верхний уровень.
    /// Элементы с родителем, не перечисленные в `children` группы,
    /// дописываются в ее хвост.
    pub fn build(groups: Vec<Group>, items: Vec<Item>) -> Self {
        let known_groups: HashSet<GroupId> = groups.iter().map(|g| g.id.clone()).collect();
        let mut item_map: HashMap<ItemId, Item> = HashMap::new();
        let mut top_level: Vec<ItemId> = Vec::new();

        for mut item in items {
            if let Some(group) = &item.group {
                if !known_groups.contains(group) {
                    log::warn!(
                        "Элемент '{}' ссылается на несуществующую группу '{}'",
                        item.id,
                        group
                    );
                    item.group = None;
                }
            }
            if item.group.is_none() {
                top_level.push(item.id.clone());
            }
            item_map.insert(item.id.clone(), item);
        }

        let mut groups: Vec<Group> = groups
            .into_iter()
            .map(|mut g| {
                // Висячие ссылки и чужие дети выбрасываются при сборке
                let group_id = g.id.clone();
                g.children.retain(|child| {
                    item_map
                        .get(child)
                        .map(|item| item.group.as_ref() == Some(&group_id))
                        .unwrap_or(false)
                });
                g
            })
            .collect();

        for group in groups.iter_mut() {
            let mut listed: HashSet<ItemId> = group.children.iter().cloned().collect();
            let mut appended: Vec<ItemId> = Vec::new();
            for (id, item) in &item_map {
                if item.group.as_ref() == Some(&group.id) && !listed.contains(id) {
                    listed.insert(id.clone());
                    appended.push(id.clone());
                }
            }
            // Детерминированный хвост для элементов, которых не было в children
            appended.sort_by(|a, b| a.as_str().cmp(b.as_str()));
            group.children.extend(appended);
        }

        Self {
            groups,
            items: item_map,
            top_level,
        }
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn group_order(&self) -> Vec<String> {
        self.groups.iter().map(|g| g.id.as_str().to_string()).collect()
    }

    pub fn item(&self, id: &ItemId) -> Option<&Item> {
        self.items.get(id)
    }

    pub fn top_level(&self) -> &[ItemId] {
        &self.top_level
    }

    pub fn group(&self, id: &GroupId) -> Option<&Group> {
        self.groups.iter().find(|g| &g.id == id)
    }

    fn group_mut(&mut self, id: &GroupId) -> Option<&mut Group> {
        self.groups.iter_mut().find(|g| &g.id == id)
    }

    /// Группа, в которой сейчас числится элемент.
    pub fn group_of(&self, id: &ItemId) -> Option<&GroupId> {
        self.items.get(id).and_then(|item| item.group.as_ref())
    }

    /// Мягкая проверка WIP-лимита: переполнена ли группа. Перенос при этом
    /// не запрещается — результат нужен только для подсветки.
    pub fn over_capacity(&self, id: &GroupId) -> bool {
        self.group(id)
            .and_then(|g| g.wip_limit.map(|limit| g.children.len() > limit))
            .unwrap_or(false)
    }

    /// Перестановка самой группы внутри порядка групп.
    pub fn move_group(&mut self, id: &GroupId, new_index: usize) -> Result<bool, BoardError> {
        let current = self
            .groups
            .iter()
            .position(|g| &g.id == id)
            .ok_or_else(|| BoardError::UnknownGroup(id.to_string()))?;
        let clamped = new_index.min(self.groups.len().saturating_sub(1));
        if clamped == current {
            return Ok(false);
        }
        let group = self.groups.remove(current);
        self.groups.insert(clamped, group);
        Ok(true)
    }

    /// Перестановка элемента внутри его группы.
    pub fn move_item_within(&mut self, id: &ItemId, new_index: usize) -> Result<bool, BoardError> {
        let group_id = self
            .group_of(id)
            .cloned()
            .ok_or_else(|| BoardError::UnknownItem(id.to_string()))?;
        let group = self
            .group_mut(&group_id)
            .ok_or_else(|| BoardError::UnknownGroup(group_id.to_string()))?;

        let order: Vec<String> = group.children.iter().map(|c| c.0.clone()).collect();
        let next = apply_move(&order, id.as_str(), new_index);
        if next == order {
            return Ok(false);
        }
        group.children = next.into_iter().map(ItemId).collect();
        Ok(true)
    }

    /// Атомарный перенос элемента в другую группу.
    ///
    /// Удаление из исходной группы, вставка в целевую (по индексу или
    /// в хвост) и смена родителя происходят за один вызов.
    pub fn move_item_across(
        &mut self,
        id: &ItemId,
        target: &GroupId,
        index: Option<usize>,
    ) -> Result<(), BoardError> {
        if !self.items.contains_key(id) {
            return Err(BoardError::UnknownItem(id.to_string()));
        }
        if self.group(target).is_none() {
            return Err(BoardError::UnknownGroup(target.to_string()));
        }

        // Удаление из текущего места
        match self.group_of(id).cloned() {
            Some(source) => {
                if let Some(group) = self.group_mut(&source) {
                    group.children.retain(|c| c != id);
                }
            }
            None => self.top_level.retain(|c| c != id),
        }

        // Вставка в целевую группу
        let group = self
            .group_mut(target)
            .expect("target group checked above");
        let at = index
            .unwrap_or(group.children.len())
            .min(group.children.len());
        group.children.insert(at, id.clone());

        // Смена родителя
        if let Some(item) = self.items.get_mut(id) {
            item.group = Some(target.clone());
        }

        Ok(())
    }

    /// Проверка инвариантов: каждый элемент ровно в одной группе или на
    /// верхнем уровне, все ссылки детей разрешаются.
    pub fn check_invariants(&self) -> Result<(), String> {
        let mut seen: HashSet<&ItemId> = HashSet::new();
        for group in &self.groups {
            for child in &group.children {
                let item = self
                    .items
                    .get(child)
                    .ok_or_else(|| format!("висячая ссылка: {}", child))?;
                if item.group.as_ref() != Some(&group.id) {
                    return Err(format!(
                        "родитель элемента '{}' не совпадает с группой '{}'",
                        child, group.id
                    ));
                }
                if !seen.insert(child) {
                    return Err(format!("элемент '{}' числится в двух группах", child));
                }
            }
        }
        for id in &self.top_level {
            if !seen.insert(id) {
                return Err(format!("элемент '{}' и на верхнем уровне, и в группе", id));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kanban() -> Board {
        let groups = vec![
            Group::new("A", "В работе")
                .with_children(vec![ItemId::new("c1"), ItemId::new("c2")]),
            Group::new("B", "Готово").with_children(vec![ItemId::new("c3")]),
        ];
        let items = vec![
            Item::new("c1", "Карточка 1").with_group("A"),
            Item::new("c2", "Карточка 2").with_group("A"),
            Item::new("c3", "Карточка 3").with_group("B"),
        ];
        Board::build(groups, items)
    }

    fn children(board: &Board, group: &str) -> Vec<String> {
        board
            .group(&GroupId::new(group))
            .unwrap()
            .children
            .iter()
            .map(|c| c.0.clone())
            .collect()
    }

    #[test]
    fn test_cross_group_move_is_atomic() {
        let mut board = kanban();
        board
            .move_item_across(&ItemId::new("c1"), &GroupId::new("B"), Some(0))
            .unwrap();

        assert_eq!(children(&board, "A"), vec!["c2"]);
        assert_eq!(children(&board, "B"), vec!["c1", "c3"]);
        assert_eq!(board.group_of(&ItemId::new("c1")), Some(&GroupId::new("B")));
        board.check_invariants().unwrap();
    }

    #[test]
    fn test_cross_group_move_appends_without_index() {
        let mut board = kanban();
        board
            .move_item_across(&ItemId::new("c2"), &GroupId::new("B"), None)
            .unwrap();
        assert_eq!(children(&board, "B"), vec!["c3", "c2"]);
        board.check_invariants().unwrap();
    }

    #[test]
    fn test_move_within_group() {
        let mut board = kanban();
        assert!(board.move_item_within(&ItemId::new("c2"), 0).unwrap());
        assert_eq!(children(&board, "A"), vec!["c2", "c1"]);
        board.check_invariants().unwrap();
    }

    #[test]
    fn test_move_group_reorders() {
        let mut board = kanban();
        assert!(board.move_group(&GroupId::new("B"), 0).unwrap());
        assert_eq!(board.group_order(), vec!["B", "A"]);
    }

    #[test]
    fn test_unknown_targets_are_errors() {
        let mut board = kanban();
        assert_eq!(
            board.move_item_across(&ItemId::new("ghost"), &GroupId::new("B"), None),
            Err(BoardError::UnknownItem("ghost".into()))
        );
        assert_eq!(
            board.move_item_across(&ItemId::new("c1"), &GroupId::new("Z"), None),
            Err(BoardError::UnknownGroup("Z".into()))
        );
    }

    #[test]
    fn test_build_recovers_dangling_references() {
        let groups = vec![
            Group::new("A", "Группа").with_children(vec![ItemId::new("ghost"), ItemId::new("c1")])
        ];
        let items = vec![
            Item::new("c1", "Есть").with_group("A"),
            Item::new("c2", "Родителя нет").with_group("Z"),
        ];

        let board = Board::build(groups, items);
        assert_eq!(children(&board, "A"), vec!["c1"]);
        assert_eq!(board.top_level(), [ItemId::new("c2")]);
        board.check_invariants().unwrap();
    }

    #[test]
    fn test_wip_limit_is_advisory() {
        let groups = vec![
            Group::new("A", "A").with_children(vec![ItemId::new("c1")]),
            Group::new("B", "B")
                .with_children(vec![ItemId::new("c2")])
                .with_wip_limit(1),
        ];
        let items = vec![
            Item::new("c1", "1").with_group("A"),
            Item::new("c2", "2").with_group("B"),
        ];
        let mut board = Board::build(groups, items);

        assert!(!board.over_capacity(&GroupId::new("B")));
        // Перенос сверх лимита принимается
        board
            .move_item_across(&ItemId::new("c1"), &GroupId::new("B"), None)
            .unwrap();
        assert!(board.over_capacity(&GroupId::new("B")));
        assert_eq!(children(&board, "B"), vec!["c2", "c1"]);
    }
}
