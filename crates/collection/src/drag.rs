//! Конечный автомат одного drag-жеста.
//!
//! Привязка к указателю/клавиатуре — снаружи; ядро потребляет
//! нормализованный поток событий: `on_start`, `on_over`, `on_end`,
//! `on_cancel`. Фаза `on_over` — чисто совещательная (предпросмотр),
//! состояние доски меняется только в `on_end`.

use contracts::collection::{GroupId, ItemId};

use crate::board::Board;

/// Что именно тащат. Домены не смешиваются: жест с элементом никогда не
/// переставляет группы, и наоборот.
#[derive(Debug, Clone, PartialEq)]
pub enum DragEntity {
    Item(ItemId),
    Group(GroupId),
}

/// Куда приземлится сброс (и для предпросмотра, и для фиксации).
#[derive(Debug, Clone, PartialEq)]
pub enum DropResolution {
    /// Цель невалидна или совпадает с источником — жест отменяется.
    Cancel,
    GroupMove { group: GroupId, to_index: usize },
    ItemWithin { item: ItemId, to_index: usize },
    ItemAcross {
        item: ItemId,
        target: GroupId,
        /// None — сброс на тело группы, вставка в хвост.
        index: Option<usize>,
    },
}

/// Итог завершенного жеста.
#[derive(Debug, Clone, PartialEq)]
pub enum DragOutcome {
    /// Доска изменилась; вызывающий ставит снимок в очередь синхронизации.
    Moved {
        entity: DragEntity,
        /// Целевая группа переполнила мягкий WIP-лимит (только подсветка).
        over_capacity: bool,
    },
    /// Сброс на то же место.
    NoOp,
    /// Отмена или невалидная цель: доска не тронута.
    Cancelled,
}

/// Контроллер жеста. Все переходы синхронны, между `on_start` и `on_end`
/// никакие мутации не происходят.
#[derive(Debug, Default)]
pub struct DragController {
    state: Option<DragEntity>,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.state.is_some()
    }

    pub fn active(&self) -> Option<&DragEntity> {
        self.state.as_ref()
    }

    /// Начало жеста. Повторный старт во время перетаскивания просто
    /// заменяет жест — предыдущий отбрасывается без мутаций.
    pub fn on_start(&mut self, entity: DragEntity) {
        self.state = Some(entity);
    }

    /// Предпросмотр: где оказался бы сброс. Никогда не мутирует доску.
    pub fn on_over(&self, board: &Board, over_id: &str) -> Option<DropResolution> {
        let active = self.state.as_ref()?;
        Some(resolve(board, active, Some(over_id)))
    }

    /// Отмена: доска остается байт-в-байт прежней.
    pub fn on_cancel(&mut self) {
        self.state = None;
    }

    /// Завершение жеста: единственная точка, где доска мутирует.
    pub fn on_end(&mut self, board: &mut Board, over_id: Option<&str>) -> DragOutcome {
        let Some(active) = self.state.take() else {
            return DragOutcome::Cancelled;
        };

        match resolve(board, &active, over_id) {
            DropResolution::Cancel => DragOutcome::Cancelled,
            DropResolution::GroupMove { group, to_index } => {
                match board.move_group(&group, to_index) {
                    Ok(true) => DragOutcome::Moved {
                        entity: active,
                        over_capacity: false,
                    },
                    Ok(false) => DragOutcome::NoOp,
                    Err(_) => DragOutcome::Cancelled,
                }
            }
            DropResolution::ItemWithin { item, to_index } => {
                match board.move_item_within(&item, to_index) {
                    Ok(true) => DragOutcome::Moved {
                        entity: active,
                        over_capacity: false,
                    },
                    Ok(false) => DragOutcome::NoOp,
                    Err(_) => DragOutcome::Cancelled,
                }
            }
            DropResolution::ItemAcross { item, target, index } => {
                match board.move_item_across(&item, &target, index) {
                    Ok(()) => DragOutcome::Moved {
                        entity: active,
                        over_capacity: board.over_capacity(&target),
                    },
                    Err(_) => DragOutcome::Cancelled,
                }
            }
        }
    }
}

/// Таблица разрешения цели сброса. Общая для предпросмотра и фиксации,
/// чтобы предпросмотр не мог разойтись с реальным результатом.
fn resolve(board: &Board, active: &DragEntity, over_id: Option<&str>) -> DropResolution {
    let Some(over) = over_id else {
        return DropResolution::Cancel;
    };

    match active {
        DragEntity::Group(group) => {
            if group.as_str() == over {
                return DropResolution::Cancel;
            }
            // Группу можно бросить только на группу
            match board
                .groups()
                .iter()
                .position(|g| g.id.as_str() == over)
            {
                Some(index) => DropResolution::GroupMove {
                    group: group.clone(),
                    to_index: index,
                },
                None => DropResolution::Cancel,
            }
        }
        DragEntity::Item(item) => {
            if item.as_str() == over {
                return DropResolution::Cancel;
            }
            let over_item = ItemId::new(over);
            if let Some(over_group) = board.group_of(&over_item).cloned() {
                let index = board
                    .group(&over_group)
                    .and_then(|g| g.children.iter().position(|c| c == &over_item))
                    .unwrap_or(0);
                if board.group_of(item) == Some(&over_group) {
                    DropResolution::ItemWithin {
                        item: item.clone(),
                        to_index: index,
                    }
                } else {
                    DropResolution::ItemAcross {
                        item: item.clone(),
                        target: over_group,
                        index: Some(index),
                    }
                }
            } else if let Some(group) = board.group(&GroupId::new(over)) {
                // Сброс на тело группы — в хвост
                if board.group_of(item) == Some(&group.id) {
                    let last = group.children.len().saturating_sub(1);
                    DropResolution::ItemWithin {
                        item: item.clone(),
                        to_index: last,
                    }
                } else {
                    DropResolution::ItemAcross {
                        item: item.clone(),
                        target: group.id.clone(),
                        index: None,
                    }
                }
            } else {
                DropResolution::Cancel
            }
        }
    }
}
