//! Клиентское ядро упорядоченных коллекций.
//!
//! Держит согласованными: оптимистичные локальные перестановки (drag'n'drop),
//! сохраненное на сервере состояние и производные группировки/агрегаты для
//! отображения. Привязка к конкретному UI и к источнику жестов — вне ядра.
//!
//! Поток данных: источники → [`registry`] → [`order`] (применяет сохраненный
//! порядок) → [`drag`] (по жесту мутирует порядок) → [`grouping`] (корзины
//! для отображения). [`sync`] наблюдает мутации и выталкивает их на сервер
//! отдельно от жестов.

pub mod board;
pub mod drag;
pub mod grouping;
pub mod order;
pub mod registry;
pub mod sync;
