pub mod group;
pub mod item;
pub mod order;

pub use group::{Group, GroupId};
pub use item::{Item, ItemId};
pub use order::{OrderRecord, ScopeKey};
