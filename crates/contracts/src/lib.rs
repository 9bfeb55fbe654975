pub mod collection;
pub mod sync;
