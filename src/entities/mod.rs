//! Records handled by the item form

pub mod item;

pub use item::Item;
