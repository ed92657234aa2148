pub mod items;
pub mod monsters;
