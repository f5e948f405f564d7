pub mod help;
pub mod pages;
pub mod select;
