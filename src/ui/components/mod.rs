pub mod cheatsheet;
pub mod expression;
pub mod keypad;
pub mod menu;
pub mod progress_bar;
pub mod question;
pub mod summary;
