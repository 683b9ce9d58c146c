//! Terminal front end: menu, table view and the key-driven controller.

pub mod app;
pub mod controller;
pub mod ui;
