pub mod tab_controller;
pub mod view;

pub use tab_controller::{configure, TabsState};
