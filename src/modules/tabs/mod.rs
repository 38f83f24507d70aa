pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use controllers::TabsState;
pub use models::EntityKind;
pub use services::TabService;
