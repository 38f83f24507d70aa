pub mod health;
pub mod tabs;
