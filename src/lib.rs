//! Tabs administration service library
//!
//! Free-form tabs attached to catalog products, categories, contents and
//! folders: stores, position management and the admin HTTP handlers.

pub mod config;
pub mod core;
pub mod middleware;
pub mod modules;

use std::sync::Arc;

use actix_web::{http::StatusCode, web, HttpResponse};

use crate::config::AppConfig;
use crate::modules::tabs::repositories::{CatalogStore, TabStore};
use crate::modules::tabs::services::{AdminUrls, EventDispatcher, TabService};

// Re-export commonly used types
pub use modules::tabs;
pub use modules::tabs::{EntityKind, TabsState};

/// Assemble the tab handler state over a pair of stores
pub fn tabs_state(
    tabs: Arc<dyn TabStore>,
    catalog: Arc<dyn CatalogStore>,
    events: EventDispatcher,
    app: &AppConfig,
) -> crate::core::Result<web::Data<TabsState>> {
    let service = TabService::new(tabs, catalog, events, app.default_locale.clone());

    Ok(web::Data::new(TabsState {
        service: Arc::new(service),
        urls: AdminUrls::new(&app.base_url)?,
    }))
}

/// Register every route of the service
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.configure(modules::health::configure)
        .configure(modules::tabs::controllers::configure);
}

/// Fallback for unmatched routes
pub async fn not_found() -> HttpResponse {
    middleware::error_response(StatusCode::NOT_FOUND, "Resource not found".to_string())
}
