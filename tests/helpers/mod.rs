// Shared fixtures for the tab integration suites.
//
// Every suite drives the full route table against the in-memory stores. The
// catalog is seeded with:
//   product 42 (default category 3), product 43, category 3,
//   content 9 (default folder 7), folder 7
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{test, web, App, HttpMessage};
use async_trait::async_trait;

use tabs::config::AppConfig;
use tabs::core::Result;
use tabs::middleware::AdminGrant;
use tabs::tabs::models::{CatalogEntity, EntityKind, TabQuery, TabRecord};
use tabs::tabs::repositories::{MemoryCatalogStore, MemoryTabStore, TabStore};
use tabs::tabs::services::{EventDispatcher, LoggingListener, TabsEvent, TabsListener};
use tabs::TabsState;

/// Remembers the name of every dispatched event
#[derive(Default)]
pub struct RecordingListener {
    names: Mutex<Vec<String>>,
}

impl RecordingListener {
    pub fn names(&self) -> Vec<String> {
        self.names.lock().unwrap().clone()
    }
}

#[async_trait]
impl TabsListener for RecordingListener {
    async fn handle(&self, event: &TabsEvent) -> Result<()> {
        self.names.lock().unwrap().push(event.name().to_string());
        Ok(())
    }
}

/// In-memory log sink for asserting on emitted log lines
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    /// Route this thread's `tracing` output into the sink until the guard drops
    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        let sink = self.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || sink.clone())
            .with_ansi(false)
            .without_time()
            .with_max_level(tracing::Level::DEBUG)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl std::io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

pub struct TestContext {
    pub tabs: Arc<MemoryTabStore>,
    pub catalog: Arc<MemoryCatalogStore>,
    pub events: Arc<RecordingListener>,
    pub state: web::Data<TabsState>,
}

pub fn app_config() -> AppConfig {
    AppConfig {
        env: "test".to_string(),
        log_level: "debug".to_string(),
        log_format: "text".to_string(),
        base_url: "http://localhost:8080".to_string(),
        default_locale: "en_US".to_string(),
    }
}

impl TestContext {
    pub async fn new() -> Self {
        let catalog = Arc::new(MemoryCatalogStore::new());
        for entity in [
            CatalogEntity::new(EntityKind::Product, 42)
                .with_title("Laptop")
                .with_default_parent(3),
            CatalogEntity::new(EntityKind::Product, 43),
            CatalogEntity::new(EntityKind::Category, 3).with_title("Computers"),
            CatalogEntity::new(EntityKind::Content, 9)
                .with_title("Warranty")
                .with_default_parent(7),
            CatalogEntity::new(EntityKind::Folder, 7).with_title("Legal"),
        ] {
            catalog.insert(entity).await;
        }

        let tabs = Arc::new(MemoryTabStore::new());
        let events = Arc::new(RecordingListener::default());
        let dispatcher = EventDispatcher::new()
            .with_listener(Arc::new(LoggingListener))
            .with_listener(events.clone());

        let state = tabs::tabs_state(tabs.clone(), catalog.clone(), dispatcher, &app_config())
            .expect("test state");

        Self {
            tabs,
            catalog,
            events,
            state,
        }
    }

    /// Full route table with `grant` attached to every request, as the
    /// admin authentication middleware would
    pub fn app(
        &self,
        grant: AdminGrant,
    ) -> App<
        impl ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse<impl MessageBody>,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(self.state.clone())
            .wrap_fn(move |req, srv| {
                req.extensions_mut().insert(grant.clone());
                srv.call(req)
            })
            .configure(tabs::configure)
            .default_service(web::to(tabs::not_found))
    }

    /// Tabs of one owner in display order
    pub async fn owner_tabs(&self, kind: EntityKind, owner_id: i32) -> Vec<TabRecord> {
        self.tabs
            .find(kind, &TabQuery::new().filter_by_owner(owner_id))
            .await
            .unwrap()
    }

    /// Insert a tab record directly, bypassing position sequencing
    pub async fn seed_tab(&self, kind: EntityKind, id: i32, owner_id: i32, position: i32) {
        let now = chrono::Utc::now();
        self.tabs
            .seed(TabRecord {
                id,
                kind,
                owner_id,
                position,
                visible: true,
                created_at: now,
                updated_at: now,
            })
            .await;
    }
}

pub fn post_form(uri: &str, fields: &[(&str, &str)]) -> actix_web::test::TestRequest {
    test::TestRequest::post().uri(uri).set_form(fields)
}

pub fn location<B>(resp: &ServiceResponse<B>) -> String {
    resp.headers()
        .get(actix_web::http::header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string()
}
