//! In-memory stores.
//!
//! Back the integration suites and service tests. Each mutation holds the
//! write lock for its whole duration, which makes it all-or-nothing like a
//! store transaction.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

use crate::core::{AppError, Result};
use crate::modules::tabs::models::{
    CatalogEntity, EntityKind, NewTab, TabChanges, TabQuery, TabRecord, TabTranslation,
};
use crate::modules::tabs::repositories::{CatalogStore, TabStore};
use crate::modules::tabs::services::position::{self, PositionChange, Slot};

#[derive(Default)]
pub struct MemoryCatalogStore {
    entities: RwLock<BTreeMap<(EntityKind, i32), CatalogEntity>>,
}

impl MemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, entity: CatalogEntity) {
        self.entities
            .write()
            .await
            .insert((entity.kind, entity.id), entity);
    }
}

#[async_trait]
impl CatalogStore for MemoryCatalogStore {
    async fn find(&self, kind: EntityKind, id: i32, _locale: &str) -> Result<Option<CatalogEntity>> {
        Ok(self.entities.read().await.get(&(kind, id)).cloned())
    }

    async fn list_ids(&self, kind: EntityKind) -> Result<Vec<i32>> {
        Ok(self
            .entities
            .read()
            .await
            .keys()
            .filter(|(k, _)| *k == kind)
            .map(|(_, id)| *id)
            .collect())
    }
}

#[derive(Default)]
struct Tables {
    next_id: HashMap<EntityKind, i32>,
    tabs: BTreeMap<(EntityKind, i32), TabRecord>,
    translations: BTreeMap<(EntityKind, i32, String), TabTranslation>,
}

impl Tables {
    fn siblings(&self, kind: EntityKind, owner_id: i32) -> Vec<Slot> {
        self.tabs
            .values()
            .filter(|tab| tab.kind == kind && tab.owner_id == owner_id)
            .map(|tab| (tab.id, tab.position))
            .collect()
    }

    fn write_positions(&mut self, kind: EntityKind, plan: &[Slot]) {
        let now = Utc::now();
        for (id, position) in plan {
            if let Some(tab) = self.tabs.get_mut(&(kind, *id)) {
                tab.position = *position;
                tab.updated_at = now;
            }
        }
    }

    fn upsert_translation(
        &mut self,
        kind: EntityKind,
        tab_id: i32,
        locale: &str,
        title: Option<String>,
        description: Option<String>,
    ) {
        let entry = self
            .translations
            .entry((kind, tab_id, locale.to_string()))
            .or_insert_with(|| TabTranslation {
                tab_id,
                locale: locale.to_string(),
                title: None,
                description: None,
                chapo: None,
                postscriptum: None,
            });
        entry.title = title;
        entry.description = description;
    }

    fn remove(&mut self, kind: EntityKind, id: i32) -> Option<TabRecord> {
        let removed = self.tabs.remove(&(kind, id))?;
        self.translations
            .retain(|(k, tab_id, _), _| !(*k == kind && *tab_id == id));
        Some(removed)
    }
}

/// Tab store backed by ordered maps
#[derive(Default)]
pub struct MemoryTabStore {
    tables: RwLock<Tables>,
    fail_writes: AtomicBool,
}

impl MemoryTabStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent write fail with a database error
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Seed a record as-is, bypassing position sequencing
    pub async fn seed(&self, tab: TabRecord) {
        let mut tables = self.tables.write().await;
        let next = tables.next_id.entry(tab.kind).or_insert(0);
        *next = (*next).max(tab.id);
        tables.tabs.insert((tab.kind, tab.id), tab);
    }

    fn check_writable(&self) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AppError::Database(sqlx::Error::PoolClosed));
        }
        Ok(())
    }
}

#[async_trait]
impl TabStore for MemoryTabStore {
    async fn find_pk(&self, kind: EntityKind, id: i32) -> Result<Option<TabRecord>> {
        Ok(self.tables.read().await.tabs.get(&(kind, id)).cloned())
    }

    async fn find(&self, kind: EntityKind, query: &TabQuery) -> Result<Vec<TabRecord>> {
        let tables = self.tables.read().await;
        Ok(query.apply(tables.tabs.values().filter(|tab| tab.kind == kind)))
    }

    async fn translations(
        &self,
        kind: EntityKind,
        tab_ids: &[i32],
        locale: &str,
    ) -> Result<Vec<TabTranslation>> {
        let tables = self.tables.read().await;
        Ok(tab_ids
            .iter()
            .filter_map(|id| {
                tables
                    .translations
                    .get(&(kind, *id, locale.to_string()))
                    .cloned()
            })
            .collect())
    }

    async fn insert(&self, kind: EntityKind, tab: NewTab) -> Result<TabRecord> {
        self.check_writable()?;
        let mut tables = self.tables.write().await;

        let siblings = tables.siblings(kind, tab.owner_id);
        let (position, shifts) = position::plan_insert(&siblings, tab.position);
        tables.write_positions(kind, &shifts);

        let next = tables.next_id.entry(kind).or_insert(0);
        *next += 1;
        let id = *next;

        let now = Utc::now();
        let record = TabRecord {
            id,
            kind,
            owner_id: tab.owner_id,
            position,
            visible: tab.visible,
            created_at: now,
            updated_at: now,
        };
        tables.tabs.insert((kind, id), record.clone());
        tables.upsert_translation(kind, id, &tab.locale, tab.title, tab.description);

        Ok(record)
    }

    async fn update(
        &self,
        kind: EntityKind,
        id: i32,
        changes: TabChanges,
    ) -> Result<Option<TabRecord>> {
        self.check_writable()?;
        let mut tables = self.tables.write().await;

        let Some(current) = tables.tabs.get_mut(&(kind, id)) else {
            return Ok(None);
        };
        current.visible = changes.visible;
        current.updated_at = Utc::now();
        let (owner_id, current_position) = (current.owner_id, current.position);

        tables.upsert_translation(kind, id, &changes.locale, changes.title, changes.description);

        if let Some(requested) = changes.position.filter(|p| *p != current_position) {
            let siblings = tables.siblings(kind, owner_id);
            let plan = position::plan_move(&siblings, id, PositionChange::Absolute(requested));
            tables.write_positions(kind, &plan);
        }

        Ok(tables.tabs.get(&(kind, id)).cloned())
    }

    async fn move_position(
        &self,
        kind: EntityKind,
        id: i32,
        change: PositionChange,
    ) -> Result<Option<TabRecord>> {
        self.check_writable()?;
        let mut tables = self.tables.write().await;

        let Some(owner_id) = tables.tabs.get(&(kind, id)).map(|tab| tab.owner_id) else {
            return Ok(None);
        };

        let siblings = tables.siblings(kind, owner_id);
        let plan = position::plan_move(&siblings, id, change);
        tables.write_positions(kind, &plan);

        Ok(tables.tabs.get(&(kind, id)).cloned())
    }

    async fn renumber(&self, kind: EntityKind, owner_id: i32) -> Result<usize> {
        self.check_writable()?;
        let mut tables = self.tables.write().await;

        let siblings = tables.siblings(kind, owner_id);
        let plan = position::plan_renumber(&siblings);
        tables.write_positions(kind, &plan);

        Ok(siblings.len())
    }

    async fn delete(&self, kind: EntityKind, id: i32) -> Result<Option<TabRecord>> {
        self.check_writable()?;
        let mut tables = self.tables.write().await;

        let Some(owner_id) = tables.tabs.get(&(kind, id)).map(|tab| tab.owner_id) else {
            return Ok(None);
        };
        let siblings = tables.siblings(kind, owner_id);
        let Some(removed) = tables.remove(kind, id) else {
            return Ok(None);
        };

        let plan = position::plan_remove(&siblings, id);
        tables.write_positions(kind, &plan);

        Ok(Some(removed))
    }

    async fn delete_for_owner(&self, kind: EntityKind, owner_id: i32) -> Result<u64> {
        self.check_writable()?;
        let mut tables = self.tables.write().await;

        let ids: Vec<i32> = tables
            .siblings(kind, owner_id)
            .into_iter()
            .map(|(id, _)| id)
            .collect();
        for id in &ids {
            tables.remove(kind, *id);
        }

        Ok(ids.len() as u64)
    }
}
