// Tab records and their translations.
//
// A tab belongs to exactly one owner; the owner type is implied by the table
// the record lives in, carried here as `kind`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::entity::EntityKind;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabRecord {
    pub id: i32,
    pub kind: EntityKind,
    pub owner_id: i32,
    /// 1-based display order within the owner's tab set
    pub position: i32,
    pub visible: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TabRecord {
    /// Owner ids as carried by a delete event: only the slot of this
    /// record's kind is filled
    pub fn owner_ids(&self) -> OwnerIds {
        let mut owners = OwnerIds::default();
        owners.set(self.kind, self.owner_id);
        owners
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabTranslation {
    pub tab_id: i32,
    pub locale: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub chapo: Option<String>,
    pub postscriptum: Option<String>,
}

/// A tab joined with its translation for one locale
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocalizedTab {
    #[serde(flatten)]
    pub tab: TabRecord,
    pub translation: Option<TabTranslation>,
}

/// Insert payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTab {
    pub owner_id: i32,
    /// `None` lets the store append after the owner's last tab
    pub position: Option<i32>,
    pub visible: bool,
    pub locale: String,
    pub title: Option<String>,
    pub description: Option<String>,
}

/// Update payload; the owner is never part of it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabChanges {
    /// `None` keeps the current position
    pub position: Option<i32>,
    pub visible: bool,
    pub locale: String,
    pub title: Option<String>,
    pub description: Option<String>,
}

/// One nullable owner id per entity type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OwnerIds {
    pub product_id: Option<i32>,
    pub category_id: Option<i32>,
    pub content_id: Option<i32>,
    pub folder_id: Option<i32>,
}

impl OwnerIds {
    pub fn get(&self, kind: EntityKind) -> Option<i32> {
        match kind {
            EntityKind::Product => self.product_id,
            EntityKind::Category => self.category_id,
            EntityKind::Content => self.content_id,
            EntityKind::Folder => self.folder_id,
        }
    }

    pub fn set(&mut self, kind: EntityKind, id: i32) {
        match kind {
            EntityKind::Product => self.product_id = Some(id),
            EntityKind::Category => self.category_id = Some(id),
            EntityKind::Content => self.content_id = Some(id),
            EntityKind::Folder => self.folder_id = Some(id),
        }
    }

    /// First non-null owner id following `order`
    pub fn first_in(&self, order: &[EntityKind]) -> Option<(EntityKind, i32)> {
        order
            .iter()
            .find_map(|kind| self.get(*kind).map(|id| (*kind, id)))
    }
}

/// The record removed by a delete, with the owner slots of the event
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeletedTab {
    pub tab: TabRecord,
    pub owners: OwnerIds,
}

/// Row shape shared by every `<type>_associated_tab` table; the owner
/// column is aliased to `owner_id` in queries
#[derive(Debug, Clone, FromRow)]
pub struct TabRow {
    pub id: i32,
    pub owner_id: i32,
    pub position: i32,
    pub visible: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TabRow {
    pub fn into_record(self, kind: EntityKind) -> TabRecord {
        TabRecord {
            id: self.id,
            kind,
            owner_id: self.owner_id,
            position: self.position,
            visible: self.visible,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct TabTranslationRow {
    pub tab_id: i32,
    pub locale: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub chapo: Option<String>,
    pub postscriptum: Option<String>,
}

impl From<TabTranslationRow> for TabTranslation {
    fn from(row: TabTranslationRow) -> Self {
        Self {
            tab_id: row.tab_id,
            locale: row.locale,
            title: row.title,
            description: row.description,
            chapo: row.chapo,
            postscriptum: row.postscriptum,
        }
    }
}
