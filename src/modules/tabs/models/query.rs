//! Filter and ordering criteria over one entity type's tabs.
//!
//! Both stores honour the same criteria: the MySQL store turns them into a
//! `WHERE` clause, the in-memory store evaluates [`TabQuery::matches`].

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use std::cmp::Ordering;

use crate::core::{AppError, Result};

use super::tab::TabRecord;

/// `now - days`, rejected when it leaves chrono's range
fn days_ago(field: &str, days: i64) -> Result<DateTime<Utc>> {
    Duration::try_days(days)
        .and_then(|span| Utc::now().checked_sub_signed(span))
        .ok_or_else(|| AppError::validation(format!("{}: This value is out of range.", field)))
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TabOrder {
    /// Display order: position, then id
    #[default]
    Position,
    LastUpdatedFirst,
    FirstUpdatedFirst,
    LastCreatedFirst,
    FirstCreatedFirst,
}

impl TabOrder {
    pub fn sql(self) -> &'static str {
        match self {
            TabOrder::Position => "position ASC, id ASC",
            TabOrder::LastUpdatedFirst => "updated_at DESC, id DESC",
            TabOrder::FirstUpdatedFirst => "updated_at ASC, id ASC",
            TabOrder::LastCreatedFirst => "created_at DESC, id DESC",
            TabOrder::FirstCreatedFirst => "created_at ASC, id ASC",
        }
    }

    pub fn compare(self, a: &TabRecord, b: &TabRecord) -> Ordering {
        match self {
            TabOrder::Position => (a.position, a.id).cmp(&(b.position, b.id)),
            TabOrder::LastUpdatedFirst => (b.updated_at, b.id).cmp(&(a.updated_at, a.id)),
            TabOrder::FirstUpdatedFirst => (a.updated_at, a.id).cmp(&(b.updated_at, b.id)),
            TabOrder::LastCreatedFirst => (b.created_at, b.id).cmp(&(a.created_at, a.id)),
            TabOrder::FirstCreatedFirst => (a.created_at, a.id).cmp(&(b.created_at, b.id)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TabQuery {
    pub ids: Option<Vec<i32>>,
    pub owner_id: Option<i32>,
    pub min_position: Option<i32>,
    pub max_position: Option<i32>,
    pub visible: Option<bool>,
    pub created_after: Option<DateTime<Utc>>,
    pub created_before: Option<DateTime<Utc>>,
    pub updated_after: Option<DateTime<Utc>>,
    pub updated_before: Option<DateTime<Utc>>,
    pub order: TabOrder,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl TabQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter_by_primary_keys(mut self, ids: Vec<i32>) -> Self {
        self.ids = Some(ids);
        self
    }

    pub fn filter_by_owner(mut self, owner_id: i32) -> Self {
        self.owner_id = Some(owner_id);
        self
    }

    pub fn filter_by_position(mut self, position: i32) -> Self {
        self.min_position = Some(position);
        self.max_position = Some(position);
        self
    }

    pub fn filter_by_position_range(mut self, min: Option<i32>, max: Option<i32>) -> Self {
        self.min_position = min;
        self.max_position = max;
        self
    }

    pub fn filter_by_visible(mut self, visible: bool) -> Self {
        self.visible = Some(visible);
        self
    }

    pub fn filter_by_created_at(
        mut self,
        after: Option<DateTime<Utc>>,
        before: Option<DateTime<Utc>>,
    ) -> Self {
        self.created_after = after;
        self.created_before = before;
        self
    }

    pub fn filter_by_updated_at(
        mut self,
        after: Option<DateTime<Utc>>,
        before: Option<DateTime<Utc>>,
    ) -> Self {
        self.updated_after = after;
        self.updated_before = before;
        self
    }

    /// Tabs updated within the last `days` days
    pub fn recently_updated(self, days: i64) -> Result<Self> {
        let since = days_ago("updated_within_days", days)?;
        Ok(self.filter_by_updated_at(Some(since), None))
    }

    /// Tabs created within the last `days` days
    pub fn recently_created(self, days: i64) -> Result<Self> {
        let since = days_ago("created_within_days", days)?;
        Ok(self.filter_by_created_at(Some(since), None))
    }

    pub fn order_by(mut self, order: TabOrder) -> Self {
        self.order = order;
        self
    }

    pub fn paginate(mut self, limit: Option<u32>, offset: Option<u32>) -> Self {
        self.limit = limit;
        self.offset = offset;
        self
    }

    pub fn matches(&self, tab: &TabRecord) -> bool {
        if let Some(ids) = &self.ids {
            if !ids.contains(&tab.id) {
                return false;
            }
        }

        self.owner_id.map_or(true, |owner| tab.owner_id == owner)
            && self.min_position.map_or(true, |min| tab.position >= min)
            && self.max_position.map_or(true, |max| tab.position <= max)
            && self.visible.map_or(true, |visible| tab.visible == visible)
            && self.created_after.map_or(true, |t| tab.created_at >= t)
            && self.created_before.map_or(true, |t| tab.created_at <= t)
            && self.updated_after.map_or(true, |t| tab.updated_at >= t)
            && self.updated_before.map_or(true, |t| tab.updated_at <= t)
    }

    /// Apply filter, ordering and pagination to an in-memory set
    pub fn apply<'a, I>(&self, tabs: I) -> Vec<TabRecord>
    where
        I: IntoIterator<Item = &'a TabRecord>,
    {
        let mut selected: Vec<TabRecord> = tabs
            .into_iter()
            .filter(|tab| self.matches(tab))
            .cloned()
            .collect();
        selected.sort_by(|a, b| self.order.compare(a, b));

        let offset = self.offset.unwrap_or(0) as usize;
        let limit = self.limit.map(|l| l as usize).unwrap_or(usize::MAX);
        selected.into_iter().skip(offset).take(limit).collect()
    }
}
