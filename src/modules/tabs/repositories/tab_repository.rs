// TabStore: persistence of tab records and their translations.
//
// Every mutation runs in a single transaction so the tab row, its translation
// and any sibling position shifts are written together or not at all.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{MySql, MySqlConnection, MySqlPool, QueryBuilder};

use crate::core::Result;
use crate::modules::tabs::models::{
    tab::{TabRow, TabTranslationRow},
    EntityKind, NewTab, TabChanges, TabQuery, TabRecord, TabTranslation,
};
use crate::modules::tabs::services::position::{self, PositionChange, Slot};

#[async_trait]
pub trait TabStore: Send + Sync {
    /// Find a tab by primary key
    async fn find_pk(&self, kind: EntityKind, id: i32) -> Result<Option<TabRecord>>;

    /// Find tabs matching `query`
    async fn find(&self, kind: EntityKind, query: &TabQuery) -> Result<Vec<TabRecord>>;

    /// Translations of `tab_ids` in `locale`
    async fn translations(
        &self,
        kind: EntityKind,
        tab_ids: &[i32],
        locale: &str,
    ) -> Result<Vec<TabTranslation>>;

    /// Insert a tab and its translation
    async fn insert(&self, kind: EntityKind, tab: NewTab) -> Result<TabRecord>;

    /// Update a tab and upsert its translation; `None` when the tab is gone
    async fn update(&self, kind: EntityKind, id: i32, changes: TabChanges)
        -> Result<Option<TabRecord>>;

    /// Move a tab within its owner's set; `None` when the tab is gone
    async fn move_position(
        &self,
        kind: EntityKind,
        id: i32,
        change: PositionChange,
    ) -> Result<Option<TabRecord>>;

    /// Renumber one owner's tabs `1..=N`, returns the number of tabs
    async fn renumber(&self, kind: EntityKind, owner_id: i32) -> Result<usize>;

    /// Delete a tab and its translations; `None` when the tab is gone
    async fn delete(&self, kind: EntityKind, id: i32) -> Result<Option<TabRecord>>;

    /// Delete every tab of one owner
    async fn delete_for_owner(&self, kind: EntityKind, owner_id: i32) -> Result<u64>;
}

pub struct MySqlTabStore {
    pool: MySqlPool,
}

impl MySqlTabStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn select_columns(kind: EntityKind) -> String {
        format!(
            "SELECT id, {} AS owner_id, position, visible, created_at, updated_at FROM {}",
            kind.id_param(),
            kind.descriptor().tab_table
        )
    }

    fn build_find(kind: EntityKind, query: &TabQuery) -> QueryBuilder<'static, MySql> {
        let owner_column = kind.id_param();
        let mut qb = QueryBuilder::<MySql>::new(Self::select_columns(kind));
        qb.push(" WHERE 1 = 1");

        if let Some(ids) = &query.ids {
            if ids.is_empty() {
                qb.push(" AND 1 = 0");
            } else {
                qb.push(" AND id IN (");
                let mut separated = qb.separated(", ");
                for id in ids {
                    separated.push_bind(*id);
                }
                separated.push_unseparated(")");
            }
        }
        if let Some(owner_id) = query.owner_id {
            qb.push(format!(" AND {} = ", owner_column)).push_bind(owner_id);
        }
        if let Some(min) = query.min_position {
            qb.push(" AND position >= ").push_bind(min);
        }
        if let Some(max) = query.max_position {
            qb.push(" AND position <= ").push_bind(max);
        }
        if let Some(visible) = query.visible {
            qb.push(" AND visible = ").push_bind(visible);
        }
        if let Some(after) = query.created_after {
            qb.push(" AND created_at >= ").push_bind(after);
        }
        if let Some(before) = query.created_before {
            qb.push(" AND created_at <= ").push_bind(before);
        }
        if let Some(after) = query.updated_after {
            qb.push(" AND updated_at >= ").push_bind(after);
        }
        if let Some(before) = query.updated_before {
            qb.push(" AND updated_at <= ").push_bind(before);
        }

        qb.push(" ORDER BY ").push(query.order.sql());

        match (query.limit, query.offset) {
            (Some(limit), offset) => {
                qb.push(" LIMIT ").push_bind(limit as u64);
                if let Some(offset) = offset {
                    qb.push(" OFFSET ").push_bind(offset as u64);
                }
            }
            // MySQL needs a LIMIT before OFFSET
            (None, Some(offset)) => {
                qb.push(" LIMIT 18446744073709551615 OFFSET ")
                    .push_bind(offset as u64);
            }
            (None, None) => {}
        }

        qb
    }

    async fn fetch_one(
        conn: &mut MySqlConnection,
        kind: EntityKind,
        id: i32,
    ) -> Result<Option<TabRecord>> {
        let sql = format!("{} WHERE id = ?", Self::select_columns(kind));
        let row = sqlx::query_as::<_, TabRow>(&sql)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;

        Ok(row.map(|row| row.into_record(kind)))
    }

    /// Lock and load one owner's `(id, position)` pairs
    async fn siblings(
        conn: &mut MySqlConnection,
        kind: EntityKind,
        owner_id: i32,
    ) -> Result<Vec<Slot>> {
        let sql = format!(
            "SELECT id, position FROM {} WHERE {} = ? ORDER BY position ASC, id ASC FOR UPDATE",
            kind.descriptor().tab_table,
            kind.id_param()
        );
        let slots = sqlx::query_as::<_, (i32, i32)>(&sql)
            .bind(owner_id)
            .fetch_all(&mut *conn)
            .await?;

        Ok(slots)
    }

    async fn write_positions(
        conn: &mut MySqlConnection,
        kind: EntityKind,
        plan: &[Slot],
    ) -> Result<()> {
        let sql = format!(
            "UPDATE {} SET position = ?, updated_at = ? WHERE id = ?",
            kind.descriptor().tab_table
        );
        let now = Utc::now();

        for (id, position) in plan {
            sqlx::query(&sql)
                .bind(position)
                .bind(now)
                .bind(id)
                .execute(&mut *conn)
                .await?;
        }

        Ok(())
    }

    async fn upsert_translation(
        conn: &mut MySqlConnection,
        kind: EntityKind,
        tab_id: i32,
        locale: &str,
        title: Option<&str>,
        description: Option<&str>,
    ) -> Result<()> {
        let sql = format!(
            "INSERT INTO {} (tab_id, locale, title, description) VALUES (?, ?, ?, ?) \
             ON DUPLICATE KEY UPDATE title = VALUES(title), description = VALUES(description)",
            kind.descriptor().i18n_table
        );

        sqlx::query(&sql)
            .bind(tab_id)
            .bind(locale)
            .bind(title)
            .bind(description)
            .execute(&mut *conn)
            .await?;

        Ok(())
    }
}

#[async_trait]
impl TabStore for MySqlTabStore {
    async fn find_pk(&self, kind: EntityKind, id: i32) -> Result<Option<TabRecord>> {
        let mut conn = self.pool.acquire().await?;
        Self::fetch_one(&mut conn, kind, id).await
    }

    async fn find(&self, kind: EntityKind, query: &TabQuery) -> Result<Vec<TabRecord>> {
        let rows = Self::build_find(kind, query)
            .build_query_as::<TabRow>()
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(|row| row.into_record(kind)).collect())
    }

    async fn translations(
        &self,
        kind: EntityKind,
        tab_ids: &[i32],
        locale: &str,
    ) -> Result<Vec<TabTranslation>> {
        if tab_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut qb = QueryBuilder::<MySql>::new(format!(
            "SELECT tab_id, locale, title, description, chapo, postscriptum FROM {} WHERE locale = ",
            kind.descriptor().i18n_table
        ));
        qb.push_bind(locale);
        qb.push(" AND tab_id IN (");
        let mut separated = qb.separated(", ");
        for id in tab_ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(")");

        let rows = qb
            .build_query_as::<TabTranslationRow>()
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(TabTranslation::from).collect())
    }

    async fn insert(&self, kind: EntityKind, tab: NewTab) -> Result<TabRecord> {
        let mut tx = self.pool.begin().await?;

        let siblings = Self::siblings(&mut tx, kind, tab.owner_id).await?;
        let (position, shifts) = position::plan_insert(&siblings, tab.position);
        Self::write_positions(&mut tx, kind, &shifts).await?;

        let now = Utc::now();
        let sql = format!(
            "INSERT INTO {} ({}, position, visible, created_at, updated_at) VALUES (?, ?, ?, ?, ?)",
            kind.descriptor().tab_table,
            kind.id_param()
        );
        let result = sqlx::query(&sql)
            .bind(tab.owner_id)
            .bind(position)
            .bind(tab.visible)
            .bind(now)
            .bind(now)
            .execute(&mut *tx)
            .await?;
        let id = result.last_insert_id() as i32;

        Self::upsert_translation(
            &mut tx,
            kind,
            id,
            &tab.locale,
            tab.title.as_deref(),
            tab.description.as_deref(),
        )
        .await?;

        let record = Self::fetch_one(&mut tx, kind, id)
            .await?
            .ok_or_else(|| sqlx::Error::RowNotFound)?;

        tx.commit().await?;

        Ok(record)
    }

    async fn update(
        &self,
        kind: EntityKind,
        id: i32,
        changes: TabChanges,
    ) -> Result<Option<TabRecord>> {
        let mut tx = self.pool.begin().await?;

        let Some(current) = Self::fetch_one(&mut tx, kind, id).await? else {
            return Ok(None);
        };

        let sql = format!(
            "UPDATE {} SET visible = ?, updated_at = ? WHERE id = ?",
            kind.descriptor().tab_table
        );
        sqlx::query(&sql)
            .bind(changes.visible)
            .bind(Utc::now())
            .bind(id)
            .execute(&mut *tx)
            .await?;

        Self::upsert_translation(
            &mut tx,
            kind,
            id,
            &changes.locale,
            changes.title.as_deref(),
            changes.description.as_deref(),
        )
        .await?;

        if let Some(requested) = changes.position.filter(|p| *p != current.position) {
            let siblings = Self::siblings(&mut tx, kind, current.owner_id).await?;
            let plan = position::plan_move(&siblings, id, PositionChange::Absolute(requested));
            Self::write_positions(&mut tx, kind, &plan).await?;
        }

        let record = Self::fetch_one(&mut tx, kind, id).await?;
        tx.commit().await?;

        Ok(record)
    }

    async fn move_position(
        &self,
        kind: EntityKind,
        id: i32,
        change: PositionChange,
    ) -> Result<Option<TabRecord>> {
        let mut tx = self.pool.begin().await?;

        let Some(current) = Self::fetch_one(&mut tx, kind, id).await? else {
            return Ok(None);
        };

        let siblings = Self::siblings(&mut tx, kind, current.owner_id).await?;
        let plan = position::plan_move(&siblings, id, change);
        Self::write_positions(&mut tx, kind, &plan).await?;

        let record = Self::fetch_one(&mut tx, kind, id).await?;
        tx.commit().await?;

        Ok(record)
    }

    async fn renumber(&self, kind: EntityKind, owner_id: i32) -> Result<usize> {
        let mut tx = self.pool.begin().await?;

        let siblings = Self::siblings(&mut tx, kind, owner_id).await?;
        let plan = position::plan_renumber(&siblings);
        Self::write_positions(&mut tx, kind, &plan).await?;

        tx.commit().await?;

        Ok(siblings.len())
    }

    async fn delete(&self, kind: EntityKind, id: i32) -> Result<Option<TabRecord>> {
        let mut tx = self.pool.begin().await?;

        let Some(current) = Self::fetch_one(&mut tx, kind, id).await? else {
            return Ok(None);
        };
        let siblings = Self::siblings(&mut tx, kind, current.owner_id).await?;

        let sql = format!(
            "DELETE FROM {} WHERE tab_id = ?",
            kind.descriptor().i18n_table
        );
        sqlx::query(&sql).bind(id).execute(&mut *tx).await?;

        let sql = format!("DELETE FROM {} WHERE id = ?", kind.descriptor().tab_table);
        sqlx::query(&sql).bind(id).execute(&mut *tx).await?;

        let plan = position::plan_remove(&siblings, id);
        Self::write_positions(&mut tx, kind, &plan).await?;

        tx.commit().await?;

        Ok(Some(current))
    }

    async fn delete_for_owner(&self, kind: EntityKind, owner_id: i32) -> Result<u64> {
        let mut tx = self.pool.begin().await?;
        let d = kind.descriptor();

        let sql = format!(
            "DELETE i FROM {} i INNER JOIN {} t ON t.id = i.tab_id WHERE t.{} = ?",
            d.i18n_table, d.tab_table, d.id_param
        );
        sqlx::query(&sql).bind(owner_id).execute(&mut *tx).await?;

        let sql = format!("DELETE FROM {} WHERE {} = ?", d.tab_table, d.id_param);
        let deleted = sqlx::query(&sql)
            .bind(owner_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        tx.commit().await?;

        Ok(deleted)
    }
}
