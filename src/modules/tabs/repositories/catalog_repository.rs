// Read-only access to the host catalog (products, categories, contents,
// folders). Tabs never write to these tables.

use async_trait::async_trait;
use sqlx::{FromRow, MySqlPool};

use crate::core::Result;
use crate::modules::tabs::models::{CatalogEntity, EntityKind};

/// Owner entity lookup
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Load an entity joined with its title in `locale`
    async fn find(&self, kind: EntityKind, id: i32, locale: &str) -> Result<Option<CatalogEntity>>;

    /// Every entity id of one type, ascending
    async fn list_ids(&self, kind: EntityKind) -> Result<Vec<i32>>;
}

#[derive(Debug, FromRow)]
struct CatalogRow {
    id: i32,
    title: Option<String>,
    default_parent_id: Option<i32>,
}

pub struct MySqlCatalogStore {
    pool: MySqlPool,
}

impl MySqlCatalogStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn find_sql(kind: EntityKind) -> String {
        let table = kind.descriptor().catalog_table;
        let parent = match kind {
            EntityKind::Product => {
                "(SELECT pc.category_id FROM product_category pc \
                  WHERE pc.product_id = e.id AND pc.default_category = 1 LIMIT 1)"
            }
            EntityKind::Content => {
                "(SELECT cf.folder_id FROM content_folder cf \
                  WHERE cf.content_id = e.id AND cf.default_folder = 1 LIMIT 1)"
            }
            EntityKind::Category | EntityKind::Folder => "NULL",
        };

        format!(
            "SELECT e.id, i.title, {parent} AS default_parent_id \
             FROM {table} e \
             LEFT JOIN {table}_i18n i ON i.id = e.id AND i.locale = ? \
             WHERE e.id = ?"
        )
    }
}

#[async_trait]
impl CatalogStore for MySqlCatalogStore {
    async fn find(&self, kind: EntityKind, id: i32, locale: &str) -> Result<Option<CatalogEntity>> {
        let sql = Self::find_sql(kind);
        let row = sqlx::query_as::<_, CatalogRow>(&sql)
            .bind(locale)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|row| CatalogEntity {
            kind,
            id: row.id,
            title: row.title,
            default_parent_id: row.default_parent_id,
        }))
    }

    async fn list_ids(&self, kind: EntityKind) -> Result<Vec<i32>> {
        let sql = format!(
            "SELECT id FROM {} ORDER BY id ASC",
            kind.descriptor().catalog_table
        );
        let ids = sqlx::query_scalar::<_, i32>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(ids)
    }
}
