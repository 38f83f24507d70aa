use serde::{Deserialize, Serialize};

use super::entity::EntityKind;

/// An owner entity loaded from the host catalog, tagged with its type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntity {
    pub kind: EntityKind,
    pub id: i32,
    /// Title in the requested edition locale, when translated
    pub title: Option<String>,
    /// Default folder of a content, default category of a product
    pub default_parent_id: Option<i32>,
}

impl CatalogEntity {
    pub fn new(kind: EntityKind, id: i32) -> Self {
        Self {
            kind,
            id,
            title: None,
            default_parent_id: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_default_parent(mut self, parent_id: i32) -> Self {
        self.default_parent_id = Some(parent_id);
        self
    }
}
