//! Catalog entity types that can own tabs.
//!
//! Every type is described by one [`EntityDescriptor`]: request parameter,
//! tables, event names, edit template and edit URL. Handlers are written once
//! against the descriptor instead of once per type.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Product,
    Category,
    Content,
    Folder,
}

/// Order in which the entity resolver inspects owner id parameters
pub const RESOLUTION_ORDER: [EntityKind; 4] = [
    EntityKind::Content,
    EntityKind::Product,
    EntityKind::Folder,
    EntityKind::Category,
];

/// Order in which redirects and position updates pick the owner parameter
pub const REDIRECT_ORDER: [EntityKind; 4] = [
    EntityKind::Product,
    EntityKind::Category,
    EntityKind::Folder,
    EntityKind::Content,
];

/// Order in which a deleted tab's owner ids are checked; also the lookup
/// order when a delete request names no owner
pub const DELETE_ORDER: [EntityKind; 4] = [
    EntityKind::Content,
    EntityKind::Product,
    EntityKind::Category,
    EntityKind::Folder,
];

/// Order in which edition arguments are computed; the last match wins
pub const EDITION_ORDER: [EntityKind; 4] = [
    EntityKind::Content,
    EntityKind::Product,
    EntityKind::Category,
    EntityKind::Folder,
];

/// Where an owner's edit page lives in the host admin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditUrl {
    pub path: &'static str,
    /// `true`: `<path>/<id>`, `false`: `<path>?<id_param>=<id>`
    pub id_in_path: bool,
    pub fragment: Option<&'static str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityDescriptor {
    pub kind: EntityKind,
    pub name: &'static str,
    /// Request parameter carrying the owner id; also the owner column name
    pub id_param: &'static str,
    pub catalog_table: &'static str,
    pub tab_table: &'static str,
    pub i18n_table: &'static str,
    pub create_event: &'static str,
    pub update_event: &'static str,
    pub position_event: &'static str,
    pub edit_template: &'static str,
    pub edit_url: EditUrl,
}

pub const DESCRIPTORS: [EntityDescriptor; 4] = [
    EntityDescriptor {
        kind: EntityKind::Product,
        name: "product",
        id_param: "product_id",
        catalog_table: "product",
        tab_table: "product_associated_tab",
        i18n_table: "product_associated_tab_i18n",
        create_event: "tabs.product.create",
        update_event: "tabs.product.update",
        position_event: "tabs.product.position",
        edit_template: "product-edit",
        edit_url: EditUrl {
            path: "/admin/products/update",
            id_in_path: false,
            fragment: None,
        },
    },
    EntityDescriptor {
        kind: EntityKind::Category,
        name: "category",
        id_param: "category_id",
        catalog_table: "category",
        tab_table: "category_associated_tab",
        i18n_table: "category_associated_tab_i18n",
        create_event: "tabs.category.create",
        update_event: "tabs.category.update",
        position_event: "tabs.category.position",
        edit_template: "category-edit",
        edit_url: EditUrl {
            path: "/admin/categories/update",
            id_in_path: false,
            fragment: None,
        },
    },
    EntityDescriptor {
        kind: EntityKind::Content,
        name: "content",
        id_param: "content_id",
        catalog_table: "content",
        tab_table: "content_associated_tab",
        i18n_table: "content_associated_tab_i18n",
        create_event: "tabs.content.create",
        update_event: "tabs.content.update",
        position_event: "tabs.content.position",
        edit_template: "content-edit",
        edit_url: EditUrl {
            path: "/admin/content/update",
            id_in_path: true,
            fragment: Some("modules"),
        },
    },
    EntityDescriptor {
        kind: EntityKind::Folder,
        name: "folder",
        id_param: "folder_id",
        catalog_table: "folder",
        tab_table: "folder_associated_tab",
        i18n_table: "folder_associated_tab_i18n",
        create_event: "tabs.folder.create",
        update_event: "tabs.folder.update",
        position_event: "tabs.folder.position",
        edit_template: "folder-edit",
        edit_url: EditUrl {
            path: "/admin/folders/update",
            id_in_path: true,
            fragment: Some("modules"),
        },
    },
];

pub const DELETE_EVENT: &str = "tabs.delete";

impl EntityKind {
    pub const ALL: [EntityKind; 4] = [
        EntityKind::Product,
        EntityKind::Category,
        EntityKind::Content,
        EntityKind::Folder,
    ];

    pub fn descriptor(self) -> &'static EntityDescriptor {
        match self {
            EntityKind::Product => &DESCRIPTORS[0],
            EntityKind::Category => &DESCRIPTORS[1],
            EntityKind::Content => &DESCRIPTORS[2],
            EntityKind::Folder => &DESCRIPTORS[3],
        }
    }

    pub fn as_str(self) -> &'static str {
        self.descriptor().name
    }

    pub fn id_param(self) -> &'static str {
        self.descriptor().id_param
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "product" => Ok(EntityKind::Product),
            "category" => Ok(EntityKind::Category),
            "content" => Ok(EntityKind::Content),
            "folder" => Ok(EntityKind::Folder),
            _ => Err(format!("Unknown entity type: {}", s)),
        }
    }
}
