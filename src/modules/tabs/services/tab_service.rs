use std::sync::Arc;

use crate::core::{AppError, RequestParams, Result};
use crate::modules::tabs::models::entity::DELETE_ORDER;
use crate::modules::tabs::models::{
    CatalogEntity, DeletedTab, EntityKind, LocalizedTab, NewTab, TabChanges, TabForm, TabQuery,
    TabRecord,
};
use crate::modules::tabs::repositories::{CatalogStore, TabStore};
use crate::modules::tabs::services::events::{EventDispatcher, TabsEvent};
use crate::modules::tabs::services::position::PositionChange;
use crate::modules::tabs::services::resolver;

/// A created or updated tab and where the form asked to go next
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedTab {
    pub tab: TabRecord,
    pub success_url: Option<String>,
}

/// Service for tab business logic
pub struct TabService {
    tabs: Arc<dyn TabStore>,
    catalog: Arc<dyn CatalogStore>,
    events: EventDispatcher,
    default_locale: String,
}

impl TabService {
    pub fn new(
        tabs: Arc<dyn TabStore>,
        catalog: Arc<dyn CatalogStore>,
        events: EventDispatcher,
        default_locale: impl Into<String>,
    ) -> Self {
        Self {
            tabs,
            catalog,
            events,
            default_locale: default_locale.into(),
        }
    }

    pub fn default_locale(&self) -> &str {
        &self.default_locale
    }

    /// Load an owner entity or fail with `<id> <type> id does not exist`
    pub async fn require_owner(&self, kind: EntityKind, owner_id: i32) -> Result<CatalogEntity> {
        self.catalog
            .find(kind, owner_id, &self.default_locale)
            .await?
            .ok_or_else(|| AppError::not_found(format!("{} {} id does not exist", owner_id, kind)))
    }

    async fn require_tab(&self, kind: EntityKind, tab_id: i32) -> Result<TabRecord> {
        self.tabs
            .find_pk(kind, tab_id)
            .await?
            .ok_or_else(|| tab_not_found(tab_id))
    }

    /// Resolve the owner entity a request targets
    pub async fn find_entity(&self, params: &RequestParams) -> Result<Option<CatalogEntity>> {
        resolver::resolve_entity(self.catalog.as_ref(), params, &self.default_locale).await
    }

    /// Create a tab for an existing owner.
    ///
    /// The owner is checked before the form is validated.
    pub async fn create(&self, kind: EntityKind, owner_id: i32, form: &TabForm) -> Result<SavedTab> {
        self.require_owner(kind, owner_id).await?;
        let data = form.validate(&self.default_locale)?;

        let tab = self
            .tabs
            .insert(
                kind,
                NewTab {
                    owner_id,
                    position: data.position,
                    visible: data.visible,
                    locale: data.locale,
                    title: Some(data.title),
                    description: data.description,
                },
            )
            .await?;

        tracing::info!(kind = %kind, tab_id = tab.id, owner_id, position = tab.position, "Tab created");

        self.events
            .dispatch(TabsEvent::Created {
                kind,
                tab: tab.clone(),
            })
            .await;

        Ok(SavedTab {
            tab,
            success_url: data.success_url,
        })
    }

    /// Update a tab; its owner is kept from the stored record
    pub async fn update(&self, kind: EntityKind, tab_id: i32, form: &TabForm) -> Result<SavedTab> {
        self.require_tab(kind, tab_id).await?;
        let data = form.validate(&self.default_locale)?;

        let tab = self
            .tabs
            .update(
                kind,
                tab_id,
                TabChanges {
                    position: data.position,
                    visible: data.visible,
                    locale: data.locale,
                    title: Some(data.title),
                    description: data.description,
                },
            )
            .await?
            .ok_or_else(|| tab_not_found(tab_id))?;

        tracing::info!(kind = %kind, tab_id, owner_id = tab.owner_id, "Tab updated");

        self.events
            .dispatch(TabsEvent::Updated {
                kind,
                tab: tab.clone(),
            })
            .await;

        Ok(SavedTab {
            tab,
            success_url: data.success_url,
        })
    }

    pub async fn update_position(
        &self,
        kind: EntityKind,
        tab_id: i32,
        change: PositionChange,
    ) -> Result<TabRecord> {
        let tab = self
            .tabs
            .move_position(kind, tab_id, change)
            .await?
            .ok_or_else(|| tab_not_found(tab_id))?;

        self.events
            .dispatch(TabsEvent::PositionChanged {
                kind,
                tab_id,
                change,
            })
            .await;

        Ok(tab)
    }

    /// Delete a tab from the table of `kind`, or from the first table that
    /// holds `tab_id` when no type is known
    pub async fn delete(&self, kind: Option<EntityKind>, tab_id: i32) -> Result<DeletedTab> {
        let candidates: Vec<EntityKind> = match kind {
            Some(kind) => vec![kind],
            None => DELETE_ORDER.to_vec(),
        };

        for kind in candidates {
            let Some(tab) = self.tabs.delete(kind, tab_id).await? else {
                continue;
            };

            tracing::info!(kind = %kind, tab_id, owner_id = tab.owner_id, "Tab deleted");

            let deleted = DeletedTab {
                owners: tab.owner_ids(),
                tab,
            };
            self.events
                .dispatch(TabsEvent::Deleted(deleted.clone()))
                .await;

            return Ok(deleted);
        }

        Err(tab_not_found(tab_id))
    }

    /// Delete every tab of one owner
    pub async fn delete_for_owner(&self, kind: EntityKind, owner_id: i32) -> Result<u64> {
        self.require_owner(kind, owner_id).await?;
        let deleted = self.tabs.delete_for_owner(kind, owner_id).await?;

        tracing::info!(kind = %kind, owner_id, deleted, "Owner tabs deleted");

        Ok(deleted)
    }

    /// Renumber the tabs of every owner of `kind` to `1..=N`.
    ///
    /// One transaction per owner; owners already processed stay renumbered
    /// when a later one fails. Returns the number of owners processed.
    pub async fn renumber_all(&self, kind: EntityKind) -> Result<usize> {
        let owner_ids = self.catalog.list_ids(kind).await?;

        let mut tabs = 0;
        for owner_id in &owner_ids {
            tabs += self.tabs.renumber(kind, *owner_id).await?;
        }

        tracing::info!(kind = %kind, owners = owner_ids.len(), tabs, "Tab positions renumbered");

        Ok(owner_ids.len())
    }

    /// One owner's tabs joined with their translation in `locale`
    pub async fn list(
        &self,
        kind: EntityKind,
        owner_id: i32,
        query: TabQuery,
        locale: Option<&str>,
    ) -> Result<Vec<LocalizedTab>> {
        self.require_owner(kind, owner_id).await?;

        let tabs = self
            .tabs
            .find(kind, &query.filter_by_owner(owner_id))
            .await?;

        let locale = locale.unwrap_or(&self.default_locale);
        let ids: Vec<i32> = tabs.iter().map(|tab| tab.id).collect();
        let mut translations = self.tabs.translations(kind, &ids, locale).await?;

        Ok(tabs
            .into_iter()
            .map(|tab| {
                let translation = translations
                    .iter()
                    .position(|t| t.tab_id == tab.id)
                    .map(|index| translations.swap_remove(index));
                LocalizedTab { tab, translation }
            })
            .collect())
    }
}

fn tab_not_found(tab_id: i32) -> AppError {
    AppError::not_found(format!("{} tab id does not exist", tab_id))
}
