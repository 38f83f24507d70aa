// View models returned instead of rendered templates.
//
// The host admin renders `template` with `arguments`; the service only decides
// which template and what goes into it.

use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::core::{AppError, RequestParams};
use crate::modules::tabs::models::entity::EDITION_ORDER;
use crate::modules::tabs::models::{CatalogEntity, EntityKind, FormState, TabForm};
use crate::modules::tabs::services::TabService;

pub const CONFIG_TEMPLATE: &str = "tabs-config";
pub const HOME_TEMPLATE: &str = "home";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct View {
    pub template: &'static str,
    pub arguments: BTreeMap<&'static str, String>,
    pub entity: Option<CatalogEntity>,
    pub form: Option<FormState>,
    pub general_error: Option<String>,
}

impl View {
    pub fn new(template: &'static str) -> Self {
        Self {
            template,
            arguments: BTreeMap::new(),
            entity: None,
            form: None,
            general_error: None,
        }
    }

    pub fn with_argument(mut self, name: &'static str, value: impl ToString) -> Self {
        self.arguments.insert(name, value.to_string());
        self
    }
}

/// Arguments of the owner edit page, computed from the request.
///
/// Each owner parameter present replaces the arguments computed so far, so
/// the last type in edition order wins.
pub fn edition_arguments(
    params: &RequestParams,
    entity: Option<&CatalogEntity>,
) -> BTreeMap<&'static str, String> {
    let current_tab = params.get("current_tab").unwrap_or("general").to_string();
    let default_parent = |kind: EntityKind| {
        entity
            .filter(|e| e.kind == kind)
            .and_then(|e| e.default_parent_id)
            .unwrap_or(0)
            .to_string()
    };

    let mut args = BTreeMap::new();
    for kind in EDITION_ORDER {
        let Some(id) = params.get(kind.id_param()) else {
            continue;
        };

        args = BTreeMap::from([
            (kind.id_param(), id.to_string()),
            ("current_tab", current_tab.clone()),
        ]);
        match kind {
            EntityKind::Content => {
                let folder_id = params
                    .get_non_blank("folder_id")
                    .map(str::to_string)
                    .unwrap_or_else(|| default_parent(EntityKind::Content));
                args.insert("folder_id", folder_id);
            }
            EntityKind::Product => {
                let category_id = params
                    .get_non_blank("category_id")
                    .map(str::to_string)
                    .unwrap_or_else(|| default_parent(EntityKind::Product));
                args.insert("category_id", category_id);
            }
            EntityKind::Category | EntityKind::Folder => {}
        }
    }

    args
}

/// Edit template matching the computed arguments
pub fn edition_template(args: &BTreeMap<&'static str, String>) -> &'static str {
    EDITION_ORDER
        .into_iter()
        .find(|kind| args.contains_key(kind.id_param()))
        .map(|kind| kind.descriptor().edit_template)
        .unwrap_or(HOME_TEMPLATE)
}

/// Owner edit view for the current request
pub async fn render_edition(service: &TabService, params: &RequestParams) -> View {
    // A missing owner is reported by the operation itself
    let entity = match service.find_entity(params).await {
        Ok(entity) => entity,
        Err(err) => {
            tracing::debug!(error = %err, "Edit view rendered without entity");
            None
        }
    };

    let arguments = edition_arguments(params, entity.as_ref());
    View {
        template: edition_template(&arguments),
        arguments,
        entity,
        form: None,
        general_error: None,
    }
}

/// Log a failed operation and re-render the edit view with the error attached
pub async fn render_failure(
    service: &TabService,
    params: &RequestParams,
    process: &str,
    form: Option<&TabForm>,
    err: AppError,
) -> HttpResponse {
    let message = err.display_message();
    tracing::error!("Error during tabs {} process : {}.", process, message);

    let mut view = render_edition(service, params).await;
    view.form = form.map(|form| form.state(Some(message.clone())));
    view.general_error = Some(message);

    HttpResponse::build(err.status_code()).json(view)
}
