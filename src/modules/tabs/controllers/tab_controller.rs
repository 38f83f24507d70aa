use std::sync::Arc;

use actix_web::{http::header, web, HttpRequest, HttpResponse};
use serde::Deserialize;
use url::Url;

use crate::core::{AppError, RequestParams, Result};
use crate::middleware::auth::{check_auth, AccessLevel};
use crate::modules::tabs::controllers::view::{self, View, CONFIG_TEMPLATE};
use crate::modules::tabs::models::entity::{DELETE_ORDER, REDIRECT_ORDER, RESOLUTION_ORDER};
use crate::modules::tabs::models::{EntityKind, TabForm, TabOrder, TabQuery};
use crate::modules::tabs::services::resolver::resolve_kind;
use crate::modules::tabs::services::{AdminUrls, PositionChange, TabService};

/// Access control module code
pub const MODULE: &str = "Tabs";

/// Shared state of the tab handlers
pub struct TabsState {
    pub service: Arc<TabService>,
    pub urls: AdminUrls,
}

type FormBody = Option<web::Form<Vec<(String, String)>>>;

fn merged_params(req: &HttpRequest, body: FormBody) -> RequestParams {
    RequestParams::from_request(req, body.map(|form| form.into_inner()))
}

fn parse_id(name: &str, raw: &str) -> Result<i32> {
    raw.trim()
        .parse::<i32>()
        .map_err(|_| AppError::validation(format!("{}: This value should be an integer.", name)))
}

fn redirect(url: Url) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, url.as_str()))
        .finish()
}

fn resource_key_not_found() -> AppError {
    AppError::not_found("Resource key not found")
}

/// Tabs module configuration page
/// GET /admin/module/tabs/config
pub async fn config(req: HttpRequest) -> Result<HttpResponse> {
    check_auth(&req, MODULE, AccessLevel::View)?;

    Ok(HttpResponse::Ok().json(View::new(CONFIG_TEMPLATE)))
}

/// Renumber every product's tabs, then show the configuration page
/// POST /admin/module/tabs/init-position
pub async fn init_position(req: HttpRequest, state: web::Data<TabsState>) -> Result<HttpResponse> {
    check_auth(&req, MODULE, AccessLevel::Update)?;

    let owners = state.service.renumber_all(EntityKind::Product).await?;

    Ok(HttpResponse::Ok().json(View::new(CONFIG_TEMPLATE).with_argument("renumbered_owners", owners)))
}

/// Create a tab, or update it when `tab_id` is submitted
/// POST /admin/module/tabs/associate/{kind}/{id}
pub async fn manage_association(
    req: HttpRequest,
    state: web::Data<TabsState>,
    body: FormBody,
) -> Result<HttpResponse> {
    check_auth(&req, MODULE, AccessLevel::Update)?;

    let kind: EntityKind = req
        .match_info()
        .get("kind")
        .unwrap_or_default()
        .parse()
        .map_err(AppError::NotFound)?;
    let owner_raw = req.match_info().get("id").unwrap_or_default().to_string();

    let mut params = merged_params(&req, body);
    params.set(kind.id_param(), owner_raw.as_str());
    let form = TabForm::from_params(kind, &params);

    let result = async {
        let owner_id = parse_id(kind.id_param(), &owner_raw)?;
        let saved = match params.get_non_blank("tab_id") {
            None => state.service.create(kind, owner_id, &form).await?,
            Some(raw) => {
                let tab_id = parse_id("tab_id", raw)?;
                state.service.update(kind, tab_id, &form).await?
            }
        };

        let url = state.urls.success_url(
            saved.success_url.as_deref(),
            kind,
            saved.tab.owner_id,
            saved.tab.id,
        )?;
        Ok::<_, AppError>(redirect(url))
    }
    .await;

    match result {
        Ok(response) => Ok(response),
        Err(err) => {
            let process = format!("{} association", kind);
            Ok(view::render_failure(&state.service, &params, &process, Some(&form), err).await)
        }
    }
}

/// Move a tab within its owner's set
/// POST /admin/module/tabs/position
pub async fn update_position(
    req: HttpRequest,
    state: web::Data<TabsState>,
    body: FormBody,
) -> Result<HttpResponse> {
    check_auth(&req, MODULE, AccessLevel::Update)?;

    let params = merged_params(&req, body);
    let Some((kind, owner_id)) = resolve_kind(&params, &REDIRECT_ORDER)? else {
        return Err(resource_key_not_found());
    };

    let result = async {
        let tab_id = params
            .get_non_blank("tab_id")
            .ok_or_else(|| AppError::validation("tab_id: This value should not be blank."))
            .and_then(|raw| parse_id("tab_id", raw))?;

        let value = params
            .get_non_blank("value")
            .or_else(|| params.get_non_blank("position"))
            .map(|raw| parse_id("value", raw))
            .transpose()?;
        let change = PositionChange::from_mode(params.get_non_blank("mode"), value)
            .ok_or_else(|| AppError::validation("value: This value should not be blank."))?;

        state.service.update_position(kind, tab_id, change).await?;

        Ok::<_, AppError>(redirect(state.urls.edit_url(kind, owner_id)?))
    }
    .await;

    match result {
        Ok(response) => Ok(response),
        Err(err) => {
            let process = format!("{} position", kind);
            Ok(view::render_failure(&state.service, &params, &process, None, err).await)
        }
    }
}

/// Delete a tab and go back to its owner's edit page
/// DELETE /admin/module/tabs/tab/{tab_id}
pub async fn delete_association(
    req: HttpRequest,
    state: web::Data<TabsState>,
    body: FormBody,
) -> Result<HttpResponse> {
    check_auth(&req, MODULE, AccessLevel::Delete)?;

    let params = merged_params(&req, body);

    let result = async {
        let tab_id = parse_id("tab_id", params.get("tab_id").unwrap_or_default())?;
        let kind = resolve_kind(&params, &RESOLUTION_ORDER)?.map(|(kind, _)| kind);

        let deleted = state.service.delete(kind, tab_id).await?;

        let (kind, owner_id) = deleted
            .owners
            .first_in(&DELETE_ORDER)
            .ok_or_else(resource_key_not_found)?;
        Ok::<_, AppError>(redirect(state.urls.edit_url(kind, owner_id)?))
    }
    .await;

    match result {
        Ok(response) => Ok(response),
        Err(err) => Ok(view::render_failure(&state.service, &params, "delete", None, err).await),
    }
}

/// Query parameters for listing tabs
#[derive(Debug, Default, Deserialize)]
pub struct ListTabsQuery {
    pub locale: Option<String>,
    pub visible: Option<bool>,
    pub min_position: Option<i32>,
    pub max_position: Option<i32>,
    pub updated_within_days: Option<i64>,
    pub created_within_days: Option<i64>,
    #[serde(default)]
    pub order: TabOrder,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl ListTabsQuery {
    /// Criteria for the store; day counts outside the date range are rejected
    pub fn to_query(&self) -> Result<TabQuery> {
        let mut query = TabQuery::new()
            .filter_by_position_range(self.min_position, self.max_position)
            .order_by(self.order)
            .paginate(self.limit, self.offset);

        if let Some(visible) = self.visible {
            query = query.filter_by_visible(visible);
        }
        if let Some(days) = self.updated_within_days {
            query = query.recently_updated(days)?;
        }
        if let Some(days) = self.created_within_days {
            query = query.recently_created(days)?;
        }

        Ok(query)
    }
}

fn list_target(path: (String, i32)) -> Result<(EntityKind, i32)> {
    let (kind, owner_id) = path;
    let kind = kind.parse::<EntityKind>().map_err(AppError::NotFound)?;
    Ok((kind, owner_id))
}

/// One owner's tabs with their translation
/// GET /admin/module/tabs/list/{kind}/{owner_id}
pub async fn list_tabs(
    req: HttpRequest,
    state: web::Data<TabsState>,
    path: web::Path<(String, i32)>,
    query: web::Query<ListTabsQuery>,
) -> Result<HttpResponse> {
    check_auth(&req, MODULE, AccessLevel::View)?;

    let (kind, owner_id) = list_target(path.into_inner())?;
    let tabs = state
        .service
        .list(kind, owner_id, query.to_query()?, query.locale.as_deref())
        .await?;

    Ok(HttpResponse::Ok().json(tabs))
}

/// Delete every tab of one owner
/// DELETE /admin/module/tabs/list/{kind}/{owner_id}
pub async fn delete_owner_tabs(
    req: HttpRequest,
    state: web::Data<TabsState>,
    path: web::Path<(String, i32)>,
) -> Result<HttpResponse> {
    check_auth(&req, MODULE, AccessLevel::Delete)?;

    let (kind, owner_id) = list_target(path.into_inner())?;
    let deleted = state.service.delete_for_owner(kind, owner_id).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "deleted": deleted })))
}

/// Configure tab routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    let associate = "/associate/{kind:content|category|folder|product}/{id}";

    cfg.service(
        web::scope("/admin/module/tabs")
            .route("/config", web::get().to(config))
            .route("/init-position", web::post().to(init_position))
            .route(associate, web::post().to(manage_association))
            .route(associate, web::get().to(manage_association))
            .route("/position", web::post().to(update_position))
            .route("/tab/{tab_id}", web::delete().to(delete_association))
            .route("/list/{kind}/{owner_id}", web::get().to(list_tabs))
            .route("/list/{kind}/{owner_id}", web::delete().to(delete_owner_tabs)),
    );
}
