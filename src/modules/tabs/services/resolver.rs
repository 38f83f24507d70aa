// Entity resolver: which owner a request targets.
//
// Owner id parameters are inspected in a fixed order and the first one
// present decides the type. Other owner parameters in the same request are
// ignored.

use crate::core::{AppError, RequestParams, Result};
use crate::modules::tabs::models::entity::RESOLUTION_ORDER;
use crate::modules::tabs::models::{CatalogEntity, EntityKind};
use crate::modules::tabs::repositories::CatalogStore;

/// First owner parameter present in `params`, following `order`.
///
/// Blank values count as absent. A value that is not an integer is a
/// validation error.
pub fn resolve_kind(params: &RequestParams, order: &[EntityKind]) -> Result<Option<(EntityKind, i32)>> {
    for kind in order {
        let Some(raw) = params.get_non_blank(kind.id_param()) else {
            continue;
        };

        let id = raw.parse::<i32>().map_err(|_| {
            AppError::validation(format!("{}: This value should be an integer.", kind.id_param()))
        })?;

        return Ok(Some((*kind, id)));
    }

    Ok(None)
}

/// Load the owner entity a request targets, `None` without owner parameter
pub async fn resolve_entity(
    catalog: &dyn CatalogStore,
    params: &RequestParams,
    locale: &str,
) -> Result<Option<CatalogEntity>> {
    let Some((kind, id)) = resolve_kind(params, &RESOLUTION_ORDER)? else {
        return Ok(None);
    };

    let entity = catalog
        .find(kind, id, locale)
        .await?
        .ok_or_else(|| AppError::not_found(format!("{} {} id does not exist", id, kind)))?;

    Ok(Some(entity))
}
