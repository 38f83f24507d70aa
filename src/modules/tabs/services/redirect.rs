use url::Url;

use crate::core::{AppError, Result};
use crate::modules::tabs::models::EntityKind;

/// Builds owner edit URLs relative to the admin base URL
#[derive(Debug, Clone)]
pub struct AdminUrls {
    base: Url,
}

impl AdminUrls {
    pub fn new(base_url: &str) -> Result<Self> {
        let mut base = Url::parse(base_url)
            .map_err(|e| AppError::Configuration(format!("Invalid admin base URL: {}", e)))?;

        // Keep a base path prefix when joining
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        Ok(Self { base })
    }

    fn join(&self, path: &str) -> Result<Url> {
        self.base
            .join(path.trim_start_matches('/'))
            .map_err(|e| AppError::unexpected(format!("Failed to build URL {}: {}", path, e)))
    }

    /// Edit page of an owner, opened on its modules tab
    pub fn edit_url(&self, kind: EntityKind, owner_id: i32) -> Result<Url> {
        let descriptor = kind.descriptor();
        let template = descriptor.edit_url;

        let mut url = if template.id_in_path {
            self.join(&format!("{}/{}", template.path, owner_id))?
        } else {
            let mut url = self.join(template.path)?;
            url.query_pairs_mut()
                .append_pair(descriptor.id_param, &owner_id.to_string());
            url
        };

        url.query_pairs_mut().append_pair("current_tab", "modules");
        url.set_fragment(template.fragment);

        Ok(url)
    }

    /// Where a saved tab redirects: the submitted success URL or the owner's
    /// edit page, with `tab_id` appended
    pub fn success_url(
        &self,
        explicit: Option<&str>,
        kind: EntityKind,
        owner_id: i32,
        tab_id: i32,
    ) -> Result<Url> {
        let mut url = match explicit {
            Some(explicit) if explicit.starts_with('/') => self.join(explicit)?,
            Some(explicit) => Url::parse(explicit)
                .map_err(|e| AppError::validation(format!("success_url: {}", e)))?,
            None => self.edit_url(kind, owner_id)?,
        };

        url.query_pairs_mut().append_pair("tab_id", &tab_id.to_string());

        Ok(url)
    }
}
