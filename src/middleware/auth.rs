use crate::core::AppError;
use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error, HttpMessage, HttpRequest,
};
use argon2::{Argon2, PasswordHash, PasswordVerifier};
use futures_util::future::LocalBoxFuture;
use serde::Deserialize;
use std::future::{ready, Ready};
use std::rc::Rc;
use std::sync::Arc;

/// Access levels an administrator can be granted on a module
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessLevel {
    View,
    Create,
    Update,
    Delete,
}

impl std::fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccessLevel::View => write!(f, "view"),
            AccessLevel::Create => write!(f, "create"),
            AccessLevel::Update => write!(f, "update"),
            AccessLevel::Delete => write!(f, "delete"),
        }
    }
}

impl std::str::FromStr for AccessLevel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "view" => Ok(AccessLevel::View),
            "create" => Ok(AccessLevel::Create),
            "update" => Ok(AccessLevel::Update),
            "delete" => Ok(AccessLevel::Delete),
            _ => Err(format!("Invalid access level: {}", s)),
        }
    }
}

/// Access granted to the authenticated administrator, stored in request extensions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminGrant {
    pub levels: Vec<AccessLevel>,
}

impl AdminGrant {
    pub fn new(levels: Vec<AccessLevel>) -> Self {
        Self { levels }
    }

    pub fn all() -> Self {
        Self::new(vec![
            AccessLevel::View,
            AccessLevel::Create,
            AccessLevel::Update,
            AccessLevel::Delete,
        ])
    }

    pub fn allows(&self, level: AccessLevel) -> bool {
        self.levels.contains(&level)
    }
}

/// Admin API key authentication middleware
///
/// Verifies `X-API-Key` against the configured argon2 hash and attaches an
/// [`AdminGrant`] carrying the configured access levels.
pub struct AdminAuth {
    key_hash: Arc<String>,
    levels: Arc<Vec<AccessLevel>>,
}

impl AdminAuth {
    pub fn new(key_hash: String, levels: Vec<AccessLevel>) -> Self {
        Self {
            key_hash: Arc::new(key_hash),
            levels: Arc::new(levels),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AdminAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = AdminAuthMiddleware<S>;
    type Future = Ready<std::result::Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AdminAuthMiddleware {
            service: Rc::new(service),
            key_hash: self.key_hash.clone(),
            levels: self.levels.clone(),
        }))
    }
}

pub struct AdminAuthMiddleware<S> {
    service: Rc<S>,
    key_hash: Arc<String>,
    levels: Arc<Vec<AccessLevel>>,
}

impl<S, B> Service<ServiceRequest> for AdminAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, std::result::Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let svc = self.service.clone();
        let key_hash = self.key_hash.clone();
        let levels = self.levels.clone();

        Box::pin(async move {
            // Health checks stay public
            if matches!(req.path(), "/health" | "/ready") {
                return svc.call(req).await;
            }

            let api_key = req
                .headers()
                .get("X-API-Key")
                .and_then(|h| h.to_str().ok())
                .ok_or_else(|| Error::from(AppError::unauthorized("Missing X-API-Key header")))?;

            if !verify_api_key(api_key, &key_hash).map_err(Error::from)? {
                tracing::warn!(path = %req.path(), "Rejected invalid admin API key");
                return Err(Error::from(AppError::unauthorized("Invalid API key")));
            }

            req.extensions_mut()
                .insert(AdminGrant::new(levels.as_ref().clone()));

            svc.call(req).await
        })
    }
}

/// Check that the current administrator holds `level` on `module`
pub fn check_auth(req: &HttpRequest, module: &str, level: AccessLevel) -> crate::core::Result<()> {
    let granted = req
        .extensions()
        .get::<AdminGrant>()
        .map(|grant| grant.allows(level))
        .unwrap_or(false);

    if granted {
        Ok(())
    } else {
        tracing::warn!(module, level = %level, "Access denied");
        Err(AppError::forbidden(format!(
            "Sorry, you're not allowed to perform this action ({} on {})",
            level, module
        )))
    }
}

/// Helper function to hash API keys using Argon2
pub fn hash_api_key(api_key: &str) -> crate::core::Result<String> {
    use argon2::password_hash::{rand_core::OsRng, PasswordHasher, SaltString};

    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(api_key.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::unexpected(format!("Failed to hash API key: {}", e)))
}

/// Helper function to verify API keys using Argon2
pub fn verify_api_key(api_key: &str, hash: &str) -> crate::core::Result<bool> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| AppError::Configuration(format!("Invalid hash format: {}", e)))?;

    let argon2 = Argon2::default();

    Ok(argon2
        .verify_password(api_key.as_bytes(), &parsed_hash)
        .is_ok())
}
