use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::{HeaderName, HeaderValue},
    Error, HttpMessage,
};
use futures_util::future::LocalBoxFuture;
use std::future::{ready, Ready};
use uuid::Uuid;

const HEADER: &str = "x-request-id";
const MAX_LEN: usize = 64;

/// Correlation id of the current admin request, stored in request extensions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTag(pub String);

impl RequestTag {
    /// Reuse the caller's id when it is a short token, otherwise mint one
    fn from_header(raw: Option<&str>) -> Self {
        let accepted = raw.map(str::trim).filter(|id| {
            !id.is_empty()
                && id.len() <= MAX_LEN
                && id
                    .bytes()
                    .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.'))
        });

        match accepted {
            Some(id) => RequestTag(id.to_string()),
            None => RequestTag(Uuid::new_v4().to_string()),
        }
    }
}

/// Tags every request with an `X-Request-ID` and logs its outcome
pub struct RequestId;

impl<S, B> Transform<S, ServiceRequest> for RequestId
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RequestIdMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestIdMiddleware { service }))
    }
}

pub struct RequestIdMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for RequestIdMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let tag = RequestTag::from_header(req.headers().get(HEADER).and_then(|h| h.to_str().ok()));
        req.extensions_mut().insert(tag.clone());

        // Health checks are polled constantly
        let health_check = matches!(req.path(), "/health" | "/ready");
        let method = req.method().clone();
        let path = req.path().to_string();

        if health_check {
            tracing::debug!(request_id = %tag.0, %method, %path, "Health check request");
        } else {
            tracing::info!(request_id = %tag.0, %method, %path, "Admin request");
        }

        let fut = self.service.call(req);

        Box::pin(async move {
            let mut res = fut.await?;

            if let Ok(value) = HeaderValue::from_str(&tag.0) {
                res.headers_mut()
                    .insert(HeaderName::from_static(HEADER), value);
            }

            if !health_check {
                tracing::info!(request_id = %tag.0, status = %res.status(), "Admin request completed");
            }

            Ok(res)
        })
    }
}
