pub mod auth;
pub mod error_handler;
pub mod request_id;

pub use auth::{check_auth, hash_api_key, verify_api_key, AccessLevel, AdminAuth, AdminGrant};
pub use error_handler::{error_response, ErrorHandler};
pub use request_id::{RequestId, RequestTag};
