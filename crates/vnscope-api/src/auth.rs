//! # Authentication Middleware
//!
//! Bearer token middleware that resolves the caller's jurisdiction.
//!
//! ## Token Format
//!
//! ```text
//! Bearer {user_id}:{secret}   when VNSCOPE_AUTH_SECRET is set
//! Bearer {user_id}            development mode (no secret configured)
//! ```
//!
//! The token only establishes *who* is calling. *What* they may see is
//! looked up in the server-side [`ProfileDirectory`] and turned into a
//! [`JurisdictionScope`]. A verified user with no profile gets the
//! unassigned scope, which every check denies.
//!
//! ## CallerIdentity
//!
//! Every authenticated request gets a [`CallerIdentity`] injected into the
//! request extensions. Handlers extract it via the `FromRequestParts` impl.

use std::sync::Arc;

use axum::extract::Request;
use axum::http::request::Parts;
use axum::http::{header, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use subtle::ConstantTimeEq;
use vnscope_core::{JurisdictionScope, Role, UserId};
use zeroize::Zeroizing;

use crate::error::{AppError, ErrorBody, ErrorDetail};
use crate::profiles::ProfileDirectory;

// ── Secret ──────────────────────────────────────────────────────────────────

/// Shared authentication secret, zeroed on drop.
#[derive(Clone)]
pub struct SecretToken(Zeroizing<String>);

impl SecretToken {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(Zeroizing::new(secret.into()))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Debug for SecretToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SecretToken([REDACTED])")
    }
}

/// Auth configuration injected into request extensions.
#[derive(Debug, Clone, Default)]
pub struct AuthConfig {
    /// `None` enables development mode.
    pub secret: Option<SecretToken>,
}

// ── CallerIdentity ──────────────────────────────────────────────────────────

/// The authenticated caller and the scope derived for this request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity {
    pub user_id: UserId,
    /// `None` when the user has no profile.
    pub role: Option<Role>,
    pub scope: JurisdictionScope,
}

impl CallerIdentity {
    /// Look up `user_id` and derive its scope.
    pub fn from_directory(user_id: UserId, directory: &ProfileDirectory) -> Self {
        match directory.get(&user_id) {
            Some(profile) => Self {
                scope: JurisdictionScope::from_profile(&profile),
                role: Some(profile.role),
                user_id,
            },
            None => {
                tracing::warn!(user_id = %user_id, "no profile for authenticated user, scope unassigned");
                Self {
                    user_id,
                    role: None,
                    scope: JurisdictionScope::Unassigned,
                }
            }
        }
    }
}

#[axum::async_trait]
impl<S: Send + Sync> axum::extract::FromRequestParts<S> for CallerIdentity {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CallerIdentity>()
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("no caller identity in request context".into()))
    }
}

// ── Token Validation ────────────────────────────────────────────────────────

/// Constant-time comparison of secrets.
fn constant_time_token_eq(provided: &str, expected: &str) -> bool {
    let provided = provided.as_bytes();
    let expected = expected.as_bytes();
    if provided.len() != expected.len() {
        let _ = expected.ct_eq(expected);
        return false;
    }
    provided.ct_eq(expected).into()
}

/// Parse the bearer token into the caller's user id.
pub fn parse_bearer_token(provided: &str, secret: Option<&SecretToken>) -> Result<UserId, String> {
    let user = match secret {
        Some(secret) => {
            let (user, given) = provided
                .rsplit_once(':')
                .ok_or_else(|| "invalid token format, expected {user_id}:{secret}".to_string())?;
            if !constant_time_token_eq(given, secret.as_str()) {
                return Err("invalid bearer token".into());
            }
            user
        }
        None => provided,
    };
    UserId::new(user).map_err(|e| e.to_string())
}

// ── Middleware ───────────────────────────────────────────────────────────────

/// Authenticate the request and inject a [`CallerIdentity`].
///
/// Requires [`AuthConfig`] and `Arc<ProfileDirectory>` extensions.
pub async fn auth_middleware(mut request: Request, next: Next) -> Response {
    let config = request
        .extensions()
        .get::<AuthConfig>()
        .cloned()
        .unwrap_or_default();
    let Some(directory) = request.extensions().get::<Arc<ProfileDirectory>>().cloned() else {
        return AppError::Internal("profile directory extension missing".into()).into_response();
    };

    let parsed = match request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
    {
        Some(value) => match value.strip_prefix("Bearer ") {
            Some(token) => parse_bearer_token(token, config.secret.as_ref()),
            None => Err("authorization header must use Bearer scheme".to_string()),
        },
        None => Err("missing authorization header".to_string()),
    };

    match parsed {
        Ok(user_id) => {
            let identity = CallerIdentity::from_directory(user_id, &directory);
            tracing::debug!(
                user_id = %identity.user_id,
                scope = %identity.scope.label(),
                "caller authenticated"
            );
            request.extensions_mut().insert(identity);
            next.run(request).await
        }
        Err(msg) => {
            tracing::warn!(reason = %msg, "authentication failed");
            unauthorized_response(&msg)
        }
    }
}

fn unauthorized_response(message: &str) -> Response {
    let body = ErrorBody {
        error: ErrorDetail {
            code: "UNAUTHORIZED".to_string(),
            message: message.to_string(),
        },
    };
    (StatusCode::UNAUTHORIZED, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use axum::middleware::from_fn;
    use axum::routing::get;
    use axum::Router;
    use http_body_util::BodyExt;
    use tower::ServiceExt;
    use vnscope_core::{ProvinceCode, UserProfile};

    fn directory() -> Arc<ProfileDirectory> {
        Arc::new(ProfileDirectory::from_profiles([UserProfile {
            user_id: UserId::new("prov-17").unwrap(),
            role: Role::Province,
            province_code: Some(ProvinceCode::new(17).unwrap()),
            ward_code: None,
        }]))
    }

    fn test_app(secret: Option<&str>) -> Router {
        Router::new()
            .route(
                "/whoami",
                get(|caller: CallerIdentity| async move { caller.scope.label() }),
            )
            .layer(from_fn(auth_middleware))
            .layer(axum::Extension(AuthConfig {
                secret: secret.map(SecretToken::new),
            }))
            .layer(axum::Extension(directory()))
    }

    async fn call(app: Router, auth: Option<&str>) -> (StatusCode, String) {
        let mut builder = Request::builder().uri("/whoami");
        if let Some(auth) = auth {
            builder = builder.header("authorization", auth);
        }
        let response = app.oneshot(builder.body(Body::empty()).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn valid_token_resolves_profile_scope() {
        let (status, body) = call(test_app(Some("s3cret")), Some("Bearer prov-17:s3cret")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "Province 17");
    }

    #[tokio::test]
    async fn wrong_secret_rejected() {
        let (status, body) = call(test_app(Some("s3cret")), Some("Bearer prov-17:nope")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body.contains("UNAUTHORIZED"));
    }

    #[tokio::test]
    async fn missing_header_rejected_even_in_dev_mode() {
        let (status, _) = call(test_app(None), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn basic_scheme_rejected() {
        let (status, _) = call(test_app(Some("s3cret")), Some("Basic cHJvdi0xNw==")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn dev_mode_accepts_bare_user_id() {
        let (status, body) = call(test_app(None), Some("Bearer prov-17")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "Province 17");
    }

    #[tokio::test]
    async fn unknown_user_is_unassigned() {
        let (status, body) = call(test_app(None), Some("Bearer stranger")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "No jurisdiction assigned");
    }

    #[test]
    fn token_parsing() {
        let secret = SecretToken::new("abc");
        assert_eq!(parse_bearer_token("u:1:abc", Some(&secret)).unwrap().as_str(), "u:1");
        assert!(parse_bearer_token("abc", Some(&secret)).is_err());
        assert!(parse_bearer_token(":abc", Some(&secret)).is_err());
        assert!(parse_bearer_token("   ", None).is_err());
    }

    #[test]
    fn secret_debug_is_redacted() {
        let config = AuthConfig {
            secret: Some(SecretToken::new("hunter2")),
        };
        assert!(!format!("{config:?}").contains("hunter2"));
    }
}
