//! Cookie-based JWT session authentication.
//!
//! This module issues HS256 JSON Web Tokens and carries them in an http-only
//! cookie named `token`.
//!
//! # Token Scheme
//!
//! The caller-supplied identity object is signed as-is, with `iat` and `exp`
//! claims stamped on top:
//!
//! ```text
//! token = HS256(secret, {...identity, "iat": now, "exp": now + ttl})
//! ```
//!
//! The identity is not checked against any credential store; any JSON object
//! posted to `/jwt` is signed.
//!
//! # Cookie Attributes
//!
//! | Policy            | Attributes                               |
//! |-------------------|------------------------------------------|
//! | `SameSiteStrict`  | `HttpOnly; SameSite=Strict; Path=/`      |
//! | `CrossSite`       | `HttpOnly; SameSite=None; Secure; Path=/`|
//!
//! # Example
//!
//! ```rust
//! use job_board::server::auth::TokenAuth;
//! use serde_json::json;
//!
//! let auth = TokenAuth::new("my-secret-key");
//!
//! let identity = json!({"email": "a@x.com"}).as_object().unwrap().clone();
//! let (token, _expiry) = auth.issue(identity).unwrap();
//!
//! let verified = auth.verify(&token).unwrap();
//! assert_eq!(verified.email(), Some("a@x.com"));
//! ```

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{request::Parts, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::Serialize;
use serde_json::{Map, Value};
use time::OffsetDateTime;
use tracing::{debug, error, warn};

pub use crate::error::AuthError;

// =============================================================================
// Constants
// =============================================================================

/// Name of the session cookie.
pub const TOKEN_COOKIE: &str = "token";

/// Default token lifetime (1 hour).
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(3600);

// =============================================================================
// Error Responses
// =============================================================================

/// Body returned for authentication and authorization failures.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = match &self {
            AuthError::MissingToken | AuthError::InvalidToken(_) => StatusCode::UNAUTHORIZED,
            AuthError::Forbidden => StatusCode::FORBIDDEN,
            AuthError::Signing(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // A bad signature may be tampering; a missing cookie is routine
        match &self {
            AuthError::MissingToken => {
                debug!(status = status.as_u16(), "Authentication failed: no token cookie");
            }
            AuthError::InvalidToken(reason) => {
                warn!(status = status.as_u16(), reason = %reason, "Authentication failed: invalid token");
            }
            AuthError::Forbidden => {
                warn!(status = status.as_u16(), "Authorization failed: identity mismatch");
            }
            AuthError::Signing(reason) => {
                error!(status = status.as_u16(), reason = %reason, "Failed to sign token");
            }
        }

        let body = MessageResponse {
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

// =============================================================================
// Cookie Policy
// =============================================================================

/// Cross-site attributes applied to the session cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CookiePolicy {
    /// First-party only, sent over plain HTTP (development)
    #[default]
    SameSiteStrict,

    /// Sent cross-site, HTTPS only (production, where the frontend is on another origin)
    CrossSite,
}

impl CookiePolicy {
    fn apply(self, cookie: &mut Cookie<'static>) {
        match self {
            CookiePolicy::SameSiteStrict => {
                cookie.set_same_site(SameSite::Strict);
                cookie.set_secure(false);
            }
            CookiePolicy::CrossSite => {
                cookie.set_same_site(SameSite::None);
                cookie.set_secure(true);
            }
        }
    }
}

// =============================================================================
// Identity
// =============================================================================

/// The decoded claims of a verified token.
///
/// Inserted into request extensions by [`verify_token`]; handlers extract it
/// directly.
#[derive(Debug, Clone, PartialEq)]
pub struct Identity {
    claims: Map<String, Value>,
}

impl Identity {
    /// Wrap a set of decoded claims.
    pub fn new(claims: Map<String, Value>) -> Self {
        Self { claims }
    }

    /// All claims, including `iat` and `exp`.
    pub fn claims(&self) -> &Map<String, Value> {
        &self.claims
    }

    /// The `email` claim, if present and a string.
    pub fn email(&self) -> Option<&str> {
        self.claims.get("email").and_then(Value::as_str)
    }

    /// Require that this identity's email equals `requested`.
    ///
    /// Fails with [`AuthError::Forbidden`] on mismatch, or when either side
    /// has no email.
    pub fn authorize_email<'a>(&self, requested: Option<&'a str>) -> Result<&'a str, AuthError> {
        match (self.email(), requested) {
            (Some(own), Some(requested)) if own == requested => Ok(requested),
            _ => Err(AuthError::Forbidden),
        }
    }
}

impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .ok_or(AuthError::MissingToken)
    }
}

// =============================================================================
// Token Authentication
// =============================================================================

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Issues and verifies session tokens with a shared HS256 secret.
#[derive(Clone)]
pub struct TokenAuth {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
    cookie_policy: CookiePolicy,
}

impl TokenAuth {
    /// Create an authenticator with the given secret, a 1 hour TTL and the
    /// same-site-strict cookie policy.
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        let secret = secret.as_ref();
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            ttl: DEFAULT_TOKEN_TTL,
            cookie_policy: CookiePolicy::default(),
        }
    }

    /// Set the token lifetime.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Set the cookie policy.
    pub fn with_cookie_policy(mut self, policy: CookiePolicy) -> Self {
        self.cookie_policy = policy;
        self
    }

    /// Token lifetime.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Cookie policy in effect.
    pub fn cookie_policy(&self) -> CookiePolicy {
        self.cookie_policy
    }

    /// Sign an identity, expiring `ttl` from now.
    ///
    /// Returns the encoded token and its expiry (Unix epoch seconds).
    pub fn issue(&self, identity: Map<String, Value>) -> Result<(String, u64), AuthError> {
        let expiry = unix_now().saturating_add(self.ttl.as_secs());
        let token = self.issue_with_expiry(identity, expiry)?;
        Ok((token, expiry))
    }

    /// Sign an identity with a specific expiry timestamp.
    ///
    /// Any `iat`/`exp` already present in `identity` are overwritten.
    pub fn issue_with_expiry(
        &self,
        mut identity: Map<String, Value>,
        expiry: u64,
    ) -> Result<String, AuthError> {
        identity.insert("iat".to_string(), Value::from(unix_now()));
        identity.insert("exp".to_string(), Value::from(expiry));

        encode(&Header::new(Algorithm::HS256), &identity, &self.encoding_key)
            .map_err(|e| AuthError::Signing(e.to_string()))
    }

    /// Verify a token's signature and expiry and return its claims.
    pub fn verify(&self, token: &str) -> Result<Identity, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        decode::<Map<String, Value>>(token, &self.decoding_key, &validation)
            .map(|data| Identity::new(data.claims))
            .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }

    /// Build the session cookie carrying `token`.
    pub fn session_cookie(&self, token: String) -> Cookie<'static> {
        let mut cookie = Cookie::build((TOKEN_COOKIE, token))
            .http_only(true)
            .path("/")
            .build();
        self.cookie_policy.apply(&mut cookie);
        cookie
    }

    /// Build a cookie that clears the session cookie on the client.
    ///
    /// Carries the same attributes as [`session_cookie`](Self::session_cookie)
    /// so browsers match and discard it. Expiry is pinned to the Unix epoch,
    /// so the header is identical on every call.
    pub fn removal_cookie(&self) -> Cookie<'static> {
        let mut cookie = self.session_cookie(String::new());
        cookie.set_max_age(time::Duration::ZERO);
        cookie.set_expires(OffsetDateTime::UNIX_EPOCH);
        cookie
    }
}

// =============================================================================
// Axum Middleware
// =============================================================================

/// Axum middleware requiring a valid session cookie.
///
/// Rejects with 401 when the `token` cookie is absent or fails verification;
/// otherwise stores the decoded [`Identity`] in request extensions.
///
/// # Example
///
/// ```ignore
/// use axum::{Router, middleware, routing::get};
/// use job_board::server::auth::{TokenAuth, verify_token};
///
/// let auth = TokenAuth::new("secret-key");
/// let app = Router::new()
///     .route("/job-application", get(handler))
///     .route_layer(middleware::from_fn_with_state(auth, verify_token));
/// ```
pub async fn verify_token(
    State(auth): State<TokenAuth>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let jar = CookieJar::from_headers(request.headers());
    let token = jar
        .get(TOKEN_COOKIE)
        .map(|cookie| cookie.value())
        .filter(|value| !value.is_empty())
        .ok_or(AuthError::MissingToken)?;

    let identity = auth.verify(token)?;
    debug!(email = ?identity.email(), "Verified session token");

    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

// =============================================================================
// Tests
// =============================================================================
