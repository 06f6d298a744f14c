//! Custom Axum extractors.
//!
//! - `ClientIp`: client address from proxy headers or the connection
//! - `UserAgent`: the `User-Agent` header
//! - `AuthToken`: the raw bearer token from the `auth-token` header
//! - `JsonBody`: `Json` with rejections rendered as [`AppError`]
//!
//! # Examples
//!
//! ```ignore
//! use voyage_web::extractors::{AuthToken, ClientIp, JsonBody};
//!
//! async fn handler(
//!     token: AuthToken,
//!     client_ip: ClientIp,
//!     JsonBody(request): JsonBody<BookingRequest>,
//! ) -> Result<Json<Response>, AppError> {
//!     tracing::info!(client_ip = %client_ip.0, "Booking request");
//!     Ok(Json(response))
//! }
//! ```

use crate::error::AppError;
use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Request, connect_info::ConnectInfo, rejection::JsonRejection},
    http::{HeaderMap, request::Parts},
    Json,
};
use serde::de::DeserializeOwned;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;
use voyage_core::validation::ValidationErrors;

/// Header carrying the bearer token (raw value, no scheme).
pub const AUTH_TOKEN_HEADER: &str = "auth-token";

/// Client IP address.
///
/// # Priority
///
/// 1. `X-Forwarded-For` (first IP in the list)
/// 2. `X-Real-IP`
/// 3. Connection IP (when the server was started with connect info)
/// 4. `127.0.0.1`
#[derive(Debug, Clone, Copy)]
pub struct ClientIp(pub IpAddr);

#[async_trait]
impl<S> FromRequestParts<S> for ClientIp
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let ip = extract_client_ip(&parts.headers, parts.extensions.get());

        Ok(Self(ip))
    }
}

fn extract_client_ip(headers: &HeaderMap, connect_info: Option<&ConnectInfo<SocketAddr>>) -> IpAddr {
    let forwarded = headers
        .get("X-Forwarded-For")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .and_then(|first| first.trim().parse::<IpAddr>().ok());

    let real_ip = || {
        headers
            .get("X-Real-IP")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<IpAddr>().ok())
    };

    forwarded
        .or_else(real_ip)
        .or_else(|| connect_info.map(|ConnectInfo(addr)| addr.ip()))
        .unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST))
}

/// User-Agent header, or `"Unknown"` if not present.
#[derive(Debug, Clone)]
pub struct UserAgent(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for UserAgent
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_agent = parts
            .headers
            .get("User-Agent")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("Unknown")
            .to_string();

        Ok(Self(user_agent))
    }
}

/// Raw token from the `auth-token` header.
///
/// Rejects with 401 when the header is missing, empty or not ASCII. Whether
/// the token is valid is for the caller to decide.
#[derive(Clone)]
pub struct AuthToken(pub String);

impl std::fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AuthToken(<redacted>)")
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthToken
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(AUTH_TOKEN_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(|token| Self(token.to_string()))
            .ok_or_else(|| {
                tracing::warn!("Request without auth-token header");
                AppError::unauthorized("Please authenticate using a valid token")
            })
    }
}

/// JSON request body whose rejections render as [`AppError`].
///
/// Malformed JSON, a wrong content type or a body that does not match `T`
/// all become 400 responses in the usual error shape.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(json_rejection(&rejection)),
        }
    }
}

fn json_rejection(rejection: &JsonRejection) -> AppError {
    tracing::warn!(reason = %rejection.body_text(), "Rejected JSON body");
    AppError::bad_request(rejection.body_text())
}

/// Parse a path id, reporting a validation error on `field` when it is not
/// a UUID.
///
/// # Errors
///
/// 400 `VALIDATION_ERROR` naming `field`.
pub fn parse_id<T>(raw: &str, field: &str) -> crate::WebResult<T>
where
    T: FromStr,
{
    raw.trim()
        .parse()
        .map_err(|_| ValidationErrors::single(field, format!("{raw} is not a valid id")).into())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use serde::Deserialize;
    use voyage_core::ids::HotelId;

    fn parts(builder: axum::http::request::Builder) -> Parts {
        builder.body(()).expect("Valid request").into_parts().0
    }

    #[tokio::test]
    async fn test_client_ip_from_x_forwarded_for() {
        let mut parts = parts(Request::builder().header("X-Forwarded-For", "203.0.113.1, 198.51.100.1"));
        let client_ip = ClientIp::from_request_parts(&mut parts, &())
            .await
            .expect("Should extract");

        assert_eq!(client_ip.0.to_string(), "203.0.113.1");
    }

    #[tokio::test]
    async fn test_client_ip_from_x_real_ip() {
        let mut parts = parts(Request::builder().header("X-Real-IP", "198.51.100.42"));
        let client_ip = ClientIp::from_request_parts(&mut parts, &())
            .await
            .expect("Should extract");

        assert_eq!(client_ip.0.to_string(), "198.51.100.42");
    }

    #[tokio::test]
    async fn client_ip_uses_connect_info() {
        let mut parts = parts(Request::builder());
        parts
            .extensions
            .insert(ConnectInfo(SocketAddr::from(([192, 0, 2, 7], 4000))));
        let client_ip = ClientIp::from_request_parts(&mut parts, &())
            .await
            .expect("Should extract");

        assert_eq!(client_ip.0.to_string(), "192.0.2.7");
    }

    #[tokio::test]
    async fn test_client_ip_fallback() {
        let mut parts = parts(Request::builder());
        let client_ip = ClientIp::from_request_parts(&mut parts, &())
            .await
            .expect("Should extract");

        assert_eq!(client_ip.0.to_string(), "127.0.0.1");
    }

    #[tokio::test]
    async fn test_user_agent_from_header() {
        let mut parts = parts(Request::builder().header(header::USER_AGENT, "Mozilla/5.0 (Test)"));
        let user_agent = UserAgent::from_request_parts(&mut parts, &())
            .await
            .expect("Should extract");

        assert_eq!(user_agent.0, "Mozilla/5.0 (Test)");
    }

    #[tokio::test]
    async fn test_user_agent_fallback() {
        let mut parts = parts(Request::builder());
        let user_agent = UserAgent::from_request_parts(&mut parts, &())
            .await
            .expect("Should extract");

        assert_eq!(user_agent.0, "Unknown");
    }

    #[tokio::test]
    async fn auth_token_is_read_from_its_header() {
        let mut parts = parts(Request::builder().header(AUTH_TOKEN_HEADER, "abc.def.ghi"));
        let token = AuthToken::from_request_parts(&mut parts, &())
            .await
            .expect("Should extract");

        assert_eq!(token.0, "abc.def.ghi");
        assert_eq!(format!("{token:?}"), "AuthToken(<redacted>)");
    }

    #[tokio::test]
    async fn missing_or_blank_auth_token_is_unauthorized() {
        let mut missing = parts(Request::builder());
        let err = AuthToken::from_request_parts(&mut missing, &())
            .await
            .expect_err("Should reject");
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);

        let mut blank = parts(Request::builder().header(AUTH_TOKEN_HEADER, "  "));
        assert!(AuthToken::from_request_parts(&mut blank, &()).await.is_err());
    }

    #[derive(Debug, Deserialize)]
    struct Payload {
        rooms: u32,
    }

    #[tokio::test]
    async fn json_body_parses_and_rejects_as_bad_request() {
        let ok = Request::builder()
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"rooms": 2}"#))
            .expect("Valid request");
        let JsonBody(payload) = JsonBody::<Payload>::from_request(ok, &())
            .await
            .expect("Should parse");
        assert_eq!(payload.rooms, 2);

        let broken = Request::builder()
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{rooms"))
            .expect("Valid request");
        let err = JsonBody::<Payload>::from_request(broken, &())
            .await
            .expect_err("Should reject");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.code(), "BAD_REQUEST");
    }

    #[test]
    fn parse_id_reports_the_field() {
        let id = HotelId::new();
        assert_eq!(parse_id::<HotelId>(&id.to_string(), "hotelId").expect("uuid"), id);

        let err = parse_id::<HotelId>("not-a-uuid", "hotelId").expect_err("invalid");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.code(), "VALIDATION_ERROR");
    }
}
