//! Token transports.
//!
//! The adapter only sees two capabilities: a source that yields the inbound
//! token and a sink that accepts the outbound one. Closures implement both,
//! which is how callers register custom hooks. The HTTP defaults read the
//! token from a cookie or header and park outbound tokens in an [`Outbox`]
//! that the session middleware applies to the response.

use std::sync::Arc;

use actix_web::cookie::time::{Duration as CookieDuration, OffsetDateTime};
use actix_web::cookie::{Cookie, SameSite};
use actix_web::http::header::{HeaderName, HeaderValue};
use actix_web::{HttpMessage, HttpRequest};
use parking_lot::Mutex;

use super::error::TransportError;
use crate::state::session_config::TransportKind;

/// A token handed to a sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub value: String,
    /// Unix seconds; mirrors the token's `exp` claim
    pub expires_at: i64,
}

impl IssuedToken {
    /// The marker sent on destroy: clients must drop whatever they hold.
    pub fn expired() -> Self {
        Self {
            value: String::new(),
            expires_at: 0,
        }
    }

    pub fn is_expired_marker(&self) -> bool {
        self.value.is_empty()
    }
}

pub trait TokenSource: Send {
    fn receive(&mut self) -> Result<Option<String>, TransportError>;
}

pub trait TokenSink: Send {
    fn send(&mut self, token: &IssuedToken) -> Result<(), TransportError>;
}

impl<F> TokenSource for F
where
    F: FnMut() -> Result<Option<String>, TransportError> + Send,
{
    fn receive(&mut self) -> Result<Option<String>, TransportError> {
        self()
    }
}

impl<F> TokenSink for F
where
    F: FnMut(&IssuedToken) -> Result<(), TransportError> + Send,
{
    fn send(&mut self, token: &IssuedToken) -> Result<(), TransportError> {
        self(token)
    }
}

/// Pins a closure's signature so it can be registered as a [`TokenSource`].
pub fn source_fn<F>(f: F) -> F
where
    F: FnMut() -> Result<Option<String>, TransportError> + Send,
{
    f
}

/// Pins a closure's signature so it can be registered as a [`TokenSink`].
pub fn sink_fn<F>(f: F) -> F
where
    F: FnMut(&IssuedToken) -> Result<(), TransportError> + Send,
{
    f
}

/// Inbound token captured from a request before the handler runs.
#[derive(Debug, Clone, Default)]
pub struct RequestTokenSource {
    token: Option<String>,
}

impl RequestTokenSource {
    pub fn new(token: Option<String>) -> Self {
        Self {
            token: token.filter(|t| !t.is_empty()),
        }
    }

    pub fn from_cookie(req: &HttpRequest, name: &str) -> Self {
        Self::new(req.cookie(name).map(|c| c.value().to_string()))
    }

    pub fn from_header<M: HttpMessage>(req: &M, name: &str) -> Self {
        let token = req
            .headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.trim().to_string());
        Self::new(token)
    }

    pub fn from_request(req: &HttpRequest, name: &str, kind: TransportKind) -> Self {
        match kind {
            TransportKind::Cookie => Self::from_cookie(req, name),
            TransportKind::Header => Self::from_header(req, name),
        }
    }
}

impl TokenSource for RequestTokenSource {
    fn receive(&mut self) -> Result<Option<String>, TransportError> {
        Ok(self.token.clone())
    }
}

/// Holds the most recent outbound token for a request. Last write wins.
#[derive(Debug, Clone, Default)]
pub struct Outbox {
    slot: Arc<Mutex<Option<IssuedToken>>>,
}

impl Outbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&self, token: IssuedToken) {
        *self.slot.lock() = Some(token);
    }

    pub fn take(&self) -> Option<IssuedToken> {
        self.slot.lock().take()
    }

    pub fn peek(&self) -> Option<IssuedToken> {
        self.slot.lock().clone()
    }

    pub fn sink(&self) -> OutboxSink {
        OutboxSink {
            outbox: self.clone(),
        }
    }
}

pub struct OutboxSink {
    outbox: Outbox,
}

impl TokenSink for OutboxSink {
    fn send(&mut self, token: &IssuedToken) -> Result<(), TransportError> {
        self.outbox.put(token.clone());
        Ok(())
    }
}

/// Cookie carrying `token`; the expired marker becomes a removal cookie.
pub fn session_cookie(name: &str, token: &IssuedToken) -> Cookie<'static> {
    let builder = Cookie::build(name.to_owned(), token.value.clone())
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax);

    let builder = if token.is_expired_marker() {
        builder
            .max_age(CookieDuration::ZERO)
            .expires(OffsetDateTime::UNIX_EPOCH)
    } else {
        match OffsetDateTime::from_unix_timestamp(token.expires_at) {
            Ok(at) => builder.expires(at),
            Err(_) => builder,
        }
    };

    builder.finish()
}

/// Header pair carrying `token`; empty value for the expired marker.
pub fn session_header(
    name: &str,
    token: &IssuedToken,
) -> Result<(HeaderName, HeaderValue), TransportError> {
    let name = HeaderName::from_bytes(name.as_bytes())
        .map_err(|e| TransportError::Failed(format!("invalid header name: {e}")))?;
    let value = HeaderValue::from_str(&token.value)
        .map_err(|e| TransportError::Failed(format!("invalid header value: {e}")))?;
    Ok((name, value))
}

#[cfg(test)]
mod tests {
    use actix_web::test::TestRequest;

    use super::*;

    fn token(value: &str, expires_at: i64) -> IssuedToken {
        IssuedToken {
            value: value.to_string(),
            expires_at,
        }
    }

    #[test]
    fn closures_are_sources_and_sinks() {
        let mut seen = Vec::new();
        {
            let mut sink = sink_fn(|t| {
                seen.push(t.value.clone());
                Ok(())
            });
            sink.send(&token("abc", 1)).unwrap();
        }
        assert_eq!(seen, vec!["abc".to_string()]);

        let mut source = source_fn(|| Ok(Some("t".into())));
        assert_eq!(source.receive().unwrap().as_deref(), Some("t"));
    }

    #[test]
    fn request_source_reads_cookie_and_header() {
        let req = TestRequest::default()
            .cookie(Cookie::new("X-Access-Token", "from-cookie"))
            .insert_header(("X-Access-Token", " from-header "))
            .to_http_request();

        let mut cookie = RequestTokenSource::from_request(&req, "X-Access-Token", TransportKind::Cookie);
        let mut header = RequestTokenSource::from_request(&req, "X-Access-Token", TransportKind::Header);

        assert_eq!(cookie.receive().unwrap().as_deref(), Some("from-cookie"));
        assert_eq!(header.receive().unwrap().as_deref(), Some("from-header"));
    }

    #[test]
    fn empty_inbound_token_counts_as_absent() {
        let mut source = RequestTokenSource::new(Some(String::new()));
        assert_eq!(source.receive().unwrap(), None);
    }

    #[test]
    fn outbox_keeps_last_token() {
        let outbox = Outbox::new();
        let mut sink = outbox.sink();
        sink.send(&token("first", 1)).unwrap();
        sink.send(&token("second", 2)).unwrap();

        assert_eq!(outbox.peek(), Some(token("second", 2)));
        assert_eq!(outbox.take(), Some(token("second", 2)));
        assert_eq!(outbox.take(), None);
    }

    #[test]
    fn cookie_expires_with_token() {
        let cookie = session_cookie("X-Access-Token", &token("abc", 1_700_000_900));

        assert_eq!(cookie.name(), "X-Access-Token");
        assert_eq!(cookie.value(), "abc");
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(
            cookie.expires_datetime().map(|at| at.unix_timestamp()),
            Some(1_700_000_900)
        );
    }

    #[test]
    fn expired_marker_builds_removal_cookie() {
        let cookie = session_cookie("X-Access-Token", &IssuedToken::expired());

        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.max_age(), Some(CookieDuration::ZERO));
    }

    #[test]
    fn header_pair_rejects_bad_names() {
        let (name, value) = session_header("X-Access-Token", &token("abc", 1)).unwrap();
        assert_eq!(name.as_str(), "x-access-token");
        assert_eq!(value, "abc");

        assert!(session_header("bad header", &token("abc", 1)).is_err());
    }
}
