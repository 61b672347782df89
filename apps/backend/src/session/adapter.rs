//! Token-backed session adapter.
//!
//! All session state lives in a signed token held by the client. A request
//! starts by decoding whatever token it presented (or starting empty), may
//! mutate the claim set, and ends by signing the claims into a new token.
//!
//! State machine:
//!
//! ```text
//! Unstarted -> Active (fresh | restored) -> Closed
//!                 |
//!                 +-> Destroyed
//! ```

use std::sync::Arc;

use rand::RngCore;
use serde_json::Value;
use tracing::{debug, trace};

use super::claims::{SessionClaims, EXP, IAT, ISS, JTI, NBF};
use super::clock::{Clock, SystemClock};
use super::codec::{DecodeResult, TokenCodec};
use super::error::{DecodeFailure, SessionError};
use super::handler::SessionHandler;
use super::transport::{IssuedToken, TokenSink, TokenSource};
use crate::logging::redact::Redacted;
use crate::logging::security;
use crate::state::session_config::SessionConfig;

/// Bytes of randomness in a session id (hex-encoded to twice as many chars).
pub const SID_BYTES: usize = 22;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Unstarted,
    Active,
    Closed,
    Destroyed,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Unstarted => "unstarted",
            SessionStatus::Active => "active",
            SessionStatus::Closed => "closed",
            SessionStatus::Destroyed => "destroyed",
        }
    }
}

pub struct JwtSession {
    config: Arc<SessionConfig>,
    codec: TokenCodec,
    clock: Arc<dyn Clock>,
    source: Box<dyn TokenSource>,
    sink: Box<dyn TokenSink>,
    claims: SessionClaims,
    id: Option<String>,
    status: SessionStatus,
    restored: bool,
    dirty: bool,
    last_error: Option<DecodeFailure>,
}

impl JwtSession {
    pub fn new(
        config: Arc<SessionConfig>,
        source: impl TokenSource + 'static,
        sink: impl TokenSink + 'static,
    ) -> Self {
        Self {
            codec: TokenCodec::new(&config),
            config,
            clock: Arc::new(SystemClock),
            source: Box::new(source),
            sink: Box::new(sink),
            claims: SessionClaims::new(),
            id: None,
            status: SessionStatus::Unstarted,
            restored: false,
            dirty: false,
            last_error: None,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replace where the inbound token comes from.
    pub fn register_token_source(&mut self, source: impl TokenSource + 'static) -> &mut Self {
        self.source = Box::new(source);
        self
    }

    /// Replace where outbound tokens go.
    pub fn register_token_sink(&mut self, sink: impl TokenSink + 'static) -> &mut Self {
        self.sink = Box::new(sink);
        self
    }

    /// Start the session.
    ///
    /// Returns `Ok(false)` without touching anything unless the session is
    /// still unstarted. Otherwise pulls the inbound token from the source,
    /// adopts its claims when it validates (a failure is recorded and the
    /// session starts empty), and immediately issues a fresh token so even a
    /// brand-new session hands the client something to carry.
    pub fn start(&mut self) -> Result<bool, SessionError> {
        if self.status != SessionStatus::Unstarted {
            return Ok(false);
        }

        let inbound = self.source.receive()?;
        self.open()?;

        match inbound {
            Some(token) if !token.is_empty() => {
                if let DecodeResult::Valid(claims) = self.read(&token) {
                    self.id = claims.jti().map(str::to_owned);
                    self.claims = claims;
                    self.restored = true;
                    debug!(session_id = %Redacted(self.id.as_deref().unwrap_or("")), "session restored from token");
                }
            }
            _ => trace!("no inbound session token"),
        }

        self.status = SessionStatus::Active;
        self.write()?;
        Ok(true)
    }

    /// Issue a new token now, without waiting for the end of the request.
    pub fn regenerate(&mut self) -> Result<IssuedToken, SessionError> {
        self.write()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.claims.get(name)
    }

    pub fn insert(
        &mut self,
        name: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<Option<Value>, SessionError> {
        self.ensure_active()?;
        self.dirty = true;
        Ok(self.claims.insert(name, value))
    }

    pub fn remove(&mut self, name: &str) -> Result<Option<Value>, SessionError> {
        self.ensure_active()?;
        let previous = self.claims.remove(name);
        if previous.is_some() {
            self.dirty = true;
        }
        Ok(previous)
    }

    pub fn claims(&self) -> &SessionClaims {
        &self.claims
    }

    /// Session identity: the `jti` of the newest token.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    /// Whether the claims came from a valid inbound token.
    pub fn is_restored(&self) -> bool {
        self.restored
    }

    /// Claims were changed since the last token was issued.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn last_error(&self) -> Option<&DecodeFailure> {
        self.last_error.as_ref()
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    fn ensure_active(&self) -> Result<(), SessionError> {
        if self.status == SessionStatus::Active {
            Ok(())
        } else {
            Err(SessionError::NotActive)
        }
    }

    fn fresh_sid(&self) -> String {
        loop {
            let sid = self.create_sid();
            if self.id.as_deref() != Some(sid.as_str()) {
                return sid;
            }
        }
    }
}

impl SessionHandler for JwtSession {
    fn open(&mut self) -> Result<(), SessionError> {
        Ok(())
    }

    fn close(&mut self) -> Result<(), SessionError> {
        if self.status != SessionStatus::Active {
            return Ok(());
        }
        if self.dirty {
            self.write()?;
        }
        self.status = SessionStatus::Closed;
        Ok(())
    }

    fn read(&mut self, token: &str) -> DecodeResult {
        let result = self.codec.decode(token, self.clock.now());
        if let DecodeResult::Invalid(failure) = &result {
            security::session_token_rejected(failure);
            self.last_error = Some(failure.clone());
        }
        result
    }

    fn write(&mut self) -> Result<IssuedToken, SessionError> {
        self.ensure_active()?;

        let now = self.clock.now();
        let expires_at = now
            .checked_add(self.config.lifetime_seconds)
            .ok_or_else(|| SessionError::config("session lifetime overflows token expiry"))?;
        let jti = self.fresh_sid();

        self.claims.insert(JTI, jti.clone());
        self.claims.insert(IAT, now);
        self.claims.insert(NBF, now);
        self.claims.insert(EXP, expires_at);
        match &self.config.issuer {
            Some(iss) => {
                self.claims.insert(ISS, iss.clone());
            }
            None => {
                self.claims.remove(ISS);
            }
        }

        let issued = IssuedToken {
            value: self.codec.encode(&self.claims)?,
            expires_at,
        };
        self.sink.send(&issued)?;

        debug!(session_id = %Redacted(&jti), expires_at, "session token issued");
        self.id = Some(jti);
        self.dirty = false;
        Ok(issued)
    }

    fn destroy(&mut self) -> Result<(), SessionError> {
        self.ensure_active()?;

        self.sink.send(&IssuedToken::expired())?;
        security::session_destroyed(self.id.as_deref());

        self.claims.clear();
        self.id = None;
        self.dirty = false;
        self.status = SessionStatus::Destroyed;
        Ok(())
    }

    fn gc(&mut self, max_lifetime: i64) -> usize {
        trace!(max_lifetime, "nothing to collect; sessions live in client tokens");
        0
    }

    fn create_sid(&self) -> String {
        let mut bytes = [0u8; SID_BYTES];
        rand::rng().fill_bytes(&mut bytes);
        bytes.iter().map(|b| format!("{b:02x}")).collect()
    }
}
