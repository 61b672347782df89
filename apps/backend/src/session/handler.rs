use super::codec::DecodeResult;
use super::error::SessionError;
use super::transport::IssuedToken;

/// The session save-handler contract.
///
/// A handler is opened and closed around each request, reads session state
/// out of whatever the client presented, and writes it back at the end. The
/// token adapter implements it with no server-side storage at all.
pub trait SessionHandler {
    fn open(&mut self) -> Result<(), SessionError>;

    /// End of request. Flushes pending state.
    fn close(&mut self) -> Result<(), SessionError>;

    /// Decode a presented token. Never fails; failures come back as
    /// [`DecodeResult::Invalid`].
    fn read(&mut self, token: &str) -> DecodeResult;

    /// Persist the current state, returning what was handed to the client.
    fn write(&mut self) -> Result<IssuedToken, SessionError>;

    fn destroy(&mut self) -> Result<(), SessionError>;

    /// Expire stale sessions older than `max_lifetime` seconds. Returns how
    /// many were removed.
    fn gc(&mut self, max_lifetime: i64) -> usize;

    /// Fresh session identifier.
    fn create_sid(&self) -> String;
}
