pub mod adapter;
pub mod claims;
pub mod clock;
pub mod codec;
pub mod error;
pub mod handler;
pub mod transport;

pub use adapter::{JwtSession, SessionStatus};
pub use claims::SessionClaims;
pub use clock::{Clock, FixedClock, SystemClock};
pub use codec::{DecodeResult, TokenCodec};
pub use error::{DecodeFailure, SessionError, TransportError};
pub use handler::SessionHandler;
pub use transport::{
    sink_fn, source_fn, IssuedToken, Outbox, RequestTokenSource, TokenSink, TokenSource,
};
