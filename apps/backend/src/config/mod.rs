pub mod session;
pub mod slack;

pub use session::SessionOptions;
pub use slack::SlackSettings;
