//! Roomify engine: asynchronous decoding, progress timers and effect execution.
mod auth;
mod controller;
mod decode;
mod navigation;
mod progress;

pub use auth::{toggle_auth, AuthAction, AuthContext, AuthError, LocalAuth};
pub use controller::{CompletionCallback, IngestionController};
pub use decode::{DataUrlDecoder, DecodeError, Decoder};
pub use navigation::{LogNotifier, Navigator, Notifier, RouteIdGenerator};
pub use progress::{ProgressHandle, ProgressSimulator, MIN_PERIOD};
