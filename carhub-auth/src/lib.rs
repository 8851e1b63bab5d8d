//! carhub-auth: session feed for CarHub.
//!
//! The catalog never reads an ambient "current user". It is handed a
//! [`watch::Receiver<SessionState>`](tokio::sync::watch::Receiver) from an
//! [`AuthService`] and reacts to [`SessionEvent`]s.

pub mod error;
pub mod memory;
pub mod options;
pub mod registration;
pub mod session;

pub use error::{AuthError, AuthResult};
pub use memory::MemoryAuth;
pub use options::AuthOptions;
pub use registration::{Registration, RegistrationError};
pub use session::{AuthService, SessionEvent, SessionState, SessionUser};
