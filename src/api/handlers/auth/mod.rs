//! Credential relay.
//!
//! Login and registration payloads carry the password encrypted under the
//! shared key. Handlers decrypt it, forward plaintext credentials to the
//! upstream auth API and translate the reply.
//!
//! ## Session cookie
//!
//! A successful login stores the upstream token in the `access_token` cookie
//! (`Path=/`, 7 days, `SameSite=Lax`, `Secure` in production). Nothing else is
//! persisted; failures never set a cookie.

mod error;
mod login;
mod register;
mod session;
mod state;
pub mod types;

pub use error::RelayError;
pub use login::{__path_login, login};
pub use register::{__path_register, register};
pub use session::{__path_logout, __path_session, logout, session};
pub use state::RelayState;
