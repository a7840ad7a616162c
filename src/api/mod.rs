//! # API Module
//!
//! HTTP endpoints of the local server that receives the OAuth redirect.
//!
//! ## Endpoints
//!
//! - [`callback`] - Landing page of the redirect. The implicit grant returns the
//!   token in the URL fragment, which browsers never send to a server, so this
//!   page relays the fragment to [`token`] as a query string.
//! - [`token`] - Validates the relayed parameters and publishes the token (or
//!   the failure) to the waiting authorization flow.
//! - [`health`] - Application status, version and the state of the flow.
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! use tubestash::server::{bind, router};
//!
//! let listener = bind("127.0.0.1:8745").await?;
//! axum::serve(listener, router(state)).await?;
//! ```

mod callback;
mod health;

pub use callback::callback;
pub use callback::token;
pub use health::health;
