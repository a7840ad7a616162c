//! # CLI Module
//!
//! Command implementations behind the `tubestash` binary. Every command loads
//! what it needs, reports through the status macros and never returns errors:
//! fatal problems end the process with [`crate::error!`].
//!
//! ## Commands
//!
//! - [`auth`] - Runs the authorization flow and caches the token
//! - [`logout`] - Drops the cached token
//! - [`add`] - Queues the given videos and saves them right away
//! - [`save`] - Saves every pending video
//! - [`queue_add`], [`queue_list`], [`queue_remove`], [`queue_clear`] - Manage
//!   the pending queue
//!
//! ## Usage Patterns
//!
//! ```bash
//! tubestash auth                                   # Sign in once
//! tubestash add https://www.youtube.com/watch?v=dQw4w9WgXcQ
//! tubestash queue add https://youtu.be/dQw4w9WgXcQ # Collect for later
//! tubestash save                                   # Save everything pending
//! ```

mod auth;
mod context;
mod queue;
mod save;

pub use auth::auth;
pub use auth::logout;
pub use context::Context;
pub use queue::queue_add;
pub use queue::queue_clear;
pub use queue::queue_list;
pub use queue::queue_remove;
pub use save::add;
pub use save::save;
