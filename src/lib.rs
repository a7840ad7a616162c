//! Tubestash Library
//!
//! This library saves videos into a rotating set of remote YouTube playlists.
//! It owns the whole enqueue path: obtaining and caching a bearer token,
//! discovering (or creating) the current target playlist, rotating to the next
//! numbered playlist once the current one is full, detecting quota exhaustion,
//! and submitting batches of videos concurrently.
//!
//! # Modules
//!
//! - `api` - HTTP handlers for the local authorization callback server
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration management and environment variables
//! - `error` - Error taxonomy shared by the core components
//! - `management` - Session state, credentials and local persistence
//! - `server` - Local HTTP server for the OAuth redirect
//! - `types` - Data structures and wire types
//! - `utils` - Utility functions and helpers
//! - `youtube` - YouTube Data API client and playlist orchestration
//!
//! # Example
//!
//! ```
//! use tubestash::{config, cli};
//!
//! #[tokio::main]
//! async fn main() {
//!     config::load_env().await.ok();
//!     cli::save().await;
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod management;
pub mod server;
pub mod types;
pub mod utils;
pub mod youtube;

/// Prints an informational message with a blue bullet point.
///
/// # Example
///
/// ```
/// info!("Resolving target playlist...");
/// info!("Found {} pending videos", count);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// # Example
///
/// ```
/// success!("Authentication completed successfully");
/// success!("Saved {} videos", count);
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Only the binary uses this macro. Library code reports failures through its
/// return values and never terminates the process.
///
/// # Example
///
/// ```
/// error!("Failed to load configuration");
/// // Program exits here - code after this will not execute
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// Used for recoverable issues and for notices the user must not miss, such as
/// the quota halt.
///
/// # Example
///
/// ```
/// warning!("Playlist {} is full, rotating", name);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
