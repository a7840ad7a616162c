mod auth;
mod queue;
mod session;
pub mod store;

pub use auth::CredentialProvider;
pub use queue::PendingQueue;
pub use session::Session;
pub use store::FileStore;
pub use store::KeyValueStore;
pub use store::MemoryStore;
