// Configuration loading

pub mod error;
pub mod session;
pub mod settings;
pub mod store;

pub use error::ConfigError;
pub use session::{resolve_route, AuthSession, Route, SESSION_KEY};
pub use settings::Settings;
pub use store::{FileStore, KeyValueStore, MemoryStore};
