// Content Cache Module
//
// Named content is loaded once per canonical key, shared through
// reference counting, and destroyed by the loader that created it.

pub mod entity;
pub mod key;
pub mod loader;
pub mod manager;
pub mod param;
pub mod store;

pub use entity::{Content, ContentState};
pub use loader::{ContentContainer, ContentLoader, ContentLoaderBase, ContentStore};
pub use manager::ContentManager;
pub use param::{require_param, ContentParam};
pub use store::{ContentLoaderMapStore, ContentStats};
