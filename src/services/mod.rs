// Service exports
pub mod bridge;
pub mod store;

pub use bridge::{BridgeError, Recommender, ScriptBridge};
pub use store::{RecordStore, StoreError};
