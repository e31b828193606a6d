//! Domain Layer

pub mod object_key;
pub mod storage;

pub use object_key::ObjectKey;
pub use storage::ObjectStorage;
