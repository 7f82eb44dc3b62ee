pub mod blob;
pub mod error;
pub mod memory;
pub mod redb;
pub mod traits;

pub use blob::{BlobUploader, MemoryBlobUploader};
pub use error::StoreError;
pub use memory::MemoryStore;
pub use redb::RedbStore;
pub use traits::ObjectStore;
