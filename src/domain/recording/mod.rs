//! Recording entities and the collection they live in

pub mod collection;
pub mod id;
pub mod meta;

pub use collection::Collection;
pub use id::RecordingId;
pub use meta::RecordingMeta;
