pub mod entry;
pub mod skiplist;

pub use entry::Entry;
pub use skiplist::{SkipList, SkipListOptions};
