pub mod memtable;
pub mod util;

pub use memtable::{Entry, SkipList, SkipListOptions};
pub use util::{Result, Slice, Status};
