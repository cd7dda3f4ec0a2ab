pub mod list;
pub mod resume;

pub use list::{Entry, EntryId, EntryList};
pub use resume::*;
