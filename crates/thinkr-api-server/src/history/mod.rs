pub mod entry;
pub mod store;

pub use entry::{EntryBody, HistoryEntry, Sender};
pub use store::FileHistoryStore;
