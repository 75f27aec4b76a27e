pub mod cache;
pub mod remote;
pub mod traits;

pub use cache::{JsonFileCache, MemoryCache};
pub use remote::SheetsClient;
pub use traits::{RecordCache, SheetsApi};
