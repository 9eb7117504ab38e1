pub mod sort;

pub use sort::{SortExecutor, SortField, SortKey, SortOrder};
