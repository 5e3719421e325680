pub mod csv_source;
pub mod page_source;

pub use csv_source::{ColumnKind, CsvSource};
pub use page_source::{Page, PageMetadata, PageRequest, PageSource, PaginatedResponse, StaticPageSource};
