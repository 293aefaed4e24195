//! Public types for the imgcache API.

mod image;
mod query;

pub use image::{ImageRecord, SearchResult};
pub use query::{
    DEFAULT_PAGE, DEFAULT_PER_PAGE, DEFAULT_QUERY, MAX_QUERY_CHARS, RawParam, RawSearchParams,
    SearchQuery,
};
