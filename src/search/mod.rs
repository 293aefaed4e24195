//! Cache-aside search orchestration.

mod builder;
mod service;
pub mod single_flight;

pub use builder::SearchServiceBuilder;
pub use service::SearchService;
