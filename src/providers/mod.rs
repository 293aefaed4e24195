//! Upstream image search providers.

pub mod traits;
#[cfg(feature = "unsplash")]
pub mod unsplash;

pub use traits::ImageSearchProvider;
#[cfg(feature = "unsplash")]
pub use unsplash::UnsplashClient;
