pub mod feed;
pub mod normalizer;
pub mod reading_time;
pub mod rich_text;
pub mod sources;
pub mod traits;
pub mod types;
pub mod utils;

pub use feed::FeedAggregator;
pub use normalizer::PostNormalizer;
pub use sources::CmsApiSource;
pub use traits::{ContentSource, Query};
pub use types::*;
