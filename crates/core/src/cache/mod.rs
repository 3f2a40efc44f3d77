mod error;
mod keys;
mod traits;

pub use error::{CacheError, Result};
pub use keys::{biz_comment_count_key, FEED_EVENTS_CHANNEL};
pub use traits::CountCache;
