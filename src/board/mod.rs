//! Pure derivations over the announcement collection.
//!
//! Nothing in here touches storage or rendering: the portal pages and the
//! JSON API both call these with a snapshot from the store.

pub mod feed;
pub mod stats;

pub use feed::{admin_feed, empty_feed_hint, student_feed, CategoryFilter, SortOrder, StudentQuery};
pub use stats::{CountUp, Stats};
