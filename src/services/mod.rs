pub mod catalog;
pub mod movie_search;
pub mod providers;
pub mod ranking;
pub mod watch_list;

pub use catalog::AggregationCache;
pub use movie_search::{MovieSearchService, SearchMode};
pub use watch_list::WatchList;
