pub mod category;
pub mod movie;
pub mod watch_list;

pub use category::Category;
pub use movie::{
    Genre, MovieDetail, MovieId, MovieListResponse, MovieSummary, ResultSource, SearchResult,
};
pub use watch_list::WatchListEntry;
