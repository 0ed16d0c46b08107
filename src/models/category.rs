use serde::{Deserialize, Serialize};
use std::fmt::Display;

const ACTION_GENRE_ID: u32 = 28;
const COMEDY_GENRE_ID: u32 = 35;

/// One fixed named remote query whose results feed the aggregate catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Popular,
    NowPlaying,
    TopRated,
    Upcoming,
    Action,
    Comedy,
}

impl Category {
    /// Every category, in merge order. Earlier categories win on duplicate ids.
    pub const ALL: [Category; 6] = [
        Category::Popular,
        Category::NowPlaying,
        Category::TopRated,
        Category::Upcoming,
        Category::Action,
        Category::Comedy,
    ];

    /// Endpoint path relative to the API base URL
    pub fn path(&self) -> &'static str {
        match self {
            Category::Popular => "/movie/popular",
            Category::NowPlaying => "/movie/now_playing",
            Category::TopRated => "/movie/top_rated",
            Category::Upcoming => "/movie/upcoming",
            Category::Action | Category::Comedy => "/discover/movie",
        }
    }

    /// Genre filter for discover-backed categories
    pub fn genre_id(&self) -> Option<u32> {
        match self {
            Category::Action => Some(ACTION_GENRE_ID),
            Category::Comedy => Some(COMEDY_GENRE_ID),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Popular => "popular",
            Category::NowPlaying => "now_playing",
            Category::TopRated => "top_rated",
            Category::Upcoming => "upcoming",
            Category::Action => "action",
            Category::Comedy => "comedy",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
