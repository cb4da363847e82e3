use serde::{Deserialize, Serialize};

/// Curated movie lists exposed by the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovieList {
    Popular,
    TopRated,
    NowPlaying,
    Upcoming,
}

impl MovieList {
    pub fn path_segment(&self) -> &'static str {
        match self {
            MovieList::Popular => "popular",
            MovieList::TopRated => "top_rated",
            MovieList::NowPlaying => "now_playing",
            MovieList::Upcoming => "upcoming",
        }
    }
}

/// Sort orders accepted by the discover endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    PopularityDesc,
    RatingDesc,
    ReleaseDateDesc,
    TitleAsc,
}

impl SortOrder {
    pub fn as_param(&self) -> &'static str {
        match self {
            SortOrder::PopularityDesc => "popularity.desc",
            SortOrder::RatingDesc => "vote_average.desc",
            SortOrder::ReleaseDateDesc => "primary_release_date.desc",
            SortOrder::TitleAsc => "title.asc",
        }
    }
}

/// A catalog endpoint together with only the parameters it accepts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    MovieList(MovieList),
    Discover {
        sort: SortOrder,
        genre: Option<u32>,
    },
    Search {
        query: String,
        year: Option<i32>,
    },
    /// Titles the signed-in user has rated
    RatedMovies,
    Watchlist,
}

/// A single page request against one endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub endpoint: Endpoint,
    pub page: u32,
}

impl PageRequest {
    pub fn new(endpoint: Endpoint, page: u32) -> Self {
        Self { endpoint, page }
    }
}

/// Parameters a list screen is configured with
///
/// Changing any of these requires re-configuring the owning cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListQuery {
    Browse(MovieList),
    Discover { sort: SortOrder, genre: Option<u32> },
    Search(String),
    Watchlist,
    Rated,
}

impl ListQuery {
    pub fn endpoint(&self) -> Endpoint {
        match self {
            ListQuery::Browse(list) => Endpoint::MovieList(*list),
            ListQuery::Discover { sort, genre } => Endpoint::Discover {
                sort: *sort,
                genre: *genre,
            },
            ListQuery::Search(query) => Endpoint::Search {
                query: query.clone(),
                year: None,
            },
            ListQuery::Watchlist => Endpoint::Watchlist,
            ListQuery::Rated => Endpoint::RatedMovies,
        }
    }

    pub fn page(&self, page: u32) -> PageRequest {
        PageRequest::new(self.endpoint(), page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_order_params() {
        assert_eq!(SortOrder::PopularityDesc.as_param(), "popularity.desc");
        assert_eq!(SortOrder::RatingDesc.as_param(), "vote_average.desc");
        assert_eq!(
            SortOrder::ReleaseDateDesc.as_param(),
            "primary_release_date.desc"
        );
        assert_eq!(SortOrder::TitleAsc.as_param(), "title.asc");
    }

    #[test]
    fn test_movie_list_serde() {
        let list: MovieList = serde_json::from_str("\"top_rated\"").unwrap();
        assert_eq!(list, MovieList::TopRated);
        assert_eq!(list.path_segment(), "top_rated");
    }

    #[test]
    fn test_list_query_to_page_request() {
        let query = ListQuery::Search("Alien".to_string());
        let request = query.page(3);

        assert_eq!(request.page, 3);
        assert_eq!(
            request.endpoint,
            Endpoint::Search {
                query: "Alien".to_string(),
                year: None
            }
        );
    }
}
