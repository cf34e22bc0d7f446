use std::collections::{HashMap, HashSet};

use iced::widget::image::Handle;
use iced::Color;
use serde::Deserialize;
use thiserror::Error;

use crate::pagination::PageState;
use crate::tmdb::Video;

pub const BACKGROUND_DARK: Color = Color::from_rgb(0.051, 0.051, 0.071);
pub const SURFACE_GRAY: Color = Color::from_rgb(0.102, 0.102, 0.129);
pub const ACCENT_BLUE: Color = Color::from_rgb(0.231, 0.510, 0.965);
pub const TEXT_WHITE: Color = Color::from_rgb(1.0, 1.0, 1.0);
pub const TEXT_GRAY: Color = Color::from_rgb(0.702, 0.702, 0.702);
pub const STAR_YELLOW: Color = Color::from_rgb(0.980, 0.800, 0.082);

pub type MovieId = u64;
pub type PersonId = u64;

/// Which dataset the top-level grid is showing. `Tabs` hands the main
/// area over to the tabbed browse view, which paginates on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Tabs,
    Trending,
    Search,
    Filter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BrowseCategory {
    #[default]
    Trending,
    NowPlaying,
    Upcoming,
    TopRated,
}

impl BrowseCategory {
    pub const ALL: [BrowseCategory; 4] = [
        BrowseCategory::Trending,
        BrowseCategory::NowPlaying,
        BrowseCategory::Upcoming,
        BrowseCategory::TopRated,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            BrowseCategory::Trending => "Trending",
            BrowseCategory::NowPlaying => "Now Playing",
            BrowseCategory::Upcoming => "Upcoming",
            BrowseCategory::TopRated => "Top Rated",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetailTab {
    #[default]
    Details,
    Trailer,
    Reviews,
    CastCrew,
    Related,
}

impl DetailTab {
    pub const ALL: [DetailTab; 5] = [
        DetailTab::Details,
        DetailTab::Trailer,
        DetailTab::Reviews,
        DetailTab::CastCrew,
        DetailTab::Related,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            DetailTab::Details => "Details",
            DetailTab::Trailer => "Trailer",
            DetailTab::Reviews => "Reviews",
            DetailTab::CastCrew => "Cast & Crew",
            DetailTab::Related => "Related",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RelatedSource {
    #[default]
    Recommended,
    Similar,
}

impl RelatedSource {
    pub fn label(&self) -> &'static str {
        match self {
            RelatedSource::Recommended => "Recommended",
            RelatedSource::Similar => "Similar",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MovieSummary {
    pub id: MovieId,
    #[serde(default)]
    pub title: String,
    pub poster_path: Option<String>,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub vote_average: f32,
    #[serde(default)]
    pub vote_count: u32,
    pub release_date: Option<String>,
    pub original_language: Option<String>,
    #[serde(default)]
    pub genre_ids: Vec<u64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Genre {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProductionCountry {
    #[serde(default)]
    pub iso_3166_1: String,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProductionCompany {
    pub id: u64,
    pub name: String,
    pub logo_path: Option<String>,
}

/// Extended fields only the per-movie details endpoint returns. Budget
/// and revenue come back as 0 when TMDB does not know them.
#[derive(Debug, Clone, Deserialize)]
pub struct MovieDetail {
    pub id: MovieId,
    pub runtime: Option<u32>,
    #[serde(default)]
    pub budget: u64,
    #[serde(default)]
    pub revenue: u64,
    pub tagline: Option<String>,
    pub homepage: Option<String>,
    #[serde(default)]
    pub production_countries: Vec<ProductionCountry>,
    #[serde(default)]
    pub production_companies: Vec<ProductionCompany>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReviewAuthorDetails {
    pub rating: Option<f32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Review {
    pub id: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub author_details: ReviewAuthorDetails,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CastMember {
    pub id: PersonId,
    pub name: String,
    #[serde(default)]
    pub character: String,
    pub profile_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CrewMember {
    pub id: PersonId,
    pub name: String,
    #[serde(default)]
    pub job: String,
    pub profile_path: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Credits {
    #[serde(default)]
    pub cast: Vec<CastMember>,
    #[serde(default)]
    pub crew: Vec<CrewMember>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Person {
    pub id: PersonId,
    pub name: String,
    #[serde(default)]
    pub biography: String,
    pub birthday: Option<String>,
    pub place_of_birth: Option<String>,
    #[serde(default)]
    pub known_for_department: String,
    pub profile_path: Option<String>,
}

/// One layer of the detail modal stack. Opening a related movie pushes
/// a fresh layer; closing pops only the top one. Everything fetched for
/// a layer is owned by it and discarded with it.
#[derive(Debug, Clone)]
pub struct DetailState {
    pub movie: MovieSummary,
    pub tab: DetailTab,
    pub trailer: Option<Video>,
    pub genre_map: HashMap<u64, String>,
    pub reviews: Vec<Review>,
    pub total_reviews: u32,
    pub show_all_reviews: bool,
    pub expanded_reviews: HashSet<String>,
    pub credits: Option<Credits>,
    pub detail: Option<MovieDetail>,
    pub related_source: RelatedSource,
    pub recommended: Vec<MovieSummary>,
    pub recommended_pages: PageState,
    pub similar: Vec<MovieSummary>,
    pub similar_pages: PageState,
}

impl DetailState {
    pub fn new(movie: MovieSummary) -> Self {
        Self {
            movie,
            tab: DetailTab::default(),
            trailer: None,
            genre_map: HashMap::new(),
            reviews: Vec::new(),
            total_reviews: 0,
            show_all_reviews: false,
            expanded_reviews: HashSet::new(),
            credits: None,
            detail: None,
            related_source: RelatedSource::default(),
            recommended: Vec::new(),
            recommended_pages: PageState::default(),
            similar: Vec::new(),
            similar_pages: PageState::default(),
        }
    }

    pub fn related_movies(&self) -> &[MovieSummary] {
        match self.related_source {
            RelatedSource::Recommended => &self.recommended,
            RelatedSource::Similar => &self.similar,
        }
    }

    pub fn related_pages(&self) -> &PageState {
        match self.related_source {
            RelatedSource::Recommended => &self.recommended_pages,
            RelatedSource::Similar => &self.similar_pages,
        }
    }

    pub fn related_pages_mut(&mut self) -> &mut PageState {
        match self.related_source {
            RelatedSource::Recommended => &mut self.recommended_pages,
            RelatedSource::Similar => &mut self.similar_pages,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PersonViewState {
    pub person_id: PersonId,
    pub person: Option<Person>,
    pub known_for: Vec<MovieSummary>,
}

impl PersonViewState {
    pub fn new(person_id: PersonId) -> Self {
        Self {
            person_id,
            person: None,
            known_for: Vec::new(),
        }
    }
}

/// The applied genre/year pair. Both halves pass through to the
/// discover endpoint even when unset, so an empty filter is an
/// all-movies query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSelection {
    pub genre_id: Option<u64>,
    pub year: String,
}

/// In-memory poster/still cache keyed by full URL. Pending entries stop
/// the same URL being downloaded twice while a request is in flight.
#[derive(Debug, Clone, Default)]
pub struct ImageCache {
    cache: HashMap<String, Handle>,
    pending: HashSet<String>,
}

impl ImageCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, url: &str) -> Option<&Handle> {
        self.cache.get(url)
    }

    pub fn insert(&mut self, url: String, handle: Handle) {
        self.pending.remove(&url);
        self.cache.insert(url, handle);
    }

    pub fn is_pending(&self, url: &str) -> bool {
        self.pending.contains(url)
    }

    pub fn mark_pending(&mut self, url: String) {
        self.pending.insert(url);
    }
}

#[derive(Debug, Clone, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),
    #[error("malformed response: {0}")]
    Parse(String),
    #[error("rate limited by the metadata service")]
    RateLimit,
    #[error("API key rejected")]
    Unauthorized,
}

#[derive(Debug, Clone)]
pub enum Message {
    Setup(crate::settings::SetupMessage),

    // top-level grid
    MoviesLoaded(Result<crate::tmdb::MoviePage, ApiError>),
    PageSelected(u32),
    MovieSelected(MovieSummary),

    // search bar
    SearchInputChanged(String),
    SearchSubmitted,
    SearchCleared,
    SuggestionSelected(MovieSummary),
    SuggestionsLoaded {
        query: String,
        result: Result<crate::tmdb::MoviePage, ApiError>,
    },

    // filter bar
    FilterToggled,
    FilterGenreSelected(Option<u64>),
    FilterYearChanged(String),
    FilterCleared,
    FilterGenresLoaded(Result<Vec<Genre>, ApiError>),

    // fires every 50ms while a debounce timer is pending
    DebounceTick,

    // tabbed browse
    BrowseCategorySelected(BrowseCategory),
    BrowsePageSelected(u32),
    BrowseLoaded {
        category: BrowseCategory,
        result: Result<crate::tmdb::MoviePage, ApiError>,
    },

    // detail modal stack
    DetailClosed,
    DetailTabSelected(DetailTab),
    DetailTrailerLoaded {
        movie_id: MovieId,
        result: Result<Option<Video>, ApiError>,
    },
    DetailGenresLoaded {
        movie_id: MovieId,
        result: Result<Vec<Genre>, ApiError>,
    },
    DetailReviewsLoaded {
        movie_id: MovieId,
        result: Result<crate::tmdb::ReviewPage, ApiError>,
    },
    DetailCreditsLoaded {
        movie_id: MovieId,
        result: Result<Credits, ApiError>,
    },
    DetailInfoLoaded {
        movie_id: MovieId,
        result: Result<MovieDetail, ApiError>,
    },
    RelatedSourceToggled(RelatedSource),
    RelatedPageSelected(u32),
    RelatedLoaded {
        movie_id: MovieId,
        source: RelatedSource,
        result: Result<crate::tmdb::MoviePage, ApiError>,
    },
    ReviewExpandToggled(String),
    AllReviewsToggled,

    // person modal
    CastMemberSelected(PersonId),
    PersonClosed,
    PersonLoaded {
        person_id: PersonId,
        result: Result<Person, ApiError>,
    },
    PersonCreditsLoaded {
        person_id: PersonId,
        result: Result<Vec<MovieSummary>, ApiError>,
    },

    // images
    LoadImage(String),
    ImageLoaded(String, Result<Handle, String>),
}
