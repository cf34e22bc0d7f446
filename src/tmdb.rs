use std::sync::{Arc, RwLock};

use serde::Deserialize;

use crate::media::{ApiError, Credits, Genre, MovieDetail, MovieId, MovieSummary, Person, PersonId};
use crate::settings::AppSettings;

#[derive(Debug, Clone, Deserialize)]
pub struct Video {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub site: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub name: String,
}

fn default_total_pages() -> u32 {
    1
}

/// One page of a list endpoint. `total_pages` falls back to 1 when the
/// API omits it.
#[derive(Debug, Clone, Deserialize)]
pub struct MoviePage {
    #[serde(default)]
    pub results: Vec<MovieSummary>,
    #[serde(default = "default_total_pages")]
    pub total_pages: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReviewPage {
    #[serde(default)]
    pub results: Vec<crate::media::Review>,
    #[serde(default)]
    pub total_results: u32,
}

#[derive(Debug, Clone, Deserialize)]
struct VideosResponse {
    #[serde(default)]
    results: Vec<Video>,
}

#[derive(Debug, Clone, Deserialize)]
struct GenreListResponse {
    genres: Vec<Genre>,
}

#[derive(Debug, Clone, Deserialize)]
struct PersonCreditsResponse {
    #[serde(default)]
    cast: Vec<MovieSummary>,
}

#[derive(Clone, Copy)]
pub enum ImageSize {
    /// w92 — suggestion thumbnails and company logos.
    Thumb,
    /// w185 — cast portraits and person profiles.
    Profile,
    /// w342 — the detail modal poster.
    Poster,
    /// w500 — grid cards.
    Grid,
}

/// First video that is both hosted on YouTube and typed as a trailer;
/// teasers, clips and off-platform videos never qualify.
pub fn select_trailer(videos: &[Video]) -> Option<&Video> {
    videos
        .iter()
        .find(|video| video.site == "YouTube" && video.kind == "Trailer")
}

pub async fn fetch_image_bytes(url: String) -> Result<Vec<u8>, String> {
    reqwest::get(&url)
        .await
        .map_err(|e| e.to_string())?
        .error_for_status()
        .map_err(|e| e.to_string())?
        .bytes()
        .await
        .map(|b| b.to_vec())
        .map_err(|e| e.to_string())
}

#[derive(Clone)]
pub struct TmdbClient {
    api_key: String,
    base_url: String,
    image_base_url: String,
    language: String,
    http_client: Arc<reqwest::Client>,
    // The genre reference list is the one memoized response: every
    // consumer (filter bar, each detail layer) reads through this
    // instead of keeping its own copy. List endpoints are never cached.
    genre_cache: Arc<RwLock<Option<Vec<Genre>>>>,
}

impl TmdbClient {
    pub fn new(api_key: String, language: String) -> Self {
        Self {
            api_key,
            base_url: String::from("https://api.themoviedb.org/3"),
            image_base_url: String::from("https://image.tmdb.org/t/p"),
            language,
            http_client: Arc::new(reqwest::Client::new()),
            genre_cache: Arc::new(RwLock::new(None)),
        }
    }

    pub fn from_settings(settings: &AppSettings) -> Self {
        let language = if settings.language.is_empty() {
            String::from("en-US")
        } else {
            settings.language.clone()
        };
        Self::new(settings.api_key.clone(), language)
    }

    pub fn image_url(&self, path: &str, size: ImageSize) -> String {
        let size_path = match size {
            ImageSize::Thumb => "w92",
            ImageSize::Profile => "w185",
            ImageSize::Poster => "w342",
            ImageSize::Grid => "w500",
        };
        format!("{}/{}{}", self.image_base_url, size_path, path)
    }

    pub fn trailer_thumbnail_url(&self, key: &str) -> String {
        format!("https://img.youtube.com/vi/{}/hqdefault.jpg", key)
    }

    pub fn trailer_watch_url(&self, key: &str) -> String {
        format!("https://www.youtube.com/watch?v={}", key)
    }

    fn build_url(&self, endpoint: &str) -> String {
        format!(
            "{}{}?api_key={}&language={}",
            self.base_url, endpoint, self.api_key, self.language
        )
    }

    fn build_url_with_params(&self, endpoint: &str, params: &str) -> String {
        format!("{}&{}", self.build_url(endpoint), params)
    }

    async fn fetch_response(&self, url: &str) -> Result<reqwest::Response, ApiError> {
        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        match response.status().as_u16() {
            401 => Err(ApiError::Unauthorized),
            429 => Err(ApiError::RateLimit),
            s if s >= 400 => Err(ApiError::Network(format!("HTTP error: {}", s))),
            _ => Ok(response),
        }
    }

    async fn fetch_json<T: for<'de> Deserialize<'de>>(&self, url: &str) -> Result<T, ApiError> {
        self.fetch_response(url)
            .await?
            .json()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))
    }

    pub async fn trending(&self, page: u32) -> Result<MoviePage, ApiError> {
        let url = self.build_url_with_params("/trending/movie/week", &format!("page={}", page));
        self.fetch_json(&url).await
    }

    pub async fn now_playing(&self, page: u32) -> Result<MoviePage, ApiError> {
        let url = self.build_url_with_params("/movie/now_playing", &format!("page={}", page));
        self.fetch_json(&url).await
    }

    pub async fn upcoming(&self, page: u32) -> Result<MoviePage, ApiError> {
        let url = self.build_url_with_params("/movie/upcoming", &format!("page={}", page));
        self.fetch_json(&url).await
    }

    pub async fn top_rated(&self, page: u32) -> Result<MoviePage, ApiError> {
        let url = self.build_url_with_params("/movie/top_rated", &format!("page={}", page));
        self.fetch_json(&url).await
    }

    pub async fn search_movies(&self, query: &str, page: u32) -> Result<MoviePage, ApiError> {
        let url = self.build_url_with_params(
            "/search/movie",
            &format!("query={}&page={}", urlencoding::encode(query), page),
        );
        self.fetch_json(&url).await
    }

    /// Discover by genre and/or release year. Unset halves are passed
    /// through empty, which TMDB treats as "no constraint" — an empty
    /// filter is deliberately an all-movies query.
    pub async fn discover_movies(
        &self,
        genre_id: Option<u64>,
        year: &str,
        page: u32,
    ) -> Result<MoviePage, ApiError> {
        let genre = genre_id.map(|id| id.to_string()).unwrap_or_default();
        let url = self.build_url_with_params(
            "/discover/movie",
            &format!(
                "with_genres={}&primary_release_year={}&page={}",
                genre,
                urlencoding::encode(year),
                page
            ),
        );
        self.fetch_json(&url).await
    }

    pub async fn genres(&self) -> Result<Vec<Genre>, ApiError> {
        if let Some(cached) = self.genre_cache.read().ok().and_then(|g| g.clone()) {
            return Ok(cached);
        }
        let response: GenreListResponse = self.fetch_json(&self.build_url("/genre/movie/list")).await?;
        if let Ok(mut slot) = self.genre_cache.write() {
            *slot = Some(response.genres.clone());
        }
        Ok(response.genres)
    }

    pub async fn movie_trailer(&self, movie_id: MovieId) -> Result<Option<Video>, ApiError> {
        let url = self.build_url(&format!("/movie/{}/videos", movie_id));
        let response: VideosResponse = self.fetch_json(&url).await?;
        Ok(select_trailer(&response.results).cloned())
    }

    pub async fn movie_reviews(&self, movie_id: MovieId) -> Result<ReviewPage, ApiError> {
        let url = self.build_url(&format!("/movie/{}/reviews", movie_id));
        self.fetch_json(&url).await
    }

    pub async fn movie_credits(&self, movie_id: MovieId) -> Result<Credits, ApiError> {
        let url = self.build_url(&format!("/movie/{}/credits", movie_id));
        self.fetch_json(&url).await
    }

    pub async fn movie_details(&self, movie_id: MovieId) -> Result<MovieDetail, ApiError> {
        let url = self.build_url(&format!("/movie/{}", movie_id));
        self.fetch_json(&url).await
    }

    pub async fn person_details(&self, person_id: PersonId) -> Result<Person, ApiError> {
        let url = self.build_url(&format!("/person/{}", person_id));
        self.fetch_json(&url).await
    }

    pub async fn person_movie_credits(
        &self,
        person_id: PersonId,
    ) -> Result<Vec<MovieSummary>, ApiError> {
        let url = self.build_url(&format!("/person/{}/movie_credits", person_id));
        let response: PersonCreditsResponse = self.fetch_json(&url).await?;
        Ok(response.cast)
    }

    pub async fn similar_movies(&self, movie_id: MovieId, page: u32) -> Result<MoviePage, ApiError> {
        let url = self.build_url_with_params(
            &format!("/movie/{}/similar", movie_id),
            &format!("page={}", page),
        );
        self.fetch_json(&url).await
    }

    pub async fn recommended_movies(
        &self,
        movie_id: MovieId,
        page: u32,
    ) -> Result<MoviePage, ApiError> {
        let url = self.build_url_with_params(
            &format!("/movie/{}/recommendations", movie_id),
            &format!("page={}", page),
        );
        self.fetch_json(&url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> TmdbClient {
        TmdbClient::new(String::from("test-key"), String::from("en-US"))
    }

    fn video(site: &str, kind: &str, key: &str) -> Video {
        Video {
            key: String::from(key),
            site: String::from(site),
            kind: String::from(kind),
            name: String::new(),
        }
    }

    #[test]
    fn trailer_selection_takes_first_youtube_trailer() {
        let videos = vec![
            video("YouTube", "Teaser", "t1"),
            video("Vimeo", "Trailer", "v1"),
            video("YouTube", "Trailer", "yt1"),
            video("YouTube", "Trailer", "yt2"),
        ];
        assert_eq!(select_trailer(&videos).map(|v| v.key.as_str()), Some("yt1"));
    }

    #[test]
    fn trailer_selection_handles_no_match() {
        let videos = vec![video("YouTube", "Clip", "c1"), video("Vimeo", "Trailer", "v1")];
        assert!(select_trailer(&videos).is_none());
        assert!(select_trailer(&[]).is_none());
    }

    #[test]
    fn movie_page_defaults_missing_total_pages_to_one() {
        let page: MoviePage = serde_json::from_str(r#"{"results": []}"#).unwrap();
        assert_eq!(page.total_pages, 1);

        let page: MoviePage =
            serde_json::from_str(r#"{"results": [], "total_pages": 42}"#).unwrap();
        assert_eq!(page.total_pages, 42);
    }

    #[test]
    fn movie_summary_parses_list_entry() {
        let json = r#"{
            "results": [{
                "id": 603,
                "title": "The Matrix",
                "poster_path": "/matrix.jpg",
                "vote_average": 8.2,
                "vote_count": 21000,
                "release_date": "1999-03-30",
                "original_language": "en",
                "genre_ids": [28, 878]
            }],
            "total_pages": 3
        }"#;
        let page: MoviePage = serde_json::from_str(json).unwrap();
        let movie = &page.results[0];
        assert_eq!(movie.id, 603);
        assert_eq!(movie.title, "The Matrix");
        assert_eq!(movie.genre_ids, vec![28, 878]);
        assert_eq!(movie.poster_path.as_deref(), Some("/matrix.jpg"));
    }

    #[test]
    fn review_page_parses_optional_author_rating() {
        let json = r#"{
            "results": [
                {"id": "r1", "author": "a", "content": "fine", "author_details": {"rating": 7.5}},
                {"id": "r2", "author": "b", "content": "meh", "author_details": {}}
            ],
            "total_results": 2
        }"#;
        let page: ReviewPage = serde_json::from_str(json).unwrap();
        assert_eq!(page.total_results, 2);
        assert_eq!(page.results[0].author_details.rating, Some(7.5));
        assert_eq!(page.results[1].author_details.rating, None);
    }

    #[test]
    fn credits_parse_cast_and_crew() {
        let json = r#"{
            "cast": [{"id": 1, "name": "Keanu Reeves", "character": "Neo", "order": 0}],
            "crew": [{"id": 2, "name": "Lana Wachowski", "job": "Director"}]
        }"#;
        let credits: crate::media::Credits = serde_json::from_str(json).unwrap();
        assert_eq!(credits.cast[0].character, "Neo");
        assert_eq!(credits.crew[0].job, "Director");
        assert!(credits.crew[0].profile_path.is_none());
    }

    #[test]
    fn image_urls_pick_the_right_size_bucket() {
        let client = client();
        assert_eq!(
            client.image_url("/p.jpg", ImageSize::Grid),
            "https://image.tmdb.org/t/p/w500/p.jpg"
        );
        assert_eq!(
            client.image_url("/p.jpg", ImageSize::Thumb),
            "https://image.tmdb.org/t/p/w92/p.jpg"
        );
        assert_eq!(
            client.trailer_thumbnail_url("abc123"),
            "https://img.youtube.com/vi/abc123/hqdefault.jpg"
        );
    }
}
