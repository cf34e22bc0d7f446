use std::time::{Duration, Instant};

use iced::Task;

use crate::detail_handlers;
use crate::media::{
    ApiError, BrowseCategory, FilterSelection, Genre, Message, Mode, MovieSummary,
};
use crate::tmdb::{fetch_image_bytes, ImageSize, MoviePage};
use crate::Reelgrid;

pub const DEBOUNCE: Duration = Duration::from_millis(300);
pub const MIN_QUERY_LEN: usize = 2;
pub const SUGGESTION_LIMIT: usize = 10;

pub fn handle_message(app: &mut Reelgrid, message: Message) -> Task<Message> {
    match message {
        Message::Setup(_) => Task::none(),

        Message::MoviesLoaded(result) => handle_movies_loaded(app, result),
        Message::PageSelected(page) => handle_page_selected(app, page),
        Message::MovieSelected(movie) => detail_handlers::push_detail(app, movie),

        Message::SearchInputChanged(input) => handle_search_input_changed(app, input),
        Message::SearchSubmitted => handle_search_submitted(app),
        Message::SearchCleared => handle_search_cleared(app),
        Message::SuggestionSelected(movie) => handle_suggestion_selected(app, movie),
        Message::SuggestionsLoaded { query, result } => {
            handle_suggestions_loaded(app, query, result)
        }

        Message::FilterToggled => handle_filter_toggled(app),
        Message::FilterGenreSelected(genre_id) => handle_filter_genre_selected(app, genre_id),
        Message::FilterYearChanged(year) => handle_filter_year_changed(app, year),
        Message::FilterCleared => handle_filter_cleared(app),
        Message::FilterGenresLoaded(result) => handle_filter_genres_loaded(app, result),

        Message::DebounceTick => handle_debounce_tick(app),

        Message::BrowseCategorySelected(category) => handle_browse_category_selected(app, category),
        Message::BrowsePageSelected(page) => handle_browse_page_selected(app, page),
        Message::BrowseLoaded { category, result } => handle_browse_loaded(app, category, result),

        Message::DetailClosed => detail_handlers::handle_detail_closed(app),
        Message::DetailTabSelected(tab) => detail_handlers::handle_detail_tab_selected(app, tab),
        Message::DetailTrailerLoaded { movie_id, result } => {
            detail_handlers::handle_detail_trailer_loaded(app, movie_id, result)
        }
        Message::DetailGenresLoaded { movie_id, result } => {
            detail_handlers::handle_detail_genres_loaded(app, movie_id, result)
        }
        Message::DetailReviewsLoaded { movie_id, result } => {
            detail_handlers::handle_detail_reviews_loaded(app, movie_id, result)
        }
        Message::DetailCreditsLoaded { movie_id, result } => {
            detail_handlers::handle_detail_credits_loaded(app, movie_id, result)
        }
        Message::DetailInfoLoaded { movie_id, result } => {
            detail_handlers::handle_detail_info_loaded(app, movie_id, result)
        }
        Message::RelatedSourceToggled(source) => {
            detail_handlers::handle_related_source_toggled(app, source)
        }
        Message::RelatedPageSelected(page) => {
            detail_handlers::handle_related_page_selected(app, page)
        }
        Message::RelatedLoaded {
            movie_id,
            source,
            result,
        } => detail_handlers::handle_related_loaded(app, movie_id, source, result),
        Message::ReviewExpandToggled(review_id) => {
            detail_handlers::handle_review_expand_toggled(app, review_id)
        }
        Message::AllReviewsToggled => detail_handlers::handle_all_reviews_toggled(app),

        Message::CastMemberSelected(person_id) => {
            detail_handlers::handle_cast_member_selected(app, person_id)
        }
        Message::PersonClosed => detail_handlers::handle_person_closed(app),
        Message::PersonLoaded { person_id, result } => {
            detail_handlers::handle_person_loaded(app, person_id, result)
        }
        Message::PersonCreditsLoaded { person_id, result } => {
            detail_handlers::handle_person_credits_loaded(app, person_id, result)
        }

        Message::LoadImage(url) => handle_load_image(app, url),
        Message::ImageLoaded(url, result) => handle_image_loaded(app, url, result),
    }
}

pub fn initial_load(app: &Reelgrid) -> Task<Message> {
    let Some(client) = &app.tmdb_client else {
        return Task::none();
    };
    let grid_client = client.clone();
    let browse_client = client.clone();
    let category = app.browse_category;
    Task::batch([
        Task::perform(
            async move { grid_client.trending(1).await },
            Message::MoviesLoaded,
        ),
        Task::perform(
            async move { browse_client.trending(1).await },
            move |result| Message::BrowseLoaded { category, result },
        ),
    ])
}

/// Refetch the top-level grid for the current mode and page. Every call
/// replaces the displayed page wholesale.
fn fetch_movie_list(app: &Reelgrid) -> Task<Message> {
    let Some(client) = &app.tmdb_client else {
        return Task::none();
    };
    let client = client.clone();
    let page = app.pages.current;

    match app.mode {
        Mode::Search => {
            let query = app.query.clone();
            Task::perform(
                async move { client.search_movies(&query, page).await },
                Message::MoviesLoaded,
            )
        }
        Mode::Filter => {
            let filter = app.filter.clone();
            Task::perform(
                async move {
                    client
                        .discover_movies(filter.genre_id, &filter.year, page)
                        .await
                },
                Message::MoviesLoaded,
            )
        }
        Mode::Trending | Mode::Tabs => Task::perform(
            async move { client.trending(page).await },
            Message::MoviesLoaded,
        ),
    }
}

fn handle_movies_loaded(app: &mut Reelgrid, result: Result<MoviePage, ApiError>) -> Task<Message> {
    match result {
        Ok(page) => {
            app.movies = page.results;
            app.pages.set_total(page.total_pages);
            app.error_message = None;
            queue_poster_images(app, &app.movies, ImageSize::Grid)
        }
        Err(error) => {
            tracing::warn!("movie list fetch failed: {error}");
            app.error_message = Some(error.to_string());
            Task::none()
        }
    }
}

fn handle_page_selected(app: &mut Reelgrid, page: u32) -> Task<Message> {
    app.pages.go_to(page);
    fetch_movie_list(app)
}

fn handle_search_input_changed(app: &mut Reelgrid, input: String) -> Task<Message> {
    app.search_input = input;

    if app.search_input.is_empty() {
        app.suggestions.clear();
        app.search_debounce = None;
        app.live_results.clear();
        app.mode = Mode::Tabs;
        return Task::none();
    }

    // below the minimum query length: drop any pending fetch quietly
    if app.search_input.chars().count() < MIN_QUERY_LEN {
        app.suggestions.clear();
        app.search_debounce = None;
        return Task::none();
    }

    app.search_debounce = Some(Instant::now());
    Task::none()
}

fn handle_debounce_tick(app: &mut Reelgrid) -> Task<Message> {
    let mut tasks = Vec::new();

    if let Some(started) = app.search_debounce {
        if started.elapsed() >= DEBOUNCE {
            app.search_debounce = None;
            if app.search_input.chars().count() >= MIN_QUERY_LEN {
                if let Some(client) = &app.tmdb_client {
                    let client = client.clone();
                    let query = app.search_input.clone();
                    tracing::debug!("live search for {query:?}");
                    tasks.push(Task::perform(
                        async move {
                            let result = client.search_movies(&query, 1).await;
                            (query, result)
                        },
                        |(query, result)| Message::SuggestionsLoaded { query, result },
                    ));
                }
            }
        }
    }

    if let Some(started) = app.filter_debounce {
        if started.elapsed() >= DEBOUNCE {
            app.filter_debounce = None;
            tasks.push(apply_filter(app));
        }
    }

    Task::batch(tasks)
}

fn handle_suggestions_loaded(
    app: &mut Reelgrid,
    query: String,
    result: Result<MoviePage, ApiError>,
) -> Task<Message> {
    let page = match result {
        Ok(page) => page,
        Err(error) => {
            tracing::warn!("live search failed: {error}");
            return Task::none();
        }
    };

    // No request-generation guard: a slow stale response overwrites a
    // newer one. Known limitation, kept as-is.
    app.suggestions = page.results.iter().take(SUGGESTION_LIMIT).cloned().collect();
    app.live_results = page.results;

    if query.is_empty() {
        app.mode = Mode::Tabs;
    } else if !app.live_results.is_empty() {
        app.mode = Mode::Search;
    }

    Task::batch([
        queue_poster_images(app, &app.suggestions, ImageSize::Thumb),
        queue_poster_images(app, &app.live_results, ImageSize::Grid),
    ])
}

fn handle_search_submitted(app: &mut Reelgrid) -> Task<Message> {
    app.suggestions.clear();
    app.live_results.clear();
    app.search_debounce = None;
    app.query = app.search_input.clone();
    app.mode = Mode::Search;
    app.pages.reset();
    fetch_movie_list(app)
}

fn handle_search_cleared(app: &mut Reelgrid) -> Task<Message> {
    app.search_input.clear();
    app.suggestions.clear();
    app.live_results.clear();
    app.search_debounce = None;
    app.query.clear();
    app.mode = Mode::Trending;
    app.pages.reset();
    fetch_movie_list(app)
}

fn handle_suggestion_selected(app: &mut Reelgrid, movie: MovieSummary) -> Task<Message> {
    app.search_input.clear();
    app.suggestions.clear();
    app.live_results.clear();
    app.search_debounce = None;
    app.mode = Mode::Tabs;
    detail_handlers::push_detail(app, movie)
}

fn handle_filter_toggled(app: &mut Reelgrid) -> Task<Message> {
    app.show_filter = !app.show_filter;
    // the toggle switches the mode even before any genre/year is picked
    app.mode = Mode::Filter;

    if !app.show_filter {
        app.filter_debounce = None;
        return Task::none();
    }

    // showing the bar schedules its auto-apply, like the original's
    // mount effect: an untouched bar applies the empty filter
    app.filter_debounce = Some(Instant::now());

    if !app.genre_list.is_empty() {
        return Task::none();
    }
    let Some(client) = &app.tmdb_client else {
        return Task::none();
    };
    let client = client.clone();
    Task::perform(
        async move { client.genres().await },
        Message::FilterGenresLoaded,
    )
}

fn handle_filter_genre_selected(app: &mut Reelgrid, genre_id: Option<u64>) -> Task<Message> {
    app.selected_genre = genre_id;
    app.filter_debounce = Some(Instant::now());
    Task::none()
}

fn handle_filter_year_changed(app: &mut Reelgrid, year: String) -> Task<Message> {
    if !year.chars().all(|c| c.is_ascii_digit()) {
        return Task::none();
    }
    app.year_input = year;
    app.filter_debounce = Some(Instant::now());
    Task::none()
}

fn apply_filter(app: &mut Reelgrid) -> Task<Message> {
    app.filter = FilterSelection {
        genre_id: app.selected_genre,
        year: app.year_input.clone(),
    };
    app.mode = Mode::Filter;
    app.pages.reset();
    fetch_movie_list(app)
}

fn handle_filter_cleared(app: &mut Reelgrid) -> Task<Message> {
    app.selected_genre = None;
    app.year_input.clear();
    app.filter_debounce = None;
    app.filter = FilterSelection::default();
    app.mode = Mode::Tabs;
    app.pages.reset();
    app.show_filter = false;
    Task::none()
}

fn handle_filter_genres_loaded(
    app: &mut Reelgrid,
    result: Result<Vec<Genre>, ApiError>,
) -> Task<Message> {
    match result {
        Ok(genres) => app.genre_list = genres,
        Err(error) => tracing::warn!("genre list fetch failed: {error}"),
    }
    Task::none()
}

fn fetch_browse(app: &Reelgrid) -> Task<Message> {
    let Some(client) = &app.tmdb_client else {
        return Task::none();
    };
    let client = client.clone();
    let category = app.browse_category;
    let page = app.browse_pages.current;

    Task::perform(
        async move {
            match category {
                BrowseCategory::Trending => client.trending(page).await,
                BrowseCategory::NowPlaying => client.now_playing(page).await,
                BrowseCategory::Upcoming => client.upcoming(page).await,
                BrowseCategory::TopRated => client.top_rated(page).await,
            }
        },
        move |result| Message::BrowseLoaded { category, result },
    )
}

fn handle_browse_category_selected(app: &mut Reelgrid, category: BrowseCategory) -> Task<Message> {
    app.browse_category = category;
    app.browse_pages.reset();
    fetch_browse(app)
}

fn handle_browse_page_selected(app: &mut Reelgrid, page: u32) -> Task<Message> {
    app.browse_pages.go_to(page);
    fetch_browse(app)
}

fn handle_browse_loaded(
    app: &mut Reelgrid,
    category: BrowseCategory,
    result: Result<MoviePage, ApiError>,
) -> Task<Message> {
    match result {
        Ok(page) => {
            tracing::debug!("browse {:?} loaded {} movies", category, page.results.len());
            app.browse_movies = page.results;
            app.browse_pages.set_total(page.total_pages);
            app.error_message = None;
            queue_poster_images(app, &app.browse_movies, ImageSize::Grid)
        }
        Err(error) => {
            tracing::warn!("browse fetch failed: {error}");
            app.error_message = Some(error.to_string());
            Task::none()
        }
    }
}

/// Queue downloads for every poster in `movies` not already cached or
/// in flight.
pub fn queue_poster_images(
    app: &Reelgrid,
    movies: &[MovieSummary],
    size: ImageSize,
) -> Task<Message> {
    let Some(client) = &app.tmdb_client else {
        return Task::none();
    };

    let mut tasks = Vec::new();
    for movie in movies {
        if let Some(path) = &movie.poster_path {
            let url = client.image_url(path, size);
            if app.image_cache.get(&url).is_none() && !app.image_cache.is_pending(&url) {
                tasks.push(Task::done(Message::LoadImage(url)));
            }
        }
    }
    Task::batch(tasks)
}

pub fn queue_image(app: &Reelgrid, url: String) -> Task<Message> {
    if app.image_cache.get(&url).is_some() || app.image_cache.is_pending(&url) {
        return Task::none();
    }
    Task::done(Message::LoadImage(url))
}

fn handle_load_image(app: &mut Reelgrid, url: String) -> Task<Message> {
    if app.image_cache.get(&url).is_some() || app.image_cache.is_pending(&url) {
        return Task::none();
    }
    app.image_cache.mark_pending(url.clone());

    Task::perform(
        async move {
            let result = fetch_image_bytes(url.clone()).await;
            (url, result)
        },
        |(url, result)| match result {
            Ok(bytes) => Message::ImageLoaded(
                url,
                Ok(iced::widget::image::Handle::from_bytes(bytes)),
            ),
            Err(error) => Message::ImageLoaded(url, Err(error)),
        },
    )
}

fn handle_image_loaded(
    app: &mut Reelgrid,
    url: String,
    result: Result<iced::widget::image::Handle, String>,
) -> Task<Message> {
    match result {
        Ok(handle) => app.image_cache.insert(url, handle),
        Err(error) => tracing::debug!("image fetch failed for {url}: {error}"),
    }
    Task::none()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> Reelgrid {
        Reelgrid::default()
    }

    fn summary(id: u64, title: &str) -> MovieSummary {
        MovieSummary {
            id,
            title: String::from(title),
            poster_path: None,
            overview: String::new(),
            vote_average: 0.0,
            vote_count: 0,
            release_date: None,
            original_language: None,
            genre_ids: Vec::new(),
        }
    }

    fn elapsed_debounce() -> Option<Instant> {
        Instant::now().checked_sub(DEBOUNCE + Duration::from_millis(10))
    }

    fn page_of(movies: Vec<MovieSummary>) -> MoviePage {
        MoviePage {
            results: movies,
            total_pages: 1,
        }
    }

    #[test]
    fn empty_input_clears_and_falls_back_to_tabs() {
        let mut app = app();
        app.mode = Mode::Search;
        app.suggestions = vec![summary(1, "a")];
        app.live_results = vec![summary(1, "a")];
        app.search_debounce = Some(Instant::now());

        let _ = handle_search_input_changed(&mut app, String::new());

        assert!(app.suggestions.is_empty());
        assert!(app.live_results.is_empty());
        assert!(app.search_debounce.is_none());
        assert_eq!(app.mode, Mode::Tabs);
    }

    #[test]
    fn single_char_input_schedules_nothing() {
        let mut app = app();
        app.mode = Mode::Search;
        app.live_results = vec![summary(1, "a")];

        let _ = handle_search_input_changed(&mut app, String::from("a"));

        assert!(app.suggestions.is_empty());
        assert!(app.search_debounce.is_none());
        // no live-result callback: existing results and mode untouched
        assert_eq!(app.live_results.len(), 1);
        assert_eq!(app.mode, Mode::Search);
    }

    #[test]
    fn two_chars_arm_the_debounce_once() {
        let mut app = app();
        let _ = handle_search_input_changed(&mut app, String::from("ab"));
        assert!(app.search_debounce.is_some());

        // quiet period passes: the timer is consumed exactly once
        app.search_debounce = elapsed_debounce();
        let _ = handle_debounce_tick(&mut app);
        assert!(app.search_debounce.is_none());
        let _ = handle_debounce_tick(&mut app);
        assert!(app.search_debounce.is_none());
    }

    #[test]
    fn each_keystroke_restarts_the_timer() {
        let mut app = app();
        let _ = handle_search_input_changed(&mut app, String::from("ab"));
        let first = app.search_debounce.unwrap();
        std::thread::sleep(Duration::from_millis(5));
        let _ = handle_search_input_changed(&mut app, String::from("abc"));
        assert!(app.search_debounce.unwrap() > first);
    }

    #[test]
    fn suggestions_cap_at_ten_and_flip_mode_on_results() {
        let mut app = app();
        let movies: Vec<_> = (0..15).map(|i| summary(i, "m")).collect();
        let _ = handle_suggestions_loaded(&mut app, String::from("ab"), Ok(page_of(movies)));

        assert_eq!(app.suggestions.len(), SUGGESTION_LIMIT);
        assert_eq!(app.live_results.len(), 15);
        assert_eq!(app.mode, Mode::Search);
    }

    #[test]
    fn empty_suggestion_results_leave_mode_alone() {
        let mut app = app();
        let _ = handle_suggestions_loaded(&mut app, String::from("zz"), Ok(page_of(Vec::new())));
        assert_eq!(app.mode, Mode::Tabs);
        assert!(app.suggestions.is_empty());
    }

    #[test]
    fn submit_clears_live_state_and_commits_the_query() {
        let mut app = app();
        app.search_input = String::from("matrix");
        app.suggestions = vec![summary(1, "The Matrix")];
        app.live_results = vec![summary(1, "The Matrix")];
        app.pages.go_to(4);

        let _ = handle_search_submitted(&mut app);

        assert!(app.suggestions.is_empty());
        assert!(app.live_results.is_empty());
        assert_eq!(app.query, "matrix");
        assert_eq!(app.mode, Mode::Search);
        assert_eq!(app.pages.current, 1);
    }

    #[test]
    fn clear_resets_everything_and_returns_to_trending() {
        let mut app = app();
        app.search_input = String::from("matrix");
        app.query = String::from("matrix");
        app.mode = Mode::Search;
        app.pages.go_to(3);

        let _ = handle_search_cleared(&mut app);

        assert!(app.search_input.is_empty());
        assert!(app.query.is_empty());
        assert_eq!(app.mode, Mode::Trending);
        assert_eq!(app.pages.current, 1);
    }

    #[test]
    fn selecting_a_suggestion_opens_its_detail_layer() {
        let mut app = app();
        app.search_input = String::from("mat");
        app.suggestions = vec![summary(603, "The Matrix")];
        app.live_results = vec![summary(603, "The Matrix")];

        let _ = handle_suggestion_selected(&mut app, summary(603, "The Matrix"));

        assert!(app.search_input.is_empty());
        assert!(app.suggestions.is_empty());
        assert!(app.live_results.is_empty());
        assert_eq!(app.mode, Mode::Tabs);
        assert_eq!(app.detail_stack.len(), 1);
        assert_eq!(app.detail_stack[0].movie.id, 603);
    }

    #[test]
    fn rapid_filter_changes_coalesce_into_one_application() {
        let mut app = app();
        let _ = handle_filter_genre_selected(&mut app, Some(28));
        let _ = handle_filter_year_changed(&mut app, String::from("1999"));
        assert!(app.filter_debounce.is_some());

        app.filter_debounce = elapsed_debounce();
        let _ = handle_debounce_tick(&mut app);

        // one firing, carrying the final pair
        assert!(app.filter_debounce.is_none());
        assert_eq!(app.filter.genre_id, Some(28));
        assert_eq!(app.filter.year, "1999");
        assert_eq!(app.mode, Mode::Filter);
        assert_eq!(app.pages.current, 1);
    }

    #[test]
    fn year_input_rejects_non_digits() {
        let mut app = app();
        let _ = handle_filter_year_changed(&mut app, String::from("19x9"));
        assert!(app.year_input.is_empty());
        assert!(app.filter_debounce.is_none());
    }

    #[test]
    fn filter_toggle_switches_mode_even_with_empty_fields() {
        let mut app = app();
        let _ = handle_filter_toggled(&mut app);
        assert!(app.show_filter);
        assert_eq!(app.mode, Mode::Filter);
        assert!(app.filter_debounce.is_some());

        // hiding cancels the pending auto-apply but keeps the mode
        let _ = handle_filter_toggled(&mut app);
        assert!(!app.show_filter);
        assert_eq!(app.mode, Mode::Filter);
        assert!(app.filter_debounce.is_none());
    }

    #[test]
    fn clearing_the_filter_returns_to_the_tabbed_view() {
        let mut app = app();
        app.selected_genre = Some(28);
        app.year_input = String::from("1999");
        app.filter = FilterSelection {
            genre_id: Some(28),
            year: String::from("1999"),
        };
        app.mode = Mode::Filter;
        app.show_filter = true;

        let _ = handle_filter_cleared(&mut app);

        assert!(app.selected_genre.is_none());
        assert!(app.year_input.is_empty());
        assert_eq!(app.filter, FilterSelection::default());
        assert_eq!(app.mode, Mode::Tabs);
        assert!(!app.show_filter);
    }

    #[test]
    fn browse_category_switch_resets_its_page() {
        let mut app = app();
        app.browse_pages.go_to(7);
        let _ = handle_browse_category_selected(&mut app, BrowseCategory::Upcoming);
        assert_eq!(app.browse_category, BrowseCategory::Upcoming);
        assert_eq!(app.browse_pages.current, 1);
    }

    #[test]
    fn browse_response_replaces_list_and_total_wholesale() {
        let mut app = app();
        app.browse_movies = vec![summary(1, "old")];
        let page = MoviePage {
            results: vec![summary(2, "new"), summary(3, "newer")],
            total_pages: 9,
        };
        let _ = handle_browse_loaded(&mut app, BrowseCategory::Trending, Ok(page));
        assert_eq!(app.browse_movies.len(), 2);
        assert_eq!(app.browse_pages.total, 9);
    }

    #[test]
    fn failed_list_fetch_surfaces_an_inline_error() {
        let mut app = app();
        let _ = handle_movies_loaded(&mut app, Err(ApiError::RateLimit));
        assert!(app.error_message.is_some());

        let _ = handle_movies_loaded(&mut app, Ok(page_of(vec![summary(1, "ok")])));
        assert!(app.error_message.is_none());
    }
}
