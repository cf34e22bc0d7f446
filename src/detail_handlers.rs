use iced::Task;

use crate::handlers::{queue_image, queue_poster_images};
use crate::media::{
    ApiError, Credits, DetailState, DetailTab, Genre, Message, MovieDetail, MovieId, MovieSummary,
    Person, PersonId, PersonViewState, RelatedSource,
};
use crate::tmdb::{ImageSize, MoviePage, ReviewPage, Video};
use crate::Reelgrid;

/// Open a detail layer for `movie` on top of whatever is already open.
/// Everything except the related lists' later pages is fetched here,
/// concurrently; tab switches never fetch.
pub fn push_detail(app: &mut Reelgrid, movie: MovieSummary) -> Task<Message> {
    let movie_id = movie.id;
    let mut tasks = Vec::new();

    if let Some(client) = &app.tmdb_client {
        if let Some(path) = &movie.poster_path {
            let url = client.image_url(path, ImageSize::Poster);
            tasks.push(queue_image(app, url));
        }

        let trailer_client = client.clone();
        tasks.push(Task::perform(
            async move { trailer_client.movie_trailer(movie_id).await },
            move |result| Message::DetailTrailerLoaded { movie_id, result },
        ));

        let genres_client = client.clone();
        tasks.push(Task::perform(
            async move { genres_client.genres().await },
            move |result| Message::DetailGenresLoaded { movie_id, result },
        ));

        let reviews_client = client.clone();
        tasks.push(Task::perform(
            async move { reviews_client.movie_reviews(movie_id).await },
            move |result| Message::DetailReviewsLoaded { movie_id, result },
        ));

        let credits_client = client.clone();
        tasks.push(Task::perform(
            async move { credits_client.movie_credits(movie_id).await },
            move |result| Message::DetailCreditsLoaded { movie_id, result },
        ));

        let details_client = client.clone();
        tasks.push(Task::perform(
            async move { details_client.movie_details(movie_id).await },
            move |result| Message::DetailInfoLoaded { movie_id, result },
        ));

        tasks.push(fetch_related(app, movie_id, RelatedSource::Recommended, 1));
        tasks.push(fetch_related(app, movie_id, RelatedSource::Similar, 1));
    }

    app.detail_stack.push(DetailState::new(movie));
    Task::batch(tasks)
}

pub fn handle_detail_closed(app: &mut Reelgrid) -> Task<Message> {
    // closes only the topmost layer; a nested related-movie view pops
    // back to the layer it was opened from
    app.detail_stack.pop();
    Task::none()
}

pub fn handle_detail_tab_selected(app: &mut Reelgrid, tab: DetailTab) -> Task<Message> {
    if let Some(layer) = app.detail_stack.last_mut() {
        layer.tab = tab;
    }
    Task::none()
}

fn matching_layers<'a>(
    app: &'a mut Reelgrid,
    movie_id: MovieId,
) -> impl Iterator<Item = &'a mut DetailState> {
    app.detail_stack
        .iter_mut()
        .filter(move |layer| layer.movie.id == movie_id)
}

pub fn handle_detail_trailer_loaded(
    app: &mut Reelgrid,
    movie_id: MovieId,
    result: Result<Option<Video>, ApiError>,
) -> Task<Message> {
    let trailer = match result {
        Ok(trailer) => trailer,
        Err(error) => {
            tracing::warn!("trailer lookup failed for movie {movie_id}: {error}");
            return Task::none();
        }
    };

    for layer in matching_layers(app, movie_id) {
        layer.trailer = trailer.clone();
    }

    match (&trailer, &app.tmdb_client) {
        (Some(video), Some(client)) => {
            let url = client.trailer_thumbnail_url(&video.key);
            queue_image(app, url)
        }
        _ => Task::none(),
    }
}

pub fn handle_detail_genres_loaded(
    app: &mut Reelgrid,
    movie_id: MovieId,
    result: Result<Vec<Genre>, ApiError>,
) -> Task<Message> {
    match result {
        Ok(genres) => {
            let map: std::collections::HashMap<u64, String> =
                genres.into_iter().map(|g| (g.id, g.name)).collect();
            for layer in matching_layers(app, movie_id) {
                layer.genre_map = map.clone();
            }
        }
        Err(error) => tracing::warn!("genre map fetch failed for movie {movie_id}: {error}"),
    }
    Task::none()
}

pub fn handle_detail_reviews_loaded(
    app: &mut Reelgrid,
    movie_id: MovieId,
    result: Result<ReviewPage, ApiError>,
) -> Task<Message> {
    match result {
        Ok(page) => {
            for layer in matching_layers(app, movie_id) {
                layer.reviews = page.results.clone();
                layer.total_reviews = page.total_results;
            }
        }
        Err(error) => tracing::warn!("reviews fetch failed for movie {movie_id}: {error}"),
    }
    Task::none()
}

pub fn handle_detail_credits_loaded(
    app: &mut Reelgrid,
    movie_id: MovieId,
    result: Result<Credits, ApiError>,
) -> Task<Message> {
    let credits = match result {
        Ok(credits) => credits,
        Err(error) => {
            tracing::warn!("credits fetch failed for movie {movie_id}: {error}");
            return Task::none();
        }
    };

    let mut portrait_urls = Vec::new();
    if let Some(client) = &app.tmdb_client {
        for member in credits.cast.iter().take(crate::detail_sections::CAST_LIMIT) {
            if let Some(path) = &member.profile_path {
                portrait_urls.push(client.image_url(path, ImageSize::Profile));
            }
        }
    }

    for layer in matching_layers(app, movie_id) {
        layer.credits = Some(credits.clone());
    }

    Task::batch(portrait_urls.into_iter().map(|url| queue_image(app, url)))
}

pub fn handle_detail_info_loaded(
    app: &mut Reelgrid,
    movie_id: MovieId,
    result: Result<MovieDetail, ApiError>,
) -> Task<Message> {
    let detail = match result {
        Ok(detail) => detail,
        Err(error) => {
            tracing::warn!("details fetch failed for movie {movie_id}: {error}");
            return Task::none();
        }
    };

    let mut logo_urls = Vec::new();
    if let Some(client) = &app.tmdb_client {
        for company in &detail.production_companies {
            if let Some(path) = &company.logo_path {
                logo_urls.push(client.image_url(path, ImageSize::Thumb));
            }
        }
    }

    for layer in matching_layers(app, movie_id) {
        layer.detail = Some(detail.clone());
    }

    Task::batch(logo_urls.into_iter().map(|url| queue_image(app, url)))
}

fn fetch_related(
    app: &Reelgrid,
    movie_id: MovieId,
    source: RelatedSource,
    page: u32,
) -> Task<Message> {
    let Some(client) = &app.tmdb_client else {
        return Task::none();
    };
    let client = client.clone();
    Task::perform(
        async move {
            let result = match source {
                RelatedSource::Recommended => client.recommended_movies(movie_id, page).await,
                RelatedSource::Similar => client.similar_movies(movie_id, page).await,
            };
            (movie_id, source, result)
        },
        |(movie_id, source, result)| Message::RelatedLoaded {
            movie_id,
            source,
            result,
        },
    )
}

pub fn handle_related_source_toggled(app: &mut Reelgrid, source: RelatedSource) -> Task<Message> {
    let Some(layer) = app.detail_stack.last_mut() else {
        return Task::none();
    };
    layer.related_source = source;
    // only the newly shown list rewinds; the other keeps its page
    layer.related_pages_mut().reset();
    let movie_id = layer.movie.id;
    fetch_related(app, movie_id, source, 1)
}

pub fn handle_related_page_selected(app: &mut Reelgrid, page: u32) -> Task<Message> {
    let Some(layer) = app.detail_stack.last_mut() else {
        return Task::none();
    };
    layer.related_pages_mut().go_to(page);
    let movie_id = layer.movie.id;
    let source = layer.related_source;
    fetch_related(app, movie_id, source, page)
}

pub fn handle_related_loaded(
    app: &mut Reelgrid,
    movie_id: MovieId,
    source: RelatedSource,
    result: Result<MoviePage, ApiError>,
) -> Task<Message> {
    let page = match result {
        Ok(page) => page,
        Err(error) => {
            tracing::warn!("related fetch failed for movie {movie_id}: {error}");
            return Task::none();
        }
    };

    for layer in matching_layers(app, movie_id) {
        match source {
            RelatedSource::Recommended => {
                layer.recommended = page.results.clone();
                layer.recommended_pages.set_total(page.total_pages);
            }
            RelatedSource::Similar => {
                layer.similar = page.results.clone();
                layer.similar_pages.set_total(page.total_pages);
            }
        }
    }

    queue_poster_images(app, &page.results, ImageSize::Grid)
}

pub fn handle_review_expand_toggled(app: &mut Reelgrid, review_id: String) -> Task<Message> {
    if let Some(layer) = app.detail_stack.last_mut() {
        if !layer.expanded_reviews.remove(&review_id) {
            layer.expanded_reviews.insert(review_id);
        }
    }
    Task::none()
}

pub fn handle_all_reviews_toggled(app: &mut Reelgrid) -> Task<Message> {
    if let Some(layer) = app.detail_stack.last_mut() {
        layer.show_all_reviews = !layer.show_all_reviews;
    }
    Task::none()
}

pub fn handle_cast_member_selected(app: &mut Reelgrid, person_id: PersonId) -> Task<Message> {
    app.person_view = Some(PersonViewState::new(person_id));

    let Some(client) = &app.tmdb_client else {
        return Task::none();
    };
    let details_client = client.clone();
    let credits_client = client.clone();
    Task::batch([
        Task::perform(
            async move { details_client.person_details(person_id).await },
            move |result| Message::PersonLoaded { person_id, result },
        ),
        Task::perform(
            async move { credits_client.person_movie_credits(person_id).await },
            move |result| Message::PersonCreditsLoaded { person_id, result },
        ),
    ])
}

pub fn handle_person_closed(app: &mut Reelgrid) -> Task<Message> {
    app.person_view = None;
    Task::none()
}

pub fn handle_person_loaded(
    app: &mut Reelgrid,
    person_id: PersonId,
    result: Result<Person, ApiError>,
) -> Task<Message> {
    let person = match result {
        Ok(person) => person,
        Err(error) => {
            tracing::warn!("person fetch failed for {person_id}: {error}");
            return Task::none();
        }
    };

    let Some(view) = app.person_view.as_mut().filter(|v| v.person_id == person_id) else {
        return Task::none();
    };
    view.person = Some(person);

    let profile_url = app.person_view.as_ref().and_then(|v| {
        let path = v.person.as_ref()?.profile_path.as_ref()?;
        let client = app.tmdb_client.as_ref()?;
        Some(client.image_url(path, ImageSize::Profile))
    });
    match profile_url {
        Some(url) => queue_image(app, url),
        None => Task::none(),
    }
}

pub fn handle_person_credits_loaded(
    app: &mut Reelgrid,
    person_id: PersonId,
    result: Result<Vec<MovieSummary>, ApiError>,
) -> Task<Message> {
    let credits = match result {
        Ok(credits) => credits,
        Err(error) => {
            tracing::warn!("person credits fetch failed for {person_id}: {error}");
            return Task::none();
        }
    };

    let Some(view) = app.person_view.as_mut().filter(|v| v.person_id == person_id) else {
        return Task::none();
    };
    view.known_for = credits
        .into_iter()
        .take(crate::person::KNOWN_FOR_LIMIT)
        .collect();

    let known_for = app
        .person_view
        .as_ref()
        .map(|v| v.known_for.clone())
        .unwrap_or_default();
    queue_poster_images(app, &known_for, ImageSize::Profile)
}

#[cfg(test)]
mod tests {
    use super::*;

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

    fn app_with_layer(movie_id: u64) -> Reelgrid {
        let mut app = Reelgrid::default();
        let _ = push_detail(&mut app, summary(movie_id, "movie"));
        app
    }

    fn page_of(ids: &[u64], total_pages: u32) -> MoviePage {
        MoviePage {
            results: ids.iter().map(|id| summary(*id, "related")).collect(),
            total_pages,
        }
    }

    #[test]
    fn related_toggle_resets_only_the_shown_list() {
        let mut app = app_with_layer(603);
        {
            let layer = app.detail_stack.last_mut().unwrap();
            layer.recommended_pages.set_total(20);
            layer.recommended_pages.go_to(5);
            layer.similar_pages.set_total(20);
            layer.similar_pages.go_to(4);
        }

        let _ = handle_related_source_toggled(&mut app, RelatedSource::Similar);

        let layer = app.detail_stack.last().unwrap();
        assert_eq!(layer.related_source, RelatedSource::Similar);
        assert_eq!(layer.similar_pages.current, 1);
        assert_eq!(layer.recommended_pages.current, 5);
    }

    #[test]
    fn related_responses_land_in_their_own_list() {
        let mut app = app_with_layer(603);

        let _ = handle_related_loaded(
            &mut app,
            603,
            RelatedSource::Recommended,
            Ok(page_of(&[1, 2], 8)),
        );
        let _ = handle_related_loaded(&mut app, 603, RelatedSource::Similar, Ok(page_of(&[3], 2)));

        let layer = app.detail_stack.last().unwrap();
        assert_eq!(layer.recommended.len(), 2);
        assert_eq!(layer.recommended_pages.total, 8);
        assert_eq!(layer.similar.len(), 1);
        assert_eq!(layer.similar_pages.total, 2);
    }

    #[test]
    fn stale_related_response_for_a_closed_layer_is_dropped() {
        let mut app = app_with_layer(603);
        let _ = handle_detail_closed(&mut app);
        assert!(app.detail_stack.is_empty());

        // arrives after the layer is gone: nothing to update, no panic
        let _ = handle_related_loaded(
            &mut app,
            603,
            RelatedSource::Recommended,
            Ok(page_of(&[1], 1)),
        );
        assert!(app.detail_stack.is_empty());
    }

    #[test]
    fn nested_layers_pop_one_at_a_time() {
        let mut app = app_with_layer(603);
        let _ = push_detail(&mut app, summary(604, "related"));
        assert_eq!(app.detail_stack.len(), 2);

        let _ = handle_detail_closed(&mut app);
        assert_eq!(app.detail_stack.len(), 1);
        assert_eq!(app.detail_stack[0].movie.id, 603);

        let _ = handle_detail_closed(&mut app);
        assert!(app.detail_stack.is_empty());
    }

    #[test]
    fn opening_a_new_layer_starts_with_fresh_pages_and_tab() {
        let mut app = app_with_layer(603);
        {
            let layer = app.detail_stack.last_mut().unwrap();
            layer.tab = DetailTab::Related;
            layer.recommended_pages.go_to(3);
        }
        let _ = push_detail(&mut app, summary(604, "related"));
        let layer = app.detail_stack.last().unwrap();
        assert_eq!(layer.tab, DetailTab::Details);
        assert_eq!(layer.recommended_pages.current, 1);
        assert_eq!(layer.similar_pages.current, 1);
    }

    #[test]
    fn review_expansion_is_tracked_per_review_id() {
        let mut app = app_with_layer(603);
        let _ = handle_review_expand_toggled(&mut app, String::from("r1"));
        assert!(app.detail_stack[0].expanded_reviews.contains("r1"));

        let _ = handle_review_expand_toggled(&mut app, String::from("r2"));
        let _ = handle_review_expand_toggled(&mut app, String::from("r1"));
        let layer = &app.detail_stack[0];
        assert!(!layer.expanded_reviews.contains("r1"));
        assert!(layer.expanded_reviews.contains("r2"));
    }

    #[test]
    fn stale_person_response_is_ignored_after_switching_people() {
        let mut app = Reelgrid::default();
        let _ = handle_cast_member_selected(&mut app, 10);
        let _ = handle_cast_member_selected(&mut app, 20);

        let stale = Person {
            id: 10,
            name: String::from("Old"),
            biography: String::new(),
            birthday: None,
            place_of_birth: None,
            known_for_department: String::new(),
            profile_path: None,
        };
        let _ = handle_person_loaded(&mut app, 10, Ok(stale));
        assert!(app.person_view.as_ref().unwrap().person.is_none());
    }

    #[test]
    fn known_for_keeps_at_most_ten_credits() {
        let mut app = Reelgrid::default();
        let _ = handle_cast_member_selected(&mut app, 10);
        let credits: Vec<_> = (0..14).map(|i| summary(i, "m")).collect();
        let _ = handle_person_credits_loaded(&mut app, 10, Ok(credits));
        assert_eq!(app.person_view.unwrap().known_for.len(), 10);
    }
}
