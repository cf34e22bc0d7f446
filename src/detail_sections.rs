use iced::widget::{button, column, container, mouse_area, row, text, Column, Row};
use iced::{Border, Color, Element, Length, Padding, Shadow};

use crate::components::pagination_controls;
use crate::detail_popup::{format_currency, format_rating, format_release_date, format_runtime};
use crate::media::{
    CrewMember, DetailState, Message, RelatedSource, Review, ACCENT_BLUE, SURFACE_GRAY,
    STAR_YELLOW, TEXT_GRAY, TEXT_WHITE,
};
use crate::tmdb::ImageSize;
use crate::Reelgrid;

pub const CAST_LIMIT: usize = 10;
pub const REVIEW_PREVIEW_COUNT: usize = 3;
pub const REVIEW_EXCERPT_LEN: usize = 300;
pub const CREW_ROLES: [&str; 4] = ["Director", "Producer", "Writer", "Composer"];

/// The leading 300 characters, but only when there is more to hide;
/// content that fits gets no excerpt and no toggle.
pub fn review_excerpt(content: &str) -> Option<String> {
    let mut chars = content.chars();
    let excerpt: String = chars.by_ref().take(REVIEW_EXCERPT_LEN).collect();
    chars.next().is_some().then_some(excerpt)
}

pub fn find_director(crew: &[CrewMember]) -> Option<&str> {
    crew.iter()
        .find(|member| member.job == "Director")
        .map(|member| member.name.as_str())
}

pub fn names_for_role<'a>(crew: &'a [CrewMember], role: &str) -> Vec<&'a str> {
    crew.iter()
        .filter(|member| member.job == role)
        .map(|member| member.name.as_str())
        .collect()
}

pub fn visible_review_count(total: usize, show_all: bool) -> usize {
    if show_all {
        total
    } else {
        total.min(REVIEW_PREVIEW_COUNT)
    }
}

fn link_button(label: &str, message: Message) -> Element<'_, Message> {
    button(text(label).size(13).color(ACCENT_BLUE))
        .padding(0)
        .style(|_theme, _status| button::Style {
            background: Some(iced::Background::Color(Color::TRANSPARENT)),
            text_color: ACCENT_BLUE,
            border: Border::default(),
            shadow: Shadow::default(),
            snap: false,
        })
        .on_press(message)
        .into()
}

fn separator<'a>() -> Element<'a, Message> {
    container(iced::widget::Space::new().width(Length::Fill).height(1))
        .width(Length::Fill)
        .style(|_theme| container::Style {
            background: Some(iced::Background::Color(Color::from_rgba(1.0, 1.0, 1.0, 0.1))),
            ..Default::default()
        })
        .into()
}

impl Reelgrid {
    fn meta_line(&self, label: &str, value: String) -> Element<'_, Message> {
        row![
            text(format!("{}: ", label))
                .size(13)
                .color(TEXT_WHITE)
                .font(iced::Font {
                    weight: iced::font::Weight::Semibold,
                    ..Default::default()
                }),
            text(value).size(13).color(TEXT_GRAY),
        ]
        .into()
    }

    pub fn view_details_tab<'a>(&'a self, layer: &'a DetailState) -> Element<'a, Message> {
        let movie = &layer.movie;
        let poster = self.poster_or_placeholder(
            movie.poster_path.as_ref(),
            ImageSize::Poster,
            200.0,
            300.0,
        );

        let mut info = column![text(movie.title.clone())
            .size(24)
            .color(TEXT_WHITE)
            .font(iced::Font {
                weight: iced::font::Weight::Bold,
                ..Default::default()
            })]
        .spacing(8);

        if !movie.overview.is_empty() {
            info = info.push(
                text(movie.overview.clone())
                    .size(14)
                    .color(TEXT_GRAY)
                    .wrapping(text::Wrapping::Word),
            );
        }

        if let Some(date) = movie.release_date.as_deref().filter(|d| !d.is_empty()) {
            info = info.push(self.meta_line("Release Date", format_release_date(date)));
        }
        info = info.push(self.meta_line(
            "Rating",
            format_rating(movie.vote_average, movie.vote_count),
        ));
        if let Some(language) = &movie.original_language {
            info = info.push(self.meta_line("Language", language.to_uppercase()));
        }
        let genre_names: Vec<String> = movie
            .genre_ids
            .iter()
            .filter_map(|id| layer.genre_map.get(id).cloned())
            .collect();
        if !genre_names.is_empty() {
            info = info.push(self.meta_line("Genres", genre_names.join(", ")));
        }

        // every extended field renders only once the details arrive,
        // and only when the API actually knows it
        if let Some(detail) = &layer.detail {
            if let Some(tagline) = detail.tagline.as_deref().filter(|t| !t.is_empty()) {
                info = info.push(text(format!("\u{201C}{}\u{201D}", tagline)).size(13).color(TEXT_GRAY));
            }
            if let Some(runtime) = detail.runtime.filter(|r| *r > 0) {
                info = info.push(self.meta_line("Runtime", format_runtime(runtime)));
            }
            if detail.budget > 0 {
                info = info.push(self.meta_line("Budget", format_currency(detail.budget)));
            }
            if detail.revenue > 0 {
                info = info.push(self.meta_line("Revenue", format_currency(detail.revenue)));
            }
            if let Some(homepage) = detail.homepage.as_deref().filter(|h| !h.is_empty()) {
                info = info.push(self.meta_line("Homepage", homepage.to_string()));
            }
            if !detail.production_countries.is_empty() {
                let countries: Vec<&str> = detail
                    .production_countries
                    .iter()
                    .map(|c| c.name.as_str())
                    .collect();
                info = info.push(self.meta_line("Countries", countries.join(", ")));
            }
            if !detail.production_companies.is_empty() {
                info = info.push(
                    text("Production")
                        .size(14)
                        .color(TEXT_WHITE)
                        .font(iced::Font {
                            weight: iced::font::Weight::Semibold,
                            ..Default::default()
                        }),
                );
                for company in &detail.production_companies {
                    let logo = self.poster_or_placeholder(
                        company.logo_path.as_ref(),
                        ImageSize::Thumb,
                        40.0,
                        40.0,
                    );
                    info = info.push(
                        row![logo, text(company.name.clone()).size(13).color(TEXT_GRAY)]
                            .spacing(10)
                            .align_y(iced::Alignment::Center),
                    );
                }
            }
        }

        row![poster, info.width(Length::Fill)]
            .spacing(24)
            .align_y(iced::Alignment::Start)
            .into()
    }

    pub fn view_trailer_tab<'a>(&'a self, layer: &'a DetailState) -> Element<'a, Message> {
        let Some(video) = &layer.trailer else {
            return text("Trailer not available").size(14).color(TEXT_GRAY).into();
        };

        let thumbnail = self
            .tmdb_client
            .as_ref()
            .map(|client| client.trailer_thumbnail_url(&video.key))
            .and_then(|url| self.image_cache.get(&url).cloned());

        let frame: Element<'_, Message> = match thumbnail {
            Some(handle) => container(
                iced::widget::image(handle)
                    .width(Length::Fixed(640.0))
                    .height(Length::Fixed(360.0))
                    .content_fit(iced::ContentFit::Cover),
            )
            .style(|_| container::Style {
                border: Border {
                    radius: 8.0.into(),
                    ..Default::default()
                },
                ..Default::default()
            })
            .into(),
            None => container(text("Loading preview...").size(13).color(TEXT_GRAY))
                .width(Length::Fixed(640.0))
                .height(Length::Fixed(360.0))
                .center_x(Length::Fill)
                .center_y(Length::Fill)
                .style(|_| container::Style {
                    background: Some(iced::Background::Color(SURFACE_GRAY)),
                    border: Border {
                        color: Color::from_rgba(1.0, 1.0, 1.0, 0.1),
                        width: 1.0,
                        radius: 8.0.into(),
                    },
                    ..Default::default()
                })
                .into(),
        };

        let mut section = column![
            text("Trailer").size(16).color(TEXT_WHITE).font(iced::Font {
                weight: iced::font::Weight::Semibold,
                ..Default::default()
            }),
            frame,
        ]
        .spacing(12);

        if !video.name.is_empty() {
            section = section.push(text(video.name.clone()).size(13).color(TEXT_WHITE));
        }
        if let Some(client) = &self.tmdb_client {
            section = section.push(
                text(client.trailer_watch_url(&video.key))
                    .size(12)
                    .color(TEXT_GRAY),
            );
        }

        section.into()
    }

    pub fn view_reviews_tab<'a>(&'a self, layer: &'a DetailState) -> Element<'a, Message> {
        if layer.reviews.is_empty() {
            return text("No reviews available.").size(14).color(TEXT_GRAY).into();
        }

        let mut section = column![text(format!("Reviews ({})", layer.total_reviews))
            .size(16)
            .color(TEXT_WHITE)
            .font(iced::Font {
                weight: iced::font::Weight::Semibold,
                ..Default::default()
            })]
        .spacing(16);

        let shown = visible_review_count(layer.reviews.len(), layer.show_all_reviews);
        for review in &layer.reviews[..shown] {
            section = section.push(self.view_review_entry(layer, review));
        }

        if layer.reviews.len() > REVIEW_PREVIEW_COUNT {
            let label = if layer.show_all_reviews {
                "Show Less"
            } else {
                "See All Reviews"
            };
            section = section.push(link_button(label, Message::AllReviewsToggled));
        }

        section.into()
    }

    fn view_review_entry<'a>(&'a self, layer: &'a DetailState, review: &'a Review) -> Element<'a, Message> {
        let excerpt = review_excerpt(&review.content);
        let expanded = layer.expanded_reviews.contains(&review.id);

        let body = match (&excerpt, expanded) {
            (Some(excerpt), false) => format!("\u{201C}{}...\u{201D}", excerpt),
            _ => format!("\u{201C}{}\u{201D}", review.content),
        };

        let mut entry = column![
            text(review.author.clone())
                .size(13)
                .color(TEXT_GRAY)
                .font(iced::Font {
                    weight: iced::font::Weight::Bold,
                    ..Default::default()
                }),
            text(body)
                .size(13)
                .color(TEXT_WHITE)
                .wrapping(text::Wrapping::Word),
        ]
        .spacing(4);

        if excerpt.is_some() {
            let label = if expanded { "Show less" } else { "Read more" };
            entry = entry.push(link_button(
                label,
                Message::ReviewExpandToggled(review.id.clone()),
            ));
        }

        if let Some(rating) = review.author_details.rating {
            entry = entry.push(
                text(format!("Rating: ★ {}", rating))
                    .size(12)
                    .color(STAR_YELLOW),
            );
        }

        entry = entry.push(separator());
        entry.into()
    }

    pub fn view_cast_crew_tab<'a>(&'a self, layer: &'a DetailState) -> Element<'a, Message> {
        let (cast, crew) = layer
            .credits
            .as_ref()
            .map(|c| (c.cast.as_slice(), c.crew.as_slice()))
            .unwrap_or((&[], &[]));

        let mut section = column![self.meta_line(
            "Director",
            find_director(crew).unwrap_or("Not listed").to_string(),
        )]
        .spacing(16);

        let cast_tiles: Vec<Element<'_, Message>> = cast
            .iter()
            .take(CAST_LIMIT)
            .map(|member| {
                let portrait = self.poster_or_placeholder(
                    member.profile_path.as_ref(),
                    ImageSize::Profile,
                    90.0,
                    135.0,
                );
                let tile = column![
                    portrait,
                    text(member.name.clone())
                        .size(12)
                        .color(TEXT_WHITE)
                        .wrapping(text::Wrapping::Word),
                    text(member.character.clone())
                        .size(11)
                        .color(TEXT_GRAY)
                        .wrapping(text::Wrapping::Word),
                ]
                .spacing(4)
                .width(Length::Fixed(90.0));

                mouse_area(tile)
                    .on_press(Message::CastMemberSelected(member.id))
                    .into()
            })
            .collect();

        let mut cast_rows: Vec<Element<'_, Message>> = Vec::new();
        let mut current: Vec<Element<'_, Message>> = Vec::new();
        for tile in cast_tiles {
            current.push(tile);
            if current.len() == 5 {
                cast_rows.push(Row::with_children(std::mem::take(&mut current)).spacing(12).into());
            }
        }
        if !current.is_empty() {
            cast_rows.push(Row::with_children(current).spacing(12).into());
        }
        section = section.push(Column::with_children(cast_rows).spacing(12));

        let mut crew_lines = column![].spacing(6);
        for role in CREW_ROLES {
            let names = names_for_role(crew, role);
            if !names.is_empty() {
                crew_lines = crew_lines.push(self.meta_line(role, names.join(", ")));
            }
        }
        section = section.push(crew_lines);

        section.into()
    }

    pub fn view_related_tab<'a>(&'a self, layer: &'a DetailState) -> Element<'a, Message> {
        let toggles: Vec<Element<'_, Message>> =
            [RelatedSource::Recommended, RelatedSource::Similar]
                .into_iter()
                .map(|source| {
                    let is_active = layer.related_source == source;
                    button(text(source.label()).size(13).color(TEXT_WHITE))
                        .padding(Padding::new(6.0).left(14.0).right(14.0))
                        .style(move |_theme, status| {
                            let bg = if is_active {
                                ACCENT_BLUE
                            } else if matches!(status, button::Status::Hovered) {
                                Color::from_rgba(1.0, 1.0, 1.0, 0.2)
                            } else {
                                Color::from_rgba(1.0, 1.0, 1.0, 0.1)
                            };
                            button::Style {
                                background: Some(iced::Background::Color(bg)),
                                text_color: TEXT_WHITE,
                                border: Border {
                                    radius: 4.0.into(),
                                    ..Default::default()
                                },
                                shadow: Shadow::default(),
                                snap: false,
                            }
                        })
                        .on_press(Message::RelatedSourceToggled(source))
                        .into()
                })
                .collect();

        let mut section = column![Row::with_children(toggles).spacing(8)].spacing(16);

        let movies = layer.related_movies();
        if movies.is_empty() {
            section = section.push(text("Nothing to show here yet.").size(13).color(TEXT_GRAY));
            return section.into();
        }

        let mut rows: Vec<Element<'_, Message>> = Vec::new();
        for chunk in movies.chunks(4) {
            let tiles: Vec<Element<'_, Message>> = chunk
                .iter()
                .map(|movie| self.poster_tile(movie, ImageSize::Grid, 150.0, 225.0, true))
                .collect();
            rows.push(Row::with_children(tiles).spacing(16).into());
        }
        section = section.push(Column::with_children(rows).spacing(16));

        section = section.push(pagination_controls(
            layer.related_pages(),
            Message::RelatedPageSelected,
        ));

        section.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn crew_member(name: &str, job: &str) -> CrewMember {
        CrewMember {
            id: 1,
            name: String::from(name),
            job: String::from(job),
            profile_path: None,
        }
    }

    #[test]
    fn excerpt_only_when_content_overflows() {
        let long = "a".repeat(301);
        let excerpt = review_excerpt(&long).unwrap();
        assert_eq!(excerpt.chars().count(), 300);

        // exactly at the limit: nothing to hide, no toggle
        let exact = "a".repeat(300);
        assert!(review_excerpt(&exact).is_none());
        assert!(review_excerpt("short").is_none());
    }

    #[test]
    fn excerpt_counts_characters_not_bytes() {
        let long = "é".repeat(301);
        let excerpt = review_excerpt(&long).unwrap();
        assert_eq!(excerpt.chars().count(), 300);
    }

    #[test]
    fn director_resolution_takes_the_first_match() {
        assert_eq!(find_director(&[]), None);

        let crew = vec![crew_member("Solo", "Director")];
        assert_eq!(find_director(&crew), Some("Solo"));

        let crew = vec![
            crew_member("Someone", "Producer"),
            crew_member("First", "Director"),
            crew_member("Second", "Director"),
        ];
        assert_eq!(find_director(&crew), Some("First"));
    }

    #[test]
    fn role_grouping_keeps_order_and_skips_absent_roles() {
        let crew = vec![
            crew_member("A", "Writer"),
            crew_member("B", "Producer"),
            crew_member("C", "Writer"),
        ];
        assert_eq!(names_for_role(&crew, "Writer"), vec!["A", "C"]);
        assert_eq!(names_for_role(&crew, "Writer").join(", "), "A, C");
        assert!(names_for_role(&crew, "Composer").is_empty());
    }

    #[test]
    fn review_visibility_defaults_to_three() {
        assert_eq!(visible_review_count(2, false), 2);
        assert_eq!(visible_review_count(7, false), 3);
        assert_eq!(visible_review_count(7, true), 7);
    }
}
