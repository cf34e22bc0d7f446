use iced::widget::{button, column, container, row, scrollable, text, Space};
use iced::{Border, Color, Element, Length, Padding, Shadow};

use crate::media::{Message, Mode, ACCENT_BLUE, SURFACE_GRAY, TEXT_GRAY, TEXT_WHITE};
use crate::pagination::{page_window, PageState};
use crate::Reelgrid;

pub const ICON_SEARCH: char = '\u{F52A}';
pub const ICON_X_LG: char = '\u{F659}';
pub const ICON_FILM: char = '\u{F3A9}';

pub fn icon(icon_char: char) -> iced::widget::Text<'static> {
    text(icon_char.to_string()).font(iced::Font {
        family: iced::font::Family::Name("bootstrap-icons"),
        ..Default::default()
    })
}

pub fn hidden_scrollbar_style(
    _theme: &iced::Theme,
    _status: scrollable::Status,
) -> scrollable::Style {
    let transparent_rail = scrollable::Rail {
        background: None,
        border: Border::default(),
        scroller: scrollable::Scroller {
            background: iced::Background::Color(Color::TRANSPARENT),
            border: Border::default(),
        },
    };
    scrollable::Style {
        container: container::Style::default(),
        vertical_rail: transparent_rail.clone(),
        horizontal_rail: transparent_rail,
        gap: None,
        auto_scroll: scrollable::AutoScroll {
            background: iced::Background::Color(Color::TRANSPARENT),
            border: Border::default(),
            shadow: Shadow::default(),
            icon: Color::TRANSPARENT,
        },
    }
}

impl Reelgrid {
    /// Everything below the window chrome, in the same order the pieces
    /// stack visually: search, live results, filter, tabs or grid.
    pub fn view_main_content(&self) -> Element<'_, Message> {
        let mut content = column![self.view_logo(), self.view_search_area()]
            .spacing(16)
            .padding(Padding::new(24.0).left(48.0).right(48.0))
            .width(Length::Fill);

        if let Some(error) = &self.error_message {
            content = content.push(self.view_error_banner(error));
        }

        if self.mode == Mode::Search && self.live_results.is_empty() {
            content = content.push(
                container(text("No results found.").size(16).color(TEXT_GRAY))
                    .width(Length::Fill)
                    .center_x(Length::Fill),
            );
        }

        if self.mode == Mode::Search && !self.live_results.is_empty() {
            content = content.push(self.movie_grid(&self.live_results));
        }

        content = content.push(
            container(self.view_filter_toggle())
                .width(Length::Fill)
                .center_x(Length::Fill),
        );

        if self.mode == Mode::Tabs {
            content = content.push(self.view_browse_tabs());
        }

        if self.show_filter {
            content = content.push(self.view_filter_bar());
        }

        if matches!(self.mode, Mode::Search | Mode::Filter | Mode::Trending) {
            content = content.push(self.view_grid_heading());
            content = content.push(self.movie_grid(&self.movies));
            content = content.push(pagination_controls(&self.pages, Message::PageSelected));
        }

        scrollable(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .style(hidden_scrollbar_style)
            .into()
    }

    pub fn view_logo(&self) -> Element<'_, Message> {
        text("Reelgrid")
            .size(28)
            .color(TEXT_WHITE)
            .font(iced::Font {
                weight: iced::font::Weight::Bold,
                ..Default::default()
            })
            .into()
    }

    fn view_grid_heading(&self) -> Element<'_, Message> {
        let label = match self.mode {
            Mode::Search => "Search Results",
            Mode::Filter => "Filtered Movies",
            _ => "Trending Movies",
        };
        container(
            text(label)
                .size(26)
                .color(TEXT_WHITE)
                .font(iced::Font {
                    weight: iced::font::Weight::Bold,
                    ..Default::default()
                }),
        )
        .width(Length::Fill)
        .center_x(Length::Fill)
        .into()
    }

    fn view_error_banner(&self, error: &str) -> Element<'_, Message> {
        container(
            text(format!("Something went wrong: {}", error))
                .size(14)
                .color(TEXT_WHITE),
        )
        .width(Length::Fill)
        .padding(12)
        .style(|_theme| container::Style {
            background: Some(iced::Background::Color(Color::from_rgb(0.45, 0.11, 0.11))),
            border: Border {
                radius: 8.0.into(),
                ..Default::default()
            },
            ..Default::default()
        })
        .into()
    }

    /// Poster image if it is already cached, otherwise a placeholder
    /// block of the same footprint.
    pub fn poster_or_placeholder(
        &self,
        path: Option<&String>,
        size: crate::tmdb::ImageSize,
        width: f32,
        height: f32,
    ) -> Element<'_, Message> {
        let handle = path.and_then(|p| {
            let url = self.tmdb_client.as_ref()?.image_url(p, size);
            self.image_cache.get(&url).cloned()
        });

        match handle {
            Some(handle) => container(
                iced::widget::image(handle)
                    .width(Length::Fixed(width))
                    .height(Length::Fixed(height))
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
            None => container(icon(ICON_FILM).size(32).color(TEXT_GRAY))
                .width(Length::Fixed(width))
                .height(Length::Fixed(height))
                .center_x(Length::Fill)
                .center_y(Length::Fill)
                .style(|_| container::Style {
                    background: Some(iced::Background::Color(SURFACE_GRAY)),
                    border: Border {
                        radius: 8.0.into(),
                        ..Default::default()
                    },
                    ..Default::default()
                })
                .into(),
        }
    }
}

fn page_number_style(is_current: bool) -> impl Fn(&iced::Theme, button::Status) -> button::Style {
    move |_theme, status| {
        let bg = if is_current {
            ACCENT_BLUE
        } else if matches!(status, button::Status::Hovered) {
            Color::from_rgba(0.231, 0.510, 0.965, 0.2)
        } else {
            Color::TRANSPARENT
        };
        button::Style {
            background: Some(iced::Background::Color(bg)),
            text_color: if is_current { TEXT_WHITE } else { ACCENT_BLUE },
            border: Border {
                color: ACCENT_BLUE,
                width: 1.0,
                radius: 4.0.into(),
            },
            shadow: Shadow::default(),
            snap: false,
        }
    }
}

fn step_button_style() -> impl Fn(&iced::Theme, button::Status) -> button::Style {
    |_theme, status| {
        let bg = match status {
            button::Status::Disabled => Color::from_rgba(0.231, 0.510, 0.965, 0.35),
            button::Status::Hovered => Color::from_rgb(0.161, 0.392, 0.800),
            _ => ACCENT_BLUE,
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
    }
}

/// Windowed page controls: Prev, a first-page shortcut behind an
/// ellipsis, up to five numbered buttons, a last-page shortcut, Next.
pub fn pagination_controls<'a>(
    pages: &PageState,
    on_select: impl Fn(u32) -> Message + Clone + 'a,
) -> Element<'a, Message> {
    let window = page_window(pages.current, pages.total);
    let mut controls = row![].spacing(4).align_y(iced::Alignment::Center);

    let prev = button(text("Prev").size(13).color(TEXT_WHITE))
        .padding(Padding::new(6.0).left(12.0).right(12.0))
        .style(step_button_style())
        .on_press_maybe({
            let on_select = on_select.clone();
            (!pages.at_first()).then(|| on_select(pages.prev()))
        });
    controls = controls.push(prev);

    if window.show_first {
        let on_select = on_select.clone();
        controls = controls.push(
            button(text("1").size(13))
                .padding(Padding::new(6.0).left(12.0).right(12.0))
                .style(page_number_style(false))
                .on_press(on_select(1)),
        );
        if window.leading_ellipsis {
            controls = controls.push(text("...").size(13).color(TEXT_GRAY));
        }
    }

    for page in &window.pages {
        let page = *page;
        let on_select = on_select.clone();
        controls = controls.push(
            button(text(page.to_string()).size(13))
                .padding(Padding::new(6.0).left(12.0).right(12.0))
                .style(page_number_style(page == pages.current))
                .on_press(on_select(page)),
        );
    }

    if window.show_last {
        if window.trailing_ellipsis {
            controls = controls.push(text("...").size(13).color(TEXT_GRAY));
        }
        let on_select = on_select.clone();
        controls = controls.push(
            button(text(pages.total.to_string()).size(13))
                .padding(Padding::new(6.0).left(12.0).right(12.0))
                .style(page_number_style(false))
                .on_press(on_select(pages.total)),
        );
    }

    let next = button(text("Next").size(13).color(TEXT_WHITE))
        .padding(Padding::new(6.0).left(12.0).right(12.0))
        .style(step_button_style())
        .on_press_maybe((!pages.at_last()).then(|| on_select(pages.next())));
    controls = controls.push(next);

    container(column![
        Space::new().height(8),
        container(controls).width(Length::Fill).center_x(Length::Fill)
    ])
    .width(Length::Fill)
    .into()
}
