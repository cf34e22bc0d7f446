use iced::widget::{button, column, container, mouse_area, row, text, text_input, Column};
use iced::{Border, Color, Element, Length, Shadow};

use crate::components::{icon, ICON_SEARCH, ICON_X_LG};
use crate::media::{Message, MovieSummary, SURFACE_GRAY, TEXT_GRAY, TEXT_WHITE};
use crate::tmdb::ImageSize;
use crate::Reelgrid;

const SEARCH_WIDTH: f32 = 420.0;

impl Reelgrid {
    /// Input plus the live suggestion dropdown. The dropdown renders
    /// inline below the field and disappears whenever the suggestion
    /// list is empty, which every submit/clear/select path guarantees.
    pub fn view_search_area(&self) -> Element<'_, Message> {
        let mut area = column![self.view_search_input()].spacing(4);

        if !self.suggestions.is_empty() {
            area = area.push(self.view_suggestion_dropdown());
        }

        container(area.width(Length::Fixed(SEARCH_WIDTH)))
            .width(Length::Fill)
            .center_x(Length::Fill)
            .into()
    }

    fn view_search_input(&self) -> Element<'_, Message> {
        let search_icon = icon(ICON_SEARCH).size(14).color(TEXT_GRAY);

        let input = text_input("Search movies...", &self.search_input)
            .on_input(Message::SearchInputChanged)
            .on_submit(Message::SearchSubmitted)
            .padding(10)
            .size(14)
            .width(Length::Fill)
            .style(|_theme, _status| text_input::Style {
                background: iced::Background::Color(Color::TRANSPARENT),
                border: Border::default(),
                icon: TEXT_GRAY,
                placeholder: TEXT_GRAY,
                value: TEXT_WHITE,
                selection: crate::media::ACCENT_BLUE,
            });

        let mut bar = row![search_icon, input]
            .spacing(8)
            .align_y(iced::Alignment::Center);

        if !self.search_input.is_empty() {
            let clear = button(icon(ICON_X_LG).size(12).color(TEXT_GRAY))
                .padding(6)
                .style(|_theme, status| button::Style {
                    background: Some(iced::Background::Color(Color::TRANSPARENT)),
                    text_color: match status {
                        button::Status::Hovered => TEXT_WHITE,
                        _ => TEXT_GRAY,
                    },
                    border: Border::default(),
                    shadow: Shadow::default(),
                    snap: false,
                })
                .on_press(Message::SearchCleared);
            bar = bar.push(clear);
        }

        container(bar)
            .width(Length::Fill)
            .padding(iced::Padding::new(2.0).left(12.0).right(8.0))
            .style(|_theme| container::Style {
                background: Some(iced::Background::Color(SURFACE_GRAY)),
                border: Border {
                    color: Color::from_rgba(1.0, 1.0, 1.0, 0.15),
                    width: 1.0,
                    radius: 8.0.into(),
                },
                ..Default::default()
            })
            .into()
    }

    fn view_suggestion_dropdown(&self) -> Element<'_, Message> {
        let entries: Vec<Element<'_, Message>> = self
            .suggestions
            .iter()
            .map(|movie| self.view_suggestion_entry(movie))
            .collect();

        container(Column::with_children(entries).width(Length::Fill))
            .width(Length::Fill)
            .style(|_theme| container::Style {
                background: Some(iced::Background::Color(SURFACE_GRAY)),
                border: Border {
                    color: Color::from_rgba(1.0, 1.0, 1.0, 0.15),
                    width: 1.0,
                    radius: 8.0.into(),
                },
                shadow: Shadow {
                    color: Color::from_rgba(0.0, 0.0, 0.0, 0.4),
                    offset: iced::Vector::new(0.0, 6.0),
                    blur_radius: 12.0,
                },
                ..Default::default()
            })
            .into()
    }

    fn view_suggestion_entry(&self, movie: &MovieSummary) -> Element<'_, Message> {
        let thumb =
            self.poster_or_placeholder(movie.poster_path.as_ref(), ImageSize::Thumb, 32.0, 48.0);

        let title = text(movie.title.clone())
            .size(13)
            .color(TEXT_WHITE)
            .wrapping(text::Wrapping::None);

        let entry = container(
            row![thumb, title]
                .spacing(12)
                .align_y(iced::Alignment::Center),
        )
        .width(Length::Fill)
        .padding(8);

        mouse_area(entry)
            .on_press(Message::SuggestionSelected(movie.clone()))
            .into()
    }
}
