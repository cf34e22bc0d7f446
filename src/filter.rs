use iced::widget::{button, container, pick_list, row, text, text_input};
use iced::{Border, Color, Element, Length, Padding, Shadow};

use crate::media::{Message, ACCENT_BLUE, TEXT_GRAY, TEXT_WHITE};
use crate::Reelgrid;

impl Reelgrid {
    pub fn view_filter_toggle(&self) -> Element<'_, Message> {
        let label = if self.show_filter {
            "Hide Filter"
        } else {
            "Show Filter"
        };

        button(text(label).size(14).color(TEXT_WHITE))
            .padding(Padding::new(8.0).left(16.0).right(16.0))
            .style(|_theme, status| {
                let bg = match status {
                    button::Status::Hovered => Color::from_rgb(0.435, 0.249, 0.749),
                    _ => Color::from_rgb(0.545, 0.361, 0.965),
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
            .on_press(Message::FilterToggled)
            .into()
    }

    pub fn view_filter_bar(&self) -> Element<'_, Message> {
        let mut options: Vec<String> = vec![String::from("All Genres")];
        options.extend(self.genre_list.iter().map(|g| g.name.clone()));

        let selected = self
            .selected_genre
            .and_then(|id| self.genre_list.iter().find(|g| g.id == id))
            .map(|g| g.name.clone())
            .unwrap_or_else(|| String::from("All Genres"));

        let genre_list = self.genre_list.clone();
        let genre_dropdown = pick_list(options, Some(selected), move |choice| {
            let genre_id = if choice == "All Genres" {
                None
            } else {
                genre_list.iter().find(|g| g.name == choice).map(|g| g.id)
            };
            Message::FilterGenreSelected(genre_id)
        })
        .text_size(13)
        .padding(Padding::new(8.0).left(12.0).right(12.0))
        .style(|_, _| pick_list::Style {
            text_color: TEXT_WHITE,
            placeholder_color: TEXT_GRAY,
            handle_color: TEXT_WHITE,
            background: iced::Background::Color(Color::from_rgba(1.0, 1.0, 1.0, 0.1)),
            border: Border {
                color: Color::from_rgba(1.0, 1.0, 1.0, 0.2),
                width: 1.0,
                radius: 4.0.into(),
            },
        });

        let year_input = text_input("Year", &self.year_input)
            .on_input(Message::FilterYearChanged)
            .padding(8)
            .size(13)
            .width(Length::Fixed(90.0))
            .style(|_theme: &iced::Theme, _status| text_input::Style {
                background: iced::Background::Color(Color::from_rgba(1.0, 1.0, 1.0, 0.1)),
                border: Border {
                    color: Color::from_rgba(1.0, 1.0, 1.0, 0.2),
                    width: 1.0,
                    radius: 4.0.into(),
                },
                icon: TEXT_GRAY,
                placeholder: TEXT_GRAY,
                value: TEXT_WHITE,
                selection: ACCENT_BLUE,
            });

        let mut bar = row![genre_dropdown, year_input]
            .spacing(16)
            .align_y(iced::Alignment::Center);

        // only offered once there is something to clear
        if self.selected_genre.is_some() || !self.year_input.is_empty() {
            let clear = button(text("Clear").size(13).color(TEXT_WHITE))
                .padding(Padding::new(8.0).left(16.0).right(16.0))
                .style(|_theme, status| {
                    let bg_alpha = if matches!(status, button::Status::Hovered) {
                        0.25
                    } else {
                        0.15
                    };
                    button::Style {
                        background: Some(iced::Background::Color(Color::from_rgba(
                            1.0, 1.0, 1.0, bg_alpha,
                        ))),
                        text_color: TEXT_WHITE,
                        border: Border {
                            radius: 4.0.into(),
                            ..Default::default()
                        },
                        shadow: Shadow::default(),
                        snap: false,
                    }
                })
                .on_press(Message::FilterCleared);
            bar = bar.push(clear);
        }

        container(bar)
            .width(Length::Fill)
            .center_x(Length::Fill)
            .padding(Padding::new(12.0))
            .style(|_theme| container::Style {
                background: Some(iced::Background::Color(Color::from_rgba(
                    1.0, 1.0, 1.0, 0.05,
                ))),
                border: Border {
                    color: Color::from_rgba(1.0, 1.0, 1.0, 0.1),
                    width: 1.0,
                    radius: 8.0.into(),
                },
                ..Default::default()
            })
            .into()
    }
}
