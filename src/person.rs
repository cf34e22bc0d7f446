use iced::widget::{button, column, container, mouse_area, row, text, Column, Row, Space};
use iced::{Border, Color, Element, Length, Padding, Shadow};

use crate::components::{icon, ICON_X_LG};
use crate::media::{Message, PersonViewState, SURFACE_GRAY, TEXT_GRAY, TEXT_WHITE};
use crate::tmdb::ImageSize;
use crate::Reelgrid;

pub const KNOWN_FOR_LIMIT: usize = 10;

const POPUP_WIDTH: f32 = 640.0;

impl Reelgrid {
    /// Rendered only once the person details have resolved; the caller
    /// skips the overlay entirely while the fetch is in flight.
    pub fn view_person_overlay<'a>(&'a self, view: &'a PersonViewState) -> Element<'a, Message> {
        let Some(person) = &view.person else {
            return Space::new().into();
        };

        let portrait = self.poster_or_placeholder(
            person.profile_path.as_ref(),
            ImageSize::Profile,
            150.0,
            225.0,
        );

        let mut bio = column![text(person.name.clone())
            .size(20)
            .color(TEXT_WHITE)
            .font(iced::Font {
                weight: iced::font::Weight::Bold,
                ..Default::default()
            })]
        .spacing(6);

        if !person.known_for_department.is_empty() {
            bio = bio.push(
                text(person.known_for_department.clone())
                    .size(13)
                    .color(TEXT_GRAY),
            );
        }

        let biography = if person.biography.is_empty() {
            String::from("No biography available.")
        } else {
            person.biography.clone()
        };
        bio = bio.push(
            text(biography)
                .size(13)
                .color(TEXT_GRAY)
                .wrapping(text::Wrapping::Word),
        );

        if let Some(birthday) = &person.birthday {
            bio = bio.push(self.meta_text("Born", birthday.clone()));
        }
        if let Some(place) = &person.place_of_birth {
            bio = bio.push(self.meta_text("Place", place.clone()));
        }

        let mut content = column![row![portrait, bio.width(Length::Fill)]
            .spacing(16)
            .align_y(iced::Alignment::Start)]
        .spacing(16)
        .padding(Padding::new(24.0));

        if !view.known_for.is_empty() {
            content = content.push(
                text("Known For")
                    .size(16)
                    .color(TEXT_WHITE)
                    .font(iced::Font {
                        weight: iced::font::Weight::Semibold,
                        ..Default::default()
                    }),
            );

            let mut rows: Vec<Element<'_, Message>> = Vec::new();
            for chunk in view.known_for.chunks(5) {
                let tiles: Vec<Element<'_, Message>> = chunk
                    .iter()
                    .map(|movie| self.poster_tile(movie, ImageSize::Profile, 100.0, 150.0, false))
                    .collect();
                rows.push(Row::with_children(tiles).spacing(12).into());
            }
            content = content.push(Column::with_children(rows).spacing(12));
        }

        let close = button(icon(ICON_X_LG).size(14).color(TEXT_WHITE))
            .padding(8)
            .style(|_theme, status| {
                let bg = match status {
                    button::Status::Hovered => Color::from_rgba(1.0, 1.0, 1.0, 0.25),
                    _ => Color::from_rgba(0.0, 0.0, 0.0, 0.5),
                };
                button::Style {
                    background: Some(iced::Background::Color(bg)),
                    text_color: TEXT_WHITE,
                    border: Border {
                        radius: 14.0.into(),
                        ..Default::default()
                    },
                    shadow: Shadow::default(),
                    snap: false,
                }
            })
            .on_press(Message::PersonClosed);

        let close_row = container(close)
            .width(Length::Fill)
            .align_x(iced::alignment::Horizontal::Right)
            .padding(10);

        let popup = container(iced::widget::stack![
            iced::widget::scrollable(content)
                .height(Length::Fill)
                .style(crate::components::hidden_scrollbar_style),
            close_row
        ])
        .width(Length::Fixed(POPUP_WIDTH))
        .max_width(POPUP_WIDTH)
        .clip(true)
        .style(|_theme| container::Style {
            background: Some(iced::Background::Color(SURFACE_GRAY)),
            border: Border {
                radius: 16.0.into(),
                ..Default::default()
            },
            shadow: Shadow {
                color: Color::from_rgba(0.0, 0.0, 0.0, 0.5),
                offset: iced::Vector::new(0.0, 25.0),
                blur_radius: 50.0,
            },
            ..Default::default()
        });

        let backdrop = mouse_area(
            container(Space::new().width(Length::Fill).height(Length::Fill))
                .width(Length::Fill)
                .height(Length::Fill)
                .style(|_theme| container::Style {
                    background: Some(iced::Background::Color(Color::from_rgba(
                        0.0, 0.0, 0.0, 0.7,
                    ))),
                    ..Default::default()
                }),
        )
        .on_press(Message::PersonClosed);

        let centered = container(mouse_area(popup))
            .width(Length::Fill)
            .height(Length::Fill)
            .center_x(Length::Fill)
            .padding(Padding::new(60.0));

        iced::widget::stack![backdrop, centered]
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    fn meta_text(&self, label: &str, value: String) -> Element<'_, Message> {
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
}
