use iced::widget::{button, column, container, text, Row};
use iced::{Border, Color, Element, Length, Padding, Shadow};

use crate::components::pagination_controls;
use crate::media::{BrowseCategory, Message, ACCENT_BLUE, TEXT_GRAY, TEXT_WHITE};
use crate::Reelgrid;

impl Reelgrid {
    /// Four fixed categories over one grid. The view owns its category
    /// and page independently of whatever the top-level grid is doing.
    pub fn view_browse_tabs(&self) -> Element<'_, Message> {
        let tab_buttons: Vec<Element<'_, Message>> = BrowseCategory::ALL
            .into_iter()
            .map(|category| self.view_browse_tab_button(category))
            .collect();

        let tabs = container(
            Row::with_children(tab_buttons)
                .spacing(12)
                .align_y(iced::Alignment::Center),
        )
        .width(Length::Fill)
        .center_x(Length::Fill);

        column![
            tabs,
            self.movie_grid(&self.browse_movies),
            pagination_controls(&self.browse_pages, Message::BrowsePageSelected),
        ]
        .spacing(16)
        .width(Length::Fill)
        .into()
    }

    fn view_browse_tab_button(&self, category: BrowseCategory) -> Element<'_, Message> {
        let is_active = self.browse_category == category;

        button(
            text(category.label())
                .size(14)
                .color(TEXT_WHITE)
                .font(iced::Font {
                    weight: iced::font::Weight::Semibold,
                    ..Default::default()
                }),
        )
        .padding(Padding::new(8.0).left(16.0).right(16.0))
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
                text_color: if is_active { TEXT_WHITE } else { TEXT_GRAY },
                border: Border {
                    radius: 6.0.into(),
                    ..Default::default()
                },
                shadow: Shadow::default(),
                snap: false,
            }
        })
        .on_press(Message::BrowseCategorySelected(category))
        .into()
    }
}
