use iced::widget::{column, container, mouse_area, text, Column, Row};
use iced::{Border, Color, Element, Length, Shadow};

use crate::media::{Message, MovieSummary, SURFACE_GRAY, STAR_YELLOW, TEXT_GRAY, TEXT_WHITE};
use crate::tmdb::ImageSize;
use crate::Reelgrid;

const CARDS_PER_ROW: usize = 4;
const CARD_WIDTH: f32 = 220.0;
const POSTER_HEIGHT: f32 = 320.0;

impl Reelgrid {
    pub fn movie_grid(&self, movies: &[MovieSummary]) -> Element<'_, Message> {
        let mut rows: Vec<Element<'_, Message>> = Vec::new();

        for chunk in movies.chunks(CARDS_PER_ROW) {
            let row_cards: Vec<Element<'_, Message>> =
                chunk.iter().map(|movie| self.movie_card(movie)).collect();
            rows.push(
                Row::with_children(row_cards)
                    .spacing(16)
                    .align_y(iced::Alignment::Start)
                    .into(),
            );
        }

        container(
            Column::with_children(rows)
                .spacing(16)
                .align_x(iced::Alignment::Center),
        )
        .width(Length::Fill)
        .center_x(Length::Fill)
        .into()
    }

    fn movie_card(&self, movie: &MovieSummary) -> Element<'_, Message> {
        let poster = self.poster_or_placeholder(
            movie.poster_path.as_ref(),
            ImageSize::Grid,
            CARD_WIDTH,
            POSTER_HEIGHT,
        );

        let title = text(movie.title.clone())
            .size(15)
            .color(TEXT_WHITE)
            .font(iced::Font {
                weight: iced::font::Weight::Semibold,
                ..Default::default()
            })
            .wrapping(text::Wrapping::Word);

        let rating = text(format!("★ {:.1}", movie.vote_average))
            .size(13)
            .color(STAR_YELLOW);

        let card = container(
            column![poster, column![title, rating].spacing(4).padding(10.0)]
                .width(Length::Fixed(CARD_WIDTH)),
        )
        .style(|_| container::Style {
            background: Some(iced::Background::Color(SURFACE_GRAY)),
            border: Border {
                radius: 8.0.into(),
                ..Default::default()
            },
            shadow: Shadow {
                color: Color::from_rgba(0.0, 0.0, 0.0, 0.3),
                offset: iced::Vector::new(0.0, 4.0),
                blur_radius: 8.0,
            },
            ..Default::default()
        });

        mouse_area(card)
            .on_press(Message::MovieSelected(movie.clone()))
            .into()
    }

    /// Smaller poster tiles used by the related tab and the person
    /// view, where a full card would crowd the modal.
    pub fn poster_tile(
        &self,
        movie: &MovieSummary,
        size: ImageSize,
        width: f32,
        height: f32,
        clickable: bool,
    ) -> Element<'_, Message> {
        let poster = self.poster_or_placeholder(movie.poster_path.as_ref(), size, width, height);
        let title = container(
            text(movie.title.clone())
                .size(12)
                .color(TEXT_GRAY)
                .wrapping(text::Wrapping::Word),
        )
        .width(Length::Fixed(width))
        .center_x(Length::Fill);

        let tile = column![poster, title].spacing(4);
        if clickable {
            mouse_area(tile)
                .on_press(Message::MovieSelected(movie.clone()))
                .into()
        } else {
            tile.into()
        }
    }
}
