use chrono::NaiveDate;
use iced::widget::{button, column, container, mouse_area, scrollable, text, Row, Space};
use iced::{Border, Color, Element, Length, Padding, Shadow};

use crate::components::{hidden_scrollbar_style, icon, ICON_X_LG};
use crate::media::{
    DetailState, DetailTab, Message, ACCENT_BLUE, SURFACE_GRAY, TEXT_GRAY, TEXT_WHITE,
};
use crate::Reelgrid;

const POPUP_WIDTH: f32 = 780.0;

/// "1999-03-30" rendered the way a person would say it. Anything that
/// does not parse passes through untouched.
pub fn format_release_date(date: &str) -> String {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map(|d| d.format("%B %-d, %Y").to_string())
        .unwrap_or_else(|_| date.to_string())
}

pub fn format_currency(amount: u64) -> String {
    let grouped = amount
        .to_string()
        .as_bytes()
        .rchunks(3)
        .rev()
        .map(|chunk| std::str::from_utf8(chunk).unwrap())
        .collect::<Vec<_>>()
        .join(",");
    format!("${}", grouped)
}

pub fn format_runtime(minutes: u32) -> String {
    match (minutes / 60, minutes % 60) {
        (0, m) => format!("{}m", m),
        (h, 0) => format!("{}h", h),
        (h, m) => format!("{}h {}m", h, m),
    }
}

pub fn format_rating(vote_average: f32, vote_count: u32) -> String {
    format!("★ {:.1} ({} votes)", vote_average, vote_count)
}

fn popup_container_style(_theme: &iced::Theme) -> container::Style {
    container::Style {
        background: Some(iced::Background::Color(SURFACE_GRAY)),
        border: Border {
            color: Color::TRANSPARENT,
            width: 0.0,
            radius: 16.0.into(),
        },
        shadow: Shadow {
            color: Color::from_rgba(0.0, 0.0, 0.0, 0.5),
            offset: iced::Vector::new(0.0, 25.0),
            blur_radius: 50.0,
        },
        ..Default::default()
    }
}

impl Reelgrid {
    /// One modal layer. Only the top layer wires up its background and
    /// close button; covered layers still render underneath.
    pub fn view_detail_overlay<'a>(
        &'a self,
        layer: &'a DetailState,
        is_top: bool,
    ) -> Element<'a, Message> {
        let body = column![
            self.view_detail_tab_bar(layer),
            scrollable(
                container(self.view_detail_tab_body(layer)).padding(Padding::new(24.0).top(8.0))
            )
            .height(Length::Fill)
            .style(hidden_scrollbar_style),
        ]
        .spacing(4);

        let popup_with_close = iced::widget::stack![body, self.view_detail_close_button()]
            .width(Length::Fixed(POPUP_WIDTH))
            .height(Length::Fill);

        let popup = container(popup_with_close)
            .max_width(POPUP_WIDTH)
            .clip(true)
            .style(popup_container_style);

        let backdrop = container(Space::new().width(Length::Fill).height(Length::Fill))
            .width(Length::Fill)
            .height(Length::Fill)
            .style(|_theme| container::Style {
                background: Some(iced::Background::Color(Color::from_rgba(0.0, 0.0, 0.0, 0.8))),
                ..Default::default()
            });

        let backdrop: Element<'_, Message> = if is_top {
            mouse_area(backdrop).on_press(Message::DetailClosed).into()
        } else {
            backdrop.into()
        };

        let centered_popup = container(mouse_area(popup))
            .width(Length::Fill)
            .height(Length::Fill)
            .center_x(Length::Fill)
            .padding(Padding::new(40.0));

        iced::widget::stack![backdrop, centered_popup]
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    fn view_detail_close_button(&self) -> Element<'_, Message> {
        let close = button(icon(ICON_X_LG).size(16).color(TEXT_WHITE))
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
                        radius: 16.0.into(),
                        ..Default::default()
                    },
                    shadow: Shadow::default(),
                    snap: false,
                }
            })
            .on_press(Message::DetailClosed);

        container(close)
            .width(Length::Fill)
            .align_x(iced::alignment::Horizontal::Right)
            .padding(12)
            .into()
    }

    fn view_detail_tab_bar<'a>(&'a self, layer: &'a DetailState) -> Element<'a, Message> {
        let tabs: Vec<Element<'_, Message>> = DetailTab::ALL
            .into_iter()
            .map(|tab| {
                let is_active = layer.tab == tab;
                let label = text(tab.label())
                    .size(14)
                    .color(if is_active { ACCENT_BLUE } else { TEXT_GRAY })
                    .font(iced::Font {
                        weight: iced::font::Weight::Semibold,
                        ..Default::default()
                    });

                let content: Element<'_, Message> = if is_active {
                    let underline =
                        container(Space::new().width(Length::Fill).height(2)).style(|_theme| {
                            container::Style {
                                background: Some(iced::Background::Color(ACCENT_BLUE)),
                                ..Default::default()
                            }
                        });
                    column![label, underline].spacing(4).into()
                } else {
                    label.into()
                };

                button(content)
                    .padding(Padding::new(8.0).left(12.0).right(12.0))
                    .style(|_theme, _status| button::Style {
                        background: Some(iced::Background::Color(Color::TRANSPARENT)),
                        text_color: TEXT_WHITE,
                        border: Border::default(),
                        shadow: Shadow::default(),
                        snap: false,
                    })
                    .on_press(Message::DetailTabSelected(tab))
                    .into()
            })
            .collect();

        container(Row::with_children(tabs).spacing(8))
            .width(Length::Fill)
            .padding(Padding::new(16.0).bottom(0.0).right(64.0))
            .into()
    }

    fn view_detail_tab_body<'a>(&'a self, layer: &'a DetailState) -> Element<'a, Message> {
        match layer.tab {
            DetailTab::Details => self.view_details_tab(layer),
            DetailTab::Trailer => self.view_trailer_tab(layer),
            DetailTab::Reviews => self.view_reviews_tab(layer),
            DetailTab::CastCrew => self.view_cast_crew_tab(layer),
            DetailTab::Related => self.view_related_tab(layer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn release_dates_render_long_form() {
        assert_eq!(format_release_date("1999-03-30"), "March 30, 1999");
        assert_eq!(format_release_date("2024-01-05"), "January 5, 2024");
        // unparseable input passes through
        assert_eq!(format_release_date("soon"), "soon");
    }

    #[test]
    fn currency_groups_thousands() {
        assert_eq!(format_currency(0), "$0");
        assert_eq!(format_currency(950), "$950");
        assert_eq!(format_currency(63000000), "$63,000,000");
        assert_eq!(format_currency(1234567), "$1,234,567");
    }

    #[test]
    fn runtime_splits_hours_and_minutes() {
        assert_eq!(format_runtime(45), "45m");
        assert_eq!(format_runtime(120), "2h");
        assert_eq!(format_runtime(136), "2h 16m");
    }
}
