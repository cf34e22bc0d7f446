use std::path::{Path, PathBuf};

use iced::widget::{button, column, container, row, text, text_input, Space};
use iced::{Alignment, Element, Length};
use serde::{Deserialize, Serialize};

use crate::media::{ACCENT_BLUE, BACKGROUND_DARK, TEXT_GRAY, TEXT_WHITE};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppSettings {
    pub api_key: String,
    pub language: String,
}

impl AppSettings {
    pub fn config_path() -> Option<PathBuf> {
        std::env::var("HOME").ok().map(|home| {
            PathBuf::from(home)
                .join(".config")
                .join("reelgrid")
                .join("config.json")
        })
    }

    /// `TMDB_API_KEY` (usually via `.env`) takes precedence over the
    /// config file, so the setup page never blocks scripted runs.
    pub fn load() -> Option<Self> {
        if let Ok(api_key) = std::env::var("TMDB_API_KEY") {
            if !api_key.trim().is_empty() {
                return Some(Self {
                    api_key: api_key.trim().to_string(),
                    language: std::env::var("TMDB_LANGUAGE")
                        .unwrap_or_else(|_| String::from("en-US")),
                });
            }
        }
        Self::load_from(&Self::config_path()?)
    }

    fn load_from(path: &Path) -> Option<Self> {
        let content = std::fs::read_to_string(path).ok()?;
        serde_json::from_str(&content).ok()
    }

    pub fn save(&self) -> Result<(), String> {
        let path = Self::config_path().ok_or("Could not determine config path")?;
        self.save_to(&path)
    }

    fn save_to(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| e.to_string())?;
        }
        let content = serde_json::to_string_pretty(self).map_err(|e| e.to_string())?;
        std::fs::write(path, content).map_err(|e| e.to_string())
    }

    pub fn is_valid(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

#[derive(Debug, Clone)]
pub enum SetupMessage {
    ApiKeyChanged(String),
    LanguageChanged(String),
    Submit,
}

pub struct SetupPage {
    pub api_key: String,
    pub language: String,
    pub error: Option<String>,
}

impl Default for SetupPage {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            language: String::from("en-US"),
            error: None,
        }
    }
}

impl SetupPage {
    pub fn update(&mut self, message: SetupMessage) -> Option<AppSettings> {
        match message {
            SetupMessage::ApiKeyChanged(key) => {
                self.api_key = key;
                self.error = None;
                None
            }
            SetupMessage::LanguageChanged(lang) => {
                self.language = lang;
                None
            }
            SetupMessage::Submit => {
                if self.api_key.trim().is_empty() {
                    self.error = Some(String::from("API key is required"));
                    return None;
                }
                let settings = AppSettings {
                    api_key: self.api_key.trim().to_string(),
                    language: if self.language.trim().is_empty() {
                        String::from("en-US")
                    } else {
                        self.language.trim().to_string()
                    },
                };
                if let Err(e) = settings.save() {
                    self.error = Some(format!("Failed to save: {}", e));
                    return None;
                }
                Some(settings)
            }
        }
    }

    pub fn view(&self) -> Element<'_, SetupMessage> {
        let logo = text("REELGRID").size(44).color(ACCENT_BLUE).font(iced::Font {
            weight: iced::font::Weight::Bold,
            ..Default::default()
        });

        let title = text("Browse movies, trailers and people").size(22).color(TEXT_WHITE);
        let subtitle = text("A TMDB API key is needed before anything can load")
            .size(14)
            .color(TEXT_GRAY);

        let api_label = text("TMDB API Key").size(14).color(TEXT_WHITE);
        let api_hint = text("Free keys are issued at themoviedb.org/settings/api")
            .size(12)
            .color(TEXT_GRAY);
        let api_input = text_input("Paste your API key...", &self.api_key)
            .on_input(SetupMessage::ApiKeyChanged)
            .on_submit(SetupMessage::Submit)
            .padding(12)
            .size(14)
            .width(Length::Fill);

        let lang_label = text("Language").size(14).color(TEXT_WHITE);
        let lang_input = text_input("en-US", &self.language)
            .on_input(SetupMessage::LanguageChanged)
            .on_submit(SetupMessage::Submit)
            .padding(12)
            .size(14)
            .width(Length::Fill);

        let submit_button = button(text("Start browsing").size(16).color(TEXT_WHITE))
            .padding([12, 32])
            .style(|_theme, status| {
                let bg = match status {
                    button::Status::Hovered => iced::Color::from_rgb(0.161, 0.392, 0.800),
                    _ => ACCENT_BLUE,
                };
                button::Style {
                    background: Some(iced::Background::Color(bg)),
                    text_color: TEXT_WHITE,
                    border: iced::Border::default().rounded(4),
                    ..Default::default()
                }
            })
            .on_press(SetupMessage::Submit);

        let error_text = if let Some(ref err) = self.error {
            text(err).size(14).color(iced::Color::from_rgb(0.9, 0.3, 0.3))
        } else {
            text("").size(14)
        };

        let spacer = || Space::new().height(16);
        let small_spacer = || Space::new().height(4);

        let form = column![
            logo,
            spacer(),
            title,
            small_spacer(),
            subtitle,
            spacer(),
            spacer(),
            api_label,
            small_spacer(),
            api_hint,
            small_spacer(),
            api_input,
            spacer(),
            lang_label,
            small_spacer(),
            lang_input,
            spacer(),
            error_text,
            small_spacer(),
            row![submit_button].width(Length::Fill),
        ]
        .width(Length::Fixed(400.0))
        .align_x(Alignment::Start);

        container(form)
            .width(Length::Fill)
            .height(Length::Fill)
            .center_x(Length::Fill)
            .center_y(Length::Fill)
            .style(|_theme| container::Style {
                background: Some(iced::Background::Color(BACKGROUND_DARK)),
                ..Default::default()
            })
            .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_round_trip_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let settings = AppSettings {
            api_key: String::from("abc123"),
            language: String::from("de-DE"),
        };
        settings.save_to(&path).unwrap();

        let loaded = AppSettings::load_from(&path).unwrap();
        assert_eq!(loaded.api_key, "abc123");
        assert_eq!(loaded.language, "de-DE");
    }

    #[test]
    fn load_from_missing_or_garbled_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(AppSettings::load_from(&dir.path().join("absent.json")).is_none());

        let path = dir.path().join("bad.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(AppSettings::load_from(&path).is_none());
    }

    #[test]
    fn setup_page_rejects_blank_key() {
        let mut page = SetupPage::default();
        assert!(page.update(SetupMessage::ApiKeyChanged(String::from("   "))).is_none());
        assert!(page.update(SetupMessage::Submit).is_none());
        assert!(page.error.is_some());
    }

    #[test]
    fn validity_requires_nonblank_key() {
        assert!(!AppSettings::default().is_valid());
        let settings = AppSettings {
            api_key: String::from("k"),
            language: String::new(),
        };
        assert!(settings.is_valid());
    }
}
