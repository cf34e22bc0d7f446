mod browse;
mod cards;
mod components;
mod detail_handlers;
mod detail_popup;
mod detail_sections;
mod filter;
mod handlers;
mod media;
mod pagination;
mod person;
mod search;
mod settings;
mod tmdb;

use std::time::Instant;

use iced::widget::container;
use iced::{Element, Font, Length, Size, Subscription, Task, Theme};
use tracing_subscriber::EnvFilter;

use media::{
    BrowseCategory, DetailState, FilterSelection, Genre, ImageCache, Message, Mode, MovieSummary,
    PersonViewState, BACKGROUND_DARK,
};
use pagination::PageState;
use settings::{AppSettings, SetupPage};
use tmdb::TmdbClient;

pub struct Reelgrid {
    pub setup_page: Option<SetupPage>,
    pub tmdb_client: Option<TmdbClient>,

    // top-level grid: mode decides which dataset fills it
    pub mode: Mode,
    pub movies: Vec<MovieSummary>,
    pub pages: PageState,
    pub query: String,
    pub filter: FilterSelection,
    pub error_message: Option<String>,

    // search bar
    pub search_input: String,
    pub suggestions: Vec<MovieSummary>,
    pub live_results: Vec<MovieSummary>,
    pub search_debounce: Option<Instant>,

    // filter bar
    pub show_filter: bool,
    pub genre_list: Vec<Genre>,
    pub selected_genre: Option<u64>,
    pub year_input: String,
    pub filter_debounce: Option<Instant>,

    // tabbed browse, paginated independently of the grid above
    pub browse_category: BrowseCategory,
    pub browse_movies: Vec<MovieSummary>,
    pub browse_pages: PageState,

    // modal layers
    pub detail_stack: Vec<DetailState>,
    pub person_view: Option<PersonViewState>,

    pub image_cache: ImageCache,
}

impl Default for Reelgrid {
    fn default() -> Self {
        Self {
            setup_page: None,
            tmdb_client: None,
            mode: Mode::default(),
            movies: Vec::new(),
            pages: PageState::default(),
            query: String::new(),
            filter: FilterSelection::default(),
            error_message: None,
            search_input: String::new(),
            suggestions: Vec::new(),
            live_results: Vec::new(),
            search_debounce: None,
            show_filter: false,
            genre_list: Vec::new(),
            selected_genre: None,
            year_input: String::new(),
            filter_debounce: None,
            browse_category: BrowseCategory::default(),
            browse_movies: Vec::new(),
            browse_pages: PageState::default(),
            detail_stack: Vec::new(),
            person_view: None,
            image_cache: ImageCache::new(),
        }
    }
}

impl Reelgrid {
    fn new() -> (Self, Task<Message>) {
        let settings = match AppSettings::load() {
            Some(s) if s.is_valid() => s,
            _ => {
                return (
                    Self {
                        setup_page: Some(SetupPage::default()),
                        ..Default::default()
                    },
                    Task::none(),
                );
            }
        };

        let client = TmdbClient::from_settings(&settings);
        let app = Self {
            tmdb_client: Some(client),
            ..Default::default()
        };
        let task = handlers::initial_load(&app);
        (app, task)
    }

    fn initialize_with_settings(&mut self, settings: AppSettings) -> Task<Message> {
        self.tmdb_client = Some(TmdbClient::from_settings(&settings));
        self.setup_page = None;
        handlers::initial_load(self)
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        if let Message::Setup(setup_msg) = message {
            if let Some(ref mut setup) = self.setup_page {
                if let Some(settings) = setup.update(setup_msg) {
                    return self.initialize_with_settings(settings);
                }
            }
            return Task::none();
        }
        handlers::handle_message(self, message)
    }

    fn view(&self) -> Element<'_, Message> {
        if let Some(ref setup) = self.setup_page {
            return setup.view().map(Message::Setup);
        }

        let main_content = container(self.view_main_content())
            .width(Length::Fill)
            .height(Length::Fill)
            .style(|_theme| container::Style {
                background: Some(iced::Background::Color(BACKGROUND_DARK)),
                ..Default::default()
            });

        // a person layer only exists visually once its fetch resolved
        let person_visible = self
            .person_view
            .as_ref()
            .is_some_and(|view| view.person.is_some());

        if self.detail_stack.is_empty() && !person_visible {
            return main_content.into();
        }

        let mut layers: Vec<Element<'_, Message>> = vec![main_content.into()];
        let top = self.detail_stack.len().saturating_sub(1);
        for (index, layer) in self.detail_stack.iter().enumerate() {
            layers.push(self.view_detail_overlay(layer, index == top));
        }
        if person_visible {
            if let Some(person) = &self.person_view {
                layers.push(self.view_person_overlay(person));
            }
        }

        iced::widget::Stack::with_children(layers)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    fn theme(&self) -> Theme {
        Theme::Dark
    }

    fn subscription(&self) -> Subscription<Message> {
        if self.search_debounce.is_some() || self.filter_debounce.is_some() {
            iced::time::every(std::time::Duration::from_millis(50)).map(|_| Message::DebounceTick)
        } else {
            Subscription::none()
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

fn main() -> iced::Result {
    init_tracing();
    if let Err(e) = dotenvy::dotenv() {
        tracing::debug!("no .env file loaded ({e}); using config file settings");
    }

    iced::application(Reelgrid::new, Reelgrid::update, Reelgrid::view)
        .title("Reelgrid")
        .theme(Reelgrid::theme)
        .window_size(Size::new(1280.0, 800.0))
        .font(iced_fonts::BOOTSTRAP_FONT_BYTES)
        .default_font(Font::DEFAULT)
        .subscription(Reelgrid::subscription)
        .run()
}
