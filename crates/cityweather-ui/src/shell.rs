//! Line-oriented terminal front end.
//!
//! The shell owns both screen models, routes between them and turns input
//! lines into model operations. The binary drives it: feed lines to
//! [`Shell::handle_line`], call [`Shell::poll`] regularly and print
//! [`Shell::render`] when something changed.

use std::sync::Arc;

use cityweather_cities::SortColumn;
use cityweather_weather::UnitSystem;

use crate::app_services::AppServices;
use crate::error_mapping::storage_error;
use crate::models::{CityDetailModel, CityListModel};
use crate::render;
use crate::route::{external_url, Route};

/// A city given either by its 1-based row on the list or by name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CityRef {
    Row(usize),
    Name(String),
}

impl CityRef {
    fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }
        match s.parse::<usize>() {
            Ok(row) if row > 0 => Some(CityRef::Row(row)),
            _ => Some(CityRef::Name(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Scroll,
    ScrollUp,
    Search(String),
    Sort(SortColumn),
    Open(CityRef),
    Web(CityRef),
    Units(UnitSystem),
    ToggleFavorite,
    ListFavorites,
    Go(String),
    Home,
    Help,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        let (verb, arg) = match line.split_once(char::is_whitespace) {
            Some((verb, arg)) => (verb, arg.trim()),
            None => (line, ""),
        };

        match verb.to_lowercase().as_str() {
            "" | "s" | "scroll" => Ok(Command::Scroll),
            "up" => Ok(Command::ScrollUp),
            "search" | "/" => Ok(Command::Search(arg.to_string())),
            "sort" => SortColumn::parse(arg)
                .map(Command::Sort)
                .ok_or_else(|| format!("Unknown column '{}'; use name, country or timezone", arg)),
            "open" => CityRef::parse(arg)
                .map(Command::Open)
                .ok_or_else(|| "Usage: open <row|name>".to_string()),
            "web" => CityRef::parse(arg)
                .map(Command::Web)
                .ok_or_else(|| "Usage: web <row|name>".to_string()),
            "units" => UnitSystem::parse(arg)
                .map(Command::Units)
                .ok_or_else(|| format!("Unknown units '{}'; use metric or imperial", arg)),
            "fav" => Ok(Command::ToggleFavorite),
            "favs" => Ok(Command::ListFavorites),
            "go" => Ok(Command::Go(arg.to_string())),
            "back" | "home" => Ok(Command::Home),
            "help" | "?" => Ok(Command::Help),
            "quit" | "q" | "exit" => Ok(Command::Quit),
            other => Err(format!("Unknown command '{}'; type help", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellAction {
    Continue,
    Quit,
}

pub struct Shell {
    services: Arc<AppServices>,
    route: Route,
    list: CityListModel,
    detail: CityDetailModel,
    /// One-off line shown under the screen (help, usage errors)
    notice: Option<String>,
}

impl Shell {
    pub fn new(services: Arc<AppServices>, start: Route) -> Self {
        let mut shell = Self {
            list: CityListModel::new(services.clone()),
            detail: CityDetailModel::new(services.clone()),
            services,
            route: Route::CityList,
            notice: None,
        };
        shell.navigate(start);
        shell
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn list(&self) -> &CityListModel {
        &self.list
    }

    pub fn detail(&self) -> &CityDetailModel {
        &self.detail
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Switch screens. Entering a screen mounts it afresh; moving between
    /// city pages keeps the detail screen and only changes its city.
    pub fn navigate(&mut self, route: Route) {
        tracing::info!("Navigating to {}", route.path());
        let on_detail = matches!(self.route, Route::CityDetail { .. });
        match &route {
            Route::CityList => self.list.mount(),
            Route::CityDetail { city_name } if on_detail => {
                self.detail.set_city(city_name.clone())
            }
            Route::CityDetail { city_name } => self.detail.mount(city_name.clone()),
            Route::NotFound(path) => tracing::warn!("No route for {}", path),
        }
        self.route = route;
    }

    pub fn handle_line(&mut self, line: &str) -> ShellAction {
        match Command::parse(line) {
            Ok(cmd) => self.handle(cmd),
            Err(message) => {
                self.notice = Some(message);
                ShellAction::Continue
            }
        }
    }

    pub fn handle(&mut self, cmd: Command) -> ShellAction {
        self.notice = None;

        match cmd {
            Command::Quit => return ShellAction::Quit,
            Command::Help => self.notice = Some(render::help().to_string()),
            Command::Home => self.navigate(Route::CityList),
            Command::Go(path) => self.navigate(Route::parse(&path)),
            Command::Open(city) => match self.resolve(&city) {
                Some(name) => self.navigate(Route::city(name)),
                None => self.notice = Some(format!("No city at {:?}", city)),
            },
            Command::Web(city) => match self.resolve(&city) {
                Some(name) => self.open_external(&name),
                None => self.notice = Some(format!("No city at {:?}", city)),
            },
            Command::Scroll => {
                if self.on_list() {
                    self.list.on_scroll();
                }
            }
            Command::ScrollUp => {
                if self.on_list() {
                    self.list.scroll_up();
                }
            }
            Command::Search(term) => {
                if self.on_list() {
                    self.list.search(&term);
                }
            }
            Command::Sort(column) => {
                if self.on_list() {
                    self.list.toggle_sort(column);
                }
            }
            Command::Units(units) => {
                if self.on_detail() {
                    self.detail.set_units(units);
                }
            }
            Command::ToggleFavorite => {
                if self.on_detail() && self.detail.toggle_favorite().is_none() {
                    self.notice = Some("No city to add to favorites".to_string());
                }
            }
            Command::ListFavorites => self.notice = Some(self.favorites_summary()),
        }

        ShellAction::Continue
    }

    /// Apply finished background work. Returns whether the screen changed.
    pub fn poll(&mut self) -> bool {
        let list_changed = self.list.poll_channel();
        let detail_changed = self.detail.poll_channel();

        match self.route {
            Route::CityList => list_changed,
            Route::CityDetail { .. } => detail_changed,
            Route::NotFound(_) => false,
        }
    }

    pub fn render(&self) -> String {
        let mut screen = match &self.route {
            Route::CityList => render::city_list(&self.list),
            Route::CityDetail { .. } => render::city_detail(&self.detail),
            Route::NotFound(path) => render::not_found(path),
        };

        if let Some(notice) = &self.notice {
            screen.push('\n');
            screen.push_str(notice);
            if !notice.ends_with('\n') {
                screen.push('\n');
            }
        }
        screen
    }

    /// Favorites as currently stored, independent of the open screen.
    fn favorites_summary(&self) -> String {
        match self.services.favorites().load() {
            Ok(favorites) if favorites.is_empty() => "No favorite cities yet".to_string(),
            Ok(favorites) => format!(
                "Favorites: {}",
                favorites.iter().collect::<Vec<_>>().join(", ")
            ),
            Err(e) => {
                tracing::error!("Failed to load favorites: {}", e);
                storage_error(&e, false).user_message().to_string()
            }
        }
    }

    fn on_list(&mut self) -> bool {
        let on_list = self.route == Route::CityList;
        if !on_list {
            self.notice = Some("Only available on the city list".to_string());
        }
        on_list
    }

    fn on_detail(&mut self) -> bool {
        let on_detail = matches!(self.route, Route::CityDetail { .. });
        if !on_detail {
            self.notice = Some("Only available on a city page".to_string());
        }
        on_detail
    }

    /// Rows refer to the list; names are taken literally.
    fn resolve(&self, city: &CityRef) -> Option<String> {
        match city {
            CityRef::Row(row) => self.list.city_at(row - 1).map(|c| c.name.clone()),
            CityRef::Name(name) => Some(name.clone()),
        }
    }

    fn open_external(&mut self, city: &str) {
        let url = external_url(&self.services.config().ui.external_site_host, city);
        tracing::info!("Opening {}", url);
        if let Err(e) = webbrowser::open(&url) {
            tracing::error!("Failed to open {}: {}", url, e);
        }
        self.notice = Some(format!("Opened {}", url));
    }
}
