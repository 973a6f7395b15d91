//! Plain-text screens for the terminal shell.

use std::fmt::Write;

use cityweather_cities::{SortColumn, SortDirection};
use cityweather_weather::{DetailStatus, UnitSystem};

use crate::models::{CityDetailModel, CityListModel};

pub const LOADING: &str = "Loading...";
pub const HOME_LINK: &str = "Return to homepage";

const NAME_WIDTH: usize = 32;
const COUNTRY_WIDTH: usize = 28;

pub fn city_list(model: &CityListModel) -> String {
    let state = model.state();
    let mut out = String::new();

    let _ = writeln!(out, "Cities");
    let _ = writeln!(out, "Search: {}", state.search_term());
    let _ = writeln!(out);

    let header = |column: SortColumn| -> String {
        match state.sort() {
            Some(order) if order.column == column => {
                let arrow = match order.direction {
                    SortDirection::Ascending => "▲",
                    SortDirection::Descending => "▼",
                };
                format!("{} {}", column.title(), arrow)
            }
            _ => column.title().to_string(),
        }
    };

    let _ = writeln!(
        out,
        "{:>5}  {:<NAME_WIDTH$} {:<COUNTRY_WIDTH$} {}",
        "#",
        header(SortColumn::Name),
        header(SortColumn::Country),
        header(SortColumn::Timezone),
    );

    for (index, city) in model.window() {
        let _ = writeln!(
            out,
            "{:>5}  {:<NAME_WIDTH$} {:<COUNTRY_WIDTH$} {}",
            index + 1,
            city.name,
            city.country,
            city.timezone,
        );
    }

    if state.show_loading_indicator() {
        let _ = writeln!(out, "{}", LOADING);
    }

    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "{} shown of {} loaded{}",
        state.filtered().len(),
        state.cities().len(),
        if state.has_more() { "" } else { " (end of list)" }
    );

    out
}

pub fn city_detail(model: &CityDetailModel) -> String {
    let state = model.state();
    let mut out = String::new();

    let _ = writeln!(out, "< {}", HOME_LINK);
    let _ = writeln!(out);

    match state.status() {
        DetailStatus::Loading => {
            let _ = writeln!(out, "{}", LOADING);
        }
        DetailStatus::Failed(_) => {
            let _ = writeln!(
                out,
                "{}",
                model
                    .error_message()
                    .unwrap_or("Error fetching weather data. Please try again later.")
            );
        }
        DetailStatus::Ready(report) => {
            let snapshot = &report.snapshot;
            let units = report.units;

            let _ = writeln!(
                out,
                "Weather for {}    [{}]",
                report.city,
                model.favorite_label()
            );
            if report.resolved_name != report.city {
                let _ = writeln!(out, "({})", report.resolved_name);
            }
            let _ = writeln!(out);

            if let Some(icon) = snapshot.icon() {
                let _ = writeln!(out, "{}  {}", icon.glyph(), icon.icon_name());
            }
            let _ = writeln!(out, "Temperature: {}", snapshot.temperature_display(units));
            let _ = writeln!(out, "Description: {}", snapshot.description);
            let _ = writeln!(out, "Humidity: {}", snapshot.humidity_display());
            let _ = writeln!(out, "Wind Speed: {}", snapshot.wind_speed_display(units));
            let _ = writeln!(out, "Pressure: {}", snapshot.pressure_display());
            let _ = writeln!(
                out,
                "Coordinates: {:.2}, {:.2}",
                report.coordinates.latitude, report.coordinates.longitude
            );
            let _ = writeln!(
                out,
                "Updated: {}",
                report.fetched_at.format("%Y-%m-%d %H:%M:%S UTC")
            );
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "{}", unit_buttons(state.units()));

    if let Some(notice) = model.storage_notice() {
        let _ = writeln!(out, "{}", notice);
    }

    out
}

pub fn not_found(path: &str) -> String {
    format!("404 - No page at {}\n\n< {}\n", path, HOME_LINK)
}

pub fn help() -> &'static str {
    "\
Commands:
  scroll | s            load more cities (list)
  up                    scroll back (list)
  search <term>         filter loaded cities by name; empty clears
  sort <column>         name, country or timezone; repeat to cycle
  open <row|name>       show weather for a city
  web <row|name>        open the city on the external weather site
  units <metric|imperial>
  fav                   add or remove the current city from favorites
  favs                  list favorite cities
  go <path>             navigate to a path such as /city/Paris
  back | home           return to the city list
  help                  show this help
  quit | q              exit
"
}

/// `[Celsius] [Fahrenheit]` with the active one marked.
fn unit_buttons(active: UnitSystem) -> String {
    [UnitSystem::Metric, UnitSystem::Imperial]
        .iter()
        .map(|units| {
            if *units == active {
                format!("[*{}]", units.button_label())
            } else {
                format!("[{}]", units.button_label())
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_buttons_mark_active() {
        assert_eq!(unit_buttons(UnitSystem::Metric), "[*Celsius] [Fahrenheit]");
        assert_eq!(unit_buttons(UnitSystem::Imperial), "[Celsius] [*Fahrenheit]");
    }

    #[test]
    fn test_not_found_links_home() {
        let page = not_found("/nowhere");
        assert!(page.contains("404"));
        assert!(page.contains(HOME_LINK));
    }
}
