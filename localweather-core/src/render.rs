use std::fmt::{self, Display, Formatter};

use crate::{
    model::{CurrentWeather, HistoryEntry},
    state::ViewState,
};

pub const NO_HISTORY: &str = "No historical data available.";

/// Text rendering of the two panels and the current error, if any.
pub fn render(state: &ViewState) -> String {
    View(state).to_string()
}

struct View<'a>(&'a ViewState);

impl Display for View<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let state = self.0;

        writeln!(f, "Weather App")?;
        if let Some(error) = state.error() {
            writeln!(f, "! {error}")?;
        }

        writeln!(f, "\nToday's Weather")?;
        if let Some(current) = state.current() {
            write_current(f, current)?;
        }

        writeln!(f, "\nHistorical Weather (Last 5 Days)")?;
        write_history(f, state.history())
    }
}

fn write_current(f: &mut Formatter<'_>, current: &CurrentWeather) -> fmt::Result {
    writeln!(f, "  Temperature: {} °C", current.temperature)?;
    writeln!(f, "  Weather: {}", current.description)?;
    writeln!(f, "  Humidity: {}%", current.humidity)?;
    writeln!(f, "  Wind Speed: {} m/s", current.wind_speed)?;
    writeln!(f, "  City: {}", current.place_name())
}

fn write_history(f: &mut Formatter<'_>, history: &[HistoryEntry]) -> fmt::Result {
    if history.is_empty() {
        return writeln!(f, "  {NO_HISTORY}");
    }

    for day in history {
        writeln!(f, "  {}: {} °C, {}", day.date, day.temperature, day.description)?;
        writeln!(f, "    Humidity: {}% | Wind Speed: {} m/s", day.humidity, day.wind_speed)?;
    }

    Ok(())
}
