use std::fmt::{self, Write};

use metcast_core::{DaySummary, SessionState};

/// Text rendering of a lookup: place, current conditions, then the strip.
pub fn render(state: &SessionState) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    write_state(&mut out, state).unwrap_or_default();
    out
}

fn write_state(out: &mut impl Write, state: &SessionState) -> fmt::Result {
    if let Some(error) = &state.error {
        writeln!(out, "{error}")?;
    }

    match &state.place {
        Some(place) => writeln!(out, "Værvarsel for: {}", place.label)?,
        None => writeln!(out, "Værvarsel for: Ingen sted søkt opp enda")?,
    }

    if let Some(temperature) = state.display_temperature() {
        writeln!(out, "Nåværende temperatur: {temperature}")?;
    }

    if let Some(speed) = state.current.wind_speed_mps {
        let gust = state.current.wind_gust_mps.map(|g| format!("-{g}")).unwrap_or_default();
        let description = state
            .current
            .wind_description
            .as_deref()
            .map(|d| format!(" ({d})"))
            .unwrap_or_default();
        writeln!(out, "Vind i m/s: {speed}{gust} m/s{description}")?;
    }

    if let Some(icon) = &state.current.icon_ref {
        writeln!(out, "Symbol: {icon}")?;
    }

    let days: Vec<&DaySummary> = state.visible_days().collect();
    if !days.is_empty() {
        writeln!(out)?;
        for day in days {
            writeln!(out, "{}", render_day(day, state))?;
        }
    }

    Ok(())
}

fn render_day(day: &DaySummary, state: &SessionState) -> String {
    let temperature = day.temperature_c.map(|c| state.unit.format(c)).unwrap_or_default();
    let wind = day.wind_speed_mps.map(|w| format!("{w} m/s")).unwrap_or_default();
    let precipitation = day.precipitation_mm.map(|p| format!("{p} mm")).unwrap_or_default();
    let icon = day.icon_ref.as_deref().unwrap_or_default();

    format!("{:<8} {temperature:>7} {wind:>9} {precipitation:>7}  {icon}", day.weekday_label)
        .trim_end()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use metcast_core::{
        Coordinates, CurrentConditions, Event, ResolvedPlace, TemperatureUnit,
    };

    fn searched_state(unit: TemperatureUnit) -> SessionState {
        let state = SessionState::new(unit).apply(Event::SearchRequested { query: "Oslo".into() });
        let token = state.latest_token();
        state
            .apply(Event::CoordinatesResolved {
                token,
                place: ResolvedPlace {
                    coordinates: Coordinates::new(59.91, 10.75),
                    label: "Oslo".into(),
                },
            })
            .apply(Event::ForecastReceived {
                token,
                current: CurrentConditions {
                    temperature_c: Some(4.5),
                    wind_speed_mps: Some(2.6),
                    wind_gust_mps: Some(5.4),
                    wind_description: Some("Svak vind".into()),
                    icon_ref: Some("icons/1.svg".into()),
                },
                days: vec![
                    DaySummary {
                        weekday_label: "Lørdag".into(),
                        temperature_c: Some(5.0),
                        wind_speed_mps: Some(3.2),
                        precipitation_mm: Some(0.4),
                        icon_ref: Some("icons/3.svg".into()),
                    },
                    DaySummary::default(),
                ],
            })
    }

    #[test]
    fn renders_current_conditions_and_strip() {
        let text = render(&searched_state(TemperatureUnit::Celsius));

        assert!(text.contains("Værvarsel for: Oslo"));
        assert!(text.contains("Nåværende temperatur: 4.5 ℃"));
        assert!(text.contains("Vind i m/s: 2.6-5.4 m/s (Svak vind)"));
        assert!(text.contains("Symbol: icons/1.svg"));
        assert!(text.contains("Lørdag"));
        assert!(text.contains("3.2 m/s"));
        assert!(text.contains("0.4 mm"));
        assert_eq!(text.lines().filter(|l| l.contains("m/s")).count(), 2);
    }

    #[test]
    fn fahrenheit_applies_to_current_and_days() {
        let text = render(&searched_state(TemperatureUnit::Fahrenheit));
        assert!(text.contains("Nåværende temperatur: 40 ℉"));
        assert!(text.contains("41 ℉"));
    }

    #[test]
    fn empty_state_shows_placeholder() {
        let text = render(&SessionState::default());
        assert_eq!(text, "Værvarsel for: Ingen sted søkt opp enda\n");
    }

    struct Refusing;

    impl Write for Refusing {
        fn write_str(&mut self, _: &str) -> fmt::Result {
            Err(fmt::Error)
        }
    }

    #[test]
    fn writer_errors_are_propagated() {
        let state = searched_state(TemperatureUnit::Celsius);
        assert!(write_state(&mut Refusing, &state).is_err());

        let mut text = String::new();
        write_state(&mut text, &state).expect("string write");
        assert_eq!(text, render(&state));
    }

    #[test]
    fn inline_error_comes_first() {
        let state = SessionState::default().apply(Event::SearchRequested { query: "x".into() });
        let token = state.latest_token();
        let state = state.apply(Event::ResolutionFailed {
            token,
            error: metcast_core::WeatherError::GeocodingFailed("No results found for 'x'".into()),
        });

        let text = render(&state);
        assert!(text.starts_with("Geocoding failed: No results found for 'x'\n"));
    }
}
