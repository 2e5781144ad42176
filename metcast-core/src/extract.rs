//! Pulls per-day summaries and current conditions out of a forecast document.
//!
//! Target instants are built naively: the UTC calendar date of
//! `reference + days_ahead` joined with the requested hour and a literal `Z`,
//! then compared to each entry's `valid_from` text. The feed publishes every
//! timestamp in UTC, so no zone conversion is applied to the hour itself.

use chrono::{DateTime, Datelike, Days, NaiveDate, TimeZone, Utc, Weekday};

use crate::{
    model::{
        CurrentConditions, DaySummary, ForecastDocument, HourOfDay, InstantReading,
        IntervalReading, TimeEntry,
    },
    symbols::SymbolCatalog,
};

/// `YYYY-MM-DDTHH:MM:00Z` for the given date and hour.
pub fn target_instant(date: NaiveDate, hour: HourOfDay) -> String {
    format!("{}T{hour}:00Z", date.format("%Y-%m-%d"))
}

/// Norwegian weekday name, capitalized.
pub fn weekday_label(date: NaiveDate) -> &'static str {
    match date.weekday() {
        Weekday::Mon => "Mandag",
        Weekday::Tue => "Tirsdag",
        Weekday::Wed => "Onsdag",
        Weekday::Thu => "Torsdag",
        Weekday::Fri => "Fredag",
        Weekday::Sat => "Lørdag",
        Weekday::Sun => "Søndag",
    }
}

/// `None` when the shifted date falls outside chrono's range or on a
/// nonexistent local time.
fn shift_days<Tz: TimeZone>(reference: &DateTime<Tz>, days_ahead: u32) -> Option<DateTime<Tz>> {
    reference.clone().checked_add_days(Days::new(u64::from(days_ahead)))
}

/// Summary for the slot at `hour`, `days_ahead` days after `reference`.
///
/// Never fails: a document without a matching instant yields
/// [`DaySummary::default`], whose empty weekday label marks "no data".
pub fn extract<Tz: TimeZone>(
    doc: &ForecastDocument,
    hour: HourOfDay,
    days_ahead: u32,
    reference: &DateTime<Tz>,
    icons: &SymbolCatalog,
) -> DaySummary {
    let Some(shifted) = shift_days(reference, days_ahead) else {
        tracing::debug!(days_ahead, "Target date out of range");
        return DaySummary::default();
    };
    let target = target_instant(shifted.with_timezone(&Utc).date_naive(), hour);

    let Some((index, instant)) = find_instant(doc, &target) else {
        tracing::debug!(%target, "No forecast entry for slot");
        return DaySummary::default();
    };

    let interval = paired_interval(doc, index);

    DaySummary {
        weekday_label: weekday_label(shifted.date_naive()).to_string(),
        temperature_c: instant.temperature_c,
        wind_speed_mps: instant.wind_speed_mps,
        precipitation_mm: interval.and_then(|r| r.precipitation_mm),
        icon_ref: interval
            .and_then(|r| r.symbol_code)
            .and_then(|code| icons.resolve(code)),
    }
}

/// First instant entry whose `valid_from` equals `target`; scan order wins ties.
fn find_instant<'a>(doc: &'a ForecastDocument, target: &str) -> Option<(usize, &'a InstantReading)> {
    doc.entries.iter().enumerate().find_map(|(i, entry)| match entry.instant() {
        Some(reading) if entry.valid_from == target => Some((i, reading)),
        _ => None,
    })
}

/// Interval reading for the instant at `index`: the next entry when it is an
/// interval, else the first interval sharing the instant's `valid_from`.
fn paired_interval(doc: &ForecastDocument, index: usize) -> Option<&IntervalReading> {
    if let Some(next) = doc.entries.get(index + 1).and_then(TimeEntry::interval) {
        return Some(next);
    }

    let valid_from = &doc.entries.get(index)?.valid_from;
    doc.entries
        .iter()
        .filter(|e| &e.valid_from == valid_from)
        .find_map(TimeEntry::interval)
}

/// First temperature, wind and symbol in document order.
pub fn current_conditions(doc: &ForecastDocument, icons: &SymbolCatalog) -> CurrentConditions {
    let instants = || doc.entries.iter().filter_map(TimeEntry::instant);

    CurrentConditions {
        temperature_c: instants().find_map(|r| r.temperature_c),
        wind_speed_mps: instants().find_map(|r| r.wind_speed_mps),
        wind_gust_mps: instants().find_map(|r| r.wind_gust_mps),
        wind_description: instants().find_map(|r| r.wind_description.clone()),
        icon_ref: doc
            .entries
            .iter()
            .filter_map(TimeEntry::interval)
            .find_map(|r| r.symbol_code)
            .and_then(|code| icons.resolve(code)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        model::Reading,
        symbols::{SymbolEntry, DEFAULT_ICON_TEMPLATE},
    };
    use chrono::{Duration, FixedOffset};

    fn instant(from: &str, temperature: f64, wind: f64) -> TimeEntry {
        TimeEntry {
            valid_from: from.to_string(),
            valid_to: from.to_string(),
            reading: Reading::Instant(InstantReading {
                temperature_c: Some(temperature),
                wind_speed_mps: Some(wind),
                wind_gust_mps: None,
                wind_description: Some("Svak vind".into()),
            }),
        }
    }

    fn interval(from: &str, to: &str, symbol: u32, precipitation: f64) -> TimeEntry {
        TimeEntry {
            valid_from: from.to_string(),
            valid_to: to.to_string(),
            reading: Reading::Interval(IntervalReading {
                symbol_code: Some(symbol),
                precipitation_mm: Some(precipitation),
            }),
        }
    }

    fn march_doc() -> ForecastDocument {
        ForecastDocument::new(vec![
            instant("2024-03-02T11:00:00Z", 4.0, 2.0),
            interval("2024-03-02T11:00:00Z", "2024-03-02T12:00:00Z", 1, 0.0),
            instant("2024-03-02T12:00:00Z", 5.0, 3.2),
            interval("2024-03-02T12:00:00Z", "2024-03-02T13:00:00Z", 3, 0.4),
        ])
    }

    /// 2024-03-01 20:00 at UTC-5, which is already 2024-03-02 in UTC.
    fn evening_before() -> DateTime<FixedOffset> {
        FixedOffset::west_opt(5 * 3600)
            .expect("valid offset")
            .with_ymd_and_hms(2024, 3, 1, 20, 0, 0)
            .single()
            .expect("unambiguous")
    }

    fn utc(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).single().expect("unambiguous")
    }

    #[test]
    fn target_instant_is_naive_concatenation() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 2).expect("date");
        assert_eq!(target_instant(date, HourOfDay::noon()), "2024-03-02T12:00:00Z");
    }

    #[test]
    fn weekday_labels_are_norwegian() {
        let friday = NaiveDate::from_ymd_opt(2024, 3, 1).expect("date");
        assert_eq!(weekday_label(friday), "Fredag");
        assert_eq!(weekday_label(friday + Duration::days(1)), "Lørdag");
        assert_eq!(weekday_label(friday + Duration::days(2)), "Søndag");
    }

    #[test]
    fn empty_document_yields_empty_summary_for_every_offset() {
        let doc = ForecastDocument::default();
        for days in 0..5 {
            let summary = extract(&doc, HourOfDay::noon(), days, &utc(2024, 3, 1, 8), &SymbolCatalog::default());
            assert_eq!(summary, DaySummary::default());
            assert!(summary.is_empty());
        }
    }

    #[test]
    fn reads_instant_and_following_interval() {
        let summary = extract(&march_doc(), HourOfDay::noon(), 0, &evening_before(), &SymbolCatalog::default());

        assert_eq!(summary.weekday_label, "Fredag");
        assert_eq!(summary.temperature_c, Some(5.0));
        assert_eq!(summary.wind_speed_mps, Some(3.2));
        assert_eq!(summary.precipitation_mm, Some(0.4));
        assert_eq!(
            summary.icon_ref.as_deref(),
            Some(DEFAULT_ICON_TEMPLATE.replace("{symbol}", "3").as_str())
        );
    }

    #[test]
    fn days_ahead_moves_target_and_label() {
        let summary = extract(&march_doc(), HourOfDay::noon(), 1, &utc(2024, 3, 1, 8), &SymbolCatalog::default());
        assert_eq!(summary.weekday_label, "Lørdag");
        assert_eq!(summary.temperature_c, Some(5.0));

        let summary = extract(&march_doc(), HourOfDay::noon(), 2, &utc(2024, 3, 1, 8), &SymbolCatalog::default());
        assert!(summary.is_empty());
    }

    #[test]
    fn out_of_range_offset_yields_empty_summary() {
        let summary = extract(
            &march_doc(),
            HourOfDay::noon(),
            u32::MAX,
            &utc(2024, 3, 1, 8),
            &SymbolCatalog::default(),
        );
        assert_eq!(summary, DaySummary::default());

        let empty = extract(
            &ForecastDocument::default(),
            HourOfDay::noon(),
            u32::MAX,
            &utc(2024, 3, 1, 8),
            &SymbolCatalog::default(),
        );
        assert!(empty.is_empty());
    }

    /// Only the icon depends on the catalog. Precipitation is read from the
    /// paired interval and is kept even when the symbol is uncatalogued
    /// (see "Unknown symbol" in DESIGN.md).
    #[test]
    fn unknown_symbol_leaves_icon_empty() {
        let catalog = SymbolCatalog::from_entries(
            "/icons",
            vec![SymbolEntry { symbol_id: 1, filename: "sun.svg".into() }],
        );
        let summary = extract(&march_doc(), HourOfDay::noon(), 0, &evening_before(), &catalog);

        assert_eq!(summary.icon_ref, None);
        assert_eq!(summary.temperature_c, Some(5.0));
        assert_eq!(summary.precipitation_mm, Some(0.4));
    }

    #[test]
    fn last_entry_match_leaves_interval_fields_empty() {
        let doc = ForecastDocument::new(vec![
            interval("2024-03-02T11:00:00Z", "2024-03-02T12:00:00Z", 1, 0.0),
            instant("2024-03-02T12:00:00Z", 5.0, 3.2),
        ]);
        let summary = extract(&doc, HourOfDay::noon(), 1, &utc(2024, 3, 1, 8), &SymbolCatalog::default());

        assert_eq!(summary.temperature_c, Some(5.0));
        assert_eq!(summary.precipitation_mm, None);
        assert_eq!(summary.icon_ref, None);
    }

    #[test]
    fn first_matching_entry_wins() {
        let doc = ForecastDocument::new(vec![
            instant("2024-03-02T12:00:00Z", 5.0, 3.2),
            interval("2024-03-02T12:00:00Z", "2024-03-02T13:00:00Z", 3, 0.4),
            instant("2024-03-02T12:00:00Z", -1.0, 9.0),
            interval("2024-03-02T12:00:00Z", "2024-03-02T13:00:00Z", 9, 7.0),
        ]);
        let summary = extract(&doc, HourOfDay::noon(), 1, &utc(2024, 3, 1, 8), &SymbolCatalog::default());
        assert_eq!(summary.temperature_c, Some(5.0));
        assert_eq!(summary.precipitation_mm, Some(0.4));
    }

    #[test]
    fn reordered_interval_is_paired_by_valid_from() {
        let doc = ForecastDocument::new(vec![
            interval("2024-03-02T12:00:00Z", "2024-03-02T18:00:00Z", 9, 2.5),
            instant("2024-03-02T12:00:00Z", 5.0, 3.2),
            instant("2024-03-02T13:00:00Z", 6.0, 3.0),
        ]);
        let summary = extract(&doc, HourOfDay::noon(), 1, &utc(2024, 3, 1, 8), &SymbolCatalog::default());
        assert_eq!(summary.precipitation_mm, Some(2.5));
        assert!(summary.icon_ref.is_some());
    }

    #[test]
    fn interval_entry_alone_is_not_a_match() {
        let doc = ForecastDocument::new(vec![interval(
            "2024-03-02T12:00:00Z",
            "2024-03-02T13:00:00Z",
            3,
            0.4,
        )]);
        let summary = extract(&doc, HourOfDay::noon(), 1, &utc(2024, 3, 1, 8), &SymbolCatalog::default());
        assert!(summary.is_empty());
    }

    #[test]
    fn extraction_is_repeatable() {
        let doc = march_doc();
        let icons = SymbolCatalog::default();
        let first = extract(&doc, HourOfDay::noon(), 0, &evening_before(), &icons);
        let second = extract(&doc, HourOfDay::noon(), 0, &evening_before(), &icons);
        assert_eq!(first, second);
    }

    #[test]
    fn current_conditions_take_first_readings() {
        let mut doc = march_doc();
        if let Reading::Instant(r) = &mut doc.entries[2].reading {
            r.wind_gust_mps = Some(6.1);
        }
        let current = current_conditions(&doc, &SymbolCatalog::default());

        assert_eq!(current.temperature_c, Some(4.0));
        assert_eq!(current.wind_speed_mps, Some(2.0));
        assert_eq!(current.wind_gust_mps, Some(6.1));
        assert_eq!(current.wind_description.as_deref(), Some("Svak vind"));
        assert_eq!(
            current.icon_ref.as_deref(),
            Some(DEFAULT_ICON_TEMPLATE.replace("{symbol}", "1").as_str())
        );
    }

    #[test]
    fn current_conditions_of_empty_document_are_empty() {
        let current = current_conditions(&ForecastDocument::default(), &SymbolCatalog::default());
        assert_eq!(current, CurrentConditions::default());
    }
}
