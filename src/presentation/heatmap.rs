// Calendar heatmap rendering (SVG)
use crate::domain::traffic::TrafficRecord;
use chrono::{DateTime, Datelike, Duration, NaiveDate};
use std::collections::BTreeMap;
use std::fmt::Write;

const CELL: i64 = 12;
const STEP: i64 = 15;
const LEFT: i64 = 30;
const TOP: i64 = 18;
const LEVELS: u8 = 4;

const LIGHT_PALETTE: [&str; 5] = ["#ebedf0", "#9be9a8", "#40c463", "#30a14e", "#216e39"];
const DARK_PALETTE: [&str; 5] = ["#161b22", "#0e4429", "#006d32", "#26a641", "#39d353"];

/// Day of a record, from an RFC 3339 timestamp or a leading `YYYY-MM-DD`.
pub fn record_date(timestamp: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(timestamp) {
        return Some(dt.naive_utc().date());
    }
    timestamp
        .get(..10)
        .and_then(|day| NaiveDate::parse_from_str(day, "%Y-%m-%d").ok())
}

/// Sums counts per day, skipping records without a readable date.
pub fn daily_counts(records: &[TrafficRecord]) -> BTreeMap<NaiveDate, u64> {
    let mut days = BTreeMap::new();
    for record in records {
        match record_date(&record.timestamp) {
            Some(day) => {
                let total: &mut u64 = days.entry(day).or_default();
                *total = total.saturating_add(record.count);
            }
            None => tracing::warn!(
                "Skipping record {} with unreadable timestamp {:?}",
                record.id,
                record.timestamp
            ),
        }
    }
    days
}

/// Intensity 0..=4 of a day relative to the busiest day.
pub fn intensity(count: u64, max: u64) -> u8 {
    if count == 0 || max == 0 {
        return 0;
    }
    let scaled = (count as u128 * LEVELS as u128).div_ceil(max as u128);
    scaled.clamp(1, LEVELS as u128) as u8
}

pub fn render_heatmap(records: &[TrafficRecord], dark: bool) -> String {
    let palette = if dark { &DARK_PALETTE } else { &LIGHT_PALETTE };
    let ink = if dark { "#8b949e" } else { "#57606a" };

    let days = daily_counts(records);
    let (Some((&first, _)), Some((&last, _))) = (days.first_key_value(), days.last_key_value())
    else {
        return r#"<div class="heatmap heatmap-empty"><p>No clone traffic recorded yet.</p></div>"#
            .to_string();
    };

    let max = days.values().copied().max().unwrap_or(0);
    let start = first - Duration::days(first.weekday().num_days_from_sunday() as i64);
    let weeks = (last - start).num_days() / 7 + 1;
    let width = LEFT + weeks * STEP;
    let height = TOP + 7 * STEP;

    let mut svg = String::new();
    let _ = write!(
        svg,
        r#"<svg class="heatmap-calendar" role="img" aria-label="Daily clones" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
    );

    for (row, label) in [(1, "Mon"), (3, "Wed"), (5, "Fri")] {
        let _ = write!(
            svg,
            r#"<text x="0" y="{y}" font-size="9" fill="{ink}">{label}</text>"#,
            y = TOP + row * STEP + CELL - 2
        );
    }

    let mut previous_month = None;
    for week in 0..weeks {
        let week_start = start + Duration::weeks(week);
        let x = LEFT + week * STEP;

        if previous_month != Some(week_start.month()) {
            previous_month = Some(week_start.month());
            let _ = write!(
                svg,
                r#"<text x="{x}" y="{y}" font-size="9" fill="{ink}">{month}</text>"#,
                y = TOP - 6,
                month = week_start.format("%b")
            );
        }

        for weekday in 0..7 {
            let day = week_start + Duration::days(weekday);
            if day < first || day > last {
                continue;
            }
            let count = days.get(&day).copied().unwrap_or(0);
            let level = intensity(count, max);
            let _ = write!(
                svg,
                r#"<rect class="day" x="{x}" y="{y}" width="{CELL}" height="{CELL}" rx="2" fill="{fill}" data-date="{day}" data-level="{level}"><title>{day}: {count} clones</title></rect>"#,
                y = TOP + weekday * STEP,
                fill = palette[level as usize],
            );
        }
    }
    svg.push_str("</svg>");

    let mut legend = String::from(r#"<div class="heatmap-legend"><span>Less</span>"#);
    for color in palette {
        let _ = write!(legend, r#"<span class="swatch" style="background:{color}"></span>"#);
    }
    legend.push_str("<span>More</span></div>");

    format!(r#"<div class="heatmap">{svg}{legend}</div>"#)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Map;

    fn record(id: &str, timestamp: &str, count: u64) -> TrafficRecord {
        TrafficRecord {
            id: id.to_string(),
            timestamp: timestamp.to_string(),
            count,
            uniques: 1,
            extra: Map::new(),
        }
    }

    #[test]
    fn test_record_date_formats() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(record_date("2024-03-09T00:00:00Z"), Some(day));
        assert_eq!(record_date("2024-03-09T23:30:00-02:00"), NaiveDate::from_ymd_opt(2024, 3, 10));
        assert_eq!(record_date("2024-03-09"), Some(day));
        assert_eq!(record_date("yesterday"), None);
        assert_eq!(record_date(""), None);
    }

    #[test]
    fn test_intensity_levels() {
        assert_eq!(intensity(0, 10), 0);
        assert_eq!(intensity(1, 10), 1);
        assert_eq!(intensity(5, 10), 2);
        assert_eq!(intensity(8, 10), 4);
        assert_eq!(intensity(10, 10), 4);
        assert_eq!(intensity(3, 0), 0);
    }

    #[test]
    fn test_same_day_counts_are_summed() {
        let records = vec![
            record("a", "2024-01-01T00:00:00Z", 2),
            record("b", "2024-01-01T12:00:00Z", 3),
            record("c", "not a date", 9),
        ];
        let days = daily_counts(&records);
        assert_eq!(days.len(), 1);
        assert_eq!(days.values().next(), Some(&5));
    }

    #[test]
    fn test_one_cell_per_day_in_range() {
        let records = vec![
            record("a", "2024-01-01T00:00:00Z", 4),
            record("b", "2024-01-03T00:00:00Z", 1),
            record("c", "2024-01-10T00:00:00Z", 2),
        ];

        let html = render_heatmap(&records, false);

        assert_eq!(html.matches("<rect class=\"day\"").count(), 10);
        assert!(html.contains("<title>2024-01-01: 4 clones</title>"));
        assert!(html.contains("<title>2024-01-02: 0 clones</title>"));
        assert!(html.contains(r#"data-date="2024-01-01" data-level="4""#));
        assert!(html.contains(LIGHT_PALETTE[4]));
    }

    #[test]
    fn test_dark_palette() {
        let html = render_heatmap(&[record("a", "2024-01-01", 1)], true);
        assert!(html.contains(DARK_PALETTE[4]));
        assert!(!html.contains(LIGHT_PALETTE[4]));
    }

    #[test]
    fn test_empty_state() {
        let html = render_heatmap(&[], false);
        assert!(html.contains("heatmap-empty"));
        assert!(!html.contains("<svg"));
    }
}
