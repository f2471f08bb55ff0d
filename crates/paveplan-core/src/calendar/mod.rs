//! Calendar interchange-text parsing for blackout import.
//!
//! Parses ICS-style text (BEGIN:VEVENT blocks with SUMMARY, DTSTART, DTEND,
//! CATEGORIES, and RRULE) into [`CalendarEvent`]s and expands weekly/daily
//! recurrences into concrete occurrences. The parser is permissive: malformed
//! events are skipped, unknown properties ignored, and naive timestamps
//! treated as UTC. It never errors; empty extraction is an empty list.

pub mod import;

pub use import::{extract_blackout_drafts, ImportOptions, ImportResult};

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};

/// A single event parsed from calendar text.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarEvent {
    pub summary: String,
    pub categories: Vec<String>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub recurrence: Option<Recurrence>,
}

/// Recurrence frequency. Only the frequencies a blackout schedule needs are
/// recognized; anything else is treated as non-recurring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frequency {
    Daily,
    Weekly,
}

/// Parsed RRULE subset.
#[derive(Debug, Clone, PartialEq)]
pub struct Recurrence {
    pub freq: Frequency,
    pub interval: u32,
    pub count: Option<u32>,
    pub until: Option<DateTime<Utc>>,
}

/// Parse calendar text into events. Events missing DTSTART or DTEND are
/// dropped.
pub fn parse_calendar(text: &str) -> Vec<CalendarEvent> {
    let mut events = Vec::new();
    let mut current: Option<EventBuilder> = None;

    for line in unfold_lines(text) {
        let line = line.trim_end();
        if line.eq_ignore_ascii_case("BEGIN:VEVENT") {
            current = Some(EventBuilder::default());
            continue;
        }
        if line.eq_ignore_ascii_case("END:VEVENT") {
            if let Some(builder) = current.take() {
                if let Some(event) = builder.build() {
                    events.push(event);
                }
            }
            continue;
        }
        let Some(builder) = current.as_mut() else {
            continue;
        };
        let Some((name, value)) = split_property(line) else {
            continue;
        };
        match name.as_str() {
            "SUMMARY" => builder.summary = Some(value.to_string()),
            "CATEGORIES" => {
                builder.categories = value
                    .split(',')
                    .map(|c| c.trim().to_string())
                    .filter(|c| !c.is_empty())
                    .collect();
            }
            "DTSTART" => builder.start = parse_ics_datetime(value),
            "DTEND" => builder.end = parse_ics_datetime(value),
            "RRULE" => builder.recurrence = parse_rrule(value),
            _ => {}
        }
    }

    events
}

/// Expand an event into concrete `(start, end)` occurrences.
///
/// Expansion is anchored at DTSTART so identical input text always yields
/// identical occurrences. COUNT and UNTIL bind tighter than the caller's
/// `max_occurrences` cap; non-recurring events yield a single occurrence.
pub fn expand_occurrences(
    event: &CalendarEvent,
    max_occurrences: u32,
) -> Vec<(DateTime<Utc>, DateTime<Utc>)> {
    let duration = event.end - event.start;
    let Some(recurrence) = &event.recurrence else {
        return vec![(event.start, event.end)];
    };

    let interval = recurrence.interval.max(1) as i64;
    let step = match recurrence.freq {
        Frequency::Daily => Duration::days(interval),
        Frequency::Weekly => Duration::weeks(interval),
    };
    let cap = recurrence
        .count
        .map_or(max_occurrences, |c| c.min(max_occurrences))
        .max(1);

    let mut occurrences = Vec::new();
    let mut start = event.start;
    for _ in 0..cap {
        if let Some(until) = recurrence.until {
            if start > until {
                break;
            }
        }
        occurrences.push((start, start + duration));
        start += step;
    }
    occurrences
}

#[derive(Default)]
struct EventBuilder {
    summary: Option<String>,
    categories: Vec<String>,
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
    recurrence: Option<Recurrence>,
}

impl EventBuilder {
    fn build(self) -> Option<CalendarEvent> {
        Some(CalendarEvent {
            summary: self.summary.unwrap_or_default(),
            categories: self.categories,
            start: self.start?,
            end: self.end?,
            recurrence: self.recurrence,
        })
    }
}

/// Join folded continuation lines (leading space or tab) to their parent.
fn unfold_lines(text: &str) -> Vec<String> {
    let mut unfolded: Vec<String> = Vec::new();
    for raw in text.lines() {
        if let Some(rest) = raw.strip_prefix(' ').or_else(|| raw.strip_prefix('\t')) {
            if let Some(last) = unfolded.last_mut() {
                last.push_str(rest);
                continue;
            }
        }
        unfolded.push(raw.to_string());
    }
    unfolded
}

/// Split `NAME;PARAM=X:VALUE` into the bare uppercase name and the value.
fn split_property(line: &str) -> Option<(String, &str)> {
    let (name_part, value) = line.split_once(':')?;
    let name = name_part
        .split(';')
        .next()
        .unwrap_or(name_part)
        .trim()
        .to_ascii_uppercase();
    Some((name, value.trim()))
}

/// Accepted forms: `YYYYMMDDTHHMMSSZ`, `YYYYMMDDTHHMMSS` (naive, read as
/// UTC), and date-only `YYYYMMDD` (midnight).
fn parse_ics_datetime(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.len() == 8 {
        let date = NaiveDate::parse_from_str(value, "%Y%m%d").ok()?;
        return Some(date.and_hms_opt(0, 0, 0)?.and_utc());
    }
    let naive = value.strip_suffix('Z').unwrap_or(value);
    NaiveDateTime::parse_from_str(naive, "%Y%m%dT%H%M%S")
        .ok()
        .map(|dt| dt.and_utc())
}

fn parse_rrule(value: &str) -> Option<Recurrence> {
    let mut freq = None;
    let mut interval = 1u32;
    let mut count = None;
    let mut until = None;

    for part in value.split(';') {
        let Some((key, val)) = part.split_once('=') else {
            continue;
        };
        match key.trim().to_ascii_uppercase().as_str() {
            "FREQ" => {
                freq = match val.trim().to_ascii_uppercase().as_str() {
                    "DAILY" => Some(Frequency::Daily),
                    "WEEKLY" => Some(Frequency::Weekly),
                    _ => return None,
                }
            }
            "INTERVAL" => interval = val.trim().parse().unwrap_or(1),
            "COUNT" => count = val.trim().parse().ok(),
            "UNTIL" => until = parse_ics_datetime(val),
            _ => {}
        }
    }

    freq.map(|freq| Recurrence {
        freq,
        interval,
        count,
        until,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const SERVICE_ICS: &str = "BEGIN:VCALENDAR\n\
PRODID:-//Campus//Calendar//EN\n\
BEGIN:VEVENT\n\
SUMMARY:Sunday Worship\n\
\x20Service\n\
CATEGORIES:worship,service\n\
DTSTART:20250601T090000Z\n\
DTEND:20250601T120000Z\n\
RRULE:FREQ=WEEKLY;COUNT=3\n\
END:VEVENT\n\
BEGIN:VEVENT\n\
SUMMARY:Board meeting\n\
DTSTART;TZID=America/Chicago:20250603T180000\n\
DTEND;TZID=America/Chicago:20250603T200000\n\
END:VEVENT\n\
END:VCALENDAR\n";

    #[test]
    fn parses_events_with_folded_summary() {
        let events = parse_calendar(SERVICE_ICS);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].summary, "Sunday WorshipService");
        assert_eq!(events[0].categories, vec!["worship", "service"]);
        assert_eq!(
            events[0].start,
            Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap()
        );
        assert!(events[0].recurrence.is_some());
        assert!(events[1].recurrence.is_none());
    }

    #[test]
    fn naive_timestamps_read_as_utc() {
        let events = parse_calendar(SERVICE_ICS);
        assert_eq!(
            events[1].start,
            Utc.with_ymd_and_hms(2025, 6, 3, 18, 0, 0).unwrap()
        );
    }

    #[test]
    fn date_only_values_become_midnight() {
        let text = "BEGIN:VEVENT\nSUMMARY:Holiday\nDTSTART;VALUE=DATE:20250704\nDTEND;VALUE=DATE:20250705\nEND:VEVENT\n";
        let events = parse_calendar(text);
        assert_eq!(events.len(), 1);
        assert_eq!(
            events[0].start,
            Utc.with_ymd_and_hms(2025, 7, 4, 0, 0, 0).unwrap()
        );
        assert_eq!(
            events[0].end,
            Utc.with_ymd_and_hms(2025, 7, 5, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn events_missing_times_are_dropped() {
        let text = "BEGIN:VEVENT\nSUMMARY:No times\nEND:VEVENT\n";
        assert!(parse_calendar(text).is_empty());
        assert!(parse_calendar("").is_empty());
        assert!(parse_calendar("not a calendar at all").is_empty());
    }

    #[test]
    fn weekly_expansion_respects_count() {
        let events = parse_calendar(SERVICE_ICS);
        let occurrences = expand_occurrences(&events[0], 12);
        assert_eq!(occurrences.len(), 3);
        assert_eq!(
            occurrences[1].0,
            Utc.with_ymd_and_hms(2025, 6, 8, 9, 0, 0).unwrap()
        );
        assert_eq!(
            occurrences[2].1,
            Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
        );
    }

    #[test]
    fn expansion_is_capped_by_caller() {
        let events = parse_calendar(SERVICE_ICS);
        let occurrences = expand_occurrences(&events[0], 2);
        assert_eq!(occurrences.len(), 2);
    }

    #[test]
    fn until_stops_expansion() {
        let text = "BEGIN:VEVENT\nSUMMARY:Standup\nDTSTART:20250602T090000Z\nDTEND:20250602T091500Z\nRRULE:FREQ=DAILY;UNTIL=20250604T090000Z\nEND:VEVENT\n";
        let events = parse_calendar(text);
        let occurrences = expand_occurrences(&events[0], 30);
        // June 2, 3, 4 -- the occurrence starting after UNTIL is dropped.
        assert_eq!(occurrences.len(), 3);
    }

    #[test]
    fn unsupported_frequency_is_non_recurring() {
        let text = "BEGIN:VEVENT\nSUMMARY:Monthly\nDTSTART:20250601T090000Z\nDTEND:20250601T100000Z\nRRULE:FREQ=MONTHLY;COUNT=6\nEND:VEVENT\n";
        let events = parse_calendar(text);
        assert_eq!(events.len(), 1);
        assert!(events[0].recurrence.is_none());
        assert_eq!(expand_occurrences(&events[0], 12).len(), 1);
    }

    #[test]
    fn non_recurring_event_is_single_occurrence() {
        let events = parse_calendar(SERVICE_ICS);
        let occurrences = expand_occurrences(&events[1], 12);
        assert_eq!(occurrences.len(), 1);
    }
}
