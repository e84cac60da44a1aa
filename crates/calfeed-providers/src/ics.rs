//! iCalendar (RFC 5545) document parsing.
//!
//! Turns feed text into [`FeedComponent`]s, one per VEVENT, with times
//! resolved to UTC. A document that is not iCalendar at all is rejected;
//! individual VEVENTs that cannot be interpreted are skipped and logged.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use icalendar::parser::{Component, Property, read_calendar, unfold};
use tracing::{debug, warn};

use crate::error::{FeedError, FeedResult};

const DATE_FORMAT: &str = "%Y%m%d";
const DATETIME_FORMAT: &str = "%Y%m%dT%H%M%S";

/// A DATE or DATE-TIME value as written in the feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IcalTime {
    /// `VALUE=DATE`, interpreted as midnight UTC.
    Date(NaiveDate),
    /// A `...Z` value.
    Utc(DateTime<Utc>),
    /// A value without zone information, interpreted as UTC.
    Floating(NaiveDateTime),
    /// A `TZID`-qualified value with a known zone.
    Zoned { local: NaiveDateTime, tz: Tz },
}

impl IcalTime {
    /// Resolves the value to an instant.
    pub fn to_utc(&self) -> DateTime<Utc> {
        match self {
            Self::Date(date) => date.and_time(chrono::NaiveTime::MIN).and_utc(),
            Self::Utc(dt) => *dt,
            Self::Floating(naive) => naive.and_utc(),
            Self::Zoned { local, tz } => tz
                .from_local_datetime(local)
                .earliest()
                // Skipped by a DST gap: shift past the gap.
                .or_else(|| tz.from_local_datetime(&(*local + Duration::hours(1))).earliest())
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(|| local.and_utc()),
        }
    }

    /// Returns true for DATE values.
    pub fn is_date(&self) -> bool {
        matches!(self, Self::Date(_))
    }

    /// Renders the value as an RRULE-set property line (`DTSTART`, `EXDATE`).
    ///
    /// Zoned values keep their TZID so recurrences follow DST transitions;
    /// everything else is pinned to UTC.
    pub fn to_rule_line(&self, name: &str) -> String {
        match self {
            Self::Date(date) => format!("{name}:{}T000000Z", date.format(DATE_FORMAT)),
            Self::Utc(dt) => format!("{name}:{}Z", dt.format(DATETIME_FORMAT)),
            Self::Floating(naive) => format!("{name}:{}Z", naive.format(DATETIME_FORMAT)),
            Self::Zoned { local, tz } => {
                format!("{name};TZID={}:{}", tz.name(), local.format(DATETIME_FORMAT))
            }
        }
    }
}

/// One VEVENT with the properties the expander needs.
#[derive(Debug, Clone)]
pub struct FeedComponent {
    /// UID, if present and non-empty.
    pub uid: Option<String>,
    /// SUMMARY, empty if absent.
    pub summary: String,
    /// DESCRIPTION.
    pub description: Option<String>,
    /// LOCATION.
    pub location: Option<String>,
    /// DTSTART as written.
    pub start: IcalTime,
    /// End instant from DTEND, DURATION, or the RFC 5545 defaults.
    pub end: DateTime<Utc>,
    /// RRULE value (`FREQ=...`), if the component recurs.
    pub rrule: Option<String>,
    /// EXDATE values.
    pub exdates: Vec<IcalTime>,
    /// RECURRENCE-ID instant, set on overridden instances of a series.
    pub recurrence_id: Option<DateTime<Utc>>,
}

impl FeedComponent {
    /// Returns the master duration, never negative.
    pub fn duration(&self) -> Duration {
        (self.end - self.start.to_utc()).max(Duration::zero())
    }

    /// Returns true if the component defines a recurrence rule.
    pub fn is_recurring(&self) -> bool {
        self.rrule.is_some()
    }
}

/// Result of parsing a feed document.
#[derive(Debug, Default)]
pub struct ParsedFeed {
    /// Interpretable VEVENTs in document order.
    pub components: Vec<FeedComponent>,
    /// Number of VEVENTs that were skipped.
    pub skipped: usize,
}

/// Parses a feed document.
///
/// # Errors
///
/// Returns [`FeedError::Parse`] if the text is not an iCalendar document.
pub fn parse_feed(text: &str) -> FeedResult<ParsedFeed> {
    let first_line = text.trim_start_matches('\u{feff}').lines().find(|l| !l.trim().is_empty());
    if !first_line.is_some_and(|l| l.trim().eq_ignore_ascii_case("BEGIN:VCALENDAR")) {
        return Err(FeedError::parse("document does not start with BEGIN:VCALENDAR"));
    }

    let unfolded = unfold(text);
    let calendar = read_calendar(&unfolded).map_err(FeedError::parse)?;

    let mut vevents = Vec::new();
    for component in &calendar.components {
        collect_vevents(component, &mut vevents);
    }

    let mut feed = ParsedFeed::default();
    for (index, vevent) in vevents.into_iter().enumerate() {
        match parse_component(vevent) {
            Ok(component) => feed.components.push(component),
            Err(reason) => {
                let uid = vevent.find_prop("UID").map(|p| p.val.to_string());
                warn!(index, uid = ?uid, reason = %reason, "Skipping malformed VEVENT");
                feed.skipped += 1;
            }
        }
    }

    debug!(
        events = feed.components.len(),
        skipped = feed.skipped,
        "Parsed feed"
    );
    Ok(feed)
}

/// Walks the component tree; VEVENTs may sit at the top or under VCALENDAR.
fn collect_vevents<'a, 'b>(component: &'b Component<'a>, out: &mut Vec<&'b Component<'a>>) {
    if component.name == "VEVENT" {
        out.push(component);
        return;
    }
    for child in &component.components {
        collect_vevents(child, out);
    }
}

fn parse_component(vevent: &Component<'_>) -> Result<FeedComponent, String> {
    let start_prop = vevent.find_prop("DTSTART").ok_or("missing DTSTART")?;
    let start = parse_time(start_prop)?;

    let end = if let Some(prop) = vevent.find_prop("DTEND") {
        parse_time(prop)?.to_utc()
    } else if let Some(prop) = vevent.find_prop("DURATION") {
        start.to_utc() + parse_duration(prop.val.as_ref())?
    } else if start.is_date() {
        start.to_utc() + Duration::days(1)
    } else {
        start.to_utc()
    };

    let exdates = vevent
        .properties
        .iter()
        .filter(|p| p.name == "EXDATE")
        .map(parse_time_list)
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .flatten()
        .collect();

    let recurrence_id = vevent
        .find_prop("RECURRENCE-ID")
        .map(|p| parse_time(p).map(|t| t.to_utc()))
        .transpose()?;

    Ok(FeedComponent {
        uid: text_prop(vevent, "UID").filter(|uid| !uid.trim().is_empty()),
        summary: text_prop(vevent, "SUMMARY").unwrap_or_default(),
        description: text_prop(vevent, "DESCRIPTION"),
        location: text_prop(vevent, "LOCATION"),
        start,
        end,
        rrule: vevent
            .find_prop("RRULE")
            .map(|p| p.val.to_string())
            .filter(|rule| !rule.trim().is_empty()),
        exdates,
        recurrence_id,
    })
}

fn text_prop(component: &Component<'_>, name: &str) -> Option<String> {
    component.find_prop(name).map(|p| unescape_text(p.val.as_ref()))
}

fn param<'a>(prop: &'a Property<'_>, key: &str) -> Option<&'a str> {
    prop.params
        .iter()
        .find(|p| p.key == key)
        .and_then(|p| p.val.as_ref())
        .map(|v| v.as_ref())
}

fn parse_time(prop: &Property<'_>) -> Result<IcalTime, String> {
    let is_date = param(prop, "VALUE").is_some_and(|v| v.eq_ignore_ascii_case("DATE"));
    parse_time_value(prop.val.as_ref(), is_date, param(prop, "TZID"))
}

fn parse_time_list(prop: &Property<'_>) -> Result<Vec<IcalTime>, String> {
    let is_date = param(prop, "VALUE").is_some_and(|v| v.eq_ignore_ascii_case("DATE"));
    let tzid = param(prop, "TZID");
    prop.val
        .as_ref()
        .split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(|v| parse_time_value(v, is_date, tzid))
        .collect()
}

/// Parses a DATE or DATE-TIME value.
///
/// Handles `20250205T100000Z` (UTC), `20250205T100000` (floating or zoned
/// via `tzid`) and `20250205` (date).
pub fn parse_time_value(
    value: &str,
    is_date: bool,
    tzid: Option<&str>,
) -> Result<IcalTime, String> {
    let value = value.trim();

    if is_date || (value.len() == 8 && value.bytes().all(|b| b.is_ascii_digit())) {
        return NaiveDate::parse_from_str(value, DATE_FORMAT)
            .map(IcalTime::Date)
            .map_err(|e| format!("invalid DATE '{value}': {e}"));
    }

    if let Some(utc) = value.strip_suffix('Z') {
        return NaiveDateTime::parse_from_str(utc, DATETIME_FORMAT)
            .map(|dt| IcalTime::Utc(dt.and_utc()))
            .map_err(|e| format!("invalid DATE-TIME '{value}': {e}"));
    }

    let local = NaiveDateTime::parse_from_str(value, DATETIME_FORMAT)
        .map_err(|e| format!("invalid DATE-TIME '{value}': {e}"))?;

    match tzid {
        Some(tzid) => match resolve_tzid(tzid) {
            Some(tz) => Ok(IcalTime::Zoned { local, tz }),
            None => {
                warn!(tzid = %tzid, "Unknown TZID, treating time as UTC");
                Ok(IcalTime::Floating(local))
            }
        },
        None => Ok(IcalTime::Floating(local)),
    }
}

/// Resolves a TZID parameter to an IANA zone.
///
/// Accepts quoted values and the `/Zone/Name` prefix some exporters emit.
pub fn resolve_tzid(tzid: &str) -> Option<Tz> {
    let name = tzid.trim().trim_matches('"').trim_start_matches('/');
    name.parse::<Tz>().ok()
}

fn parse_duration(value: &str) -> Result<Duration, String> {
    let value = value.trim();
    let (negative, body) = match value.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, value.strip_prefix('+').unwrap_or(value)),
    };
    let parsed = iso8601::duration(body).map_err(|e| format!("invalid DURATION '{value}': {e}"))?;
    let std_duration: std::time::Duration = parsed.into();
    let duration = Duration::from_std(std_duration)
        .map_err(|e| format!("DURATION '{value}' out of range: {e}"))?;
    Ok(if negative { -duration } else { duration })
}

/// Reverses RFC 5545 TEXT escaping.
pub fn unescape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') | Some('N') => out.push('\n'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    fn wrap(body: &str) -> String {
        format!(
            "BEGIN:VCALENDAR\r\nVERSION:2.0\r\nPRODID:-//Test//Test//EN\r\n\
             {body}END:VCALENDAR\r\n"
        )
    }

    #[test]
    fn parses_basic_event() {
        let text = wrap(
            "BEGIN:VEVENT\r\n\
             UID:abc\r\n\
             DTSTART:20240101T100000Z\r\n\
             DTEND:20240101T110000Z\r\n\
             SUMMARY:Team Meeting\r\n\
             DESCRIPTION:Agenda\\, notes\\nline two\r\n\
             LOCATION:Room A\r\n\
             END:VEVENT\r\n",
        );

        let feed = parse_feed(&text).unwrap();
        assert_eq!(feed.components.len(), 1);
        assert_eq!(feed.skipped, 0);

        let c = &feed.components[0];
        assert_eq!(c.uid.as_deref(), Some("abc"));
        assert_eq!(c.summary, "Team Meeting");
        assert_eq!(c.description.as_deref(), Some("Agenda, notes\nline two"));
        assert_eq!(c.location.as_deref(), Some("Room A"));
        assert_eq!(c.start.to_utc(), utc(2024, 1, 1, 10, 0));
        assert_eq!(c.end, utc(2024, 1, 1, 11, 0));
        assert!(!c.is_recurring());
    }

    #[test]
    fn rejects_non_calendar_text() {
        let err = parse_feed("<html><body>Not found</body></html>").unwrap_err();
        assert!(matches!(err, FeedError::Parse { .. }));

        let err = parse_feed("").unwrap_err();
        assert!(matches!(err, FeedError::Parse { .. }));
    }

    #[test]
    fn skips_vevent_without_start() {
        let text = wrap(
            "BEGIN:VEVENT\r\nUID:broken\r\nSUMMARY:No start\r\nEND:VEVENT\r\n\
             BEGIN:VEVENT\r\nUID:ok\r\nDTSTART:20240101T100000Z\r\nEND:VEVENT\r\n",
        );

        let feed = parse_feed(&text).unwrap();
        assert_eq!(feed.skipped, 1);
        assert_eq!(feed.components.len(), 1);
        assert_eq!(feed.components[0].uid.as_deref(), Some("ok"));
    }

    #[test]
    fn skips_vevent_with_garbage_date() {
        let text = wrap(
            "BEGIN:VEVENT\r\nUID:bad\r\nDTSTART:tomorrow\r\nEND:VEVENT\r\n\
             BEGIN:VEVENT\r\nUID:good\r\nDTSTART:20240101T100000Z\r\nEND:VEVENT\r\n",
        );

        let feed = parse_feed(&text).unwrap();
        assert_eq!(feed.skipped, 1);
        assert_eq!(feed.components[0].uid.as_deref(), Some("good"));
    }

    #[test]
    fn date_values_and_default_end() {
        let text =
            wrap("BEGIN:VEVENT\r\nUID:holiday\r\nDTSTART;VALUE=DATE:20250210\r\nEND:VEVENT\r\n");

        let c = &parse_feed(&text).unwrap().components[0];
        assert!(c.start.is_date());
        assert_eq!(c.start.to_utc(), utc(2025, 2, 10, 0, 0));
        assert_eq!(c.end, utc(2025, 2, 11, 0, 0));
    }

    #[test]
    fn duration_property_sets_end() {
        let text = wrap(
            "BEGIN:VEVENT\r\nUID:d\r\nDTSTART:20240101T100000Z\r\n\
             DURATION:PT1H30M\r\nEND:VEVENT\r\n",
        );

        let c = &parse_feed(&text).unwrap().components[0];
        assert_eq!(c.end, utc(2024, 1, 1, 11, 30));
    }

    #[test]
    fn missing_end_for_datetime_is_zero_length() {
        let text = wrap("BEGIN:VEVENT\r\nUID:z\r\nDTSTART:20240101T100000Z\r\nEND:VEVENT\r\n");

        let c = &parse_feed(&text).unwrap().components[0];
        assert_eq!(c.end, utc(2024, 1, 1, 10, 0));
        assert_eq!(c.duration(), Duration::zero());
    }

    #[test]
    fn tzid_is_resolved() {
        let text = wrap(
            "BEGIN:VEVENT\r\nUID:tz\r\n\
             DTSTART;TZID=Europe/Berlin:20240701T090000\r\n\
             DTEND;TZID=Europe/Berlin:20240701T100000\r\n\
             END:VEVENT\r\n",
        );

        let c = &parse_feed(&text).unwrap().components[0];
        // CEST is UTC+2 in July.
        assert_eq!(c.start.to_utc(), utc(2024, 7, 1, 7, 0));
        assert_eq!(c.end, utc(2024, 7, 1, 8, 0));
    }

    #[test]
    fn local_time_in_dst_gap_moves_past_it() {
        // 02:30 does not exist in Berlin on 31 March 2024; 03:30 CEST does.
        let time = parse_time_value("20240331T023000", false, Some("Europe/Berlin")).unwrap();
        assert_eq!(time.to_utc(), utc(2024, 3, 31, 1, 30));
    }

    #[test]
    fn unknown_tzid_falls_back_to_utc() {
        let time = parse_time_value("20240101T090000", false, Some("Mars/Olympus")).unwrap();
        assert_eq!(time, IcalTime::Floating(utc(2024, 1, 1, 9, 0).naive_utc()));
    }

    #[test]
    fn exdate_lists_and_recurrence_id() {
        let text = wrap(
            "BEGIN:VEVENT\r\nUID:series\r\n\
             DTSTART:20240101T090000Z\r\n\
             RRULE:FREQ=DAILY\r\n\
             EXDATE:20240102T090000Z,20240103T090000Z\r\n\
             EXDATE:20240105T090000Z\r\n\
             END:VEVENT\r\n\
             BEGIN:VEVENT\r\nUID:series\r\n\
             RECURRENCE-ID:20240104T090000Z\r\n\
             DTSTART:20240104T120000Z\r\n\
             END:VEVENT\r\n",
        );

        let feed = parse_feed(&text).unwrap();
        let master = &feed.components[0];
        assert!(master.is_recurring());
        assert_eq!(master.exdates.len(), 3);

        let instance = &feed.components[1];
        assert_eq!(instance.recurrence_id, Some(utc(2024, 1, 4, 9, 0)));
    }

    #[test]
    fn rule_lines() {
        let date = IcalTime::Date(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(date.to_rule_line("DTSTART"), "DTSTART:20240101T000000Z");

        let zoned = parse_time_value("20240101T090000", false, Some("\"/Europe/Paris\"")).unwrap();
        assert_eq!(zoned.to_rule_line("EXDATE"), "EXDATE;TZID=Europe/Paris:20240101T090000");
    }

    #[test]
    fn unescape_handles_sequences() {
        assert_eq!(unescape_text(r"a\;b\,c\\d\ne"), "a;b,c\\d\ne");
        assert_eq!(unescape_text("trailing\\"), "trailing\\");
    }
}
