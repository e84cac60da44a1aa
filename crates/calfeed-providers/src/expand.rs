//! Expansion of parsed feeds into concrete [`CalendarEvent`] occurrences.
//!
//! Non-recurring components become one event each. Recurring components are
//! expanded from the start of the window up to its end. Instances overridden
//! with RECURRENCE-ID replace the generated occurrence and are kept or
//! dropped by their own start time.

use std::collections::{HashMap, HashSet};

use calfeed_core::{CalendarEvent, ExpansionWindow, TimeWindow};
use chrono::{DateTime, Duration, Utc};
use rrule::RRuleSet;
use tracing::{debug, info_span, warn};
use uuid::Uuid;

use crate::error::FeedResult;
use crate::ics::{FeedComponent, IcalTime, parse_feed, parse_time_value};

/// Upper bound on occurrences emitted for a single series inside the window.
///
/// Guards against rules like `FREQ=SECONDLY` over a wide window.
pub const MAX_SERIES_OCCURRENCES: u16 = u16::MAX;

/// Parses `text` and expands it over `± window_months` around now.
///
/// # Errors
///
/// Returns [`FeedError::Parse`](crate::FeedError::Parse) if the document is
/// not iCalendar. Malformed VEVENTs and unusable RRULEs are skipped.
pub fn expand(
    text: &str,
    calendar_id: &str,
    window_months: u32,
) -> FeedResult<Vec<CalendarEvent>> {
    expand_in_window(
        text,
        calendar_id,
        ExpansionWindow::new(window_months).resolve_now(),
    )
}

/// Parses `text` and expands recurring components over `window`.
pub fn expand_in_window(
    text: &str,
    calendar_id: &str,
    window: TimeWindow,
) -> FeedResult<Vec<CalendarEvent>> {
    let span = info_span!("expand", calendar_id = %calendar_id);
    let _guard = span.enter();

    let feed = parse_feed(text)?;
    let expander = Expander::new(calendar_id, window, &feed.components);
    let events = expander.run();

    debug!(
        events = events.len(),
        components = feed.components.len(),
        skipped = feed.skipped,
        window_start = %window.start,
        window_end = %window.end,
        "Expanded feed"
    );
    Ok(events)
}

struct Expander<'a> {
    calendar_id: &'a str,
    window: TimeWindow,
    components: &'a [FeedComponent],
    /// (series uid, original start) -> overriding instance.
    overrides: HashMap<(&'a str, i64), &'a FeedComponent>,
    /// UIDs with a recurring master in this feed.
    series: HashSet<&'a str>,
    /// Overrides already matched to a generated occurrence.
    consumed: HashSet<(&'a str, i64)>,
    max_occurrences: u16,
    seen: HashSet<String>,
    out: Vec<CalendarEvent>,
}

impl<'a> Expander<'a> {
    fn new(calendar_id: &'a str, window: TimeWindow, components: &'a [FeedComponent]) -> Self {
        let mut overrides = HashMap::new();
        let mut series = HashSet::new();

        for component in components {
            let Some(uid) = component.uid.as_deref() else {
                continue;
            };
            match component.recurrence_id {
                Some(original) => {
                    overrides.insert((uid, original.timestamp()), component);
                }
                None if component.is_recurring() => {
                    series.insert(uid);
                }
                None => {}
            }
        }

        Self {
            calendar_id,
            window,
            components,
            overrides,
            series,
            consumed: HashSet::new(),
            max_occurrences: MAX_SERIES_OCCURRENCES,
            seen: HashSet::new(),
            out: Vec::new(),
        }
    }

    fn run(mut self) -> Vec<CalendarEvent> {
        for component in self.components {
            match (component.recurrence_id, component.rrule.as_deref()) {
                (Some(original), _) => self.emit_detached_override(component, original),
                (None, Some(rule)) => self.expand_series(component, rule),
                (None, None) => self.emit_single(component),
            }
        }
        self.emit_unmatched_overrides();
        self.out
    }

    fn emit_single(&mut self, component: &FeedComponent) {
        let id = component
            .uid
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let event = self.build(id, component, component.start.to_utc(), component.end, None);
        self.push(event);
    }

    /// Overrides whose master is absent are kept as standalone occurrences
    /// when they start inside the window.
    fn emit_detached_override(&mut self, component: &FeedComponent, original: DateTime<Utc>) {
        let Some(uid) = component.uid.as_deref() else {
            return self.emit_single(component);
        };
        if self.series.contains(uid) {
            return;
        }
        self.emit_override(uid, component, original);
    }

    /// Emits overrides of present series whose original start was not
    /// generated inside the window, e.g. an instance moved in from outside.
    fn emit_unmatched_overrides(&mut self) {
        for component in self.components {
            let (Some(uid), Some(original)) = (component.uid.as_deref(), component.recurrence_id)
            else {
                continue;
            };
            if !self.series.contains(uid) || self.consumed.contains(&(uid, original.timestamp())) {
                continue;
            }
            self.emit_override(uid, component, original);
        }
    }

    fn emit_override(&mut self, uid: &str, component: &FeedComponent, original: DateTime<Utc>) {
        let start = component.start.to_utc();
        if !self.window.contains(start) {
            debug!(uid = %uid, start = %start, "Dropping override outside window");
            return;
        }
        let id = CalendarEvent::occurrence_id(uid, original);
        let event = self.build(id, component, start, component.end, Some(uid));
        self.push(event);
    }

    fn expand_series(&mut self, master: &'a FeedComponent, rule: &str) {
        let uid = master
            .uid
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let set = match build_rule_set(master, rule) {
            Ok(set) => set,
            Err(reason) => {
                warn!(uid = %uid, rule = %rule, reason = %reason, "Skipping unusable RRULE");
                return;
            }
        };

        // after/before are exclusive bounds.
        let tz: rrule::Tz = Utc.into();
        let after = (self.window.start - Duration::seconds(1)).with_timezone(&tz);
        let before = self.window.end.with_timezone(&tz);
        let result = set.after(after).before(before).all(self.max_occurrences);
        if result.limited {
            warn!(
                uid = %uid,
                limit = self.max_occurrences,
                "Recurrence limit reached, truncating series"
            );
        }

        let duration = master.duration();
        for occurrence in &result.dates {
            let start = occurrence.with_timezone(&Utc);
            if !self.window.contains(start) {
                continue;
            }

            let id = CalendarEvent::occurrence_id(&uid, start);
            let key = master.uid.as_deref().map(|u| (u, start.timestamp()));
            let instance = key.and_then(|key| self.overrides.get(&key).copied().map(|c| (key, c)));
            let event = match instance {
                Some((key, instance)) => {
                    self.consumed.insert(key);
                    let moved = instance.start.to_utc();
                    if !self.window.contains(moved) {
                        debug!(uid = %uid, start = %moved, "Dropping override outside window");
                        continue;
                    }
                    self.build(id, instance, moved, instance.end, Some(uid.as_str()))
                }
                None => self.build(id, master, start, start + duration, Some(uid.as_str())),
            };
            self.push(event);
        }
    }

    fn build(
        &self,
        id: String,
        source: &FeedComponent,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        series: Option<&str>,
    ) -> CalendarEvent {
        CalendarEvent {
            id,
            title: source.summary.clone(),
            description: source.description.clone(),
            location: source.location.clone(),
            start_time: start,
            end_time: end,
            calendar_id: self.calendar_id.to_string(),
            recurrence_id: series.map(str::to_string),
            all_day: source.start.is_date(),
            color: None,
        }
    }

    fn push(&mut self, event: CalendarEvent) {
        if self.seen.insert(event.id.clone()) {
            self.out.push(event);
        } else {
            debug!(id = %event.id, "Dropping duplicate event id");
        }
    }
}

/// Builds the rrule input for a master component.
fn build_rule_set(master: &FeedComponent, rule: &str) -> Result<RRuleSet, String> {
    let mut lines = vec![
        master.start.to_rule_line("DTSTART"),
        format!("RRULE:{}", normalize_until(rule, &master.start)),
    ];
    lines.extend(master.exdates.iter().map(|ex| ex.to_rule_line("EXDATE")));

    lines
        .join("\n")
        .parse::<RRuleSet>()
        .map_err(|e| e.to_string())
}

/// Rewrites a local or DATE-valued `UNTIL` into the UTC form rrule expects
/// for the way DTSTART is rendered by [`IcalTime::to_rule_line`].
fn normalize_until(rule: &str, start: &IcalTime) -> String {
    rule.split(';')
        .map(|part| {
            let Some((key, value)) = part.split_once('=') else {
                return part.to_string();
            };
            if !key.trim().eq_ignore_ascii_case("UNTIL") || value.ends_with('Z') {
                return part.to_string();
            }
            let tzid = match start {
                IcalTime::Zoned { tz, .. } => Some(tz.name()),
                _ => None,
            };
            match parse_time_value(value, false, tzid) {
                // A DATE bound includes the whole day.
                Ok(IcalTime::Date(date)) => format!("UNTIL={}T235959Z", date.format("%Y%m%d")),
                Ok(time) => format!("UNTIL={}", time.to_utc().format("%Y%m%dT%H%M%SZ")),
                Err(_) => part.to_string(),
            }
        })
        .collect::<Vec<_>>()
        .join(";")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    fn wrap(body: &str) -> String {
        format!(
            "BEGIN:VCALENDAR\r\nVERSION:2.0\r\nPRODID:-//Test//Test//EN\r\n\
             {body}END:VCALENDAR\r\n"
        )
    }

    fn daily(uid: &str, dtstart: &str, dtend: &str) -> String {
        wrap(&format!(
            "BEGIN:VEVENT\r\nUID:{uid}\r\nSUMMARY:Standup\r\nDTSTART:{dtstart}\r\n\
             DTEND:{dtend}\r\nRRULE:FREQ=DAILY\r\nEND:VEVENT\r\n"
        ))
    }

    fn march_window() -> TimeWindow {
        TimeWindow::new(utc(2024, 3, 1, 0, 0), utc(2024, 3, 8, 0, 0))
    }

    #[test]
    fn single_event_keeps_uid() {
        let text = wrap(
            "BEGIN:VEVENT\r\nUID:abc\r\nSUMMARY:Review\r\n\
             DTSTART:20240101T100000Z\r\nDTEND:20240101T110000Z\r\nEND:VEVENT\r\n",
        );

        let events = expand(&text, "cal-1", 1).unwrap();

        assert_eq!(events.len(), 1);
        let e = &events[0];
        assert_eq!(e.id, "abc");
        assert_eq!(e.title, "Review");
        assert_eq!(e.recurrence_id, None);
        assert_eq!(e.start_time, utc(2024, 1, 1, 10, 0));
        assert_eq!(e.end_time, utc(2024, 1, 1, 11, 0));
        assert_eq!(e.calendar_id, "cal-1");
    }

    #[test]
    fn repeated_expansion_is_stable_for_single_events() {
        let text = wrap(
            "BEGIN:VEVENT\r\nUID:abc\r\nDTSTART:20240101T100000Z\r\n\
             DTEND:20240101T110000Z\r\nEND:VEVENT\r\n",
        );

        let first = expand(&text, "cal", 1).unwrap();
        let second = expand(&text, "cal", 1).unwrap();
        assert_eq!(first, second);
        assert_eq!(first[0].id, "abc");
    }

    #[test]
    fn missing_uid_gets_generated_id() {
        let text = wrap("BEGIN:VEVENT\r\nDTSTART:20240101T100000Z\r\nEND:VEVENT\r\n");

        let events = expand(&text, "cal", 1).unwrap();
        assert_eq!(events.len(), 1);
        assert!(Uuid::parse_str(&events[0].id).is_ok());
    }

    #[test]
    fn daily_series_is_cut_to_window() {
        let text = daily("xyz", "20240101T090000Z", "20240101T093000Z");

        let events = expand_in_window(&text, "cal", march_window()).unwrap();

        assert_eq!(events.len(), 7);
        assert_eq!(events[0].start_time, utc(2024, 3, 1, 9, 0));
        assert_eq!(events[6].start_time, utc(2024, 3, 7, 9, 0));
        for e in &events {
            assert_eq!(e.recurrence_id.as_deref(), Some("xyz"));
            assert_eq!(e.end_time - e.start_time, Duration::minutes(30));
            assert_eq!(e.id, format!("xyz-{}", e.start_time.timestamp()));
        }
    }

    #[test]
    fn occurrence_ids_are_unique() {
        let text = daily("xyz", "20240101T090000Z", "20240101T093000Z");

        let events = expand_in_window(&text, "cal", march_window()).unwrap();
        let ids: HashSet<_> = events.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids.len(), events.len());
    }

    #[test]
    fn zero_month_window_yields_today_only() {
        let text = daily("xyz", "20240101T090000Z", "20240101T093000Z");
        let now = Utc::now();

        let events = expand(&text, "cal", 0).unwrap();

        assert_eq!(events.len(), 1);
        let today_nine = now.date_naive().and_hms_opt(9, 0, 0).unwrap().and_utc();
        assert_eq!(events[0].start_time, today_nine);
        assert_eq!(events[0].id, format!("xyz-{}", today_nine.timestamp()));
    }

    #[test]
    fn one_month_window_count_matches_days() {
        let text = daily("xyz", "20240101T090000Z", "20240101T093000Z");
        let window = ExpansionWindow::new(1).resolve_now();

        let events = expand(&text, "cal", 1).unwrap();

        let days = window.duration().num_days();
        assert!((events.len() as i64 - days).abs() <= 1, "{} vs {days}", events.len());
        assert!(events.iter().all(|e| window.contains(e.start_time)));
    }

    #[test]
    fn window_end_is_exclusive() {
        let text = daily("edge", "20240101T000000Z", "20240101T010000Z");

        let events = expand_in_window(&text, "cal", march_window()).unwrap();

        assert_eq!(events.first().unwrap().start_time, utc(2024, 3, 1, 0, 0));
        assert!(events.iter().all(|e| e.start_time < utc(2024, 3, 8, 0, 0)));
        assert_eq!(events.len(), 7);
    }

    #[test]
    fn count_limited_series_ends() {
        let text = wrap(
            "BEGIN:VEVENT\r\nUID:short\r\nDTSTART:20240301T120000Z\r\nDTEND:20240301T130000Z\r\n\
             RRULE:FREQ=DAILY;COUNT=3\r\nEND:VEVENT\r\n",
        );

        let events = expand_in_window(&text, "cal", march_window()).unwrap();
        assert_eq!(events.len(), 3);
    }

    #[test]
    fn floating_until_is_accepted() {
        let text = wrap(
            "BEGIN:VEVENT\r\nUID:until\r\nDTSTART:20240301T120000\r\nDTEND:20240301T130000\r\n\
             RRULE:FREQ=DAILY;UNTIL=20240303T120000\r\nEND:VEVENT\r\n",
        );

        let events = expand_in_window(&text, "cal", march_window()).unwrap();
        assert_eq!(events.len(), 3);
        assert_eq!(events[2].start_time, utc(2024, 3, 3, 12, 0));
    }

    #[test]
    fn exdates_are_excluded() {
        let text = wrap(
            "BEGIN:VEVENT\r\nUID:gym\r\nDTSTART:20240301T070000Z\r\nDTEND:20240301T080000Z\r\n\
             RRULE:FREQ=DAILY\r\nEXDATE:20240302T070000Z,20240304T070000Z\r\nEND:VEVENT\r\n",
        );

        let events = expand_in_window(&text, "cal", march_window()).unwrap();
        assert_eq!(events.len(), 5);
        assert!(events.iter().all(|e| e.start_time != utc(2024, 3, 2, 7, 0)));
    }

    #[test]
    fn override_replaces_generated_occurrence() {
        let text = wrap(
            "BEGIN:VEVENT\r\nUID:sync\r\nSUMMARY:Sync\r\nDTSTART:20240301T100000Z\r\n\
             DTEND:20240301T110000Z\r\nRRULE:FREQ=DAILY;COUNT=3\r\nEND:VEVENT\r\n\
             BEGIN:VEVENT\r\nUID:sync\r\nSUMMARY:Sync (moved)\r\nRECURRENCE-ID:20240302T100000Z\r\n\
             DTSTART:20240302T150000Z\r\nDTEND:20240302T160000Z\r\nEND:VEVENT\r\n",
        );

        let events = expand_in_window(&text, "cal", march_window()).unwrap();

        assert_eq!(events.len(), 3);
        let moved = &events[1];
        assert_eq!(moved.title, "Sync (moved)");
        assert_eq!(moved.start_time, utc(2024, 3, 2, 15, 0));
        assert_eq!(moved.id, format!("sync-{}", utc(2024, 3, 2, 10, 0).timestamp()));
        assert_eq!(moved.recurrence_id.as_deref(), Some("sync"));
    }

    #[test]
    fn override_moved_into_window_is_kept() {
        let text = wrap(
            "BEGIN:VEVENT\r\nUID:sync\r\nSUMMARY:Sync\r\nDTSTART:20240101T100000Z\r\n\
             DTEND:20240101T110000Z\r\nRRULE:FREQ=DAILY\r\nEND:VEVENT\r\n\
             BEGIN:VEVENT\r\nUID:sync\r\nSUMMARY:Sync (moved)\r\nRECURRENCE-ID:20240229T100000Z\r\n\
             DTSTART:20240302T150000Z\r\nDTEND:20240302T160000Z\r\nEND:VEVENT\r\n",
        );

        let events = expand_in_window(&text, "cal", march_window()).unwrap();

        assert_eq!(events.len(), 8);
        let moved: Vec<_> = events.iter().filter(|e| e.title == "Sync (moved)").collect();
        assert_eq!(moved.len(), 1);
        assert_eq!(moved[0].start_time, utc(2024, 3, 2, 15, 0));
        assert_eq!(moved[0].id, format!("sync-{}", utc(2024, 2, 29, 10, 0).timestamp()));
        assert_eq!(moved[0].recurrence_id.as_deref(), Some("sync"));
    }

    #[test]
    fn override_moved_out_of_window_is_dropped() {
        let text = wrap(
            "BEGIN:VEVENT\r\nUID:sync\r\nSUMMARY:Sync\r\nDTSTART:20240101T100000Z\r\n\
             DTEND:20240101T110000Z\r\nRRULE:FREQ=DAILY\r\nEND:VEVENT\r\n\
             BEGIN:VEVENT\r\nUID:sync\r\nSUMMARY:Sync (moved)\r\nRECURRENCE-ID:20240302T100000Z\r\n\
             DTSTART:20240410T150000Z\r\nDTEND:20240410T160000Z\r\nEND:VEVENT\r\n",
        );

        let events = expand_in_window(&text, "cal", march_window()).unwrap();

        assert_eq!(events.len(), 6);
        assert!(events.iter().all(|e| e.title == "Sync"));
        let dropped = format!("sync-{}", utc(2024, 3, 2, 10, 0).timestamp());
        assert!(events.iter().all(|e| e.id != dropped));
    }

    #[test]
    fn dense_series_from_the_past_reaches_window() {
        let text = wrap(
            "BEGIN:VEVENT\r\nUID:tick\r\nDTSTART:20220101T000000Z\r\n\
             RRULE:FREQ=MINUTELY\r\nEND:VEVENT\r\n",
        );
        let window = TimeWindow::new(utc(2024, 3, 1, 9, 0), utc(2024, 3, 1, 10, 0));

        let events = expand_in_window(&text, "cal", window).unwrap();

        assert_eq!(events.len(), 60);
        assert_eq!(events[0].start_time, utc(2024, 3, 1, 9, 0));
        assert_eq!(events[59].start_time, utc(2024, 3, 1, 9, 59));
    }

    #[test]
    fn occurrence_limit_truncates_series() {
        let text = daily("xyz", "20240101T090000Z", "20240101T093000Z");
        let feed = parse_feed(&text).unwrap();
        let mut expander = Expander::new("cal", march_window(), &feed.components);
        expander.max_occurrences = 3;

        let events = expander.run();

        assert_eq!(events.len(), 3);
        assert_eq!(events[0].start_time, utc(2024, 3, 1, 9, 0));
        assert_eq!(events[2].start_time, utc(2024, 3, 3, 9, 0));
    }

    #[test]
    fn detached_override_is_emitted_once() {
        let text = wrap(
            "BEGIN:VEVENT\r\nUID:lonely\r\nRECURRENCE-ID:20240302T100000Z\r\n\
             DTSTART:20240302T110000Z\r\nDTEND:20240302T120000Z\r\nEND:VEVENT\r\n",
        );

        let events = expand_in_window(&text, "cal", march_window()).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].recurrence_id.as_deref(), Some("lonely"));
        assert_eq!(events[0].id, format!("lonely-{}", utc(2024, 3, 2, 10, 0).timestamp()));
    }

    #[test]
    fn zoned_series_follows_dst() {
        let text = wrap(
            "BEGIN:VEVENT\r\nUID:berlin\r\n\
             DTSTART;TZID=Europe/Berlin:20240325T090000\r\n\
             DTEND;TZID=Europe/Berlin:20240325T100000\r\n\
             RRULE:FREQ=WEEKLY\r\nEND:VEVENT\r\n",
        );
        let window = TimeWindow::new(utc(2024, 3, 20, 0, 0), utc(2024, 4, 5, 0, 0));

        let events = expand_in_window(&text, "cal", window).unwrap();

        assert_eq!(events.len(), 2);
        // CET (UTC+1) before the switch on 31 March, CEST (UTC+2) after.
        assert_eq!(events[0].start_time, utc(2024, 3, 25, 8, 0));
        assert_eq!(events[1].start_time, utc(2024, 4, 1, 7, 0));
    }

    #[test]
    fn all_day_series_is_flagged() {
        let text = wrap(
            "BEGIN:VEVENT\r\nUID:bins\r\nDTSTART;VALUE=DATE:20240301\r\n\
             DTEND;VALUE=DATE:20240302\r\nRRULE:FREQ=WEEKLY\r\nEND:VEVENT\r\n",
        );

        let events = expand_in_window(&text, "cal", march_window()).unwrap();
        assert_eq!(events.len(), 1);
        assert!(events[0].all_day);
        assert!(events[0].is_full_day());
        assert_eq!(events[0].end_time, utc(2024, 3, 2, 0, 0));
    }

    #[test]
    fn detached_override_outside_window_is_dropped() {
        let text = wrap(
            "BEGIN:VEVENT\r\nUID:lonely\r\nRECURRENCE-ID:20240402T100000Z\r\n\
             DTSTART:20240402T110000Z\r\nEND:VEVENT\r\n",
        );

        let events = expand_in_window(&text, "cal", march_window()).unwrap();
        assert!(events.is_empty());
    }

    #[test]
    fn bad_rule_skips_only_that_series() {
        let text = wrap(
            "BEGIN:VEVENT\r\nUID:bad\r\nDTSTART:20240301T100000Z\r\n\
             RRULE:FREQ=SOMETIMES\r\nEND:VEVENT\r\n\
             BEGIN:VEVENT\r\nUID:good\r\nDTSTART:20240301T100000Z\r\nEND:VEVENT\r\n",
        );

        let events = expand_in_window(&text, "cal", march_window()).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].id, "good");
    }

    #[test]
    fn duplicate_uids_keep_first() {
        let text = wrap(
            "BEGIN:VEVENT\r\nUID:dup\r\nSUMMARY:First\r\nDTSTART:20240301T100000Z\r\nEND:VEVENT\r\n\
             BEGIN:VEVENT\r\nUID:dup\r\nSUMMARY:Second\r\n\
             DTSTART:20240302T100000Z\r\nEND:VEVENT\r\n",
        );

        let events = expand_in_window(&text, "cal", march_window()).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].title, "First");
    }

    #[test]
    fn invalid_document_is_fatal() {
        assert!(expand("not a calendar", "cal", 1).is_err());
    }

    #[test]
    fn until_normalization() {
        let floating = IcalTime::Floating(utc(2024, 3, 1, 12, 0).naive_utc());
        assert_eq!(
            normalize_until("FREQ=DAILY;UNTIL=20240303T120000", &floating),
            "FREQ=DAILY;UNTIL=20240303T120000Z"
        );
        assert_eq!(
            normalize_until("FREQ=DAILY;UNTIL=20240303", &floating),
            "FREQ=DAILY;UNTIL=20240303T235959Z"
        );
        assert_eq!(
            normalize_until("FREQ=WEEKLY;UNTIL=20240303T120000Z;BYDAY=MO", &floating),
            "FREQ=WEEKLY;UNTIL=20240303T120000Z;BYDAY=MO"
        );
    }
}
