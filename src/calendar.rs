//! iCalendar export for the date shown on the reveal screen.

#[cfg(feature = "serde")]
use serde::Deserialize;

pub const ICS_FILE_NAME: &str = "valentine-date.ics";
pub const ICS_MIME: &str = "text/calendar;charset=utf-8";

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize), serde(default))]
pub struct Invitation {
    pub summary: String,
    pub location: String,
    /// Local date-time in `YYYYMMDDTHHMMSS` form, interpreted in `tzid`.
    pub start: String,
    pub end: String,
    pub tzid: String,
    /// First line of the reveal card; the location is appended.
    pub message: String,
}

impl Default for Invitation {
    fn default() -> Self {
        Self {
            summary: "Valentine Date with Omar".to_string(),
            location: "2340 Bluewater Way, Clearwater, Florida 33759".to_string(),
            start: "20250214T180000".to_string(),
            end: "20250214T210000".to_string(),
            tzid: "America/New_York".to_string(),
            message: "Be My Valentine on Feb 14th at 6 PM".to_string(),
        }
    }
}

impl Invitation {
    pub fn reveal_text(&self) -> String {
        format!("{} - Location: {}.", self.message, self.location)
    }

    /// RFC 5545 calendar with a single event, CRLF terminated lines.
    pub fn to_ics(&self) -> String {
        let lines = [
            "BEGIN:VCALENDAR".to_string(),
            "VERSION:2.0".to_string(),
            "PRODID:-//Valentine//EN".to_string(),
            "BEGIN:VEVENT".to_string(),
            format!("UID:{}-{}@valentine-games", self.start, self.end),
            format!("DTSTAMP:{}", self.stamp()),
            format!("DTSTART;TZID={}:{}", self.tzid, self.start),
            format!("DTEND;TZID={}:{}", self.tzid, self.end),
            format!("SUMMARY:{}", escape_text(&self.summary)),
            format!("LOCATION:{}", escape_text(&self.location)),
            "END:VEVENT".to_string(),
            "END:VCALENDAR".to_string(),
        ];
        lines.iter().map(|l| fold_line(l)).collect::<Vec<_>>().join("\r\n")
    }

    /// `DTSTAMP` value: the start digits in UTC form.
    fn stamp(&self) -> String {
        format!("{}Z", self.start.trim_end_matches('Z'))
    }
}

/// TEXT value escaping (RFC 5545 §3.3.11).
pub fn escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            ';' => out.push_str("\\;"),
            ',' => out.push_str("\\,"),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            _ => out.push(c),
        }
    }
    out
}

/// Fold content lines longer than 75 octets, never splitting a UTF-8 char.
fn fold_line(line: &str) -> String {
    const LIMIT: usize = 75;
    if line.len() <= LIMIT {
        return line.to_string();
    }
    let mut out = String::with_capacity(line.len() + line.len() / LIMIT * 3);
    let mut width = 0;
    for c in line.chars() {
        let n = c.len_utf8();
        if width + n > LIMIT {
            out.push_str("\r\n ");
            // continuation lines start with the space, which counts
            width = 1;
        }
        out.push(c);
        width += n;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_invitation_renders_expected_event() {
        let ics = Invitation::default().to_ics();
        assert!(ics.starts_with("BEGIN:VCALENDAR\r\nVERSION:2.0\r\nPRODID:-//Valentine//EN\r\n"));
        assert!(ics.contains("DTSTART;TZID=America/New_York:20250214T180000\r\n"));
        assert!(ics.contains("DTEND;TZID=America/New_York:20250214T210000\r\n"));
        assert!(ics.contains("DTSTAMP:20250214T180000Z\r\n"));
        assert!(ics.contains("SUMMARY:Valentine Date with Omar\r\n"));
        assert!(ics.contains("LOCATION:2340 Bluewater Way\\, Clearwater\\, Florida 33759\r\n"));
        assert!(ics.ends_with("END:VEVENT\r\nEND:VCALENDAR"));
        assert!(!ics.replace("\r\n", "").contains('\n'));
    }

    #[test]
    fn every_event_carries_uid_and_utc_stamp() {
        let inv = Invitation { start: "20260214T190000Z".into(), ..Invitation::default() };
        let ics = inv.to_ics();
        let event: Vec<&str> = ics
            .split("\r\n")
            .skip_while(|l| *l != "BEGIN:VEVENT")
            .take_while(|l| *l != "END:VEVENT")
            .collect();
        assert!(event.iter().any(|l| l.starts_with("UID:")));
        assert!(event.contains(&"DTSTAMP:20260214T190000Z"));
    }

    #[test]
    fn escapes_reserved_characters() {
        assert_eq!(escape_text("a;b,c\\d\ne"), "a\\;b\\,c\\\\d\\ne");
    }

    #[test]
    fn long_lines_fold_at_75_octets() {
        let inv = Invitation { summary: "♥".repeat(40), ..Invitation::default() };
        let ics = inv.to_ics();
        for line in ics.split("\r\n") {
            assert!(line.len() <= 75, "line too long: {line}");
        }
        let unfolded = ics.replace("\r\n ", "");
        assert!(unfolded.contains(&format!("SUMMARY:{}", "♥".repeat(40))));
    }

    #[test]
    fn reveal_text_mentions_location() {
        assert_eq!(
            Invitation::default().reveal_text(),
            "Be My Valentine on Feb 14th at 6 PM - Location: 2340 Bluewater Way, Clearwater, Florida 33759."
        );
    }
}
