//! Date/time and source location header written by the upstream logger.
//!
//! Both extractors are total: when the text does not look like the header the
//! flags announce, they report nothing consumed and the caller keeps the text
//! as message content.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

use crate::flags::LogFlags;

const DATE_LAYOUT: &str = "%Y/%m/%d";
const DATE_TIME_LAYOUT: &str = "%Y/%m/%d %H:%M:%S";
const DATE_TIME_FRAC_LAYOUT: &str = "%Y/%m/%d %H:%M:%S%.f";

/// Byte index of the second occurrence of `needle` in `s`.
pub fn second_index(s: &str, needle: char) -> Option<usize> {
    s.match_indices(needle).nth(1).map(|(i, _)| i)
}

/// Strip a leading `YYYY/MM/DD[ HH:MM:SS[.ffffff]]` token.
///
/// Returns the parsed timestamp (UTC) and the number of bytes consumed,
/// including the space that ends the token.
pub fn extract_timestamp(text: &str, flags: LogFlags) -> (Option<DateTime<Utc>>, usize) {
    if !flags.has_date() {
        return (None, 0);
    }

    let end = if flags.has_time() {
        second_index(text, ' ')
    } else {
        text.find(' ')
    };
    let Some(end) = end else {
        return (None, 0);
    };

    let token = &text[..end];
    let parsed = if flags.has_microseconds() {
        NaiveDateTime::parse_from_str(token, DATE_TIME_FRAC_LAYOUT).ok()
    } else if flags.has_time() {
        NaiveDateTime::parse_from_str(token, DATE_TIME_LAYOUT).ok()
    } else {
        NaiveDate::parse_from_str(token, DATE_LAYOUT)
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
    };

    match parsed {
        Some(naive) => (Some(Utc.from_utc_datetime(&naive)), end + 1),
        None => {
            tracing::trace!(token, "header token is not a timestamp");
            (None, 0)
        }
    }
}

/// Strip a leading `file:line: ` token.
///
/// The token ends at the second `:`; paths containing a `:` of their own are
/// not supported. Returns the token without the trailing `: ` and the number
/// of bytes consumed.
pub fn extract_location(text: &str, flags: LogFlags) -> (Option<&str>, usize) {
    if !flags.has_location() {
        return (None, 0);
    }

    match second_index(text, ':') {
        Some(end) if end > 0 => {
            let mut consumed = end + 1;
            if text[consumed..].starts_with(' ') {
                consumed += 1;
            }
            (Some(&text[..end]), consumed)
        }
        _ => (None, 0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn test_second_index() {
        assert_eq!(second_index("a:b:c", ':'), Some(3));
        assert_eq!(second_index("a:b", ':'), None);
        assert_eq!(second_index("", ':'), None);
        assert_eq!(second_index("::", ':'), Some(1));
    }

    #[test]
    fn timestamp_requires_date_flag() {
        assert_eq!(
            extract_timestamp("2024/01/02 msg", LogFlags::empty()),
            (None, 0)
        );
        assert_eq!(
            extract_timestamp("2024/01/02 10:00:00 msg", LogFlags::TIME),
            (None, 0)
        );
    }

    #[test]
    fn date_only() {
        let text = "2024/01/02 with date";
        let (t, n) = extract_timestamp(text, LogFlags::DATE);
        assert_eq!(t, Some(ts("2024-01-02T00:00:00Z")));
        assert_eq!(&text[n..], "with date");
    }

    #[test]
    fn date_and_time() {
        let text = "2024/01/02 03:04:05 msg";
        let (t, n) = extract_timestamp(text, LogFlags::STD_FLAGS);
        assert_eq!(t, Some(ts("2024-01-02T03:04:05Z")));
        assert_eq!(&text[n..], "msg");
    }

    #[test]
    fn date_time_micros() {
        let text = "2024/01/02 03:04:05.123456 msg";
        let (t, n) = extract_timestamp(text, LogFlags::DATE | LogFlags::MICROSECONDS);
        assert_eq!(t, Some(ts("2024-01-02T03:04:05.123456Z")));
        assert_eq!(&text[n..], "msg");
    }

    #[test]
    fn malformed_timestamp_is_absent() {
        assert_eq!(extract_timestamp("not a date", LogFlags::DATE), (None, 0));
        assert_eq!(extract_timestamp("nospace", LogFlags::DATE), (None, 0));
        assert_eq!(
            extract_timestamp("2024/01/02 msg", LogFlags::STD_FLAGS),
            (None, 0)
        );
    }

    #[test]
    fn location() {
        let text = "main.rs:42: hello: world";
        let (loc, n) = extract_location(text, LogFlags::SHORT_FILE);
        assert_eq!(loc, Some("main.rs:42"));
        assert_eq!(&text[n..], "hello: world");

        let text = "/src/app/main.rs:7: hi";
        let (loc, n) = extract_location(text, LogFlags::LONG_FILE);
        assert_eq!(loc, Some("/src/app/main.rs:7"));
        assert_eq!(&text[n..], "hi");
    }

    #[test]
    fn location_needs_two_colons() {
        assert_eq!(extract_location("main.rs:42 hi", LogFlags::SHORT_FILE), (None, 0));
        assert_eq!(extract_location("a:b:c", LogFlags::empty()), (None, 0));
    }

    #[test]
    fn location_at_end_of_text() {
        let (loc, n) = extract_location("a.rs:1:", LogFlags::SHORT_FILE);
        assert_eq!(loc, Some("a.rs:1"));
        assert_eq!(n, 7);
    }
}
