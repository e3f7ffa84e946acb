//! Dates in `Expires` attributes have their own parsing rules (RFC 6265, section 5.1.1).
//!
//! ```text
//! cookie-date     = *delimiter date-token-list *delimiter
//! date-token-list = date-token *( 1*delimiter date-token )
//! date-token      = 1*non-delimiter
//!
//! delimiter       = %x09 / %x20-2F / %x3B-40 / %x5B-60 / %x7B-7E
//! non-delimiter   = %x00-08 / %x0A-1F / DIGIT / ":" / ALPHA / %x7F-FF
//! non-digit       = %x00-2F / %x3A-FF
//!
//! day-of-month    = 1*2DIGIT ( non-digit *OCTET )
//! month           = ( "jan" / "feb" / "mar" / "apr" /
//!                     "may" / "jun" / "jul" / "aug" /
//!                     "sep" / "oct" / "nov" / "dec" ) *OCTET
//! year            = 2*4DIGIT ( non-digit *OCTET )
//! time            = hms-time ( non-digit *OCTET )
//! hms-time        = time-field ":" time-field ":" time-field
//! time-field      = 1*2DIGIT
//! ```
use time::{Date, Month, PrimitiveDateTime, Time};

const MONTHS: [&[u8; 3]; 12] = [
    b"jan", b"feb", b"mar", b"apr", b"may", b"jun", b"jul", b"aug", b"sep", b"oct", b"nov",
    b"dec",
];

/// Parses a cookie date into seconds since the Unix epoch (UTC).
///
/// Returns `None` for anything the RFC algorithm rejects: a missing
/// component, an out-of-range field, a year before 1601 or a calendar date
/// that doesn't exist.
///
/// ```rust
/// use galletta::parse_cookie_date;
///
/// assert_eq!(parse_cookie_date("Wed, 09 Jun 2021 10:18:14 GMT"), Some(1623233894));
/// // Two-digit years map to 1970-2069.
/// assert_eq!(parse_cookie_date("09 Jun 21 10:18:14"), Some(1623233894));
/// assert_eq!(parse_cookie_date("32 Jan 2021 10:18:14"), None);
/// ```
pub fn parse_cookie_date(input: impl AsRef<[u8]>) -> Option<i64> {
    let mut time = None;
    let mut day_of_month = None;
    let mut month = None;
    let mut year = None;

    for token in input
        .as_ref()
        .split(|b| is_delimiter(*b))
        .filter(|token| !token.is_empty())
    {
        if time.is_none() {
            if let Some(hms) = parse_time(token) {
                time = Some(hms);
                continue;
            }
        }
        if day_of_month.is_none() {
            if let Some(day) = leading_number(token, 1, 2) {
                day_of_month = Some(day);
                continue;
            }
        }
        if month.is_none() {
            if let Some(m) = parse_month(token) {
                month = Some(m);
                continue;
            }
        }
        if year.is_none() {
            if let Some(value) = parse_year(token) {
                year = Some(value);
                continue;
            }
        }
    }

    let (hour, minute, second) = time?;
    let (day, month, year) = (day_of_month?, month?, year?);
    if !(1..=31).contains(&day) || year < 1601 || hour > 23 || minute > 59 || second > 59 {
        return None;
    }

    let date = Date::from_calendar_date(year as i32, Month::try_from(month).ok()?, day as u8).ok()?;
    let time = Time::from_hms(hour as u8, minute as u8, second as u8).ok()?;
    Some(PrimitiveDateTime::new(date, time).assume_utc().unix_timestamp())
}

fn is_delimiter(b: u8) -> bool {
    matches!(b, 0x09 | 0x20..=0x2F | 0x3B..=0x40 | 0x5B..=0x60 | 0x7B..=0x7E)
}

/// Reads the maximal run of leading digits and returns its value together with the rest
/// of the token, if the run is between `min` and `max` digits long.
fn leading_digits(token: &[u8], min: usize, max: usize) -> Option<(u32, &[u8])> {
    let len = token.iter().take_while(|b| b.is_ascii_digit()).count();
    if len < min || len > max {
        return None;
    }
    let value = token[..len]
        .iter()
        .fold(0u32, |acc, b| acc * 10 + u32::from(b - b'0'));
    Some((value, &token[len..]))
}

/// `1*2DIGIT ( non-digit *OCTET )` and friends: the trailing text is ignored.
fn leading_number(token: &[u8], min: usize, max: usize) -> Option<u32> {
    leading_digits(token, min, max).map(|(value, _)| value)
}

fn parse_time(token: &[u8]) -> Option<(u32, u32, u32)> {
    let (hour, rest) = leading_digits(token, 1, 2)?;
    let rest = rest.strip_prefix(b":")?;
    let (minute, rest) = leading_digits(rest, 1, 2)?;
    let rest = rest.strip_prefix(b":")?;
    let (second, _) = leading_digits(rest, 1, 2)?;
    Some((hour, minute, second))
}

fn parse_month(token: &[u8]) -> Option<u8> {
    let prefix = token.get(..3)?;
    MONTHS
        .iter()
        .position(|name| prefix.eq_ignore_ascii_case(&name[..]))
        .map(|index| index as u8 + 1)
}

fn parse_year(token: &[u8]) -> Option<u32> {
    let len = token.iter().take_while(|b| b.is_ascii_digit()).count();
    let year = leading_number(token, 2, 4)?;
    if len == 2 {
        Some(if year >= 70 { year + 1900 } else { year + 2000 })
    } else {
        Some(year)
    }
}

#[cfg(test)]
mod tests {
    use super::parse_cookie_date;
    use googletest::prelude::*;

    const SUN_06_NOV_1994: i64 = 784111777;

    #[test]
    fn common_formats() {
        let cases = [
            "Sun, 06 Nov 1994 08:49:37 GMT",
            "Sunday, 06-Nov-94 08:49:37 GMT",
            "Sun Nov  6 08:49:37 1994",
            "sun, 06 NOV 1994 08:49:37 gmt",
            "06 November 1994 08:49:37",
            "1994 Nov 6 08:49:37",
            "08:49:37 6 Nov 1994",
            "Sun, 06 Nov 1994 08:49:37GMT",
        ];
        for case in cases {
            assert_eq!(parse_cookie_date(case), Some(SUN_06_NOV_1994), "case: {case}");
        }
    }

    #[test]
    fn reference_dates() {
        assert_that!(
            parse_cookie_date("Wed, 09 Jun 2021 10:18:14 GMT"),
            some(eq(1623233894))
        );
        assert_that!(parse_cookie_date("Thu, 01 Jan 1970 00:00:00 GMT"), some(eq(0)));
        assert_that!(
            parse_cookie_date("Mon, 01 Jan 1601 00:00:00 GMT"),
            some(eq(-11644473600))
        );
        assert_that!(
            parse_cookie_date("Fri, 31 Dec 9999 23:59:59 GMT"),
            some(eq(253402300799))
        );
        assert_that!(parse_cookie_date("29 Feb 2024 12:00:00"), some(eq(1709208000)));
    }

    #[test]
    fn two_digit_years() {
        assert_eq!(
            parse_cookie_date("09 Jun 21 10:18:14"),
            parse_cookie_date("09 Jun 2021 10:18:14")
        );
        assert_eq!(
            parse_cookie_date("1 Jan 70 00:00:00"),
            parse_cookie_date("1 Jan 1970 00:00:00")
        );
        assert_eq!(parse_cookie_date("1 Jan 69 00:00:00"), Some(3124224000));
    }

    #[test]
    fn rejects() {
        let cases = [
            "",
            "   ",
            "32 Jan 2021 10:18:14",
            "0 Jan 2021 10:18:14",
            "09 Jun 2021",
            "Jun 2021 10:18:14",
            "09 2021 10:18:14",
            "09 Jun 10:18:14",
            "31 Feb 2021 10:18:14",
            "29 Feb 2023 10:18:14",
            "01 Jan 1600 00:00:00",
            "01 Jan 0050 00:00:00",
            "01 Jan 2021 24:00:00",
            "01 Jan 2021 23:60:00",
            "01 Jan 2021 23:59:60",
            "01 Jan 2021 123:00:00",
            "123 Jan 2021 00:00:00",
            "01 Jan 20215 00:00:00",
            "not a date at all",
        ];
        for case in cases {
            assert_eq!(parse_cookie_date(case), None, "case: {case:?}");
        }
    }

    #[test]
    fn first_candidate_for_each_field_wins() {
        // The second time and day are ignored once the fields are set.
        assert_that!(
            parse_cookie_date("06 Nov 1994 08:49:37 07 11:11:11"),
            some(eq(SUN_06_NOV_1994))
        );
    }

    #[test]
    fn non_ascii_tokens_do_not_panic() {
        assert_that!(parse_cookie_date("06 Növ 1994 08:49:37".as_bytes()), none());
        assert_that!(parse_cookie_date([0xff, 0xfe, b' ', b'1']), none());
    }
}
