mod parser;

use chrono::{DateTime, FixedOffset};
use combine::Parser;

/// Parses a date and time string used in Internet Message Format based on what
/// specified in RFC 5322 section 3.3.
///
/// Different from `DateTime::parse_from_rfc2822`, this in addition allows some
/// patterns which are not supported by that function, specifically:
/// * using single digit for hour / minute / second,
/// * support comment, and
/// * treating `-0000` as `+0000`.
///
/// Note: multi-line value handling defined in IMF is ignored. Whitespace,
/// tab, carriage return, and newline are handled the same way. This function
/// only accepts a complete datetime string.
pub fn parse_datetime(s: &[u8]) -> Option<DateTime<FixedOffset>> {
    match parser::date_time().parse(s) {
        Ok((dt, b"")) => Some(dt),
        _ => None,
    }
}

/// Extracts the time stamp of a `Received` header, which is the date after
/// the last semicolon of the header value.
pub fn parse_received(value: &str) -> Option<DateTime<FixedOffset>> {
    let (_, date) = value.rsplit_once(';')?;
    parse_datetime(date.trim().as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, NaiveDate, TimeZone};

    #[test]
    fn test_parsed() {
        let utc = FixedOffset::east_opt(0).unwrap();
        let edt = FixedOffset::east_opt(-4 * 3600).unwrap();
        let mst = FixedOffset::east_opt(-7 * 3600).unwrap();
        let cest = FixedOffset::east_opt(2 * 3600).unwrap();
        let testcases: Vec<(&[u8], _)> = vec![
            (
                b"Wed, 18 Feb 2015 23:16:09 +0000",
                utc.with_ymd_and_hms(2015, 2, 18, 23, 16, 9).unwrap(),
            ),
            (
                b"Wed, 18 Feb 2015 23:59:60 -0400",
                edt.from_local_datetime(
                    &NaiveDate::from_ymd_opt(2015, 2, 18)
                        .unwrap()
                        .and_hms_milli_opt(23, 59, 59, 1_000)
                        .unwrap(),
                )
                .unwrap(),
            ),
            (
                b"Wed, 18 Feb 2015 23:59:59 EDT",
                edt.with_ymd_and_hms(2015, 2, 18, 23, 59, 59).unwrap(),
            ),
            (
                b"Tue, 11 Jul 2017 18:30:33 +0000 (UTC)",
                utc.with_ymd_and_hms(2017, 7, 11, 18, 30, 33).unwrap(),
            ),
            (
                b"Sat, 01 Oct 2016 14:47:20 -0000",
                utc.with_ymd_and_hms(2016, 10, 1, 14, 47, 20).unwrap(),
            ),
            (
                b"Fri, 9 Nov 2007  1:10:02 -0700 (MST)",
                mst.with_ymd_and_hms(2007, 11, 9, 1, 10, 2).unwrap(),
            ),
            (
                b"3 Jun 2024 07:58 +0200",
                cest.with_ymd_and_hms(2024, 6, 3, 7, 58, 0).unwrap(),
            ),
        ];
        for (s, dt) in testcases {
            assert_eq!(parse_datetime(s), Some(dt));
        }
    }

    #[test]
    fn test_not_parsed() {
        let testcases: &[&[u8]] = &[
            b"Tue, 18 Feb 2015 23:16:09 +0000",
            b"31 Feb 2015 10:00:00 +0000",
            b"yesterday",
            b"",
        ];
        for s in testcases {
            assert_eq!(parse_datetime(s), None);
        }
    }

    #[test]
    fn test_received() {
        let utc = FixedOffset::east_opt(0).unwrap();
        assert_eq!(
            parse_received(
                "from mx.example.com (mx.example.com [192.0.2.1])\r\n \
                 by mail.example.com with ESMTPS id 4a2b;\r\n \
                 Sat, 01 Jun 2024 08:00:00 +0000"
            ),
            Some(utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap())
        );
        assert_eq!(parse_received("from somewhere by elsewhere"), None);
        assert_eq!(parse_received("by x; not a date"), None);
    }
}
