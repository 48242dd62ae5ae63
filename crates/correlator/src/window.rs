// Rust guideline compliant 2026-10-12

//! State-change timestamp parsing and search-window arithmetic.

use domain::CorrelationError;
use time::OffsetDateTime;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

/// The only accepted shape: `YYYY-MM-DDThh:mm:ss.sss±hhmm`.
const STATE_CHANGE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!(
    "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3][offset_hour sign:mandatory][offset_minute]"
);

/// Parse a state-change timestamp. No fallback formats are attempted.
///
/// # Errors
///
/// Returns [`CorrelationError::TimestampParse`] when `input` deviates from the
/// fixed format in any way, including trailing characters.
pub fn parse_state_change_time(input: &str) -> Result<OffsetDateTime, CorrelationError> {
    OffsetDateTime::parse(input, STATE_CHANGE_FORMAT).map_err(|e| {
        CorrelationError::TimestampParse {
            input: input.to_owned(),
            reason: e.to_string(),
        }
    })
}

/// Symmetric window `[at - radius, at + radius]`.
///
/// # Errors
///
/// Returns [`CorrelationError::TimestampParse`] when either bound falls outside
/// the representable date range.
pub fn search_window(
    at: OffsetDateTime,
    radius: time::Duration,
) -> Result<(OffsetDateTime, OffsetDateTime), CorrelationError> {
    let out_of_range = || CorrelationError::TimestampParse {
        input: at.to_string(),
        reason: "search window out of range".to_owned(),
    };
    let start = at.checked_sub(radius).ok_or_else(out_of_range)?;
    let end = at.checked_add(radius).ok_or_else(out_of_range)?;
    Ok((start, end))
}

#[cfg(test)]
mod tests {
    use super::{parse_state_change_time, search_window};
    use domain::CorrelationError;
    use time::macros::datetime;

    #[test]
    fn parses_utc_timestamp() {
        let t = parse_state_change_time("2024-05-14T09:31:07.512+0000").unwrap();
        assert_eq!(t, datetime!(2024-05-14 09:31:07.512 UTC));
    }

    #[test]
    fn parses_non_utc_offset() {
        let t = parse_state_change_time("2024-05-14T15:01:07.512+0530").unwrap();
        assert_eq!(t, datetime!(2024-05-14 09:31:07.512 UTC));
        let t = parse_state_change_time("2024-05-14T04:31:07.000-0500").unwrap();
        assert_eq!(t, datetime!(2024-05-14 09:31:07 UTC));
    }

    #[test]
    fn rejects_every_other_shape() {
        for input in [
            "2024-05-14T09:31:07Z",
            "2024-05-14T09:31:07.512Z",
            "2024-05-14T09:31:07.512+00:00",
            "2024-05-14T09:31:07+0000",
            "2024-05-14T09:31:07.51+0000",
            "2024-05-14T09:31:07.5123+0000",
            "2024-05-14 09:31:07.512+0000",
            "2024-05-14T09:31:07.512+0000 ",
            "2024-05-14T09:31:07.512",
            "",
        ] {
            let result = parse_state_change_time(input);
            assert!(
                matches!(result, Err(CorrelationError::TimestampParse { .. })),
                "{input:?} must be rejected: {result:?}"
            );
        }
    }

    #[test]
    fn window_is_symmetric() {
        let at = datetime!(2024-05-14 09:31:07.512 UTC);
        let (start, end) = search_window(at, time::Duration::minutes(5)).unwrap();
        assert_eq!(start, datetime!(2024-05-14 09:26:07.512 UTC));
        assert_eq!(end, datetime!(2024-05-14 09:36:07.512 UTC));
    }

    #[test]
    fn window_overflow_is_an_error() {
        let at = datetime!(9999-12-31 23:59:00 UTC);
        assert!(search_window(at, time::Duration::minutes(5)).is_err());
    }
}
