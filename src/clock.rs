use anyhow::{Result, anyhow};

/// Convert a period clock in "MM:SS" form to elapsed seconds.
///
/// Exactly two numeric fields are required; anything else is a format error.
pub fn parse_clock(raw: &str) -> Result<u32> {
    let mut fields = raw.trim().split(':');
    let (Some(minutes), Some(seconds), None) = (fields.next(), fields.next(), fields.next()) else {
        return Err(anyhow!("clock not in MM:SS form: {raw:?}"));
    };
    let minutes: u32 = minutes
        .trim()
        .parse()
        .map_err(|_| anyhow!("bad minutes field in clock {raw:?}"))?;
    let seconds: u32 = seconds
        .trim()
        .parse()
        .map_err(|_| anyhow!("bad seconds field in clock {raw:?}"))?;
    Ok(minutes * 60 + seconds)
}

/// Clock as seen by the pipeline: header and period-boundary events carry no
/// clock, and a malformed clock is treated the same as a missing one rather
/// than aborting the run.
pub fn clock_seconds(raw: Option<&str>) -> Option<u32> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    parse_clock(raw).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_mm_ss() {
        assert_eq!(parse_clock("00:00").unwrap(), 0);
        assert_eq!(parse_clock("12:34").unwrap(), 754);
        assert_eq!(parse_clock("20:00").unwrap(), 1200);
        assert_eq!(parse_clock("1:5").unwrap(), 65);
    }

    #[test]
    fn rejects_other_shapes() {
        assert!(parse_clock("").is_err());
        assert!(parse_clock("12").is_err());
        assert!(parse_clock("1:2:3").is_err());
        assert!(parse_clock("ab:cd").is_err());
        assert!(parse_clock("-1:00").is_err());
    }

    #[test]
    fn pipeline_clock_collapses_to_absent() {
        assert_eq!(clock_seconds(Some("05:30")), Some(330));
        assert_eq!(clock_seconds(Some("")), None);
        assert_eq!(clock_seconds(Some("garbage")), None);
        assert_eq!(clock_seconds(None), None);
    }
}
