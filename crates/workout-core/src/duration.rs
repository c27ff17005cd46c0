//! Parsing of the export's free-text `Duration` column.

use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

fn token_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d+)([hm])$").expect("regex is valid"))
}

/// Convert a duration such as `"1h 31m"`, `"45m"` or `"32h 5m"` into minutes.
///
/// Tokens are separated by whitespace and may appear in any order. A token
/// that is not `<digits>h` or `<digits>m` contributes nothing; the function
/// never fails. Repeated units are summed. Oversized tokens and the total
/// both saturate at `u32::MAX`.
///
/// # Examples
///
/// ```
/// use workout_core::duration::parse_duration;
///
/// assert_eq!(parse_duration("1h 31m"), 91);
/// assert_eq!(parse_duration(""), 0);
/// ```
pub fn parse_duration(input: &str) -> u32 {
    let re = token_regex();
    let mut total: u32 = 0;

    for token in input.split_whitespace() {
        let Some(caps) = re.captures(token) else {
            debug!(token, "ignoring unrecognised duration token");
            continue;
        };
        // All digits, so a parse failure can only mean overflow.
        let value = caps[1].parse::<u64>().unwrap_or(u64::MAX);
        let minutes = match &caps[2] {
            "h" => value.saturating_mul(60),
            _ => value,
        };
        total = total.saturating_add(u32::try_from(minutes).unwrap_or(u32::MAX));
    }

    total
}
