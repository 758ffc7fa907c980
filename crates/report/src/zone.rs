//! Resolves the machine's named time zone, so the generation timestamp can
//! print an abbreviation instead of a bare offset.

use chrono_tz::Tz;

/// The local IANA time zone, if it can be determined.
///
/// A `TZ` variable naming a zone takes precedence, as it does for the C
/// library; otherwise the system setting is asked through `iana-time-zone`.
pub fn local_zone() -> Option<Tz> {
    let from_env = std::env::var("TZ").ok();
    zone_from_tz_var(from_env.as_deref()).or_else(system_zone)
}

fn system_zone() -> Option<Tz> {
    match iana_time_zone::get_timezone() {
        Ok(name) => parse_zone(&name),
        Err(e) => {
            tracing::debug!(error = %e, "System time zone is unavailable.");
            None
        }
    }
}

/// Reads a `TZ` value. A leading `:` is allowed; POSIX rule strings such as
/// `BRT3` are not zone names and yield `None`.
fn zone_from_tz_var(value: Option<&str>) -> Option<Tz> {
    let name = value?.trim().trim_start_matches(':');
    if name.is_empty() {
        return None;
    }
    parse_zone(name)
}

fn parse_zone(name: &str) -> Option<Tz> {
    match name.parse::<Tz>() {
        Ok(zone) => Some(zone),
        Err(_) => {
            tracing::debug!(zone = name, "Unknown time zone name.");
            None
        }
    }
}
