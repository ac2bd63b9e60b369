//! Built-in string formats.

use crate::keyword::cast::is_date;
use crate::schema::StringFormat;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use std::net::{Ipv4Addr, Ipv6Addr};
use url::Url;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .expect("email regex")
});
static HOSTNAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?(?:\.[a-z0-9](?:[-0-9a-z]{0,61}[0-9a-z])?)*$",
    )
    .expect("hostname regex")
});
static UUID_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:urn:uuid:)?[0-9a-f]{8}-(?:[0-9a-f]{4}-){3}[0-9a-f]{12}$")
        .expect("uuid regex")
});

/// Whether `text` satisfies `format`.
pub fn check(format: StringFormat, text: &str) -> bool {
    match format {
        StringFormat::Date => NaiveDate::parse_from_str(text, "%Y-%m-%d").is_ok(),
        StringFormat::DateTime => is_date(text),
        StringFormat::Uri => Url::parse(text).is_ok(),
        StringFormat::Email => EMAIL_RE.is_match(text),
        StringFormat::Hostname => text.len() <= 253 && HOSTNAME_RE.is_match(text),
        StringFormat::Ipv4 => text.parse::<Ipv4Addr>().is_ok(),
        StringFormat::Ipv6 => text.parse::<Ipv6Addr>().is_ok(),
        StringFormat::Uuid => {
            UUID_RE.is_match(text)
                && uuid::Uuid::parse_str(text.trim_start_matches("urn:uuid:")).is_ok()
        }
        StringFormat::Regex => Regex::new(text).is_ok(),
    }
}
