//! Validation of original URLs submitted for shortening.

use std::borrow::Cow;
use url::Url;
use validator::ValidationError;

/// Checks that `value` is an absolute `http`/`https` URL with a host.
///
/// Used as a `validator` custom function on request DTOs. The URL is only
/// checked, never rewritten: the stored value is exactly what was submitted,
/// so it must also be usable verbatim as a `Location` header. `Url::parse`
/// silently strips control characters and surrounding whitespace; such
/// input is rejected instead of being accepted in its unparsed form.
///
/// # Errors
///
/// Returns a `ValidationError` with code `url` otherwise.
pub fn validate_original_url(value: &str) -> Result<(), ValidationError> {
    let invalid = || ValidationError::new("url").with_message(Cow::Borrowed("Invalid URL"));

    if value.trim() != value || value.chars().any(char::is_control) {
        return Err(invalid());
    }

    let parsed = Url::parse(value).map_err(|_| invalid())?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid());
    }

    match parsed.host_str() {
        Some(host) if !host.is_empty() => Ok(()),
        _ => Err(invalid()),
    }
}
