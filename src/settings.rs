//! Settings-token substitution
//!
//! Replaces `%SETTINGS_<key>` tokens with entries from a settings
//! dictionary. The whole dictionary is applied N times, N = number of
//! entries, so a chain of settings referencing each other up to depth N
//! reaches a fixed point. Cycles do not error; they stabilize on a
//! partial substitution and are surfaced by the residue warning.

use std::collections::BTreeMap;

use tracing::warn;

/// Token prefix for settings references.
pub const TOKEN_PREFIX: &str = "%SETTINGS_";

/// Substitute every settings token in `text`.
///
/// Any token still present after the bounded passes is kept as literal
/// text and reported at warn level.
pub fn substitute(text: &str, settings: &BTreeMap<String, String>) -> String {
    let mut output = text.to_string();
    for _ in 0..settings.len() {
        for (key, value) in settings {
            let token = format!("{TOKEN_PREFIX}{key}");
            output = output.replace(&token, value);
        }
    }

    if output.contains(TOKEN_PREFIX) {
        warn!("unresolved settings token left in output after substitution");
    }

    output
}
