//! Channel names and texts derived from a member's profile.

use crate::config::ChannelConventions;
use crate::model::User;

/// Markers after which a display name carries a status note, e.g. `hanako(休み)`.
const SUSPENSION_MARKERS: [char; 2] = ['(', '（'];

/// Name used inside channel names and texts: the display name with
/// separators removed, or the login as-is when the display name is empty.
pub fn base_name(user: &User) -> String {
    let display: String = strip_status(&user.display_name)
        .chars()
        .filter(|c| !matches!(c, '-' | '_' | '.') && !c.is_whitespace())
        .collect();
    if display.is_empty() {
        strip_status(&user.login).trim().to_string()
    } else {
        display
    }
}

pub fn channel_name(base: &str, conventions: &ChannelConventions) -> String {
    format!(
        "{}{}{}",
        conventions.prefix,
        base.to_lowercase(),
        conventions.suffix
    )
}

/// Fills `{name}` and `{emoji}` placeholders of a topic or welcome template.
pub fn render(template: &str, name: &str, emoji: &str) -> String {
    template.replace("{emoji}", emoji).replace("{name}", name)
}

fn strip_status(raw: &str) -> &str {
    raw.split(SUSPENSION_MARKERS).next().unwrap_or_default()
}
