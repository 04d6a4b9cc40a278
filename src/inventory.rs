use std::collections::BTreeMap;

use crate::config::ChannelConventions;
use crate::model::Channel;

/// Existing announcement channels keyed by name. A point-in-time view,
/// valid only for the run that fetched it.
pub type Inventory = BTreeMap<String, Channel>;

/// Keeps the channels named `<prefix><token><suffix>` with a non-empty token.
pub fn inventory(channels: Vec<Channel>, conventions: &ChannelConventions) -> Inventory {
    channels
        .into_iter()
        .filter(|channel| matches_convention(&channel.name, conventions))
        .map(|channel| (channel.name.clone(), channel))
        .collect()
}

pub fn matches_convention(name: &str, conventions: &ChannelConventions) -> bool {
    name.strip_prefix(conventions.prefix.as_str())
        .and_then(|rest| rest.strip_suffix(conventions.suffix.as_str()))
        .is_some_and(|token| !token.is_empty())
}
