use std::collections::BTreeSet;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::config::EmojiSettings;

/// Chooses the decorative emoji for a welcome message.
pub trait EmojiPicker: Send + Sync {
    fn pick(&mut self, pool: &[String]) -> Option<String>;
}

pub struct RandomPicker {
    rng: StdRng,
}

impl RandomPicker {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomPicker {
    fn default() -> Self {
        Self::new()
    }
}

impl EmojiPicker for RandomPicker {
    fn pick(&mut self, pool: &[String]) -> Option<String> {
        pool.choose(&mut self.rng).cloned()
    }
}

/// Always takes the first candidate.
#[derive(Debug, Default, Clone, Copy)]
pub struct FirstPicker;

impl EmojiPicker for FirstPicker {
    fn pick(&mut self, pool: &[String]) -> Option<String> {
        pool.first().cloned()
    }
}

/// Workspace emoji whose name contains one of the configured keywords.
pub fn emoji_pool(available: &BTreeSet<String>, settings: &EmojiSettings) -> Vec<String> {
    available
        .iter()
        .filter(|name| {
            settings
                .keywords
                .iter()
                .any(|keyword| !keyword.is_empty() && name.contains(keyword.as_str()))
        })
        .cloned()
        .collect()
}

pub fn choose(picker: &mut dyn EmojiPicker, pool: &[String], settings: &EmojiSettings) -> String {
    picker
        .pick(pool)
        .unwrap_or_else(|| settings.fallback.clone())
}
