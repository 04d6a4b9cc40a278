use std::env;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

const SLACK_TOKEN_VAR: &str = "SLACK_API_TOKEN";
const LEGACY_SLACK_TOKEN_VAR: &str = "SLACK_TOKEN";
const SLACK_API_BASE_VAR: &str = "SLACK_API_BASE";
pub const CONFIG_PATH_VAR: &str = "BOARD_CHANNELS_CONFIG";
pub const DEFAULT_API_BASE: &str = "https://slack.com/api/";

const DEFAULT_EMPLOYEES_GROUP: &str = "employees";
const DEFAULT_BOARD_GROUP: &str = "board";
const DEFAULT_AUTO_INVITED: &str = "takanory";
const DEFAULT_PREFIX: &str = "u-";
const DEFAULT_SUFFIX: &str = "-board";
const DEFAULT_TOPIC: &str =
    "{name}とboardの雑談ちゃんねる https://project.beproud.jp/redmine/projects/bpall/wiki/With-board";
const DEFAULT_WELCOME: &str = "このチャンネルは *{name}とboardの雑談ちゃんねる* です。役員と雑談したり、個人的なことを気軽に相談したりしてください :{emoji}:\n詳しくはトピックに設定してあるリンクをクリックしてください :bow:";
const DEFAULT_EMOJI_KEYWORD: &str = "parrot";
const DEFAULT_EMOJI_FALLBACK: &str = "party_parrot";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Name prefixes of administrators who join every channel on their own
    /// and are therefore left out of the invite list.
    pub auto_invited: Vec<String>,
    pub membership: Membership,
    pub channels: ChannelConventions,
    pub emoji: EmojiSettings,
}

/// Source of truth for who is a regular member and who is on the board.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Membership {
    /// Static name lists, matched against login or visible name.
    Lists {
        #[serde(default)]
        exclude: Vec<String>,
        #[serde(default)]
        board: Vec<String>,
    },
    /// Platform user-groups, looked up by handle.
    Groups {
        #[serde(default = "default_employees_group")]
        employees: String,
        #[serde(default = "default_board_group")]
        board: String,
    },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ChannelConventions {
    pub prefix: String,
    pub suffix: String,
    pub topic: String,
    pub welcome: String,
    pub existing: ExistingPolicy,
}

/// What an apply run does with a channel that already exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExistingPolicy {
    /// Archive the channel and build a fresh one, dropping its history.
    #[default]
    Recreate,
    Keep,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EmojiSettings {
    pub keywords: Vec<String>,
    pub fallback: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            auto_invited: vec![DEFAULT_AUTO_INVITED.to_string()],
            membership: Membership::default(),
            channels: ChannelConventions::default(),
            emoji: EmojiSettings::default(),
        }
    }
}

impl Default for Membership {
    fn default() -> Self {
        Membership::Groups {
            employees: default_employees_group(),
            board: default_board_group(),
        }
    }
}

impl Default for ChannelConventions {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            suffix: DEFAULT_SUFFIX.to_string(),
            topic: DEFAULT_TOPIC.to_string(),
            welcome: DEFAULT_WELCOME.to_string(),
            existing: ExistingPolicy::default(),
        }
    }
}

impl Default for EmojiSettings {
    fn default() -> Self {
        Self {
            keywords: vec![DEFAULT_EMOJI_KEYWORD.to_string()],
            fallback: DEFAULT_EMOJI_FALLBACK.to_string(),
        }
    }
}

fn default_employees_group() -> String {
    DEFAULT_EMPLOYEES_GROUP.to_string()
}

fn default_board_group() -> String {
    DEFAULT_BOARD_GROUP.to_string()
}

impl Config {
    pub fn from_toml(raw: &str) -> Result<Self> {
        toml::from_str(raw).context("Invalid board-channels configuration")
    }
}

/// Loads the roster configuration from `path`, or falls back to the built-in
/// defaults when no file is given.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };

    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    Config::from_toml(&raw).with_context(|| format!("Failed to load {}", path.display()))
}

pub fn slack_token() -> Result<String> {
    dotenvy::dotenv().ok();
    env::var(SLACK_TOKEN_VAR)
        .or_else(|_| env::var(LEGACY_SLACK_TOKEN_VAR))
        .ok()
        .map(|token| token.trim().to_owned())
        .filter(|token| !token.is_empty())
        .context("SLACK_API_TOKEN not found. Export a bot token with the channels:manage, groups:write, usergroups:read and users:read scopes.")
}

pub fn api_base() -> String {
    env::var(SLACK_API_BASE_VAR).unwrap_or_else(|_| DEFAULT_API_BASE.to_string())
}
