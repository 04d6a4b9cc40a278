use std::collections::HashMap;

use serde::Deserialize;

pub const AUTH_TEST: &str = "auth.test";
pub const USERS_LIST: &str = "users.list";
pub const USERGROUPS_LIST: &str = "usergroups.list";
pub const USERGROUPS_USERS_LIST: &str = "usergroups.users.list";
pub const CONVERSATIONS_LIST: &str = "conversations.list";
pub const CONVERSATIONS_CREATE: &str = "conversations.create";
pub const CONVERSATIONS_INVITE: &str = "conversations.invite";
pub const CONVERSATIONS_SET_TOPIC: &str = "conversations.setTopic";
pub const CONVERSATIONS_RENAME: &str = "conversations.rename";
pub const CONVERSATIONS_ARCHIVE: &str = "conversations.archive";
pub const CHAT_POST_MESSAGE: &str = "chat.postMessage";
pub const EMOJI_LIST: &str = "emoji.list";
pub const PRIVATE_CHANNEL_TYPE: &str = "private_channel";
pub const PAGE_LIMIT: &str = "200";
pub const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

#[derive(Debug, Deserialize)]
pub struct ResponseMetadata {
    pub next_cursor: Option<String>,
}

/// Common Web API envelope; `body` carries the method-specific fields.
#[derive(Debug, Deserialize)]
pub(super) struct SlackResponse<T> {
    pub ok: bool,
    pub error: Option<String>,
    pub response_metadata: Option<ResponseMetadata>,
    #[serde(flatten)]
    pub body: T,
}

#[derive(Debug, Deserialize)]
pub(super) struct AuthTestBody {
    #[serde(default)]
    pub user_id: String,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct Empty {}

#[derive(Debug, Deserialize)]
pub(super) struct UsersPage {
    #[serde(default)]
    pub members: Vec<SlackUser>,
}

#[derive(Debug, Deserialize)]
pub(super) struct SlackUser {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub deleted: bool,
    #[serde(default)]
    pub is_bot: bool,
    #[serde(default)]
    pub is_restricted: bool,
    #[serde(default)]
    pub is_ultra_restricted: bool,
    #[serde(default)]
    pub profile: SlackProfile,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct SlackProfile {
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub real_name: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct UsergroupsBody {
    #[serde(default)]
    pub usergroups: Vec<SlackUsergroup>,
}

#[derive(Debug, Deserialize)]
pub(super) struct SlackUsergroup {
    pub id: String,
    #[serde(default)]
    pub handle: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct UsergroupUsersBody {
    #[serde(default)]
    pub users: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ChannelsPage {
    #[serde(default)]
    pub channels: Vec<SlackChannel>,
}

#[derive(Debug, Deserialize)]
pub(super) struct CreatedChannelBody {
    pub channel: Option<SlackChannel>,
}

#[derive(Debug, Deserialize)]
pub(super) struct SlackChannel {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub creator: Option<String>,
    pub topic: Option<SlackTopic>,
}

#[derive(Debug, Deserialize)]
pub(super) struct SlackTopic {
    #[serde(default)]
    pub value: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct EmojiBody {
    #[serde(default)]
    pub emoji: HashMap<String, String>,
}
