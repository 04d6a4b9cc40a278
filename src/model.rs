use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelId(pub String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ChannelId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UserFlags {
    pub is_bot: bool,
    pub is_deleted: bool,
    pub is_restricted: bool,
    pub is_ultra_restricted: bool,
}

impl UserFlags {
    /// Bots, deactivated accounts and guests never get a channel.
    pub fn is_ineligible(&self) -> bool {
        self.is_bot || self.is_deleted || self.is_restricted || self.is_ultra_restricted
    }
}

/// Snapshot of a workspace member, fetched once per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub login: String,
    pub display_name: String,
    pub real_name: String,
    pub flags: UserFlags,
}

impl User {
    pub fn new(id: impl Into<String>, login: impl Into<String>) -> Self {
        Self {
            id: UserId::new(id),
            login: login.into(),
            display_name: String::new(),
            real_name: String::new(),
            flags: UserFlags::default(),
        }
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }

    pub fn with_flags(mut self, flags: UserFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Name shown in the client: display name, then real name, then login.
    pub fn visible_name(&self) -> &str {
        [&self.display_name, &self.real_name]
            .into_iter()
            .find(|name| !name.is_empty())
            .map(String::as_str)
            .unwrap_or(&self.login)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channel {
    pub id: ChannelId,
    pub name: String,
    pub topic: String,
    pub creator: Option<UserId>,
}

/// Platform-managed user-group, addressed by its `@handle`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserGroup {
    pub id: String,
    pub handle: String,
}
