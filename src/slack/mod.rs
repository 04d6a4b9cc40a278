mod api;
mod client;
mod types;

use std::collections::BTreeSet;

use anyhow::Result;
use async_trait::async_trait;

use crate::model::{Channel, ChannelId, User, UserGroup, UserId};

pub use client::SlackClient;

/// The slice of the Slack Web API this tool drives.
#[async_trait]
pub trait SlackApi: Send + Sync {
    /// User the token acts as.
    async fn auth_test(&self) -> Result<UserId>;

    async fn list_users(&self) -> Result<Vec<User>>;

    async fn list_usergroups(&self) -> Result<Vec<UserGroup>>;

    async fn usergroup_members(&self, group_id: &str) -> Result<Vec<UserId>>;

    /// Members of the user-group with `handle`, or `None` when no group
    /// carries that handle.
    async fn list_usergroup_members(&self, handle: &str) -> Result<Option<BTreeSet<UserId>>> {
        let groups = self.list_usergroups().await?;
        let Some(group) = groups.into_iter().find(|group| group.handle == handle) else {
            return Ok(None);
        };
        let members = self.usergroup_members(&group.id).await?;
        Ok(Some(members.into_iter().collect()))
    }

    /// Unarchived private channels visible to the token.
    async fn list_private_channels(&self) -> Result<Vec<Channel>>;

    async fn create_private_channel(&self, name: &str) -> Result<ChannelId>;

    async fn invite(&self, channel: &ChannelId, users: &[UserId]) -> Result<()>;

    async fn set_topic(&self, channel: &ChannelId, topic: &str) -> Result<()>;

    async fn post_message(&self, channel: &ChannelId, text: &str) -> Result<()>;

    async fn rename_channel(&self, channel: &ChannelId, name: &str) -> Result<()>;

    async fn archive_channel(&self, channel: &ChannelId) -> Result<()>;

    /// Names of the workspace's custom emoji.
    async fn list_emoji(&self) -> Result<BTreeSet<String>>;
}
