use std::collections::BTreeSet;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;

use super::types::{
    AuthTestBody, ChannelsPage, CreatedChannelBody, EmojiBody, Empty, SlackChannel, SlackUser,
    UsergroupUsersBody, UsergroupsBody, UsersPage, AUTH_TEST, CHAT_POST_MESSAGE,
    CONVERSATIONS_ARCHIVE, CONVERSATIONS_CREATE, CONVERSATIONS_INVITE, CONVERSATIONS_LIST,
    CONVERSATIONS_RENAME, CONVERSATIONS_SET_TOPIC, EMOJI_LIST, PRIVATE_CHANNEL_TYPE,
    USERGROUPS_LIST, USERGROUPS_USERS_LIST, USERS_LIST,
};
use super::SlackApi;
use crate::model::{Channel, ChannelId, User, UserFlags, UserGroup, UserId};

pub struct SlackClient {
    pub(super) http: reqwest::Client,
    pub(super) token: String,
    pub(super) base_url: String,
}

impl SlackClient {
    pub fn with_base_url(token: String, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Self {
            http: reqwest::Client::new(),
            token,
            base_url,
        }
    }
}

#[async_trait]
impl SlackApi for SlackClient {
    async fn auth_test(&self) -> Result<UserId> {
        let body: AuthTestBody = self.post(AUTH_TEST, &[]).await?;
        if body.user_id.is_empty() {
            return Err(anyhow!("auth.test did not report a user_id"));
        }
        Ok(UserId(body.user_id))
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        self.get_all_pages(USERS_LIST, &[], |page: UsersPage| {
            page.members.into_iter().map(into_user).collect()
        })
        .await
    }

    async fn list_usergroups(&self) -> Result<Vec<UserGroup>> {
        let body: UsergroupsBody = self.get(USERGROUPS_LIST, &[]).await?;
        Ok(body
            .usergroups
            .into_iter()
            .map(|group| UserGroup {
                id: group.id,
                handle: group.handle,
            })
            .collect())
    }

    async fn usergroup_members(&self, group_id: &str) -> Result<Vec<UserId>> {
        let body: UsergroupUsersBody = self
            .get(USERGROUPS_USERS_LIST, &[("usergroup", group_id)])
            .await
            .with_context(|| format!("Failed to list members of user-group {}", group_id))?;
        Ok(body.users.into_iter().map(UserId).collect())
    }

    async fn list_private_channels(&self) -> Result<Vec<Channel>> {
        self.get_all_pages(
            CONVERSATIONS_LIST,
            &[("types", PRIVATE_CHANNEL_TYPE), ("exclude_archived", "true")],
            |page: ChannelsPage| page.channels.into_iter().map(into_channel).collect(),
        )
        .await
    }

    async fn create_private_channel(&self, name: &str) -> Result<ChannelId> {
        let body: CreatedChannelBody = self
            .post(CONVERSATIONS_CREATE, &[("name", name), ("is_private", "true")])
            .await
            .with_context(|| format!("Failed to create channel {}", name))?;
        body.channel
            .map(|channel| ChannelId(channel.id))
            .ok_or_else(|| anyhow!("conversations.create returned no channel for {}", name))
    }

    async fn invite(&self, channel: &ChannelId, users: &[UserId]) -> Result<()> {
        let users = users
            .iter()
            .map(UserId::as_str)
            .collect::<Vec<_>>()
            .join(",");
        let _: Empty = self
            .post(
                CONVERSATIONS_INVITE,
                &[("channel", channel.as_str()), ("users", users.as_str())],
            )
            .await
            .with_context(|| format!("Failed to invite users to {}", channel))?;
        Ok(())
    }

    async fn set_topic(&self, channel: &ChannelId, topic: &str) -> Result<()> {
        let _: Empty = self
            .post(
                CONVERSATIONS_SET_TOPIC,
                &[("channel", channel.as_str()), ("topic", topic)],
            )
            .await
            .with_context(|| format!("Failed to set topic of {}", channel))?;
        Ok(())
    }

    async fn post_message(&self, channel: &ChannelId, text: &str) -> Result<()> {
        let _: Empty = self
            .post(CHAT_POST_MESSAGE, &[("channel", channel.as_str()), ("text", text)])
            .await
            .with_context(|| format!("Failed to post message to {}", channel))?;
        Ok(())
    }

    async fn rename_channel(&self, channel: &ChannelId, name: &str) -> Result<()> {
        let _: Empty = self
            .post(
                CONVERSATIONS_RENAME,
                &[("channel", channel.as_str()), ("name", name)],
            )
            .await
            .with_context(|| format!("Failed to rename {} to {}", channel, name))?;
        Ok(())
    }

    async fn archive_channel(&self, channel: &ChannelId) -> Result<()> {
        let _: Empty = self
            .post(CONVERSATIONS_ARCHIVE, &[("channel", channel.as_str())])
            .await
            .with_context(|| format!("Failed to archive {}", channel))?;
        Ok(())
    }

    async fn list_emoji(&self) -> Result<BTreeSet<String>> {
        let body: EmojiBody = self.get(EMOJI_LIST, &[]).await?;
        Ok(body.emoji.into_keys().collect())
    }
}

fn into_user(user: SlackUser) -> User {
    User {
        id: UserId(user.id),
        login: user.name,
        display_name: user.profile.display_name,
        real_name: user.profile.real_name,
        flags: UserFlags {
            is_bot: user.is_bot,
            is_deleted: user.deleted,
            is_restricted: user.is_restricted,
            is_ultra_restricted: user.is_ultra_restricted,
        },
    }
}

fn into_channel(channel: SlackChannel) -> Channel {
    Channel {
        id: ChannelId(channel.id),
        name: channel.name,
        topic: channel.topic.map(|topic| topic.value).unwrap_or_default(),
        creator: channel
            .creator
            .filter(|creator| !creator.is_empty())
            .map(UserId),
    }
}
