#![allow(dead_code)]

use std::collections::{BTreeSet, HashSet};
use std::sync::Mutex;

use anyhow::{bail, Result};
use async_trait::async_trait;

use board_channels::model::{Channel, ChannelId, User, UserFlags, UserGroup, UserId};
use board_channels::slack::SlackApi;

pub const ACTING_USER: &str = "UBOT";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Create(String),
    Invite(ChannelId, Vec<UserId>),
    SetTopic(ChannelId, String),
    Post(ChannelId, String),
    Rename(ChannelId, String),
    Archive(ChannelId),
}

#[derive(Default)]
struct State {
    active: Vec<Channel>,
    archived: Vec<Channel>,
    calls: Vec<Call>,
    next_id: usize,
}

/// In-memory workspace that behaves like Slack for the methods the
/// reconciler uses: archived channels keep their names reserved.
pub struct FakeSlack {
    users: Vec<User>,
    groups: Vec<(UserGroup, Vec<UserId>)>,
    emoji: BTreeSet<String>,
    failing_creates: HashSet<String>,
    failing_archives: HashSet<ChannelId>,
    state: Mutex<State>,
}

impl FakeSlack {
    pub fn new(users: Vec<User>) -> Self {
        Self {
            users,
            groups: Vec::new(),
            emoji: ["party_parrot", "shipit"].into_iter().map(String::from).collect(),
            failing_creates: HashSet::new(),
            failing_archives: HashSet::new(),
            state: Mutex::new(State::default()),
        }
    }

    pub fn with_group(mut self, handle: &str, members: &[&str]) -> Self {
        let group = UserGroup {
            id: format!("S{}", self.groups.len() + 1),
            handle: handle.to_string(),
        };
        let members = members.iter().map(|m| UserId::new(*m)).collect();
        self.groups.push((group, members));
        self
    }

    pub fn with_channel(self, id: &str, name: &str, creator: &str) -> Self {
        self.state.lock().unwrap().active.push(Channel {
            id: ChannelId::new(id),
            name: name.to_string(),
            topic: String::new(),
            creator: Some(UserId::new(creator)),
        });
        self
    }

    pub fn failing_create(mut self, name: &str) -> Self {
        self.failing_creates.insert(name.to_string());
        self
    }

    pub fn failing_archive(mut self, id: &str) -> Self {
        self.failing_archives.insert(ChannelId::new(id));
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    pub fn active_named(&self, name: &str) -> Vec<Channel> {
        self.state
            .lock()
            .unwrap()
            .active
            .iter()
            .filter(|c| c.name == name)
            .cloned()
            .collect()
    }

    pub fn archived(&self) -> Vec<Channel> {
        self.state.lock().unwrap().archived.clone()
    }

    fn record(&self, call: Call) {
        self.state.lock().unwrap().calls.push(call);
    }
}

#[async_trait]
impl SlackApi for FakeSlack {
    async fn auth_test(&self) -> Result<UserId> {
        Ok(UserId::new(ACTING_USER))
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        Ok(self.users.clone())
    }

    async fn list_usergroups(&self) -> Result<Vec<UserGroup>> {
        Ok(self.groups.iter().map(|(g, _)| g.clone()).collect())
    }

    async fn usergroup_members(&self, group_id: &str) -> Result<Vec<UserId>> {
        match self.groups.iter().find(|(g, _)| g.id == group_id) {
            Some((_, members)) => Ok(members.clone()),
            None => bail!("usergroups.users.list returned ok=false: no_such_subteam"),
        }
    }

    async fn list_private_channels(&self) -> Result<Vec<Channel>> {
        Ok(self.state.lock().unwrap().active.clone())
    }

    async fn create_private_channel(&self, name: &str) -> Result<ChannelId> {
        self.record(Call::Create(name.to_string()));
        if self.failing_creates.contains(name) {
            bail!("conversations.create returned ok=false: restricted_action");
        }
        let mut state = self.state.lock().unwrap();
        if state
            .active
            .iter()
            .chain(state.archived.iter())
            .any(|c| c.name == name)
        {
            bail!("conversations.create returned ok=false: name_taken");
        }
        state.next_id += 1;
        let id = ChannelId::new(format!("CNEW{}", state.next_id));
        state.active.push(Channel {
            id: id.clone(),
            name: name.to_string(),
            topic: String::new(),
            creator: Some(UserId::new(ACTING_USER)),
        });
        Ok(id)
    }

    async fn invite(&self, channel: &ChannelId, users: &[UserId]) -> Result<()> {
        self.record(Call::Invite(channel.clone(), users.to_vec()));
        Ok(())
    }

    async fn set_topic(&self, channel: &ChannelId, topic: &str) -> Result<()> {
        self.record(Call::SetTopic(channel.clone(), topic.to_string()));
        let mut state = self.state.lock().unwrap();
        if let Some(c) = state.active.iter_mut().find(|c| &c.id == channel) {
            c.topic = topic.to_string();
        }
        Ok(())
    }

    async fn post_message(&self, channel: &ChannelId, text: &str) -> Result<()> {
        self.record(Call::Post(channel.clone(), text.to_string()));
        Ok(())
    }

    async fn rename_channel(&self, channel: &ChannelId, name: &str) -> Result<()> {
        self.record(Call::Rename(channel.clone(), name.to_string()));
        let mut state = self.state.lock().unwrap();
        match state.active.iter_mut().find(|c| &c.id == channel) {
            Some(c) => {
                c.name = name.to_string();
                Ok(())
            }
            None => bail!("conversations.rename returned ok=false: channel_not_found"),
        }
    }

    async fn archive_channel(&self, channel: &ChannelId) -> Result<()> {
        self.record(Call::Archive(channel.clone()));
        if self.failing_archives.contains(channel) {
            bail!("conversations.archive returned ok=false: restricted_action");
        }
        let mut state = self.state.lock().unwrap();
        match state.active.iter().position(|c| &c.id == channel) {
            Some(idx) => {
                let archived = state.active.remove(idx);
                state.archived.push(archived);
                Ok(())
            }
            None => bail!("conversations.archive returned ok=false: channel_not_found"),
        }
    }

    async fn list_emoji(&self) -> Result<BTreeSet<String>> {
        Ok(self.emoji.clone())
    }
}

pub fn bot(id: &str, login: &str) -> User {
    User::new(id, login).with_flags(UserFlags {
        is_bot: true,
        ..Default::default()
    })
}

/// taro, haru and takanory; haru and takanory sit on the board.
pub fn board_workspace(extra: Vec<User>) -> FakeSlack {
    let mut users = vec![
        User::new("U1", "taro"),
        User::new("U2", "haru"),
        User::new("U3", "takanory").with_display_name("takanory"),
    ];
    let mut employees = vec!["U1", "U2", "U3"];
    let extra_ids: Vec<String> = extra.iter().map(|u| u.id.to_string()).collect();
    users.extend(extra);
    employees.extend(extra_ids.iter().map(String::as_str));

    FakeSlack::new(users)
        .with_group("employees", &employees)
        .with_group("board", &["U2", "U3"])
}
