use std::collections::{BTreeMap, BTreeSet};

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::{error, info, warn};

use crate::classify::{classify_directory, Roster};
use crate::config::{ChannelConventions, Config, EmojiSettings, ExistingPolicy};
use crate::directory::fetch_directory;
use crate::emoji::{self, EmojiPicker, RandomPicker};
use crate::inventory::{inventory, Inventory};
use crate::model::{Channel, ChannelId, User, UserId};
use crate::naming;
use crate::slack::SlackApi;

/// Slack rejects channel names longer than this.
const MAX_CHANNEL_NAME_CHARS: usize = 80;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Log intended changes without calling any mutating method.
    DryRun,
    Apply,
}

/// Desired state for one regular member, compared against the inventory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedChannel {
    pub user: User,
    pub base_name: String,
    pub channel_name: String,
    pub topic: String,
    pub existing: Option<Channel>,
    /// Logins of other members whose name derives to the same channel.
    pub conflicts_with: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Created(ChannelId),
    Recreated {
        archived: ChannelId,
        created: ChannelId,
    },
    AlreadyExists(ChannelId),
    DryRun {
        archive: Option<ChannelId>,
    },
    Conflict {
        with: Vec<String>,
    },
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub login: String,
    pub channel_name: String,
    pub outcome: Outcome,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    pub entries: Vec<Entry>,
}

impl Report {
    pub fn failures(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e.outcome, Outcome::Failed(_) | Outcome::Conflict { .. }))
            .count()
    }

    pub fn outcome_for(&self, channel_name: &str) -> Option<&Outcome> {
        self.entries
            .iter()
            .find(|e| e.channel_name == channel_name)
            .map(|e| &e.outcome)
    }
}

/// Derives one planned channel per regular member who is not also an
/// administrator. Members whose names collide are flagged on every side.
pub fn plan(
    roster: &Roster,
    inventory: &Inventory,
    conventions: &ChannelConventions,
) -> Vec<PlannedChannel> {
    let mut planned: Vec<PlannedChannel> = roster
        .regular
        .iter()
        .filter(|user| !roster.is_administrative(&user.id))
        .map(|user| {
            let base_name = naming::base_name(user);
            let channel_name = naming::channel_name(&base_name, conventions);
            PlannedChannel {
                user: user.clone(),
                topic: naming::render(&conventions.topic, &base_name, ""),
                existing: inventory.get(&channel_name).cloned(),
                base_name,
                channel_name,
                conflicts_with: Vec::new(),
            }
        })
        .collect();

    let mut claims: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for entry in &planned {
        claims
            .entry(entry.channel_name.clone())
            .or_default()
            .push(entry.user.login.clone());
    }
    for entry in &mut planned {
        if let Some(logins) = claims.get(&entry.channel_name) {
            entry.conflicts_with = logins
                .iter()
                .filter(|login| **login != entry.user.login)
                .cloned()
                .collect();
        }
    }

    planned
}

/// Target member plus every administrator, minus the acting user who is
/// already a member of the channel it creates.
pub fn invite_list(target: &User, roster: &Roster, acting: Option<&UserId>) -> Vec<UserId> {
    let mut seen = BTreeSet::new();
    std::iter::once(&target.id)
        .chain(roster.administrative.iter().map(|u| &u.id))
        .filter(|id| Some(*id) != acting)
        .filter(|id| seen.insert((*id).clone()))
        .cloned()
        .collect()
}

pub struct Reconciler<'a> {
    api: &'a dyn SlackApi,
    config: &'a Config,
    conventions: &'a ChannelConventions,
    emoji: &'a EmojiSettings,
    policy: ExistingPolicy,
    picker: Box<dyn EmojiPicker + 'a>,
    mode: Mode,
    archive_stamp: String,
}

impl<'a> Reconciler<'a> {
    pub fn new(api: &'a dyn SlackApi, config: &'a Config, mode: Mode) -> Self {
        Self {
            api,
            config,
            conventions: &config.channels,
            emoji: &config.emoji,
            policy: config.channels.existing,
            picker: Box::new(RandomPicker::new()),
            mode,
            archive_stamp: Utc::now().format("%Y%m%d%H%M%S").to_string(),
        }
    }

    pub fn with_policy(mut self, policy: ExistingPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_picker(mut self, picker: Box<dyn EmojiPicker + 'a>) -> Self {
        self.picker = picker;
        self
    }

    /// Fetches directory and channels, classifies and converges in one pass.
    pub async fn reconcile_workspace(&mut self) -> Result<Report> {
        let directory = fetch_directory(self.api, &self.config.membership).await?;
        let roster = classify_directory(&directory, self.config)?;
        info!(
            regular = roster.regular.len(),
            administrative = roster.administrative.len(),
            excluded = roster.excluded.len(),
            "classified members"
        );

        let channels = self
            .api
            .list_private_channels()
            .await
            .context("Failed to list private channels")?;
        let inventory = inventory(channels, self.conventions);
        info!(existing = inventory.len(), "fetched channel inventory");

        self.run(&roster, &inventory).await
    }

    pub async fn run(&mut self, roster: &Roster, inventory: &Inventory) -> Result<Report> {
        let acting = self
            .api
            .auth_test()
            .await
            .context("Failed to identify the token's user")?;
        let planned = plan(roster, inventory, self.conventions);
        info!(
            channels = planned.len(),
            administrators = roster.administrative.len(),
            mode = ?self.mode,
            "reconciling announcement channels"
        );

        let pool = match self.mode {
            Mode::Apply => self.emoji_pool().await,
            Mode::DryRun => Vec::new(),
        };

        let mut report = Report::default();
        for entry in &planned {
            let outcome = if !entry.conflicts_with.is_empty() {
                warn!(
                    channel = %entry.channel_name,
                    user = %entry.user.login,
                    others = ?entry.conflicts_with,
                    "derived channel name is claimed by several members, skipping"
                );
                Outcome::Conflict {
                    with: entry.conflicts_with.clone(),
                }
            } else {
                match self.mode {
                    Mode::DryRun => self.dry_run(entry, &acting),
                    Mode::Apply => match self.apply(entry, roster, &acting, &pool).await {
                        Ok(outcome) => outcome,
                        Err(e) => {
                            error!(
                                channel = %entry.channel_name,
                                user = %entry.user.login,
                                user_id = %entry.user.id,
                                "channel reconciliation failed: {:#}",
                                e
                            );
                            Outcome::Failed(format!("{:#}", e))
                        }
                    },
                }
            };

            report.entries.push(Entry {
                login: entry.user.login.clone(),
                channel_name: entry.channel_name.clone(),
                outcome,
            });
        }

        Ok(report)
    }

    fn dry_run(&self, entry: &PlannedChannel, acting: &UserId) -> Outcome {
        let archive = match (&entry.existing, self.policy) {
            (Some(existing), ExistingPolicy::Recreate) => {
                warn_if_foreign(existing, acting);
                info!(
                    channel = %entry.channel_name,
                    id = %existing.id,
                    "would archive existing channel (dry run)"
                );
                Some(existing.id.clone())
            }
            (Some(existing), ExistingPolicy::Keep) => {
                info!(channel = %entry.channel_name, id = %existing.id, "channel already exists");
                return Outcome::AlreadyExists(existing.id.clone());
            }
            (None, _) => None,
        };
        info!(
            channel = %entry.channel_name,
            user = %entry.user.login,
            "would create channel (dry run)"
        );
        Outcome::DryRun { archive }
    }

    async fn apply(
        &mut self,
        entry: &PlannedChannel,
        roster: &Roster,
        acting: &UserId,
        pool: &[String],
    ) -> Result<Outcome> {
        let archived = match (&entry.existing, self.policy) {
            (Some(existing), ExistingPolicy::Keep) => {
                info!(channel = %entry.channel_name, id = %existing.id, "channel already exists");
                return Ok(Outcome::AlreadyExists(existing.id.clone()));
            }
            (Some(existing), ExistingPolicy::Recreate) => {
                self.retire(existing, acting).await?;
                Some(existing.id.clone())
            }
            (None, _) => None,
        };

        let created = self.api.create_private_channel(&entry.channel_name).await?;
        let invitees = invite_list(&entry.user, roster, Some(acting));
        if !invitees.is_empty() {
            self.api.invite(&created, &invitees).await?;
        }
        self.api.set_topic(&created, &entry.topic).await?;

        let token = emoji::choose(self.picker.as_mut(), pool, self.emoji);
        let welcome = naming::render(&self.conventions.welcome, &entry.base_name, &token);
        self.api.post_message(&created, &welcome).await?;

        info!(
            channel = %entry.channel_name,
            id = %created,
            invited = invitees.len(),
            "created channel"
        );

        Ok(match archived {
            Some(archived) => Outcome::Recreated { archived, created },
            None => Outcome::Created(created),
        })
    }

    /// Moves an existing channel out of the way: archived channels keep their
    /// name reserved, so it is renamed first. A failed archive restores the
    /// original name so the next run still finds the channel.
    async fn retire(&self, existing: &Channel, acting: &UserId) -> Result<()> {
        warn_if_foreign(existing, acting);
        let retired_name = retired_name(&existing.name, &self.archive_stamp);
        self.api.rename_channel(&existing.id, &retired_name).await?;
        if let Err(e) = self.api.archive_channel(&existing.id).await {
            if let Err(rollback) = self.api.rename_channel(&existing.id, &existing.name).await {
                error!(
                    channel = %existing.name,
                    id = %existing.id,
                    retired_name = %retired_name,
                    "failed to restore channel name after archive error: {:#}",
                    rollback
                );
            }
            return Err(e);
        }
        info!(
            channel = %existing.name,
            id = %existing.id,
            retired_name = %retired_name,
            "archived channel"
        );
        Ok(())
    }

    async fn emoji_pool(&self) -> Vec<String> {
        match self.api.list_emoji().await {
            Ok(available) => emoji::emoji_pool(&available, self.emoji),
            Err(e) => {
                warn!("Failed to list workspace emoji, using fallback: {:#}", e);
                Vec::new()
            }
        }
    }
}

/// True unless the channel is known to be created by the acting user.
pub fn is_foreign(existing: &Channel, acting: &UserId) -> bool {
    existing.creator.as_ref() != Some(acting)
}

fn warn_if_foreign(existing: &Channel, acting: &UserId) {
    if is_foreign(existing, acting) {
        warn!(
            channel = %existing.name,
            id = %existing.id,
            creator = ?existing.creator.as_ref().map(UserId::as_str),
            "archiving a channel this tool did not create"
        );
    }
}

fn retired_name(name: &str, stamp: &str) -> String {
    let suffix = format!("-{}", stamp);
    let keep = MAX_CHANNEL_NAME_CHARS.saturating_sub(suffix.chars().count());
    let mut retired: String = name.chars().take(keep).collect();
    retired.push_str(&suffix);
    retired
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{classify, Source};

    fn channel(creator: Option<&str>) -> Channel {
        Channel {
            id: ChannelId::new("C1"),
            name: "u-taro-board".to_string(),
            topic: String::new(),
            creator: creator.map(UserId::new),
        }
    }

    fn roster(users: &[User], board: &[&str]) -> Roster {
        let board: Vec<String> = board.iter().map(|b| b.to_string()).collect();
        classify(
            users,
            Source::Lists {
                exclude: &[],
                board: &board,
            },
            &[],
        )
    }

    #[test]
    fn plan_marks_existing_channels() {
        let users = vec![User::new("U1", "taro"), User::new("U2", "haru")];
        let roster = roster(&users, &["haru"]);
        let inventory = inventory(
            vec![Channel {
                id: ChannelId::new("C1"),
                name: "u-taro-board".to_string(),
                topic: String::new(),
                creator: None,
            }],
            &ChannelConventions::default(),
        );

        let planned = plan(&roster, &inventory, &ChannelConventions::default());
        assert_eq!(planned.len(), 1);
        assert_eq!(planned[0].channel_name, "u-taro-board");
        assert_eq!(
            planned[0].existing.as_ref().map(|c| c.id.clone()),
            Some(ChannelId::new("C1"))
        );
        assert!(planned[0].topic.contains("taro"));
    }

    #[test]
    fn plan_flags_both_sides_of_a_name_collision() {
        let users = vec![
            User::new("U1", "kai1").with_display_name("kai"),
            User::new("U2", "kai2").with_display_name("Kai-"),
            User::new("U3", "ray"),
        ];
        let planned = plan(
            &roster(&users, &[]),
            &Inventory::new(),
            &ChannelConventions::default(),
        );

        assert_eq!(planned[0].conflicts_with, vec!["kai2"]);
        assert_eq!(planned[1].conflicts_with, vec!["kai1"]);
        assert!(planned[2].conflicts_with.is_empty());
    }

    #[test]
    fn invite_list_skips_acting_user_and_duplicates() {
        let users = vec![
            User::new("U1", "taro"),
            User::new("U2", "haru"),
            User::new("UB", "bot-owner"),
        ];
        let roster = roster(&users, &["haru", "bot-owner"]);
        let invitees = invite_list(&users[0], &roster, Some(&UserId::new("UB")));
        assert_eq!(invitees, vec![UserId::new("U1"), UserId::new("U2")]);
    }

    #[test]
    fn channels_by_other_creators_are_foreign() {
        let acting = UserId::new("UBOT");
        assert!(!is_foreign(&channel(Some("UBOT")), &acting));
        assert!(is_foreign(&channel(Some("UOTHER")), &acting));
        assert!(is_foreign(&channel(None), &acting));
    }

    #[test]
    fn invite_list_is_empty_for_acting_user_without_board() {
        let users = vec![User::new("UB", "owner")];
        let roster = roster(&users, &[]);
        assert!(invite_list(&users[0], &roster, Some(&UserId::new("UB"))).is_empty());
    }

    #[test]
    fn retired_name_respects_length_limit() {
        assert_eq!(
            retired_name("u-taro-board", "202610141200"),
            "u-taro-board-202610141200"
        );
        let long = format!("u-{}-board", "x".repeat(90));
        assert_eq!(
            retired_name(&long, "202610141200").chars().count(),
            MAX_CHANNEL_NAME_CHARS
        );
    }
}
