use std::collections::BTreeSet;

use anyhow::{anyhow, Context, Result};
use tracing::info;

use crate::config::Membership;
use crate::model::{User, UserId};
use crate::slack::SlackApi;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupMembers {
    pub employees: BTreeSet<UserId>,
    pub board: BTreeSet<UserId>,
}

/// Everything the classifier needs, read once at the start of a run.
#[derive(Debug, Clone, Default)]
pub struct Directory {
    pub users: Vec<User>,
    pub groups: Option<GroupMembers>,
}

pub async fn fetch_directory(api: &dyn SlackApi, membership: &Membership) -> Result<Directory> {
    let users = api.list_users().await.context("Failed to list workspace users")?;
    info!(users = users.len(), "fetched user directory");

    let groups = match membership {
        Membership::Lists { .. } => None,
        Membership::Groups { employees, board } => Some(GroupMembers {
            employees: group_members(api, employees).await?,
            board: group_members(api, board).await?,
        }),
    };

    Ok(Directory { users, groups })
}

async fn group_members(api: &dyn SlackApi, handle: &str) -> Result<BTreeSet<UserId>> {
    let members = api
        .list_usergroup_members(handle)
        .await
        .with_context(|| format!("Failed to look up user-group @{}", handle))?
        .ok_or_else(|| anyhow!("user-group @{} does not exist in this workspace", handle))?;
    info!(handle, members = members.len(), "resolved user-group");
    Ok(members)
}
