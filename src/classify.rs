use std::collections::BTreeSet;
use std::fmt;

use anyhow::{bail, Result};

use crate::config::{Config, Membership};
use crate::directory::{Directory, GroupMembers};
use crate::model::{User, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExclusionReason {
    Bot,
    Deleted,
    Guest,
    ExcludeList,
    NotEmployee,
    AutoInvited,
}

impl fmt::Display for ExclusionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ExclusionReason::Bot => "bot",
            ExclusionReason::Deleted => "deleted",
            ExclusionReason::Guest => "guest",
            ExclusionReason::ExcludeList => "exclude list",
            ExclusionReason::NotEmployee => "not in employees group",
            ExclusionReason::AutoInvited => "auto-invited administrator",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    Regular,
    Administrative,
    Excluded(ExclusionReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Excluded {
    pub user: User,
    pub reason: ExclusionReason,
}

/// Partition of the workspace for one run. Every input user lands in exactly
/// one of the three lists, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    pub regular: Vec<User>,
    pub administrative: Vec<User>,
    pub excluded: Vec<Excluded>,
}

impl Roster {
    pub fn label_of(&self, id: &UserId) -> Option<Label> {
        if self.regular.iter().any(|u| &u.id == id) {
            Some(Label::Regular)
        } else if self.is_administrative(id) {
            Some(Label::Administrative)
        } else {
            self.excluded
                .iter()
                .find(|e| &e.user.id == id)
                .map(|e| Label::Excluded(e.reason))
        }
    }

    pub fn is_administrative(&self, id: &UserId) -> bool {
        self.administrative.iter().any(|u| &u.id == id)
    }

    fn push(&mut self, user: &User, label: Label) {
        match label {
            Label::Regular => self.regular.push(user.clone()),
            Label::Administrative => self.administrative.push(user.clone()),
            Label::Excluded(reason) => self.excluded.push(Excluded {
                user: user.clone(),
                reason,
            }),
        }
    }
}

/// How regular and board members are told apart.
#[derive(Debug, Clone, Copy)]
pub enum Source<'a> {
    Lists {
        exclude: &'a [String],
        board: &'a [String],
    },
    Groups(&'a GroupMembers),
}

pub fn classify(users: &[User], source: Source<'_>, auto_invited: &[String]) -> Roster {
    let mut roster = Roster::default();
    for user in users {
        roster.push(user, label(user, source, auto_invited));
    }
    roster
}

/// Classifies a fetched directory according to the configured membership mode.
pub fn classify_directory(directory: &Directory, config: &Config) -> Result<Roster> {
    let source = match (&config.membership, &directory.groups) {
        (Membership::Lists { exclude, board }, _) => Source::Lists { exclude, board },
        (Membership::Groups { .. }, Some(groups)) => Source::Groups(groups),
        (Membership::Groups { .. }, None) => {
            bail!("group membership mode requires user-group members in the directory")
        }
    };
    Ok(classify(&directory.users, source, &config.auto_invited))
}

fn label(user: &User, source: Source<'_>, auto_invited: &[String]) -> Label {
    if user.flags.is_bot {
        return Label::Excluded(ExclusionReason::Bot);
    }
    if user.flags.is_deleted {
        return Label::Excluded(ExclusionReason::Deleted);
    }
    if user.flags.is_ineligible() {
        return Label::Excluded(ExclusionReason::Guest);
    }

    let on_board = match source {
        Source::Lists { exclude, board } => {
            if named_in(user, exclude) {
                return Label::Excluded(ExclusionReason::ExcludeList);
            }
            named_in(user, board)
        }
        Source::Groups(groups) => {
            if groups.board.contains(&user.id) {
                true
            } else if groups.employees.contains(&user.id) {
                false
            } else {
                return Label::Excluded(ExclusionReason::NotEmployee);
            }
        }
    };

    match (on_board, is_auto_invited(user, auto_invited)) {
        (true, true) => Label::Excluded(ExclusionReason::AutoInvited),
        (true, false) => Label::Administrative,
        (false, _) => Label::Regular,
    }
}

fn named_in(user: &User, names: &[String]) -> bool {
    names
        .iter()
        .any(|name| name == &user.login || name == user.visible_name())
}

fn is_auto_invited(user: &User, prefixes: &[String]) -> bool {
    prefixes
        .iter()
        .filter(|prefix| !prefix.is_empty())
        .any(|prefix| {
            user.visible_name().starts_with(prefix.as_str())
                || user.login.starts_with(prefix.as_str())
        })
}

/// Ids of `users`, for set comparisons.
pub fn ids(users: &[User]) -> BTreeSet<UserId> {
    users.iter().map(|u| u.id.clone()).collect()
}
