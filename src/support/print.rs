use crate::classify::Roster;
use crate::inventory::Inventory;
use crate::reconcile::{Outcome, Report};

pub fn print_report(report: &Report) {
    for entry in &report.entries {
        let status = match &entry.outcome {
            Outcome::Created(id) => format!("created ({})", id),
            Outcome::Recreated { archived, created } => {
                format!("archived {} and recreated ({})", archived, created)
            }
            Outcome::AlreadyExists(id) => format!("already exists ({}), left untouched", id),
            Outcome::DryRun { archive: Some(id) } => {
                format!("would archive {} and recreate (dry run)", id)
            }
            Outcome::DryRun { archive: None } => "would create (dry run)".to_string(),
            Outcome::Conflict { with } => {
                format!("skipped: name also derived for {}", with.join(", "))
            }
            Outcome::Failed(reason) => format!("failed: {}", reason),
        };
        println!("- {} [{}] {}", entry.channel_name, entry.login, status);
    }

    let failures = report.failures();
    println!(
        "{} channels processed, {} need attention",
        report.entries.len(),
        failures
    );
}

pub fn print_roster(roster: &Roster, include_excluded: bool) {
    println!("Regular members ({}):", roster.regular.len());
    for user in &roster.regular {
        println!("  {}", user.login);
    }

    println!("Administrative members ({}):", roster.administrative.len());
    for user in &roster.administrative {
        println!("  {} ({})", user.login, user.visible_name());
    }

    if include_excluded {
        println!("Excluded ({}):", roster.excluded.len());
        for excluded in &roster.excluded {
            println!("  {} - {}", excluded.user.login, excluded.reason);
        }
    }
}

pub fn print_inventory(inventory: &Inventory) {
    if inventory.is_empty() {
        println!("No board channels found.");
        return;
    }

    println!("{} board channels:", inventory.len());
    for (name, channel) in inventory {
        if channel.topic.is_empty() {
            println!("- {} ({})", name, channel.id);
        } else {
            println!("- {} ({}) {}", name, channel.id, channel.topic);
        }
    }
}
