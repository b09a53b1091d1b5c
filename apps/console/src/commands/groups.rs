use clap::Subcommand;

use darchiva_core::AppResult;
use darchiva_domain::Group;

use crate::console_services::ConsoleServices;

/// Group hierarchy commands.
#[derive(Debug, Subcommand)]
pub enum GroupsCommand {
    /// Print the group hierarchy.
    Tree,
}

pub async fn run(services: &ConsoleServices, command: GroupsCommand) -> AppResult<()> {
    match command {
        GroupsCommand::Tree => {
            let roots = services.iam.group_tree().await?;
            let mut lines = Vec::new();
            render_tree(&roots, 0, &mut lines);
            for line in lines {
                println!("{line}");
            }
            Ok(())
        }
    }
}

fn render_tree(groups: &[Group], level: usize, lines: &mut Vec<String>) {
    for group in groups {
        let roles = group
            .roles
            .iter()
            .map(|role| role.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        lines.push(format!(
            "{}{} ({} members){}",
            "  ".repeat(level),
            group.name,
            group.member_count,
            if roles.is_empty() {
                String::new()
            } else {
                format!(" roles: {roles}")
            }
        ));
        render_tree(&group.children, level + 1, lines);
    }
}
