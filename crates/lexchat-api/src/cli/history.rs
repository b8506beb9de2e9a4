//! `lexchat history`: print an owner's stored conversation.

use std::path::Path;

use anyhow::Result;
use console::style;

use lexchat_core::chat::repository::HistoryStore;
use lexchat_infra::sqlite::history::SqliteHistoryStore;
use lexchat_types::chat::{ChatMessage, MessageRole};
use lexchat_types::identity::OwnerId;

use crate::cli::OutputMode;
use crate::state::open_database;

/// Print the owner's most recent `limit` messages, oldest first.
///
/// # Examples
///
/// ```bash
/// lexchat history --owner 0199c3a0-7b1e-7c43-9a51-3f0e2d9b8a11 --limit 50
/// lexchat history --owner 0199c3a0-7b1e-7c43-9a51-3f0e2d9b8a11 --json
/// ```
pub async fn show_history(data_dir: &Path, owner: OwnerId, limit: u32, output: OutputMode) -> Result<()> {
    let pool = open_database(data_dir).await?;
    let store = SqliteHistoryStore::new(pool);
    let messages = store.read_ordered(&owner, limit).await?;

    match output {
        OutputMode::Json => {
            println!("{}", serde_json::to_string_pretty(&messages)?);
            return Ok(());
        }
        OutputMode::Quiet => {
            for message in &messages {
                println!("{}: {}", message.role, message.content);
            }
            return Ok(());
        }
        OutputMode::Styled => {}
    }

    if messages.is_empty() {
        println!();
        println!("  {} No messages stored for {}", style("i").blue().bold(), style(owner).cyan());
        println!();
        return Ok(());
    }

    println!();
    for message in &messages {
        print_message(message);
    }
    Ok(())
}

fn print_message(message: &ChatMessage) {
    let who = match message.role {
        MessageRole::User => style("you").cyan().bold(),
        MessageRole::Assistant => style("assistant").green().bold(),
        MessageRole::System => style("system").dim(),
    };
    println!(
        "  {} {}",
        who,
        style(message.created_at.format("%Y-%m-%d %H:%M:%S")).dim()
    );
    for line in message.content.lines() {
        println!("    {line}");
    }
    println!();
}
