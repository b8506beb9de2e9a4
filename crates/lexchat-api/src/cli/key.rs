//! `lexchat key create`: issue an API key for an owner.

use std::path::Path;

use anyhow::Result;
use console::style;

use lexchat_infra::sqlite::api_key::{IssuedKey, SqliteApiKeyStore};
use lexchat_types::identity::OwnerId;

use crate::cli::OutputMode;
use crate::state::open_database;

pub async fn create_key(data_dir: &Path, owner: Option<OwnerId>, name: &str, output: OutputMode) -> Result<()> {
    let pool = open_database(data_dir).await?;
    let store = SqliteApiKeyStore::new(pool);

    let issued = store.issue(owner.unwrap_or_default(), name).await?;
    print_issued_key(&issued, output)
}

/// Show a freshly issued key. This is the only time the plaintext is visible.
pub fn print_issued_key(issued: &IssuedKey, output: OutputMode) -> Result<()> {
    match output {
        OutputMode::Json => {
            let out = serde_json::json!({
                "id": issued.id,
                "owner_id": issued.owner_id,
                "name": issued.name,
                "key": issued.plaintext,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
            return Ok(());
        }
        OutputMode::Quiet => {
            println!("{}", issued.plaintext);
            return Ok(());
        }
        OutputMode::Styled => {}
    }

    println!();
    println!(
        "  {} API key '{}' issued (save this -- it won't be shown again):",
        style("!").yellow().bold(),
        style(&issued.name).cyan()
    );
    println!();
    println!("    {}", style(&issued.plaintext).green().bold());
    println!();
    println!("  Owner: {}", style(issued.owner_id).dim());
    println!();
    Ok(())
}
