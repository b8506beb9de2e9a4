//! `lexchat config`: show the configuration the server would run with.

use std::path::Path;

use anyhow::Result;
use console::style;

use lexchat_infra::config::load_runtime_config;

use crate::cli::OutputMode;

/// Print the effective configuration after file loading and env overrides.
///
/// The endpoint credential is reported as present or absent, never shown.
pub async fn show_config(data_dir: &Path, output: OutputMode) -> Result<()> {
    let runtime = load_runtime_config(data_dir).await;
    let has_key = runtime.api_key.is_some();

    if output == OutputMode::Json {
        let out = serde_json::json!({
            "data_dir": data_dir.display().to_string(),
            "config": runtime.global,
            "api_key_set": has_key,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }
    if output == OutputMode::Quiet {
        print!("{}", toml::to_string_pretty(&runtime.global)?);
        return Ok(());
    }

    println!();
    println!("  {} {}", style("Data directory:").bold(), data_dir.display());
    println!(
        "  {} {}",
        style("Endpoint credential:").bold(),
        if has_key {
            style("set").green()
        } else {
            style("not set").yellow()
        }
    );
    println!();
    for line in toml::to_string_pretty(&runtime.global)?.lines() {
        println!("  {line}");
    }
    println!();
    Ok(())
}
