use crate::context::Ctx;
use crate::output::print_json;
use anyhow::Context;
use clap::Subcommand;
use niyyah_core::config::{ClientConfig, WarnLevel};
use niyyah_core::paths;

// ---------------------------------------------------------------------------
// Subcommand types
// ---------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Show the effective client config
    Show,

    /// Store the API base URL in config.yaml
    SetUrl { url: String },

    /// Validate the config for common mistakes
    Validate,
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub fn run(ctx: &Ctx, subcmd: ConfigSubcommand) -> anyhow::Result<()> {
    match subcmd {
        ConfigSubcommand::Show => show(ctx),
        ConfigSubcommand::SetUrl { url } => set_url(ctx, &url),
        ConfigSubcommand::Validate => validate(ctx),
    }
}

fn show(ctx: &Ctx) -> anyhow::Result<()> {
    let cfg = &ctx.config;
    if ctx.json {
        return print_json(&serde_json::json!({
            "home": ctx.home(),
            "api_url": cfg.api_url,
            "timeout_secs": cfg.timeout_secs,
            "tick_secs": cfg.tick_secs,
        }));
    }
    println!("Home:     {}", ctx.home().display());
    println!("API URL:  {}", cfg.api_url);
    println!("Timeout:  {}s", cfg.timeout_secs);
    println!("Tick:     {}s", cfg.tick_secs);
    Ok(())
}

/// Writes to the file on disk, so a `--api-url` override is not persisted
/// along with it.
fn set_url(ctx: &Ctx, url: &str) -> anyhow::Result<()> {
    let mut cfg = ClientConfig::load(ctx.home()).context("failed to load config")?;
    cfg.api_url = url.to_string();
    if let Some(err) = cfg.validate().into_iter().find(|w| w.level == WarnLevel::Error) {
        anyhow::bail!("{}", err.message);
    }
    cfg.save(ctx.home()).context("failed to save config")?;

    if ctx.json {
        print_json(&serde_json::json!({ "api_url": cfg.api_url }))
    } else {
        println!(
            "API URL set to {} in {}",
            cfg.api_url,
            paths::config_path(ctx.home()).display()
        );
        Ok(())
    }
}

fn validate(ctx: &Ctx) -> anyhow::Result<()> {
    let warnings = ctx.config.validate();

    if ctx.json {
        let value = serde_json::json!({
            "warnings": warnings,
        });
        print_json(&value)?;
    } else if warnings.is_empty() {
        println!("Config is valid. No warnings.");
    } else {
        for w in &warnings {
            let prefix = match w.level {
                WarnLevel::Warning => "warning",
                WarnLevel::Error => "error",
            };
            println!("[{prefix}] {}", w.message);
        }
    }

    if warnings.iter().any(|w| w.level == WarnLevel::Error) {
        anyhow::bail!("config validation found errors");
    }
    Ok(())
}
