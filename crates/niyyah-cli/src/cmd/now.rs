use crate::context::Ctx;
use crate::output::{format_remaining, print_json, progress_bar};
use anyhow::Context;
use niyyah_core::types::Dashboard;
use niyyah_core::views::dashboard::DashboardSnapshot;
use niyyah_core::views::DashboardView;
use niyyah_core::{ScheduleBlock, TimeOfDay};
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub fn run(
    ctx: &Ctx,
    at: Option<&str>,
    file: Option<&Path>,
    watch: bool,
    interval: Option<u64>,
) -> anyhow::Result<()> {
    let fixed = parse_at(at)?;
    let view = match file {
        Some(path) => DashboardView {
            data: offline_dashboard(read_blocks_file(path)?),
        },
        None => ctx.with_session(DashboardView::load)?,
    };

    if !watch {
        return show(ctx, &view.snapshot(fixed.unwrap_or_else(TimeOfDay::now)));
    }

    let tick = interval
        .map(|secs| Duration::from_secs(secs.max(1)))
        .unwrap_or_else(|| ctx.config.tick());
    info!(interval_secs = tick.as_secs(), blocks = view.data.schedule_blocks.len(), "watching schedule");
    // clap rejects --watch together with --at.
    loop {
        show(ctx, &view.snapshot(TimeOfDay::now()))?;
        std::thread::sleep(tick);
    }
}

pub(crate) fn parse_at(at: Option<&str>) -> anyhow::Result<Option<TimeOfDay>> {
    at.map(TimeOfDay::parse)
        .transpose()
        .context("invalid --at time")
}

/// Read schedule blocks from `path`. `.json` is parsed as JSON, anything else
/// as YAML.
pub(crate) fn read_blocks_file(path: &Path) -> anyhow::Result<Vec<ScheduleBlock>> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));
    let blocks = if is_json {
        serde_json::from_str(&data).with_context(|| format!("invalid JSON in {}", path.display()))?
    } else {
        serde_yaml::from_str(&data).with_context(|| format!("invalid YAML in {}", path.display()))?
    };
    Ok(blocks)
}

fn offline_dashboard(schedule_blocks: Vec<ScheduleBlock>) -> Dashboard {
    Dashboard {
        super_objective: String::new(),
        personas: Vec::new(),
        schedule_blocks,
        non_negotiables_total: 0,
        non_negotiables_checked_today: 0,
        streaks: Vec::new(),
    }
}

fn show(ctx: &Ctx, snapshot: &DashboardSnapshot<'_>) -> anyhow::Result<()> {
    if ctx.json {
        return print_json(&serde_json::json!({
            "now": snapshot.now,
            "day_progress": snapshot.day_progress,
            "current": snapshot.current,
        }));
    }
    print_current(snapshot);
    Ok(())
}

/// Text block shared with `niyyah dashboard`.
pub(crate) fn print_current(snapshot: &DashboardSnapshot<'_>) {
    println!(
        "Now {}  day {} {:.0}%",
        snapshot.now,
        progress_bar(snapshot.day_progress / 100.0, 24),
        snapshot.day_progress
    );
    let Some(current) = &snapshot.current else {
        println!("No schedule blocks.");
        return;
    };
    let block = current.block;
    let persona = current
        .persona
        .map(|p| format!(" ({})", p.name))
        .unwrap_or_default();
    if current.in_progress {
        println!(
            "{}-{}  {}{}",
            block.start_time, block.end_time, block.activity, persona
        );
        println!(
            "  {} {:.0}%  {} left",
            progress_bar(current.progress.fraction, 24),
            current.progress.fraction * 100.0,
            format_remaining(current.progress.remaining)
        );
    } else {
        println!(
            "No block matched; earliest is {}-{}  {}{}",
            block.start_time, block.end_time, block.activity, persona
        );
    }
}
