use crate::cmd::now::{parse_at, read_blocks_file};
use crate::context::Ctx;
use crate::output::{format_hour, print_json, print_table, yes_no};
use clap::Subcommand;
use niyyah_core::types::{DayType, NewScheduleBlock, ScheduleBlockPatch};
use niyyah_core::views::ScheduleView;
use niyyah_core::{ScheduleBlock, TimeOfDay};
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum ScheduleSubcommand {
    /// List blocks by start time, marking the active one
    List {
        /// Read blocks from a JSON or YAML file instead of the API
        #[arg(long)]
        file: Option<PathBuf>,
        /// Mark the block active at this time instead of now (HH:MM)
        #[arg(long)]
        at: Option<String>,
    },
    /// Add a block
    Add {
        /// Owning persona id
        #[arg(long)]
        persona: i64,
        /// Start time (HH:MM)
        #[arg(long)]
        start: TimeOfDay,
        /// End time (HH:MM); at or before start runs past midnight
        #[arg(long)]
        end: TimeOfDay,
        activity: String,
        /// weekday, weekend or daily
        #[arg(long, default_value = "daily")]
        day_type: DayType,
        #[arg(long)]
        prayer: bool,
    },
    /// Change fields of a block
    Edit {
        id: i64,
        #[arg(long)]
        persona: Option<i64>,
        #[arg(long)]
        start: Option<TimeOfDay>,
        #[arg(long)]
        end: Option<TimeOfDay>,
        #[arg(long)]
        activity: Option<String>,
        #[arg(long)]
        day_type: Option<DayType>,
        #[arg(long)]
        prayer: Option<bool>,
    },
    /// Delete a block
    Delete { id: i64 },
}

pub fn run(ctx: &Ctx, subcmd: ScheduleSubcommand) -> anyhow::Result<()> {
    match subcmd {
        ScheduleSubcommand::List { file, at } => {
            let now = parse_at(at.as_deref())?.unwrap_or_else(TimeOfDay::now);
            let view = match file {
                Some(path) => ScheduleView::from_blocks(read_blocks_file(&path)?),
                None => ctx.with_session(ScheduleView::load)?,
            };
            print_list(ctx, &view, now)
        }
        ScheduleSubcommand::Add {
            persona,
            start,
            end,
            activity,
            day_type,
            prayer,
        } => {
            let new = NewScheduleBlock {
                persona_id: persona,
                start_time: start,
                end_time: end,
                activity,
                day_type,
                is_prayer_block: prayer,
            };
            let view = ctx.with_session(|api, session| {
                ScheduleView::load(api, session)?.create(api, session, &new)
            })?;
            print_list(ctx, &view, TimeOfDay::now())
        }
        ScheduleSubcommand::Edit {
            id,
            persona,
            start,
            end,
            activity,
            day_type,
            prayer,
        } => {
            let patch = ScheduleBlockPatch {
                persona_id: persona,
                start_time: start,
                end_time: end,
                activity,
                day_type,
                is_prayer_block: prayer,
            };
            let view = ctx.with_session(|api, session| {
                ScheduleView::load(api, session)?.update(api, session, id, &patch)
            })?;
            print_block(ctx, view.get(id)?)
        }
        ScheduleSubcommand::Delete { id } => {
            let view = ctx.with_session(|api, session| {
                let view = ScheduleView::load(api, session)?;
                view.get(id)?;
                view.delete(api, session, id)
            })?;
            if ctx.json {
                print_json(&serde_json::json!({ "deleted": id, "remaining": view.blocks.len() }))
            } else {
                println!("Deleted block {id}.");
                Ok(())
            }
        }
    }
}

fn print_list(ctx: &Ctx, view: &ScheduleView, now: TimeOfDay) -> anyhow::Result<()> {
    let active = view.active(now).map(|(b, _)| b);
    let active_id = active.map(|b| b.id);
    // False when the resolver fell back to the earliest block.
    let in_progress = active.is_some_and(|b| b.contains(now));

    if ctx.json {
        return print_json(&serde_json::json!({
            "blocks": view.blocks,
            "active_id": active_id,
            "in_progress": in_progress,
        }));
    }
    if view.blocks.is_empty() {
        println!("No schedule blocks.");
        return Ok(());
    }
    let rows = view
        .blocks
        .iter()
        .map(|b| {
            vec![
                if Some(b.id) == active_id { "*" } else { "" }.to_string(),
                b.id.to_string(),
                format_hour(b.start_time),
                format!("{}-{}", b.start_time, b.end_time),
                b.activity.clone(),
                b.day_type.to_string(),
                yes_no(b.is_prayer_block).to_string(),
            ]
        })
        .collect();
    print_table(&["", "ID", "HOUR", "TIME", "ACTIVITY", "DAYS", "PRAYER"], rows);
    Ok(())
}

fn print_block(ctx: &Ctx, b: &ScheduleBlock) -> anyhow::Result<()> {
    if ctx.json {
        return print_json(b);
    }
    println!("{}-{}  {} [{}]", b.start_time, b.end_time, b.activity, b.id);
    println!("Persona: {}", b.persona_id);
    println!("Days:    {}", b.day_type);
    println!("Prayer:  {}", yes_no(b.is_prayer_block));
    Ok(())
}
