use crate::context::Ctx;
use crate::output::{print_json, print_table};
use chrono::NaiveDate;
use clap::Subcommand;
use niyyah_core::types::{Category, NewNonNegotiable, NonNegotiablePatch};
use niyyah_core::views::TrackerView;

#[derive(Subcommand)]
pub enum TrackerSubcommand {
    /// Show today's non-negotiables, checks and streaks
    Today,
    /// Add a non-negotiable
    Add {
        title: String,
        /// spiritual, health or growth
        #[arg(long, default_value = "spiritual")]
        category: Category,
    },
    /// Change a non-negotiable
    Edit {
        id: i64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        category: Option<Category>,
        #[arg(long)]
        order: Option<i32>,
    },
    /// Delete a non-negotiable
    Delete { id: i64 },
    /// Mark a non-negotiable done
    Check {
        id: i64,
        /// Day to record (YYYY-MM-DD, default today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Remove today's check
    Uncheck { id: i64 },
}

pub fn run(ctx: &Ctx, subcmd: TrackerSubcommand) -> anyhow::Result<()> {
    let view = match subcmd {
        TrackerSubcommand::Today => ctx.with_session(TrackerView::load)?,
        TrackerSubcommand::Add { title, category } => {
            let new = NewNonNegotiable { title, category };
            ctx.with_session(|api, session| {
                TrackerView::load(api, session)?.create(api, session, &new)
            })?
        }
        TrackerSubcommand::Edit {
            id,
            title,
            category,
            order,
        } => {
            let patch = NonNegotiablePatch {
                title,
                category,
                order,
            };
            ctx.with_session(|api, session| {
                TrackerView::load(api, session)?.update(api, session, id, &patch)
            })?
        }
        TrackerSubcommand::Delete { id } => ctx.with_session(|api, session| {
            TrackerView::load(api, session)?.delete(api, session, id)
        })?,
        TrackerSubcommand::Check { id, date } => ctx.with_session(|api, session| {
            TrackerView::load(api, session)?.check(api, session, id, date)
        })?,
        TrackerSubcommand::Uncheck { id } => ctx.with_session(|api, session| {
            TrackerView::load(api, session)?.uncheck(api, session, id)
        })?,
    };
    print_day(ctx, &view)
}

fn print_day(ctx: &Ctx, view: &TrackerView) -> anyhow::Result<()> {
    if ctx.json {
        return print_json(&view.day);
    }
    let items = view.items();
    println!(
        "{}  {}/{} done",
        view.day.date,
        view.checked_count(),
        items.len()
    );
    if items.is_empty() {
        return Ok(());
    }
    let rows = items
        .iter()
        .map(|nn| {
            let (current, longest) = nn
                .streak
                .as_ref()
                .map(|s| (s.current_streak, s.longest_streak))
                .unwrap_or((0, 0));
            vec![
                if view.is_checked(nn.id) { "[x]" } else { "[ ]" }.to_string(),
                nn.id.to_string(),
                nn.title.clone(),
                nn.category.to_string(),
                current.to_string(),
                longest.to_string(),
            ]
        })
        .collect();
    print_table(&["", "ID", "TITLE", "CATEGORY", "STREAK", "BEST"], rows);
    Ok(())
}
