use crate::cmd::now::{parse_at, print_current};
use crate::context::Ctx;
use crate::output::{print_json, print_table};
use niyyah_core::views::DashboardView;
use niyyah_core::TimeOfDay;

pub fn run(ctx: &Ctx, at: Option<&str>) -> anyhow::Result<()> {
    let now = parse_at(at)?.unwrap_or_else(TimeOfDay::now);
    let view = ctx.with_session(DashboardView::load)?;
    let snapshot = view.snapshot(now);

    if ctx.json {
        return print_json(&serde_json::json!({
            "super_objective": view.data.super_objective,
            "snapshot": snapshot,
            "personas": view.data.personas,
            "streaks": view.data.streaks,
        }));
    }

    if !view.data.super_objective.is_empty() {
        println!("{}", view.data.super_objective);
        println!();
    }
    print_current(&snapshot);
    println!();
    println!(
        "Today: {}/{} non-negotiables ({}%)",
        view.data.non_negotiables_checked_today,
        view.data.non_negotiables_total,
        snapshot.checked_percent
    );

    if !view.data.personas.is_empty() {
        println!();
        let rows = view
            .data
            .personas
            .iter()
            .map(|p| vec![p.id.to_string(), p.name.clone(), p.domain.clone()])
            .collect();
        print_table(&["ID", "PERSONA", "DOMAIN"], rows);
    }

    if !view.data.streaks.is_empty() {
        println!();
        let rows = view
            .data
            .streaks
            .iter()
            .map(|s| vec![s.title.clone(), s.current.to_string(), s.longest.to_string()])
            .collect();
        print_table(&["STREAK", "CURRENT", "LONGEST"], rows);
    }
    Ok(())
}
