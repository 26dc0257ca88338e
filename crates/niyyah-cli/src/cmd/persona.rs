use crate::context::Ctx;
use crate::output::{print_json, print_table};
use chrono::NaiveDate;
use clap::{Args, Subcommand};
use niyyah_core::types::{NewMilestone, NewPersona, Persona, PersonaPatch};
use niyyah_core::views::PersonasView;

#[derive(Subcommand)]
pub enum PersonaSubcommand {
    /// List personas in display order
    List,
    /// Show one persona with its milestones
    Show { id: i64 },
    /// Create a persona
    Add {
        name: String,
        /// Life domain, e.g. Spiritual, Career
        #[arg(long)]
        domain: String,
        #[command(flatten)]
        fields: PersonaFields,
    },
    /// Change fields of a persona
    Edit {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        domain: Option<String>,
        #[arg(long)]
        order: Option<i32>,
        #[command(flatten)]
        fields: PersonaFields,
    },
    /// Delete a persona
    Delete { id: i64 },
    /// Set the display order (persona ids, first to last)
    Reorder {
        #[arg(required = true)]
        ids: Vec<i64>,
    },
    /// Add a milestone to a persona
    MilestoneAdd {
        persona_id: i64,
        goal: String,
        /// Target date (YYYY-MM-DD)
        #[arg(long)]
        target_date: Option<NaiveDate>,
    },
    /// Remove a milestone from a persona
    MilestoneDelete { persona_id: i64, milestone_id: i64 },
}

#[derive(Args)]
pub struct PersonaFields {
    #[arg(long)]
    arabic_name: Option<String>,
    /// Who this persona eventually becomes
    #[arg(long)]
    eventually: Option<String>,
    #[arg(long)]
    icon: Option<String>,
    /// Hex colour, e.g. #0f766e
    #[arg(long)]
    color: Option<String>,
    #[arg(long)]
    one_thing: Option<String>,
    #[arg(long)]
    ritual: Option<String>,
    #[arg(long)]
    guardrail: Option<String>,
    /// Guiding point (repeatable: --point a --point b)
    #[arg(long = "point")]
    points: Vec<String>,
}

pub fn run(ctx: &Ctx, subcmd: PersonaSubcommand) -> anyhow::Result<()> {
    match subcmd {
        PersonaSubcommand::List => list(ctx),
        PersonaSubcommand::Show { id } => show(ctx, id),
        PersonaSubcommand::Add {
            name,
            domain,
            fields,
        } => add(ctx, name, domain, fields),
        PersonaSubcommand::Edit {
            id,
            name,
            domain,
            order,
            fields,
        } => {
            let patch = PersonaPatch {
                name,
                domain,
                order,
                arabic_name: fields.arabic_name,
                eventually: fields.eventually,
                icon: fields.icon,
                color: fields.color,
                one_thing: fields.one_thing,
                ritual: fields.ritual,
                guardrail: fields.guardrail,
                points: (!fields.points.is_empty()).then_some(fields.points),
            };
            edit(ctx, id, &patch)
        }
        PersonaSubcommand::Delete { id } => delete(ctx, id),
        PersonaSubcommand::Reorder { ids } => reorder(ctx, &ids),
        PersonaSubcommand::MilestoneAdd {
            persona_id,
            goal,
            target_date,
        } => milestone_add(ctx, persona_id, goal, target_date),
        PersonaSubcommand::MilestoneDelete {
            persona_id,
            milestone_id,
        } => milestone_delete(ctx, persona_id, milestone_id),
    }
}

fn list(ctx: &Ctx) -> anyhow::Result<()> {
    let view = ctx.with_session(PersonasView::load)?;
    print_list(ctx, &view)
}

fn show(ctx: &Ctx, id: i64) -> anyhow::Result<()> {
    let view = ctx.with_session(PersonasView::load)?;
    let persona = view.get(id)?;
    print_persona(ctx, persona)
}

fn add(ctx: &Ctx, name: String, domain: String, fields: PersonaFields) -> anyhow::Result<()> {
    let mut new = NewPersona::new(name, domain);
    new.arabic_name = fields.arabic_name.unwrap_or_default();
    new.eventually = fields.eventually.unwrap_or_default();
    if let Some(icon) = fields.icon {
        new.icon = icon;
    }
    if let Some(color) = fields.color {
        new.color = color;
    }
    new.one_thing = fields.one_thing;
    new.ritual = fields.ritual;
    new.guardrail = fields.guardrail;
    new.points = fields.points;

    let view = ctx.with_session(|api, session| {
        PersonasView::load(api, session)?.create(api, session, &new)
    })?;
    match view.personas.last() {
        Some(created) => print_persona(ctx, created),
        None => Ok(()),
    }
}

fn edit(ctx: &Ctx, id: i64, patch: &PersonaPatch) -> anyhow::Result<()> {
    let view = ctx.with_session(|api, session| {
        PersonasView::load(api, session)?.update(api, session, id, patch)
    })?;
    print_persona(ctx, view.get(id)?)
}

fn delete(ctx: &Ctx, id: i64) -> anyhow::Result<()> {
    let view = ctx.with_session(|api, session| {
        let view = PersonasView::load(api, session)?;
        view.get(id)?;
        view.delete(api, session, id)
    })?;
    if ctx.json {
        print_json(&serde_json::json!({ "deleted": id, "remaining": view.personas.len() }))
    } else {
        println!("Deleted persona {id}.");
        Ok(())
    }
}

fn reorder(ctx: &Ctx, ids: &[i64]) -> anyhow::Result<()> {
    let view = ctx.with_session(|api, session| {
        PersonasView::load(api, session)?.reorder(api, session, ids)
    })?;
    print_list(ctx, &view)
}

fn milestone_add(
    ctx: &Ctx,
    persona_id: i64,
    goal: String,
    target_date: Option<NaiveDate>,
) -> anyhow::Result<()> {
    let new = NewMilestone { goal, target_date };
    let view = ctx.with_session(|api, session| {
        PersonasView::load(api, session)?.add_milestone(api, session, persona_id, &new)
    })?;
    print_persona(ctx, view.get(persona_id)?)
}

fn milestone_delete(ctx: &Ctx, persona_id: i64, milestone_id: i64) -> anyhow::Result<()> {
    let view = ctx.with_session(|api, session| {
        PersonasView::load(api, session)?.delete_milestone(api, session, persona_id, milestone_id)
    })?;
    print_persona(ctx, view.get(persona_id)?)
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn print_list(ctx: &Ctx, view: &PersonasView) -> anyhow::Result<()> {
    if ctx.json {
        return print_json(&view.personas);
    }
    if view.personas.is_empty() {
        println!("No personas.");
        return Ok(());
    }
    let rows = view
        .personas
        .iter()
        .map(|p| {
            vec![
                p.id.to_string(),
                p.name.clone(),
                p.domain.clone(),
                p.milestones.len().to_string(),
            ]
        })
        .collect();
    print_table(&["ID", "NAME", "DOMAIN", "MILESTONES"], rows);
    Ok(())
}

fn print_persona(ctx: &Ctx, p: &Persona) -> anyhow::Result<()> {
    if ctx.json {
        return print_json(p);
    }
    if p.arabic_name.is_empty() {
        println!("{} [{}]", p.name, p.id);
    } else {
        println!("{} ({}) [{}]", p.name, p.arabic_name, p.id);
    }
    println!("Domain:     {}", p.domain);
    if !p.eventually.is_empty() {
        println!("Eventually: {}", p.eventually);
    }
    for (label, value) in [
        ("One thing:", &p.one_thing),
        ("Ritual:   ", &p.ritual),
        ("Guardrail:", &p.guardrail),
    ] {
        if let Some(v) = value {
            println!("{label} {v}");
        }
    }
    for point in &p.points {
        println!("  - {point}");
    }
    if !p.milestones.is_empty() {
        println!();
        let rows = p
            .milestones
            .iter()
            .map(|m| {
                vec![
                    m.id.to_string(),
                    m.goal.clone(),
                    m.target_date.map(|d| d.to_string()).unwrap_or_default(),
                    if m.is_completed { "done" } else { "" }.to_string(),
                ]
            })
            .collect();
        print_table(&["ID", "MILESTONE", "TARGET", ""], rows);
    }
    Ok(())
}
