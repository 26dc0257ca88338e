use crate::context::Ctx;
use crate::output::{print_json, print_table};
use clap::Subcommand;
use niyyah_core::types::{NewPrinciple, Principle, PrinciplePatch};
use niyyah_core::views::PrinciplesView;

#[derive(Subcommand)]
pub enum PrincipleSubcommand {
    /// List principles
    List,
    /// Add a principle
    Add {
        name: String,
        /// What the principle means in practice
        #[arg(long)]
        meaning: String,
        #[arg(long)]
        arabic: Option<String>,
        /// Supporting verse or hadith
        #[arg(long)]
        verse: Option<String>,
        #[arg(long)]
        icon: Option<String>,
    },
    /// Change fields of a principle
    Edit {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        meaning: Option<String>,
        #[arg(long)]
        arabic: Option<String>,
        #[arg(long)]
        verse: Option<String>,
        #[arg(long)]
        icon: Option<String>,
        #[arg(long)]
        order: Option<i32>,
    },
    /// Delete a principle
    Delete { id: i64 },
}

pub fn run(ctx: &Ctx, subcmd: PrincipleSubcommand) -> anyhow::Result<()> {
    match subcmd {
        PrincipleSubcommand::List => {
            let view = ctx.with_session(PrinciplesView::load)?;
            print_list(ctx, &view)
        }
        PrincipleSubcommand::Add {
            name,
            meaning,
            arabic,
            verse,
            icon,
        } => {
            let mut new = NewPrinciple::new(name, meaning);
            new.arabic = arabic.unwrap_or_default();
            new.verse = verse;
            if let Some(icon) = icon {
                new.icon = icon;
            }
            let view = ctx.with_session(|api, session| {
                PrinciplesView::load(api, session)?.create(api, session, &new)
            })?;
            match view.principles.last() {
                Some(created) => print_principle(ctx, created),
                None => Ok(()),
            }
        }
        PrincipleSubcommand::Edit {
            id,
            name,
            meaning,
            arabic,
            verse,
            icon,
            order,
        } => {
            let patch = PrinciplePatch {
                name,
                arabic,
                meaning,
                verse,
                icon,
                order,
            };
            let view = ctx.with_session(|api, session| {
                PrinciplesView::load(api, session)?.update(api, session, id, &patch)
            })?;
            print_principle(ctx, view.get(id)?)
        }
        PrincipleSubcommand::Delete { id } => {
            let view = ctx.with_session(|api, session| {
                let view = PrinciplesView::load(api, session)?;
                view.get(id)?;
                view.delete(api, session, id)
            })?;
            if ctx.json {
                print_json(&serde_json::json!({ "deleted": id, "remaining": view.principles.len() }))
            } else {
                println!("Deleted principle {id}.");
                Ok(())
            }
        }
    }
}

fn print_list(ctx: &Ctx, view: &PrinciplesView) -> anyhow::Result<()> {
    if ctx.json {
        return print_json(&view.principles);
    }
    if view.principles.is_empty() {
        println!("No principles.");
        return Ok(());
    }
    let rows = view
        .principles
        .iter()
        .map(|p| vec![p.id.to_string(), p.name.clone(), p.meaning.clone()])
        .collect();
    print_table(&["ID", "NAME", "MEANING"], rows);
    Ok(())
}

fn print_principle(ctx: &Ctx, p: &Principle) -> anyhow::Result<()> {
    if ctx.json {
        return print_json(p);
    }
    if p.arabic.is_empty() {
        println!("{} [{}]", p.name, p.id);
    } else {
        println!("{} ({}) [{}]", p.name, p.arabic, p.id);
    }
    println!("{}", p.meaning);
    if let Some(verse) = &p.verse {
        println!();
        println!("  {verse}");
    }
    Ok(())
}
