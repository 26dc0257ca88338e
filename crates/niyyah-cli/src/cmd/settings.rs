use crate::context::Ctx;
use crate::output::print_json;
use clap::Subcommand;
use niyyah_core::types::{SettingsPatch, Theme};
use niyyah_core::views::SettingsView;

#[derive(Subcommand)]
pub enum SettingsSubcommand {
    /// Show account settings
    Show,
    /// Change account settings
    Set {
        #[arg(long)]
        super_objective: Option<String>,
        /// Prayer time calculation method, e.g. ISNA, MWL
        #[arg(long)]
        prayer_method: Option<String>,
        #[arg(long, allow_negative_numbers = true)]
        latitude: Option<f64>,
        #[arg(long, allow_negative_numbers = true)]
        longitude: Option<f64>,
        /// light, dark or system
        #[arg(long)]
        theme: Option<Theme>,
    },
}

pub fn run(ctx: &Ctx, subcmd: SettingsSubcommand) -> anyhow::Result<()> {
    let view = match subcmd {
        SettingsSubcommand::Show => ctx.with_session(SettingsView::load)?,
        SettingsSubcommand::Set {
            super_objective,
            prayer_method,
            latitude,
            longitude,
            theme,
        } => {
            let patch = SettingsPatch {
                super_objective,
                prayer_calculation_method: prayer_method,
                latitude,
                longitude,
                theme,
            };
            if patch.super_objective.is_none()
                && patch.prayer_calculation_method.is_none()
                && patch.latitude.is_none()
                && patch.longitude.is_none()
                && patch.theme.is_none()
            {
                anyhow::bail!("nothing to change: pass at least one setting");
            }
            ctx.with_session(|api, session| {
                SettingsView::load(api, session)?.update(api, session, &patch)
            })?
        }
    };

    if ctx.json {
        return print_json(&view.settings);
    }
    let s = &view.settings;
    println!("Super objective: {}", s.super_objective);
    println!("Prayer method:   {}", s.prayer_calculation_method);
    match (s.latitude, s.longitude) {
        (Some(lat), Some(lon)) => println!("Location:        {lat:.4}, {lon:.4}"),
        _ => println!("Location:        (not set)"),
    }
    println!("Theme:           {}", s.theme);
    Ok(())
}
