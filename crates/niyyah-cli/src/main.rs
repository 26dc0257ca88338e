mod cmd;
mod context;
mod home;
mod output;

use clap::{Parser, Subcommand};
use cmd::{
    config::ConfigSubcommand, persona::PersonaSubcommand, principle::PrincipleSubcommand,
    schedule::ScheduleSubcommand, settings::SettingsSubcommand, tracker::TrackerSubcommand,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "niyyah",
    about = "Niyyah: personas, daily schedule, principles and non-negotiables from the terminal",
    version,
    propagate_version = true
)]
struct Cli {
    /// Directory holding config.yaml and session.yaml (default: ~/.niyyah)
    #[arg(long, global = true, env = "NIYYAH_HOME")]
    home: Option<PathBuf>,

    /// API base URL, overriding config.yaml
    #[arg(long, global = true, env = "NIYYAH_API_URL")]
    api_url: Option<String>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account and log in
    Register {
        email: String,
        /// Password (prompted on stdin when omitted)
        #[arg(long, env = "NIYYAH_PASSWORD", hide_env_values = true)]
        password: Option<String>,
        /// IANA timezone, e.g. Europe/London
        #[arg(long, default_value = "UTC")]
        timezone: String,
    },

    /// Log in and store the session
    Login {
        email: String,
        /// Password (prompted on stdin when omitted)
        #[arg(long, env = "NIYYAH_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Revoke the refresh token and forget the session
    Logout,

    /// Show the logged-in user
    Whoami,

    /// Show the schedule block active right now
    Now {
        /// Evaluate at this time instead of the local clock (HH:MM)
        #[arg(long)]
        at: Option<String>,
        /// Read blocks from a JSON or YAML file instead of the API
        #[arg(long)]
        file: Option<PathBuf>,
        /// Keep running and refresh on every tick
        #[arg(long, conflicts_with = "at")]
        watch: bool,
        /// Tick interval in seconds for --watch (default: tick_secs from config)
        #[arg(long)]
        interval: Option<u64>,
    },

    /// Show the dashboard: current block, personas, streaks
    Dashboard {
        /// Evaluate at this time instead of the local clock (HH:MM)
        #[arg(long)]
        at: Option<String>,
    },

    /// Manage personas and their milestones
    Persona {
        #[command(subcommand)]
        subcommand: PersonaSubcommand,
    },

    /// Manage the daily schedule
    Schedule {
        #[command(subcommand)]
        subcommand: ScheduleSubcommand,
    },

    /// Manage guiding principles
    Principle {
        #[command(subcommand)]
        subcommand: PrincipleSubcommand,
    },

    /// Daily non-negotiables and streaks
    Tracker {
        #[command(subcommand)]
        subcommand: TrackerSubcommand,
    },

    /// Show or change account settings
    Settings {
        #[command(subcommand)]
        subcommand: SettingsSubcommand,
    },

    /// Inspect and change the local client config
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Now { watch: true, .. } => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = home::resolve_home(cli.home.as_deref()).and_then(|home| {
        let ctx = context::Ctx::load(home, cli.api_url.as_deref(), cli.json)?;
        run(&ctx, cli.command)
    });

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn run(ctx: &context::Ctx, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Register {
            email,
            password,
            timezone,
        } => cmd::auth::register(ctx, &email, password, &timezone),
        Commands::Login { email, password } => cmd::auth::login(ctx, &email, password),
        Commands::Logout => cmd::auth::logout(ctx),
        Commands::Whoami => cmd::auth::whoami(ctx),
        Commands::Now {
            at,
            file,
            watch,
            interval,
        } => cmd::now::run(ctx, at.as_deref(), file.as_deref(), watch, interval),
        Commands::Dashboard { at } => cmd::dashboard::run(ctx, at.as_deref()),
        Commands::Persona { subcommand } => cmd::persona::run(ctx, subcommand),
        Commands::Schedule { subcommand } => cmd::schedule::run(ctx, subcommand),
        Commands::Principle { subcommand } => cmd::principle::run(ctx, subcommand),
        Commands::Tracker { subcommand } => cmd::tracker::run(ctx, subcommand),
        Commands::Settings { subcommand } => cmd::settings::run(ctx, subcommand),
        Commands::Config { subcommand } => cmd::config::run(ctx, subcommand),
    }
}
