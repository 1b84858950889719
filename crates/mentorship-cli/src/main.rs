use anyhow::Result;
use clap::{Parser, Subcommand};
use mentorship_core::person::Role;
use std::path::PathBuf;

mod commands;
mod logging;

#[derive(Parser)]
#[command(name = "mentorship")]
#[command(about = "Mentor allocation and session grouping", long_about = None)]
struct Cli {
    /// Base directory for config and data (defaults to the platform dirs)
    #[arg(long, global = true, env = "MENTORSHIP_HOME")]
    data_dir: Option<PathBuf>,

    /// Config file to use instead of <config dir>/config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a person; mentees are allocated to a mentor right away
    AddPerson {
        /// mentor or mentee
        #[arg(long)]
        role: Role,
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
    },
    /// Add a venue sessions can take place in
    AddVenue {
        #[arg(long)]
        name: String,
        #[arg(long)]
        location: Option<String>,
    },
    /// Promote upcoming allocations whose session is due to active
    Activate,
    /// Group active allocations into sessions for every mentor
    GroupSessions,
    /// List a mentor's sessions with their students
    Sessions {
        #[arg(long)]
        mentor: String,
    },
    /// Record counts per collection
    Stats,
    /// Print the effective configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(&cli.log_level, cli.log_json);

    let ctx = commands::Context::open(cli.data_dir, cli.config)?;

    match cli.command {
        Commands::AddPerson { role, name, email } => {
            commands::people::add_person(&ctx, role, name, email).await?
        }
        Commands::AddVenue { name, location } => {
            commands::people::add_venue(&ctx, name, location).await?
        }
        Commands::Activate => commands::engine::activate(&ctx).await?,
        Commands::GroupSessions => commands::engine::group_sessions(&ctx).await?,
        Commands::Sessions { mentor } => commands::query::sessions(&ctx, &mentor).await?,
        Commands::Stats => commands::query::stats(&ctx).await?,
        Commands::Config => commands::query::show_config(&ctx)?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_add_person() {
        let cli = Cli::try_parse_from([
            "mentorship",
            "--data-dir",
            "/tmp/m",
            "add-person",
            "--role",
            "mentee",
            "--name",
            "Ann",
            "--email",
            "ann@example.com",
        ])
        .unwrap();
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/m")));
        assert!(matches!(
            cli.command,
            Commands::AddPerson { role: Role::Mentee, .. }
        ));
    }

    #[test]
    fn test_unknown_role_is_rejected() {
        let parsed = Cli::try_parse_from([
            "mentorship", "add-person", "--role", "admin", "--name", "x", "--email", "y",
        ]);
        assert!(parsed.is_err());
    }
}
