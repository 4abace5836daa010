use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use xpledger::{Category, Identity};

mod cli;

#[derive(Parser)]
#[command(name = "xpledger")]
#[command(about = "Community XP ledger driven by shared reward and level sheets")]
#[command(version)]
struct Cli {
    /// Path to the config file (defaults to ~/.xpledger/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Which member a command applies to
#[derive(Args)]
struct MemberArgs {
    /// Community (guild) id
    #[arg(long)]
    community: u64,

    /// Member id within the community
    #[arg(long)]
    user: u64,
}

impl MemberArgs {
    fn identity(&self) -> Identity {
        Identity::new(self.community, self.user)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Keep both catalogs refreshed until Ctrl-C
    Serve,

    /// Fetch both catalogs once and report what was admitted
    Refresh,

    /// Grant the XP of one reward-catalog row
    Grant {
        #[command(flatten)]
        member: MemberArgs,

        /// Catalog row number
        #[arg(long)]
        row: u32,

        /// Id of the member running the grant
        #[arg(long, default_value_t = 0)]
        granted_by: u64,

        /// Helping XP to grant along with this row
        #[arg(long)]
        helping: Option<u32>,
    },

    /// Add XP to a single category without a history entry
    Add {
        #[command(flatten)]
        member: MemberArgs,

        /// Category name or short code (e.g. knowledge, EDU)
        #[arg(long)]
        category: Category,

        #[arg(long)]
        amount: u32,
    },

    /// Show XP, levels and next thresholds of a member
    Info {
        #[command(flatten)]
        member: MemberArgs,
    },

    /// Show a member's grant history, latest first
    Log {
        #[command(flatten)]
        member: MemberArgs,

        /// Number of entries to show
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },

    /// Zero a member's XP and clear their history
    Reset {
        #[command(flatten)]
        member: MemberArgs,
    },

    /// Create a configuration file
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();

    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Serve => {
            cli::serve::serve_command(config_path).await?;
        }
        Commands::Refresh => {
            cli::refresh::refresh_command(config_path).await?;
        }
        Commands::Grant {
            member,
            row,
            granted_by,
            helping,
        } => {
            cli::grant::grant_command(config_path, member.identity(), row, granted_by, helping).await?;
        }
        Commands::Add {
            member,
            category,
            amount,
        } => {
            cli::grant::add_command(config_path, member.identity(), category, amount).await?;
        }
        Commands::Info { member } => {
            cli::member::info_command(config_path, member.identity()).await?;
        }
        Commands::Log { member, limit } => {
            cli::member::log_command(config_path, member.identity(), limit)?;
        }
        Commands::Reset { member } => {
            cli::member::reset_command(config_path, member.identity())?;
        }
        Commands::Init { force } => {
            cli::init::init_command(cli.config, force)?;
        }
    }

    Ok(())
}
