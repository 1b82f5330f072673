//! 3YOURMIND tools.
//!
//! # Usage
//!
//! ```bash
//! # Import CAD files listed in a CSV as catalog items
//! threeyd import-catalog --csv parts.csv
//!
//! # Create lines only, without catalog items
//! threeyd import-catalog --csv parts.csv --dry-run
//!
//! # Copy users from ORIGIN_* to TARGET_* platform
//! threeyd migrate-users --report log.json
//! ```
//!
//! # Commands
//!
//! - `import-catalog` - CSV rows into catalog items
//! - `migrate-users` - users, preferences and addresses between platforms

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use threeyd_cli::commands::{CommandError, import_catalog, migrate_users};

#[derive(Parser)]
#[command(name = "threeyd")]
#[command(version, about = "3YOURMIND catalog import and user migration tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import CAD files and catalog items from a CSV file
    ImportCatalog {
        /// CSV file with one part per row
        #[arg(long)]
        csv: PathBuf,

        /// Directory relative file paths are resolved against (default: the
        /// CSV's directory)
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// Prepare basket lines but create no catalog items
        #[arg(long)]
        dry_run: bool,

        /// Report file
        #[arg(long, default_value = import_catalog::DEFAULT_REPORT)]
        report: PathBuf,
    },
    /// Copy users with their preferences and addresses between platforms
    MigrateUsers {
        /// Report file
        #[arg(long, default_value = migrate_users::DEFAULT_REPORT)]
        report: PathBuf,

        /// Only check that both platforms are reachable
        #[arg(long)]
        check_connections: bool,
    },
}

#[tokio::main]
async fn main() {
    threeyd_cli::logging::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CommandError> {
    match cli.command {
        Commands::ImportCatalog {
            csv,
            data_dir,
            dry_run,
            report,
        } => {
            import_catalog::run(&import_catalog::ImportOptions {
                csv,
                data_dir,
                dry_run,
                report,
            })
            .await
        }
        Commands::MigrateUsers {
            report,
            check_connections,
        } => migrate_users::run(&report, check_connections).await,
    }
}
