//! CLI argument definitions.
//!
//! Uses clap derive macros for type-safe argument parsing.

use clap::{Parser, Subcommand};

/// PG Nexus - Paying-guest hostel management API
#[derive(Parser, Debug)]
#[command(name = "pg-nexus")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server
    Serve(ServeArgs),

    /// Run database migrations
    Migrate(MigrateArgs),

    /// Recompute every room's occupancy and every property's room counters
    Reconcile,

    /// Create or promote the bootstrap admin from ADMIN_EMAIL / ADMIN_PASSWORD
    SeedAdmin,
}

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Host to bind to
    #[arg(short = 'H', long, env = "SERVER_HOST")]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "SERVER_PORT")]
    pub port: Option<u16>,

    /// Keep all data in memory instead of the database
    #[arg(long)]
    pub in_memory: bool,
}

/// Arguments for the migrate command
#[derive(Parser, Debug)]
pub struct MigrateArgs {
    #[command(subcommand)]
    pub action: MigrateAction,
}

/// Migration actions
#[derive(Subcommand, Debug)]
pub enum MigrateAction {
    /// Run pending migrations
    Up,
    /// Rollback last migration
    Down,
    /// Show migration status
    Status,
    /// Reset and re-run all migrations
    Fresh,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serve_in_memory() {
        let cli = Cli::parse_from(["pg-nexus", "serve", "--in-memory", "-p", "8080"]);
        match cli.command {
            Commands::Serve(args) => {
                assert!(args.in_memory);
                assert_eq!(args.port, Some(8080));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_migrate_and_maintenance_commands() {
        let cli = Cli::parse_from(["pg-nexus", "-v", "migrate", "fresh"]);
        assert!(cli.verbose);
        assert!(matches!(
            cli.command,
            Commands::Migrate(MigrateArgs {
                action: MigrateAction::Fresh
            })
        ));

        let cli = Cli::parse_from(["pg-nexus", "seed-admin"]);
        assert!(matches!(cli.command, Commands::SeedAdmin));
        let cli = Cli::parse_from(["pg-nexus", "reconcile"]);
        assert!(matches!(cli.command, Commands::Reconcile));
    }
}
