//! CLI command definitions for the `hireloop` binary.

pub mod admin;
pub mod interview;
pub mod serve;
pub mod show;
pub mod welcome;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Run AI-conducted screening interviews between two agents.
#[derive(Parser)]
#[command(name = "hireloop", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Export spans (including LLM calls) through OpenTelemetry to stdout.
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server hosting both agents.
    Serve {
        /// Port to listen on.
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to.
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },

    /// Register or unregister an applicant.
    Admin {
        #[command(subcommand)]
        action: AdminCommand,
    },

    /// Run a full local interview between the two in-process agents.
    Interview {
        /// Give up if the interview has not concluded after this many seconds.
        #[arg(long, default_value = "900")]
        timeout: u64,
    },

    /// Show the conversation record for an applicant key.
    Show {
        /// Applicant key.
        key: String,
    },

    /// Print the hiring manager's welcome message.
    Welcome,

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum AdminCommand {
    /// Allow an applicant to be interviewed.
    Register(AdminArgs),
    /// Revoke an applicant's access.
    Unregister(AdminArgs),
}

#[derive(clap::Args, Debug)]
pub struct AdminArgs {
    /// Applicant display name.
    #[arg(long)]
    pub name: String,

    /// Applicant key (also the conversation key).
    #[arg(long)]
    pub key: String,

    /// Admin key; defaults to the ADMIN_KEY environment variable.
    #[arg(long, env = "ADMIN_KEY", hide_env_values = true)]
    pub admin_key: String,
}

impl AdminCommand {
    pub fn action(&self) -> &'static str {
        match self {
            AdminCommand::Register(_) => "register",
            AdminCommand::Unregister(_) => "unregister",
        }
    }

    pub fn args(&self) -> &AdminArgs {
        match self {
            AdminCommand::Register(args) | AdminCommand::Unregister(args) => args,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_admin_register() {
        let cli = Cli::try_parse_from([
            "hireloop",
            "admin",
            "register",
            "--name",
            "Foo Bar",
            "--key",
            "abc",
            "--admin-key",
            "secret",
        ])
        .unwrap();

        let Commands::Admin { action } = cli.command else {
            panic!("expected admin command");
        };
        assert_eq!(action.action(), "register");
        assert_eq!(action.args().name, "Foo Bar");
        assert_eq!(action.args().admin_key, "secret");
    }

    #[test]
    fn global_flags_apply_after_subcommand() {
        let cli = Cli::try_parse_from(["hireloop", "show", "abc", "--json", "-vv"]).unwrap();
        assert!(cli.json);
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Commands::Show { key } if key == "abc"));
    }

    #[test]
    fn serve_defaults() {
        let cli = Cli::try_parse_from(["hireloop", "serve"]).unwrap();
        let Commands::Serve { port, host } = cli.command else {
            panic!("expected serve command");
        };
        assert_eq!(port, 3000);
        assert_eq!(host, "127.0.0.1");
    }
}
