use clap::Parser;
use clap::Subcommand;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[clap(about = "Sync scheduled jobs into Kubernetes CronJobs")]
pub struct Cli {
    #[clap(subcommand)]
    pub subcommand: SubCommands,

    #[clap(
        short,
        long,
        default_value = "/etc/taskmaster/config.yaml",
        global = true
    )]
    pub config: PathBuf,

    /// Trace every CronJob as it is synced
    #[clap(short, long, global = true)]
    pub debug: bool,
}

impl Cli {
    /// Log filter used when `RUST_LOG` is unset; `--debug` only raises this crate to trace.
    pub fn default_log_directives(&self) -> &'static str {
        if self.debug {
            "info,taskmaster=trace"
        } else {
            "info"
        }
    }
}

#[derive(Debug, Clone, Subcommand)]
pub enum SubCommands {
    /// Create or update every CronJob of the configured task
    Sync {
        /// Keep syncing the remaining CronJobs after one fails
        #[clap(long)]
        ignore_errors: bool,

        /// With --ignore-errors, report every failure instead of only the last one
        #[clap(long, requires = "ignore_errors")]
        collect_errors: bool,
    },

    /// List CronJobs managed by taskmaster
    List {
        /// Defaults to the namespace of the configured task
        #[clap(short, long)]
        namespace: Option<String>,

        /// Only CronJobs of this task
        #[clap(short, long)]
        task: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sync() {
        let cli = Cli::parse_from([
            "taskmaster",
            "--debug",
            "sync",
            "--ignore-errors",
            "--collect-errors",
        ]);
        assert!(cli.debug);
        assert_eq!(cli.config, PathBuf::from("/etc/taskmaster/config.yaml"));
        assert!(matches!(
            cli.subcommand,
            SubCommands::Sync {
                ignore_errors: true,
                collect_errors: true
            }
        ));
    }

    #[test]
    fn test_collect_errors_requires_ignore_errors() {
        assert!(Cli::try_parse_from(["taskmaster", "sync", "--collect-errors"]).is_err());
    }

    #[test]
    fn test_debug_raises_only_this_crate() {
        let cli = Cli::parse_from(["taskmaster", "--debug", "sync"]);
        assert_eq!(cli.default_log_directives(), "info,taskmaster=trace");
        assert!(tracing_subscriber::EnvFilter::try_new(cli.default_log_directives()).is_ok());

        let cli = Cli::parse_from(["taskmaster", "sync"]);
        assert_eq!(cli.default_log_directives(), "info");
    }

    #[test]
    fn test_parse_list() {
        let cli = Cli::parse_from([
            "taskmaster",
            "list",
            "--task",
            "backup",
            "--config",
            "/tmp/task.yaml",
        ]);
        assert_eq!(cli.config, PathBuf::from("/tmp/task.yaml"));
        assert!(matches!(
            cli.subcommand,
            SubCommands::List { namespace: None, task: Some(ref t) } if t == "backup"
        ));
    }
}
