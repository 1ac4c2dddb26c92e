use clap::Subcommand;
use clap_complete::Shell;

pub mod check;
pub mod env;
pub mod init;
pub mod list;
pub mod run;

#[derive(Subcommand)]
pub enum Commands {
    /// Run a task from the manifest
    #[command(visible_alias = "r")]
    Run {
        /// Task name
        task: String,

        /// Extra arguments appended to the in-container command
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,

        /// Start of the data interval (RFC 3339; defaults to the end)
        #[arg(long, value_name = "TIMESTAMP")]
        interval_start: Option<String>,

        /// End of the data interval (RFC 3339; defaults to now)
        #[arg(long, value_name = "TIMESTAMP")]
        interval_end: Option<String>,

        /// Run identifier (defaults to a generated one)
        #[arg(long)]
        run_id: Option<String>,

        /// Print the docker invocation instead of executing it
        #[arg(long)]
        dry_run: bool,
    },

    /// List tasks declared in the manifest
    #[command(visible_alias = "ls")]
    List {
        /// Show connections and the in-container command
        #[arg(short, long)]
        verbose: bool,
    },

    /// Show the variables a task would receive
    Env {
        /// Task name
        task: String,

        /// Print credential values instead of masking them
        #[arg(long)]
        show_secrets: bool,
    },

    /// Validate the manifest and report every problem
    Check,

    /// Initialize a new dockhand.toml with example configuration
    Init {
        /// Force overwrite existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completion for
        shell: Shell,
    },
}
