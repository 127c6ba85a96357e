//! CLI module - Command-line interface definitions and handlers

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::core::render::{OutputFormat, RenderConfig};

/// Default number of files reported by `search`
pub const DEFAULT_MAX_RESULTS: usize = 35;

/// Default size of the recent directory window
pub const DEFAULT_MAX_DIRS: usize = 20;

/// filehist - find the files you recently worked on, straight from your shell history.
#[derive(Parser, Debug)]
#[command(name = "filehist")]
#[command(
    author,
    version,
    about,
    long_about = r#"filehist reads shell history newest-first and reports the files your
commands operated on, resolved against the directories you recently visited.

Each command prints one result item per file in the selected format
(default: jsonl).

Output formats:
- jsonl: one JSON object per line (best for piping into tools)
- json: a single JSON array, printed once the search is over
- md: human-friendly Markdown
- raw: bare absolute paths, one per line
- plain: colored paths with modification time

Examples:
    filehist search
    filehist search --filter '\.rs$' --results 10 --format raw
    filehist track "$PWD" "vim notes.md"
    filehist search --tracked
    filehist clean
"#
)]
pub struct Cli {
    /// Output format (jsonl/json/md/raw/plain).
    #[arg(
        long,
        global = true,
        default_value = "jsonl",
        value_name = "FORMAT",
        long_help = "Select the output format.\n\n\
Supported values:\n\
- jsonl (default)\n\
- json\n\
- md (markdown)\n\
- raw\n\
- plain\n\n\
Tip: Use raw to feed the paths into fzf or xargs."
    )]
    pub format: String,

    /// Disable colored output (when applicable).
    #[arg(
        long,
        global = true,
        long_help = "Disable colored output. This is useful when piping to files or when your\n\
terminal does not support ANSI colors."
    )]
    pub no_color: bool,

    /// Quiet mode (minimal output).
    #[arg(
        short,
        long,
        global = true,
        long_help = "Reduce non-essential output. Note: results are still printed to stdout;\n\
only summaries and warnings on stderr are suppressed."
    )]
    pub quiet: bool,

    /// Verbose mode (more diagnostics).
    #[arg(
        short,
        long,
        global = true,
        long_help = "Enable debug diagnostics on stderr: every parsed command, candidate and\n\
found file is logged. RUST_LOG takes precedence when set."
    )]
    pub verbose: bool,

    /// Pretty-print JSON/JSONL output with indentation.
    #[arg(
        long,
        global = true,
        long_help = "Pretty-print JSON and JSONL output with indentation for human readability.\n\n\
Has no effect on md/raw/plain formats."
    )]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every command touching the tracked-files history
#[derive(Args, Debug, Clone)]
pub struct FileHistoryArgs {
    /// Tracked-files history file.
    #[arg(
        long,
        env = "FILE_HIST_FILE",
        value_name = "PATH",
        long_help = "Path of the tracked-files history, one absolute path per line.\n\n\
It is created (with its parent directories) when missing."
    )]
    pub file_history: Option<PathBuf>,
}

impl FileHistoryArgs {
    fn require(self) -> Result<PathBuf> {
        self.file_history
            .context("No tracked-files history: pass --file-history or set FILE_HIST_FILE")
    }
}

/// Options controlling how commands are parsed
#[derive(Args, Debug, Clone)]
pub struct ParseArgs {
    /// Extra commands that never operate on files.
    #[arg(
        long = "passive-command",
        env = "FILE_HIST_PASSIVE_COMMANDS",
        value_name = "NAME",
        value_delimiter = ',',
        long_help = "Add a command whose arguments are never files (like cd or ls).\n\n\
Repeat the flag or pass a comma-separated list. Output redirections of such\n\
commands are still reported."
    )]
    pub passive_commands: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Report recently used files, most recent first.
    #[command(
        long_about = "Scan shell history from the newest line backwards and emit one result item\n\
per distinct existing file referenced by a command. Relative paths are resolved\n\
against the recent directory log, most recent directory first.\n\n\
Results are printed as soon as they are found; the search stops once --results\n\
files were reported.\n\n\
Examples:\n\
  filehist search\n\
  filehist search --dirs ~/.dir_history --filter 'src/.*\\.rs$'\n\
  filehist search --tracked --format plain\n"
    )]
    Search {
        /// Shell history file.
        #[arg(
            long,
            env = "HISTFILE",
            value_name = "PATH",
            long_help = "Shell history file, newest command last. Defaults to $HISTFILE.\n\n\
zsh extended history lines (': 1700000000:0;cmd') are understood."
        )]
        history: Option<PathBuf>,

        /// Recent directory log.
        #[arg(
            long,
            env = "DIR_HISTORY",
            value_name = "PATH",
            long_help = "File listing visited directories, newest last. Relative paths in history\n\
are resolved against these directories.\n\n\
If omitted, only the current directory is used."
        )]
        dirs: Option<PathBuf>,

        /// Number of recent directories to resolve against.
        #[arg(long, default_value_t = DEFAULT_MAX_DIRS, value_name = "N")]
        max_dirs: usize,

        /// Maximum number of files to report.
        #[arg(
            long,
            env = "FILE_HIST_RESULTS",
            default_value_t = DEFAULT_MAX_RESULTS,
            value_name = "N"
        )]
        results: usize,

        /// Report every file found in history (overrides --results).
        #[arg(long)]
        unlimited: bool,

        /// Only report files whose absolute path matches REGEX.
        #[arg(long, value_name = "REGEX")]
        filter: Option<String>,

        /// Number of history lines to read, counted from the newest.
        #[arg(long, env = "FILE_HIST_MAX_SCANNED", value_name = "N")]
        max_scanned: Option<usize>,

        /// Read the tracked-files history instead of shell history.
        #[arg(long)]
        tracked: bool,

        #[command(flatten)]
        store: FileHistoryArgs,

        #[command(flatten)]
        parse: ParseArgs,
    },

    /// Record the files a command operated on.
    #[command(
        long_about = "Resolve the files operated on by CMD when run in DIR and append them to\n\
the tracked-files history. Meant to be called from a shell hook after each\n\
command.\n\n\
Example:\n\
  filehist track \"$PWD\" \"vim notes.md\"\n"
    )]
    Track {
        /// Directory the command ran in.
        #[arg(value_name = "DIR")]
        dir: PathBuf,

        /// The command line.
        #[arg(value_name = "CMD")]
        cmd: String,

        #[command(flatten)]
        store: FileHistoryArgs,

        #[command(flatten)]
        parse: ParseArgs,
    },

    /// Drop missing files and duplicates from the tracked-files history.
    #[command(
        long_about = "Rewrite the tracked-files history keeping only entries that still are\n\
files. Duplicates collapse into their most recent occurrence. Removed entries\n\
are emitted as result items of kind \"removed\".\n\n\
Example:\n\
  filehist clean\n"
    )]
    Clean {
        #[command(flatten)]
        store: FileHistoryArgs,
    },
}

/// Run the CLI with parsed arguments
pub fn run(cli: Cli) -> Result<()> {
    let format: OutputFormat = cli.format.parse().map_err(anyhow::Error::msg)?;
    let render_config = RenderConfig::with_pretty(format, cli.pretty);

    if cli.no_color {
        colored::control::set_override(false);
    }

    match cli.command {
        Commands::Search {
            history,
            dirs,
            max_dirs,
            results,
            unlimited,
            filter,
            max_scanned,
            tracked,
            store,
            parse,
        } => {
            let file_history = if tracked {
                Some(store.require()?)
            } else {
                None
            };
            let request = crate::app::search::SearchRequest {
                history,
                dirs,
                max_dirs,
                max_results: (!unlimited).then_some(results),
                filter,
                max_scanned,
                file_history,
                passive_commands: parse.passive_commands,
            };
            crate::app::search::run_search(request, render_config)
        }

        Commands::Track {
            dir,
            cmd,
            store,
            parse,
        } => crate::app::track::run_track(
            &dir,
            &cmd,
            &store.require()?,
            &parse.passive_commands,
            render_config,
        ),

        Commands::Clean { store } => {
            crate::app::clean::run_clean(&store.require()?, cli.quiet, render_config)
        }
    }
}
