mod batch;
mod index;
mod source_groups;
mod view;

pub use batch::index_files;
pub use index::{CommandOptions, LanguageArg, OutputFormat, build_command, index_file};
pub use source_groups::describe as describe_source_groups;
pub use view::{FileSummary, SourceGroupView};

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use trailscope_runtime::{LoggingOptions, init_logging};

#[derive(Parser)]
#[command(
    name = "trailscope",
    version,
    about = "Indexes C, C++ and Java sources into symbol and reference facts",
    long_about = "Trailscope runs one indexer command per source file and reports the facts \
                  its front end recorded: declarations, references, local symbols, scopes, \
                  qualifiers, comments and errors."
)]
pub struct Cli {
    /// Also write log lines to stderr
    #[arg(long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Index a single source file and print its facts
    Index {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        #[command(flatten)]
        options: CommandOptions,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Index several files in parallel and summarize each run
    #[command(
        long_about = "Builds one indexer command per file and runs them on a thread pool. \
                      Every command gets its own indexer, so a failing file does not stop the others."
    )]
    Batch {
        #[arg(value_name = "FILES", required = true)]
        files: Vec<PathBuf>,

        #[command(flatten)]
        options: CommandOptions,
    },
    /// List the source groups of a project configuration
    SourceGroups {
        /// JSON file holding the flat key/value configuration
        #[arg(long, value_name = "FILE")]
        config: PathBuf,

        /// Project file; relative paths in the configuration resolve against its directory
        #[arg(long, value_name = "FILE")]
        project: PathBuf,
    },
}

pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _guard = init_logging(&LoggingOptions::new("cli").with_stderr(cli.verbose));

    match cli.command {
        Commands::Index {
            file,
            options,
            format,
        } => index::run(&file, &options, format),
        Commands::Batch { files, options } => batch::run(&files, &options),
        Commands::SourceGroups { config, project } => source_groups::run(&config, &project),
    }
}
