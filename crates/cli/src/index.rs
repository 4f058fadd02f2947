use anyhow::{Context, bail};
use clap::{Args, ValueEnum};
use std::path::{Path, PathBuf};
use trailscope_api::{IndexerCommandType, LanguageType};
use trailscope_core::IntermediateStorage;
use trailscope_core::storage::FactDigest;
use trailscope_cxx::IndexerCommandCxx;
use trailscope_java::IndexerCommandJava;
use trailscope_runtime::{AnyIndexerCommand, index_command};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LanguageArg {
    C,
    Cpp,
    Java,
}

impl From<LanguageArg> for LanguageType {
    fn from(language: LanguageArg) -> Self {
        match language {
            LanguageArg::C => LanguageType::C,
            LanguageArg::Cpp => LanguageType::Cpp,
            LanguageArg::Java => LanguageType::Java,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// What goes into the command besides the file itself.
#[derive(Args, Debug, Clone, Default)]
pub struct CommandOptions {
    /// Overrides the language inferred from the file extension
    #[arg(long, value_enum)]
    pub language: Option<LanguageArg>,

    /// Language standard, e.g. `c++17` or `8`; defaults per language
    #[arg(long)]
    pub standard: Option<String>,

    /// Class path entries for Java files
    #[arg(long = "classpath", value_name = "PATH")]
    pub class_path: Vec<PathBuf>,

    /// Compiler flags for C and C++ files
    #[arg(long = "flag", value_name = "FLAG", allow_hyphen_values = true)]
    pub compiler_flags: Vec<String>,

    /// Directory whose headers are indexed along with C and C++ files
    #[arg(long = "indexed-path", value_name = "DIR")]
    pub indexed_paths: Vec<PathBuf>,

    /// Exclude filter for headers, e.g. `**/third_party/**`
    #[arg(long = "exclude", value_name = "FILTER")]
    pub exclude_filters: Vec<String>,
}

pub fn build_command(path: &Path, options: &CommandOptions) -> anyhow::Result<AnyIndexerCommand> {
    let language = match options.language {
        Some(language) => LanguageType::from(language),
        None => path
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(LanguageType::from_extension)
            .with_context(|| {
                format!(
                    "cannot tell the language of {}, pass --language",
                    path.display()
                )
            })?,
    };
    let standard = options
        .standard
        .clone()
        .unwrap_or_else(|| language.default_standard().to_string());

    let command = match language.indexer_command_type() {
        IndexerCommandType::Java => {
            IndexerCommandJava::new(path, standard, options.class_path.clone()).into()
        }
        IndexerCommandType::Cxx => {
            let working_directory = path
                .parent()
                .filter(|parent| !parent.as_os_str().is_empty())
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from("."));
            IndexerCommandCxx::new(path, standard, working_directory)
                .with_compiler_flags(options.compiler_flags.clone())
                .with_indexed_paths(options.indexed_paths.clone())
                .with_exclude_filters(options.exclude_filters.clone())
                .into()
        }
    };
    Ok(command)
}

/// Indexes `path` and renders the resulting facts.
pub fn index_file(
    path: &Path,
    options: &CommandOptions,
    format: OutputFormat,
) -> anyhow::Result<String> {
    let command = build_command(path, options)?;
    let outcome = index_command(command.as_command())
        .with_context(|| format!("failed to index {}", path.display()))?;
    let Some(storage) = outcome.into_storage() else {
        bail!("indexing {} was interrupted", path.display());
    };
    render(&storage, format)
}

fn render(storage: &IntermediateStorage, format: OutputFormat) -> anyhow::Result<String> {
    Ok(match format {
        OutputFormat::Text => FactDigest::new(storage).render(),
        OutputFormat::Json => serde_json::to_string_pretty(&storage.snapshot())?,
    })
}

pub fn run(path: &Path, options: &CommandOptions, format: OutputFormat) -> anyhow::Result<()> {
    let output = index_file(path, options, format)?;
    print!("{}", output);
    if format == OutputFormat::Json {
        println!();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use trailscope_core::IndexerCommand;

    #[test]
    fn language_comes_from_the_extension() {
        let command = build_command(Path::new("src/A.java"), &CommandOptions::default()).unwrap();
        assert_eq!(command.indexer_command_type(), IndexerCommandType::Java);
        assert_eq!(command.as_command().language_standard(), "10");

        let command = build_command(Path::new("lib/a.c"), &CommandOptions::default()).unwrap();
        assert_eq!(command.indexer_command_type(), IndexerCommandType::Cxx);
        assert_eq!(command.as_command().language_standard(), "c11");
    }

    #[test]
    fn explicit_language_and_standard_win() {
        let options = CommandOptions {
            language: Some(LanguageArg::Cpp),
            standard: Some("c++20".to_string()),
            compiler_flags: vec!["-DNDEBUG".to_string()],
            indexed_paths: vec![PathBuf::from("include")],
            exclude_filters: vec!["include/gen/**".to_string()],
            ..CommandOptions::default()
        };
        let command = build_command(Path::new("module.inl"), &options).unwrap();

        let AnyIndexerCommand::Cxx(cxx) = command else {
            panic!("expected a C++ command");
        };
        assert_eq!(cxx.language_standard(), "c++20");
        assert_eq!(cxx.compiler_flags(), ["-DNDEBUG".to_string()]);
        assert_eq!(cxx.indexed_paths(), [PathBuf::from("include")]);
        assert_eq!(cxx.exclude_filters(), ["include/gen/**".to_string()]);
        assert_eq!(cxx.working_directory(), Path::new("."));
    }

    #[test]
    fn unknown_extension_without_language_is_rejected() {
        assert!(build_command(Path::new("notes.txt"), &CommandOptions::default()).is_err());
    }
}
