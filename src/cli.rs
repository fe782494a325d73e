use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::{
    Config, FailurePolicy, IndexingOptions, MatchMode, OcrBackend, OcrSettings,
};
use crate::error::AppError;

#[derive(Parser, Debug)]
#[command(name = "sfzf", version, about = "search your screenshots with fuzzy search")]
pub struct Cli {
    /// Index file (env: SFZF_DB, default: ./sfzf.db)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Index your screenshots with OCR
    Index(IndexArgs),
    /// Fuzzy search the indexed text and open the matching screenshot
    Search(SearchArgs),
}

#[derive(Args, Debug)]
pub struct IndexArgs {
    /// Screenshot directory (env: SCREENSHOT_DIR, default: ~/screenshots)
    #[arg(long)]
    pub dir: Option<PathBuf>,

    /// Number of images to OCR at once
    #[arg(short, long, default_value_t = 1)]
    pub jobs: usize,

    /// Skip images OCR fails on instead of aborting the run
    #[arg(long)]
    pub skip_failures: bool,

    /// Only accept files whose extension is png, jpg or jpeg
    #[arg(long)]
    pub extension_match: bool,

    /// Drop lines that are empty after normalization
    #[arg(long)]
    pub skip_blank_lines: bool,

    /// OCR backend
    #[arg(long, value_enum, default_value_t = OcrBackend::Tesseract)]
    pub engine: OcrBackend,

    /// Tesseract executable (env: TESSERACT_BIN)
    #[arg(long)]
    pub tesseract: Option<PathBuf>,

    /// Tesseract language
    #[arg(long, default_value = "eng")]
    pub lang: String,

    /// Print the run summary as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Text to look for
    pub term: Option<String>,

    /// Sort matches by score instead of index order
    #[arg(long)]
    pub ranked: bool,

    /// Keep at most this many matches
    #[arg(long)]
    pub limit: Option<usize>,

    /// Print matches as JSON instead of prompting
    #[arg(long)]
    pub json: bool,

    /// Print the selected path instead of opening it
    #[arg(long)]
    pub print: bool,
}

impl Commands {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Index(_) => "index",
            Self::Search(_) => "search",
        }
    }
}

impl IndexArgs {
    pub fn indexing_options(&self) -> IndexingOptions {
        IndexingOptions {
            failure_policy: if self.skip_failures {
                FailurePolicy::Skip
            } else {
                FailurePolicy::Abort
            },
            match_mode: if self.extension_match {
                MatchMode::Extension
            } else {
                MatchMode::Substring
            },
            skip_blank_lines: self.skip_blank_lines,
            jobs: self.jobs,
        }
    }

    pub fn ocr_settings(&self) -> OcrSettings {
        OcrSettings {
            backend: self.engine,
            program: Config::tesseract_program(self.tesseract.clone()),
            language: self.lang.clone(),
        }
    }

    pub fn config(&self, db: Option<PathBuf>) -> Result<Config, AppError> {
        Config::resolve(
            self.dir.clone(),
            db,
            self.ocr_settings(),
            self.indexing_options(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_index_flags() {
        let cli = Cli::try_parse_from([
            "sfzf",
            "index",
            "--dir",
            "/shots",
            "--jobs",
            "4",
            "--skip-failures",
            "--extension-match",
        ])
        .unwrap();

        let Commands::Index(args) = cli.command else {
            panic!("expected index command");
        };
        let options = args.indexing_options();
        assert_eq!(args.dir, Some(PathBuf::from("/shots")));
        assert_eq!(options.jobs, 4);
        assert_eq!(options.failure_policy, FailurePolicy::Skip);
        assert_eq!(options.match_mode, MatchMode::Extension);
        assert!(!options.skip_blank_lines);
    }

    #[test]
    fn index_defaults_mirror_reference_behavior() {
        let cli = Cli::try_parse_from(["sfzf", "index"]).unwrap();
        let Commands::Index(args) = cli.command else {
            panic!("expected index command");
        };
        let options = args.indexing_options();
        assert_eq!(options.failure_policy, FailurePolicy::Abort);
        assert_eq!(options.match_mode, MatchMode::Substring);
        assert_eq!(options.jobs, 1);
        assert_eq!(args.engine, OcrBackend::Tesseract);
    }

    #[test]
    fn search_term_is_optional() {
        let cli = Cli::try_parse_from(["sfzf", "search"]).unwrap();
        let Commands::Search(args) = cli.command else {
            panic!("expected search command");
        };
        assert!(args.term.is_none());
    }

    #[test]
    fn global_db_flag_after_subcommand() {
        let cli =
            Cli::try_parse_from(["sfzf", "search", "hello", "--db", "/tmp/x.db", "--ranked"])
                .unwrap();
        assert_eq!(cli.db, Some(PathBuf::from("/tmp/x.db")));
        let Commands::Search(args) = cli.command else {
            panic!("expected search command");
        };
        assert_eq!(args.term.as_deref(), Some("hello"));
        assert!(args.ranked);
    }

    #[test]
    fn ocr_flags_belong_to_index_only() {
        let cli = Cli::try_parse_from(["sfzf", "index", "--engine", "tesseract", "--lang", "deu"])
            .unwrap();
        let Commands::Index(args) = cli.command else {
            panic!("expected index command");
        };
        assert_eq!(args.ocr_settings().language, "deu");

        assert!(Cli::try_parse_from(["sfzf", "search", "hello", "--lang", "deu"]).is_err());
        assert!(Cli::try_parse_from(["sfzf", "--engine", "tesseract", "index"]).is_err());
    }
}
