use std::path::PathBuf;

use crate::error::AppError;

pub const SCREENSHOT_DIR_ENV: &str = "SCREENSHOT_DIR";
pub const DB_PATH_ENV: &str = "SFZF_DB";
pub const TESSERACT_BIN_ENV: &str = "TESSERACT_BIN";
pub const DEFAULT_DB_FILE: &str = "sfzf.db";
const DEFAULT_SCREENSHOT_SUBDIR: &str = "screenshots";

/// What a reindex does when OCR fails on one image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Stop the run and leave the existing index untouched.
    #[default]
    Abort,
    /// Log the failure, leave the image out and keep going.
    Skip,
}

/// How file names are tested against the accepted image types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchMode {
    /// `png`, `jpg` or `jpeg` appears anywhere in the name.
    #[default]
    Substring,
    /// The extension after the last dot is exactly one of them.
    Extension,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OcrBackend {
    /// Run the `tesseract` executable.
    #[default]
    Tesseract,
    /// Call libtesseract in-process (requires the `leptess` feature).
    Leptess,
}

#[derive(Debug, Clone)]
pub struct OcrSettings {
    pub backend: OcrBackend,
    pub program: PathBuf,
    pub language: String,
}

impl Default for OcrSettings {
    fn default() -> Self {
        Self {
            backend: OcrBackend::Tesseract,
            program: PathBuf::from("tesseract"),
            language: "eng".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct IndexingOptions {
    pub failure_policy: FailurePolicy,
    pub match_mode: MatchMode,
    pub skip_blank_lines: bool,
    pub jobs: usize,
}

impl Default for IndexingOptions {
    fn default() -> Self {
        Self {
            failure_policy: FailurePolicy::Abort,
            match_mode: MatchMode::Substring,
            skip_blank_lines: false,
            jobs: 1,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub screenshot_dir: PathBuf,
    pub db_path: PathBuf,
    pub ocr: OcrSettings,
    pub indexing: IndexingOptions,
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

pub fn resolve_screenshot_dir(
    flag: Option<PathBuf>,
    env_value: Option<String>,
    home: Option<PathBuf>,
) -> Result<PathBuf, AppError> {
    if let Some(dir) = flag {
        return Ok(dir);
    }
    if let Some(dir) = env_value.filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    let home = home
        .ok_or_else(|| AppError::Config("could not resolve home directory".to_string()))?;
    Ok(home.join(DEFAULT_SCREENSHOT_SUBDIR))
}

pub fn resolve_db_path(flag: Option<PathBuf>, env_value: Option<String>) -> PathBuf {
    flag.or_else(|| env_value.filter(|v| !v.is_empty()).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_FILE))
}

impl Config {
    /// Builds the configuration from flags, then the environment, then defaults.
    pub fn resolve(
        dir_flag: Option<PathBuf>,
        db_flag: Option<PathBuf>,
        ocr: OcrSettings,
        indexing: IndexingOptions,
    ) -> Result<Self, AppError> {
        let screenshot_dir =
            resolve_screenshot_dir(dir_flag, non_empty_env(SCREENSHOT_DIR_ENV), dirs::home_dir())?;
        let db_path = resolve_db_path(db_flag, non_empty_env(DB_PATH_ENV));

        if indexing.jobs == 0 {
            return Err(AppError::Config("--jobs must be at least 1".to_string()));
        }

        Ok(Self {
            screenshot_dir,
            db_path,
            ocr,
            indexing,
        })
    }

    pub fn tesseract_program(flag: Option<PathBuf>) -> PathBuf {
        flag.or_else(|| non_empty_env(TESSERACT_BIN_ENV).map(PathBuf::from))
            .unwrap_or_else(|| OcrSettings::default().program)
    }
}
