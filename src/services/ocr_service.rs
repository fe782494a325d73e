use std::path::{Path, PathBuf};
use std::process::Command;

use crate::config::{MatchMode, OcrBackend, OcrSettings};
use crate::error::AppError;
use crate::models::record::ExtractedLine;
use crate::services::text_service;

const OCR_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// Anything that can turn an image file into raw, multi-line text.
pub trait OcrEngine: Send + Sync {
    fn recognize(&self, image_path: &Path) -> Result<String, AppError>;
}

/// Shells out to the `tesseract` executable and reads the text from stdout.
#[derive(Debug, Clone)]
pub struct TesseractCli {
    program: PathBuf,
    language: String,
}

impl TesseractCli {
    pub fn new(program: impl Into<PathBuf>, language: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            language: language.into(),
        }
    }
}

impl OcrEngine for TesseractCli {
    fn recognize(&self, image_path: &Path) -> Result<String, AppError> {
        let output = Command::new(&self.program)
            .arg(image_path)
            .arg("stdout")
            .arg("-l")
            .arg(&self.language)
            .output()
            .map_err(|e| {
                AppError::Ocr(format!(
                    "failed to run {}: {e}",
                    self.program.display()
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AppError::Ocr(format!(
                "{} exited with {} on {}: {}",
                self.program.display(),
                output.status,
                image_path.display(),
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[cfg(feature = "leptess")]
#[derive(Debug, Clone)]
pub struct LepTessEngine {
    language: String,
}

#[cfg(feature = "leptess")]
impl LepTessEngine {
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
        }
    }
}

#[cfg(feature = "leptess")]
impl OcrEngine for LepTessEngine {
    fn recognize(&self, image_path: &Path) -> Result<String, AppError> {
        let mut lt = leptess::LepTess::new(None, &self.language)
            .map_err(|e| AppError::Ocr(format!("init failed: {e}")))?;
        lt.set_image(image_path)
            .map_err(|e| AppError::Ocr(format!("set_image failed: {e}")))?;
        lt.get_utf8_text()
            .map_err(|e| AppError::Ocr(format!("get_utf8_text failed: {e}")))
    }
}

pub fn build_engine(settings: &OcrSettings) -> Result<Box<dyn OcrEngine>, AppError> {
    match settings.backend {
        OcrBackend::Tesseract => Ok(Box::new(TesseractCli::new(
            settings.program.clone(),
            settings.language.clone(),
        ))),
        #[cfg(feature = "leptess")]
        OcrBackend::Leptess => Ok(Box::new(LepTessEngine::new(settings.language.clone()))),
        #[cfg(not(feature = "leptess"))]
        OcrBackend::Leptess => Err(AppError::Config(
            "this build does not include the leptess backend; rebuild with --features leptess"
                .to_string(),
        )),
    }
}

/// Accepted image types are matched case-sensitively. `Substring` mode keeps
/// the loose check where the type only has to appear somewhere in the name,
/// so `jpgfoo.txt` is accepted too.
pub fn is_accepted_image(file_name: &str, mode: MatchMode) -> bool {
    match mode {
        MatchMode::Substring => OCR_EXTENSIONS.iter().any(|ext| file_name.contains(ext)),
        MatchMode::Extension => Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| OCR_EXTENSIONS.contains(&e))
            .unwrap_or(false),
    }
}

/// Runs OCR on one image and returns one normalized line per line of output.
pub fn extract(
    engine: &dyn OcrEngine,
    image_path: &Path,
    skip_blank_lines: bool,
) -> Result<Vec<ExtractedLine>, AppError> {
    let text = engine.recognize(image_path)?;
    let source_path = image_path.to_string_lossy().into_owned();

    let lines = text
        .lines()
        .map(text_service::normalize)
        .filter(|line| !(skip_blank_lines && line.is_empty()))
        .map(|normalized_text| ExtractedLine {
            source_path: source_path.clone(),
            normalized_text,
        })
        .collect();

    Ok(lines)
}
