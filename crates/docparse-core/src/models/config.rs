//! Configuration structures for the extraction pipeline.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::report::ReportFormat;

/// Default rendering DPI for OCR'd PDF pages.
pub const DEFAULT_DPI: u32 = 288;

/// Main configuration for docparse.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DocparseConfig {
    /// OCR configuration.
    pub ocr: OcrConfig,

    /// PDF processing configuration.
    pub pdf: PdfConfig,

    /// Report output configuration.
    pub output: OutputConfig,

    /// Parse stage configuration.
    pub parse: ParseConfig,
}

/// OCR model configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Directory containing model files.
    pub model_dir: PathBuf,

    /// Text detection model file name.
    pub detection_model: String,

    /// Text recognition model file name.
    pub recognition_model: String,

    /// Character dictionary file name.
    pub dictionary: String,

    /// Keep `[UNK]` markers for glyphs the recognizer could not map.
    pub keep_unknown_glyphs: bool,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from("models"),
            detection_model: "det.onnx".to_string(),
            recognition_model: "latin_rec.onnx".to_string(),
            dictionary: "latin_dict.txt".to_string(),
            keep_unknown_glyphs: false,
        }
    }
}

impl OcrConfig {
    /// Get full path to a model file.
    pub fn model_path(&self, file_name: &str) -> PathBuf {
        self.model_dir.join(file_name)
    }
}

/// PDF processing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// DPI for rendering PDF pages before OCR.
    pub default_dpi: u32,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            default_dpi: DEFAULT_DPI,
        }
    }
}

/// Report output configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Format used when the command line does not pick one.
    pub format: ReportFormat,
}

/// Parse stage configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseConfig {
    /// Abort parsing after this many seconds.
    pub timeout_secs: Option<u64>,
}

impl DocparseConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DocparseConfig::default();
        assert_eq!(config.pdf.default_dpi, 288);
        assert_eq!(config.output.format, ReportFormat::Text);
        assert!(config.parse.timeout_secs.is_none());
        assert_eq!(config.ocr.model_path("det.onnx"), PathBuf::from("models/det.onnx"));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: DocparseConfig =
            serde_json::from_str(r#"{ "output": { "format": "json" }, "pdf": {} }"#).unwrap();
        assert_eq!(config.output.format, ReportFormat::Json);
        assert_eq!(config.pdf.default_dpi, 288);
        assert_eq!(config.ocr.recognition_model, "latin_rec.onnx");
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = DocparseConfig::default();
        config.parse.timeout_secs = Some(30);
        std::fs::write(&path, serde_json::to_string_pretty(&config).unwrap()).unwrap();

        let loaded = DocparseConfig::from_file(&path).unwrap();
        assert_eq!(loaded.parse.timeout_secs, Some(30));
    }

    #[test]
    fn test_from_file_rejects_bad_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ \"pdf\": ").unwrap();

        let err = DocparseConfig::from_file(&path).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);
    }
}
