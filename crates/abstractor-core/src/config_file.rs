use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::classifier::ClassifierConfig;
use crate::locator::{HeadingRule, LocatorConfig, default_stop_headings};
use crate::pipeline::PipelineConfig;

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    pub extraction: Option<ExtractionConfig>,
    pub classifier: Option<ClassifierFileConfig>,
    /// Extra stop-heading rules, appended after the built-in set.
    pub headings: Option<Vec<HeadingRule>>,
    pub server: Option<ServerConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractionConfig {
    pub ocr_fallback_threshold: Option<usize>,
    pub abstract_word_cap: Option<usize>,
    pub ocr_dpi: Option<u32>,
    pub ocr_lang: Option<String>,
    pub ocr_page_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClassifierFileConfig {
    pub url: Option<String>,
    pub min_score: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind_addr: Option<String>,
    pub upload_log_path: Option<String>,
    pub body_limit_mb: Option<u32>,
}

/// Platform config directory path: `<config_dir>/abstractor/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("abstractor").join("config.toml"))
}

/// Load config by cascading CWD `.abstractor.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(&PathBuf::from(".abstractor.toml"));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

/// Load a config from a specific path. Returns `None` if the file doesn't
/// exist or can't be parsed.
pub fn load_from_path(path: &PathBuf) -> Option<ConfigFile> {
    let content = std::fs::read_to_string(path).ok()?;
    toml::from_str(&content).ok()
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    let be = base.extraction.unwrap_or_default();
    let oe = overlay.extraction.unwrap_or_default();
    let bc = base.classifier.unwrap_or_default();
    let oc = overlay.classifier.unwrap_or_default();
    let bs = base.server.unwrap_or_default();
    let os = overlay.server.unwrap_or_default();

    ConfigFile {
        extraction: Some(ExtractionConfig {
            ocr_fallback_threshold: oe.ocr_fallback_threshold.or(be.ocr_fallback_threshold),
            abstract_word_cap: oe.abstract_word_cap.or(be.abstract_word_cap),
            ocr_dpi: oe.ocr_dpi.or(be.ocr_dpi),
            ocr_lang: oe.ocr_lang.or(be.ocr_lang),
            ocr_page_timeout_secs: oe.ocr_page_timeout_secs.or(be.ocr_page_timeout_secs),
        }),
        classifier: Some(ClassifierFileConfig {
            url: oc.url.or(bc.url),
            min_score: oc.min_score.or(bc.min_score),
        }),
        headings: overlay.headings.or(base.headings),
        server: Some(ServerConfig {
            bind_addr: os.bind_addr.or(bs.bind_addr),
            upload_log_path: os.upload_log_path.or(bs.upload_log_path),
            body_limit_mb: os.body_limit_mb.or(bs.body_limit_mb),
        }),
    }
}

impl ConfigFile {
    /// Resolve the file values into a runtime [`PipelineConfig`]. Configured
    /// stop headings extend the built-in set; they never replace it.
    pub fn pipeline_config(&self) -> PipelineConfig {
        let extraction = self.extraction.clone().unwrap_or_default();
        let classifier = self.classifier.clone().unwrap_or_default();

        let mut locator = LocatorConfig::default();
        if let Some(cap) = extraction.abstract_word_cap {
            locator.word_cap = cap;
        }
        let mut stop_headings = default_stop_headings();
        if let Some(extra) = &self.headings {
            stop_headings.extend(extra.iter().cloned());
        }
        locator.stop_headings = stop_headings;

        let mut classifier_config = ClassifierConfig::default();
        if let Some(url) = classifier.url {
            classifier_config.url = url;
        }
        if let Some(min_score) = classifier.min_score {
            classifier_config.min_score = min_score;
        }

        PipelineConfig {
            ocr_fallback_threshold: extraction.ocr_fallback_threshold,
            locator,
            classifier: classifier_config,
        }
    }
}
