//! Configuration types for element-to-Markdown normalization.
//!
//! All pipeline behaviour is controlled through [`NormalizeConfig`], built
//! via its [`NormalizeConfigBuilder`]. Keeping every knob in one struct
//! makes it trivial to share a config across a batch run and to diff two
//! runs to understand why their outputs differ.

use crate::element::ElementSource;
use crate::error::Elements2MdError;
use crate::pipeline::normalize::DEFAULT_LABEL_MAX_LEN;
use crate::progress::ProgressCallback;
use std::fmt;
use std::sync::Arc;

/// Configuration for a normalization run.
///
/// Built via [`NormalizeConfig::builder()`] or using
/// [`NormalizeConfig::default()`].
///
/// # Example
/// ```rust
/// use elements2md::NormalizeConfig;
///
/// let config = NormalizeConfig::builder()
///     .label_max_len(30)
///     .output_extension("markdown")
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct NormalizeConfig {
    /// Maximum character length for a line to be a label candidate in the
    /// label/value fusion pass. Default: 40.
    ///
    /// The fusion heuristic is greedy and can false-positive on short
    /// narrative lines that happen to precede a colon line; lowering this
    /// makes it more conservative, raising it catches longer field labels.
    pub label_max_len: usize,

    /// File extension (without dot) for written output files. Default: "md".
    pub output_extension: String,

    /// The extraction collaborator producing element sequences.
    /// If `None`, [`crate::element::JsonElementSource`] is used.
    pub source: Option<Arc<dyn ElementSource>>,

    /// Batch progress callback. If `None`, no events are emitted.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            label_max_len: DEFAULT_LABEL_MAX_LEN,
            output_extension: "md".to_string(),
            source: None,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for NormalizeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NormalizeConfig")
            .field("label_max_len", &self.label_max_len)
            .field("output_extension", &self.output_extension)
            .field("source", &self.source.as_ref().map(|_| "<dyn ElementSource>"))
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn BatchProgressCallback>"),
            )
            .finish()
    }
}

impl NormalizeConfig {
    /// Create a new builder for `NormalizeConfig`.
    pub fn builder() -> NormalizeConfigBuilder {
        NormalizeConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`NormalizeConfig`].
#[derive(Debug)]
pub struct NormalizeConfigBuilder {
    config: NormalizeConfig,
}

impl NormalizeConfigBuilder {
    /// Label-candidate cutoff for the fusion pass (characters).
    pub fn label_max_len(mut self, len: usize) -> Self {
        self.config.label_max_len = len;
        self
    }

    /// Extension (without dot) for written output files.
    pub fn output_extension(mut self, ext: impl Into<String>) -> Self {
        self.config.output_extension = ext.into();
        self
    }

    /// Inject an extraction collaborator.
    pub fn source(mut self, source: Arc<dyn ElementSource>) -> Self {
        self.config.source = Some(source);
        self
    }

    /// Inject a batch progress callback.
    pub fn progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.config.progress_callback = Some(callback);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<NormalizeConfig, Elements2MdError> {
        let c = &self.config;
        if c.label_max_len == 0 {
            return Err(Elements2MdError::InvalidConfig(
                "label_max_len must be ≥ 1".into(),
            ));
        }
        if c.output_extension.is_empty() || c.output_extension.starts_with('.') {
            return Err(Elements2MdError::InvalidConfig(format!(
                "output_extension must be a bare extension (got '{}')",
                c.output_extension
            )));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::JsonElementSource;
    use crate::progress::NoopProgressCallback;

    #[test]
    fn default_config_is_valid() {
        let config = NormalizeConfig::default();
        assert_eq!(config.label_max_len, DEFAULT_LABEL_MAX_LEN);
        assert_eq!(config.output_extension, "md");
        assert!(config.source.is_none());
    }

    #[test]
    fn builder_sets_fields() {
        let config = NormalizeConfig::builder()
            .label_max_len(25)
            .output_extension("markdown")
            .source(Arc::new(JsonElementSource))
            .progress_callback(Arc::new(NoopProgressCallback))
            .build()
            .unwrap();
        assert_eq!(config.label_max_len, 25);
        assert_eq!(config.output_extension, "markdown");
        assert!(config.source.is_some());
        assert!(config.progress_callback.is_some());
    }

    #[test]
    fn builder_rejects_zero_label_len() {
        let err = NormalizeConfig::builder().label_max_len(0).build();
        assert!(err.is_err());
    }

    #[test]
    fn builder_rejects_dotted_extension() {
        let err = NormalizeConfig::builder().output_extension(".md").build();
        assert!(err.is_err());
    }

    #[test]
    fn debug_does_not_require_trait_objects_to_be_debug() {
        let config = NormalizeConfig::builder()
            .source(Arc::new(JsonElementSource))
            .build()
            .unwrap();
        let repr = format!("{config:?}");
        assert!(repr.contains("dyn ElementSource"), "got: {repr}");
    }
}
