use crate::{Component, FailureKind, SecurityConfig, SecurityError, stages::Stage};
use std::sync::Arc;
use unicode_normalization::UnicodeNormalization;

/// Canonicalizes input so downstream pattern matching cannot be evaded by
/// encoded or redundant forms.
///
/// Applies unicode NFC when configured, collapses consecutive slashes (path
/// component only), and resolves `.`/`..` segments. Resolution that would
/// climb above the root is path traversal; the canonical output of this
/// stage never contains a `..` segment unless traversal is explicitly
/// tolerated, in which case the input passes through unresolved.
#[derive(Debug, Clone)]
pub struct NormalizationStage {
    config: Arc<SecurityConfig>,
    component: Component,
}

impl NormalizationStage {
    /// construct a normalization stage for this component
    pub fn new(config: Arc<SecurityConfig>, component: Component) -> Self {
        Self { config, component }
    }

    fn resolve_segments(&self, input: &str, value: &str) -> Result<String, SecurityError> {
        let absolute = value.starts_with('/');
        let trailing_slash = value.len() > 1 && value.ends_with('/');
        let mut resolved: Vec<&str> = Vec::new();

        for segment in value.split('/') {
            match segment {
                "" | "." => {}
                ".." => {
                    if resolved.pop().is_none() {
                        if self.config.allow_path_traversal() {
                            return Ok(value.to_string());
                        }
                        return Err(SecurityError::new(
                            FailureKind::PathTraversal,
                            self.component,
                            input,
                        )
                        .with_detail("dot segments escape the root"));
                    }
                }
                segment => resolved.push(segment),
            }
        }

        let mut out = String::with_capacity(value.len());
        if absolute {
            out.push('/');
        }
        out.push_str(&resolved.join("/"));
        if trailing_slash && !out.ends_with('/') {
            out.push('/');
        }
        Ok(out)
    }
}

impl Stage for NormalizationStage {
    fn apply(&self, input: Option<&str>) -> Result<Option<String>, SecurityError> {
        let Some(input) = input else { return Ok(None) };

        let mut value = if self.config.normalize_unicode() {
            input.nfc().collect::<String>()
        } else {
            input.to_string()
        };

        if self.component.is_path() {
            while value.contains("//") {
                value = value.replace("//", "/");
            }
        }

        if self.component.is_path() || self.component.is_parameter() {
            value = self.resolve_segments(input, &value)?;
        }

        Ok(Some(value))
    }
}
