use crate::{
    Component, FailureKind, PatternFamily, SecurityConfig, SecurityError, SecurityEventCounter,
    patterns::PatternSet, stages::Stage,
};
use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;

/// Scans for known attack signatures.
///
/// Runs last, on fully decoded and canonicalized text, so signatures cannot
/// hide behind encoding. The first matching signature wins. When the
/// configuration demotes suspicious patterns from fatal, a match is still
/// counted and logged but the input passes through.
pub struct PatternStage {
    config: Arc<SecurityConfig>,
    component: Component,
    patterns: PatternSet,
    counter: Arc<SecurityEventCounter>,
}

impl Debug for PatternStage {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("PatternStage")
            .field("component", &self.component)
            .finish_non_exhaustive()
    }
}

impl PatternStage {
    /// construct a pattern stage for this component
    pub fn new(
        config: Arc<SecurityConfig>,
        component: Component,
        counter: Arc<SecurityEventCounter>,
    ) -> Self {
        Self {
            patterns: PatternSet::for_component(component),
            config,
            component,
            counter,
        }
    }

    fn find(&self, input: &str) -> Option<(PatternFamily, &'static str)> {
        if self.component.is_header() && input.contains(['\r', '\n']) {
            return Some((PatternFamily::HeaderInjection, "\\r/\\n"));
        }

        if self.config.case_sensitive_comparison() {
            self.patterns.first_match(input)
        } else {
            self.patterns.first_match(&input.to_ascii_lowercase())
        }
    }
}

impl Stage for PatternStage {
    fn apply(&self, input: Option<&str>) -> Result<Option<String>, SecurityError> {
        let Some(input) = input else { return Ok(None) };

        if let Some((family, literal)) = self.find(input) {
            if self.config.fail_on_suspicious_patterns() {
                return Err(SecurityError::new(
                    FailureKind::SuspiciousPattern,
                    self.component,
                    input,
                )
                .with_pattern_family(family)
                .with_detail(format!("{family} signature {literal:?}")));
            }

            self.counter.increment(FailureKind::SuspiciousPattern);
            log::debug!(
                "tolerated {family} signature {literal:?} in {} input",
                self.component
            );
        }

        Ok(Some(input.to_string()))
    }
}
