use crate::{
    Component, SecurityConfig, SecurityError, SecurityEventCounter,
    stages::{CharacterStage, DecodingStage, LengthStage, NormalizationStage, PatternStage, Stage},
};
use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;

/// An ordered composition of validation [stages](crate::stages) bound to
/// one [`Component`].
///
/// Validation runs the stages in sequence, feeding each stage the previous
/// stage's output. The first violation stops the pipeline: the error is
/// re-attributed to this pipeline's component, counted, logged, and
/// returned. Absent and empty input short-circuit to `None` without running
/// any stage.
///
/// Pipelines are immutable and freely shareable across threads.
pub struct Pipeline {
    component: Component,
    stages: Vec<Box<dyn Stage>>,
    counter: Arc<SecurityEventCounter>,
}

impl Debug for Pipeline {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("component", &self.component)
            .field("stages", &self.stages.len())
            .finish_non_exhaustive()
    }
}

impl Pipeline {
    fn new(component: Component, stages: Vec<Box<dyn Stage>>, counter: Arc<SecurityEventCounter>) -> Self {
        Self {
            component,
            stages,
            counter,
        }
    }

    /// Length → Decoding → Character → Normalization → Pattern, for url
    /// paths.
    pub fn url_path(config: Arc<SecurityConfig>, counter: Arc<SecurityEventCounter>) -> Self {
        Self::decoded(Component::UrlPath, config, counter)
    }

    /// Length → Decoding → Character → Normalization → Pattern, for
    /// parameter names.
    pub fn parameter_name(config: Arc<SecurityConfig>, counter: Arc<SecurityEventCounter>) -> Self {
        Self::decoded(Component::ParameterName, config, counter)
    }

    /// Length → Decoding → Character → Normalization → Pattern, for
    /// parameter values.
    pub fn parameter_value(
        config: Arc<SecurityConfig>,
        counter: Arc<SecurityEventCounter>,
    ) -> Self {
        Self::decoded(Component::ParameterValue, config, counter)
    }

    /// Length → Character → Normalization → Pattern, for header names.
    /// Header text is never percent-decoded.
    pub fn header_name(config: Arc<SecurityConfig>, counter: Arc<SecurityEventCounter>) -> Self {
        Self::undecoded(Component::HeaderName, config, counter)
    }

    /// Length → Character → Normalization → Pattern, for header values.
    /// Header text is never percent-decoded.
    pub fn header_value(config: Arc<SecurityConfig>, counter: Arc<SecurityEventCounter>) -> Self {
        Self::undecoded(Component::HeaderValue, config, counter)
    }

    /// Length → Character → Pattern, for cookie names.
    pub fn cookie_name(config: Arc<SecurityConfig>, counter: Arc<SecurityEventCounter>) -> Self {
        Self::flat(Component::CookieName, config, counter)
    }

    /// Length → Character → Pattern, for cookie values.
    pub fn cookie_value(config: Arc<SecurityConfig>, counter: Arc<SecurityEventCounter>) -> Self {
        Self::flat(Component::CookieValue, config, counter)
    }

    /// Length → Character → Pattern, for bodies. Bodies are neither decoded
    /// nor normalized.
    pub fn body(config: Arc<SecurityConfig>, counter: Arc<SecurityEventCounter>) -> Self {
        Self::flat(Component::Body, config, counter)
    }

    fn decoded(
        component: Component,
        config: Arc<SecurityConfig>,
        counter: Arc<SecurityEventCounter>,
    ) -> Self {
        let stages: Vec<Box<dyn Stage>> = vec![
            Box::new(LengthStage::new(config.clone(), component)),
            Box::new(DecodingStage::new(config.clone(), component)),
            Box::new(CharacterStage::new(config.clone(), component)),
            Box::new(NormalizationStage::new(config.clone(), component)),
            Box::new(PatternStage::new(config, component, counter.clone())),
        ];
        Self::new(component, stages, counter)
    }

    fn undecoded(
        component: Component,
        config: Arc<SecurityConfig>,
        counter: Arc<SecurityEventCounter>,
    ) -> Self {
        let stages: Vec<Box<dyn Stage>> = vec![
            Box::new(LengthStage::new(config.clone(), component)),
            Box::new(CharacterStage::new(config.clone(), component)),
            Box::new(NormalizationStage::new(config.clone(), component)),
            Box::new(PatternStage::new(config, component, counter.clone())),
        ];
        Self::new(component, stages, counter)
    }

    fn flat(
        component: Component,
        config: Arc<SecurityConfig>,
        counter: Arc<SecurityEventCounter>,
    ) -> Self {
        let stages: Vec<Box<dyn Stage>> = vec![
            Box::new(LengthStage::new(config.clone(), component)),
            Box::new(CharacterStage::new(config.clone(), component)),
            Box::new(PatternStage::new(config, component, counter.clone())),
        ];
        Self::new(component, stages, counter)
    }

    /// the component this pipeline is bound to
    pub fn component(&self) -> Component {
        self.component
    }

    /// the event counter shared by this pipeline
    pub fn counter(&self) -> &Arc<SecurityEventCounter> {
        &self.counter
    }

    /// Validate one input.
    ///
    /// Returns the sanitized (decoded, canonicalized) text, `None` for
    /// absent or empty input, or the first violation.
    ///
    /// # Errors
    ///
    /// The first [`SecurityError`] any stage reports, attributed to this
    /// pipeline's component and counted.
    pub fn validate(&self, input: Option<&str>) -> Result<Option<String>, SecurityError> {
        let Some(input) = input else { return Ok(None) };
        if input.is_empty() {
            return Ok(None);
        }

        let mut current = input.to_string();
        for stage in &self.stages {
            match stage.apply(Some(&current)) {
                Ok(Some(next)) => current = next,
                Ok(None) => return Ok(None),
                Err(error) => {
                    let error = error.rewrap(self.component);
                    self.counter.increment(error.kind());
                    log::warn!("rejected {} input: {error}", self.component);
                    return Err(error);
                }
            }
        }

        Ok(Some(current))
    }
}
