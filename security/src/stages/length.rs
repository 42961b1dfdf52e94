use crate::{Component, FailureKind, SecurityConfig, SecurityError, stages::Stage};
use std::sync::Arc;

/// Enforces the component's configured length limit.
///
/// Runs first in every pipeline so that oversized input is rejected before
/// any decoding or scanning work is spent on it. Lengths are counted in
/// characters, matching how the limits are documented.
#[derive(Debug, Clone)]
pub struct LengthStage {
    config: Arc<SecurityConfig>,
    component: Component,
}

impl LengthStage {
    /// construct a length stage for this component
    pub fn new(config: Arc<SecurityConfig>, component: Component) -> Self {
        Self { config, component }
    }
}

impl Stage for LengthStage {
    fn apply(&self, input: Option<&str>) -> Result<Option<String>, SecurityError> {
        let Some(input) = input else { return Ok(None) };

        let length = input.chars().count();
        let limit = self.config.max_length(self.component);
        if length > limit {
            return Err(
                SecurityError::new(FailureKind::LengthExceeded, self.component, input)
                    .with_detail(format!("length {length} exceeds limit {limit}")),
            );
        }

        Ok(Some(input.to_string()))
    }
}

#[cfg(test)]
mod test {
    use super::LengthStage;
    use crate::{Component, FailureKind, SecurityConfig, stages::Stage};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn stage() -> LengthStage {
        let config = SecurityConfig::builder()
            .max_parameter_value_length(8)
            .build()
            .unwrap();
        LengthStage::new(Arc::new(config), Component::ParameterValue)
    }

    #[test]
    fn under_and_at_limit_pass() {
        assert_eq!(stage().apply(Some("12345678")).unwrap(), Some("12345678".into()));
        assert_eq!(stage().apply(Some("")).unwrap(), Some("".into()));
        assert_eq!(stage().apply(None).unwrap(), None);
    }

    #[test]
    fn over_limit_fails_with_both_numbers() {
        let error = stage().apply(Some("123456789")).unwrap_err();
        assert_eq!(error.kind(), FailureKind::LengthExceeded);
        assert_eq!(error.detail(), Some("length 9 exceeds limit 8"));
    }

    #[test]
    fn characters_not_bytes() {
        // four characters, twelve bytes
        assert!(stage().apply(Some("\u{65e5}\u{672c}\u{8a9e}\u{3002}")).is_ok());
    }
}
