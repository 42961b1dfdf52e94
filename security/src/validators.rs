use crate::{
    Component, Cookie, FailureKind, HttpBody, Pipeline, SecurityConfig, SecurityError,
    SecurityEventCounter, UrlParameter, stages::CookiePrefixStage,
};
use std::sync::Arc;

fn count_error(component: Component, count: usize, limit: usize) -> SecurityError {
    SecurityError::new(FailureKind::CountExceeded, component, "")
        .with_detail(format!("{count} elements exceed limit {limit}"))
}

/// Validates query parameters: a count limit over the whole set, then the
/// parameter-name and parameter-value pipelines per element.
#[derive(Debug)]
pub struct ParameterValidator {
    name_pipeline: Pipeline,
    value_pipeline: Pipeline,
    config: Arc<SecurityConfig>,
    counter: Arc<SecurityEventCounter>,
}

impl ParameterValidator {
    /// construct a validator over this configuration and counter
    pub fn new(config: Arc<SecurityConfig>, counter: Arc<SecurityEventCounter>) -> Self {
        Self {
            name_pipeline: Pipeline::parameter_name(config.clone(), counter.clone()),
            value_pipeline: Pipeline::parameter_value(config.clone(), counter.clone()),
            config,
            counter,
        }
    }

    /// Validate a single parameter, returning its sanitized form.
    ///
    /// # Errors
    ///
    /// The first violation from either pipeline; empty names are rejected
    /// as invalid input.
    pub fn validate(&self, parameter: &UrlParameter) -> Result<UrlParameter, SecurityError> {
        if parameter.name().is_empty() {
            return Err(self.report(
                SecurityError::new(FailureKind::InvalidInput, Component::ParameterName, "")
                    .with_detail("parameter name must not be empty"),
            ));
        }

        let name = self
            .name_pipeline
            .validate(Some(parameter.name()))?
            .unwrap_or_default();
        let value = self
            .value_pipeline
            .validate(Some(parameter.value()))?
            .unwrap_or_default();
        Ok(UrlParameter::new(name, value))
    }

    /// Validate a whole parameter set, enforcing the count limit first.
    ///
    /// # Errors
    ///
    /// [`FailureKind::CountExceeded`] when there are too many parameters,
    /// otherwise the first per-element violation.
    pub fn validate_all(
        &self,
        parameters: &[UrlParameter],
    ) -> Result<Vec<UrlParameter>, SecurityError> {
        let limit = self.config.max_parameter_count();
        if parameters.len() > limit {
            return Err(self.report(count_error(
                Component::ParameterName,
                parameters.len(),
                limit,
            )));
        }

        parameters.iter().map(|p| self.validate(p)).collect()
    }

    fn report(&self, error: SecurityError) -> SecurityError {
        self.counter.increment(error.kind());
        log::warn!("rejected parameter set: {error}");
        error
    }
}

/// Validates request headers: the configured allow/block sets and count
/// limit, then the header-name and header-value pipelines.
#[derive(Debug)]
pub struct HeaderValidator {
    name_pipeline: Pipeline,
    value_pipeline: Pipeline,
    config: Arc<SecurityConfig>,
    counter: Arc<SecurityEventCounter>,
}

impl HeaderValidator {
    /// construct a validator over this configuration and counter
    pub fn new(config: Arc<SecurityConfig>, counter: Arc<SecurityEventCounter>) -> Self {
        Self {
            name_pipeline: Pipeline::header_name(config.clone(), counter.clone()),
            value_pipeline: Pipeline::header_value(config.clone(), counter.clone()),
            config,
            counter,
        }
    }

    /// Validate one header, returning the sanitized `(name, value)` pair.
    ///
    /// # Errors
    ///
    /// Invalid input for empty or set-rejected names, otherwise the first
    /// pipeline violation.
    pub fn validate(&self, name: &str, value: &str) -> Result<(String, String), SecurityError> {
        if name.is_empty() {
            return Err(self.report(
                SecurityError::new(FailureKind::InvalidInput, Component::HeaderName, "")
                    .with_detail("header name must not be empty"),
            ));
        }

        if !self.config.is_header_name_permitted(name) {
            return Err(self.report(
                SecurityError::new(FailureKind::InvalidInput, Component::HeaderName, name)
                    .with_detail("header name is not permitted"),
            ));
        }

        let name = self
            .name_pipeline
            .validate(Some(name))?
            .unwrap_or_default();
        let value = self
            .value_pipeline
            .validate(Some(value))?
            .unwrap_or_default();
        Ok((name, value))
    }

    /// Validate a whole header set, enforcing the count limit first.
    ///
    /// # Errors
    ///
    /// [`FailureKind::CountExceeded`] when there are too many headers,
    /// otherwise the first per-element violation.
    pub fn validate_all(
        &self,
        headers: &[(String, String)],
    ) -> Result<Vec<(String, String)>, SecurityError> {
        let limit = self.config.max_header_count();
        if headers.len() > limit {
            return Err(self.report(count_error(Component::HeaderName, headers.len(), limit)));
        }

        headers
            .iter()
            .map(|(name, value)| self.validate(name, value))
            .collect()
    }

    fn report(&self, error: SecurityError) -> SecurityError {
        self.counter.increment(error.kind());
        log::warn!("rejected header: {error}");
        error
    }
}

/// Validates cookies: the `__Host-`/`__Secure-` prefix rules, the
/// cookie-name and cookie-value pipelines, and the configured `Secure`/
/// `HttpOnly` requirements.
#[derive(Debug)]
pub struct CookieValidator {
    name_pipeline: Pipeline,
    value_pipeline: Pipeline,
    prefix: CookiePrefixStage,
    config: Arc<SecurityConfig>,
    counter: Arc<SecurityEventCounter>,
}

impl CookieValidator {
    /// construct a validator over this configuration and counter
    pub fn new(config: Arc<SecurityConfig>, counter: Arc<SecurityEventCounter>) -> Self {
        Self {
            name_pipeline: Pipeline::cookie_name(config.clone(), counter.clone()),
            value_pipeline: Pipeline::cookie_value(config.clone(), counter.clone()),
            prefix: CookiePrefixStage::new(),
            config,
            counter,
        }
    }

    /// Validate one cookie, returning its sanitized form with the original
    /// attribute suffix.
    ///
    /// # Errors
    ///
    /// Prefix violations first, then pipeline violations, then the
    /// configured attribute requirements.
    pub fn validate(&self, cookie: &Cookie) -> Result<Cookie, SecurityError> {
        if let Err(error) = self.prefix.apply(cookie) {
            return Err(self.report(error));
        }

        let name = self
            .name_pipeline
            .validate(Some(cookie.name()))?
            .unwrap_or_default();
        let value = self
            .value_pipeline
            .validate(Some(cookie.value()))?
            .unwrap_or_default();

        if self.config.require_secure_cookies() && !cookie.is_secure() {
            return Err(self.report(
                SecurityError::new(FailureKind::InvalidInput, Component::CookieName, &name)
                    .with_detail("cookie requires the Secure attribute"),
            ));
        }

        if self.config.require_http_only_cookies() && !cookie.is_http_only() {
            return Err(self.report(
                SecurityError::new(FailureKind::InvalidInput, Component::CookieName, &name)
                    .with_detail("cookie requires the HttpOnly attribute"),
            ));
        }

        Ok(Cookie::new(name, value, cookie.attributes()))
    }

    /// Validate a whole cookie set, enforcing the count limit first.
    ///
    /// # Errors
    ///
    /// [`FailureKind::CountExceeded`] when there are too many cookies,
    /// otherwise the first per-element violation.
    pub fn validate_all(&self, cookies: &[Cookie]) -> Result<Vec<Cookie>, SecurityError> {
        let limit = self.config.max_cookie_count();
        if cookies.len() > limit {
            return Err(self.report(count_error(Component::CookieName, cookies.len(), limit)));
        }

        cookies.iter().map(|cookie| self.validate(cookie)).collect()
    }

    fn report(&self, error: SecurityError) -> SecurityError {
        self.counter.increment(error.kind());
        log::warn!("rejected cookie: {error}");
        error
    }
}

/// Validates request bodies: the configured content-type allow/block sets,
/// then the body pipeline over the content.
#[derive(Debug)]
pub struct BodyValidator {
    pipeline: Pipeline,
    config: Arc<SecurityConfig>,
    counter: Arc<SecurityEventCounter>,
}

impl BodyValidator {
    /// construct a validator over this configuration and counter
    pub fn new(config: Arc<SecurityConfig>, counter: Arc<SecurityEventCounter>) -> Self {
        Self {
            pipeline: Pipeline::body(config.clone(), counter.clone()),
            config,
            counter,
        }
    }

    /// Validate a body, returning the sanitized content (or `None` for an
    /// empty body).
    ///
    /// # Errors
    ///
    /// Invalid input for a rejected content type, otherwise the first
    /// pipeline violation.
    pub fn validate(&self, body: &HttpBody) -> Result<Option<String>, SecurityError> {
        if let Some(content_type) = body.content_type() {
            let essence = content_type
                .split(';')
                .next()
                .unwrap_or(content_type)
                .trim();
            if !self.config.is_content_type_permitted(essence) {
                let error =
                    SecurityError::new(FailureKind::InvalidInput, Component::Body, content_type)
                        .with_detail("content type is not permitted");
                self.counter.increment(error.kind());
                log::warn!("rejected body: {error}");
                return Err(error);
            }
        }

        self.pipeline.validate(Some(body.content()))
    }
}
