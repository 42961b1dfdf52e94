/*!
Fail-secure validation of http request components.

Inbound request components (url paths, query parameters, headers, cookies,
bodies) arrive as already-assembled strings and pass through a [`Pipeline`]
of [stages](crate::stages): each stage either emits a (possibly rewritten)
string for the next stage or stops the pipeline with a [`SecurityError`].
The first violation wins; there is no best-effort repair.

```
use std::sync::Arc;
use parapet_security::{Pipeline, SecurityConfig, SecurityEventCounter};

let config = Arc::new(SecurityConfig::default());
let counter = Arc::new(SecurityEventCounter::new());
let path = Pipeline::url_path(config, counter);

assert_eq!(path.validate(Some("/api/a/../b")).unwrap(), Some("/api/b".into()));
assert!(path.validate(Some("/api/../../etc/passwd")).is_err());
```

Validators are immutable after construction and freely shareable across
threads; the only shared mutable state is the [`SecurityEventCounter`],
which is wait-free.
*/
#![forbid(unsafe_code)]
#![deny(
    rustdoc::missing_crate_level_docs,
    missing_debug_implementations,
    missing_docs,
    nonstandard_style,
    unused_qualifications
)]

mod component;
pub use component::Component;

mod failure;
pub use failure::{FailureKind, PatternFamily};

mod error;
pub use error::SecurityError;

mod config;
pub use config::{ConfigError, SecurityConfig, SecurityConfigBuilder};

mod counter;
pub use counter::SecurityEventCounter;

pub mod attributes;

mod cookie;
pub use cookie::Cookie;

mod http_body;
pub use http_body::HttpBody;

mod parameter;
pub use parameter::UrlParameter;

mod patterns;

pub mod stages;

mod pipeline;
pub use pipeline::Pipeline;

mod validators;
pub use validators::{BodyValidator, CookieValidator, HeaderValidator, ParameterValidator};
