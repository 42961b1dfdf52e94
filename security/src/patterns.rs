use crate::{Component, PatternFamily};
use memchr::memmem::Finder;

const XSS: &[&str] = &[
    "<script",
    "javascript:",
    "onerror=",
    "onload=",
    "onclick=",
    "<svg",
    "<iframe",
    "<img",
    "srcdoc=",
];

const SQLI: &[&str] = &[
    "' or '1'='1",
    "union select",
    "--",
    "/*",
    ";drop table",
    "xp_cmdshell",
    "information_schema",
];

// only meaningful where `;` and friends have no legitimate syntax, i.e.
// paths and parameters; header values may contain `;` routinely
const COMMAND_INJECTION: &[&str] = &[";", "&&", "||", "`", "$("];

const LDAP: &[&str] = &["*)(uid=*", "*)(cn=*", "*)(|", "*)(&"];

const PROTOCOL_HANDLER: &[&str] = &["javascript:", "data:", "vbscript:", "file:"];

const TEMPLATE: &[&str] = &["{{", "${", "<%", "#{"];

pub(crate) struct CompiledPattern {
    family: PatternFamily,
    literal: &'static str,
    finder: Finder<'static>,
}

/// The attack-signature automaton for one component: a fixed set of
/// lowercase literals with precompiled searchers, scanned in declaration
/// order so the reported family is stable.
pub(crate) struct PatternSet {
    patterns: Vec<CompiledPattern>,
}

impl PatternSet {
    pub(crate) fn for_component(component: Component) -> Self {
        let mut families: Vec<(PatternFamily, &[&str])> = vec![
            (PatternFamily::Xss, XSS),
            (PatternFamily::Sqli, SQLI),
        ];

        if component.is_path() || component.is_parameter() {
            families.push((PatternFamily::CommandInjection, COMMAND_INJECTION));
        }

        families.push((PatternFamily::Ldap, LDAP));
        families.push((PatternFamily::ProtocolHandler, PROTOCOL_HANDLER));
        families.push((PatternFamily::Template, TEMPLATE));

        let patterns = families
            .into_iter()
            .flat_map(|(family, literals)| {
                literals.iter().copied().map(move |literal| CompiledPattern {
                    family,
                    literal,
                    finder: Finder::new(literal.as_bytes()),
                })
            })
            .collect();

        Self { patterns }
    }

    /// the first matching pattern in `haystack`, which the caller has
    /// already lowercased unless comparisons are case sensitive
    pub(crate) fn first_match(&self, haystack: &str) -> Option<(PatternFamily, &'static str)> {
        self.patterns
            .iter()
            .find(|pattern| pattern.finder.find(haystack.as_bytes()).is_some())
            .map(|pattern| (pattern.family, pattern.literal))
    }
}

#[cfg(test)]
mod test {
    use super::PatternSet;
    use crate::{Component, PatternFamily};
    use pretty_assertions::assert_eq;

    #[test]
    fn family_attribution() {
        let body = PatternSet::for_component(Component::Body);
        assert_eq!(
            body.first_match("<script>alert(1)</script>"),
            Some((PatternFamily::Xss, "<script"))
        );
        assert_eq!(
            body.first_match("1 union select * from users"),
            Some((PatternFamily::Sqli, "union select"))
        );
        assert_eq!(
            body.first_match("hello {{payload}}"),
            Some((PatternFamily::Template, "{{"))
        );
        assert_eq!(body.first_match("an ordinary sentence"), None);
    }

    #[test]
    fn command_injection_is_scoped() {
        let path = PatternSet::for_component(Component::UrlPath);
        let header = PatternSet::for_component(Component::HeaderValue);

        assert_eq!(
            path.first_match("/a;rm -rf"),
            Some((PatternFamily::CommandInjection, ";"))
        );
        assert_eq!(header.first_match("text/html;q=0.9"), None);
    }

    #[test]
    fn xss_wins_over_protocol_handler() {
        let body = PatternSet::for_component(Component::Body);
        assert_eq!(
            body.first_match("javascript:alert(1)"),
            Some((PatternFamily::Xss, "javascript:"))
        );
    }
}
