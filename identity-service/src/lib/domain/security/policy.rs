use crate::domain::credential::errors::AuthError;
use crate::domain::security::context::SecurityContext;

/// Paths reachable without a token when no table is configured.
pub const DEFAULT_PUBLIC_PATHS: [&str; 3] = ["/auth/**", "/swagger-ui/**", "/v3/api-docs/**"];

/// Whether a route needs an authenticated identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    Protected,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    /// `*`: exactly one segment
    Single,
    /// `**`: zero or more segments
    Rest,
}

/// Path pattern in the `/auth/**` style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePattern {
    raw: String,
    segments: Vec<Segment>,
}

impl RoutePattern {
    pub fn new(pattern: &str) -> Self {
        let segments = split_path(pattern)
            .map(|segment| match segment {
                "**" => Segment::Rest,
                "*" => Segment::Single,
                literal => Segment::Literal(literal.to_string()),
            })
            .collect();

        Self {
            raw: pattern.to_string(),
            segments,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn matches(&self, path: &str) -> bool {
        let path: Vec<&str> = split_path(path).collect();
        matches_segments(&self.segments, &path)
    }
}

fn split_path(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|segment| !segment.is_empty())
}

fn matches_segments(pattern: &[Segment], path: &[&str]) -> bool {
    match pattern.split_first() {
        None => path.is_empty(),
        Some((Segment::Rest, rest)) => {
            (0..=path.len()).any(|skip| matches_segments(rest, &path[skip..]))
        }
        Some((Segment::Single, rest)) => !path.is_empty() && matches_segments(rest, &path[1..]),
        Some((Segment::Literal(literal), rest)) => {
            path.first().is_some_and(|segment| *segment == literal.as_str())
                && matches_segments(rest, &path[1..])
        }
    }
}

#[derive(Debug, Clone)]
pub struct AccessRule {
    pub pattern: RoutePattern,
    pub access: Access,
}

/// Static route table deciding which requests need an identity.
///
/// Rules are checked in order and the first match wins. Anything that
/// matches no rule is protected.
#[derive(Debug, Clone)]
pub struct AccessPolicy {
    rules: Vec<AccessRule>,
}

impl AccessPolicy {
    pub fn new(rules: Vec<AccessRule>) -> Self {
        Self { rules }
    }

    /// Policy where the given patterns are public and everything else protected.
    pub fn with_public_paths<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::new(
            patterns
                .into_iter()
                .map(|pattern| AccessRule {
                    pattern: RoutePattern::new(pattern.as_ref()),
                    access: Access::Public,
                })
                .collect(),
        )
    }

    pub fn classify(&self, path: &str) -> Access {
        self.rules
            .iter()
            .find(|rule| rule.pattern.matches(path))
            .map_or(Access::Protected, |rule| rule.access)
    }

    /// Decide whether a request for `path` may proceed.
    ///
    /// # Errors
    /// * `AuthenticationRequired` - Path is protected and no identity was resolved
    pub fn check(&self, path: &str, context: Option<&SecurityContext>) -> Result<(), AuthError> {
        match (self.classify(path), context) {
            (Access::Public, _) | (Access::Protected, Some(_)) => Ok(()),
            (Access::Protected, None) => Err(AuthError::AuthenticationRequired),
        }
    }
}

impl Default for AccessPolicy {
    fn default() -> Self {
        Self::with_public_paths(DEFAULT_PUBLIC_PATHS)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::domain::credential::models::CredentialId;
    use crate::domain::credential::models::Role;
    use crate::domain::credential::models::Username;
    use crate::domain::security::context::Principal;

    #[test]
    fn test_pattern_matching() {
        let rest = RoutePattern::new("/auth/**");
        assert!(rest.matches("/auth"));
        assert!(rest.matches("/auth/login"));
        assert!(rest.matches("/auth/a/b/c"));
        assert!(!rest.matches("/authx"));
        assert!(!rest.matches("/api/auth/login"));

        let single = RoutePattern::new("/api/*/public");
        assert!(single.matches("/api/surveys/public"));
        assert!(!single.matches("/api/public"));
        assert!(!single.matches("/api/a/b/public"));

        let exact = RoutePattern::new("/health");
        assert!(exact.matches("/health"));
        assert!(exact.matches("/health/"));
        assert!(!exact.matches("/health/live"));
    }

    #[test]
    fn test_default_table() {
        let policy = AccessPolicy::default();

        assert_eq!(policy.classify("/auth/login"), Access::Public);
        assert_eq!(policy.classify("/auth/register"), Access::Public);
        assert_eq!(policy.classify("/swagger-ui/index.html"), Access::Public);
        assert_eq!(policy.classify("/v3/api-docs"), Access::Public);
        assert_eq!(policy.classify("/api/me"), Access::Protected);
        assert_eq!(policy.classify("/api/surveys/1"), Access::Protected);
        assert_eq!(policy.classify("/"), Access::Protected);
    }

    #[test]
    fn test_first_match_wins() {
        let policy = AccessPolicy::new(vec![
            AccessRule {
                pattern: RoutePattern::new("/auth/admin/**"),
                access: Access::Protected,
            },
            AccessRule {
                pattern: RoutePattern::new("/auth/**"),
                access: Access::Public,
            },
        ]);

        assert_eq!(policy.classify("/auth/admin/users"), Access::Protected);
        assert_eq!(policy.classify("/auth/login"), Access::Public);
    }

    #[test]
    fn test_check() {
        let policy = AccessPolicy::default();
        let context = SecurityContext::new(
            Principal {
                id: CredentialId::new(),
                username: Username::new("alice".to_string()).unwrap(),
            },
            BTreeSet::from([Role::User]),
        );

        assert!(policy.check("/auth/login", None).is_ok());
        assert!(policy.check("/api/me", Some(&context)).is_ok());
        assert!(matches!(
            policy.check("/api/me", None),
            Err(AuthError::AuthenticationRequired)
        ));
    }
}
