//! Path classification for the access gate.
//!
//! Patterns are either a literal path (`/`), which must match exactly, or a
//! literal prefix followed by `(.*)`, which matches that prefix with any suffix.

const WILDCARD_SUFFIX: &str = "(.*)";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoutePattern {
    Exact(String),
    Prefix(String),
}

impl RoutePattern {
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        match raw.strip_suffix(WILDCARD_SUFFIX) {
            Some(prefix) => RoutePattern::Prefix(prefix.to_string()),
            None => RoutePattern::Exact(raw.to_string()),
        }
    }

    pub fn matches(&self, path: &str) -> bool {
        match self {
            RoutePattern::Exact(exact) => path == exact,
            RoutePattern::Prefix(prefix) => path.starts_with(prefix.as_str()),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RouteMatcher {
    patterns: Vec<RoutePattern>,
}

impl RouteMatcher {
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Self {
        Self {
            patterns: patterns
                .iter()
                .map(|pattern| RoutePattern::parse(pattern.as_ref()))
                .collect(),
        }
    }

    pub fn matches(&self, path: &str) -> bool {
        self.patterns.iter().any(|pattern| pattern.matches(path))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    /// Skips the gate entirely; credentials are not inspected.
    Ignored,
    Public,
    Protected,
    Unlisted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Bypass,
    Proceed,
    RedirectToSignIn,
}

#[derive(Debug, Clone, Default)]
pub struct RouteAccessPolicy {
    protected: RouteMatcher,
    public: RouteMatcher,
    ignored: RouteMatcher,
}

impl RouteAccessPolicy {
    pub fn new(protected: RouteMatcher, public: RouteMatcher, ignored: RouteMatcher) -> Self {
        Self {
            protected,
            public,
            ignored,
        }
    }

    pub fn from_patterns<S: AsRef<str>>(protected: &[S], public: &[S], ignored: &[S]) -> Self {
        Self::new(
            RouteMatcher::new(protected),
            RouteMatcher::new(public),
            RouteMatcher::new(ignored),
        )
    }

    pub fn classify(&self, path: &str) -> RouteClass {
        if self.ignored.matches(path) {
            RouteClass::Ignored
        } else if self.public.matches(path) {
            RouteClass::Public
        } else if self.protected.matches(path) {
            RouteClass::Protected
        } else {
            RouteClass::Unlisted
        }
    }

    pub fn decide(&self, class: RouteClass, authenticated: bool) -> GateDecision {
        match class {
            RouteClass::Ignored => GateDecision::Bypass,
            RouteClass::Protected if !authenticated => GateDecision::RedirectToSignIn,
            RouteClass::Public | RouteClass::Protected | RouteClass::Unlisted => {
                GateDecision::Proceed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_policy() -> RouteAccessPolicy {
        RouteAccessPolicy::from_patterns(
            &[
                "/dashboard(.*)",
                "/schedule(.*)",
                "/meeting(.*)",
                "/recordings(.*)",
            ],
            &["/"],
            &["/api/webhooks(.*)", "/api/v1/health-check"],
        )
    }

    #[test]
    fn wildcard_patterns_match_any_suffix() {
        let pattern = RoutePattern::parse("/meeting(.*)");
        assert_eq!(pattern, RoutePattern::Prefix("/meeting".to_string()));
        assert!(pattern.matches("/meeting"));
        assert!(pattern.matches("/meeting/abc123"));
        assert!(pattern.matches("/meeting/abc123/lobby"));
        assert!(!pattern.matches("/meet"));
    }

    #[test]
    fn literal_patterns_match_exactly() {
        let pattern = RoutePattern::parse("/");
        assert!(pattern.matches("/"));
        assert!(!pattern.matches("/dashboard"));
    }

    #[test]
    fn protected_paths_redirect_without_session() {
        let policy = default_policy();
        for path in [
            "/dashboard",
            "/schedule/new",
            "/meeting/abc123",
            "/recordings",
        ] {
            let class = policy.classify(path);
            assert_eq!(class, RouteClass::Protected, "{path}");
            assert_eq!(
                policy.decide(class, false),
                GateDecision::RedirectToSignIn,
                "{path}"
            );
            assert_eq!(policy.decide(class, true), GateDecision::Proceed, "{path}");
        }
    }

    #[test]
    fn root_is_public_regardless_of_session() {
        let policy = default_policy();
        let class = policy.classify("/");
        assert_eq!(class, RouteClass::Public);
        assert_eq!(policy.decide(class, false), GateDecision::Proceed);
        assert_eq!(policy.decide(class, true), GateDecision::Proceed);
    }

    #[test]
    fn ignored_paths_bypass_even_when_also_protected() {
        let policy = RouteAccessPolicy::from_patterns(
            &["/api(.*)"],
            &["/"],
            &["/api/webhooks(.*)"],
        );
        let class = policy.classify("/api/webhooks/identity");
        assert_eq!(class, RouteClass::Ignored);
        assert_eq!(policy.decide(class, false), GateDecision::Bypass);
    }

    #[test]
    fn public_wins_over_protected() {
        let policy = RouteAccessPolicy::from_patterns(&["(.*)"], &["/"], &[]);
        assert_eq!(policy.classify("/"), RouteClass::Public);
        assert_eq!(policy.classify("/anything"), RouteClass::Protected);
    }

    #[test]
    fn unlisted_paths_proceed() {
        let policy = default_policy();
        let class = policy.classify("/api/v1/interviews");
        assert_eq!(class, RouteClass::Unlisted);
        assert_eq!(policy.decide(class, false), GateDecision::Proceed);
    }
}
