use tracing::debug;

use super::rule::{AccessRule, Action};
use crate::claims::UserClaims;

/// Outcome of scoring one rule against one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The rule matched and its action is allow.
    Permit,
    /// The rule matched and its action is deny.
    Deny,
    /// The rule neither grants nor denies; at least one criterion failed.
    Abstain,
}

impl Verdict {
    pub fn is_decisive(&self) -> bool {
        !matches!(self, Verdict::Abstain)
    }
}

/// Request attributes consulted when method/path filtering is enabled.
///
/// Entries left as `None` are treated as non-restrictive: a rule with a
/// method or path filter still matches a context that carries no such
/// entry. Callers enforcing request filters must populate both fields, or
/// the filters are silently not applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    pub method: Option<String>,
    pub path: Option<String>,
}

impl RequestContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }
}

/// Per-call evaluation options.
///
/// Method/path filters only take effect when `filter_request` is set and a
/// request context is attached; otherwise they are bypassed entirely.
#[derive(Debug, Clone, Default)]
pub struct EvaluationOptions {
    pub filter_request: bool,
    pub request: Option<RequestContext>,
}

impl EvaluationOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options with request filtering enabled for the given context.
    pub fn filtered(request: RequestContext) -> Self {
        Self {
            filter_request: true,
            request: Some(request),
        }
    }
}

impl AccessRule {
    /// Score this rule against verified claims and optional request
    /// metadata.
    ///
    /// Pure and synchronous; never fails. A rule whose claim, method, or
    /// path criteria are not met abstains rather than denying.
    pub fn evaluate(&self, claims: &UserClaims, options: Option<&EvaluationOptions>) -> Verdict {
        if !self.claim().matches(self.values(), claims) {
            debug!(
                subject = %claims.subject,
                claim = %self.claim(),
                "claim criteria not met, abstaining"
            );
            return Verdict::Abstain;
        }

        let request = options
            .filter(|opts| opts.filter_request)
            .and_then(|opts| opts.request.as_ref());

        if let Some(request) = request {
            if !self.method_matches(request) {
                debug!(
                    subject = %claims.subject,
                    method = request.method.as_deref().unwrap_or_default(),
                    "method filter not met, abstaining"
                );
                return Verdict::Abstain;
            }
            if !self.path_matches(request) {
                debug!(
                    subject = %claims.subject,
                    path = request.path.as_deref().unwrap_or_default(),
                    "path filter not met, abstaining"
                );
                return Verdict::Abstain;
            }
        }

        debug!(
            subject = %claims.subject,
            action = %self.action(),
            "rule matched"
        );
        match self.action() {
            Action::Allow => Verdict::Permit,
            Action::Deny => Verdict::Deny,
        }
    }

    fn method_matches(&self, request: &RequestContext) -> bool {
        if self.methods().is_empty() {
            return true;
        }
        match request.method.as_deref() {
            // exact comparison against the normalized upper-case tokens
            Some(method) => self.methods().iter().any(|m| m.as_str() == method),
            None => true,
        }
    }

    fn path_matches(&self, request: &RequestContext) -> bool {
        let Some(filter) = self.path() else {
            return true;
        };
        match request.path.as_deref() {
            Some(path) => path.contains(filter),
            None => true,
        }
    }
}
