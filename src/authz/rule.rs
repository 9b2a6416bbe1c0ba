use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::claims::UserClaims;
use crate::errors::{AclError, AclResult};

/// Value tokens that match any role.
pub const WILDCARD_VALUES: [&str; 2] = ["*", "any"];

fn is_wildcard(value: &str) -> bool {
    WILDCARD_VALUES.contains(&value)
}

/// What a matched rule does with the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Allow,
    Deny,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Allow => "allow",
            Action::Deny => "deny",
        }
    }
}

impl FromStr for Action {
    type Err = AclError;

    fn from_str(s: &str) -> AclResult<Self> {
        match s {
            "" => Err(AclError::EmptyAction),
            "allow" => Ok(Action::Allow),
            "deny" => Ok(Action::Deny),
            other => Err(AclError::UnsupportedAction(other.to_string())),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// HTTP methods a rule may filter on. Tokens are accepted case-insensitively
/// and normalized to the upper-case form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl FromStr for HttpMethod {
    type Err = AclError;

    fn from_str(s: &str) -> AclResult<Self> {
        if s.is_empty() {
            return Err(AclError::EmptyMethod);
        }
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "PATCH" => Ok(HttpMethod::Patch),
            "DELETE" => Ok(HttpMethod::Delete),
            other => Err(AclError::UnsupportedMethod(other.to_string())),
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Claim kinds a rule can key on.
///
/// Each kind owns its matcher, so adding a kind extends this enum without
/// touching the evaluator's control flow.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClaimKind {
    Roles,
}

impl ClaimKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimKind::Roles => "roles",
        }
    }

    /// Match a rule's value list against the claims record. False when the
    /// claims carry no data for this kind; wildcards only match a non-empty
    /// attribute set.
    pub(crate) fn matches(&self, values: &[String], claims: &UserClaims) -> bool {
        match self {
            ClaimKind::Roles => {
                if claims.roles.is_empty() {
                    return false;
                }
                claims
                    .roles
                    .iter()
                    .any(|role| values.iter().any(|value| is_wildcard(value) || value == role))
            }
        }
    }
}

impl FromStr for ClaimKind {
    type Err = AclError;

    fn from_str(s: &str) -> AclResult<Self> {
        match s {
            "" => Err(AclError::EmptyClaim),
            "roles" => Ok(ClaimKind::Roles),
            other => Err(AclError::UnsupportedClaim(other.to_string())),
        }
    }
}

impl fmt::Display for ClaimKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Access list entry under construction.
///
/// Every setter validates its argument eagerly and leaves the entry
/// unchanged on failure. Call [`build`](Self::build) to seal the entry into
/// an immutable [`AccessRule`]; entries themselves never reach the
/// evaluator.
#[derive(Debug, Clone, Default)]
pub struct AccessListEntry {
    action: Option<Action>,
    claim: Option<ClaimKind>,
    values: Vec<String>,
    methods: Vec<HttpMethod>,
    path: Option<String>,
}

impl AccessListEntry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the action to allow. Cannot fail.
    pub fn allow(&mut self) {
        self.action = Some(Action::Allow);
    }

    /// Set the action to deny. Cannot fail.
    pub fn deny(&mut self) {
        self.action = Some(Action::Deny);
    }

    pub fn set_action(&mut self, value: &str) -> AclResult<()> {
        self.action = Some(value.parse()?);
        Ok(())
    }

    pub fn set_claim(&mut self, value: &str) -> AclResult<()> {
        self.claim = Some(value.parse()?);
        Ok(())
    }

    /// Append an HTTP method filter. Duplicates are kept in insertion order.
    pub fn add_method(&mut self, value: &str) -> AclResult<()> {
        self.methods.push(value.parse()?);
        Ok(())
    }

    /// Set the request path substring filter.
    pub fn set_path(&mut self, value: &str) -> AclResult<()> {
        if value.is_empty() {
            return Err(AclError::EmptyPath);
        }
        self.path = Some(value.to_string());
        Ok(())
    }

    /// Append a single claim value (role name or wildcard).
    pub fn add_value(&mut self, value: &str) -> AclResult<()> {
        if value.is_empty() {
            return Err(AclError::EmptyValue);
        }
        self.values.push(value.to_string());
        Ok(())
    }

    /// Replace the value list wholesale.
    pub fn set_values(&mut self, values: Vec<String>) -> AclResult<()> {
        if values.is_empty() {
            return Err(AclError::EmptyValue);
        }
        self.values = values;
        Ok(())
    }

    pub fn action(&self) -> Option<Action> {
        self.action
    }

    pub fn claim(&self) -> Option<ClaimKind> {
        self.claim
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Coarse final gate before an entry enters service. Field-level
    /// invariants (method tokens, non-empty path) are already enforced by
    /// the setters and are not re-checked here.
    pub fn validate(&self) -> AclResult<()> {
        if self.action.is_none() {
            return Err(AclError::EmptyAction);
        }
        if self.claim.is_none() {
            return Err(AclError::EmptyClaim);
        }
        if self.values.is_empty() {
            return Err(AclError::NoValues);
        }
        Ok(())
    }

    /// Validate and seal the entry into an immutable rule.
    pub fn build(self) -> AclResult<AccessRule> {
        let action = self.action.ok_or(AclError::EmptyAction)?;
        let claim = self.claim.ok_or(AclError::EmptyClaim)?;
        if self.values.is_empty() {
            return Err(AclError::NoValues);
        }
        Ok(AccessRule {
            action,
            claim,
            values: self.values,
            methods: self.methods,
            path: self.path,
        })
    }
}

/// Immutable allow/deny rule, produced by [`AccessListEntry::build`].
///
/// Safe to share across threads and evaluate concurrently; evaluation never
/// mutates it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessRule {
    action: Action,
    claim: ClaimKind,
    values: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    methods: Vec<HttpMethod>,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<String>,
}

impl AccessRule {
    pub fn action(&self) -> Action {
        self.action
    }

    pub fn claim(&self) -> ClaimKind {
        self.claim
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn methods(&self) -> &[HttpMethod] {
        &self.methods
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// The value list as one space-joined string.
    pub fn joined_values(&self) -> String {
        self.values.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_action_accepts_only_allow_and_deny() {
        let mut entry = AccessListEntry::new();
        assert_eq!(entry.set_action(""), Err(AclError::EmptyAction));
        assert_eq!(
            entry.set_action("audit"),
            Err(AclError::UnsupportedAction("audit".to_string()))
        );
        assert_eq!(entry.action(), None, "failed setter must not change state");

        entry.set_action("allow").expect("allow accepted");
        assert_eq!(entry.action(), Some(Action::Allow));
        entry.set_action("deny").expect("deny accepted");
        assert_eq!(entry.action(), Some(Action::Deny));
    }

    #[test]
    fn set_claim_supports_roles_only() {
        let mut entry = AccessListEntry::new();
        assert_eq!(entry.set_claim(""), Err(AclError::EmptyClaim));
        assert_eq!(
            entry.set_claim("scopes"),
            Err(AclError::UnsupportedClaim("scopes".to_string()))
        );
        entry.set_claim("roles").expect("roles accepted");
        assert_eq!(entry.claim(), Some(ClaimKind::Roles));
    }

    #[test]
    fn add_method_normalizes_and_rejects_unknown_verbs() {
        let mut entry = AccessListEntry::new();
        assert_eq!(entry.add_method(""), Err(AclError::EmptyMethod));
        assert_eq!(
            entry.add_method("trace"),
            Err(AclError::UnsupportedMethod("TRACE".to_string()))
        );

        entry.add_method("get").expect("lower-case accepted");
        entry.add_method("Post").expect("mixed-case accepted");
        entry.add_method("GET").expect("duplicate accepted");
        assert_eq!(
            entry.methods,
            vec![HttpMethod::Get, HttpMethod::Post, HttpMethod::Get],
            "insertion order and duplicates preserved"
        );
    }

    #[test]
    fn set_path_rejects_empty() {
        let mut entry = AccessListEntry::new();
        assert_eq!(entry.set_path(""), Err(AclError::EmptyPath));
        entry.set_path("/internal/dashboard").expect("path accepted");
    }

    #[test]
    fn value_setters_reject_empty_input() {
        let mut entry = AccessListEntry::new();
        assert_eq!(entry.add_value(""), Err(AclError::EmptyValue));
        assert_eq!(entry.set_values(Vec::new()), Err(AclError::EmptyValue));

        entry.add_value("guest").expect("value accepted");
        entry
            .set_values(vec!["admin".to_string(), "viewer".to_string()])
            .expect("bulk form accepted");
        assert_eq!(entry.values(), ["admin", "viewer"], "bulk form replaces");
    }

    #[test]
    fn validate_checks_action_then_claim_then_values() {
        let mut entry = AccessListEntry::new();
        assert_eq!(entry.validate(), Err(AclError::EmptyAction));

        entry.allow();
        assert_eq!(entry.validate(), Err(AclError::EmptyClaim));

        entry.set_claim("roles").unwrap();
        assert_eq!(entry.validate(), Err(AclError::NoValues));

        entry.add_value("guest").unwrap();
        assert_eq!(entry.validate(), Ok(()));
    }

    #[test]
    fn values_missing_fails_validation_regardless_of_other_fields() {
        let mut entry = AccessListEntry::new();
        entry.deny();
        entry.set_claim("roles").unwrap();
        entry.add_method("delete").unwrap();
        entry.set_path("/api").unwrap();
        assert_eq!(entry.validate(), Err(AclError::NoValues));
        assert_eq!(entry.build(), Err(AclError::NoValues));
    }

    #[test]
    fn build_seals_a_complete_entry() {
        let mut entry = AccessListEntry::new();
        entry.allow();
        entry.set_claim("roles").unwrap();
        entry.add_value("guest").unwrap();
        entry.add_method("put").unwrap();
        entry.set_path("/app").unwrap();

        let rule = entry.build().expect("entry is complete");
        assert_eq!(rule.action(), Action::Allow);
        assert_eq!(rule.claim(), ClaimKind::Roles);
        assert_eq!(rule.values(), ["guest"]);
        assert_eq!(rule.methods(), [HttpMethod::Put]);
        assert_eq!(rule.path(), Some("/app"));
        assert_eq!(rule.joined_values(), "guest");
    }
}
