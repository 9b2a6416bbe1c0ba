//! Access control - rule model and three-state evaluation
//!
//! This module implements claims-based access lists:
//! - allow/deny rules keyed on identity claims, with optional HTTP
//!   method/path filters
//! - a pure, never-failing evaluator producing `Permit`/`Deny`/`Abstain`
//! - ordered rule lists combined under an explicitly configured strategy
//! - serde-deserializable configuration shapes for both

mod access_list;
mod config;
mod evaluator;
mod rule;

pub use access_list::{AccessList, CombinationStrategy};
pub use config::{AccessListConfig, RuleConfig};
pub use evaluator::{EvaluationOptions, RequestContext, Verdict};
pub use rule::{AccessListEntry, AccessRule, Action, ClaimKind, HttpMethod, WILDCARD_VALUES};

/// Well-known role names
pub mod roles {
    pub const ANONYMOUS: &str = "anonymous";
    pub const GUEST: &str = "guest";
    pub const ADMIN: &str = "admin";
}
