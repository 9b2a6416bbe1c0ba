use thiserror::Error;

pub type AclResult<T> = Result<T, AclError>;

/// Configuration-time failures raised while building or loading access
/// list rules. Evaluation itself never fails; an inapplicable rule
/// abstains instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AclError {
    #[error("empty access list action")]
    EmptyAction,
    #[error("unsupported access list action: {0}")]
    UnsupportedAction(String),
    #[error("empty access list claim")]
    EmptyClaim,
    #[error("access list does not support {0} claim, only roles")]
    UnsupportedClaim(String),
    #[error("empty http method")]
    EmptyMethod,
    #[error("unsupported http method: {0}")]
    UnsupportedMethod(String),
    #[error("empty http path")]
    EmptyPath,
    #[error("empty claim value")]
    EmptyValue,
    #[error("access list entry has no values")]
    NoValues,
}
