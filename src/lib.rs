pub mod authz;
pub mod claims;
pub mod errors;

// Re-export the types most callers touch
pub use authz::{
    AccessList, AccessListConfig, AccessListEntry, AccessRule, CombinationStrategy,
    EvaluationOptions, RequestContext, Verdict,
};
pub use claims::UserClaims;
pub use errors::{AclError, AclResult};
