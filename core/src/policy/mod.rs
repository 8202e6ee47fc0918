//! Policy module
//!
//! Builds the role trust policy and the deploy policy, and evaluates
//! assume-role requests against a trust policy.

mod check;
mod compile;
pub mod deploy;
pub mod trust;

pub use check::{evaluate_trust, AssumeRoleRequest, CallerPrincipal, Decision, DenyReason};
pub use compile::WildcardPattern;
pub use deploy::{deploy_policy_document, deploy_statements};
pub use trust::{github_trust_policy, SubjectMatch};
