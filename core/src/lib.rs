//! gha-oidc-core: GitHub Actions OIDC setup stack
//!
//! Declares an IAM OpenID Connect provider for GitHub Actions, a role that
//! trusts it through `sts:AssumeRoleWithWebIdentity`, and a deploy policy
//! scoped to the CDK bootstrap resources of one account and region. The
//! stack is synthesized into a CloudFormation template; nothing here talks to
//! AWS.
//!
//! The crate never reads the process environment. Callers resolve the
//! deployment target through the `Environment` trait.

pub mod config;
pub mod error;
pub mod expr;
pub mod iam;
pub mod platform;
pub mod policy;
pub mod stack;
pub mod template;

#[cfg(test)]
pub mod test_support;

pub use config::StackEnv;
pub use error::{Result, SynthError};
pub use stack::{GitHubActionsSetupStack, GitHubActionsSetupStackProps, StackProps};
pub use template::{synth, OutputFormat, Template};
