//! Fixed identifiers and deployment environment resolution

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Result, SynthError};
use crate::platform::Environment;

/// GitHub Actions OIDC token issuer
pub const GITHUB_OIDC_ISSUER: &str = "https://token.actions.githubusercontent.com";

/// Audience GitHub Actions requests when configured for AWS
pub const STS_AUDIENCE: &str = "sts.amazonaws.com";

/// Token claim carrying the workflow subject (`repo:<owner>/<repo>:...`)
pub const SUBJECT_CLAIM_KEY: &str = "token.actions.githubusercontent.com:sub";

/// The only action the role's trust policy grants.
///
/// Omitting it makes the trust statement fall back to `sts:AssumeRole`,
/// which an OIDC federated principal can never use.
pub const WEB_IDENTITY_ACTION: &str = "sts:AssumeRoleWithWebIdentity";

/// Generic assume-role action, never granted by the trust policy
pub const ASSUME_ROLE_ACTION: &str = "sts:AssumeRole";

/// Name of the role assumed by GitHub Actions
pub const ROLE_NAME: &str = "github-oidc-role";

/// Name of the inline deploy policy
pub const POLICY_NAME: &str = "deployPolicy";

/// Stack name used when the caller does not supply one
pub const DEFAULT_STACK_NAME: &str = "GitHubActionsSetupStack";

/// Name of the CDK bootstrap stack
pub const CDK_TOOLKIT_STACK: &str = "CDKToolkit";

/// Account lookup order
pub const ACCOUNT_VARS: &[&str] = &["CDK_DEFAULT_ACCOUNT", "AWS_ACCOUNT_ID"];

/// Region lookup order
pub const REGION_VARS: &[&str] = &["CDK_DEFAULT_REGION", "AWS_REGION", "AWS_DEFAULT_REGION"];

static ACCOUNT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{12}$").expect("valid regex"));

static REGION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z]{2}(-gov|-iso[a-z]?)?-[a-z]+-\d+$").expect("valid regex"));

/// Concrete account and region a stack deploys into
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackEnv {
    pub account: String,
    pub region: String,
}

impl StackEnv {
    pub fn new(account: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            account: account.into(),
            region: region.into(),
        }
    }

    /// Resolve the deployment target from explicit overrides or the environment.
    ///
    /// Overrides win over variables. Nothing is defaulted: a missing account
    /// or region is an error.
    pub fn resolve(
        env: &dyn Environment,
        account: Option<&str>,
        region: Option<&str>,
    ) -> Result<Self> {
        let account = match account {
            Some(a) => a.to_string(),
            None => lookup_first(env, ACCOUNT_VARS).ok_or_else(|| {
                SynthError::unresolved_environment(format!(
                    "no account configured (pass --account or set one of {})",
                    ACCOUNT_VARS.join(", ")
                ))
            })?,
        };

        let region = match region {
            Some(r) => r.to_string(),
            None => lookup_first(env, REGION_VARS).ok_or_else(|| {
                SynthError::unresolved_environment(format!(
                    "no region configured (pass --region or set one of {})",
                    REGION_VARS.join(", ")
                ))
            })?,
        };

        let resolved = Self { account, region };
        resolved.validate()?;

        tracing::debug!(
            account = %resolved.account,
            region = %resolved.region,
            "resolved stack environment"
        );

        Ok(resolved)
    }

    /// Reject unresolved tokens and malformed identifiers
    pub fn validate(&self) -> Result<()> {
        if !ACCOUNT_RE.is_match(&self.account) {
            return Err(SynthError::invalid_environment(format!(
                "account '{}' is not a 12-digit AWS account id",
                self.account
            )));
        }
        if !REGION_RE.is_match(&self.region) {
            return Err(SynthError::invalid_environment(format!(
                "region '{}' is not a concrete AWS region",
                self.region
            )));
        }
        Ok(())
    }

    /// ARN partition for this region
    pub fn partition(&self) -> &'static str {
        if self.region.starts_with("cn-") {
            "aws-cn"
        } else if self.region.starts_with("us-gov-") {
            "aws-us-gov"
        } else {
            "aws"
        }
    }
}

fn lookup_first(env: &dyn Environment, names: &[&str]) -> Option<String> {
    names
        .iter()
        .filter_map(|name| env.get_var(name).ok())
        .find(|value| !value.trim().is_empty())
}
