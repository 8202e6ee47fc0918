//! Role trust policy for GitHub Actions web identity federation

use serde::{Deserialize, Serialize};

use crate::config::{SUBJECT_CLAIM_KEY, WEB_IDENTITY_ACTION};
use crate::expr::Expr;
use crate::iam::{ConditionOperator, PolicyDocument, Principal, Statement};

/// How the `sub` claim is compared against the configured pattern.
///
/// `Like` permits wildcards, so a pattern such as `repo:org/name:*` trusts
/// every branch, tag, environment and pull request of the repository.
/// `Equals` trusts exactly one subject.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubjectMatch {
    #[default]
    Like,
    Equals,
}

impl SubjectMatch {
    pub fn operator(self) -> ConditionOperator {
        match self {
            Self::Like => ConditionOperator::StringLike,
            Self::Equals => ConditionOperator::StringEquals,
        }
    }
}

/// Trust policy letting tokens from `provider` whose subject matches
/// `subject` assume the role through `sts:AssumeRoleWithWebIdentity`.
///
/// The subject is embedded unmodified.
pub fn github_trust_policy(provider: Expr, subject: &str, mode: SubjectMatch) -> PolicyDocument {
    let statement = Statement::allow([WEB_IDENTITY_ACTION], Vec::<String>::new())
        .with_principal(Principal::federated(provider))
        .with_condition(mode.operator(), SUBJECT_CLAIM_KEY, subject);

    PolicyDocument::new(vec![statement])
}
