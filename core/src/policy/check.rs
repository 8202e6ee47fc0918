//! Trust policy evaluation
//!
//! Decides whether an assume-role request would be accepted by a role's
//! trust policy, following IAM's evaluation order: an explicit deny wins,
//! otherwise any matching allow grants, otherwise the request is implicitly
//! denied.

use std::collections::HashMap;
use std::fmt;

use super::compile::WildcardPattern;
use crate::config::SUBJECT_CLAIM_KEY;
use crate::error::Result;
use crate::expr::Expr;
use crate::iam::{ConditionOperator, Effect, PolicyDocument, Principal, Statement};

/// Who is calling STS
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallerPrincipal {
    /// Holder of a token from the given identity provider
    Federated(Expr),
    /// An IAM principal ARN
    Aws(String),
}

/// An `sts:AssumeRole*` call against the role
#[derive(Debug, Clone)]
pub struct AssumeRoleRequest {
    pub action: String,
    pub principal: CallerPrincipal,
    /// Request context keys, e.g. `token.actions.githubusercontent.com:sub`
    pub context: HashMap<String, String>,
}

impl AssumeRoleRequest {
    /// A GitHub Actions token exchange presenting `subject`
    pub fn github(action: impl Into<String>, provider: Expr, subject: impl Into<String>) -> Self {
        let mut context = HashMap::new();
        context.insert(SUBJECT_CLAIM_KEY.to_string(), subject.into());
        Self {
            action: action.into(),
            principal: CallerPrincipal::Federated(provider),
            context,
        }
    }
}

/// Why a request was denied
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DenyReason {
    /// A deny statement matched
    ExplicitDeny,
    /// No statement grants the requested action
    ActionNotAllowed { action: String },
    /// The action is granted, but not to this caller
    PrincipalMismatch,
    /// Action and caller match, but a condition key does not hold
    ConditionFailed { key: String },
}

impl DenyReason {
    /// Specificity, used to report the closest miss
    fn rank(&self) -> u8 {
        match self {
            Self::ActionNotAllowed { .. } => 0,
            Self::PrincipalMismatch => 1,
            Self::ConditionFailed { .. } => 2,
            Self::ExplicitDeny => 3,
        }
    }
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExplicitDeny => write!(f, "explicitly denied"),
            Self::ActionNotAllowed { action } => {
                write!(f, "action '{}' is not allowed by the trust policy", action)
            }
            Self::PrincipalMismatch => write!(f, "caller is not a trusted principal"),
            Self::ConditionFailed { key } => write!(f, "condition on '{}' not satisfied", key),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(DenyReason),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }
}

/// Evaluate `request` against a role trust policy
pub fn evaluate_trust(policy: &PolicyDocument, request: &AssumeRoleRequest) -> Result<Decision> {
    let mut allowed = false;
    let mut closest: Option<DenyReason> = None;

    for statement in &policy.statement {
        let outcome = match_statement(statement, request)?;

        match (statement.effect, outcome) {
            (Effect::Deny, Ok(())) => return Ok(Decision::Deny(DenyReason::ExplicitDeny)),
            (Effect::Deny, Err(_)) => {}
            (Effect::Allow, Ok(())) => allowed = true,
            (Effect::Allow, Err(reason)) => {
                if closest.as_ref().map_or(true, |c| reason.rank() > c.rank()) {
                    closest = Some(reason);
                }
            }
        }
    }

    if allowed {
        return Ok(Decision::Allow);
    }

    let reason = closest.unwrap_or_else(|| DenyReason::ActionNotAllowed {
        action: request.action.clone(),
    });
    tracing::debug!(action = %request.action, %reason, "trust policy denied request");

    Ok(Decision::Deny(reason))
}

/// `Ok(())` when the statement applies to the request, else why not
fn match_statement(
    statement: &Statement,
    request: &AssumeRoleRequest,
) -> Result<std::result::Result<(), DenyReason>> {
    if !action_matches(&statement.action, &request.action)? {
        return Ok(Err(DenyReason::ActionNotAllowed {
            action: request.action.clone(),
        }));
    }

    if !principal_matches(statement.principal.as_ref(), &request.principal) {
        return Ok(Err(DenyReason::PrincipalMismatch));
    }

    for (operator, values) in &statement.condition {
        for (key, expected) in values {
            let holds = match request.context.get(key) {
                Some(actual) => condition_holds(*operator, expected, actual)?,
                None => false,
            };
            if !holds {
                return Ok(Err(DenyReason::ConditionFailed { key: key.clone() }));
            }
        }
    }

    Ok(Ok(()))
}

fn action_matches(patterns: &[String], action: &str) -> Result<bool> {
    for pattern in patterns {
        if WildcardPattern::case_insensitive(pattern)?.is_match(action) {
            return Ok(true);
        }
    }
    Ok(false)
}

fn principal_matches(expected: Option<&Principal>, caller: &CallerPrincipal) -> bool {
    let Some(expected) = expected else {
        return false;
    };
    match caller {
        CallerPrincipal::Federated(presented) => expected.federated.as_ref() == Some(presented),
        CallerPrincipal::Aws(arn) => expected
            .aws
            .as_deref()
            .map_or(false, |aws| aws == "*" || aws == arn),
    }
}

fn condition_holds(operator: ConditionOperator, expected: &str, actual: &str) -> Result<bool> {
    match operator {
        ConditionOperator::StringEquals => Ok(expected == actual),
        ConditionOperator::StringLike => Ok(WildcardPattern::new(expected)?.is_match(actual)),
    }
}
