//! IAM policy document types
//!
//! Serialized exactly as IAM expects them inside a template
//! (`Version`, `Statement`, `Effect`, `Principal`, `Action`, `Resource`,
//! `Condition`).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::expr::Expr;

/// Policy language version
pub const POLICY_VERSION: &str = "2012-10-17";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    Allow,
    Deny,
}

/// Statement principal.
///
/// IAM renders principals as an object keyed by principal type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// Identity authenticated by an external token issuer (OIDC/SAML provider ARN)
    #[serde(rename = "Federated", default, skip_serializing_if = "Option::is_none")]
    pub federated: Option<Expr>,

    /// AWS service principal, e.g. `lambda.amazonaws.com`
    #[serde(rename = "Service", default, skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,

    /// AWS account or IAM principal ARN, `*` for anyone
    #[serde(rename = "AWS", default, skip_serializing_if = "Option::is_none")]
    pub aws: Option<String>,
}

impl Principal {
    pub fn federated(provider: Expr) -> Self {
        Self {
            federated: Some(provider),
            ..Self::default()
        }
    }

    pub fn aws(arn: impl Into<String>) -> Self {
        Self {
            aws: Some(arn.into()),
            ..Self::default()
        }
    }
}

/// Condition operators used by trust policies
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ConditionOperator {
    /// Exact, case-sensitive match
    StringEquals,
    /// Case-sensitive match with `*` and `?` wildcards
    StringLike,
}

/// Operator -> (context key -> expected value)
pub type Conditions = BTreeMap<ConditionOperator, BTreeMap<String, String>>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Statement {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sid: Option<String>,

    pub effect: Effect,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub principal: Option<Principal>,

    pub action: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resource: Vec<String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub condition: Conditions,
}

impl Statement {
    /// Identity-based allow statement over the given actions and resources
    pub fn allow<A, R>(actions: A, resources: R) -> Self
    where
        A: IntoIterator,
        A::Item: Into<String>,
        R: IntoIterator,
        R::Item: Into<String>,
    {
        Self {
            sid: None,
            effect: Effect::Allow,
            principal: None,
            action: actions.into_iter().map(Into::into).collect(),
            resource: resources.into_iter().map(Into::into).collect(),
            condition: Conditions::new(),
        }
    }

    pub fn with_principal(mut self, principal: Principal) -> Self {
        self.principal = Some(principal);
        self
    }

    pub fn with_condition(
        mut self,
        operator: ConditionOperator,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.condition
            .entry(operator)
            .or_default()
            .insert(key.into(), value.into());
        self
    }

    /// Look up the expected value for `key` under `operator`
    pub fn condition_value(&self, operator: ConditionOperator, key: &str) -> Option<&str> {
        self.condition
            .get(&operator)
            .and_then(|values| values.get(key))
            .map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyDocument {
    pub version: String,
    pub statement: Vec<Statement>,
}

impl PolicyDocument {
    pub fn new(statement: Vec<Statement>) -> Self {
        Self {
            version: POLICY_VERSION.to_string(),
            statement,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_allow_statement_shape() {
        let stmt = Statement::allow(["ssm:GetParameter"], ["arn:aws:ssm:us-east-1:1:parameter/x"]);
        let value = serde_json::to_value(&stmt).unwrap();

        assert_eq!(
            value,
            json!({
                "Effect": "Allow",
                "Action": ["ssm:GetParameter"],
                "Resource": ["arn:aws:ssm:us-east-1:1:parameter/x"]
            })
        );
    }

    #[test]
    fn test_trust_statement_shape() {
        let stmt = Statement::allow(["sts:AssumeRoleWithWebIdentity"], Vec::<String>::new())
            .with_principal(Principal::federated(Expr::reference("Provider")))
            .with_condition(ConditionOperator::StringLike, "k", "repo:o/r:*");
        let value = serde_json::to_value(&stmt).unwrap();

        assert_eq!(
            value,
            json!({
                "Effect": "Allow",
                "Principal": {"Federated": {"Ref": "Provider"}},
                "Action": ["sts:AssumeRoleWithWebIdentity"],
                "Condition": {"StringLike": {"k": "repo:o/r:*"}}
            })
        );
    }

    #[test]
    fn test_aws_principal_is_upper_case() {
        let value = serde_json::to_value(Principal::aws("*")).unwrap();
        assert_eq!(value, json!({"AWS": "*"}));
    }

    #[test]
    fn test_service_principal_parses() {
        let principal: Principal =
            serde_json::from_value(json!({"Service": "lambda.amazonaws.com"})).unwrap();
        assert_eq!(principal.service.as_deref(), Some("lambda.amazonaws.com"));
        assert!(principal.federated.is_none());
    }

    #[test]
    fn test_principal_yaml_is_a_plain_mapping() {
        let yaml = serde_yaml::to_string(&Principal::federated(Expr::reference("P"))).unwrap();
        assert!(!yaml.contains('!'));
        assert!(yaml.contains("Federated"));
        assert!(yaml.contains("Ref: P"));
    }

    #[test]
    fn test_conditions_merge_under_one_operator() {
        let stmt = Statement::allow(["a:B"], ["*"])
            .with_condition(ConditionOperator::StringEquals, "k1", "v1")
            .with_condition(ConditionOperator::StringEquals, "k2", "v2");

        assert_eq!(stmt.condition.len(), 1);
        assert_eq!(stmt.condition_value(ConditionOperator::StringEquals, "k2"), Some("v2"));
        assert_eq!(stmt.condition_value(ConditionOperator::StringLike, "k1"), None);
    }

    #[test]
    fn test_document_version() {
        let doc = PolicyDocument::new(vec![]);
        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(value, json!({"Version": "2012-10-17", "Statement": []}));
    }

    #[test]
    fn test_document_parses_back() {
        let raw = json!({
            "Version": "2012-10-17",
            "Statement": [{
                "Effect": "Deny",
                "Action": ["s3:*"],
                "Resource": ["*"]
            }]
        });
        let doc: PolicyDocument = serde_json::from_value(raw).unwrap();
        assert_eq!(doc.statement[0].effect, Effect::Deny);
        assert!(doc.statement[0].principal.is_none());
    }
}
