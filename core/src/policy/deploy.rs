//! Deploy policy for a CDK pipeline running in GitHub Actions
//!
//! Four statements: discovery and stack lifecycle, asset upload, bootstrap
//! version lookup and execution role delegation.

use crate::config::StackEnv;
use crate::iam::{arn, PolicyDocument, Statement};

/// Bucket discovery and CloudFormation change set lifecycle
pub const DISCOVERY_ACTIONS: &[&str] = &[
    "s3:getBucketLocation",
    "s3:List*",
    "cloudformation:CreateStack",
    "cloudformation:CreateChangeSet",
    "cloudformation:DeleteChangeSet",
    "cloudformation:DescribeChangeSet",
    "cloudformation:DescribeStacks",
    "cloudformation:DescribeStackEvents",
    "cloudformation:ExecuteChangeSet",
    "cloudformation:GetTemplate",
];

pub const ASSET_ACTIONS: &[&str] = &["s3:PutObject", "s3:GetObject"];

pub const BOOTSTRAP_VERSION_ACTIONS: &[&str] = &["ssm:GetParameter"];

pub const PASS_ROLE_ACTIONS: &[&str] = &["iam:PassRole"];

/// The four deploy statements, in order
pub fn deploy_statements(env: &StackEnv) -> Vec<Statement> {
    vec![
        Statement::allow(
            DISCOVERY_ACTIONS.iter().copied(),
            [arn::all_buckets(env), arn::toolkit_stack(env), arn::any_stack(env)],
        ),
        Statement::allow(ASSET_ACTIONS.iter().copied(), [arn::asset_objects(env)]),
        Statement::allow(
            BOOTSTRAP_VERSION_ACTIONS.iter().copied(),
            [arn::bootstrap_version_parameter(env)],
        ),
        Statement::allow(PASS_ROLE_ACTIONS.iter().copied(), [arn::cfn_exec_role(env)]),
    ]
}

pub fn deploy_policy_document(env: &StackEnv) -> PolicyDocument {
    PolicyDocument::new(deploy_statements(env))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::iam::Effect;
    use crate::test_support::{test_env, TEST_ACCOUNT, TEST_REGION};

    fn actions(stmt: &Statement) -> Vec<&str> {
        stmt.action.iter().map(String::as_str).collect()
    }

    #[test]
    fn test_four_allow_statements() {
        let statements = deploy_statements(&test_env());
        assert_eq!(statements.len(), 4);
        assert!(statements.iter().all(|s| s.effect == Effect::Allow));
        assert!(statements.iter().all(|s| s.principal.is_none()));
        assert!(statements.iter().all(|s| s.condition.is_empty()));
    }

    #[test]
    fn test_discovery_statement() {
        let statements = deploy_statements(&test_env());
        let stmt = &statements[0];

        assert_eq!(actions(stmt), DISCOVERY_ACTIONS.to_vec());
        assert_eq!(
            stmt.resource,
            vec![
                "arn:aws:s3:::*".to_string(),
                "arn:aws:cloudformation:us-east-1:111111111111:stack/CDKToolkit/*".to_string(),
                "arn:aws:cloudformation:us-east-1:111111111111:stack/*/*".to_string(),
            ]
        );
    }

    #[test]
    fn test_asset_statement() {
        let statements = deploy_statements(&test_env());
        let stmt = &statements[1];

        assert_eq!(actions(stmt), vec!["s3:PutObject", "s3:GetObject"]);
        assert_eq!(
            stmt.resource,
            vec!["arn:aws:s3:::cdk-*-assets-111111111111-us-east-1/*".to_string()]
        );
    }

    #[test]
    fn test_bootstrap_version_statement() {
        let statements = deploy_statements(&test_env());
        let stmt = &statements[2];

        assert_eq!(actions(stmt), vec!["ssm:GetParameter"]);
        assert_eq!(
            stmt.resource,
            vec!["arn:aws:ssm:us-east-1:111111111111:parameter/cdk-bootstrap/*/version".to_string()]
        );
    }

    #[test]
    fn test_pass_role_statement() {
        let statements = deploy_statements(&test_env());
        let stmt = &statements[3];

        assert_eq!(actions(stmt), vec!["iam:PassRole"]);
        assert_eq!(
            stmt.resource,
            vec!["arn:aws:iam::111111111111:role/cdk-*-cfn-exec-role-111111111111-us-east-1"
                .to_string()]
        );
    }

    #[test]
    fn test_no_foreign_account_or_region() {
        let statements = deploy_statements(&StackEnv::new("222222222222", "eu-west-1"));

        for resource in statements.iter().flat_map(|s| s.resource.iter()) {
            assert!(!resource.contains(TEST_ACCOUNT), "{}", resource);
            assert!(!resource.contains(TEST_REGION), "{}", resource);
        }
    }

    #[test]
    fn test_account_scoped_resources_name_the_account() {
        let env = test_env();
        let statements = deploy_statements(&env);

        // Only the bucket-wide discovery ARN is account-free (S3 bucket ARNs have none)
        for resource in statements.iter().flat_map(|s| s.resource.iter()) {
            if resource == "arn:aws:s3:::*" {
                continue;
            }
            assert!(resource.contains(&env.account), "{}", resource);
            assert!(resource.contains(&env.region), "{}", resource);
        }
    }

    #[test]
    fn test_document_wraps_statements() {
        let doc = deploy_policy_document(&test_env());
        assert_eq!(doc.version, "2012-10-17");
        assert_eq!(doc.statement, deploy_statements(&test_env()));
    }
}
