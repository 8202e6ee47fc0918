//! ARN patterns for CDK bootstrap resources
//!
//! Every pattern that names an account or region takes both from the
//! `StackEnv` of the stack being synthesized.

use crate::config::{StackEnv, CDK_TOOLKIT_STACK};

/// Every S3 bucket (bucket-level discovery actions)
pub fn all_buckets(env: &StackEnv) -> String {
    format!("arn:{}:s3:::*", env.partition())
}

/// Any version of the named CloudFormation stack
pub fn cloudformation_stack(env: &StackEnv, stack_name: &str) -> String {
    format!(
        "arn:{}:cloudformation:{}:{}:stack/{}/*",
        env.partition(),
        env.region,
        env.account,
        stack_name
    )
}

/// The CDK bootstrap stack
pub fn toolkit_stack(env: &StackEnv) -> String {
    cloudformation_stack(env, CDK_TOOLKIT_STACK)
}

/// Every stack in the account and region
pub fn any_stack(env: &StackEnv) -> String {
    cloudformation_stack(env, "*")
}

/// Objects in the bootstrap asset buckets (`cdk-<qualifier>-assets-<account>-<region>`)
pub fn asset_objects(env: &StackEnv) -> String {
    format!(
        "arn:{}:s3:::cdk-*-assets-{}-{}/*",
        env.partition(),
        env.account,
        env.region
    )
}

/// The bootstrap version parameter for any qualifier
pub fn bootstrap_version_parameter(env: &StackEnv) -> String {
    format!(
        "arn:{}:ssm:{}:{}:parameter/cdk-bootstrap/*/version",
        env.partition(),
        env.region,
        env.account
    )
}

/// The CloudFormation execution role created by bootstrapping
pub fn cfn_exec_role(env: &StackEnv) -> String {
    format!(
        "arn:{}:iam::{}:role/cdk-*-cfn-exec-role-{}-{}",
        env.partition(),
        env.account,
        env.account,
        env.region
    )
}
