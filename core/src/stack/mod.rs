//! GitHub Actions setup stack
//!
//! Declares the OIDC provider, the role GitHub Actions assumes, the deploy
//! policy and its attachment to the role.

mod graph;
mod resources;

pub use graph::ResourceGraph;
pub use resources::{OidcProvider, Policy, PolicyAttachment, Resource, ResourceKind, Role};

use std::collections::BTreeMap;

use crate::config::{
    StackEnv, DEFAULT_STACK_NAME, GITHUB_OIDC_ISSUER, POLICY_NAME, ROLE_NAME, STS_AUDIENCE,
};
use crate::error::Result;
use crate::expr::Expr;
use crate::policy::{
    deploy_policy_document, evaluate_trust, github_trust_policy, AssumeRoleRequest, Decision,
    DenyReason, SubjectMatch,
};

/// Logical id of the OIDC provider
pub const PROVIDER_ID: &str = "GitHubIdProvider";

/// Logical id of the role
pub const ROLE_ID: &str = "GitHubOidcRole";

/// Logical id of the deploy policy
pub const POLICY_ID: &str = "deployPolicy";

/// Logical id of the policy-to-role attachment
pub const ATTACHMENT_ID: &str = "GitHubOidcRoleAttachment";

/// Placement and presentation of a stack
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackProps {
    pub stack_name: String,
    pub env: StackEnv,
    pub description: Option<String>,
    pub tags: BTreeMap<String, String>,
}

impl StackProps {
    pub fn new(env: StackEnv) -> Self {
        Self {
            stack_name: DEFAULT_STACK_NAME.to_string(),
            env,
            description: None,
            tags: BTreeMap::new(),
        }
    }
}

/// Inputs specific to the GitHub Actions setup stack
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitHubActionsSetupStackProps {
    /// Pattern the token's `sub` claim is matched against, e.g. `repo:org/name:*`
    pub principal_federated_sub: String,
    pub subject_match: SubjectMatch,
}

impl GitHubActionsSetupStackProps {
    pub fn new(principal_federated_sub: impl Into<String>) -> Self {
        Self {
            principal_federated_sub: principal_federated_sub.into(),
            subject_match: SubjectMatch::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitHubActionsSetupStack {
    props: StackProps,
    graph: ResourceGraph,
}

impl GitHubActionsSetupStack {
    /// Declare the stack's resources.
    ///
    /// The subject pattern is not validated here; CloudFormation rejects a
    /// malformed trust policy at deploy time.
    pub fn construct(props: StackProps, setup: GitHubActionsSetupStackProps) -> Self {
        let env = &props.env;
        tracing::debug!(
            stack = %props.stack_name,
            account = %env.account,
            region = %env.region,
            subject = %setup.principal_federated_sub,
            subject_match = ?setup.subject_match,
            "constructing GitHub Actions setup stack"
        );

        let mut graph = ResourceGraph::new();

        graph.insert(
            PROVIDER_ID,
            Resource::OidcProvider(OidcProvider {
                url: GITHUB_OIDC_ISSUER.to_string(),
                client_ids: vec![STS_AUDIENCE.to_string()],
            }),
        );

        graph.insert(
            ROLE_ID,
            Resource::Role(Role {
                role_name: ROLE_NAME.to_string(),
                assume_role_policy: github_trust_policy(
                    Expr::reference(PROVIDER_ID),
                    &setup.principal_federated_sub,
                    setup.subject_match,
                ),
            }),
        );

        graph.insert(
            POLICY_ID,
            Resource::Policy(Policy {
                policy_name: POLICY_NAME.to_string(),
                document: deploy_policy_document(env),
            }),
        );

        graph.insert(
            ATTACHMENT_ID,
            Resource::Attachment(PolicyAttachment {
                policy: POLICY_ID.to_string(),
                role: ROLE_ID.to_string(),
            }),
        );

        Self { props, graph }
    }

    pub fn props(&self) -> &StackProps {
        &self.props
    }

    pub fn graph(&self) -> &ResourceGraph {
        &self.graph
    }

    pub fn provider(&self) -> Option<&OidcProvider> {
        match self.graph.get(PROVIDER_ID)? {
            Resource::OidcProvider(p) => Some(p),
            _ => None,
        }
    }

    pub fn role(&self) -> Option<&Role> {
        match self.graph.get(ROLE_ID)? {
            Resource::Role(r) => Some(r),
            _ => None,
        }
    }

    pub fn policy(&self) -> Option<&Policy> {
        match self.graph.get(POLICY_ID)? {
            Resource::Policy(p) => Some(p),
            _ => None,
        }
    }

    pub fn attachment(&self) -> Option<&PolicyAttachment> {
        match self.graph.get(ATTACHMENT_ID)? {
            Resource::Attachment(a) => Some(a),
            _ => None,
        }
    }

    /// Reference a trust policy uses for this stack's provider
    pub fn provider_ref(&self) -> Expr {
        Expr::reference(PROVIDER_ID)
    }

    /// Would a workflow token from this stack's provider carrying `subject`
    /// be allowed to call `action` on the role?
    pub fn check_assume_role(&self, subject: &str, action: &str) -> Result<Decision> {
        let request = AssumeRoleRequest::github(action, self.provider_ref(), subject);
        match self.role() {
            Some(role) => evaluate_trust(&role.assume_role_policy, &request),
            None => Ok(Decision::Deny(DenyReason::ActionNotAllowed {
                action: action.to_string(),
            })),
        }
    }
}
