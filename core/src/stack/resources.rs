//! Resource declarations held in a stack's graph

use serde::{Deserialize, Serialize};

use crate::iam::PolicyDocument;

/// Trusted external OIDC token issuer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OidcProvider {
    pub url: String,
    pub client_ids: Vec<String>,
}

/// Assumable IAM role
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub role_name: String,
    pub assume_role_policy: PolicyDocument,
}

/// Inline IAM policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Policy {
    pub policy_name: String,
    pub document: PolicyDocument,
}

/// Binds one policy to one role, both by logical id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyAttachment {
    pub policy: String,
    pub role: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Resource {
    OidcProvider(OidcProvider),
    Role(Role),
    Policy(Policy),
    Attachment(PolicyAttachment),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    OidcProvider,
    Role,
    Policy,
    Attachment,
}

impl Resource {
    pub fn kind(&self) -> ResourceKind {
        match self {
            Self::OidcProvider(_) => ResourceKind::OidcProvider,
            Self::Role(_) => ResourceKind::Role,
            Self::Policy(_) => ResourceKind::Policy,
            Self::Attachment(_) => ResourceKind::Attachment,
        }
    }
}
