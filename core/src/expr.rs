//! Template value expressions
//!
//! Values that are either known at synthesis time or only resolved by
//! CloudFormation at deploy time (a resource's `Ref` or attribute).

use serde::{Deserialize, Serialize};

/// A literal string or an intrinsic function reference
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Expr {
    Literal(String),
    Ref {
        #[serde(rename = "Ref")]
        logical_id: String,
    },
    GetAtt {
        #[serde(rename = "Fn::GetAtt")]
        target: (String, String),
    },
}

impl Expr {
    /// `{"Ref": logical_id}`
    pub fn reference(logical_id: impl Into<String>) -> Self {
        Self::Ref {
            logical_id: logical_id.into(),
        }
    }

    /// `{"Fn::GetAtt": [logical_id, attribute]}`
    pub fn get_att(logical_id: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self::GetAtt {
            target: (logical_id.into(), attribute.into()),
        }
    }
}

impl From<&str> for Expr {
    fn from(value: &str) -> Self {
        Self::Literal(value.to_string())
    }
}

impl From<String> for Expr {
    fn from(value: String) -> Self {
        Self::Literal(value)
    }
}
