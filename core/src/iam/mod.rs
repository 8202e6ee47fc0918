//! IAM building blocks
//!
//! Policy document types and the ARN patterns the deploy policy grants on.

pub mod arn;
mod document;

pub use document::{
    ConditionOperator, Conditions, Effect, PolicyDocument, Principal, Statement, POLICY_VERSION,
};
