//! CloudFormation template synthesis
//!
//! Renders a stack's resource graph into the template document
//! CloudFormation deploys. Attachments have no resource of their own; they
//! become the `Roles` list of the policy they attach.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{Result, SynthError};
use crate::expr::Expr;
use crate::iam::PolicyDocument;
use crate::stack::{GitHubActionsSetupStack, Resource};

/// Template format version
pub const TEMPLATE_FORMAT_VERSION: &str = "2010-09-09";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Template {
    #[serde(rename = "AWSTemplateFormatVersion")]
    pub format_version: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub resources: BTreeMap<String, TemplateResource>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub outputs: BTreeMap<String, Output>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "Type", content = "Properties")]
pub enum TemplateResource {
    #[serde(rename = "AWS::IAM::OIDCProvider")]
    OidcProvider(OidcProviderProperties),
    #[serde(rename = "AWS::IAM::Role")]
    Role(RoleProperties),
    #[serde(rename = "AWS::IAM::Policy")]
    Policy(PolicyProperties),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Tag {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OidcProviderProperties {
    pub url: String,
    pub client_id_list: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RoleProperties {
    pub role_name: String,
    pub assume_role_policy_document: PolicyDocument,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyProperties {
    pub policy_name: String,
    pub policy_document: PolicyDocument,
    pub roles: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Output {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub value: Expr,
}

/// Output format for a rendered template
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
        }
    }

    /// File a synthesized stack is written to, e.g. `MyStack.template.json`
    pub fn file_name(self, stack_name: &str) -> String {
        format!("{}.template.{}", stack_name, self.extension())
    }
}

/// Render the stack into a CloudFormation template
pub fn synth(stack: &GitHubActionsSetupStack) -> Template {
    let props = stack.props();
    let graph = stack.graph();
    let tags: Vec<Tag> = props
        .tags
        .iter()
        .map(|(key, value)| Tag {
            key: key.clone(),
            value: value.clone(),
        })
        .collect();

    // policy logical id -> attached roles
    let mut attached: BTreeMap<&str, Vec<Expr>> = BTreeMap::new();
    for (_, resource) in graph.iter() {
        if let Resource::Attachment(a) = resource {
            attached
                .entry(a.policy.as_str())
                .or_default()
                .push(Expr::reference(a.role.as_str()));
        }
    }

    let mut resources = BTreeMap::new();
    let mut outputs = BTreeMap::new();

    for (id, resource) in graph.iter() {
        let rendered = match resource {
            Resource::OidcProvider(p) => TemplateResource::OidcProvider(OidcProviderProperties {
                url: p.url.clone(),
                client_id_list: p.client_ids.clone(),
                tags: tags.clone(),
            }),
            Resource::Role(r) => {
                outputs.insert(
                    format!("{}Arn", id),
                    Output {
                        description: Some(format!("ARN of {}", r.role_name)),
                        value: Expr::get_att(id, "Arn"),
                    },
                );
                TemplateResource::Role(RoleProperties {
                    role_name: r.role_name.clone(),
                    assume_role_policy_document: r.assume_role_policy.clone(),
                    tags: tags.clone(),
                })
            }
            Resource::Policy(p) => TemplateResource::Policy(PolicyProperties {
                policy_name: p.policy_name.clone(),
                policy_document: p.document.clone(),
                roles: attached.remove(id).unwrap_or_default(),
            }),
            Resource::Attachment(_) => continue,
        };
        resources.insert(id.to_string(), rendered);
    }

    tracing::info!(
        stack = %props.stack_name,
        resources = resources.len(),
        outputs = outputs.len(),
        "synthesized template"
    );

    Template {
        format_version: TEMPLATE_FORMAT_VERSION.to_string(),
        description: props.description.clone(),
        resources,
        outputs,
    }
}

impl Template {
    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| SynthError::serialization(format!("template to JSON: {}", e)))
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self)
            .map_err(|e| SynthError::serialization(format!("template to YAML: {}", e)))
    }

    pub fn render(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Json => self.to_json_pretty(),
            OutputFormat::Yaml => self.to_yaml(),
        }
    }
}
