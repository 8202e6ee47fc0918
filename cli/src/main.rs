//! gha-oidc-setup: synthesize the GitHub Actions OIDC setup stack
//!
//! Resolves the target account and region, declares the stack and writes the
//! CloudFormation template. Logs go to stderr so stdout carries only the
//! template.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::collections::BTreeMap;
use std::path::PathBuf;

use gha_oidc_core::config::{DEFAULT_STACK_NAME, WEB_IDENTITY_ACTION};
use gha_oidc_core::error::{Result, SynthError};
use gha_oidc_core::policy::{Decision, SubjectMatch};
use gha_oidc_core::{
    synth, GitHubActionsSetupStack, GitHubActionsSetupStackProps, OutputFormat, StackEnv,
    StackProps,
};

mod platform;

use platform::ProcessEnv;

/// Exit status when `check` denies the request
const EXIT_DENIED: i32 = 2;

#[derive(Parser)]
#[command(name = "gha-oidc-setup")]
#[command(about = "Synthesize an IAM OIDC trust and deploy role for GitHub Actions")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Synthesize the CloudFormation template
    Synth {
        #[command(flatten)]
        stack: StackArgs,

        /// Template description
        #[arg(long)]
        description: Option<String>,

        /// Tag applied to the provider and role (repeatable)
        #[arg(long = "tag", value_name = "KEY=VALUE", value_parser = parse_tag)]
        tags: Vec<(String, String)>,

        /// Output format
        #[arg(long, value_enum, default_value_t = FormatArg::Json)]
        format: FormatArg,

        /// Write the template to this file instead of stdout. A directory
        /// receives `<stack-name>.template.<format>`.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Evaluate a token exchange against the role's trust policy
    Check {
        #[command(flatten)]
        stack: StackArgs,

        /// `sub` claim presented by the workflow token
        #[arg(long)]
        claim_sub: String,

        /// STS action the caller invokes
        #[arg(long, default_value = WEB_IDENTITY_ACTION)]
        action: String,
    },
}

#[derive(Args)]
struct StackArgs {
    /// Subject pattern trusted by the role, e.g. `repo:my-org/my-repo:*`
    #[arg(long, env = "PRINCIPAL_FEDERATED_SUB")]
    subject: String,

    /// How the token subject is compared with the pattern
    #[arg(long, value_enum, default_value_t = MatchArg::Like)]
    subject_match: MatchArg,

    /// Target account (default: CDK_DEFAULT_ACCOUNT, AWS_ACCOUNT_ID)
    #[arg(long)]
    account: Option<String>,

    /// Target region (default: CDK_DEFAULT_REGION, AWS_REGION, AWS_DEFAULT_REGION)
    #[arg(long)]
    region: Option<String>,

    /// CloudFormation stack name
    #[arg(long, default_value = DEFAULT_STACK_NAME)]
    stack_name: String,
}

#[derive(Clone, Copy, ValueEnum)]
enum MatchArg {
    /// Wildcard match (StringLike)
    Like,
    /// Exact match (StringEquals)
    Equals,
}

impl From<MatchArg> for SubjectMatch {
    fn from(value: MatchArg) -> Self {
        match value {
            MatchArg::Like => SubjectMatch::Like,
            MatchArg::Equals => SubjectMatch::Equals,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Json,
    Yaml,
}

impl From<FormatArg> for OutputFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Json => OutputFormat::Json,
            FormatArg::Yaml => OutputFormat::Yaml,
        }
    }
}

fn parse_tag(raw: &str) -> std::result::Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got '{}'", raw)),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Synth {
            stack,
            description,
            tags,
            format,
            output,
        } => run_synth(stack, description, tags, format.into(), output),
        Commands::Check {
            stack,
            claim_sub,
            action,
        } => run_check(stack, &claim_sub, &action),
    };

    match result {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            tracing::debug!(error_key = e.error_key(), "command failed");
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn build_stack(
    args: StackArgs,
    description: Option<String>,
    tags: BTreeMap<String, String>,
) -> Result<GitHubActionsSetupStack> {
    let env = StackEnv::resolve(&ProcessEnv, args.account.as_deref(), args.region.as_deref())?;

    let mut props = StackProps::new(env);
    props.stack_name = args.stack_name;
    props.description = description;
    props.tags = tags;

    let mut setup = GitHubActionsSetupStackProps::new(args.subject);
    setup.subject_match = args.subject_match.into();

    Ok(GitHubActionsSetupStack::construct(props, setup))
}

fn run_synth(
    args: StackArgs,
    description: Option<String>,
    tags: Vec<(String, String)>,
    format: OutputFormat,
    output: Option<PathBuf>,
) -> Result<i32> {
    let stack = build_stack(args, description, tags.into_iter().collect())?;
    let rendered = synth(&stack).render(format)?;

    match output {
        Some(path) => {
            let path = if path.is_dir() {
                path.join(format.file_name(&stack.props().stack_name))
            } else {
                path
            };
            std::fs::write(&path, rendered).map_err(|e| {
                SynthError::io(format!("cannot write '{}': {}", path.display(), e))
            })?;
            tracing::info!(path = %path.display(), "wrote template");
        }
        None => print!("{}", ensure_trailing_newline(rendered)),
    }

    Ok(0)
}

fn run_check(args: StackArgs, claim_sub: &str, action: &str) -> Result<i32> {
    let stack = build_stack(args, None, BTreeMap::new())?;

    match stack.check_assume_role(claim_sub, action)? {
        Decision::Allow => {
            println!("ALLOW");
            Ok(0)
        }
        Decision::Deny(reason) => {
            println!("DENY: {}", reason);
            Ok(EXIT_DENIED)
        }
    }
}

fn ensure_trailing_newline(mut s: String) -> String {
    if !s.ends_with('\n') {
        s.push('\n');
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tag() {
        assert_eq!(
            parse_tag("team=platform"),
            Ok(("team".to_string(), "platform".to_string()))
        );
        assert_eq!(parse_tag("empty="), Ok(("empty".to_string(), String::new())));
        assert_eq!(
            parse_tag("url=https://x?a=b"),
            Ok(("url".to_string(), "https://x?a=b".to_string()))
        );
    }

    #[test]
    fn test_parse_tag_rejects_malformed() {
        assert!(parse_tag("novalue").is_err());
        assert!(parse_tag("=value").is_err());
    }

    #[test]
    fn test_ensure_trailing_newline() {
        assert_eq!(ensure_trailing_newline("{}".to_string()), "{}\n");
        assert_eq!(ensure_trailing_newline("a: b\n".to_string()), "a: b\n");
    }

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
