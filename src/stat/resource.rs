/// Resource kinds and positional-argument parsing.
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::errors::StatError;

/// The kinds of resource `stat` knows how to query.
///
/// Variant order is the order in which kind groups are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Namespace,
    Pod,
    Deployment,
    ReplicationController,
    Service,
    Authority,
    /// Every row kind at once. Only valid as a query target.
    All,
}

impl ResourceKind {
    /// Canonical lowercase name, as used on the wire and in JSON output.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Namespace => "namespace",
            Self::Pod => "pod",
            Self::Deployment => "deployment",
            Self::ReplicationController => "replicationcontroller",
            Self::Service => "service",
            Self::Authority => "authority",
            Self::All => "all",
        }
    }

    /// Short alias used to prefix names when several kinds share one output.
    #[must_use]
    pub fn short_name(self) -> &'static str {
        match self {
            Self::Namespace => "ns",
            Self::Pod => "po",
            Self::Deployment => "deploy",
            Self::ReplicationController => "rc",
            Self::Service => "svc",
            Self::Authority => "au",
            Self::All => "all",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ResourceKind {
    type Err = StatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let kind = match s.to_ascii_lowercase().as_str() {
            "ns" | "namespace" | "namespaces" => Self::Namespace,
            "po" | "pod" | "pods" => Self::Pod,
            "deploy" | "deployment" | "deployments" => Self::Deployment,
            "rc" | "replicationcontroller" | "replicationcontrollers" => {
                Self::ReplicationController
            }
            "svc" | "service" | "services" => Self::Service,
            "au" | "authority" | "authorities" => Self::Authority,
            "all" => Self::All,
            _ => {
                return Err(StatError::MalformedResourceSpecifier(format!(
                    "unknown resource type '{s}'"
                )));
            }
        };
        Ok(kind)
    }
}

/// A parsed (kind, name, namespace) triple identifying what to query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceSpecifier {
    pub kind: ResourceKind,
    pub name: Option<String>,
    /// `None` for namespace targets and for all-namespaces queries.
    pub namespace: Option<String>,
}

impl fmt::Display for ResourceSpecifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{}/{name}", self.kind.short_name()),
            None => f.write_str(self.kind.name()),
        }
    }
}

/// Parse a single `kind` or `kind/name` token.
///
/// # Errors
///
/// Returns `StatError::MalformedResourceSpecifier` for unknown kinds, empty
/// names, or an attempt to name the `all` pseudo-kind.
pub fn parse_resource(namespace: Option<&str>, token: &str) -> Result<ResourceSpecifier, StatError> {
    match token.split_once('/') {
        Some((kind, name)) => build(namespace, kind, Some(name)),
        None => build(namespace, token, None),
    }
}

/// Parse positional arguments into one specifier per queried resource.
///
/// Accepted forms are `<kind>`, `<kind> <name>...` and `<kind>/<name>...`.
///
/// # Errors
///
/// Returns `StatError::MalformedResourceSpecifier` when no resource is given,
/// the two forms are mixed, or any token fails [`parse_resource`].
pub fn build_resources(
    namespace: Option<&str>,
    args: &[String],
) -> Result<Vec<ResourceSpecifier>, StatError> {
    let Some((first, rest)) = args.split_first() else {
        return Err(StatError::MalformedResourceSpecifier(
            "no resource type specified".to_owned(),
        ));
    };

    if first.contains('/') {
        return args
            .iter()
            .map(|token| {
                if token.contains('/') {
                    parse_resource(namespace, token)
                } else {
                    Err(mixed_forms(token))
                }
            })
            .collect();
    }

    if rest.is_empty() {
        return build(namespace, first, None).map(|specifier| vec![specifier]);
    }

    rest.iter()
        .map(|name| {
            if name.contains('/') {
                Err(mixed_forms(name))
            } else {
                build(namespace, first, Some(name))
            }
        })
        .collect()
}

fn build(namespace: Option<&str>, kind: &str, name: Option<&str>) -> Result<ResourceSpecifier, StatError> {
    let kind: ResourceKind = kind.parse()?;
    let name = match name {
        Some("") => {
            return Err(StatError::MalformedResourceSpecifier(format!(
                "missing name after '{kind}/'"
            )));
        }
        Some(_) if kind == ResourceKind::All => {
            return Err(StatError::MalformedResourceSpecifier(
                "resource type 'all' cannot be named".to_owned(),
            ));
        }
        other => other.map(str::to_owned),
    };
    let namespace = if kind == ResourceKind::Namespace {
        None
    } else {
        namespace.map(str::to_owned)
    };
    Ok(ResourceSpecifier {
        kind,
        name,
        namespace,
    })
}

fn mixed_forms(token: &str) -> StatError {
    StatError::MalformedResourceSpecifier(format!(
        "'{token}': use either '<type> <name>...' or '<type>/<name>...', not both"
    ))
}
