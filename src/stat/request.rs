/// Request construction: flag validation and `StatSummaryRequest` building.
use tracing::debug;

use super::errors::{FlagConflict, StatError};
use super::options::{StatOptions, TimeWindow};
use super::resource::{ResourceKind, ResourceSpecifier, build_resources, parse_resource};

/// Restricts the queried traffic to one direction relative to a resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrafficFilter {
    /// Only traffic sent to this resource.
    To(ResourceSpecifier),
    /// Only traffic received from this resource.
    From(ResourceSpecifier),
}

/// One query unit for the metrics API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatSummaryRequest {
    pub selector: ResourceSpecifier,
    /// Fan-out across namespaces is left to the API.
    pub all_namespaces: bool,
    pub time_window: TimeWindow,
    pub filter: Option<TrafficFilter>,
}

/// The positional arguments as typed, before parsing.
///
/// Validation only needs to know whether a name was given and what kind the
/// first token names, so it never has to parse the arguments in full.
struct RawTarget<'a> {
    args: &'a [String],
}

impl RawTarget<'_> {
    fn names_resource(&self) -> bool {
        self.args.len() > 1 || self.args.iter().any(|arg| arg.contains('/'))
    }

    fn kind(&self) -> Option<ResourceKind> {
        let first = self.args.first()?;
        let token = first.split_once('/').map_or(first.as_str(), |(kind, _)| kind);
        token.parse().ok()
    }

    fn is_namespace(&self) -> bool {
        self.kind() == Some(ResourceKind::Namespace)
    }
}

/// A single flag-combination rule: when `violated` holds, fail with `conflict`.
struct Rule {
    violated: fn(&RawTarget<'_>, &StatOptions) -> bool,
    conflict: FlagConflict,
}

/// Checked in order; the first violated rule wins.
const RULES: &[Rule] = &[
    Rule {
        violated: |target, options| target.names_resource() && options.all_namespaces,
        conflict: FlagConflict::NamedResourceAcrossNamespaces,
    },
    Rule {
        violated: |_, options| options.to_resource.is_some() && options.from_resource.is_some(),
        conflict: FlagConflict::ToAndFrom,
    },
    Rule {
        violated: |_, options| options.to_namespace.is_some() && options.from_namespace.is_some(),
        conflict: FlagConflict::ToAndFromNamespace,
    },
    Rule {
        violated: |target, options| target.is_namespace() && options.to_namespace.is_some(),
        conflict: FlagConflict::ToNamespaceOnNamespace,
    },
    Rule {
        violated: |target, options| target.is_namespace() && options.from_namespace.is_some(),
        conflict: FlagConflict::FromNamespaceOnNamespace,
    },
];

fn validate(target: &RawTarget<'_>, options: &StatOptions) -> Result<(), FlagConflict> {
    match RULES.iter().find(|rule| (rule.violated)(target, options)) {
        Some(rule) => Err(rule.conflict),
        None => Ok(()),
    }
}

/// Build the stat requests for `args` under `options`.
///
/// Emits one request per queried resource: a bare kind is a single request,
/// each named resource gets its own. The traffic filter and time window are
/// shared by every request.
///
/// # Errors
///
/// Returns `StatError::InvalidFlagCombination` for conflicting flags,
/// `StatError::InvalidTimeWindow` for a bad `--time-window`, and
/// `StatError::MalformedResourceSpecifier` for unparseable resources.
pub fn build_stat_summary_requests(
    args: &[String],
    options: &StatOptions,
) -> Result<Vec<StatSummaryRequest>, StatError> {
    validate(&RawTarget { args }, options)?;

    let time_window: TimeWindow = options.time_window.parse()?;

    let scope = (!options.all_namespaces).then_some(options.namespace.as_str());
    let targets = build_resources(scope, args)?;

    let filter = traffic_filter(options)?;

    let requests: Vec<StatSummaryRequest> = targets
        .into_iter()
        .map(|selector| StatSummaryRequest {
            selector,
            all_namespaces: options.all_namespaces,
            time_window: time_window.clone(),
            filter: filter.clone(),
        })
        .collect();

    debug!(
        count = requests.len(),
        all_namespaces = options.all_namespaces,
        window = time_window.label(),
        "built stat summary requests"
    );
    Ok(requests)
}

fn traffic_filter(options: &StatOptions) -> Result<Option<TrafficFilter>, StatError> {
    let resolve = |resource: &str, namespace: Option<&String>| {
        let namespace = namespace.unwrap_or(&options.namespace);
        parse_resource(Some(namespace.as_str()), resource)
    };

    if let Some(to) = &options.to_resource {
        return resolve(to, options.to_namespace.as_ref())
            .map(|target| Some(TrafficFilter::To(target)));
    }
    if let Some(from) = &options.from_resource {
        return resolve(from, options.from_namespace.as_ref())
            .map(|source| Some(TrafficFilter::From(source)));
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|t| (*t).to_owned()).collect()
    }

    fn expect_error(tokens: &[&str], options: &StatOptions, expected: &str) {
        match build_stat_summary_requests(&args(tokens), options) {
            Ok(requests) => panic!("expected error [{expected}], got {} requests", requests.len()),
            Err(err) => assert_eq!(err.to_string(), expected),
        }
    }

    #[test]
    fn test_named_resource_across_all_namespaces() {
        let options = StatOptions {
            all_namespaces: true,
            ..StatOptions::default()
        };
        let expected = "stats for a resource cannot be retrieved by name across all namespaces";
        expect_error(&["po", "web"], &options, expected);
        expect_error(&["po/web"], &options, expected);
    }

    #[test]
    fn test_rejects_to_and_from() {
        let options = StatOptions {
            to_resource: Some("deploy/foo".to_owned()),
            from_resource: Some("deploy/bar".to_owned()),
            ..StatOptions::default()
        };
        expect_error(&["ns", "test"], &options, "--to and --from flags are mutually exclusive");
        expect_error(&["po"], &options, "--to and --from flags are mutually exclusive");
    }

    #[test]
    fn test_rejects_to_namespace_and_from_namespace() {
        let options = StatOptions {
            to_namespace: Some("foo".to_owned()),
            from_namespace: Some("bar".to_owned()),
            ..StatOptions::default()
        };
        expect_error(
            &["po"],
            &options,
            "--to-namespace and --from-namespace flags are mutually exclusive",
        );
    }

    #[test]
    fn test_rejects_to_namespace_on_namespace_target() {
        let options = StatOptions {
            to_namespace: Some("bar".to_owned()),
            ..StatOptions::default()
        };
        expect_error(
            &["ns", "foo"],
            &options,
            "--to-namespace flag is incompatible with namespace resource type",
        );
    }

    #[test]
    fn test_rejects_from_namespace_on_namespace_target() {
        let options = StatOptions {
            from_namespace: Some("foo".to_owned()),
            ..StatOptions::default()
        };
        expect_error(
            &["ns/bar"],
            &options,
            "--from-namespace flag is incompatible with namespace resource type",
        );
    }

    #[test]
    fn test_rules_apply_in_order() {
        let options = StatOptions {
            all_namespaces: true,
            to_resource: Some("deploy/foo".to_owned()),
            from_resource: Some("deploy/bar".to_owned()),
            to_namespace: Some("a".to_owned()),
            from_namespace: Some("b".to_owned()),
            ..StatOptions::default()
        };
        expect_error(
            &["ns", "emojivoto"],
            &options,
            "stats for a resource cannot be retrieved by name across all namespaces",
        );
        expect_error(&["ns"], &options, "--to and --from flags are mutually exclusive");
    }

    #[test]
    fn test_flag_rules_checked_before_parsing() {
        let options = StatOptions {
            to_resource: Some("deploy/foo".to_owned()),
            from_resource: Some("deploy/bar".to_owned()),
            ..StatOptions::default()
        };
        expect_error(&["widgets"], &options, "--to and --from flags are mutually exclusive");
    }

    #[test]
    fn test_single_request_for_bare_kind() {
        let requests = build_stat_summary_requests(&args(&["ns"]), &StatOptions::default()).unwrap();
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert_eq!(request.selector.kind, ResourceKind::Namespace);
        assert_eq!(request.selector.name, None);
        assert_eq!(request.time_window.seconds(), 60);
        assert!(request.filter.is_none());
        assert!(!request.all_namespaces);
    }

    #[test]
    fn test_all_namespaces_is_one_request_without_scope() {
        let options = StatOptions {
            all_namespaces: true,
            ..StatOptions::default()
        };
        let requests = build_stat_summary_requests(&args(&["deploy"]), &options).unwrap();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].all_namespaces);
        assert_eq!(requests[0].selector.namespace, None);
    }

    #[test]
    fn test_one_request_per_named_resource() {
        let options = StatOptions {
            namespace: "emojivoto".to_owned(),
            time_window: "10s".to_owned(),
            from_resource: Some("deploy/vote-bot".to_owned()),
            ..StatOptions::default()
        };
        let requests =
            build_stat_summary_requests(&args(&["deploy/web", "deploy/voting"]), &options).unwrap();
        assert_eq!(requests.len(), 2);
        for request in &requests {
            assert_eq!(request.time_window.label(), "10s");
            assert_eq!(request.selector.namespace.as_deref(), Some("emojivoto"));
            let Some(TrafficFilter::From(from)) = &request.filter else {
                panic!("expected a --from filter");
            };
            assert_eq!(from.name.as_deref(), Some("vote-bot"));
            assert_eq!(from.namespace.as_deref(), Some("emojivoto"));
        }
    }

    #[test]
    fn test_to_namespace_overrides_filter_scope() {
        let options = StatOptions {
            to_resource: Some("svc/web-svc".to_owned()),
            to_namespace: Some("other".to_owned()),
            ..StatOptions::default()
        };
        let requests = build_stat_summary_requests(&args(&["deploy"]), &options).unwrap();
        let Some(TrafficFilter::To(to)) = &requests[0].filter else {
            panic!("expected a --to filter");
        };
        assert_eq!(to.kind, ResourceKind::Service);
        assert_eq!(to.namespace.as_deref(), Some("other"));
    }

    #[test]
    fn test_invalid_time_window() {
        let options = StatOptions {
            time_window: "soon".to_owned(),
            ..StatOptions::default()
        };
        let result = build_stat_summary_requests(&args(&["po"]), &options);
        assert!(matches!(result, Err(StatError::InvalidTimeWindow(_))));
    }

    #[test]
    fn test_malformed_filter_resource() {
        let options = StatOptions {
            to_resource: Some("widgets/foo".to_owned()),
            ..StatOptions::default()
        };
        let result = build_stat_summary_requests(&args(&["po"]), &options);
        assert!(matches!(result, Err(StatError::MalformedResourceSpecifier(_))));
    }

    #[test]
    fn test_deterministic() {
        let options = StatOptions::default();
        let first = build_stat_summary_requests(&args(&["po", "a", "b"]), &options).unwrap();
        let second = build_stat_summary_requests(&args(&["po", "a", "b"]), &options).unwrap();
        assert_eq!(first, second);
    }
}
