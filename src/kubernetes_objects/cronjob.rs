use std::collections::BTreeMap;

use serde::Deserialize;

/// Restart policy of the pod created for every job run.
///
/// <https://kubernetes.io/docs/concepts/workloads/pods/pod-lifecycle/#restart-policy>
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum RestartPolicy {
    Never,
    OnFailure,
    Always,
}

impl RestartPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            RestartPolicy::Never => "Never",
            RestartPolicy::OnFailure => "OnFailure",
            RestartPolicy::Always => "Always",
        }
    }

    pub(crate) fn parse(value: &str) -> Option<Self> {
        match value {
            "Never" => Some(RestartPolicy::Never),
            "OnFailure" => Some(RestartPolicy::OnFailure),
            "Always" => Some(RestartPolicy::Always),
            _ => None,
        }
    }
}

/// How the CronJob controller treats a run that starts while the previous one is still active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum ConcurrencyPolicy {
    Allow,
    Forbid,
    Replace,
}

impl ConcurrencyPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConcurrencyPolicy::Allow => "Allow",
            ConcurrencyPolicy::Forbid => "Forbid",
            ConcurrencyPolicy::Replace => "Replace",
        }
    }

    pub(crate) fn parse(value: &str) -> Option<Self> {
        match value {
            "Allow" => Some(ConcurrencyPolicy::Allow),
            "Forbid" => Some(ConcurrencyPolicy::Forbid),
            "Replace" => Some(ConcurrencyPolicy::Replace),
            _ => None,
        }
    }
}

/// Desired state of one scheduled job, independent of the Kubernetes representation.
///
/// Identity is `(name, namespace)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobDefinition {
    pub name: String,
    pub namespace: String,

    /// Logical group the job belongs to, stamped as the `task-name` label
    pub task_name: String,

    /// Container image reference, e.g. "busybox:latest"
    pub image: String,

    /// Cron expression, passed through unvalidated
    pub schedule: String,

    /// Arguments for the container entry point
    pub args: Vec<String>,

    pub env: BTreeMap<String, String>,
    pub restart_policy: RestartPolicy,
    pub concurrency_policy: ConcurrencyPolicy,

    /// `None` leaves the field unset on the resource
    pub suspend: Option<bool>,
}

impl JobDefinition {
    /// Key used by the in-memory client, `<name>_<namespace>`.
    pub fn key(&self) -> String {
        cronjob_key(&self.name, &self.namespace)
    }
}

pub fn cronjob_key(name: &str, namespace: &str) -> String {
    format!("{name}_{namespace}")
}
