use std::collections::BTreeMap;

use serde::Deserialize;
use thiserror::Error;

use super::TaskConfig;
use crate::kubernetes_objects::cronjob::{ConcurrencyPolicy, JobDefinition, RestartPolicy};

#[cfg_attr(test, derive(PartialEq))]
#[derive(Deserialize, Debug, Clone)]
pub(super) struct RawTaskConfig {
    pub(super) task: String,
    pub(super) namespace: String,

    /// Image repository, without tag
    pub(super) image: String,

    /// Appended to `image` as the tag when set
    #[serde(default)]
    pub(super) image_version: Option<String>,

    /// Default arguments for every bucket
    #[serde(default)]
    pub(super) args: Vec<String>,

    /// Default environment for every bucket
    #[serde(default)]
    pub(super) env: BTreeMap<String, String>,

    #[serde(default = "default_restart_policy")]
    pub(super) restart_policy: RestartPolicy,

    #[serde(default = "default_concurrency_policy")]
    pub(super) concurrency_policy: ConcurrencyPolicy,

    #[serde(default)]
    pub(super) suspend: Option<bool>,

    pub(super) buckets: BTreeMap<String, RawBucket>,
}

#[cfg_attr(test, derive(PartialEq))]
#[derive(Deserialize, Debug, Clone)]
pub(super) struct RawBucket {
    pub(super) schedule: String,

    /// Replaces the task arguments
    #[serde(default)]
    pub(super) args: Option<Vec<String>>,

    /// Merged over the task environment
    #[serde(default)]
    pub(super) env: BTreeMap<String, String>,

    #[serde(default)]
    pub(super) suspend: Option<bool>,
}

const fn default_restart_policy() -> RestartPolicy {
    RestartPolicy::Never
}
const fn default_concurrency_policy() -> ConcurrencyPolicy {
    ConcurrencyPolicy::Forbid
}

#[derive(Error, Debug)]
pub enum ConfigParseError {
    #[error("task name must not be empty")]
    TaskNameEmpty,

    #[error("task '{task}' has no buckets defined")]
    NoBuckets { task: String },

    #[error("Bucket '{name}' must not contain '/' characters")]
    BucketIncludesSlash { name: String },
}

impl TryFrom<RawTaskConfig> for TaskConfig {
    type Error = ConfigParseError;
    fn try_from(raw: RawTaskConfig) -> Result<Self, Self::Error> {
        if raw.task.is_empty() {
            return Err(ConfigParseError::TaskNameEmpty);
        }
        if raw.buckets.is_empty() {
            return Err(ConfigParseError::NoBuckets { task: raw.task });
        }
        for name in raw.buckets.keys() {
            if name.contains('/') {
                return Err(ConfigParseError::BucketIncludesSlash { name: name.clone() });
            }
        }

        let image = match &raw.image_version {
            Some(version) => format!("{}:{}", raw.image, version),
            None => raw.image.clone(),
        };

        let jobs = raw
            .buckets
            .iter()
            .map(|(bucket_name, bucket)| {
                let mut env = raw.env.clone();
                env.extend(bucket.env.clone());
                JobDefinition {
                    name: format!("{}-{}", raw.task, bucket_name),
                    namespace: raw.namespace.clone(),
                    task_name: raw.task.clone(),
                    image: image.clone(),
                    schedule: bucket.schedule.clone(),
                    args: bucket.args.clone().unwrap_or_else(|| raw.args.clone()),
                    env,
                    restart_policy: raw.restart_policy,
                    concurrency_policy: raw.concurrency_policy,
                    suspend: bucket.suspend.or(raw.suspend),
                }
            })
            .collect();

        Ok(TaskConfig {
            task: raw.task,
            namespace: raw.namespace,
            jobs,
        })
    }
}
