use std::collections::BTreeMap;

use k8s_openapi::api::batch::v1::{CronJob, CronJobSpec, JobSpec, JobTemplateSpec};
use k8s_openapi::api::core::v1::{Container, EnvVar, PodSpec, PodTemplateSpec};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use thiserror::Error;

use super::cronjob::{ConcurrencyPolicy, JobDefinition, RestartPolicy};
use super::{
    FAILED_JOBS_HISTORY_LIMIT, LABEL_CREATED_BY, LABEL_NAME, LABEL_NAMESPACE, LABEL_TASK_NAME,
    MANAGER_NAME, SUCCESSFUL_JOBS_HISTORY_LIMIT,
};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TranslateError {
    #[error("CronJob '{name}' has no spec")]
    MissingSpec { name: String },

    #[error("CronJob '{name}' has no pod template spec")]
    MissingPodTemplate { name: String },

    #[error("CronJob '{name}' has no containers in its pod template")]
    NoContainers { name: String },

    #[error("CronJob '{name}' has unknown restart policy '{value}'")]
    UnknownRestartPolicy { name: String, value: String },

    #[error("CronJob '{name}' has unknown concurrency policy '{value}'")]
    UnknownConcurrencyPolicy { name: String, value: String },
}

/// Labels stamped on every CronJob we write.
///
/// Always rebuilt from the definition, so labels added to the live object by
/// anyone else are dropped on the next update.
pub fn standard_labels(job: &JobDefinition) -> BTreeMap<String, String> {
    BTreeMap::from([
        (LABEL_CREATED_BY.to_string(), MANAGER_NAME.to_string()),
        (LABEL_TASK_NAME.to_string(), job.task_name.clone()),
        (LABEL_NAME.to_string(), job.name.clone()),
        (LABEL_NAMESPACE.to_string(), job.namespace.clone()),
    ])
}

pub fn to_native(job: &JobDefinition) -> CronJob {
    let env: Vec<EnvVar> = job
        .env
        .iter()
        .map(|(name, value)| EnvVar {
            name: name.clone(),
            value: Some(value.clone()),
            ..Default::default()
        })
        .collect();

    let container = Container {
        name: job.name.clone(),
        image: Some(job.image.clone()),
        args: (!job.args.is_empty()).then(|| job.args.clone()),
        env: (!env.is_empty()).then_some(env),
        ..Default::default()
    };

    let pod_spec = PodSpec {
        containers: vec![container],
        restart_policy: Some(job.restart_policy.as_str().to_string()),
        ..Default::default()
    };

    CronJob {
        metadata: ObjectMeta {
            name: Some(job.name.clone()),
            namespace: Some(job.namespace.clone()),
            labels: Some(standard_labels(job)),
            ..Default::default()
        },
        spec: Some(CronJobSpec {
            schedule: job.schedule.clone(),
            suspend: job.suspend,
            concurrency_policy: Some(job.concurrency_policy.as_str().to_string()),
            successful_jobs_history_limit: Some(SUCCESSFUL_JOBS_HISTORY_LIMIT),
            failed_jobs_history_limit: Some(FAILED_JOBS_HISTORY_LIMIT),
            job_template: JobTemplateSpec {
                spec: Some(JobSpec {
                    template: PodTemplateSpec {
                        spec: Some(pod_spec),
                        ..Default::default()
                    },
                    ..Default::default()
                }),
                ..Default::default()
            },
            ..Default::default()
        }),
        ..Default::default()
    }
}

pub fn from_native(cronjob: &CronJob) -> Result<JobDefinition, TranslateError> {
    let metadata = &cronjob.metadata;
    let name = metadata.name.clone().unwrap_or_default();
    let namespace = metadata.namespace.clone().unwrap_or_default();

    let spec = cronjob
        .spec
        .as_ref()
        .ok_or_else(|| TranslateError::MissingSpec { name: name.clone() })?;

    let pod_spec = spec
        .job_template
        .spec
        .as_ref()
        .and_then(|job| job.template.spec.as_ref())
        .ok_or_else(|| TranslateError::MissingPodTemplate { name: name.clone() })?;

    let container = pod_spec
        .containers
        .first()
        .ok_or_else(|| TranslateError::NoContainers { name: name.clone() })?;

    // Absent policies read as the API server defaults.
    let restart_policy = match pod_spec.restart_policy.as_deref() {
        None => RestartPolicy::Always,
        Some(value) => RestartPolicy::parse(value).ok_or_else(|| {
            TranslateError::UnknownRestartPolicy {
                name: name.clone(),
                value: value.to_string(),
            }
        })?,
    };
    let concurrency_policy = match spec.concurrency_policy.as_deref() {
        None => ConcurrencyPolicy::Allow,
        Some(value) => ConcurrencyPolicy::parse(value).ok_or_else(|| {
            TranslateError::UnknownConcurrencyPolicy {
                name: name.clone(),
                value: value.to_string(),
            }
        })?,
    };

    let env = container
        .env
        .iter()
        .flatten()
        .map(|var| (var.name.clone(), var.value.clone().unwrap_or_default()))
        .collect();

    let task_name = metadata
        .labels
        .as_ref()
        .and_then(|labels| labels.get(LABEL_TASK_NAME))
        .cloned()
        .unwrap_or_default();

    Ok(JobDefinition {
        name,
        namespace,
        task_name,
        image: container.image.clone().unwrap_or_default(),
        schedule: spec.schedule.clone(),
        args: container.args.clone().unwrap_or_default(),
        env,
        restart_policy,
        concurrency_policy,
        suspend: spec.suspend,
    })
}
