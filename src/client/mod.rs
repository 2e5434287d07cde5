pub mod kubernetes;
pub mod memory;

use std::collections::BTreeMap;
use std::future::Future;

use thiserror::Error;
use tracing_error::{ExtractSpanTrace, SpanTrace};

use crate::error::SpannedErr;
use crate::kubernetes_objects::cronjob::JobDefinition;
use crate::kubernetes_objects::translate::TranslateError;

pub use self::kubernetes::KubeCronJobClient;
pub use self::memory::InMemoryCronJobClient;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("CronJob '{name}' already exists in namespace '{namespace}'")]
    AlreadyExists {
        name: String,
        namespace: String,
        span_trace: SpanTrace,
    },

    #[error("CronJob '{name}' does not exist in namespace '{namespace}'")]
    NotFound {
        name: String,
        namespace: String,
        span_trace: SpanTrace,
    },

    #[error("Malformed CronJob: {0}")]
    Translate(#[from] SpannedErr<TranslateError>),

    #[error("Kubernetes client error: {0}")]
    KubeClient(#[from] SpannedErr<kube::Error>),
}

impl ClientError {
    pub(crate) fn already_exists(name: &str, namespace: &str) -> Self {
        ClientError::AlreadyExists {
            name: name.to_string(),
            namespace: namespace.to_string(),
            span_trace: SpanTrace::capture(),
        }
    }

    pub(crate) fn not_found(name: &str, namespace: &str) -> Self {
        ClientError::NotFound {
            name: name.to_string(),
            namespace: namespace.to_string(),
            span_trace: SpanTrace::capture(),
        }
    }
}

impl ExtractSpanTrace for ClientError {
    fn span_trace(&self) -> Option<&SpanTrace> {
        match self {
            ClientError::AlreadyExists { span_trace, .. } => Some(span_trace),
            ClientError::NotFound { span_trace, .. } => Some(span_trace),
            ClientError::Translate(e) => e.span_trace(),
            ClientError::KubeClient(e) => e.span_trace(),
        }
    }
}

/// CronJob operations against some backing store, in terms of [`JobDefinition`].
///
/// Implementations translate to and from the native resource internally.
pub trait CronJobClient: Send + Sync {
    fn create(&self, job: &JobDefinition) -> impl Future<Output = Result<(), ClientError>> + Send;

    /// Lists CronJobs in `namespace` matching every `key=value` pair in `labels`.
    fn list(
        &self,
        namespace: &str,
        labels: &BTreeMap<String, String>,
    ) -> impl Future<Output = Result<Vec<JobDefinition>, ClientError>> + Send;

    fn get(
        &self,
        namespace: &str,
        name: &str,
    ) -> impl Future<Output = Result<JobDefinition, ClientError>> + Send;

    fn update(&self, job: &JobDefinition) -> impl Future<Output = Result<(), ClientError>> + Send;

    fn delete(&self, job: &JobDefinition) -> impl Future<Output = Result<(), ClientError>> + Send;

    /// Updates the CronJob if a read of it succeeds, creates it otherwise.
    ///
    /// Any read failure, not only "not found", falls through to `create`.
    fn create_or_update(
        &self,
        job: &JobDefinition,
    ) -> impl Future<Output = Result<(), ClientError>> + Send {
        async move {
            match self.get(&job.namespace, &job.name).await {
                Ok(_) => self.update(job).await,
                Err(_) => self.create(job).await,
            }
        }
    }
}
