use thiserror::Error;
use tracing_error::{ExtractSpanTrace, SpanTrace};

use crate::client::ClientError;
use crate::kubernetes_objects::cronjob::JobDefinition;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Failed to sync CronJob '{name}' into namespace '{namespace}': {source}")]
    CronJob {
        name: String,
        namespace: String,
        #[source]
        source: ClientError,
    },

    #[error("{} CronJobs failed to sync:{}", .0.len(), display_all(.0))]
    Multiple(Vec<SyncError>),
}

fn display_all(errors: &[SyncError]) -> String {
    errors.iter().map(|e| format!("\n  - {e}")).collect()
}

impl SyncError {
    pub(crate) fn cronjob(job: &JobDefinition, source: ClientError) -> Self {
        SyncError::CronJob {
            name: job.name.clone(),
            namespace: job.namespace.clone(),
            source,
        }
    }
}

impl ExtractSpanTrace for SyncError {
    fn span_trace(&self) -> Option<&SpanTrace> {
        match self {
            SyncError::CronJob { source, .. } => source.span_trace(),
            SyncError::Multiple(errors) => errors.first().and_then(|e| e.span_trace()),
        }
    }
}
