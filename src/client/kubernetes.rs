use std::collections::BTreeMap;

use k8s_openapi::api::batch::v1::CronJob;
use kube::api::{DeleteParams, ListParams, PostParams};
use kube::core::Selector;
use kube::{Api, Client};
use tracing::{Level, debug, instrument};

use super::{ClientError, CronJobClient};
use crate::error::SpannedExt;
use crate::kubernetes_objects::MANAGER_NAME;
use crate::kubernetes_objects::cronjob::JobDefinition;
use crate::kubernetes_objects::translate::{from_native, to_native};

/// [`CronJobClient`] backed by the `batch/v1` CronJob API of a live cluster.
#[derive(Clone)]
pub struct KubeCronJobClient {
    client: Client,
}

impl KubeCronJobClient {
    pub fn new(client: Client) -> Self {
        KubeCronJobClient { client }
    }

    fn api(&self, namespace: &str) -> Api<CronJob> {
        Api::namespaced(self.client.clone(), namespace)
    }

    fn post_params() -> PostParams {
        PostParams {
            field_manager: Some(MANAGER_NAME.to_string()),
            ..Default::default()
        }
    }
}

/// ANDs every `key=value` pair; an empty map selects everything.
fn label_selector(labels: &BTreeMap<String, String>) -> Selector {
    labels.clone().into_iter().collect()
}

impl CronJobClient for KubeCronJobClient {
    #[instrument(
        "create_cronjob",
        level = Level::TRACE,
        skip(self, job),
        fields(kubernetes_namespace = %job.namespace, cronjob_name = %job.name)
    )]
    async fn create(&self, job: &JobDefinition) -> Result<(), ClientError> {
        self.api(&job.namespace)
            .create(&Self::post_params(), &to_native(job))
            .await
            .with_span_trace()?;
        debug!("CronJob '{}' created.", job.name);
        Ok(())
    }

    #[instrument(
        "list_cronjobs",
        level = Level::TRACE,
        skip(self),
        fields(kubernetes_namespace = %namespace)
    )]
    async fn list(
        &self,
        namespace: &str,
        labels: &BTreeMap<String, String>,
    ) -> Result<Vec<JobDefinition>, ClientError> {
        let params = ListParams::default().labels_from(&label_selector(labels));

        let cronjobs = self.api(namespace).list(&params).await.with_span_trace()?;

        cronjobs
            .items
            .iter()
            .map(|cronjob| from_native(cronjob).with_span_trace().map_err(ClientError::from))
            .collect()
    }

    #[instrument(
        "get_cronjob",
        level = Level::TRACE,
        skip(self),
        fields(kubernetes_namespace = %namespace, cronjob_name = %name)
    )]
    async fn get(&self, namespace: &str, name: &str) -> Result<JobDefinition, ClientError> {
        let cronjob = self.api(namespace).get(name).await.with_span_trace()?;
        Ok(from_native(&cronjob).with_span_trace()?)
    }

    /// Replaces the live object without a resource version, so a concurrent
    /// writer's changes are overwritten.
    #[instrument(
        "update_cronjob",
        level = Level::TRACE,
        skip(self, job),
        fields(kubernetes_namespace = %job.namespace, cronjob_name = %job.name)
    )]
    async fn update(&self, job: &JobDefinition) -> Result<(), ClientError> {
        self.api(&job.namespace)
            .replace(&job.name, &Self::post_params(), &to_native(job))
            .await
            .with_span_trace()?;
        debug!("CronJob '{}' updated.", job.name);
        Ok(())
    }

    #[instrument(
        "delete_cronjob",
        level = Level::TRACE,
        skip(self, job),
        fields(kubernetes_namespace = %job.namespace, cronjob_name = %job.name)
    )]
    async fn delete(&self, job: &JobDefinition) -> Result<(), ClientError> {
        self.api(&job.namespace)
            .delete(&job.name, &DeleteParams::default())
            .await
            .with_span_trace()?;
        debug!("CronJob '{}' deleted.", job.name);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kube::core::SelectorExt;

    #[test]
    fn test_label_selector_matches_every_pair() {
        let labels = BTreeMap::from([
            ("created-by".to_string(), "taskmaster".to_string()),
            ("task-name".to_string(), "backup".to_string()),
        ]);
        let selector = label_selector(&labels);
        assert_eq!(
            selector.to_string(),
            "created-by=taskmaster,task-name=backup"
        );
        assert!(selector.matches(&labels));

        let other_task = BTreeMap::from([
            ("created-by".to_string(), "taskmaster".to_string()),
            ("task-name".to_string(), "report".to_string()),
        ]);
        assert!(!selector.matches(&other_task));
    }

    #[test]
    fn test_empty_label_selector_selects_all() {
        let selector = label_selector(&BTreeMap::new());
        assert!(selector.selects_all());
        assert_eq!(
            ListParams::default()
                .labels_from(&selector)
                .label_selector
                .as_deref(),
            Some("")
        );
    }
}
