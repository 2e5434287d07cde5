use std::collections::{BTreeMap, HashMap};

use k8s_openapi::api::batch::v1::CronJob;
use tokio::sync::RwLock;
use tracing::{Level, instrument};

use super::{ClientError, CronJobClient};
use crate::error::SpannedExt;
use crate::kubernetes_objects::cronjob::{JobDefinition, cronjob_key};
use crate::kubernetes_objects::translate::{from_native, to_native};

/// [`CronJobClient`] that keeps translated CronJobs in a map keyed by
/// `<name>_<namespace>`.
///
/// Unlike the cluster API, `update` inserts missing entries, and `list` and
/// `delete` do nothing.
#[derive(Debug, Default)]
pub struct InMemoryCronJobClient {
    cronjobs: RwLock<HashMap<String, CronJob>>,
}

impl InMemoryCronJobClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a native resource as-is, keyed by its metadata.
    pub async fn insert_native(&self, cronjob: CronJob) {
        let key = cronjob_key(
            cronjob.metadata.name.as_deref().unwrap_or_default(),
            cronjob.metadata.namespace.as_deref().unwrap_or_default(),
        );
        self.cronjobs.write().await.insert(key, cronjob);
    }

    pub async fn stored(&self, namespace: &str, name: &str) -> Option<CronJob> {
        self.cronjobs
            .read()
            .await
            .get(&cronjob_key(name, namespace))
            .cloned()
    }

    pub async fn snapshot(&self) -> HashMap<String, CronJob> {
        self.cronjobs.read().await.clone()
    }

    pub async fn flush(&self) {
        self.cronjobs.write().await.clear();
    }
}

impl CronJobClient for InMemoryCronJobClient {
    #[instrument("create_cronjob", level = Level::TRACE, skip(self, job), fields(key = %job.key()))]
    async fn create(&self, job: &JobDefinition) -> Result<(), ClientError> {
        let mut cronjobs = self.cronjobs.write().await;
        let key = job.key();
        if cronjobs.contains_key(&key) {
            return Err(ClientError::already_exists(&job.name, &job.namespace));
        }
        cronjobs.insert(key, to_native(job));
        Ok(())
    }

    async fn list(
        &self,
        _namespace: &str,
        _labels: &BTreeMap<String, String>,
    ) -> Result<Vec<JobDefinition>, ClientError> {
        Ok(Vec::new())
    }

    #[instrument("get_cronjob", level = Level::TRACE, skip(self))]
    async fn get(&self, namespace: &str, name: &str) -> Result<JobDefinition, ClientError> {
        let cronjobs = self.cronjobs.read().await;
        let cronjob = cronjobs
            .get(&cronjob_key(name, namespace))
            .ok_or_else(|| ClientError::not_found(name, namespace))?;
        Ok(from_native(cronjob).with_span_trace()?)
    }

    #[instrument("update_cronjob", level = Level::TRACE, skip(self, job), fields(key = %job.key()))]
    async fn update(&self, job: &JobDefinition) -> Result<(), ClientError> {
        self.cronjobs.write().await.insert(job.key(), to_native(job));
        Ok(())
    }

    async fn delete(&self, _job: &JobDefinition) -> Result<(), ClientError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kubernetes_objects::cronjob::{ConcurrencyPolicy, RestartPolicy};
    use crate::kubernetes_objects::translate::standard_labels;

    fn job(schedule: &str) -> JobDefinition {
        JobDefinition {
            name: "testname".to_string(),
            namespace: "testnamespace".to_string(),
            task_name: "testtask".to_string(),
            image: "busybox:latest".to_string(),
            schedule: schedule.to_string(),
            args: vec!["ls".to_string()],
            env: BTreeMap::from([
                ("ENV".to_string(), "UAT".to_string()),
                ("TESTVAR".to_string(), "TESTVAL".to_string()),
            ]),
            restart_policy: RestartPolicy::Never,
            concurrency_policy: ConcurrencyPolicy::Forbid,
            suspend: None,
        }
    }

    #[tokio::test]
    async fn test_create_then_get() {
        let client = InMemoryCronJobClient::new();
        client.create(&job("*/1 * * * *")).await.unwrap();

        let stored = client.get("testnamespace", "testname").await.unwrap();
        assert_eq!(stored, job("*/1 * * * *"));
    }

    #[tokio::test]
    async fn test_create_existing_fails() {
        let client = InMemoryCronJobClient::new();
        client.create(&job("*/1 * * * *")).await.unwrap();

        let err = client.create(&job("*/5 * * * *")).await.unwrap_err();
        assert!(matches!(err, ClientError::AlreadyExists { .. }));
        assert_eq!(
            client.get("testnamespace", "testname").await.unwrap().schedule,
            "*/1 * * * *"
        );
    }

    #[tokio::test]
    async fn test_get_missing_fails() {
        let client = InMemoryCronJobClient::new();
        let err = client.get("testnamespace", "testname").await.unwrap_err();
        assert!(matches!(err, ClientError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_update_inserts_missing() {
        let client = InMemoryCronJobClient::new();
        client.update(&job("*/1 * * * *")).await.unwrap();
        assert_eq!(client.snapshot().await.len(), 1);
    }

    #[tokio::test]
    async fn test_create_or_update_is_idempotent() {
        let client = InMemoryCronJobClient::new();
        client.create_or_update(&job("*/1 * * * *")).await.unwrap();
        client.create_or_update(&job("*/1 * * * *")).await.unwrap();

        let cronjobs = client.snapshot().await;
        assert_eq!(cronjobs.len(), 1);
        assert!(cronjobs.contains_key("testname_testnamespace"));
        assert_eq!(
            client.get("testnamespace", "testname").await.unwrap(),
            job("*/1 * * * *")
        );
    }

    #[tokio::test]
    async fn test_create_or_update_overwrites_schedule() {
        let client = InMemoryCronJobClient::new();
        client.create(&job("*/1 * * * *")).await.unwrap();
        client.create_or_update(&job("*/10 * * * *")).await.unwrap();

        assert_eq!(client.snapshot().await.len(), 1);
        assert_eq!(
            client.get("testnamespace", "testname").await.unwrap().schedule,
            "*/10 * * * *"
        );
    }

    #[tokio::test]
    async fn test_update_replaces_foreign_labels() {
        let client = InMemoryCronJobClient::new();
        let mut cronjob = to_native(&job("*/1 * * * *"));
        if let Some(labels) = cronjob.metadata.labels.as_mut() {
            labels.insert("team".to_string(), "platform".to_string());
        }
        client.insert_native(cronjob).await;

        client.create_or_update(&job("*/1 * * * *")).await.unwrap();

        let stored = client.stored("testnamespace", "testname").await.unwrap();
        assert_eq!(
            stored.metadata.labels.unwrap(),
            standard_labels(&job("*/1 * * * *"))
        );
    }

    #[tokio::test]
    async fn test_malformed_entry_blocks_create_or_update() {
        let client = InMemoryCronJobClient::new();
        let mut cronjob = to_native(&job("*/1 * * * *"));
        cronjob.spec = None;
        client.insert_native(cronjob).await;

        let err = client.get("testnamespace", "testname").await.unwrap_err();
        assert!(matches!(err, ClientError::Translate(_)));

        // a failed read falls through to create, which finds the key taken
        let err = client
            .create_or_update(&job("*/1 * * * *"))
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::AlreadyExists { .. }));
    }

    #[tokio::test]
    async fn test_list_and_delete_are_noops() {
        let client = InMemoryCronJobClient::new();
        client.create(&job("*/1 * * * *")).await.unwrap();

        let listed = client
            .list("testnamespace", &standard_labels(&job("*/1 * * * *")))
            .await
            .unwrap();
        assert!(listed.is_empty());

        client.delete(&job("*/1 * * * *")).await.unwrap();
        assert_eq!(client.snapshot().await.len(), 1);

        client.flush().await;
        assert!(client.snapshot().await.is_empty());
    }
}
