pub mod options;
mod raw;

use std::path::Path;

use thiserror::Error;

use self::raw::RawTaskConfig;
use crate::kubernetes_objects::cronjob::JobDefinition;

pub use self::raw::ConfigParseError;

/// A task and the CronJobs built from its buckets.
#[derive(Debug, Clone)]
pub struct TaskConfig {
    pub task: String,
    pub namespace: String,
    pub jobs: Vec<JobDefinition>,
}

#[derive(Error, Debug)]
pub enum ConfigLoadError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid config: {0}")]
    Invalid(#[from] ConfigParseError),
}

impl TaskConfig {
    pub async fn new_from_file(path: &Path) -> Result<Self, ConfigLoadError> {
        let contents = tokio::fs::read_to_string(path).await?;
        let raw: RawTaskConfig = serde_yaml::from_str(&contents)?;
        Ok(TaskConfig::try_from(raw)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_new_from_file() {
        let path = std::env::temp_dir().join(format!(
            "taskmaster-config-{}.yaml",
            std::process::id()
        ));
        tokio::fs::write(
            &path,
            r#"
task: report
namespace: jobs
image: busybox:latest
buckets:
  hourly:
    schedule: "0 * * * *"
"#,
        )
        .await
        .unwrap();

        let config = TaskConfig::new_from_file(&path).await;
        tokio::fs::remove_file(&path).await.unwrap();

        let config = config.unwrap();
        assert_eq!(config.task, "report");
        assert_eq!(config.jobs.len(), 1);
        assert_eq!(config.jobs[0].name, "report-hourly");
        assert_eq!(config.jobs[0].image, "busybox:latest");
    }

    #[tokio::test]
    async fn test_new_from_missing_file() {
        let path = std::env::temp_dir().join("taskmaster-config-does-not-exist.yaml");
        assert!(matches!(
            TaskConfig::new_from_file(&path).await,
            Err(ConfigLoadError::Io(_))
        ));
    }
}
