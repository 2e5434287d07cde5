use std::collections::BTreeMap;

use self::cli::{Cli, SubCommands};
use self::client::{ClientError, CronJobClient, KubeCronJobClient};
use self::config::TaskConfig;
use self::config::options::Options;
use self::kubernetes_objects::{LABEL_CREATED_BY, LABEL_TASK_NAME, MANAGER_NAME};
use self::routine::sync::Reconciler;
use self::routine::sync::error::SyncError;
use thiserror::Error;
use tracing::info;
use tracing_error::ExtractSpanTrace;
use tracing_error::SpanTrace;

pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod kubernetes_objects;
pub mod routine;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Failed to load config.\n{0}")]
    ConfigError(#[from] config::ConfigLoadError),

    #[error("Failed to initialize kubernetes client.\n{0}")]
    KubeClientError(#[from] kube::Error),

    #[error("Sync stopped due to following error:\n{0}")]
    SyncError(#[from] SyncError),

    #[error("Failed to list CronJobs.\n{0}")]
    ListError(#[from] ClientError),
}

impl ExtractSpanTrace for AppError {
    fn span_trace(&self) -> Option<&SpanTrace> {
        match self {
            AppError::SyncError(e) => e.span_trace(),
            AppError::ListError(e) => e.span_trace(),
            _ => None,
        }
    }
}

pub async fn app(cli: Cli) -> Result<(), AppError> {
    match cli.subcommand {
        SubCommands::Sync {
            ignore_errors,
            collect_errors,
        } => {
            let config = TaskConfig::new_from_file(&cli.config).await?;

            info!("Config Loaded.");

            let client = kube::Client::try_default().await?;

            info!("Kubernetes Client Initialized.");

            let options = Options {
                debug: cli.debug,
                ignore_errors,
                collect_errors,
            };
            let reconciler = Reconciler::new(options, KubeCronJobClient::new(client));
            reconciler.sync(&config.jobs, &config.task).await?;
        }
        SubCommands::List { namespace, task } => {
            let namespace = match namespace {
                Some(namespace) => namespace,
                None => TaskConfig::new_from_file(&cli.config).await?.namespace,
            };

            let client = KubeCronJobClient::new(kube::Client::try_default().await?);

            let mut labels = BTreeMap::from([(
                LABEL_CREATED_BY.to_string(),
                MANAGER_NAME.to_string(),
            )]);
            if let Some(task) = task {
                labels.insert(LABEL_TASK_NAME.to_string(), task);
            }

            let cronjobs = client.list(&namespace, &labels).await?;
            info!(
                "Found {} CronJobs in namespace '{}'.",
                cronjobs.len(),
                namespace
            );
            for cronjob in cronjobs {
                info!(
                    "{} (task: {}, schedule: '{}', image: {}, suspend: {:?})",
                    cronjob.name,
                    cronjob.task_name,
                    cronjob.schedule,
                    cronjob.image,
                    cronjob.suspend
                );
            }
        }
    }

    Ok(())
}
