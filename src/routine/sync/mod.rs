pub mod error;

use tracing::{info, instrument, trace};

use crate::client::CronJobClient;
use crate::config::options::Options;
use crate::kubernetes_objects::cronjob::JobDefinition;

use self::error::SyncError;

macro_rules! debug_trace {
    ($options:expr, $($arg:tt)+) => {
        if $options.debug {
            trace!($($arg)+);
        }
    };
}

/// Applies desired CronJobs one at a time through a [`CronJobClient`].
pub struct Reconciler<C> {
    options: Options,
    client: C,
}

impl<C: CronJobClient> Reconciler<C> {
    pub fn new(options: Options, client: C) -> Reconciler<C> {
        Reconciler { options, client }
    }

    #[cfg(test)]
    pub(crate) fn client(&self) -> &C {
        &self.client
    }

    /// Creates or updates every job in order.
    ///
    /// Without `ignore_errors` the first failure ends the pass. With it, the
    /// pass runs to the end and returns the last failure, or all of them when
    /// `collect_errors` is also set.
    #[instrument("sync", skip(self, jobs, task), fields(task = %task, cronjobs = jobs.len()))]
    pub async fn sync(&self, jobs: &[JobDefinition], task: &str) -> Result<(), SyncError> {
        debug_trace!(self.options, "Syncing {} CronJobs", jobs.len());

        let mut last_error = None;
        let mut errors = Vec::new();
        let mut synced = 0usize;

        for job in jobs {
            debug_trace!(
                self.options,
                "Syncing CronJob {} into Namespace {}",
                job.name,
                job.namespace
            );

            if let Err(e) = self.client.create_or_update(job).await {
                debug_trace!(
                    self.options,
                    "Error Syncing CronJob {} into Namespace {}, Error Message: {}",
                    job.name,
                    job.namespace,
                    e
                );
                let err = SyncError::cronjob(job, e);
                if !self.options.ignore_errors {
                    debug_trace!(self.options, "Ending Sync..");
                    return Err(err);
                }
                if self.options.collect_errors {
                    errors.push(err);
                } else {
                    last_error = Some(err);
                }
                continue;
            }

            synced += 1;
            debug_trace!(
                self.options,
                "Successfully Synced CronJob {} into Namespace {}",
                job.name,
                job.namespace
            );
        }

        info!("Synced {synced} of {} CronJobs for task '{task}'.", jobs.len());

        if !errors.is_empty() {
            return Err(SyncError::Multiple(errors));
        }
        match last_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}
