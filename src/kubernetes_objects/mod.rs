pub mod cronjob;
pub mod translate;

/// Field manager and `created-by` label value for every resource we write.
pub const MANAGER_NAME: &str = "taskmaster";

pub const LABEL_CREATED_BY: &str = "created-by";
pub const LABEL_TASK_NAME: &str = "task-name";
pub const LABEL_NAME: &str = "name";
pub const LABEL_NAMESPACE: &str = "namespace";

pub(crate) const SUCCESSFUL_JOBS_HISTORY_LIMIT: i32 = 3;
pub(crate) const FAILED_JOBS_HISTORY_LIMIT: i32 = 3;
