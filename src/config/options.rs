/// Per-run switches for a sync pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Options {
    /// Emit trace diagnostics for every CronJob synced
    pub debug: bool,

    /// Keep going after a CronJob fails to sync
    pub ignore_errors: bool,

    /// With `ignore_errors`, report every failure instead of only the last one
    pub collect_errors: bool,
}
