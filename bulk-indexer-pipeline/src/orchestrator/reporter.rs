/// Sink for the human-readable progress lines of a run.
///
/// Lines are complete and carry their own `[*]`, `[!]` or `[X]` marker.
pub trait ProgressReporter: Send + Sync {
    fn report(&self, line: &str);
}
