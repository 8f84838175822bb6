//! Attempt/error bookkeeping for one logical run of an operation
//!
//! An [`Execution`] is returned by every run instead of being accumulated on
//! a long-lived command value, so reusing an invocation never mixes the
//! history of independent runs.

/// Outcome of running an operation one or more times
#[derive(Debug)]
pub struct Execution<T, E> {
    failures: Vec<E>,
    last: Result<T, E>,
}

impl<T, E> Execution<T, E> {
    /// Execution consisting of a single attempt
    pub fn single(result: Result<T, E>) -> Self {
        Self {
            failures: Vec::new(),
            last: result,
        }
    }

    /// Execution whose last attempt produced `last`, preceded by `failures`
    pub(crate) fn from_attempts(failures: Vec<E>, last: Result<T, E>) -> Self {
        Self { failures, last }
    }

    /// Number of times the operation was executed
    pub fn attempts(&self) -> usize {
        self.failures.len() + 1
    }

    /// Every error produced, oldest first
    pub fn errors(&self) -> impl Iterator<Item = &E> {
        self.failures.iter().chain(self.last.as_ref().err())
    }

    pub fn error_count(&self) -> usize {
        self.failures.len() + usize::from(self.last.is_err())
    }

    /// Whether any attempt produced an error
    pub fn did_error(&self) -> bool {
        self.error_count() > 0
    }

    /// Whether the operation errored on every attempt
    pub fn did_fail(&self) -> bool {
        self.error_count() == self.attempts()
    }

    /// The most recent error, if any
    pub fn last_error(&self) -> Option<&E> {
        self.last.as_ref().err().or_else(|| self.failures.last())
    }

    /// Output of the successful attempt
    pub fn output(&self) -> Option<&T> {
        self.last.as_ref().ok()
    }

    /// Successful output, or the last attempt's error
    pub fn into_result(self) -> Result<T, E> {
        self.last
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_success() {
        let execution: Execution<&str, String> = Execution::single(Ok("done"));
        assert_eq!(execution.attempts(), 1);
        assert!(!execution.did_error());
        assert!(!execution.did_fail());
        assert_eq!(execution.output(), Some(&"done"));
        assert!(execution.last_error().is_none());
    }

    #[test]
    fn test_failed_on_every_attempt() {
        let execution: Execution<&str, String> = Execution::from_attempts(
            vec!["first".to_string(), "second".to_string()],
            Err("third".to_string()),
        );
        assert_eq!(execution.attempts(), 3);
        assert!(execution.did_error());
        assert!(execution.did_fail());
        assert_eq!(execution.last_error().map(String::as_str), Some("third"));
        let errors: Vec<&String> = execution.errors().collect();
        assert_eq!(errors, vec!["first", "second", "third"]);
        assert_eq!(execution.into_result(), Err("third".to_string()));
    }

    #[test]
    fn test_success_after_failures() {
        let execution: Execution<&str, String> =
            Execution::from_attempts(vec!["flaky".to_string()], Ok("done"));
        assert_eq!(execution.attempts(), 2);
        assert_eq!(execution.error_count(), 1);
        assert!(execution.did_error());
        assert!(!execution.did_fail());
        assert_eq!(execution.last_error().map(String::as_str), Some("flaky"));
        assert_eq!(execution.into_result(), Ok("done"));
    }
}
