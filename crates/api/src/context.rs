//! Per-call cancellation and deadline.

use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;

/// Cancellation signal and optional deadline for one or more requests.
///
/// Cheap to clone; clones share the same token. Passing the same context to
/// several concurrent calls cancels all of them together.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    cancel: CancellationToken,
    deadline: Option<Instant>,
}

impl RequestContext {
    /// A context that is never cancelled and has no deadline.
    pub fn background() -> Self {
        Self::default()
    }

    /// A context that expires `timeout` from now.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::background().deadline_in(timeout)
    }

    /// A context that expires at `deadline`.
    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            cancel: CancellationToken::new(),
            deadline: Some(deadline),
        }
    }

    /// A context driven by an externally owned cancellation token.
    pub fn with_cancellation(token: CancellationToken) -> Self {
        Self {
            cancel: token,
            deadline: None,
        }
    }

    /// Tightens the deadline to at most `timeout` from now.
    pub fn deadline_in(mut self, timeout: Duration) -> Self {
        let candidate = Instant::now() + timeout;
        self.deadline = Some(match self.deadline {
            Some(existing) if existing < candidate => existing,
            _ => candidate,
        });
        self
    }

    /// Derives a context that is cancelled whenever `self` is, and that can
    /// also be cancelled on its own without affecting `self`.
    pub fn child(&self) -> Self {
        Self {
            cancel: self.cancel.child_token(),
            deadline: self.deadline,
        }
    }

    /// Cancels every request using this context (and its children).
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Returns `true` once [`RequestContext::cancel`] has been called on this
    /// context or a parent.
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Returns the deadline, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns `true` if the deadline has passed.
    pub fn is_expired(&self) -> bool {
        self.deadline.is_some_and(|deadline| Instant::now() >= deadline)
    }

    /// Returns the underlying token, for use in `tokio::select!`.
    pub fn token(&self) -> &CancellationToken {
        &self.cancel
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn child_is_cancelled_with_parent_but_not_vice_versa() {
        let parent = RequestContext::background();
        let child = parent.child();
        child.cancel();
        assert!(!parent.is_cancelled());

        let other = parent.child();
        parent.cancel();
        assert!(other.is_cancelled());
    }

    #[test]
    fn deadline_only_ever_tightens() {
        let ctx = RequestContext::with_timeout(Duration::from_millis(10));
        let first = ctx.deadline().unwrap();
        let ctx = ctx.deadline_in(Duration::from_secs(60));
        assert_eq!(ctx.deadline(), Some(first));
    }

    #[test]
    fn zero_timeout_is_immediately_expired() {
        let ctx = RequestContext::with_timeout(Duration::ZERO);
        assert!(ctx.is_expired());
        assert!(!RequestContext::background().is_expired());
    }
}
