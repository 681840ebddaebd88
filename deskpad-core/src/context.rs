//! Cancellation and per-call contexts
//!
//! Cancellation is cooperative. The deck stops its own loop when the token
//! fires, and screen handlers see the same token (plus a deadline) through
//! a [`KeyContext`]. Nothing is ever aborted from the outside; a handler
//! that ignores its context simply runs to completion.

use core::cell::RefCell;
use core::future::poll_fn;
use core::sync::atomic::{AtomicBool, Ordering};
use core::task::Poll;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex as BlockingMutex;
use embassy_sync::waitqueue::MultiWakerRegistration;
use embassy_time::{Duration, Instant};

/// Never set, backs contexts that are not tied to a token
static NEVER_CANCELLED: AtomicBool = AtomicBool::new(false);

/// Tasks that can wait on one token without waking each other
///
/// Past this many, registering a new waiter wakes the others so they
/// re-register; they still see the cancellation, just with extra polls.
pub const MAX_CANCEL_WAITERS: usize = 4;

/// Process-wide cancellation signal
pub struct CancelToken<M: RawMutex> {
    cancelled: AtomicBool,
    waiters: BlockingMutex<M, RefCell<MultiWakerRegistration<MAX_CANCEL_WAITERS>>>,
}

impl<M: RawMutex> Default for CancelToken<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: RawMutex> CancelToken<M> {
    /// Create a token that has not fired
    pub const fn new() -> Self {
        Self {
            cancelled: AtomicBool::new(false),
            waiters: BlockingMutex::new(RefCell::new(MultiWakerRegistration::new())),
        }
    }

    /// Fire the token. Idempotent.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
        self.waiters.lock(|waiters| waiters.borrow_mut().wake());
    }

    /// Check if the token has fired
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// Wait until the token fires
    ///
    /// Any number of tasks may wait at once, see [`MAX_CANCEL_WAITERS`].
    pub async fn cancelled(&self) {
        poll_fn(|cx| {
            if self.is_cancelled() {
                return Poll::Ready(());
            }
            self.waiters.lock(|waiters| waiters.borrow_mut().register(cx.waker()));
            // A cancel between the check and the registration woke nobody
            if self.is_cancelled() {
                Poll::Ready(())
            } else {
                Poll::Pending
            }
        })
        .await
    }

    /// Derive a context for one handler call, bounded by `timeout` from now
    pub fn context(&self, timeout: Duration) -> KeyContext<'_> {
        KeyContext {
            cancelled: &self.cancelled,
            deadline: Instant::now() + timeout,
        }
    }
}

/// Advisory context handed to a screen's press handler
///
/// Handlers doing slow collaborator calls should check
/// [`KeyContext::is_done`] between steps and give up early.
#[derive(Clone, Copy)]
pub struct KeyContext<'a> {
    cancelled: &'a AtomicBool,
    deadline: Instant,
}

impl KeyContext<'static> {
    /// Context with a deadline but no cancellation source
    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            cancelled: &NEVER_CANCELLED,
            deadline,
        }
    }
}

impl KeyContext<'_> {
    /// When the handler is expected to be finished
    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    /// Time left until the deadline, zero once it passed
    pub fn remaining(&self) -> Duration {
        self.deadline
            .checked_duration_since(Instant::now())
            .unwrap_or(Duration::from_ticks(0))
    }

    /// Check if the process-wide token fired
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// Check if the deadline passed
    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.deadline
    }

    /// Cancelled or expired: the handler should stop working
    pub fn is_done(&self) -> bool {
        self.is_cancelled() || self.is_expired()
    }
}

impl core::fmt::Debug for KeyContext<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("KeyContext")
            .field("cancelled", &self.is_cancelled())
            .field("deadline", &self.deadline)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::future::Future;
    use core::pin::pin;
    use core::sync::atomic::AtomicUsize;
    use core::task::Context;
    use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
    use std::sync::Arc;
    use std::task::{Wake, Waker};

    #[derive(Default)]
    struct CountingWaker(AtomicUsize);

    impl CountingWaker {
        fn wakes(&self) -> usize {
            self.0.load(Ordering::Acquire)
        }
    }

    impl Wake for CountingWaker {
        fn wake(self: Arc<Self>) {
            self.wake_by_ref();
        }

        fn wake_by_ref(self: &Arc<Self>) {
            self.0.fetch_add(1, Ordering::AcqRel);
        }
    }

    #[test]
    fn test_token_starts_clear() {
        let token: CancelToken<CriticalSectionRawMutex> = CancelToken::new();
        assert!(!token.is_cancelled());
        let ctx = token.context(Duration::from_secs(2));
        assert!(!ctx.is_cancelled());
        assert!(!ctx.is_done());
    }

    #[test]
    fn test_context_sees_later_cancellation() {
        let token: CancelToken<CriticalSectionRawMutex> = CancelToken::new();
        let ctx = token.context(Duration::from_secs(2));
        token.cancel();
        assert!(ctx.is_cancelled());
        assert!(ctx.is_done());
    }

    #[test]
    fn test_cancelled_returns_once_fired() {
        let token: CancelToken<CriticalSectionRawMutex> = CancelToken::new();
        token.cancel();
        token.cancel();
        embassy_futures::block_on(token.cancelled());
        assert!(token.is_cancelled());
    }

    #[test]
    fn test_waiters_do_not_wake_each_other() {
        let token: CancelToken<CriticalSectionRawMutex> = CancelToken::new();
        let counters: [Arc<CountingWaker>; 2] = Default::default();
        let wakers = counters.clone().map(Waker::from);

        let mut first = pin!(token.cancelled());
        let mut second = pin!(token.cancelled());
        let mut first_cx = Context::from_waker(&wakers[0]);
        let mut second_cx = Context::from_waker(&wakers[1]);

        for _ in 0..3 {
            assert!(first.as_mut().poll(&mut first_cx).is_pending());
            assert!(second.as_mut().poll(&mut second_cx).is_pending());
        }
        assert_eq!(counters[0].wakes(), 0);
        assert_eq!(counters[1].wakes(), 0);

        token.cancel();
        assert_eq!(counters[0].wakes(), 1);
        assert_eq!(counters[1].wakes(), 1);
        assert!(first.as_mut().poll(&mut first_cx).is_ready());
        assert!(second.as_mut().poll(&mut second_cx).is_ready());
    }

    #[test]
    fn test_many_waiters_all_finish() {
        let token: CancelToken<CriticalSectionRawMutex> = CancelToken::new();
        let waiters = MAX_CANCEL_WAITERS + 2;
        let done = AtomicUsize::new(0);

        std::thread::scope(|s| {
            for _ in 0..waiters {
                s.spawn(|| {
                    embassy_futures::block_on(token.cancelled());
                    done.fetch_add(1, Ordering::AcqRel);
                });
            }
            std::thread::sleep(std::time::Duration::from_millis(20));
            token.cancel();
        });

        assert_eq!(done.load(Ordering::Acquire), waiters);
    }

    #[test]
    fn test_expired_deadline() {
        let ctx = KeyContext::with_deadline(Instant::from_ticks(0));
        assert!(ctx.is_expired());
        assert!(ctx.is_done());
        assert!(!ctx.is_cancelled());
        assert_eq!(ctx.remaining(), Duration::from_ticks(0));
    }

    #[test]
    fn test_remaining_is_bounded_by_timeout() {
        let token: CancelToken<CriticalSectionRawMutex> = CancelToken::new();
        let ctx = token.context(Duration::from_secs(2));
        assert!(ctx.remaining() <= Duration::from_secs(2));
        assert!(!ctx.is_expired());
    }
}
