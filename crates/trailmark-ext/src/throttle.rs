//! Trailing-edge throttle that never drops the last value
//!
//! Every upstream item restarts a timer of `delay`. When the timer elapses
//! without a newer item, the most recent item is emitted. Once upstream
//! ends, an item still waiting on its timer is emitted after the delay and
//! then the stream ends. A source that never goes quiet for `delay` never
//! emits.

use std::future::Future;
use std::pin::Pin;
use std::task::{ready, Context, Poll};
use std::time::Duration;

use futures::Stream;
use pin_project::pin_project;
use tokio::time::{Instant, Sleep};

/// Upstream items read in one `poll_next` before yielding to the executor
const POLL_BUDGET: usize = 32;

/// Stream returned by [`ThrottleExt::guaranteed_throttle`]
///
/// Must be created inside a Tokio runtime with the time driver enabled.
#[pin_project]
#[must_use = "streams do nothing unless polled"]
pub struct GuaranteedThrottle<S: Stream> {
    #[pin]
    stream: S,
    #[pin]
    sleep: Sleep,
    pending: Option<S::Item>,
    delay: Duration,
    upstream_done: bool,
}

impl<S: Stream> GuaranteedThrottle<S> {
    pub fn new(stream: S, delay: Duration) -> Self {
        Self {
            stream,
            sleep: tokio::time::sleep(delay),
            pending: None,
            delay,
            upstream_done: false,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl<S: Stream> Stream for GuaranteedThrottle<S> {
    type Item = S::Item;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();

        // Newest item wins and pushes the deadline out.
        let mut budget = POLL_BUDGET;
        while !*this.upstream_done {
            if budget == 0 {
                // Upstream is still ready; reschedule instead of spinning.
                cx.waker().wake_by_ref();
                return Poll::Pending;
            }
            budget -= 1;
            match this.stream.as_mut().poll_next(cx) {
                Poll::Ready(Some(item)) => {
                    *this.pending = Some(item);
                    this.sleep.as_mut().reset(Instant::now() + *this.delay);
                }
                Poll::Ready(None) => *this.upstream_done = true,
                Poll::Pending => break,
            }
        }

        if this.pending.is_some() {
            ready!(this.sleep.as_mut().poll(cx));
            return Poll::Ready(this.pending.take());
        }

        if *this.upstream_done {
            Poll::Ready(None)
        } else {
            Poll::Pending
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let pending = usize::from(self.pending.is_some());
        let (_, upper) = self.stream.size_hint();
        (0, upper.map(|u| u.saturating_add(pending)))
    }
}

/// Adds [`guaranteed_throttle`](ThrottleExt::guaranteed_throttle) to every stream
pub trait ThrottleExt: Stream + Sized {
    fn guaranteed_throttle(self, delay: Duration) -> GuaranteedThrottle<Self> {
        GuaranteedThrottle::new(self, delay)
    }
}

impl<S: Stream> ThrottleExt for S {}

#[cfg(test)]
mod tests {
    use futures::channel::mpsc;
    use futures::StreamExt;
    use tokio::time::{sleep, timeout};

    use super::*;

    const DELAY: Duration = Duration::from_millis(500);

    #[tokio::test(start_paused = true)]
    async fn test_burst_emits_only_latest_after_quiet_period() {
        let (tx, rx) = mpsc::unbounded();
        let start = Instant::now();
        let throttled = rx.guaranteed_throttle(DELAY);
        tokio::pin!(throttled);

        tx.unbounded_send(1).unwrap();
        let producer = tokio::spawn(async move {
            sleep(Duration::from_millis(100)).await;
            tx.unbounded_send(2).unwrap();
            sleep(Duration::from_secs(1)).await;
        });

        assert_eq!(throttled.next().await, Some(2));
        assert!(start.elapsed() >= Duration::from_millis(600));

        assert_eq!(throttled.next().await, None);
        producer.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_item_emitted_once() {
        let (tx, rx) = mpsc::unbounded();
        let start = Instant::now();
        let throttled = rx.guaranteed_throttle(DELAY);
        tokio::pin!(throttled);

        tx.unbounded_send("refresh").unwrap();
        assert_eq!(throttled.next().await, Some("refresh"));
        assert!(start.elapsed() >= DELAY);

        drop(tx);
        assert_eq!(throttled.next().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pending_item_survives_upstream_completion() {
        let (tx, rx) = mpsc::unbounded();
        let start = Instant::now();
        let throttled = rx.guaranteed_throttle(DELAY);
        tokio::pin!(throttled);

        tx.unbounded_send(7).unwrap();
        drop(tx);

        assert_eq!(throttled.next().await, Some(7));
        assert!(start.elapsed() >= DELAY);
        assert_eq!(throttled.next().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_never_quiet_source_never_emits() {
        let (tx, rx) = mpsc::unbounded();
        let throttled = rx.guaranteed_throttle(DELAY);
        tokio::pin!(throttled);

        let producer = tokio::spawn(async move {
            for i in 0..20 {
                tx.unbounded_send(i).unwrap();
                sleep(Duration::from_millis(100)).await;
            }
            tx
        });

        // Items keep arriving every 100ms for two seconds.
        assert!(timeout(Duration::from_millis(1900), throttled.next())
            .await
            .is_err());

        let tx = producer.await.unwrap();
        assert_eq!(throttled.next().await, Some(19));
        drop(tx);
        assert_eq!(throttled.next().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_separate_bursts_each_emit_latest() {
        let (tx, rx) = mpsc::unbounded();
        let throttled = rx.guaranteed_throttle(DELAY);
        tokio::pin!(throttled);

        tx.unbounded_send("a1").unwrap();
        tx.unbounded_send("a2").unwrap();
        assert_eq!(throttled.next().await, Some("a2"));

        tx.unbounded_send("b1").unwrap();
        assert_eq!(throttled.next().await, Some("b1"));

        drop(tx);
        assert_eq!(throttled.next().await, None);
    }

    // Real clock: an always-ready source keeps the task runnable, so a paused
    // clock would never auto-advance.
    #[tokio::test]
    async fn test_always_ready_source_yields_to_timers() {
        let throttled = futures::stream::repeat(1u8).guaranteed_throttle(Duration::from_millis(10));
        tokio::pin!(throttled);

        let result = timeout(Duration::from_millis(50), throttled.next()).await;
        assert!(result.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_budget_exhaustion_keeps_latest_item() {
        let (tx, rx) = mpsc::unbounded();
        let throttled = rx.guaranteed_throttle(DELAY);
        tokio::pin!(throttled);

        for i in 0..(POLL_BUDGET * 3) {
            tx.unbounded_send(i).unwrap();
        }
        drop(tx);

        assert_eq!(throttled.next().await, Some(POLL_BUDGET * 3 - 1));
        assert_eq!(throttled.next().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_stream_ends_immediately() {
        let throttled = futures::stream::empty::<u32>().guaranteed_throttle(DELAY);
        tokio::pin!(throttled);
        assert_eq!(throttled.next().await, None);
    }
}
