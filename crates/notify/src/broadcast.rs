use std::{future::Future, sync::Arc, time::Duration};

use {tokio::task::JoinHandle, tracing::warn};

use crate::{
    event::ResultEvent,
    registry::{DeliveryOutcome, NotifyRegistry},
};

/// Bounded retry budget for delivering one event to one channel.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl RetryPolicy {
    /// Plain text echoes: 3 attempts, 5 s apart.
    pub const TEXT: Self = Self {
        max_attempts: 3,
        delay: Duration::from_secs(5),
    };

    /// Result payloads: 2 attempts, 1 s apart. Result announcements are
    /// latency-sensitive, so the budget is shorter.
    pub const RICH: Self = Self {
        max_attempts: 2,
        delay: Duration::from_secs(1),
    };
}

/// Completion summary for callers that join a broadcast.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    pub delivered: usize,
    pub failed: usize,
}

/// Fans one event out to every forwarder of a registry.
///
/// Each channel gets its own spawned task with independent retry state, so
/// a failure on one channel cannot prevent, delay, or corrupt delivery to
/// any other. Producers use the fire-and-forget methods; the `_joined`
/// variants fan the tasks back in for the few callers that want a
/// [`BroadcastReport`].
#[derive(Clone)]
pub struct Broadcaster {
    registry: Arc<NotifyRegistry>,
    text_retry: RetryPolicy,
    rich_retry: RetryPolicy,
}

impl Broadcaster {
    pub fn new(registry: Arc<NotifyRegistry>) -> Self {
        Self::with_policies(registry, RetryPolicy::TEXT, RetryPolicy::RICH)
    }

    pub fn with_policies(
        registry: Arc<NotifyRegistry>,
        text_retry: RetryPolicy,
        rich_retry: RetryPolicy,
    ) -> Self {
        Self {
            registry,
            text_retry,
            rich_retry,
        }
    }

    pub fn registry(&self) -> &Arc<NotifyRegistry> {
        &self.registry
    }

    /// Broadcast a plain text message, fire-and-forget.
    pub fn echo(&self, text: impl Into<String>) {
        // Dropping the handles detaches the tasks; they run to completion
        // on the runtime.
        let _ = self.spawn_text(Arc::from(text.into()));
    }

    /// Broadcast a plain text message and wait for every channel to
    /// succeed or exhaust its retries.
    pub async fn echo_joined(&self, text: impl Into<String>) -> BroadcastReport {
        join(self.spawn_text(Arc::from(text.into()))).await
    }

    /// Broadcast a result payload, fire-and-forget.
    pub fn announce_result(&self, event: ResultEvent) {
        let _ = self.spawn_rich(Arc::new(event));
    }

    /// Broadcast a result payload and wait for every channel to succeed
    /// or exhaust its retries.
    pub async fn announce_result_joined(&self, event: ResultEvent) -> BroadcastReport {
        join(self.spawn_rich(Arc::new(event))).await
    }

    fn spawn_text(&self, text: Arc<str>) -> Vec<JoinHandle<bool>> {
        self.registry
            .text_forwarders()
            .into_iter()
            .map(|forwarder| {
                let registry = Arc::clone(&self.registry);
                let text = Arc::clone(&text);
                let policy = self.text_retry;
                tokio::spawn(async move {
                    deliver_with_retry(&forwarder.channel_id, "echo", policy, &registry, || {
                        let sink = Arc::clone(&forwarder.sink);
                        let text = Arc::clone(&text);
                        async move { sink.send_text(&text).await }
                    })
                    .await
                })
            })
            .collect()
    }

    fn spawn_rich(&self, event: Arc<ResultEvent>) -> Vec<JoinHandle<bool>> {
        self.registry
            .rich_forwarders()
            .into_iter()
            .map(|forwarder| {
                let registry = Arc::clone(&self.registry);
                let event = Arc::clone(&event);
                let policy = self.rich_retry;
                tokio::spawn(async move {
                    deliver_with_retry(&forwarder.channel_id, "result", policy, &registry, || {
                        let sink = Arc::clone(&forwarder.sink);
                        let event = Arc::clone(&event);
                        async move { sink.send_rich(event.file_upload(), &event.embed).await }
                    })
                    .await
                })
            })
            .collect()
    }
}

/// Run one channel's delivery attempts until success or exhaustion.
///
/// Exhaustion is logged and recorded in the registry's diagnostic cache,
/// never propagated: the producer already moved on.
async fn deliver_with_retry<F, Fut>(
    channel_id: &str,
    what: &'static str,
    policy: RetryPolicy,
    registry: &NotifyRegistry,
    mut send: F,
) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = anyhow::Result<()>>,
{
    let mut attempts = 0u32;
    loop {
        attempts += 1;
        match send().await {
            Ok(()) => {
                registry.record_delivery(channel_id, DeliveryOutcome::Delivered { attempts });
                return true;
            },
            Err(err) => {
                if attempts >= policy.max_attempts {
                    warn!(
                        channel = channel_id,
                        what,
                        attempts,
                        error = %err,
                        "delivery failed permanently, dropping event"
                    );
                    registry.record_delivery(channel_id, DeliveryOutcome::Failed {
                        attempts,
                        error: err.to_string(),
                    });
                    return false;
                }
                warn!(
                    channel = channel_id,
                    what,
                    attempt = attempts,
                    max_attempts = policy.max_attempts,
                    error = %err,
                    "delivery failed, waiting before retry"
                );
                tokio::time::sleep(policy.delay).await;
            },
        }
    }
}

async fn join(handles: Vec<JoinHandle<bool>>) -> BroadcastReport {
    let mut report = BroadcastReport::default();
    for handle in handles {
        match handle.await {
            Ok(true) => report.delivered += 1,
            Ok(false) => report.failed += 1,
            Err(err) => {
                warn!(error = %err, "delivery task aborted");
                report.failed += 1;
            },
        }
    }
    report
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use std::sync::{
        Mutex,
        atomic::{AtomicU32, Ordering},
    };

    use {anyhow::Result, async_trait::async_trait, tokio::time::Instant};

    use super::*;
    use crate::{
        event::{Attachment, EmbedSpec},
        registry::{RegisterOutcome, UnregisterOutcome},
        sink::{RichSink, TextSink},
    };

    #[derive(Default)]
    struct ProbeSink {
        fail: bool,
        attempts: AtomicU32,
        completed_at: Mutex<Option<Instant>>,
        saw_file: Mutex<Option<bool>>,
    }

    impl ProbeSink {
        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }

        fn attempts(&self) -> u32 {
            self.attempts.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl TextSink for ProbeSink {
        async fn send_text(&self, _text: &str) -> Result<()> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                anyhow::bail!("send rejected");
            }
            *self.completed_at.lock().unwrap() = Some(Instant::now());
            Ok(())
        }
    }

    #[async_trait]
    impl RichSink for ProbeSink {
        async fn send_rich(&self, file: Option<&Attachment>, _embed: &EmbedSpec) -> Result<()> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            *self.saw_file.lock().unwrap() = Some(file.is_some());
            if self.fail {
                anyhow::bail!("send rejected");
            }
            Ok(())
        }
    }

    fn setup(sinks: &[(&str, Arc<ProbeSink>)]) -> Broadcaster {
        let registry = Arc::new(NotifyRegistry::new());
        for (id, sink) in sinks {
            let outcome = registry.register(
                *id,
                format!("#{id}"),
                Arc::clone(sink) as Arc<dyn TextSink>,
                Arc::clone(sink) as Arc<dyn RichSink>,
            );
            assert_eq!(outcome, RegisterOutcome::Registered);
        }
        Broadcaster::new(registry)
    }

    fn embed() -> EmbedSpec {
        EmbedSpec {
            title: "Encounter".into(),
            description: "shiny frame 10242".into(),
            ..EmbedSpec::default()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn failing_channel_does_not_delay_the_others() {
        let a = Arc::new(ProbeSink::default());
        let b = Arc::new(ProbeSink::failing());
        let c = Arc::new(ProbeSink::default());
        let broadcaster = setup(&[("a", Arc::clone(&a)), ("b", Arc::clone(&b)), (
            "c",
            Arc::clone(&c),
        )]);

        let start = Instant::now();
        let report = broadcaster.echo_joined("fleet online").await;

        assert_eq!(report, BroadcastReport {
            delivered: 2,
            failed: 1,
        });
        assert_eq!(a.attempts(), 1);
        assert_eq!(b.attempts(), 3);
        assert_eq!(c.attempts(), 1);

        // B burned its full budget: two 5 s waits between three attempts.
        assert!(start.elapsed() >= Duration::from_secs(10));
        // A and C completed at their own latency, not B's.
        let a_done = a.completed_at.lock().unwrap().unwrap();
        let c_done = c.completed_at.lock().unwrap().unwrap();
        assert!(a_done - start < Duration::from_secs(1));
        assert!(c_done - start < Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn text_exhaustion_is_recorded_not_raised() {
        let b = Arc::new(ProbeSink::failing());
        let broadcaster = setup(&[("b", Arc::clone(&b))]);

        let report = broadcaster.echo_joined("hello").await;
        assert_eq!(report, BroadcastReport {
            delivered: 0,
            failed: 1,
        });
        match broadcaster.registry().last_delivery("b") {
            Some(DeliveryOutcome::Failed { attempts, .. }) => assert_eq!(attempts, 3),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn rich_retry_budget_is_two_attempts_one_second_apart() {
        let b = Arc::new(ProbeSink::failing());
        let broadcaster = setup(&[("b", Arc::clone(&b))]);

        let start = Instant::now();
        let report = broadcaster
            .announce_result_joined(ResultEvent::embed_only(embed()))
            .await;

        assert_eq!(report.failed, 1);
        assert_eq!(b.attempts(), 2);
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_secs(1));
        assert!(elapsed < Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn attachment_branch_is_chosen_per_event() {
        let sink = Arc::new(ProbeSink::default());
        let broadcaster = setup(&[("a", Arc::clone(&sink))]);

        broadcaster
            .announce_result_joined(ResultEvent::with_attachment(embed(), Attachment {
                file_name: "capture.bin".into(),
                bytes: vec![],
            }))
            .await;
        assert_eq!(*sink.saw_file.lock().unwrap(), Some(false));

        broadcaster
            .announce_result_joined(ResultEvent::with_attachment(embed(), Attachment {
                file_name: "capture.bin".into(),
                bytes: vec![0xAB],
            }))
            .await;
        assert_eq!(*sink.saw_file.lock().unwrap(), Some(true));
    }

    #[tokio::test(start_paused = true)]
    async fn fire_and_forget_returns_before_delivery_finishes() {
        let b = Arc::new(ProbeSink::failing());
        let broadcaster = setup(&[("b", Arc::clone(&b))]);

        let start = Instant::now();
        broadcaster.echo("fleet online");
        assert_eq!(start.elapsed(), Duration::ZERO);

        // Let the detached task burn through its budget.
        tokio::time::sleep(Duration::from_secs(11)).await;
        assert_eq!(b.attempts(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn broadcast_to_empty_registry_is_a_noop() {
        let broadcaster = Broadcaster::new(Arc::new(NotifyRegistry::new()));
        let report = broadcaster.echo_joined("anyone there?").await;
        assert_eq!(report, BroadcastReport::default());
    }

    #[tokio::test(start_paused = true)]
    async fn unregistered_channel_is_skipped_by_later_broadcasts() {
        let a = Arc::new(ProbeSink::default());
        let b = Arc::new(ProbeSink::default());
        let broadcaster = setup(&[("a", Arc::clone(&a)), ("b", Arc::clone(&b))]);

        assert_eq!(
            broadcaster.registry().unregister("b"),
            UnregisterOutcome::Removed
        );
        let report = broadcaster.echo_joined("after removal").await;

        assert_eq!(report.delivered, 1);
        assert_eq!(a.attempts(), 1);
        assert_eq!(b.attempts(), 0);
    }
}
