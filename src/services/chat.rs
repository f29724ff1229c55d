use std::sync::Arc;

use tokio::sync::{watch, Mutex};
use tokio_util::sync::CancellationToken;

use crate::models::{Conversation, Turn};
use crate::providers::{InsightProvider, InsightRequest, RuleBasedProvider};
use crate::services::settings::{OverlapPolicy, ResponderSettings};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    EmptyQuery,
    Busy,
}

/// Result of a submission. Submitting never fails; it either answers,
/// is turned away up front, or is cancelled before the reply lands.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Answered(Turn),
    Rejected(RejectReason),
    Cancelled,
}

impl SubmitOutcome {
    pub fn reply(&self) -> Option<&Turn> {
        match self {
            SubmitOutcome::Answered(turn) => Some(turn),
            _ => None,
        }
    }
}

struct SessionInner {
    state: watch::Sender<Conversation>,
    provider: Arc<dyn InsightProvider>,
    settings: ResponderSettings,
    turn_gate: Mutex<()>,
    shutdown: CancellationToken,
}

/// One chat session: owns the conversation and schedules replies.
///
/// Clones share the same conversation. Readers observe whole snapshots
/// through [`ChatSession::snapshot`] or [`ChatSession::subscribe`]; only
/// the session writes.
#[derive(Clone)]
pub struct ChatSession {
    inner: Arc<SessionInner>,
}

impl ChatSession {
    pub fn new(settings: ResponderSettings) -> Self {
        Self::with_provider(settings, Arc::new(RuleBasedProvider::new()))
    }

    pub fn with_provider(settings: ResponderSettings, provider: Arc<dyn InsightProvider>) -> Self {
        let conversation = Conversation::new(settings.greeting.clone());
        tracing::info!(
            conversation_id = %conversation.id,
            provider = provider.name(),
            "Chat session started"
        );
        let (state, _) = watch::channel(conversation);

        Self {
            inner: Arc::new(SessionInner {
                state,
                provider,
                settings,
                turn_gate: Mutex::new(()),
                shutdown: CancellationToken::new(),
            }),
        }
    }

    pub fn snapshot(&self) -> Conversation {
        self.inner.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Conversation> {
        self.inner.state.subscribe()
    }

    pub fn is_thinking(&self) -> bool {
        self.inner.state.borrow().is_thinking()
    }

    /// Cancel every pending submission and refuse new ones.
    pub fn shutdown(&self) {
        tracing::info!("Chat session shutting down");
        self.inner.shutdown.cancel();
    }

    pub async fn submit(&self, text: &str) -> SubmitOutcome {
        self.submit_with_cancel(text, self.inner.shutdown.child_token())
            .await
    }

    /// Submit a query. If `cancel` fires before the reply is published, the
    /// reply is discarded and no assistant turn is appended.
    pub async fn submit_with_cancel(&self, text: &str, cancel: CancellationToken) -> SubmitOutcome {
        if text.trim().is_empty() {
            tracing::debug!("Ignoring empty submission");
            return SubmitOutcome::Rejected(RejectReason::EmptyQuery);
        }
        if cancel.is_cancelled() {
            return SubmitOutcome::Cancelled;
        }

        // Held for the whole turn so queued submissions run one at a time.
        let _gate = match self.inner.settings.overlap_policy {
            OverlapPolicy::Queue => tokio::select! {
                biased;
                _ = cancel.cancelled() => return SubmitOutcome::Cancelled,
                guard = self.inner.turn_gate.lock() => Some(guard),
            },
            OverlapPolicy::Reject => None,
        };

        let Some(thinking) = self.begin_turn(Turn::user(text)) else {
            tracing::warn!("Submission rejected: a reply is already pending");
            return SubmitOutcome::Rejected(RejectReason::Busy);
        };

        let reply = tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            reply = self.resolve_reply(text) => Some(reply),
        };

        match reply {
            Some(reply) => SubmitOutcome::Answered(thinking.finish(reply)),
            None => {
                tracing::info!("Pending reply cancelled");
                SubmitOutcome::Cancelled
            }
        }
    }

    /// Append the user turn and enter the thinking state in one update.
    /// Returns `None` if a reply is already pending.
    fn begin_turn(&self, user_turn: Turn) -> Option<ThinkingGuard<'_>> {
        let mut accepted = false;
        self.inner.state.send_if_modified(|conv| {
            if conv.is_thinking() {
                return false;
            }
            conv.append(user_turn);
            conv.set_thinking(true);
            accepted = true;
            true
        });

        accepted.then(|| ThinkingGuard {
            state: &self.inner.state,
            armed: true,
        })
    }

    async fn resolve_reply(&self, text: &str) -> Turn {
        tokio::time::sleep(self.inner.settings.response_delay()).await;

        match self
            .inner
            .provider
            .respond(InsightRequest::new(text))
            .await
        {
            Ok(response) => {
                tracing::debug!(
                    topic = response.topic.as_str(),
                    insights = response.insights.len(),
                    "Reply resolved"
                );
                Turn::assistant(response.narrative, response.insights).with_topic(response.topic)
            }
            Err(e) => {
                tracing::warn!("Provider {} failed: {}", self.inner.provider.name(), e);
                Turn::assistant(self.inner.settings.apology.clone(), Vec::new())
            }
        }
    }
}

/// Clears the thinking flag when a pending turn ends without a reply,
/// including when the submitting future is dropped.
struct ThinkingGuard<'a> {
    state: &'a watch::Sender<Conversation>,
    armed: bool,
}

impl ThinkingGuard<'_> {
    /// Publish the reply and leave the thinking state in one update.
    fn finish(mut self, reply: Turn) -> Turn {
        let mut published = reply.clone();
        self.state.send_modify(|conv| {
            published = conv.append(reply).clone();
            conv.set_thinking(false);
        });
        self.armed = false;
        published
    }
}

impl Drop for ThinkingGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.state.send_modify(|conv| conv.set_thinking(false));
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use async_trait::async_trait;
    use tokio::time::Instant;

    use super::*;
    use crate::models::{InsightKind, Role, Topic};
    use crate::providers::{InsightResponse, ProviderError};

    fn session(policy: OverlapPolicy) -> ChatSession {
        ChatSession::new(ResponderSettings {
            overlap_policy: policy,
            ..ResponderSettings::default()
        })
    }

    struct OfflineProvider;

    #[async_trait]
    impl InsightProvider for OfflineProvider {
        fn name(&self) -> &'static str {
            "offline"
        }

        async fn respond(&self, _request: InsightRequest) -> Result<InsightResponse, ProviderError> {
            Err(ProviderError::SynthesisUnavailable(
                "plant data source unreachable".to_string(),
            ))
        }
    }

    fn assert_timestamps_ordered(conv: &Conversation) {
        for pair in conv.turns().windows(2) {
            assert!(pair[0].timestamp <= pair[1].timestamp);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_oee_question_gets_downtime_reply_after_delay() {
        let session = session(OverlapPolicy::Reject);
        let start = Instant::now();

        let outcome = session.submit("What's causing the drop in OEE?").await;

        assert!(start.elapsed() >= Duration::from_millis(2000));
        let reply = outcome.reply().unwrap();
        assert_eq!(reply.topic, Some(Topic::Efficiency));

        let conv = session.snapshot();
        assert_eq!(conv.turn_count(), 3);
        assert!(!conv.is_thinking());

        let last = conv.last_turn().unwrap();
        assert_eq!(last.role, Role::Assistant);
        assert!(last.content.contains("downtime"));
        let kinds: Vec<_> = last.insights.iter().map(|i| i.kind).collect();
        assert_eq!(kinds, vec![InsightKind::Chart, InsightKind::Recommendation]);

        let user = &conv.turns()[1];
        assert_eq!(user.role, Role::User);
        assert_eq!(user.content, "What's causing the drop in OEE?");
        assert!(user.timestamp < last.timestamp);
        assert_timestamps_ordered(&conv);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_submission_is_a_no_op() {
        let session = session(OverlapPolicy::Reject);
        let before = session.snapshot();

        assert_eq!(
            session.submit("").await,
            SubmitOutcome::Rejected(RejectReason::EmptyQuery)
        );
        assert_eq!(
            session.submit("   \n").await,
            SubmitOutcome::Rejected(RejectReason::EmptyQuery)
        );

        let after = session.snapshot();
        assert_eq!(after.turns(), before.turns());
        assert!(!after.is_thinking());
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_submission_while_thinking_is_rejected() {
        let session = session(OverlapPolicy::Reject);

        let (first, second) = tokio::join!(
            session.submit("inventory status"),
            session.submit("how about costs?")
        );

        assert!(matches!(first, SubmitOutcome::Answered(_)));
        assert_eq!(second, SubmitOutcome::Rejected(RejectReason::Busy));

        let conv = session.snapshot();
        assert_eq!(conv.count_by_role(Role::User), 1);
        assert_eq!(conv.count_by_role(Role::Assistant), 2);
        assert_eq!(conv.turns()[1].content, "inventory status");
        assert_eq!(conv.last_turn().unwrap().topic, Some(Topic::Inventory));
        assert!(!conv.is_thinking());
    }

    #[tokio::test(start_paused = true)]
    async fn test_thinking_is_visible_while_reply_is_pending() {
        let session = session(OverlapPolicy::Reject);
        let mut rx = session.subscribe();

        let (outcome, observed) = tokio::join!(session.submit("cost breakdown"), async {
            rx.wait_for(|c| c.is_thinking()).await.unwrap().clone()
        });

        assert_eq!(observed.turn_count(), 2);
        assert_eq!(observed.last_turn().unwrap().role, Role::User);
        assert!(outcome.reply().is_some());
        assert!(!session.is_thinking());
    }

    #[tokio::test(start_paused = true)]
    async fn test_queue_policy_answers_in_submission_order() {
        let session = session(OverlapPolicy::Queue);
        let start = Instant::now();

        let (first, second) = tokio::join!(
            session.submit("oee this week"),
            session.submit("inventory status")
        );

        assert!(start.elapsed() >= Duration::from_millis(4000));
        assert_eq!(first.reply().unwrap().topic, Some(Topic::Efficiency));
        assert_eq!(second.reply().unwrap().topic, Some(Topic::Inventory));

        let roles: Vec<_> = session.snapshot().turns().iter().map(|t| t.role).collect();
        assert_eq!(
            roles,
            vec![
                Role::Assistant,
                Role::User,
                Role::Assistant,
                Role::User,
                Role::Assistant
            ]
        );
        assert_timestamps_ordered(&session.snapshot());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_before_delay_discards_reply() {
        let session = session(OverlapPolicy::Reject);
        let token = CancellationToken::new();

        let (outcome, _) = tokio::join!(
            session.submit_with_cancel("profit margins", token.clone()),
            async {
                tokio::time::sleep(Duration::from_millis(500)).await;
                token.cancel();
            }
        );

        assert_eq!(outcome, SubmitOutcome::Cancelled);
        let conv = session.snapshot();
        assert_eq!(conv.turn_count(), 2);
        assert_eq!(conv.last_turn().unwrap().role, Role::User);
        assert!(!conv.is_thinking());
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_cancels_and_refuses_submissions() {
        let session = session(OverlapPolicy::Reject);
        let pending = tokio::spawn({
            let session = session.clone();
            async move { session.submit("materials shortage").await }
        });
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(session.is_thinking());

        session.shutdown();
        assert_eq!(pending.await.unwrap(), SubmitOutcome::Cancelled);
        assert!(!session.is_thinking());

        assert_eq!(session.submit("oee").await, SubmitOutcome::Cancelled);
        assert_eq!(session.snapshot().turn_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_submission_leaves_idle_state() {
        let session = session(OverlapPolicy::Reject);

        let timed_out =
            tokio::time::timeout(Duration::from_millis(100), session.submit("oee")).await;
        assert!(timed_out.is_err());

        assert!(!session.is_thinking());
        assert!(session.submit("inventory").await.reply().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_provider_failure_becomes_apology_turn() {
        let settings = ResponderSettings::default();
        let apology = settings.apology.clone();
        let session = ChatSession::with_provider(settings, Arc::new(OfflineProvider));

        let outcome = session.submit("oee").await;

        let reply = outcome.reply().unwrap();
        assert_eq!(reply.role, Role::Assistant);
        assert_eq!(reply.content, apology);
        assert!(reply.insights.is_empty());
        assert!(!session.is_thinking());
    }

    #[tokio::test(start_paused = true)]
    async fn test_sessions_do_not_block_each_other() {
        let a = session(OverlapPolicy::Reject);
        let b = session(OverlapPolicy::Reject);
        let start = Instant::now();

        let (ra, rb) = tokio::join!(a.submit("oee"), b.submit("cost"));

        assert!(start.elapsed() < Duration::from_millis(4000));
        assert_eq!(ra.reply().unwrap().topic, Some(Topic::Efficiency));
        assert_eq!(rb.reply().unwrap().topic, Some(Topic::Cost));
        assert_eq!(a.snapshot().turn_count(), 3);
        assert_eq!(b.snapshot().turn_count(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_general_question_has_no_insights() {
        let session = session(OverlapPolicy::Reject);
        let outcome = session.submit("How are we doing?").await;

        let reply = outcome.reply().unwrap();
        assert_eq!(reply.topic, Some(Topic::General));
        assert!(reply.insights.is_empty());
        assert!(reply.content.contains("78.3%"));
    }
}
