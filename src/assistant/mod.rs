//! The assistant widget core.
//!
//! [`Assistant`] is a cloneable handle over one conversation session. The
//! shell forwards user events into it and renders from [`Assistant::snapshot`]
//! or the [`WidgetEvent`] stream.
//!
//! Reply policy: every input gets exactly one reply, computed at submit time
//! and queued. Each new input restarts the single typing timer; when it fires
//! all queued replies are appended in submission order and the typing flag
//! drops. Closing or unmounting cancels the timers and discards the queue.

pub mod events;

use std::collections::VecDeque;
use std::sync::{Arc, Weak};

use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::sync::{RwLock, broadcast};
use tokio_stream::wrappers::BroadcastStream;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::chat::model::{Message, MessageFeedback, Rating, Sender};
use crate::chat::session::{ConversationSession, SessionSnapshot};
use crate::chat::settings::{ChatSettings, JsonFileSettingsStore, MemorySettingsStore, SettingsStore};
use crate::chat::state::WidgetState;
use crate::config::AssistantConfig;
use crate::error::{Result, SessionError};
use crate::pipeline::actions::{ActionKey, QuickAction, QuickActionDispatcher};
use crate::pipeline::generator::ResponseGenerator;
use crate::pipeline::rules::IntentClassifier;
use crate::pipeline::types::{ResponsePayload, UserRole};
use crate::services::attachment::{Attachment, AttachmentAcknowledger, TemplateAcknowledger};
use crate::services::voice::{ScriptedRecognizer, SpeechRecognizer};
use crate::timing::{Timer, TimingCoordinator};

pub use events::{Notification, NotificationLevel, WidgetEvent};

/// Outcome of a voice toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceToggle {
    /// Capture started; text arrives in the draft when the timer fires.
    Started,
    /// A running capture was stopped early; nothing is injected.
    Cancelled,
    /// Voice input is turned off in settings.
    Disabled,
}

/// A reply waiting for the typing timer.
#[derive(Debug)]
struct PendingReply {
    trigger: Uuid,
    payload: ResponsePayload,
}

/// Mutable state shared with timer tasks.
struct Inner {
    session: ConversationSession,
    timing: TimingCoordinator,
    pending: VecDeque<PendingReply>,
    role: UserRole,
    rng: StdRng,
    live: bool,
    assistant_name: String,
    events: broadcast::Sender<WidgetEvent>,
}

impl Inner {
    fn ensure_live(&self) -> std::result::Result<(), SessionError> {
        if self.live {
            Ok(())
        } else {
            Err(SessionError::Unmounted)
        }
    }

    fn emit(&self, event: WidgetEvent) {
        // No subscribers is fine; the shell may render from snapshots instead.
        let _ = self.events.send(event);
    }

    fn notify(&self, notification: Notification) {
        self.emit(WidgetEvent::Notification { notification });
    }

    /// The single mutation point for the transcript.
    fn append(&mut self, message: Message) -> Uuid {
        let unread_before = self.session.unread_count();
        let appended = self.session.append(message).clone();
        let id = appended.id;
        let sender = appended.sender;

        self.emit(WidgetEvent::MessageAppended { message: appended });

        if self.session.state().is_open() {
            self.emit(WidgetEvent::ScrollToLatest);
        }

        let unread = self.session.unread_count();
        if unread != unread_before {
            self.emit(WidgetEvent::UnreadChanged { count: unread });
            if sender == Sender::Assistant && self.session.settings().notifications_enabled {
                self.notify(Notification::info(format!(
                    "New message from {}",
                    self.assistant_name
                )));
            }
        }
        id
    }

    fn set_typing(&mut self, typing: bool) {
        if self.session.set_typing(typing) {
            self.emit(WidgetEvent::TypingChanged { typing });
        }
    }

    fn set_listening(&mut self, listening: bool) {
        if self.session.set_listening(listening) {
            self.emit(WidgetEvent::ListeningChanged { listening });
        }
    }

    fn set_draft(&mut self, draft: String) {
        if self.session.draft() != draft {
            self.session.set_draft(draft.clone());
            self.emit(WidgetEvent::DraftChanged { draft });
        }
    }

    /// Append every queued reply in order and clear the typing flag.
    fn flush_replies(&mut self) {
        while let Some(reply) = self.pending.pop_front() {
            let id = self.append(Message::from_response(reply.payload));
            debug!(message_id = %id, trigger = %reply.trigger, "Reply delivered");
        }
        self.set_typing(false);
    }

    /// Cancel all timers, drop queued replies, reset transient flags.
    fn halt(&mut self) {
        self.timing.cancel_all();
        if !self.pending.is_empty() {
            debug!(dropped = self.pending.len(), "Discarding queued replies");
            self.pending.clear();
        }
        self.set_typing(false);
        self.set_listening(false);
    }
}

/// Builder for [`Assistant`].
pub struct AssistantBuilder {
    config: AssistantConfig,
    role: UserRole,
    seed: Option<u64>,
    classifier: Option<IntentClassifier>,
    recognizer: Option<Arc<dyn SpeechRecognizer>>,
    acknowledger: Option<Arc<dyn AttachmentAcknowledger>>,
    settings_store: Option<Arc<dyn SettingsStore>>,
}

impl AssistantBuilder {
    pub fn new(config: AssistantConfig) -> Self {
        Self {
            config,
            role: UserRole::default(),
            seed: None,
            classifier: None,
            recognizer: None,
            acknowledger: None,
            settings_store: None,
        }
    }

    /// Role context reported by the shell.
    pub fn role(mut self, role: UserRole) -> Self {
        self.role = role;
        self
    }

    /// Seed the variant picker for repeatable output.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn classifier(mut self, classifier: IntentClassifier) -> Self {
        self.classifier = Some(classifier);
        self
    }

    pub fn recognizer(mut self, recognizer: Arc<dyn SpeechRecognizer>) -> Self {
        self.recognizer = Some(recognizer);
        self
    }

    pub fn acknowledger(mut self, acknowledger: Arc<dyn AttachmentAcknowledger>) -> Self {
        self.acknowledger = Some(acknowledger);
        self
    }

    /// Overrides `config.settings_path`.
    pub fn settings_store(mut self, store: Arc<dyn SettingsStore>) -> Self {
        self.settings_store = Some(store);
        self
    }

    /// Mount a new session: load settings and start Closed with an empty log.
    pub async fn build(self) -> Result<Assistant> {
        self.config.validate()?;

        let settings_store: Arc<dyn SettingsStore> = match (self.settings_store, &self.config.settings_path) {
            (Some(store), _) => store,
            (None, Some(path)) => {
                let store = JsonFileSettingsStore::new(path.clone());
                debug!(path = %store.path().display(), "Using file settings store");
                Arc::new(store)
            }
            (None, None) => Arc::new(MemorySettingsStore::new()),
        };

        let settings = match settings_store.load().await {
            Ok(Some(settings)) => settings,
            Ok(None) => ChatSettings::default(),
            Err(e) => {
                warn!(error = %e, "Failed to load settings, using defaults");
                ChatSettings::default()
            }
        };

        let rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let (events, _rx) = broadcast::channel(self.config.event_capacity);

        let inner = Inner {
            session: ConversationSession::new(settings),
            timing: TimingCoordinator::new(&self.config),
            pending: VecDeque::new(),
            role: self.role,
            rng,
            live: true,
            assistant_name: self.config.assistant_name.clone(),
            events: events.clone(),
        };

        info!(
            assistant = %self.config.assistant_name,
            role = %self.role,
            "Assistant session mounted"
        );

        let recognizer: Arc<dyn SpeechRecognizer> = match self.recognizer {
            Some(recognizer) => recognizer,
            None => Arc::new(ScriptedRecognizer::default()),
        };
        let acknowledger: Arc<dyn AttachmentAcknowledger> = match self.acknowledger {
            Some(acknowledger) => acknowledger,
            None => Arc::new(TemplateAcknowledger),
        };

        Ok(Assistant {
            inner: Arc::new(RwLock::new(inner)),
            events,
            classifier: Arc::new(self.classifier.unwrap_or_default()),
            generator: Arc::new(ResponseGenerator::new(self.config.assistant_name)),
            dispatcher: QuickActionDispatcher::new(),
            recognizer,
            acknowledger,
            settings_store,
        })
    }
}

/// Handle to one mounted assistant widget.
#[derive(Clone)]
pub struct Assistant {
    inner: Arc<RwLock<Inner>>,
    events: broadcast::Sender<WidgetEvent>,
    classifier: Arc<IntentClassifier>,
    generator: Arc<ResponseGenerator>,
    dispatcher: QuickActionDispatcher,
    recognizer: Arc<dyn SpeechRecognizer>,
    acknowledger: Arc<dyn AttachmentAcknowledger>,
    settings_store: Arc<dyn SettingsStore>,
}

impl Assistant {
    pub fn builder(config: AssistantConfig) -> AssistantBuilder {
        AssistantBuilder::new(config)
    }

    /// Subscribe to outbound events.
    pub fn subscribe(&self) -> broadcast::Receiver<WidgetEvent> {
        self.events.subscribe()
    }

    /// Outbound events as a `Stream`.
    pub fn events(&self) -> BroadcastStream<WidgetEvent> {
        BroadcastStream::new(self.events.subscribe())
    }

    /// A copy of the current session for rendering.
    pub async fn snapshot(&self) -> SessionSnapshot {
        self.inner.read().await.session.snapshot()
    }

    pub async fn state(&self) -> WidgetState {
        self.inner.read().await.session.state()
    }

    pub async fn role(&self) -> UserRole {
        self.inner.read().await.role
    }

    /// Switch role context. Affects later replies and the quick-action menu.
    pub async fn set_role(&self, role: UserRole) -> Result<()> {
        let mut guard = self.inner.write().await;
        guard.ensure_live()?;
        if guard.role != role {
            info!(from = %guard.role, to = %role, "Role context changed");
            guard.role = role;
        }
        Ok(())
    }

    /// The quick-action menu for the current role.
    pub async fn quick_actions(&self) -> Vec<QuickAction> {
        let role = self.inner.read().await.role;
        self.dispatcher.menu(role)
    }

    async fn transition(&self, target: WidgetState) -> Result<WidgetState> {
        let mut guard = self.inner.write().await;
        let inner = &mut *guard;
        inner.ensure_live()?;

        let Some(transition) = inner.session.transition(target)? else {
            return Ok(inner.session.state());
        };

        inner.emit(WidgetEvent::StateChanged {
            from: transition.from,
            to: transition.to,
        });

        match transition.to {
            WidgetState::Open => {
                if transition.from == WidgetState::Closed {
                    inner.emit(WidgetEvent::UnreadChanged { count: 0 });
                }
                if transition.needs_greeting {
                    let greeting = self.generator.greeting(inner.role, &mut inner.rng);
                    inner.append(Message::from_response(greeting));
                } else if !inner.session.messages().is_empty() {
                    // Replies may have landed while hidden.
                    inner.emit(WidgetEvent::ScrollToLatest);
                }
            }
            WidgetState::Closed => inner.halt(),
            WidgetState::Minimized => {}
        }

        Ok(inner.session.state())
    }

    /// Open the widget (from Closed or Minimized).
    pub async fn open(&self) -> Result<WidgetState> {
        self.transition(WidgetState::Open).await
    }

    /// Minimize an open widget. Fails from Closed.
    pub async fn minimize(&self) -> Result<WidgetState> {
        self.transition(WidgetState::Minimized).await
    }

    /// Close the widget, cancelling pending timers and queued replies.
    pub async fn close(&self) -> Result<WidgetState> {
        self.transition(WidgetState::Closed).await
    }

    /// The floating trigger: opens when Closed, closes otherwise.
    pub async fn toggle(&self) -> Result<WidgetState> {
        if self.state().await == WidgetState::Closed {
            self.open().await
        } else {
            self.close().await
        }
    }

    /// Update the input field text.
    pub async fn set_draft(&self, draft: impl Into<String>) -> Result<()> {
        let mut guard = self.inner.write().await;
        guard.ensure_live()?;
        guard.set_draft(draft.into());
        Ok(())
    }

    /// Submit whatever is in the input field.
    pub async fn submit_draft(&self) -> Result<Option<Uuid>> {
        let mut guard = self.inner.write().await;
        let inner = &mut *guard;
        inner.ensure_live()?;
        let draft = inner.session.take_draft();
        if !draft.is_empty() {
            inner.emit(WidgetEvent::DraftChanged {
                draft: String::new(),
            });
        }
        Ok(self.submit_locked(inner, &draft))
    }

    /// Submit free text. Whitespace-only input is ignored and returns `None`.
    pub async fn submit_text(&self, text: &str) -> Result<Option<Uuid>> {
        let mut guard = self.inner.write().await;
        let inner = &mut *guard;
        inner.ensure_live()?;
        Ok(self.submit_locked(inner, text))
    }

    fn submit_locked(&self, inner: &mut Inner, text: &str) -> Option<Uuid> {
        let text = text.trim();
        if text.is_empty() {
            debug!("Ignoring empty submission");
            return None;
        }

        inner.set_draft(String::new());
        let id = inner.append(Message::user(text));

        let intent = self.classifier.classify(text);
        let payload = self.generator.generate(intent, inner.role, &mut inner.rng);
        info!(message_id = %id, intent = %intent, card = payload.as_card().is_some(), "User message classified");

        self.enqueue_reply(inner, id, payload);
        Some(id)
    }

    /// Select a quick action or card action by key. Unknown keys get the
    /// fallback reply.
    pub async fn select_quick_action(&self, key: &str) -> Result<Uuid> {
        let mut guard = self.inner.write().await;
        let inner = &mut *guard;
        inner.ensure_live()?;

        let label = match key.parse::<ActionKey>() {
            Ok(action) => action.label().to_string(),
            Err(_) if key.trim().is_empty() => "Quick action".to_string(),
            Err(_) => key.trim().replace('_', " "),
        };
        let id = inner.append(Message::user(label));
        let payload = self.dispatcher.dispatch(key, inner.role);
        self.enqueue_reply(inner, id, payload);
        Ok(id)
    }

    /// Select a follow-up action from a card.
    pub async fn select_card_action(&self, action: ActionKey) -> Result<Uuid> {
        self.select_quick_action(action.as_str()).await
    }

    /// Acknowledge a selected file: the summary appears now, the reply after
    /// the typing delay.
    pub async fn attach_file(&self, attachment: Attachment) -> Result<Uuid> {
        let mut guard = self.inner.write().await;
        let inner = &mut *guard;
        inner.ensure_live()?;

        let id = inner.append(Message::user(attachment.summary()));
        inner.notify(Notification::success(format!(
            "File uploaded: {}",
            attachment.file_name
        )));
        info!(message_id = %id, file = %attachment.file_name, size = attachment.size_bytes, "File attached");

        let payload = self.acknowledger.acknowledge(&attachment, inner.role);
        self.enqueue_reply(inner, id, payload);
        Ok(id)
    }

    /// Inject an assistant-originated message (no typing delay).
    pub async fn push_assistant_message(&self, content: impl Into<String>) -> Result<Uuid> {
        let mut guard = self.inner.write().await;
        guard.ensure_live()?;
        Ok(guard.append(Message::assistant_text(content)))
    }

    fn enqueue_reply(&self, inner: &mut Inner, trigger: Uuid, payload: ResponsePayload) {
        inner.pending.push_back(PendingReply { trigger, payload });
        inner.set_typing(true);

        let delay = inner.timing.typing_delay(&mut inner.rng);
        let weak: Weak<RwLock<Inner>> = Arc::downgrade(&self.inner);
        inner.timing.arm(Timer::Typing, delay, move |epoch| async move {
            let Some(shared) = weak.upgrade() else {
                return;
            };
            let mut inner = shared.write().await;
            if !inner.live || !inner.timing.complete(Timer::Typing, epoch) {
                return;
            }
            inner.flush_replies();
        });
    }

    /// Start or stop a voice capture. Starting needs the widget Open.
    pub async fn toggle_voice(&self) -> Result<VoiceToggle> {
        let mut guard = self.inner.write().await;
        let inner = &mut *guard;
        inner.ensure_live()?;

        if inner.session.is_listening() {
            inner.timing.cancel(Timer::Voice);
            inner.set_listening(false);
            info!("Voice capture cancelled");
            return Ok(VoiceToggle::Cancelled);
        }

        let state = inner.session.state();
        if !state.is_open() {
            return Err(SessionError::NotOpen { state }.into());
        }

        if !inner.session.settings().voice_enabled {
            inner.notify(Notification::warning("Voice input is disabled in settings"));
            return Ok(VoiceToggle::Disabled);
        }

        inner.set_listening(true);

        let weak: Weak<RwLock<Inner>> = Arc::downgrade(&self.inner);
        let recognizer = Arc::clone(&self.recognizer);
        let language = inner.session.settings().language.clone();
        let timeout = inner.timing.voice_timeout();
        inner.timing.arm(Timer::Voice, timeout, move |epoch| async move {
            let result = recognizer.transcribe(&language).await;
            let Some(shared) = weak.upgrade() else {
                return;
            };
            let mut inner = shared.write().await;
            if !inner.live || !inner.timing.complete(Timer::Voice, epoch) {
                return;
            }
            inner.set_listening(false);
            match result {
                Ok(text) => {
                    info!(recognizer = recognizer.name(), "Voice capture recognized");
                    inner.set_draft(text);
                }
                Err(e) => {
                    warn!(recognizer = recognizer.name(), error = %e, "Voice capture failed");
                    inner.notify(Notification::warning("Sorry, I couldn't catch that. Please try again."));
                }
            }
        });

        info!(timeout_ms = timeout.as_millis() as u64, "Voice capture started");
        Ok(VoiceToggle::Started)
    }

    /// Add a reaction to a message.
    pub async fn react(&self, message_id: Uuid, reaction: impl Into<String>) -> Result<MessageFeedback> {
        let mut guard = self.inner.write().await;
        guard.ensure_live()?;
        Ok(guard.session.react(message_id, reaction)?.clone())
    }

    /// Rate a message.
    pub async fn rate(&self, message_id: Uuid, rating: Rating) -> Result<MessageFeedback> {
        let mut guard = self.inner.write().await;
        guard.ensure_live()?;
        let feedback = guard.session.rate(message_id, rating)?.clone();
        debug!(message_id = %message_id, rating = ?rating, "Message rated");
        Ok(feedback)
    }

    /// Change settings and persist them.
    ///
    /// The new settings take effect immediately; a persistence failure is
    /// returned but does not roll them back.
    pub async fn update_settings<F>(&self, update: F) -> Result<ChatSettings>
    where
        F: FnOnce(&mut ChatSettings),
    {
        let settings = {
            let mut guard = self.inner.write().await;
            let inner = &mut *guard;
            inner.ensure_live()?;

            let mut settings = inner.session.settings().clone();
            update(&mut settings);

            if !settings.voice_enabled && inner.session.is_listening() {
                inner.timing.cancel(Timer::Voice);
                inner.set_listening(false);
            }

            inner.session.set_settings(settings.clone());
            inner.emit(WidgetEvent::SettingsChanged {
                settings: settings.clone(),
            });
            settings
        };

        self.settings_store.save(&settings).await?;
        let _ = self.events.send(WidgetEvent::Notification {
            notification: Notification::success("Settings saved"),
        });
        Ok(settings)
    }

    /// Tear down the session. Pending timers are cancelled and every later
    /// call returns [`SessionError::Unmounted`].
    pub async fn unmount(&self) {
        let mut guard = self.inner.write().await;
        if !guard.live {
            return;
        }
        let typing_pending = guard.timing.is_armed(Timer::Typing);
        let voice_pending = guard.timing.is_armed(Timer::Voice);
        guard.halt();
        guard.live = false;
        info!(typing_pending, voice_pending, "Assistant session unmounted");
    }
}
