//! Focus session controller
//!
//! A [`FocusSession`] owns one [`TimerState`], the task that ticks it once per
//! second, and the reflection request fired when a break ends. The ticker
//! handle lives under the same lock as the timer, and every command that
//! starts or stops a countdown bumps a driver epoch there too, so a stale
//! driver that wakes up late sees a newer epoch and exits instead of
//! decrementing a second time.

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex, MutexGuard, PoisonError, RwLock,
    },
    time::Duration,
};

use serde::Serialize;
use tokio::{
    sync::watch,
    task::JoinHandle,
    time::{interval_at, timeout, Instant, MissedTickBehavior},
};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    services::{ReflectionGenerator, ReflectionQuestion},
    state::{BlocklistError, SiteBlocklist, TimerError, TimerEvent, TimerPhase, TimerSettings, TimerState},
};

/// Point-in-time view of a focus session, as served to clients
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerSnapshot {
    pub id: Uuid,
    pub phase: TimerPhase,
    pub remaining_seconds: u64,
    pub total_seconds: u64,
    pub progress_fraction: f64,
    pub display: String,
    pub long_break: bool,
    pub current_session_index: u32,
    pub session_number: u32,
    pub completed_sessions: u32,
    pub focus_seconds: u64,
    pub topic: Option<String>,
    pub muted: bool,
    pub settings: TimerSettings,
    pub questions: Vec<ReflectionQuestion>,
    pub questions_pending: bool,
    pub blocking_enabled: bool,
    pub blocked_sites: Vec<String>,
}

struct Countdown {
    state: TimerState,
    /// Only the driver spawned with this epoch may tick `state`
    driver: u64,
    ticker: Option<JoinHandle<()>>,
}

impl Countdown {
    fn stop_driver(&mut self) {
        self.driver += 1;
        if let Some(handle) = self.ticker.take() {
            handle.abort();
        }
    }
}

#[derive(Default)]
struct QuestionBatch {
    items: Vec<ReflectionQuestion>,
    pending: bool,
}

struct SessionInner {
    id: Uuid,
    countdown: Mutex<Countdown>,
    questions: Mutex<QuestionBatch>,
    blocklist: Mutex<SiteBlocklist>,
    reflection_task: Mutex<Option<JoinHandle<()>>>,
    reflection: Arc<ReflectionGenerator>,
    tick_interval: Duration,
    /// Written only while `countdown` is held
    torn_down: AtomicBool,
    last_touched: Mutex<Instant>,
    snapshot_tx: watch::Sender<TimerSnapshot>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

pub struct FocusSession {
    inner: Arc<SessionInner>,
}

impl FocusSession {
    pub fn new(
        id: Uuid,
        state: TimerState,
        reflection: Arc<ReflectionGenerator>,
        tick_interval: Duration,
    ) -> Self {
        let blocklist = SiteBlocklist::default();
        let initial = build_snapshot(id, &state, &QuestionBatch::default(), &blocklist);
        let (snapshot_tx, _) = watch::channel(initial);

        Self {
            inner: Arc::new(SessionInner {
                id,
                countdown: Mutex::new(Countdown {
                    state,
                    driver: 0,
                    ticker: None,
                }),
                questions: Mutex::new(QuestionBatch::default()),
                blocklist: Mutex::new(blocklist),
                reflection_task: Mutex::new(None),
                reflection,
                tick_interval,
                torn_down: AtomicBool::new(false),
                last_touched: Mutex::new(Instant::now()),
                snapshot_tx,
            }),
        }
    }

    pub fn id(&self) -> Uuid {
        self.inner.id
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        self.inner.snapshot()
    }

    /// Receives a fresh snapshot after every tick and command
    pub fn subscribe(&self) -> watch::Receiver<TimerSnapshot> {
        self.inner.snapshot_tx.subscribe()
    }

    /// Wait up to `wait` for the next published snapshot.
    ///
    /// Returns the current snapshot when nothing changed in time.
    pub async fn next_snapshot(&self, wait: Duration) -> TimerSnapshot {
        let mut updates = self.subscribe();
        match timeout(wait, updates.changed()).await {
            Ok(Ok(())) => updates.borrow_and_update().clone(),
            _ => self.snapshot(),
        }
    }

    pub fn set_topic(&self, topic: &str) -> Result<TimerSnapshot, TimerError> {
        self.inner.live_countdown()?.state.set_topic(topic)?;
        debug!(session = %self.inner.id, topic, "Topic updated");
        Ok(self.inner.publish())
    }

    pub fn update_settings(&self, settings: TimerSettings) -> Result<TimerSnapshot, TimerError> {
        self.inner.live_countdown()?.state.update_settings(settings)?;
        info!(session = %self.inner.id, ?settings, "Timer settings updated");
        Ok(self.inner.publish())
    }

    /// Start a focus period from Idle, or resume one from Paused.
    pub fn start(&self) -> Result<TimerSnapshot, TimerError> {
        let event = {
            let mut countdown = self.inner.live_countdown()?;
            let event = countdown.state.start()?;
            if event.is_some() {
                self.inner.spawn_driver(&mut countdown);
            }
            event
        };

        if let Some(event) = event {
            info!(session = %self.inner.id, ?event, "Focus countdown started");
        }
        Ok(self.inner.publish())
    }

    pub fn pause(&self) -> TimerSnapshot {
        let event = {
            let mut countdown = lock(&self.inner.countdown);
            let event = countdown.state.pause();
            if event.is_some() {
                countdown.stop_driver();
            }
            event
        };

        if let Some(event) = event {
            info!(session = %self.inner.id, ?event, "Focus countdown paused");
        }
        self.inner.publish()
    }

    pub fn reset(&self) -> TimerSnapshot {
        let event = {
            let mut countdown = lock(&self.inner.countdown);
            countdown.stop_driver();
            countdown.state.reset()
        };

        if event.is_some() {
            info!(session = %self.inner.id, "Timer reset");
        }
        self.inner.publish()
    }

    pub fn toggle_mute(&self) -> TimerSnapshot {
        let muted = lock(&self.inner.countdown).state.toggle_mute();
        debug!(session = %self.inner.id, muted, "Mute toggled");
        self.inner.publish()
    }

    /// Record the user's answer to one reflection question.
    ///
    /// Returns `None` when `index` does not name a question in the current batch.
    pub fn answer_question(&self, index: usize, answer: &str) -> Option<TimerSnapshot> {
        {
            let mut batch = lock(&self.inner.questions);
            let question = batch.items.get_mut(index)?;
            question.answer = answer.to_string();
        }
        Some(self.inner.publish())
    }

    pub fn dismiss_questions(&self) -> TimerSnapshot {
        lock(&self.inner.questions).items.clear();
        self.inner.publish()
    }

    pub fn block_site(&self, site: &str) -> Result<TimerSnapshot, BlocklistError> {
        let site = lock(&self.inner.blocklist).add(site)?;
        info!(session = %self.inner.id, site, "Site blocked");
        Ok(self.inner.publish())
    }

    pub fn unblock_site(&self, site: &str) -> Result<TimerSnapshot, BlocklistError> {
        lock(&self.inner.blocklist).remove(site)?;
        info!(session = %self.inner.id, site, "Site unblocked");
        Ok(self.inner.publish())
    }

    pub fn toggle_blocking(&self) -> TimerSnapshot {
        let enabled = lock(&self.inner.blocklist).toggle();
        info!(session = %self.inner.id, enabled, "Site blocking toggled");
        self.inner.publish()
    }

    /// Cancel the countdown and drop any in-flight reflection request.
    ///
    /// Later timer commands fail with [`TimerError::Closed`].
    pub fn teardown(&self) {
        {
            let mut countdown = lock(&self.inner.countdown);
            if self.inner.torn_down.swap(true, Ordering::SeqCst) {
                return;
            }
            countdown.stop_driver();
        }
        if let Some(handle) = lock(&self.inner.reflection_task).take() {
            handle.abort();
        }
        lock(&self.inner.questions).pending = false;
        info!(session = %self.inner.id, "Focus session torn down");
    }

    pub fn is_torn_down(&self) -> bool {
        self.inner.torn_down.load(Ordering::SeqCst)
    }

    fn touch(&self) {
        *lock(&self.inner.last_touched) = Instant::now();
    }

    /// Not counting down and untouched by any request for at least `max_idle`
    fn is_stale(&self, max_idle: Duration) -> bool {
        let counting = lock(&self.inner.countdown).state.phase.is_counting();
        !counting && lock(&self.inner.last_touched).elapsed() >= max_idle
    }

    #[cfg(test)]
    fn driver_alive(&self) -> bool {
        lock(&self.inner.countdown)
            .ticker
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for FocusSession {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl SessionInner {
    fn snapshot(&self) -> TimerSnapshot {
        let countdown = lock(&self.countdown);
        let batch = lock(&self.questions);
        let blocklist = lock(&self.blocklist);
        build_snapshot(self.id, &countdown.state, &batch, &blocklist)
    }

    fn publish(&self) -> TimerSnapshot {
        let snapshot = self.snapshot();
        self.snapshot_tx.send_replace(snapshot.clone());
        snapshot
    }

    /// The timer lock, unless the session was torn down
    fn live_countdown(&self) -> Result<MutexGuard<'_, Countdown>, TimerError> {
        let countdown = lock(&self.countdown);
        if self.torn_down.load(Ordering::SeqCst) {
            return Err(TimerError::Closed);
        }
        Ok(countdown)
    }

    /// Replace the ticker. Must be called with `countdown` locked.
    fn spawn_driver(self: &Arc<Self>, countdown: &mut Countdown) {
        countdown.stop_driver();
        if self.torn_down.load(Ordering::SeqCst) {
            return;
        }
        let epoch = countdown.driver;
        let inner = Arc::clone(self);
        countdown.ticker = Some(tokio::spawn(async move {
            inner.run_countdown(epoch).await;
        }));
    }

    async fn run_countdown(self: Arc<Self>, epoch: u64) {
        debug!(session = %self.id, epoch, "Countdown driver running");
        let period = self.tick_interval;
        let mut interval = interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            interval.tick().await;

            let (event, counting, topic) = {
                let mut countdown = lock(&self.countdown);
                if countdown.driver != epoch {
                    debug!(session = %self.id, epoch, "Countdown driver superseded");
                    return;
                }
                let event = countdown.state.tick();
                (
                    event,
                    countdown.state.phase.is_counting(),
                    countdown.state.topic.clone(),
                )
            };

            match event {
                Some(TimerEvent::FocusCompleted {
                    completed_sessions,
                    long_break,
                    break_seconds,
                }) => {
                    info!(
                        session = %self.id,
                        completed_sessions,
                        long_break,
                        break_seconds,
                        "Focus period complete, break started"
                    );
                }
                Some(TimerEvent::BreakEnded { session_index }) => {
                    info!(session = %self.id, session_index, "Break ended");
                    match topic {
                        Some(topic) => self.request_questions(topic),
                        None => warn!(session = %self.id, "Break ended without a topic"),
                    }
                }
                _ => {}
            }

            self.publish();

            if !counting {
                debug!(session = %self.id, epoch, "Countdown driver stopping");
                return;
            }
        }
    }

    /// Runs on its own task so a slow provider never delays the next tick.
    fn request_questions(self: &Arc<Self>, topic: String) {
        if self.torn_down.load(Ordering::SeqCst) {
            return;
        }
        lock(&self.questions).pending = true;

        let inner = Arc::clone(self);
        let handle = tokio::spawn(async move {
            let questions = inner.reflection.questions(&topic).await;
            if inner.torn_down.load(Ordering::SeqCst) {
                debug!(session = %inner.id, "Discarding reflection questions for torn-down session");
                return;
            }
            {
                let mut batch = lock(&inner.questions);
                batch.items = questions;
                batch.pending = false;
            }
            inner.publish();
        });

        if let Some(previous) = lock(&self.reflection_task).replace(handle) {
            previous.abort();
        }
    }
}

fn build_snapshot(
    id: Uuid,
    state: &TimerState,
    batch: &QuestionBatch,
    blocklist: &SiteBlocklist,
) -> TimerSnapshot {
    TimerSnapshot {
        id,
        phase: state.phase,
        remaining_seconds: state.remaining_seconds,
        total_seconds: state.phase_total_seconds(),
        progress_fraction: state.progress_fraction(),
        display: state.display_time(),
        long_break: state.is_long_break(),
        current_session_index: state.current_session_index,
        session_number: state.session_number(),
        completed_sessions: state.completed_sessions,
        focus_seconds: state.focus_seconds,
        topic: state.topic.clone(),
        muted: state.muted,
        settings: state.settings,
        questions: batch.items.clone(),
        questions_pending: batch.pending,
        blocking_enabled: blocklist.enabled,
        blocked_sites: blocklist.sites.clone(),
    }
}

/// Live focus sessions, one per open focus view
pub struct FocusRegistry {
    sessions: RwLock<HashMap<Uuid, Arc<FocusSession>>>,
    reflection: Arc<ReflectionGenerator>,
    tick_interval: Duration,
}

impl FocusRegistry {
    pub fn new(reflection: Arc<ReflectionGenerator>, tick_interval: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            reflection,
            tick_interval,
        }
    }

    pub fn reflection(&self) -> &Arc<ReflectionGenerator> {
        &self.reflection
    }

    pub fn create(&self, settings: TimerSettings) -> Result<Arc<FocusSession>, TimerError> {
        settings.validate()?;
        let id = Uuid::new_v4();
        let session = Arc::new(FocusSession::new(
            id,
            TimerState::new(settings),
            Arc::clone(&self.reflection),
            self.tick_interval,
        ));
        self.sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, Arc::clone(&session));
        info!(session = %id, "Focus session opened");
        Ok(session)
    }

    /// Look up a session and mark it as recently used
    pub fn get(&self, id: &Uuid) -> Option<Arc<FocusSession>> {
        let session = self
            .sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()?;
        session.touch();
        Some(session)
    }

    /// Close a session; its timers are cancelled even if a handler still holds it.
    pub fn remove(&self, id: &Uuid) -> bool {
        let removed = self
            .sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(id);
        match removed {
            Some(session) => {
                session.teardown();
                true
            }
            None => false,
        }
    }

    /// Close every session that is not counting down and has not been
    /// requested for `max_idle`. Returns how many were closed.
    pub fn sweep_idle(&self, max_idle: Duration) -> usize {
        let expired: Vec<Arc<FocusSession>> = {
            let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
            let stale: Vec<Uuid> = sessions
                .iter()
                .filter(|(_, session)| session.is_stale(max_idle))
                .map(|(id, _)| *id)
                .collect();
            stale.iter().filter_map(|id| sessions.remove(id)).collect()
        };

        for session in &expired {
            session.teardown();
            debug!(session = %session.id(), "Idle focus session expired");
        }
        expired.len()
    }

    pub fn len(&self) -> usize {
        self.sessions.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn teardown_all(&self) {
        let sessions: Vec<_> = self
            .sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .drain()
            .collect();
        for (_, session) in &sessions {
            session.teardown();
        }
        if !sessions.is_empty() {
            info!(count = sessions.len(), "Closed all focus sessions");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::generator::mock::MockGenerator;

    const QUESTIONS: &str = r#"[
        {"question": "What surprised you about limits?"},
        {"question": "Where would you use a derivative?"},
        {"question": "How do integrals relate to area?"}
    ]"#;

    fn session_ticking(generator: MockGenerator, settings: TimerSettings, tick: Duration) -> FocusSession {
        let reflection = Arc::new(ReflectionGenerator::new(
            Arc::new(generator),
            3,
            Duration::from_secs(10),
        ));
        FocusSession::new(Uuid::new_v4(), TimerState::new(settings), reflection, tick)
    }

    fn session_with(generator: MockGenerator, settings: TimerSettings) -> FocusSession {
        session_ticking(generator, settings, Duration::from_secs(1))
    }

    fn registry() -> FocusRegistry {
        let reflection = Arc::new(ReflectionGenerator::new(
            Arc::new(MockGenerator::failing()),
            3,
            Duration::from_secs(1),
        ));
        FocusRegistry::new(reflection, Duration::from_secs(1))
    }

    async fn advance(secs: f64) {
        tokio::time::sleep(Duration::from_secs_f64(secs)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn start_without_topic_stays_idle() {
        let session = session_with(MockGenerator::failing(), TimerSettings::default());
        assert_eq!(session.start(), Err(TimerError::TopicRequired));
        advance(5.0).await;

        let snap = session.snapshot();
        assert_eq!(snap.phase, TimerPhase::Idle);
        assert_eq!(snap.remaining_seconds, 1500);
    }

    #[tokio::test(start_paused = true)]
    async fn driver_runs_full_cycle_and_fetches_questions() {
        let generator = MockGenerator::replying(QUESTIONS);
        let session = session_with(generator, TimerSettings::new(1, 1, 2, 4));
        session.set_topic("Calculus").unwrap();
        let mut updates = session.subscribe();

        session.start().unwrap();
        advance(30.5).await;
        let snap = session.snapshot();
        assert_eq!(snap.phase, TimerPhase::Running);
        assert_eq!(snap.remaining_seconds, 30);
        assert!((snap.progress_fraction - 0.5).abs() < 1e-9);

        advance(30.0).await;
        let snap = session.snapshot();
        assert_eq!(snap.phase, TimerPhase::OnBreak);
        assert_eq!(snap.remaining_seconds, 60);
        assert_eq!(snap.completed_sessions, 1);

        advance(60.0).await;
        let snap = session.snapshot();
        assert_eq!(snap.phase, TimerPhase::Idle);
        assert_eq!(snap.current_session_index, 1);
        assert_eq!(snap.remaining_seconds, 60);
        assert_eq!(snap.questions.len(), 3);
        assert!(!snap.questions_pending);
        assert_eq!(snap.questions[0].question, "What surprised you about limits?");

        assert!(updates.has_changed().unwrap());
        assert_eq!(updates.borrow_and_update().phase, TimerPhase::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_provider_still_yields_three_questions() {
        let session = session_with(MockGenerator::failing(), TimerSettings::new(1, 1, 1, 4));
        session.set_topic("Organic Chemistry").unwrap();
        session.start().unwrap();
        advance(120.5).await;

        let snap = session.snapshot();
        assert_eq!(snap.phase, TimerPhase::Idle);
        assert_eq!(snap.questions.len(), 3);
        assert!(snap.questions.iter().all(|q| q.question.contains("Organic Chemistry")));
    }

    #[tokio::test(start_paused = true)]
    async fn pause_stops_and_resume_does_not_double_tick() {
        let session = session_with(MockGenerator::failing(), TimerSettings::default());
        session.set_topic("History").unwrap();
        session.start().unwrap();
        advance(10.5).await;
        assert_eq!(session.pause().remaining_seconds, 1490);

        advance(30.0).await;
        let snap = session.snapshot();
        assert_eq!(snap.phase, TimerPhase::Paused);
        assert_eq!(snap.remaining_seconds, 1490);

        session.start().unwrap();
        session.start().unwrap();
        advance(5.5).await;
        assert_eq!(session.snapshot().remaining_seconds, 1485);
    }

    #[tokio::test(start_paused = true)]
    async fn reset_cancels_countdown() {
        let session = session_with(MockGenerator::failing(), TimerSettings::default());
        session.set_topic("Physics").unwrap();
        session.start().unwrap();
        advance(42.5).await;

        let snap = session.reset();
        assert_eq!(snap.phase, TimerPhase::Idle);
        assert_eq!(snap.remaining_seconds, 1500);

        advance(10.0).await;
        assert_eq!(session.snapshot().remaining_seconds, 1500);
    }

    #[tokio::test(start_paused = true)]
    async fn teardown_discards_in_flight_questions() {
        let generator = Arc::new(MockGenerator::replying(QUESTIONS).with_delay(Duration::from_secs(5)));
        let reflection = Arc::new(ReflectionGenerator::new(
            generator.clone(),
            3,
            Duration::from_secs(30),
        ));
        let session = FocusSession::new(
            Uuid::new_v4(),
            TimerState::new(TimerSettings::new(1, 1, 1, 4)),
            reflection,
            Duration::from_secs(1),
        );
        session.set_topic("Biology").unwrap();
        session.start().unwrap();

        advance(120.5).await;
        assert!(session.snapshot().questions_pending);
        assert_eq!(generator.call_count(), 1);

        session.teardown();
        advance(30.0).await;

        let snap = session.snapshot();
        assert!(session.is_torn_down());
        assert!(snap.questions.is_empty());
        assert!(!snap.questions_pending);
    }

    #[tokio::test(start_paused = true)]
    async fn answers_are_kept_until_dismissed() {
        let session = session_with(MockGenerator::failing(), TimerSettings::new(1, 1, 1, 4));
        session.set_topic("Statistics").unwrap();
        session.start().unwrap();
        advance(120.5).await;

        let snap = session.answer_question(1, "Survey sampling").unwrap();
        assert_eq!(snap.questions[1].answer, "Survey sampling");
        assert!(session.answer_question(7, "nope").is_none());

        assert!(session.dismiss_questions().questions.is_empty());
    }

    #[tokio::test]
    async fn registry_create_get_remove() {
        let registry = registry();

        assert!(registry.create(TimerSettings::new(0, 5, 15, 4)).is_err());

        let session = registry.create(TimerSettings::default()).unwrap();
        let id = session.id();
        assert_eq!(registry.len(), 1);
        assert!(registry.get(&id).is_some());

        assert!(registry.remove(&id));
        assert!(session.is_torn_down());
        assert!(registry.get(&id).is_none());
        assert!(!registry.remove(&id));
        assert!(registry.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn closed_session_rejects_timer_commands() {
        let session = session_with(MockGenerator::failing(), TimerSettings::new(600, 5, 15, 4));
        session.set_topic("Geometry").unwrap();
        session.start().unwrap();
        advance(3.5).await;
        session.pause();

        session.teardown();
        assert_eq!(session.start(), Err(TimerError::Closed));
        assert_eq!(session.set_topic("Algebra"), Err(TimerError::Closed));
        assert_eq!(
            session.update_settings(TimerSettings::default()),
            Err(TimerError::Closed)
        );

        advance(10.0).await;
        let snap = session.snapshot();
        assert_eq!(snap.phase, TimerPhase::Paused);
        assert_eq!(snap.remaining_seconds, 35_997);
        assert!(!session.driver_alive());
    }

    #[tokio::test(start_paused = true)]
    async fn teardown_stops_a_running_countdown() {
        let session = session_with(MockGenerator::failing(), TimerSettings::default());
        session.set_topic("Geometry").unwrap();
        session.start().unwrap();
        advance(2.5).await;

        session.teardown();
        advance(10.0).await;
        assert_eq!(session.snapshot().remaining_seconds, 1498);
        assert!(!session.driver_alive());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn interleaved_pause_and_start_keep_a_driver() {
        for _ in 0..20 {
            let session = Arc::new(session_ticking(
                MockGenerator::failing(),
                TimerSettings::default(),
                Duration::from_millis(2),
            ));
            session.set_topic("Algebra").unwrap();
            session.start().unwrap();

            let workers: Vec<_> = (0..4)
                .map(|worker| {
                    let session = Arc::clone(&session);
                    tokio::task::spawn_blocking(move || {
                        for i in 0..100 {
                            if (i + worker) % 2 == 0 {
                                session.pause();
                            } else {
                                let _ = session.start();
                            }
                        }
                    })
                })
                .collect();
            for worker in workers {
                worker.await.unwrap();
            }

            let before = session.start().unwrap();
            assert_eq!(before.phase, TimerPhase::Running);
            assert!(session.driver_alive());

            tokio::time::sleep(Duration::from_millis(50)).await;
            assert!(session.snapshot().remaining_seconds < before.remaining_seconds);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn next_snapshot_waits_for_a_tick() {
        let session = session_with(MockGenerator::failing(), TimerSettings::default());
        let idle = session.next_snapshot(Duration::from_secs(3)).await;
        assert_eq!(idle.remaining_seconds, 1500);

        session.set_topic("Chemistry").unwrap();
        session.start().unwrap();
        let next = session.next_snapshot(Duration::from_secs(5)).await;
        assert_eq!(next.remaining_seconds, 1499);
    }

    #[tokio::test]
    async fn blocked_sites_show_in_snapshots() {
        let session = session_with(MockGenerator::failing(), TimerSettings::default());
        assert_eq!(session.snapshot().blocked_sites.len(), 5);

        let snap = session.block_site("https://www.tiktok.com").unwrap();
        assert!(snap.blocked_sites.contains(&"tiktok.com".to_string()));
        assert_eq!(
            session.block_site("tiktok.com"),
            Err(BlocklistError::AlreadyBlocked("tiktok.com".to_string()))
        );

        let snap = session.unblock_site("youtube.com").unwrap();
        assert_eq!(snap.blocked_sites.len(), 5);
        assert!(session.toggle_blocking().blocking_enabled);
    }

    #[tokio::test(start_paused = true)]
    async fn sweep_closes_only_idle_untouched_sessions() {
        let registry = registry();
        let forgotten = registry.create(TimerSettings::default()).unwrap();
        let running = registry.create(TimerSettings::new(120, 5, 15, 4)).unwrap();
        running.set_topic("Literature").unwrap();
        running.start().unwrap();
        let visited = registry.create(TimerSettings::default()).unwrap();

        advance(50.0 * 60.0).await;
        assert!(registry.get(&visited.id()).is_some());
        advance(10.0 * 60.0).await;

        assert_eq!(registry.sweep_idle(Duration::from_secs(45 * 60)), 1);
        assert!(forgotten.is_torn_down());
        assert!(registry.get(&forgotten.id()).is_none());
        assert!(!running.is_torn_down());
        assert!(!visited.is_torn_down());
        assert_eq!(registry.len(), 2);
    }
}
