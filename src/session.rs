//! Session state machine and tick timer ownership
//!
//! A [`Session`] wraps one [`GameState`] with the run phase, the persisted
//! high score and the repeating tick timer. Every input source (timer,
//! keyboard, touch, buttons) goes through [`Session::dispatch`], which runs
//! to completion and leaves at most one live timer behind.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use crate::highscores::HighScore;
use crate::persistence::KeyValueStore;
use crate::sim::{Direction, GameState, TickOutcome, tick, tick_interval};

/// Current phase of the run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Ticking
    Running,
    /// Frozen until resumed
    Paused,
    /// Snake crashed; waiting for restart
    GameOver,
}

/// Everything that can happen to a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Timer fired
    Tick,
    /// Player asked for a direction
    Steer(Direction),
    /// Pause button / pause key
    TogglePause,
    /// Pause if running (tab hidden, window blur)
    Pause,
    /// Resume if paused
    Resume,
    /// Start over with a fresh snake
    Restart,
    /// Overlay button: resume when paused, restart after game over
    Confirm,
}

/// Notable things a command caused, for audio and HUD
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    FoodEaten { score: u64 },
    GameOver { score: u64 },
    NewHighScore { score: u64 },
    Paused,
    Resumed,
    Restarted,
}

/// Source of cancellable repeating timers
pub trait Scheduler {
    type Handle;

    /// Start a timer that delivers [`Command::Tick`] every `interval`
    fn start(&mut self, interval: Duration) -> Self::Handle;

    /// Stop a timer. It must not fire again.
    fn cancel(&mut self, handle: Self::Handle);
}

/// Inputs the live timer was armed for. Any change re-arms it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TimerKey {
    direction: Direction,
    phase: GamePhase,
    score: u64,
}

/// A single game session
pub struct Session<K: KeyValueStore, S: Scheduler> {
    state: GameState,
    phase: GamePhase,
    high_score: HighScore,
    store: K,
    scheduler: S,
    timer: Option<S::Handle>,
    timer_key: Option<TimerKey>,
}

impl<K: KeyValueStore, S: Scheduler> Session<K, S> {
    /// Start a running session. Reads the high score from `store` and arms
    /// the first tick timer.
    pub fn new(store: K, scheduler: S, seed: u64) -> Self {
        let high_score = HighScore::load(&store);
        let mut session = Self {
            state: GameState::new(seed),
            phase: GamePhase::Running,
            high_score,
            store,
            scheduler,
            timer: None,
            timer_key: None,
        };
        session.sync_timer();
        session
    }

    /// Apply one command and re-arm the timer if needed
    pub fn dispatch(&mut self, command: Command) -> Vec<GameEvent> {
        let mut events = Vec::new();

        match command {
            Command::Tick => self.step(&mut events),
            Command::Steer(direction) => {
                if self.phase == GamePhase::Running {
                    self.state.steer(direction);
                }
            }
            Command::TogglePause => match self.phase {
                GamePhase::Running => self.pause(&mut events),
                GamePhase::Paused => self.resume(&mut events),
                GamePhase::GameOver => {}
            },
            Command::Pause => {
                if self.phase == GamePhase::Running {
                    self.pause(&mut events);
                }
            }
            Command::Resume => {
                if self.phase == GamePhase::Paused {
                    self.resume(&mut events);
                }
            }
            Command::Restart => self.restart(&mut events),
            Command::Confirm => match self.phase {
                GamePhase::Running => {}
                GamePhase::Paused => self.resume(&mut events),
                GamePhase::GameOver => self.restart(&mut events),
            },
        }

        self.sync_timer();
        events
    }

    fn step(&mut self, events: &mut Vec<GameEvent>) {
        // Stray ticks outside Running are ignored
        if self.phase != GamePhase::Running {
            return;
        }

        match tick(&mut self.state) {
            TickOutcome::Moved => {}
            TickOutcome::Ate { score } => events.push(GameEvent::FoodEaten { score }),
            TickOutcome::Collided(collision) => {
                let score = self.state.score;
                self.phase = GamePhase::GameOver;
                log::info!("Game over ({:?}) with score {}", collision, score);
                events.push(GameEvent::GameOver { score });
                if self.high_score.record(score, &mut self.store) {
                    events.push(GameEvent::NewHighScore { score });
                }
            }
        }
    }

    fn pause(&mut self, events: &mut Vec<GameEvent>) {
        self.phase = GamePhase::Paused;
        log::info!("Paused");
        events.push(GameEvent::Paused);
    }

    fn resume(&mut self, events: &mut Vec<GameEvent>) {
        self.phase = GamePhase::Running;
        log::info!("Resumed");
        events.push(GameEvent::Resumed);
    }

    fn restart(&mut self, events: &mut Vec<GameEvent>) {
        self.state.reset();
        self.phase = GamePhase::Running;
        log::info!("Restarted (high score {})", self.high_score.get());
        events.push(GameEvent::Restarted);
    }

    /// Cancel the live timer if its inputs changed, then arm a new one
    /// while running.
    fn sync_timer(&mut self) {
        let key = TimerKey {
            direction: self.state.direction,
            phase: self.phase,
            score: self.state.score,
        };
        if self.timer_key == Some(key) {
            return;
        }

        if let Some(handle) = self.timer.take() {
            self.scheduler.cancel(handle);
        }
        if self.phase == GamePhase::Running {
            self.timer = Some(self.scheduler.start(self.tick_interval()));
        }
        self.timer_key = Some(key);
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[cfg(test)]
    pub(crate) fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn score(&self) -> u64 {
        self.state.score
    }

    pub fn high_score(&self) -> u64 {
        self.high_score.get()
    }

    pub fn is_paused(&self) -> bool {
        self.phase == GamePhase::Paused
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Interval the timer runs at for the current score
    pub fn tick_interval(&self) -> Duration {
        tick_interval(self.state.score)
    }

    pub fn store(&self) -> &K {
        &self.store
    }
}

impl<K: KeyValueStore, S: Scheduler> Drop for Session<K, S> {
    fn drop(&mut self) {
        if let Some(handle) = self.timer.take() {
            self.scheduler.cancel(handle);
        }
    }
}

/// Handle issued by [`ManualScheduler`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerId(u64);

#[derive(Debug, Default)]
struct ManualTimers {
    next_id: u64,
    started: u64,
    live: Vec<(TimerId, Duration)>,
}

/// Scheduler that never fires on its own: the owner delivers ticks.
///
/// Clones share the same timer table, so a clone kept outside the session
/// can observe what the session armed and cancelled. Used by tests and the
/// native headless run.
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    timers: Rc<RefCell<ManualTimers>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of timers started and not yet cancelled
    pub fn live_count(&self) -> usize {
        self.timers.borrow().live.len()
    }

    /// Total timers ever started
    pub fn started(&self) -> u64 {
        self.timers.borrow().started
    }

    /// Interval of the newest live timer
    pub fn interval(&self) -> Option<Duration> {
        self.timers.borrow().live.last().map(|(_, interval)| *interval)
    }

    pub fn is_armed(&self) -> bool {
        self.live_count() > 0
    }
}

impl Scheduler for ManualScheduler {
    type Handle = TimerId;

    fn start(&mut self, interval: Duration) -> TimerId {
        let mut timers = self.timers.borrow_mut();
        let id = TimerId(timers.next_id);
        timers.next_id += 1;
        timers.started += 1;
        timers.live.push((id, interval));
        id
    }

    fn cancel(&mut self, handle: TimerId) {
        self.timers.borrow_mut().live.retain(|(id, _)| *id != handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;
    use crate::sim::Cell;

    fn session() -> (Session<MemoryStore, ManualScheduler>, ManualScheduler) {
        let scheduler = ManualScheduler::new();
        let session = Session::new(MemoryStore::new(), scheduler.clone(), 12345);
        (session, scheduler)
    }

    /// Drive the snake from (10,10) right into the east wall
    fn crash(session: &mut Session<MemoryStore, ManualScheduler>) -> Vec<GameEvent> {
        let mut events = Vec::new();
        for _ in 0..20 {
            events.extend(session.dispatch(Command::Tick));
            if session.is_game_over() {
                break;
            }
        }
        events
    }

    #[test]
    fn test_starts_running_with_one_timer() {
        let (session, scheduler) = session();
        assert_eq!(session.phase(), GamePhase::Running);
        assert_eq!(session.score(), 0);
        assert_eq!(scheduler.live_count(), 1);
        assert_eq!(scheduler.interval(), Some(Duration::from_millis(150)));
    }

    #[test]
    fn test_pause_and_resume() {
        let (mut session, scheduler) = session();

        assert_eq!(session.dispatch(Command::TogglePause), vec![GameEvent::Paused]);
        assert!(session.is_paused());
        assert_eq!(scheduler.live_count(), 0);

        // Ticks and steering are ignored while paused
        let head = session.state().head();
        assert!(session.dispatch(Command::Tick).is_empty());
        session.dispatch(Command::Steer(Direction::Up));
        assert_eq!(session.state().head(), head);
        assert_eq!(session.state().direction, Direction::Right);

        assert_eq!(session.dispatch(Command::TogglePause), vec![GameEvent::Resumed]);
        assert_eq!(scheduler.live_count(), 1);

        // Auto-pause only pauses, Resume only resumes
        session.dispatch(Command::Pause);
        session.dispatch(Command::Pause);
        assert!(session.is_paused());
        session.dispatch(Command::Resume);
        session.dispatch(Command::Resume);
        assert_eq!(session.phase(), GamePhase::Running);
        assert_eq!(scheduler.live_count(), 1);
    }

    #[test]
    fn test_wall_crash_ends_game() {
        let (mut session, scheduler) = session();
        let events = crash(&mut session);

        assert!(session.is_game_over());
        assert!(events.contains(&GameEvent::GameOver { score: 0 }));
        assert_eq!(scheduler.live_count(), 0);
        // Fatal move not applied
        assert_eq!(session.state().head(), Cell::new(19, 10));

        // Terminal: ticks, steering and pause do nothing
        assert!(session.dispatch(Command::Tick).is_empty());
        assert!(session.dispatch(Command::Steer(Direction::Up)).is_empty());
        assert_eq!(session.state().direction, Direction::Right);
        assert!(session.dispatch(Command::TogglePause).is_empty());
        assert!(session.is_game_over());
        assert_eq!(scheduler.live_count(), 0);
    }

    #[test]
    fn test_eating_speeds_up_timer() {
        let (mut session, scheduler) = session();
        session.state_mut().food = Cell::new(11, 10);
        let started = scheduler.started();

        let events = session.dispatch(Command::Tick);
        assert_eq!(events, vec![GameEvent::FoodEaten { score: 1 }]);
        assert_eq!(session.score(), 1);
        assert_eq!(session.state().snake.len(), 2);
        assert_eq!(scheduler.started(), started + 1);
        assert_eq!(scheduler.live_count(), 1);
        assert_eq!(scheduler.interval(), Some(Duration::from_millis(148)));
    }

    #[test]
    fn test_plain_tick_keeps_timer() {
        let (mut session, scheduler) = session();
        let started = scheduler.started();
        session.dispatch(Command::Tick);
        assert_eq!(scheduler.started(), started);
        assert_eq!(scheduler.live_count(), 1);
    }

    #[test]
    fn test_direction_change_rearms_timer() {
        let (mut session, scheduler) = session();
        let started = scheduler.started();

        session.dispatch(Command::Steer(Direction::Up));
        assert_eq!(scheduler.started(), started + 1);
        assert_eq!(scheduler.live_count(), 1);

        // Rejected reversal changes nothing
        session.dispatch(Command::Steer(Direction::Down));
        assert_eq!(session.state().direction, Direction::Up);
        assert_eq!(scheduler.started(), started + 1);
    }

    #[test]
    fn test_restart_resets_run_but_keeps_high_score() {
        let (mut session, scheduler) = session();
        session.state_mut().score = 4;
        session.dispatch(Command::Steer(Direction::Down));
        crash(&mut session);
        assert_eq!(session.high_score(), 4);

        assert_eq!(session.dispatch(Command::Confirm), vec![GameEvent::Restarted]);
        assert_eq!(session.phase(), GamePhase::Running);
        assert_eq!(session.score(), 0);
        assert_eq!(session.state().snake, vec![Cell::new(10, 10)]);
        assert_eq!(session.state().food, Cell::new(5, 5));
        assert_eq!(session.state().direction, Direction::Right);
        assert_eq!(session.high_score(), 4);
        assert_eq!(scheduler.live_count(), 1);
        assert_eq!(scheduler.interval(), Some(Duration::from_millis(150)));
    }

    #[test]
    fn test_confirm_resumes_when_paused() {
        let (mut session, _scheduler) = session();
        session.dispatch(Command::Pause);
        assert_eq!(session.dispatch(Command::Confirm), vec![GameEvent::Resumed]);
        assert!(session.dispatch(Command::Confirm).is_empty());
    }

    #[test]
    fn test_high_score_persists_across_sessions() {
        let store = MemoryStore::new().with(HighScore::STORAGE_KEY, "3");
        let mut session = Session::new(store, ManualScheduler::new(), 1);
        assert_eq!(session.high_score(), 3);

        session.state_mut().score = 7;
        let events = crash(&mut session);
        assert!(events.contains(&GameEvent::NewHighScore { score: 7 }));
        assert_eq!(session.store().get(HighScore::STORAGE_KEY).as_deref(), Some("7"));

        session.dispatch(Command::Restart);
        session.state_mut().score = 2;
        let events = crash(&mut session);
        assert!(!events.iter().any(|e| matches!(e, GameEvent::NewHighScore { .. })));
        assert_eq!(session.high_score(), 7);

        // A new process reads the stored value
        let store = session.store().clone();
        let next = Session::new(store, ManualScheduler::new(), 2);
        assert_eq!(next.high_score(), 7);
    }

    #[test]
    fn test_high_score_recorded_once_per_game_over() {
        let (mut session, _scheduler) = session();
        session.state_mut().score = 5;
        let events = crash(&mut session);
        let count = events
            .iter()
            .filter(|e| matches!(e, GameEvent::NewHighScore { .. }))
            .count();
        assert_eq!(count, 1);
        assert!(session.dispatch(Command::Tick).is_empty());
    }

    #[test]
    fn test_drop_cancels_timer() {
        let (session, scheduler) = session();
        assert_eq!(scheduler.live_count(), 1);
        drop(session);
        assert_eq!(scheduler.live_count(), 0);
    }

    #[test]
    fn test_never_more_than_one_timer() {
        let (mut session, scheduler) = session();
        let commands = [
            Command::Steer(Direction::Up),
            Command::Tick,
            Command::TogglePause,
            Command::TogglePause,
            Command::Steer(Direction::Left),
            Command::Tick,
            Command::Restart,
            Command::Restart,
            Command::Tick,
        ];
        for command in commands {
            session.dispatch(command);
            assert!(scheduler.live_count() <= 1);
            assert_eq!(scheduler.live_count() == 1, session.phase() == GamePhase::Running);
        }
    }
}
