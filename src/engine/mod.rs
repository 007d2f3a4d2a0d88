//! Game: one session controller composed with one mechanic.
//!
//! ## Driving a session
//!
//! The host owns time. It calls [`Game::advance_to`] as its frame clock
//! moves and [`Game::handle`] for every user interaction, passing the
//! current session time to both. Each call returns the events it produced.
//! Due tasks are always run before an interaction is applied, so the
//! interaction sees the state as of `now`.
//!
//! ```
//! use math_arcade::core::{EngineConfig, GameSettings, Millis, Question};
//! use math_arcade::engine::{Game, Input, SessionEvent};
//! use math_arcade::templates::Template;
//!
//! let questions = vec![
//!     Question::new("1 + 1", 2).with_options(&[1, 2, 3]),
//!     Question::new("2 + 2", 4).with_options(&[4, 5, 6]),
//! ];
//! let mut game = Game::start(
//!     Template::Quiz,
//!     questions,
//!     &GameSettings::default(),
//!     EngineConfig::default(),
//!     42,
//! )
//! .unwrap();
//!
//! game.handle(Input::Answer(2), Millis(100)).unwrap();
//! game.handle(Input::Advance, Millis(900)).unwrap();
//! game.handle(Input::Answer(5), Millis(1500)).unwrap();
//! let events = game.handle(Input::Advance, Millis(2000)).unwrap();
//!
//! assert!(matches!(events.last(), Some(SessionEvent::Completed { outcome, .. }) if outcome.score == 1));
//! ```

mod context;
mod event;
mod input;
mod task;

pub use context::Ctx;
pub use event::{EndReason, HitKind, SessionEvent};
pub use input::Input;
pub use task::Task;

use log::{debug, info, trace};
use serde::{Deserialize, Serialize};

use crate::choice::ChoiceBoard;
use crate::clock::TimerQueue;
use crate::core::{
    EngineConfig, EntityAllocator, GameRng, GameRngState, GameSettings, Millis, Question, QuestionSet,
    Rejection, SessionError,
};
use crate::grid::GridNavigator;
use crate::motion::MotionUpdater;
use crate::order::OrderValidator;
use crate::session::{SessionController, SessionState};
use crate::spawn::SpawnScheduler;
use crate::templates::{MechanicKind, Template};

/// Contract every mechanic implements.
///
/// The `Game` owns all state; a mechanic only sees it through [`Ctx`] for
/// the duration of one call.
pub trait MechanicSystem {
    /// Build first-question state and arm timers.
    fn start(&mut self, ctx: &mut Ctx<'_>);

    /// React to a fired task. Tasks for other mechanics are ignored.
    fn on_task(&mut self, task: &Task, ctx: &mut Ctx<'_>);

    /// Apply a user interaction.
    fn handle(&mut self, input: &Input, ctx: &mut Ctx<'_>) -> Result<(), Rejection>;
}

/// The mechanic variant a template runs on.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum Mechanic {
    Choice(ChoiceBoard),
    Spawn(SpawnScheduler),
    Motion(MotionUpdater),
    Grid(GridNavigator),
    Order(OrderValidator),
}

impl Mechanic {
    fn system(&mut self) -> &mut dyn MechanicSystem {
        match self {
            Mechanic::Choice(m) => m,
            Mechanic::Spawn(m) => m,
            Mechanic::Motion(m) => m,
            Mechanic::Grid(m) => m,
            Mechanic::Order(m) => m,
        }
    }
}

/// Read-only view of a running game for rendering.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub template: Template,
    pub clock: Millis,
    pub session: SessionState,
    pub total: usize,
    pub mechanic: Mechanic,
    pub rng: GameRngState,
}

/// A running session.
pub struct Game {
    template: Template,
    session: SessionController,
    mechanic: Mechanic,
    timers: TimerQueue<Task>,
    rng: GameRng,
    ids: EntityAllocator,
    config: EngineConfig,
    clock: Millis,
    /// Events produced by tasks that ran ahead of a rejected input.
    outbox: Vec<SessionEvent>,
}

impl Game {
    /// Validate the inputs and start a session at time zero.
    pub fn start(
        template: Template,
        questions: Vec<Question>,
        settings: &GameSettings,
        config: EngineConfig,
        seed: u64,
    ) -> Result<Self, SessionError> {
        config.validate()?;
        let questions = QuestionSet::from_supply(questions, settings)?;
        if template.needs_options() {
            questions.require_options()?;
        }

        let rng = GameRng::new(seed).for_context(template.id());
        let (session, mechanic) = match template.mechanic() {
            MechanicKind::Choice => (SessionController::new(questions), Mechanic::Choice(ChoiceBoard::manual())),
            MechanicKind::Statements => {
                let mut deck_rng = rng.for_context("statements");
                let board = ChoiceBoard::statements(&questions, &config.choice, &mut deck_rng);
                (SessionController::new(questions), Mechanic::Choice(board))
            }
            MechanicKind::Spawn => (
                SessionController::new(questions),
                Mechanic::Spawn(SpawnScheduler::new(config.spawn.slots)),
            ),
            MechanicKind::Motion => (SessionController::new(questions), Mechanic::Motion(MotionUpdater::new())),
            MechanicKind::Grid => {
                GridNavigator::check_capacity(config.grid.size, questions.max_options())?;
                (
                    SessionController::new(questions),
                    Mechanic::Grid(GridNavigator::new(config.grid.size)),
                )
            }
            MechanicKind::Order => (
                SessionController::with_rounds(questions, 1),
                Mechanic::Order(OrderValidator::new()),
            ),
        };

        let mut game = Self {
            template,
            session,
            mechanic,
            timers: TimerQueue::new(),
            rng,
            ids: EntityAllocator::new(),
            config,
            clock: Millis::ZERO,
            outbox: Vec::new(),
        };

        info!(
            "starting {} with {} round(s) over {} question(s)",
            template,
            game.session.total(),
            game.session.questions().len()
        );

        let mut events = Vec::new();
        game.with_ctx(Millis::ZERO, &mut events, |mechanic, ctx| mechanic.start(ctx));
        game.outbox = events;
        Ok(game)
    }

    /// Run every task due at or before `now`.
    pub fn advance_to(&mut self, now: Millis) -> Vec<SessionEvent> {
        let mut events = std::mem::take(&mut self.outbox);
        self.run_due(now, &mut events);
        events
    }

    /// Apply a user interaction at `now`.
    ///
    /// Tasks due at or before `now` run first. On rejection the events from
    /// those tasks are not lost; they are returned by the next call.
    pub fn handle(&mut self, input: Input, now: Millis) -> Result<Vec<SessionEvent>, Rejection> {
        let mut events = std::mem::take(&mut self.outbox);
        self.run_due(now, &mut events);

        if self.session.is_complete() {
            debug!("{} rejected: session complete", input.name());
            self.outbox = events;
            return Err(Rejection::SessionComplete);
        }

        let at = self.clock;
        let result = self.with_ctx(at, &mut events, |mechanic, ctx| mechanic.handle(&input, ctx));
        match result {
            Ok(()) => Ok(events),
            Err(rejection) => {
                debug!("{} rejected: {}", input.name(), rejection);
                self.outbox = events;
                Err(rejection)
            }
        }
    }

    /// Leave the session. Cancels every pending task and reports
    /// completion if it had not happened yet.
    pub fn exit(&mut self) -> Vec<SessionEvent> {
        let mut events = std::mem::take(&mut self.outbox);
        let at = self.clock;
        self.with_ctx(at, &mut events, |_, ctx| ctx.conclude(EndReason::Exited));
        events
    }

    // === Queries ===

    #[must_use]
    pub fn template(&self) -> Template {
        self.template
    }

    #[must_use]
    pub fn session(&self) -> &SessionController {
        &self.session
    }

    #[must_use]
    pub fn mechanic(&self) -> &Mechanic {
        &self.mechanic
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Time of the last processed call.
    #[must_use]
    pub fn clock(&self) -> Millis {
        self.clock
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.session.is_complete()
    }

    /// Number of scheduled tasks still pending.
    #[must_use]
    pub fn pending_tasks(&self) -> usize {
        self.timers.len()
    }

    /// Due time of the next scheduled task.
    #[must_use]
    pub fn next_due(&self) -> Option<Millis> {
        self.timers.next_due()
    }

    /// Remaining duration for timed-reveal templates.
    #[must_use]
    pub fn time_left(&self) -> Option<Millis> {
        match &self.mechanic {
            Mechanic::Spawn(spawn) => Some(spawn.time_left(self.clock, &self.config.spawn)),
            _ => None,
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            template: self.template,
            clock: self.clock,
            session: self.session.state(),
            total: self.session.total(),
            mechanic: self.mechanic.clone(),
            rng: self.rng.state(),
        }
    }

    // === Internals ===

    fn run_due(&mut self, now: Millis, events: &mut Vec<SessionEvent>) {
        if now < self.clock {
            trace!("clock moved backwards ({} < {}), holding at {}", now, self.clock, self.clock);
        }
        let now = now.max(self.clock);

        while let Some(fired) = self.timers.pop_due(now) {
            let task = fired.task;
            self.with_ctx(fired.due, events, |mechanic, ctx| mechanic.on_task(&task, ctx));
        }
        self.clock = now;
    }

    fn with_ctx<R>(
        &mut self,
        now: Millis,
        events: &mut Vec<SessionEvent>,
        f: impl FnOnce(&mut dyn MechanicSystem, &mut Ctx<'_>) -> R,
    ) -> R {
        let Game {
            session,
            mechanic,
            timers,
            rng,
            ids,
            config,
            ..
        } = self;
        let mut ctx = Ctx {
            now,
            session,
            timers,
            rng,
            ids,
            config,
            events,
        };
        f(mechanic.system(), &mut ctx)
    }
}
