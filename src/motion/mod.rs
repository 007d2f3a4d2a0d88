//! Motion updater: planes crossing the sky and the projectiles fired at them.
//!
//! Two periodic loops share the session scope: `PlaneTick` moves planes,
//! `ProjectileTick` moves projectiles. They are independent; either may
//! run first on a shared due time.
//!
//! A shot resolves in two phases, both owned by the question scope:
//!
//! ```text
//! fire --shot_travel--> ShotLands (mark, score if correct)
//!      --shot_settle--> ShotSettles (advance if correct, else clear marker)
//! ```
//!
//! Firing is rejected for the whole window from `fire` to `ShotSettles`.

use glam::Vec2;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::clock::Scope;
use crate::core::{EntityId, MotionConfig, Rejection};
use crate::engine::{Ctx, Input, MechanicSystem, SessionEvent, Task};
use crate::session::Progress;

/// A moving target carrying one option.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    pub id: EntityId,
    pub value: i64,
    pub is_correct: bool,
    pub position: Vec2,
    /// Horizontal distance per tick.
    pub speed: f32,
    pub visible: bool,
    pub question: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub id: EntityId,
    pub position: Vec2,
    pub velocity: Vec2,
    /// Plane it was fired at.
    pub target: EntityId,
}

/// Progress of the shot being resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShotStage {
    InFlight,
    Resolved { correct: bool },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingShot {
    pub plane: EntityId,
    pub stage: ShotStage,
}

/// Planes, projectiles and the shot in progress.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MotionUpdater {
    planes: Vec<Plane>,
    /// Ids of planes launched for earlier questions.
    retired: Vec<EntityId>,
    projectiles: Vec<Projectile>,
    pending: Option<PendingShot>,
}

impl MotionUpdater {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn planes(&self) -> &[Plane] {
        &self.planes
    }

    #[must_use]
    pub fn plane(&self, id: EntityId) -> Option<&Plane> {
        self.planes.iter().find(|p| p.id == id)
    }

    #[must_use]
    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    #[must_use]
    pub fn pending(&self) -> Option<PendingShot> {
        self.pending
    }

    /// Plane whose hit marker is showing, if any.
    #[must_use]
    pub fn resolved_plane(&self) -> Option<EntityId> {
        match self.pending {
            Some(PendingShot {
                plane,
                stage: ShotStage::Resolved { .. },
            }) => Some(plane),
            _ => None,
        }
    }

    /// One plane per option of the current question, each in its own lane.
    fn launch(&mut self, ctx: &mut Ctx<'_>) {
        let config = &ctx.config.motion;
        let question = ctx.session.current();
        let index = ctx.session.index();

        self.retired.extend(self.planes.iter().map(|p| p.id));
        self.planes = question
            .option_values()
            .iter()
            .enumerate()
            .map(|(lane, &value)| Plane {
                id: ctx.ids.alloc(),
                value,
                is_correct: value == question.answer,
                position: Vec2::new(config.plane_start_x, config.lane_origin_y + lane as f32 * config.lane_spacing),
                speed: ctx.rng.gen_range_f32(config.speed_min..config.speed_max),
                visible: true,
                question: index,
            })
            .collect();
        debug!("launched {} plane(s) for question {}", self.planes.len(), index);
    }

    fn move_planes(&mut self, config: &MotionConfig) {
        for plane in self.planes.iter_mut().filter(|p| p.visible) {
            plane.position.x += plane.speed;
            if plane.position.x >= config.bound_x {
                plane.visible = false;
            }
        }
    }

    fn move_projectiles(&mut self, config: &MotionConfig) {
        for projectile in &mut self.projectiles {
            projectile.position += projectile.velocity;
        }
        self.projectiles.retain(|p| p.position.x < config.bound_x);
    }

    fn fire(&mut self, target: EntityId, ctx: &mut Ctx<'_>) -> Result<(), Rejection> {
        if self.pending.is_some() {
            return Err(Rejection::ResolutionPending);
        }
        if self.retired.contains(&target) {
            return Err(Rejection::StaleTarget(target));
        }
        let plane = self.plane(target).ok_or(Rejection::UnknownEntity(target))?;
        if !plane.visible {
            return Err(Rejection::NotVisible(target));
        }

        let config = &ctx.config.motion;
        let (origin, velocity, travel) = (config.muzzle, config.projectile_velocity, config.shot_travel);
        let projectile = Projectile {
            id: ctx.ids.alloc(),
            position: origin,
            velocity,
            target,
        };
        let id = projectile.id;
        self.projectiles.push(projectile);
        self.pending = Some(PendingShot {
            plane: target,
            stage: ShotStage::InFlight,
        });

        let scope = ctx.question_scope();
        ctx.after(travel, scope, Task::ShotLands { plane: target });
        ctx.emit(SessionEvent::Fired {
            projectile: id,
            target,
            origin,
        });
        Ok(())
    }

    fn land(&mut self, target: EntityId, ctx: &mut Ctx<'_>) {
        let Some(correct) = self.plane(target).map(|p| p.is_correct) else {
            warn!("shot landed on unknown {}", target);
            self.pending = None;
            return;
        };
        if correct {
            if let Err(rejection) = ctx.record(true) {
                warn!("could not score hit on {}: {}", target, rejection);
            }
        }
        self.pending = Some(PendingShot {
            plane: target,
            stage: ShotStage::Resolved { correct },
        });
        ctx.emit(SessionEvent::ShotResolved { plane: target, correct });

        let settle = ctx.config.motion.shot_settle;
        let scope = ctx.question_scope();
        ctx.after(settle, scope, Task::ShotSettles { plane: target, correct });
    }

    fn settle(&mut self, target: EntityId, correct: bool, ctx: &mut Ctx<'_>) {
        self.pending = None;
        if !correct {
            ctx.emit(SessionEvent::ShotCleared { plane: target });
            return;
        }
        match ctx.advance() {
            Ok(Progress::Next(_)) => {
                self.projectiles.clear();
                self.launch(ctx);
            }
            Ok(Progress::Complete(_)) => {}
            Err(rejection) => warn!("shot on {} could not advance: {}", target, rejection),
        }
    }
}

impl MechanicSystem for MotionUpdater {
    fn start(&mut self, ctx: &mut Ctx<'_>) {
        self.launch(ctx);
        let tick = ctx.config.motion.tick;
        ctx.every(tick, Scope::Session, Task::PlaneTick);
        ctx.every(tick, Scope::Session, Task::ProjectileTick);
    }

    fn on_task(&mut self, task: &Task, ctx: &mut Ctx<'_>) {
        match task {
            Task::PlaneTick => {
                if !ctx.session.is_complete() {
                    self.move_planes(&ctx.config.motion);
                }
            }
            Task::ProjectileTick => self.move_projectiles(&ctx.config.motion),
            Task::ShotLands { plane } => self.land(*plane, ctx),
            Task::ShotSettles { plane, correct } => self.settle(*plane, *correct, ctx),
            other => warn!("motion updater ignoring {:?}", other),
        }
    }

    fn handle(&mut self, input: &Input, ctx: &mut Ctx<'_>) -> Result<(), Rejection> {
        match input {
            Input::Fire { plane } => self.fire(*plane, ctx),
            Input::Advance => Err(Rejection::AdvanceScheduled),
            other => Err(Rejection::Unsupported { input: other.name() }),
        }
    }
}
