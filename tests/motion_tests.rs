//! Motion updater integration tests.
//!
//! Airplane template: plane launch and flight, projectiles, and the
//! two-phase shot resolution window.

use glam::Vec2;
use math_arcade::core::{EngineConfig, EntityId, GameSettings, Millis, Question, Rejection};
use math_arcade::engine::{EndReason, Game, Input, Mechanic, SessionEvent};
use math_arcade::motion::MotionUpdater;
use math_arcade::templates::Template;

fn questions() -> Vec<Question> {
    vec![
        Question::new("2 + 3", 5).with_options(&[4, 5, 6]),
        Question::new("6 + 1", 7).with_options(&[7, 8, 9]),
    ]
}

fn start(questions: Vec<Question>) -> Game {
    Game::start(Template::Airplane, questions, &GameSettings::default(), EngineConfig::default(), 5).unwrap()
}

fn motion(game: &Game) -> &MotionUpdater {
    match game.mechanic() {
        Mechanic::Motion(motion) => motion,
        other => panic!("expected motion mechanic, got {:?}", other),
    }
}

fn plane_where(game: &Game, correct: bool) -> EntityId {
    motion(game)
        .planes()
        .iter()
        .find(|p| p.is_correct == correct)
        .map(|p| p.id)
        .unwrap()
}

// =============================================================================
// Flight Tests
// =============================================================================

/// One plane per option, each in its own lane.
#[test]
fn test_planes_launched() {
    let game = start(questions());
    let planes = motion(&game).planes();

    assert_eq!(planes.len(), 3);
    for (lane, plane) in planes.iter().enumerate() {
        assert_eq!(plane.position, Vec2::new(-20.0, 15.0 + 20.0 * lane as f32));
        assert!(plane.speed >= 0.3 && plane.speed < 0.5);
        assert!(plane.visible);
        assert_eq!(plane.question, 0);
    }
    assert_eq!(planes.iter().filter(|p| p.is_correct).count(), 1);
    assert_eq!(planes[1].value, 5);
}

/// Each tick moves every plane by its own speed.
#[test]
fn test_planes_move_per_tick() {
    let mut game = start(questions());
    let speeds: Vec<f32> = motion(&game).planes().iter().map(|p| p.speed).collect();

    game.advance_to(Millis(50));
    for (plane, speed) in motion(&game).planes().iter().zip(speeds) {
        assert_eq!(plane.position.x, -20.0 + speed);
    }
}

/// Planes past the right edge are no longer visible or targetable.
#[test]
fn test_planes_leave_the_sky() {
    let mut game = start(questions());
    let target = plane_where(&game, true);

    game.advance_to(Millis(30_000));
    assert!(motion(&game).planes().iter().all(|p| !p.visible && p.position.x >= 120.0));
    assert_eq!(game.handle(Input::Fire { plane: target }, Millis(30_000)), Err(Rejection::NotVisible(target)));
}

// =============================================================================
// Shot Resolution Tests
// =============================================================================

/// A hit on the correct plane scores after the travel time and advances
/// after the settle time.
#[test]
fn test_correct_shot() {
    let mut game = start(questions());
    let target = plane_where(&game, true);

    let events = game.handle(Input::Fire { plane: target }, Millis(100)).unwrap();
    assert!(matches!(
        events.as_slice(),
        [SessionEvent::Fired { target: t, origin, .. }] if *t == target && *origin == Vec2::new(5.0, 50.0)
    ));
    assert_eq!(motion(&game).projectiles().len(), 1);
    assert_eq!(game.handle(Input::Fire { plane: target }, Millis(200)), Err(Rejection::ResolutionPending));

    assert!(game.advance_to(Millis(599)).is_empty());
    let events = game.advance_to(Millis(600));
    assert_eq!(
        events,
        vec![
            SessionEvent::Answered {
                index: 0,
                correct: true,
                score: 1
            },
            SessionEvent::ShotResolved {
                plane: target,
                correct: true
            },
        ]
    );
    assert_eq!(motion(&game).resolved_plane(), Some(target));
    assert_eq!(game.handle(Input::Fire { plane: target }, Millis(700)), Err(Rejection::ResolutionPending));

    let events = game.advance_to(Millis(1600));
    assert_eq!(events, vec![SessionEvent::QuestionAdvanced { index: 1 }]);
    assert_eq!(motion(&game).pending(), None);
    assert!(motion(&game).projectiles().is_empty());
    assert!(motion(&game).planes().iter().all(|p| p.question == 1 && p.visible));
    assert_eq!(
        game.handle(Input::Fire { plane: target }, Millis(1700)),
        Err(Rejection::StaleTarget(target))
    );
}

/// Planes from earlier questions stay stale for the rest of the session.
#[test]
fn test_stale_planes_after_advance() {
    let mut game = start(questions());
    let first: Vec<EntityId> = motion(&game).planes().iter().map(|p| p.id).collect();
    let target = plane_where(&game, true);

    game.handle(Input::Fire { plane: target }, Millis(100)).unwrap();
    game.advance_to(Millis(1600));
    assert_eq!(game.session().index(), 1);

    for id in first {
        assert!(motion(&game).plane(id).is_none());
        assert_eq!(game.handle(Input::Fire { plane: id }, Millis(1700)), Err(Rejection::StaleTarget(id)));
    }
    assert_eq!(motion(&game).pending(), None);

    let current = plane_where(&game, true);
    assert!(game.handle(Input::Fire { plane: current }, Millis(1700)).is_ok());
}

/// A miss clears its marker and the question can be retried.
#[test]
fn test_wrong_shot_allows_retry() {
    let mut game = start(questions());
    let wrong = plane_where(&game, false);
    let right = plane_where(&game, true);

    game.handle(Input::Fire { plane: wrong }, Millis(100)).unwrap();
    let events = game.advance_to(Millis(600));
    assert_eq!(
        events,
        vec![SessionEvent::ShotResolved {
            plane: wrong,
            correct: false
        }]
    );
    assert_eq!(game.session().score(), 0);
    assert!(!game.session().is_locked());

    let events = game.advance_to(Millis(1600));
    assert_eq!(events, vec![SessionEvent::ShotCleared { plane: wrong }]);
    assert_eq!(game.session().index(), 0);

    game.handle(Input::Fire { plane: right }, Millis(1700)).unwrap();
    game.advance_to(Millis(2200));
    assert_eq!(game.session().score(), 1);
}

/// Projectiles travel right and are removed past the edge.
#[test]
fn test_projectile_flight() {
    let mut game = start(questions());
    let wrong = plane_where(&game, false);
    game.handle(Input::Fire { plane: wrong }, Millis(100)).unwrap();

    game.advance_to(Millis(150));
    assert_eq!(motion(&game).projectiles()[0].position, Vec2::new(7.0, 50.0));

    game.advance_to(Millis(2950));
    assert_eq!(motion(&game).projectiles().len(), 1);
    game.advance_to(Millis(3000));
    assert!(motion(&game).projectiles().is_empty());
}

#[test]
fn test_fire_unknown_plane() {
    let mut game = start(questions());
    let ghost = EntityId(999);
    assert_eq!(game.handle(Input::Fire { plane: ghost }, Millis(10)), Err(Rejection::UnknownEntity(ghost)));
    assert_eq!(game.handle(Input::Advance, Millis(10)), Err(Rejection::AdvanceScheduled));
}

/// Hitting the answer on the last question completes and stops the sky.
#[test]
fn test_last_hit_completes() {
    let mut game = start(vec![Question::new("1 + 1", 2).with_options(&[2, 3])]);
    let target = plane_where(&game, true);

    game.handle(Input::Fire { plane: target }, Millis(100)).unwrap();
    let events = game.advance_to(Millis(1600));
    assert!(matches!(
        events.last(),
        Some(SessionEvent::Completed { outcome, reason: EndReason::Exhausted }) if outcome.score == 1
    ));
    assert_eq!(game.pending_tasks(), 0);

    let positions: Vec<Vec2> = motion(&game).planes().iter().map(|p| p.position).collect();
    game.advance_to(Millis(5_000));
    let after: Vec<Vec2> = motion(&game).planes().iter().map(|p| p.position).collect();
    assert_eq!(positions, after);
}
