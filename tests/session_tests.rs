//! Session controller integration tests.
//!
//! These drive the quiz family and true/false through `Game` and check
//! progression, scoring, rejection and completion.

use math_arcade::core::{EngineConfig, GameSettings, Millis, Question, Rejection, SessionError};
use math_arcade::engine::{EndReason, Game, Input, Mechanic, SessionEvent};
use math_arcade::session::{Outcome, Phase, Rating};
use math_arcade::templates::Template;

fn questions() -> Vec<Question> {
    vec![
        Question::new("1 + 1", 2).with_options(&[1, 2, 3, 4]),
        Question::new("2 + 3", 5).with_options(&[5, 6, 7, 8]),
        Question::new("4 + 4", 8).with_options(&[6, 7, 8, 9]),
    ]
}

fn start(template: Template, questions: Vec<Question>) -> Game {
    Game::start(template, questions, &GameSettings::default(), EngineConfig::default(), 42).unwrap()
}

fn completions(events: &[SessionEvent]) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, SessionEvent::Completed { .. }))
        .count()
}

// =============================================================================
// Quiz Flow Tests
// =============================================================================

/// Three questions, all answered correctly.
#[test]
fn test_three_question_quiz_all_correct() {
    let mut game = start(Template::Quiz, questions());
    let mut events = Vec::new();
    let mut t = 0;

    for answer in [2, 5, 8] {
        t += 500;
        events.extend(game.handle(Input::Answer(answer), Millis(t)).unwrap());
        t += 500;
        events.extend(game.handle(Input::Advance, Millis(t)).unwrap());
    }

    let state = game.session().state();
    assert_eq!(state.score, 3);
    assert!(state.complete);
    assert_eq!(state.index, 2);
    assert_eq!(completions(&events), 1);
    assert_eq!(
        events.last(),
        Some(&SessionEvent::Completed {
            outcome: Outcome::new(3, 3),
            reason: EndReason::Exhausted,
        })
    );
    assert_eq!(game.session().outcome().rating(), Rating::Perfect);
}

/// A second answer on the same question changes nothing.
#[test]
fn test_double_submit_rejected() {
    let mut game = start(Template::MatchUp, questions());

    game.handle(Input::Answer(3), Millis(100)).unwrap();
    let before = game.session().state();

    assert_eq!(game.handle(Input::Answer(2), Millis(200)), Err(Rejection::AlreadyAnswered));
    assert_eq!(game.session().state(), before);
    assert_eq!(game.session().score(), 0);
    assert_eq!(game.session().phase(), Phase::Answered { correct: false });
}

/// Advancing before answering is rejected.
#[test]
fn test_advance_requires_answer() {
    let mut game = start(Template::Gameshow, questions());
    assert_eq!(game.handle(Input::Advance, Millis(10)), Err(Rejection::NotAnswered));
    assert_eq!(game.session().index(), 0);
}

/// Answer events carry the index and running score.
#[test]
fn test_answer_events() {
    let mut game = start(Template::FindMatch, questions());

    let events = game.handle(Input::Answer(2), Millis(10)).unwrap();
    assert_eq!(
        events,
        vec![SessionEvent::Answered {
            index: 0,
            correct: true,
            score: 1
        }]
    );

    let events = game.handle(Input::Advance, Millis(20)).unwrap();
    assert_eq!(events, vec![SessionEvent::QuestionAdvanced { index: 1 }]);
}

/// Completion is terminal.
#[test]
fn test_inputs_after_completion_rejected() {
    let mut game = start(Template::Quiz, vec![Question::new("1 + 1", 2).with_options(&[1, 2])]);
    game.handle(Input::Answer(1), Millis(10)).unwrap();
    game.handle(Input::Advance, Millis(20)).unwrap();

    assert!(game.is_complete());
    assert_eq!(game.handle(Input::Answer(2), Millis(30)), Err(Rejection::SessionComplete));
    assert_eq!(game.handle(Input::Advance, Millis(40)), Err(Rejection::SessionComplete));
    assert!(game.exit().is_empty());
    assert_eq!(game.session().score(), 0);
}

/// Exit completes once, with what was scored so far.
#[test]
fn test_exit() {
    let mut game = start(Template::Quiz, questions());
    game.handle(Input::Answer(2), Millis(10)).unwrap();

    let events = game.exit();
    assert_eq!(
        events,
        vec![SessionEvent::Completed {
            outcome: Outcome::new(1, 3),
            reason: EndReason::Exited,
        }]
    );
    assert!(game.exit().is_empty());
    assert_eq!(game.pending_tasks(), 0);
}

/// Inputs a mechanic does not understand are rejected by name.
#[test]
fn test_unsupported_input() {
    let mut game = start(Template::Quiz, questions());
    assert_eq!(
        game.handle(Input::Whack { slot: 0 }, Millis(10)),
        Err(Rejection::Unsupported { input: "whack" })
    );
    assert_eq!(
        game.handle(Input::Verdict(true), Millis(10)),
        Err(Rejection::Unsupported { input: "verdict" })
    );
}

// =============================================================================
// Start Validation Tests
// =============================================================================

#[test]
fn test_start_rejects_empty_questions() {
    let result = Game::start(Template::Quiz, Vec::new(), &GameSettings::default(), EngineConfig::default(), 1);
    assert_eq!(result.err(), Some(SessionError::NoQuestions));
}

#[test]
fn test_start_rejects_missing_options() {
    let mut supply = questions();
    supply.push(Question::new("9 + 1", 10));

    let result = Game::start(Template::Quiz, supply, &GameSettings::default(), EngineConfig::default(), 1);
    assert_eq!(result.err(), Some(SessionError::MissingOptions { index: 3 }));
}

#[test]
fn test_start_rejects_malformed_options() {
    let supply = vec![Question::new("1 + 1", 2).with_options(&[3, 4, 5])];
    let result = Game::start(Template::Quiz, supply, &GameSettings::default(), EngineConfig::default(), 1);
    assert_eq!(result.err(), Some(SessionError::MalformedOptions { index: 0, hits: 0 }));
}

#[test]
fn test_start_rejects_invalid_config() {
    let config = EngineConfig::default().with_grid_size(1);
    let result = Game::start(Template::Quiz, questions(), &GameSettings::default(), config, 1);
    assert!(matches!(result.err(), Some(SessionError::InvalidConfig(_))));
}

/// `question_count` caps how many questions a session consumes.
#[test]
fn test_question_count_truncates() {
    let settings = GameSettings {
        question_count: 2,
        ..GameSettings::default()
    };
    let game = Game::start(Template::Quiz, questions(), &settings, EngineConfig::default(), 1).unwrap();
    assert_eq!(game.session().total(), 2);
}

// =============================================================================
// True/False Tests
// =============================================================================

fn true_false(probability: f64) -> Game {
    let config = EngineConfig::default().with_true_probability(probability);
    let supply = vec![Question::new("1 + 1", 2), Question::new("2 + 2", 4)];
    Game::start(Template::TrueFalse, supply, &GameSettings::default(), config, 7).unwrap()
}

/// Statements drawn as true are judged correct on a `true` verdict.
#[test]
fn test_true_false_verdict_scores() {
    let mut game = true_false(1.0);

    let Mechanic::Choice(board) = game.mechanic() else {
        panic!("true/false runs on the choice mechanic");
    };
    let deck = board.deck().unwrap();
    assert_eq!(deck[0].equation, "1 + 1 = 2");
    assert!(deck[0].is_true);

    let events = game.handle(Input::Verdict(true), Millis(100)).unwrap();
    assert_eq!(
        events,
        vec![SessionEvent::Answered {
            index: 0,
            correct: true,
            score: 1
        }]
    );
}

/// The next statement follows automatically after the feedback pause.
#[test]
fn test_true_false_auto_advance() {
    let mut game = true_false(1.0);
    game.handle(Input::Verdict(false), Millis(100)).unwrap();
    assert_eq!(game.session().score(), 0);

    assert_eq!(game.handle(Input::Advance, Millis(200)), Err(Rejection::AdvanceScheduled));
    assert_eq!(game.handle(Input::Verdict(true), Millis(300)), Err(Rejection::AlreadyAnswered));

    assert!(game.advance_to(Millis(1599)).is_empty());
    let events = game.advance_to(Millis(1600));
    assert_eq!(events, vec![SessionEvent::QuestionAdvanced { index: 1 }]);

    game.handle(Input::Verdict(true), Millis(1700)).unwrap();
    let events = game.advance_to(Millis(3200));
    assert_eq!(completions(&events), 1);
    assert_eq!(game.session().outcome(), Outcome::new(1, 2));
}

/// False statements reward a `false` verdict.
#[test]
fn test_true_false_false_statement() {
    let config = EngineConfig::default().with_true_probability(0.0);
    let supply: Vec<Question> = (0..10).map(|a| Question::new(format!("{} + 0", a), a)).collect();
    let mut game = Game::start(Template::TrueFalse, supply, &GameSettings::default(), config, 3).unwrap();

    let Mechanic::Choice(board) = game.mechanic() else {
        panic!("true/false runs on the choice mechanic");
    };
    let is_true = board.deck().unwrap()[0].is_true;

    game.handle(Input::Verdict(is_true), Millis(10)).unwrap();
    assert_eq!(game.session().score(), 1);
}
