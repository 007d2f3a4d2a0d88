//! The ten game templates and the mechanic each one runs on.
//!
//! A template is presentation plus a choice of mechanic. The engine only
//! cares about the mechanic; names and descriptions are here so hosts can
//! build a picker without duplicating the list.

use serde::{Deserialize, Serialize};

/// Interaction model a template selects at session start.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MechanicKind {
    /// Pick an option, advance when the host asks.
    Choice,
    /// Judge statements; advance automatically after feedback.
    Statements,
    /// Timed-reveal targets.
    Spawn,
    /// Moving targets and projectiles.
    Motion,
    /// Grid navigation and collection.
    Grid,
    /// Reorderable list validation.
    Order,
}

/// A game template.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Template {
    Quiz,
    MatchUp,
    TrueFalse,
    FindMatch,
    WhackAMole,
    Gameshow,
    Balloon,
    Maze,
    RankOrder,
    Airplane,
}

impl Template {
    /// Every template, in picker order.
    pub const ALL: [Template; 10] = [
        Template::Quiz,
        Template::MatchUp,
        Template::TrueFalse,
        Template::FindMatch,
        Template::WhackAMole,
        Template::Gameshow,
        Template::Balloon,
        Template::Maze,
        Template::RankOrder,
        Template::Airplane,
    ];

    /// Stable string id.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Template::Quiz => "quiz",
            Template::MatchUp => "matchup",
            Template::TrueFalse => "truefalse",
            Template::FindMatch => "findmatch",
            Template::WhackAMole => "whackamole",
            Template::Gameshow => "gameshow",
            Template::Balloon => "balloon",
            Template::Maze => "maze",
            Template::RankOrder => "rankorder",
            Template::Airplane => "airplane",
        }
    }

    /// Parse a string id.
    #[must_use]
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.id() == id)
    }

    /// Display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Template::Quiz => "Quiz",
            Template::MatchUp => "Match up",
            Template::TrueFalse => "True or false",
            Template::FindMatch => "Find the match",
            Template::WhackAMole => "Whack-a-mole",
            Template::Gameshow => "Gameshow quiz",
            Template::Balloon => "Balloon pop",
            Template::Maze => "Maze chase",
            Template::RankOrder => "Rank order",
            Template::Airplane => "Airplane",
        }
    }

    /// One-line description.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Template::Quiz => "Standard quiz format",
            Template::MatchUp => "Matching pairs game",
            Template::TrueFalse => "Binary choice questions",
            Template::FindMatch => "Memory card game",
            Template::WhackAMole => "Interactive whack game",
            Template::Gameshow => "TV-style gameshow",
            Template::Balloon => "Pop balloons game",
            Template::Maze => "Maze navigation game",
            Template::RankOrder => "Ordering items game",
            Template::Airplane => "Flying game format",
        }
    }

    #[must_use]
    pub const fn mechanic(self) -> MechanicKind {
        match self {
            Template::Quiz | Template::MatchUp | Template::FindMatch | Template::Gameshow => {
                MechanicKind::Choice
            }
            Template::TrueFalse => MechanicKind::Statements,
            Template::WhackAMole | Template::Balloon => MechanicKind::Spawn,
            Template::Airplane => MechanicKind::Motion,
            Template::Maze => MechanicKind::Grid,
            Template::RankOrder => MechanicKind::Order,
        }
    }

    /// Whether every question must carry options.
    #[must_use]
    pub const fn needs_options(self) -> bool {
        matches!(
            self.mechanic(),
            MechanicKind::Choice | MechanicKind::Motion | MechanicKind::Grid
        )
    }
}

impl std::fmt::Display for Template {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
