//! Common types used throughout the ladder service

use crate::utils::{current_timestamp, generate_entity_id};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for players
pub type PlayerId = Uuid;

/// Unique identifier for teams
pub type TeamId = Uuid;

/// Unique identifier for ladders
pub type LadderId = Uuid;

/// Unique identifier for enrolments
pub type EnrolmentId = Uuid;

/// Unique identifier for matches
pub type MatchId = Uuid;

/// Rating points are whole numbers
pub type Rating = i32;

/// Rating assigned to teams that have not played yet
pub const DEFAULT_RATING: Rating = 1200;

/// Outcome of a recorded match, seen from team1's side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchOutcome {
    Team1Win,
    Team2Win,
    Draw,
}

impl MatchOutcome {
    /// Score achieved by team1: 1 for a win, 0 for a loss, 0.5 for a draw
    pub fn team1_score(&self) -> f64 {
        match self {
            MatchOutcome::Team1Win => 1.0,
            MatchOutcome::Team2Win => 0.0,
            MatchOutcome::Draw => 0.5,
        }
    }

    pub fn is_draw(&self) -> bool {
        matches!(self, MatchOutcome::Draw)
    }
}

impl std::fmt::Display for MatchOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchOutcome::Team1Win => write!(f, "Team1Win"),
            MatchOutcome::Team2Win => write!(f, "Team2Win"),
            MatchOutcome::Draw => write!(f, "Draw"),
        }
    }
}

/// A club member
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Player {
    pub fn new(name: impl Into<String>, email: Option<String>) -> Self {
        Self {
            id: generate_entity_id(),
            name: name.into(),
            email,
            created_at: current_timestamp(),
        }
    }
}

/// A competing side: one player for singles, two for doubles
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub rating: Rating,
    pub players: Vec<PlayerId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Team {
    pub fn new(name: impl Into<String>, players: Vec<PlayerId>, rating: Rating) -> Self {
        let now = current_timestamp();
        Self {
            id: generate_entity_id(),
            name: name.into(),
            rating,
            players,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a freshly computed rating and bump the update timestamp
    pub fn apply_rating(&mut self, new_rating: Rating) {
        self.rating = new_rating;
        self.updated_at = current_timestamp();
    }
}

/// A named competition grouping into which teams enrol
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ladder {
    pub id: LadderId,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Ladder {
    pub fn new(name: impl Into<String>, description: Option<String>) -> Self {
        Self {
            id: generate_entity_id(),
            name: name.into(),
            description,
            created_at: current_timestamp(),
        }
    }
}

/// Association between a team and a ladder
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enrolment {
    pub id: EnrolmentId,
    pub ladder_id: LadderId,
    pub team_id: TeamId,
    pub created_at: DateTime<Utc>,
}

impl Enrolment {
    pub fn new(ladder_id: LadderId, team_id: TeamId) -> Self {
        Self {
            id: generate_entity_id(),
            ladder_id,
            team_id,
            created_at: current_timestamp(),
        }
    }
}

/// A recorded match between two enrolled teams
///
/// `rating_delta` is the points moved onto team1's rating by this result
/// (negative when team1 lost points). It is stored denormalized so match
/// history can be displayed without recomputing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    pub ladder_id: LadderId,
    pub team1_id: TeamId,
    pub team2_id: TeamId,
    pub outcome: MatchOutcome,
    pub rating_delta: Option<i32>,
    pub played_at: DateTime<Utc>,
    pub recorded_at: DateTime<Utc>,
}

/// Applied rating change for one side of a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingUpdate {
    pub team_id: TeamId,
    pub old_rating: Rating,
    pub new_rating: Rating,
}

impl RatingUpdate {
    pub fn delta(&self) -> i32 {
        self.new_rating - self.old_rating
    }
}

/// Entity kinds addressable by the generic bulk purge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Player,
    Team,
    Ladder,
    Enrolment,
    Match,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityKind::Player => write!(f, "player"),
            EntityKind::Team => write!(f, "team"),
            EntityKind::Ladder => write!(f, "ladder"),
            EntityKind::Enrolment => write!(f, "enrolment"),
            EntityKind::Match => write!(f, "match"),
        }
    }
}

impl std::str::FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "player" | "players" => Ok(EntityKind::Player),
            "team" | "teams" => Ok(EntityKind::Team),
            "ladder" | "ladders" => Ok(EntityKind::Ladder),
            "enrolment" | "enrolments" => Ok(EntityKind::Enrolment),
            "match" | "matches" => Ok(EntityKind::Match),
            other => Err(format!("Unknown entity kind: {}", other)),
        }
    }
}
