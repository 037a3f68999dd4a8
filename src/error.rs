//! Error types for the ladder service
//!
//! This module defines all error types using anyhow for consistent error handling
//! throughout the application.

/// Result type alias for convenience
pub type Result<T> = anyhow::Result<T>;

/// Custom error types for specific ladder scenarios
#[derive(Debug, thiserror::Error)]
pub enum LadderError {
    #[error("Player not found: {player_id}")]
    PlayerNotFound { player_id: String },

    #[error("Team not found: {team_id}")]
    TeamNotFound { team_id: String },

    #[error("Ladder not found: {ladder_id}")]
    LadderNotFound { ladder_id: String },

    #[error("Enrolment not found: {enrolment_id}")]
    EnrolmentNotFound { enrolment_id: String },

    #[error("Match not found: {match_id}")]
    MatchNotFound { match_id: String },

    #[error("Team {team_id} is not enrolled in ladder {ladder_id}")]
    TeamNotEnrolled { ladder_id: String, team_id: String },

    #[error("Team {team_id} is already enrolled in ladder {ladder_id}")]
    DuplicateEnrolment { ladder_id: String, team_id: String },

    #[error("A match needs two distinct teams, got {team_id} twice")]
    MatchBetweenSameTeam { team_id: String },

    #[error("Invalid team size: {size} (singles or doubles only)")]
    InvalidTeamSize { size: usize },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Internal service error: {message}")]
    Internal { message: String },
}
