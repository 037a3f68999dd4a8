//! Persistence interface for ladder entities
//!
//! This module defines the store trait the rest of the service talks to,
//! with typed CRUD operations per entity and a single generic bulk purge.
//! The store is always injected explicitly; there is no ambient client.

pub mod memory;

pub use memory::MemoryStore;

use crate::types::{
    Enrolment, EnrolmentId, EntityKind, Ladder, LadderId, Match, MatchId, Player, PlayerId, Rating,
    Team, TeamId,
};
use async_trait::async_trait;

/// Trait for ladder persistence operations
///
/// `get_*` return `None` for unknown ids; `update_*` and `delete_*` fail
/// with the matching not-found error instead.
#[async_trait]
pub trait LadderStore: Send + Sync {
    // Players

    async fn create_player(&self, player: Player) -> crate::error::Result<Player>;

    async fn get_player(&self, id: PlayerId) -> crate::error::Result<Option<Player>>;

    async fn list_players(&self) -> crate::error::Result<Vec<Player>>;

    async fn update_player(&self, player: Player) -> crate::error::Result<Player>;

    async fn delete_player(&self, id: PlayerId) -> crate::error::Result<()>;

    // Teams

    async fn create_team(&self, team: Team) -> crate::error::Result<Team>;

    async fn get_team(&self, id: TeamId) -> crate::error::Result<Option<Team>>;

    async fn list_teams(&self) -> crate::error::Result<Vec<Team>>;

    async fn update_team(&self, team: Team) -> crate::error::Result<Team>;

    /// Persist a freshly computed rating onto one team
    async fn update_team_rating(
        &self,
        id: TeamId,
        new_rating: Rating,
    ) -> crate::error::Result<Team>;

    /// Delete a team and cascade its enrolments
    async fn delete_team(&self, id: TeamId) -> crate::error::Result<()>;

    // Ladders

    async fn create_ladder(&self, ladder: Ladder) -> crate::error::Result<Ladder>;

    async fn get_ladder(&self, id: LadderId) -> crate::error::Result<Option<Ladder>>;

    async fn list_ladders(&self) -> crate::error::Result<Vec<Ladder>>;

    /// Delete a ladder and cascade its enrolments and matches
    async fn delete_ladder(&self, id: LadderId) -> crate::error::Result<()>;

    // Enrolments

    /// Enrol a team into a ladder; a team can be enrolled at most once per ladder
    async fn create_enrolment(&self, enrolment: Enrolment) -> crate::error::Result<Enrolment>;

    async fn list_enrolments(&self, ladder_id: LadderId) -> crate::error::Result<Vec<Enrolment>>;

    async fn is_enrolled(
        &self,
        ladder_id: LadderId,
        team_id: TeamId,
    ) -> crate::error::Result<bool>;

    async fn delete_enrolment(&self, id: EnrolmentId) -> crate::error::Result<()>;

    // Matches

    async fn create_match(&self, record: Match) -> crate::error::Result<Match>;

    async fn get_match(&self, id: MatchId) -> crate::error::Result<Option<Match>>;

    async fn list_matches(&self, ladder_id: LadderId) -> crate::error::Result<Vec<Match>>;

    /// Number of stored records of one entity kind
    async fn count(&self, kind: EntityKind) -> crate::error::Result<usize>;

    /// Delete every record of one entity kind, returning the removed count
    async fn purge(&self, kind: EntityKind) -> crate::error::Result<usize>;
}
