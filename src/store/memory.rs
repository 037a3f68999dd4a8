//! In-memory store implementation
//!
//! Backs the service with plain `RwLock<HashMap>` maps, one per entity.
//! Suitable for single-process deployments and tests; a database-backed
//! implementation would supply the same trait.

use crate::error::LadderError;
use crate::store::LadderStore;
use crate::types::{
    Enrolment, EnrolmentId, EntityKind, Ladder, LadderId, Match, MatchId, Player, PlayerId, Rating,
    Team, TeamId,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;
use tracing::debug;

/// In-memory ladder store
#[derive(Debug, Default)]
pub struct MemoryStore {
    players: RwLock<HashMap<PlayerId, Player>>,
    teams: RwLock<HashMap<TeamId, Team>>,
    ladders: RwLock<HashMap<LadderId, Ladder>>,
    enrolments: RwLock<HashMap<EnrolmentId, Enrolment>>,
    matches: RwLock<HashMap<MatchId, Match>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_poisoned(what: &str) -> LadderError {
    LadderError::Internal {
        message: format!("Failed to acquire {} lock", what),
    }
}

macro_rules! read_map {
    ($self:ident, $field:ident) => {
        $self
            .$field
            .read()
            .map_err(|_| lock_poisoned(stringify!($field)))?
    };
}

macro_rules! write_map {
    ($self:ident, $field:ident) => {
        $self
            .$field
            .write()
            .map_err(|_| lock_poisoned(stringify!($field)))?
    };
}

#[async_trait]
impl LadderStore for MemoryStore {
    async fn create_player(&self, player: Player) -> crate::error::Result<Player> {
        let mut players = write_map!(self, players);
        players.insert(player.id, player.clone());
        Ok(player)
    }

    async fn get_player(&self, id: PlayerId) -> crate::error::Result<Option<Player>> {
        let players = read_map!(self, players);
        Ok(players.get(&id).cloned())
    }

    async fn list_players(&self) -> crate::error::Result<Vec<Player>> {
        let players = read_map!(self, players);
        let mut all: Vec<Player> = players.values().cloned().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(all)
    }

    async fn update_player(&self, player: Player) -> crate::error::Result<Player> {
        let mut players = write_map!(self, players);
        if !players.contains_key(&player.id) {
            return Err(LadderError::PlayerNotFound {
                player_id: player.id.to_string(),
            }
            .into());
        }
        players.insert(player.id, player.clone());
        Ok(player)
    }

    async fn delete_player(&self, id: PlayerId) -> crate::error::Result<()> {
        let mut players = write_map!(self, players);
        if players.remove(&id).is_none() {
            return Err(LadderError::PlayerNotFound {
                player_id: id.to_string(),
            }
            .into());
        }
        Ok(())
    }

    async fn create_team(&self, team: Team) -> crate::error::Result<Team> {
        let mut teams = write_map!(self, teams);
        teams.insert(team.id, team.clone());
        Ok(team)
    }

    async fn get_team(&self, id: TeamId) -> crate::error::Result<Option<Team>> {
        let teams = read_map!(self, teams);
        Ok(teams.get(&id).cloned())
    }

    async fn list_teams(&self) -> crate::error::Result<Vec<Team>> {
        let teams = read_map!(self, teams);
        let mut all: Vec<Team> = teams.values().cloned().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(all)
    }

    async fn update_team(&self, team: Team) -> crate::error::Result<Team> {
        let mut teams = write_map!(self, teams);
        if !teams.contains_key(&team.id) {
            return Err(LadderError::TeamNotFound {
                team_id: team.id.to_string(),
            }
            .into());
        }
        teams.insert(team.id, team.clone());
        Ok(team)
    }

    async fn update_team_rating(
        &self,
        id: TeamId,
        new_rating: Rating,
    ) -> crate::error::Result<Team> {
        let mut teams = write_map!(self, teams);
        let team = teams.get_mut(&id).ok_or_else(|| LadderError::TeamNotFound {
            team_id: id.to_string(),
        })?;
        team.apply_rating(new_rating);
        Ok(team.clone())
    }

    async fn delete_team(&self, id: TeamId) -> crate::error::Result<()> {
        {
            let mut teams = write_map!(self, teams);
            if teams.remove(&id).is_none() {
                return Err(LadderError::TeamNotFound {
                    team_id: id.to_string(),
                }
                .into());
            }
        }

        // Cascade: a deleted team leaves no dangling enrolments
        let mut enrolments = write_map!(self, enrolments);
        let before = enrolments.len();
        enrolments.retain(|_, e| e.team_id != id);
        let removed = before - enrolments.len();
        if removed > 0 {
            debug!("Removed {} enrolments of deleted team {}", removed, id);
        }
        Ok(())
    }

    async fn create_ladder(&self, ladder: Ladder) -> crate::error::Result<Ladder> {
        let mut ladders = write_map!(self, ladders);
        ladders.insert(ladder.id, ladder.clone());
        Ok(ladder)
    }

    async fn get_ladder(&self, id: LadderId) -> crate::error::Result<Option<Ladder>> {
        let ladders = read_map!(self, ladders);
        Ok(ladders.get(&id).cloned())
    }

    async fn list_ladders(&self) -> crate::error::Result<Vec<Ladder>> {
        let ladders = read_map!(self, ladders);
        let mut all: Vec<Ladder> = ladders.values().cloned().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(all)
    }

    async fn delete_ladder(&self, id: LadderId) -> crate::error::Result<()> {
        {
            let mut ladders = write_map!(self, ladders);
            if ladders.remove(&id).is_none() {
                return Err(LadderError::LadderNotFound {
                    ladder_id: id.to_string(),
                }
                .into());
            }
        }

        {
            let mut enrolments = write_map!(self, enrolments);
            enrolments.retain(|_, e| e.ladder_id != id);
        }
        let mut matches = write_map!(self, matches);
        matches.retain(|_, m| m.ladder_id != id);
        Ok(())
    }

    async fn create_enrolment(&self, enrolment: Enrolment) -> crate::error::Result<Enrolment> {
        let mut enrolments = write_map!(self, enrolments);
        let duplicate = enrolments
            .values()
            .any(|e| e.ladder_id == enrolment.ladder_id && e.team_id == enrolment.team_id);
        if duplicate {
            return Err(LadderError::DuplicateEnrolment {
                ladder_id: enrolment.ladder_id.to_string(),
                team_id: enrolment.team_id.to_string(),
            }
            .into());
        }
        enrolments.insert(enrolment.id, enrolment.clone());
        Ok(enrolment)
    }

    async fn list_enrolments(&self, ladder_id: LadderId) -> crate::error::Result<Vec<Enrolment>> {
        let enrolments = read_map!(self, enrolments);
        let mut matching: Vec<Enrolment> = enrolments
            .values()
            .filter(|e| e.ladder_id == ladder_id)
            .cloned()
            .collect();
        matching.sort_by_key(|e| e.created_at);
        Ok(matching)
    }

    async fn is_enrolled(
        &self,
        ladder_id: LadderId,
        team_id: TeamId,
    ) -> crate::error::Result<bool> {
        let enrolments = read_map!(self, enrolments);
        Ok(enrolments
            .values()
            .any(|e| e.ladder_id == ladder_id && e.team_id == team_id))
    }

    async fn delete_enrolment(&self, id: EnrolmentId) -> crate::error::Result<()> {
        let mut enrolments = write_map!(self, enrolments);
        if enrolments.remove(&id).is_none() {
            return Err(LadderError::EnrolmentNotFound {
                enrolment_id: id.to_string(),
            }
            .into());
        }
        Ok(())
    }

    async fn create_match(&self, record: Match) -> crate::error::Result<Match> {
        let mut matches = write_map!(self, matches);
        matches.insert(record.id, record.clone());
        Ok(record)
    }

    async fn get_match(&self, id: MatchId) -> crate::error::Result<Option<Match>> {
        let matches = read_map!(self, matches);
        Ok(matches.get(&id).cloned())
    }

    async fn list_matches(&self, ladder_id: LadderId) -> crate::error::Result<Vec<Match>> {
        let matches = read_map!(self, matches);
        let mut matching: Vec<Match> = matches
            .values()
            .filter(|m| m.ladder_id == ladder_id)
            .cloned()
            .collect();
        matching.sort_by_key(|m| m.recorded_at);
        Ok(matching)
    }

    async fn count(&self, kind: EntityKind) -> crate::error::Result<usize> {
        let count = match kind {
            EntityKind::Player => read_map!(self, players).len(),
            EntityKind::Team => read_map!(self, teams).len(),
            EntityKind::Ladder => read_map!(self, ladders).len(),
            EntityKind::Enrolment => read_map!(self, enrolments).len(),
            EntityKind::Match => read_map!(self, matches).len(),
        };
        Ok(count)
    }

    async fn purge(&self, kind: EntityKind) -> crate::error::Result<usize> {
        let removed = match kind {
            EntityKind::Player => {
                let mut players = write_map!(self, players);
                let n = players.len();
                players.clear();
                n
            }
            EntityKind::Team => {
                let mut teams = write_map!(self, teams);
                let n = teams.len();
                teams.clear();
                n
            }
            EntityKind::Ladder => {
                let mut ladders = write_map!(self, ladders);
                let n = ladders.len();
                ladders.clear();
                n
            }
            EntityKind::Enrolment => {
                let mut enrolments = write_map!(self, enrolments);
                let n = enrolments.len();
                enrolments.clear();
                n
            }
            EntityKind::Match => {
                let mut matches = write_map!(self, matches);
                let n = matches.len();
                matches.clear();
                n
            }
        };

        debug!("Purged {} {} records", removed, kind);
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{MatchOutcome, DEFAULT_RATING};
    use crate::utils::{current_timestamp, generate_entity_id};

    fn test_team(name: &str) -> Team {
        Team::new(name, vec![], DEFAULT_RATING)
    }

    #[tokio::test]
    async fn test_player_crud() {
        let store = MemoryStore::new();
        let player = Player::new("Alex", Some("alex@club.example".to_string()));

        assert!(store.get_player(player.id).await.unwrap().is_none());

        store.create_player(player.clone()).await.unwrap();
        let retrieved = store.get_player(player.id).await.unwrap().unwrap();
        assert_eq!(retrieved.name, "Alex");

        let mut renamed = retrieved;
        renamed.name = "Alexandra".to_string();
        store.update_player(renamed).await.unwrap();
        assert_eq!(
            store.get_player(player.id).await.unwrap().unwrap().name,
            "Alexandra"
        );

        store.delete_player(player.id).await.unwrap();
        assert!(store.get_player(player.id).await.unwrap().is_none());
        assert!(store.delete_player(player.id).await.is_err());
    }

    #[tokio::test]
    async fn test_list_players_sorted_by_name() {
        let store = MemoryStore::new();
        store.create_player(Player::new("Zoe", None)).await.unwrap();
        store.create_player(Player::new("Ben", None)).await.unwrap();
        store.create_player(Player::new("Mia", None)).await.unwrap();

        let names: Vec<String> = store
            .list_players()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["Ben", "Mia", "Zoe"]);
    }

    #[tokio::test]
    async fn test_update_team_rating() {
        let store = MemoryStore::new();
        let team = store.create_team(test_team("Net Gains")).await.unwrap();
        assert_eq!(team.rating, DEFAULT_RATING);

        let updated = store.update_team_rating(team.id, 1216).await.unwrap();
        assert_eq!(updated.rating, 1216);
        assert_eq!(store.get_team(team.id).await.unwrap().unwrap().rating, 1216);

        let missing = store.update_team_rating(generate_entity_id(), 1300).await;
        assert!(missing.is_err());
    }

    #[tokio::test]
    async fn test_enrolment_uniqueness() {
        let store = MemoryStore::new();
        let ladder = store
            .create_ladder(Ladder::new("Spring Singles", None))
            .await
            .unwrap();
        let team = store.create_team(test_team("Drop Shots")).await.unwrap();

        store
            .create_enrolment(Enrolment::new(ladder.id, team.id))
            .await
            .unwrap();
        assert!(store.is_enrolled(ladder.id, team.id).await.unwrap());

        let duplicate = store
            .create_enrolment(Enrolment::new(ladder.id, team.id))
            .await;
        assert!(duplicate.is_err());
        assert_eq!(store.list_enrolments(ladder.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_team_cascades_enrolments() {
        let store = MemoryStore::new();
        let ladder = store
            .create_ladder(Ladder::new("Autumn Doubles", None))
            .await
            .unwrap();
        let team = store.create_team(test_team("Baseline")).await.unwrap();
        store
            .create_enrolment(Enrolment::new(ladder.id, team.id))
            .await
            .unwrap();

        store.delete_team(team.id).await.unwrap();

        assert!(!store.is_enrolled(ladder.id, team.id).await.unwrap());
        assert!(store.list_enrolments(ladder.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_ladder_cascades_matches() {
        let store = MemoryStore::new();
        let ladder = store
            .create_ladder(Ladder::new("Club Night", None))
            .await
            .unwrap();
        let team1 = store.create_team(test_team("Aces")).await.unwrap();
        let team2 = store.create_team(test_team("Faults")).await.unwrap();
        store
            .create_enrolment(Enrolment::new(ladder.id, team1.id))
            .await
            .unwrap();

        let record = Match {
            id: generate_entity_id(),
            ladder_id: ladder.id,
            team1_id: team1.id,
            team2_id: team2.id,
            outcome: MatchOutcome::Team1Win,
            rating_delta: Some(16),
            played_at: current_timestamp(),
            recorded_at: current_timestamp(),
        };
        store.create_match(record.clone()).await.unwrap();

        store.delete_ladder(ladder.id).await.unwrap();

        assert!(store.get_ladder(ladder.id).await.unwrap().is_none());
        assert!(store.get_match(record.id).await.unwrap().is_none());
        assert!(store.list_enrolments(ladder.id).await.unwrap().is_empty());
        // Teams survive ladder deletion
        assert!(store.get_team(team1.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_list_matches_filters_by_ladder() {
        let store = MemoryStore::new();
        let ladder1 = store
            .create_ladder(Ladder::new("Ladder A", None))
            .await
            .unwrap();
        let ladder2 = store
            .create_ladder(Ladder::new("Ladder B", None))
            .await
            .unwrap();
        let team1 = store.create_team(test_team("One")).await.unwrap();
        let team2 = store.create_team(test_team("Two")).await.unwrap();

        for (ladder_id, outcome) in [
            (ladder1.id, MatchOutcome::Team1Win),
            (ladder1.id, MatchOutcome::Draw),
            (ladder2.id, MatchOutcome::Team2Win),
        ] {
            store
                .create_match(Match {
                    id: generate_entity_id(),
                    ladder_id,
                    team1_id: team1.id,
                    team2_id: team2.id,
                    outcome,
                    rating_delta: None,
                    played_at: current_timestamp(),
                    recorded_at: current_timestamp(),
                })
                .await
                .unwrap();
        }

        assert_eq!(store.list_matches(ladder1.id).await.unwrap().len(), 2);
        assert_eq!(store.list_matches(ladder2.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_purge_by_kind() {
        let store = MemoryStore::new();
        store.create_player(Player::new("Sam", None)).await.unwrap();
        store.create_player(Player::new("Kim", None)).await.unwrap();
        store.create_team(test_team("Lobbers")).await.unwrap();

        let removed = store.purge(EntityKind::Player).await.unwrap();
        assert_eq!(removed, 2);
        assert!(store.list_players().await.unwrap().is_empty());

        // Other kinds untouched
        assert_eq!(store.list_teams().await.unwrap().len(), 1);

        assert_eq!(store.purge(EntityKind::Match).await.unwrap(), 0);
    }
}
