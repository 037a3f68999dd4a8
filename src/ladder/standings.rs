//! Ladder standings
//!
//! Builds the ranked table for one ladder: enrolled teams ordered by rating,
//! with win/loss/draw tallies from that ladder's recorded matches.

use crate::error::LadderError;
use crate::store::LadderStore;
use crate::types::{LadderId, MatchOutcome, Team, TeamId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::warn;

/// One row of a ladder table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandingsRow {
    /// 1-based position, best rating first
    pub rank: usize,
    pub team: Team,
    pub played: u32,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
}

#[derive(Debug, Clone, Copy, Default)]
struct Tally {
    wins: u32,
    losses: u32,
    draws: u32,
}

/// Compute the standings table for a ladder
///
/// Teams are ordered by rating descending, ties broken by name. Enrolments
/// whose team record has disappeared are skipped.
pub async fn standings(
    store: &dyn LadderStore,
    ladder_id: LadderId,
) -> crate::error::Result<Vec<StandingsRow>> {
    store
        .get_ladder(ladder_id)
        .await?
        .ok_or_else(|| LadderError::LadderNotFound {
            ladder_id: ladder_id.to_string(),
        })?;

    let enrolments = store.list_enrolments(ladder_id).await?;
    let matches = store.list_matches(ladder_id).await?;

    let mut tallies: HashMap<TeamId, Tally> = HashMap::new();
    for record in &matches {
        match record.outcome {
            MatchOutcome::Team1Win => {
                tallies.entry(record.team1_id).or_default().wins += 1;
                tallies.entry(record.team2_id).or_default().losses += 1;
            }
            MatchOutcome::Team2Win => {
                tallies.entry(record.team1_id).or_default().losses += 1;
                tallies.entry(record.team2_id).or_default().wins += 1;
            }
            MatchOutcome::Draw => {
                tallies.entry(record.team1_id).or_default().draws += 1;
                tallies.entry(record.team2_id).or_default().draws += 1;
            }
        }
    }

    let mut rows = Vec::with_capacity(enrolments.len());
    for enrolment in &enrolments {
        let Some(team) = store.get_team(enrolment.team_id).await? else {
            warn!(
                "Enrolment {} references missing team {}",
                enrolment.id, enrolment.team_id
            );
            continue;
        };

        let tally = tallies.get(&team.id).copied().unwrap_or_default();
        rows.push(StandingsRow {
            rank: 0,
            team,
            played: tally.wins + tally.losses + tally.draws,
            wins: tally.wins,
            losses: tally.losses,
            draws: tally.draws,
        });
    }

    rows.sort_by(|a, b| {
        b.team
            .rating
            .cmp(&a.team.rating)
            .then_with(|| a.team.name.cmp(&b.team.name))
    });
    for (index, row) in rows.iter_mut().enumerate() {
        row.rank = index + 1;
    }

    Ok(rows)
}
