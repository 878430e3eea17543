use kanau::processor::Processor;
use uuid::Uuid;

use crate::engine::{self, EngineError, GameSet, Match, PointOutcome, TeamSlot};
use crate::entities::matches::{
    ListMatches, LoadMatch, MatchExists, MatchRecord, MatchRows, SaveMatch,
};
use crate::entities::players::{PlayerRecord, PlayerState};
use crate::entities::sets::{GetSet, GetSetsOfMatches};
use crate::entities::teams::assemble_teams;
use crate::entities::{MatchStatus, Side};

use super::{MatchService, ServiceError};

impl MatchService {
    /// Lock and load a match, apply `op`, and persist the result in one
    /// transaction.
    async fn modify_match<T, F>(&self, match_id: Uuid, op: F) -> Result<(Match, T), ServiceError>
    where
        F: FnOnce(&mut Match) -> Result<T, EngineError>,
    {
        let mut tx = self.pool.begin().await?;
        let mut m = MatchRows::lock_tx(&mut tx, match_id)
            .await?
            .ok_or_else(|| ServiceError::match_not_found(match_id))?
            .into_match()?;

        let output = op(&mut m)?;

        SaveMatch::try_from(&m)?.execute_tx(&mut tx).await?;
        tx.commit().await?;
        Ok((m, output))
    }

    pub async fn start_match(
        &self,
        team_a_id: i64,
        team_b_id: i64,
        serving: TeamSlot,
        start_side: Side,
    ) -> Result<Match, ServiceError> {
        let mut tx = self.pool.begin().await?;
        let team_ids = [team_a_id, team_b_id];
        let players = PlayerRecord::lock_for_teams_tx(&mut tx, &team_ids).await?;
        // Players are created together with their team, so a team without
        // player rows does not exist.
        let teams = assemble_teams(&team_ids, players);
        let find = |id: i64| {
            teams
                .iter()
                .find(|t| t.id == id && !t.players.is_empty())
                .cloned()
                .ok_or_else(|| ServiceError::team_not_found(id))
        };
        let (team_a, team_b) = (find(team_a_id)?, find(team_b_id)?);

        let date = time::OffsetDateTime::now_utc().date();
        let m = engine::start_match(team_a, team_b, serving, start_side, date)?;

        SaveMatch::try_from(&m)?.execute_tx(&mut tx).await?;
        tx.commit().await?;
        tracing::info!(
            match_id = %m.id,
            team_a_id,
            team_b_id,
            serving = %serving,
            side = %start_side,
            "Match started"
        );
        Ok(m)
    }

    pub async fn award_point(&self, match_id: Uuid, team: TeamSlot) -> Result<Match, ServiceError> {
        let (m, outcome) = self
            .modify_match(match_id, |m| engine::award_point(m, team))
            .await?;
        log_point(&m, team, outcome);
        Ok(m)
    }

    pub async fn undo_last_point(
        &self,
        match_id: Uuid,
        team: TeamSlot,
    ) -> Result<Match, ServiceError> {
        let (m, changed) = self
            .modify_match(match_id, |m| engine::undo_last_point(m, team))
            .await?;
        if changed {
            tracing::info!(match_id = %m.id, team = %team, score = %score(&m), "Point undone");
        } else {
            tracing::debug!(match_id = %m.id, team = %team, "Nothing to undo");
        }
        Ok(m)
    }

    pub async fn abort_match(
        &self,
        match_id: Uuid,
        forfeiting: TeamSlot,
    ) -> Result<Match, ServiceError> {
        let (m, ()) = self
            .modify_match(match_id, |m| engine::abort_match(m, forfeiting))
            .await?;
        tracing::info!(match_id = %m.id, forfeiting = %forfeiting, "Match forfeited");
        Ok(m)
    }

    pub async fn override_serve_side(
        &self,
        match_id: Uuid,
        side: Side,
    ) -> Result<Match, ServiceError> {
        let (m, ()) = self
            .modify_match(match_id, |m| engine::override_serve_side(m, side))
            .await?;
        tracing::info!(match_id = %m.id, side = %side, "Serve side overridden");
        Ok(m)
    }

    pub async fn is_break_recommended(&self, match_id: Uuid) -> Result<bool, ServiceError> {
        let m = self.get_match(match_id).await?;
        Ok(engine::is_break_recommended(&m)?)
    }

    pub async fn get_match(&self, match_id: Uuid) -> Result<Match, ServiceError> {
        let rows = self
            .db()
            .process(LoadMatch { match_id })
            .await?
            .ok_or_else(|| ServiceError::match_not_found(match_id))?;
        Ok(rows.into_match()?)
    }

    /// All matches, newest first.
    pub async fn list_matches(&self) -> Result<Vec<Match>, ServiceError> {
        let rows = self.db().process(ListMatches).await?;
        let matches = rows
            .into_iter()
            .map(|r| r.into_match())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(matches)
    }

    /// Delete a match and its sets. Players of a match still in progress are
    /// released first.
    pub async fn delete_match(&self, match_id: Uuid) -> Result<(), ServiceError> {
        let mut tx = self.pool.begin().await?;
        let mut m = MatchRows::lock_tx(&mut tx, match_id)
            .await?
            .ok_or_else(|| ServiceError::match_not_found(match_id))?
            .into_match()?;

        if m.status == MatchStatus::Ongoing {
            m.release_players();
            let players: Vec<PlayerState> = m.players().map(PlayerState::from).collect();
            PlayerRecord::update_states_tx(&mut tx, &players).await?;
        }
        MatchRecord::delete_tx(&mut tx, match_id).await?;
        tx.commit().await?;
        tracing::info!(match_id = %match_id, status = %m.status, "Match deleted");
        Ok(())
    }

    /// Sets of a match ordered by sequence number.
    pub async fn list_sets(&self, match_id: Uuid) -> Result<Vec<GameSet>, ServiceError> {
        let db = self.db();
        if !db.process(MatchExists { match_id }).await? {
            return Err(ServiceError::match_not_found(match_id));
        }
        let sets = db
            .process(GetSetsOfMatches {
                match_ids: vec![match_id],
            })
            .await?
            .into_iter()
            .map(GameSet::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(sets)
    }

    pub async fn get_set(&self, match_id: Uuid, number: u8) -> Result<GameSet, ServiceError> {
        let record = self
            .db()
            .process(GetSet {
                match_id,
                seq: i16::from(number),
            })
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("set {number} of match {match_id}")))?;
        Ok(GameSet::try_from(record)?)
    }
}

fn score(m: &Match) -> String {
    m.current_set()
        .map(|s| format!("{}-{}", s.points_a, s.points_b))
        .unwrap_or_default()
}

fn log_point(m: &Match, team: TeamSlot, outcome: PointOutcome) {
    tracing::info!(
        match_id = %m.id,
        team = %team,
        score = %score(m),
        serving = ?m.serving_team,
        side = %m.serve_side,
        "Point awarded"
    );
    if let Some(winner) = outcome.match_winner {
        tracing::info!(match_id = %m.id, winner = %winner, "Match finished");
    } else if outcome.set_finished {
        tracing::info!(match_id = %m.id, sets = m.sets.len(), "Set finished, next set started");
    }
}
