//! The match state machine.
//!
//! Every operation works on an in-memory [`Match`] and either applies all of
//! its effects or returns an error before touching anything. Loading and
//! saving the aggregate, and serialising calls on one match, is up to the
//! caller (see [`crate::service::MatchService`]).

pub mod error;
pub mod model;
pub mod rules;

pub use birdie_sdk::objects::TeamSlot;
pub use error::{EngineError, UnavailablePlayer};
pub use model::{GameSet, Match, Player, TEAM_SIZE, Team};

use uuid::Uuid;

use crate::entities::{MatchStatus, Side};

/// What a single awarded point did beyond changing the score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PointOutcome {
    /// The point closed the current set.
    pub set_finished: bool,
    /// The point decided the match.
    pub match_winner: Option<TeamSlot>,
}

/// Create a new ongoing match between two idle teams.
///
/// `team_a` becomes `teams[0]`. All four players are marked busy. The caller
/// must hold locks on the players' rows so the busy check and the update are
/// atomic against other starts.
pub fn start_match(
    team_a: Team,
    team_b: Team,
    serving: TeamSlot,
    start_side: Side,
    date: time::Date,
) -> Result<Match, EngineError> {
    if team_a.id == team_b.id {
        return Err(EngineError::InvalidState(format!(
            "team {} cannot play against itself",
            team_a.id
        )));
    }
    for team in [&team_a, &team_b] {
        if team.players.len() != TEAM_SIZE {
            return Err(EngineError::InvariantViolation(format!(
                "team {} has {} players",
                team.id,
                team.players.len()
            )));
        }
    }

    let unavailable: Vec<UnavailablePlayer> = team_a
        .busy_players()
        .chain(team_b.busy_players())
        .map(|p| UnavailablePlayer {
            id: p.id,
            name: p.name.clone(),
        })
        .collect();
    if !unavailable.is_empty() {
        return Err(EngineError::PlayerUnavailable(unavailable));
    }

    let id = Uuid::now_v7();
    let mut teams = vec![team_a, team_b];
    for team in &mut teams {
        team.set_busy(true);
    }

    Ok(Match {
        id,
        date,
        teams,
        sets: vec![GameSet::new(id, 1)],
        serving_team: Some(serving),
        serve_side: start_side,
        winning_team: None,
        status: MatchStatus::Ongoing,
    })
}

fn ensure_ongoing(m: &Match) -> Result<(), EngineError> {
    if m.status != MatchStatus::Ongoing {
        return Err(EngineError::InvalidState(format!(
            "match {} is {}",
            m.id, m.status
        )));
    }
    Ok(())
}

fn ensure_two_teams(m: &Match) -> Result<(), EngineError> {
    if m.teams.len() != 2 {
        return Err(EngineError::InvariantViolation(format!(
            "match {} has {} teams",
            m.id,
            m.teams.len()
        )));
    }
    Ok(())
}

fn missing_sets(match_id: Uuid) -> EngineError {
    EngineError::InvariantViolation(format!("match {match_id} has no sets"))
}

fn ensure_playable(m: &Match) -> Result<(), EngineError> {
    ensure_ongoing(m)?;
    ensure_two_teams(m)?;
    if m.sets.is_empty() {
        return Err(missing_sets(m.id));
    }
    Ok(())
}

/// Score a point for `team` in the current set.
pub fn award_point(m: &mut Match, team: TeamSlot) -> Result<PointOutcome, EngineError> {
    ensure_playable(m)?;
    let match_id = m.id;
    let set = m.current_set_mut().ok_or_else(|| missing_sets(match_id))?;
    *set.points_mut(team) += 1;
    let scored = set.points(team);
    let (points_a, points_b) = (set.points_a, set.points_b);

    let server = *m.serving_team.get_or_insert(team);
    if server == team {
        if let Some(t) = m.team_mut(team) {
            t.toggle_positions();
        }
        m.serve_side = m.serve_side.invert();
    } else {
        m.serving_team = Some(team);
        m.serve_side = if scored % 2 == 0 {
            Side::Right
        } else {
            Side::Left
        };
    }

    if !rules::is_set_finished(points_a, points_b) {
        return Ok(PointOutcome::default());
    }

    let winner = [TeamSlot::A, TeamSlot::B]
        .into_iter()
        .find(|&slot| m.sets_won(slot) >= rules::SETS_TO_WIN);
    match winner {
        Some(winner) => {
            m.winning_team = Some(winner);
            m.status = MatchStatus::Finished;
            m.release_players();
        }
        None if m.sets.len() < rules::MAX_SETS => {
            let number = m.sets.len() as u8 + 1;
            m.sets.push(GameSet::new(m.id, number));
        }
        None => {}
    }

    Ok(PointOutcome {
        set_finished: true,
        match_winner: winner,
    })
}

/// Take one point back from `team` in the current set.
///
/// Returns `false` and leaves the match untouched when the team has no points
/// in the current set. Set and match completion are never reversed, so this
/// must not be used right after a set has closed.
pub fn undo_last_point(m: &mut Match, team: TeamSlot) -> Result<bool, EngineError> {
    ensure_playable(m)?;
    let match_id = m.id;
    let set = m.current_set_mut().ok_or_else(|| missing_sets(match_id))?;
    let points = set.points_mut(team);
    if *points == 0 {
        return Ok(false);
    }
    *points -= 1;

    if m.serving_team == Some(team) {
        if let Some(t) = m.team_mut(team) {
            t.toggle_positions();
        }
        m.serve_side = m.serve_side.invert();
    }
    Ok(true)
}

/// End the match early; the other team wins.
pub fn abort_match(m: &mut Match, forfeiting: TeamSlot) -> Result<(), EngineError> {
    ensure_ongoing(m)?;
    ensure_two_teams(m)?;
    m.winning_team = Some(forfeiting.opponent());
    m.status = MatchStatus::Forfeited;
    m.release_players();
    Ok(())
}

pub fn is_break_recommended(m: &Match) -> Result<bool, EngineError> {
    let set = m.current_set().ok_or_else(|| missing_sets(m.id))?;
    Ok(set.leading_points() >= rules::BREAK_POINTS)
}

/// Manual correction of the serve side after the automatic recommendation.
pub fn override_serve_side(m: &mut Match, side: Side) -> Result<(), EngineError> {
    ensure_ongoing(m)?;
    m.serve_side = side;
    Ok(())
}
