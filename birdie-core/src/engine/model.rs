//! The in-memory match aggregate.
//!
//! Ownership runs one way: a [`Match`] owns its [`GameSet`]s and holds its two
//! [`Team`]s, and a team owns its [`Player`]s. Back-links are plain parent ids.

use birdie_sdk::objects::TeamSlot;
use uuid::Uuid;

use crate::entities::{MatchStatus, Side};

/// Number of players on a doubles team.
pub const TEAM_SIZE: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub id: i64,
    pub team_id: i64,
    pub name: String,
    pub position: Side,
    pub busy: bool,
}

impl Player {
    pub fn toggle_position(&mut self) {
        self.position = self.position.invert();
    }
}

/// A doubles team. `players[0]` is slot 0, `players[1]` is slot 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Team {
    pub id: i64,
    pub players: Vec<Player>,
}

impl Team {
    /// Position a fresh team takes on court: slot 0 on the right, slot 1 on the left.
    pub fn initial_position(slot: usize) -> Side {
        if slot % 2 == 0 { Side::Right } else { Side::Left }
    }

    pub fn toggle_positions(&mut self) {
        self.players.iter_mut().for_each(Player::toggle_position);
    }

    pub fn set_busy(&mut self, busy: bool) {
        for player in &mut self.players {
            player.busy = busy;
        }
    }

    pub fn busy_players(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| p.busy)
    }
}

/// One game of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameSet {
    pub match_id: Uuid,
    /// 1-based sequence number.
    pub number: u8,
    pub points_a: u32,
    pub points_b: u32,
}

impl GameSet {
    pub fn new(match_id: Uuid, number: u8) -> Self {
        Self {
            match_id,
            number,
            points_a: 0,
            points_b: 0,
        }
    }

    pub fn points(&self, team: TeamSlot) -> u32 {
        match team {
            TeamSlot::A => self.points_a,
            TeamSlot::B => self.points_b,
        }
    }

    pub fn points_mut(&mut self, team: TeamSlot) -> &mut u32 {
        match team {
            TeamSlot::A => &mut self.points_a,
            TeamSlot::B => &mut self.points_b,
        }
    }

    /// The higher of the two scores.
    pub fn leading_points(&self) -> u32 {
        self.points_a.max(self.points_b)
    }

    /// Winner of the set, if it is finished.
    pub fn winner(&self) -> Option<TeamSlot> {
        if !super::rules::is_set_finished(self.points_a, self.points_b) {
            return None;
        }
        match self.points_a.cmp(&self.points_b) {
            std::cmp::Ordering::Greater => Some(TeamSlot::A),
            std::cmp::Ordering::Less => Some(TeamSlot::B),
            std::cmp::Ordering::Equal => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    pub id: Uuid,
    pub date: time::Date,
    /// `teams[0]` is team A, `teams[1]` is team B.
    pub teams: Vec<Team>,
    /// Sets in storage order. Use [`Match::current_set`] to find the one in play.
    pub sets: Vec<GameSet>,
    pub serving_team: Option<TeamSlot>,
    pub serve_side: Side,
    pub winning_team: Option<TeamSlot>,
    pub status: MatchStatus,
}

impl Match {
    pub fn team(&self, slot: TeamSlot) -> Option<&Team> {
        self.teams.get(slot.index())
    }

    pub fn team_mut(&mut self, slot: TeamSlot) -> Option<&mut Team> {
        self.teams.get_mut(slot.index())
    }

    /// Slot of the team with the given id within this match.
    pub fn slot_of(&self, team_id: i64) -> Option<TeamSlot> {
        self.teams
            .iter()
            .position(|t| t.id == team_id)
            .and_then(|i| match i {
                0 => Some(TeamSlot::A),
                1 => Some(TeamSlot::B),
                _ => None,
            })
    }

    fn current_set_index(&self) -> Option<usize> {
        let mut current: Option<(usize, u8)> = None;
        for (i, set) in self.sets.iter().enumerate() {
            match current {
                Some((_, number)) if number >= set.number => {}
                _ => current = Some((i, set.number)),
            }
        }
        current.map(|(i, _)| i)
    }

    /// The set with the highest sequence number, regardless of list order.
    pub fn current_set(&self) -> Option<&GameSet> {
        self.current_set_index().map(|i| &self.sets[i])
    }

    pub fn current_set_mut(&mut self) -> Option<&mut GameSet> {
        self.current_set_index().map(|i| &mut self.sets[i])
    }

    /// Sets ordered by sequence number.
    pub fn sets_in_order(&self) -> Vec<GameSet> {
        let mut sets = self.sets.clone();
        sets.sort_by_key(|s| s.number);
        sets
    }

    pub fn sets_won(&self, team: TeamSlot) -> usize {
        self.sets
            .iter()
            .filter(|s| s.winner() == Some(team))
            .count()
    }

    pub fn players(&self) -> impl Iterator<Item = &Player> {
        self.teams.iter().flat_map(|t| t.players.iter())
    }

    pub fn release_players(&mut self) {
        for team in &mut self.teams {
            team.set_busy(false);
        }
    }
}
