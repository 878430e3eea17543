//! Conversions from the aggregate to the wire types in `birdie_sdk`.

use birdie_sdk::objects::{MatchResponse, PlayerResponse, SetResponse, TeamResponse};

use crate::engine::{EngineError, GameSet, Match, Player, Team, TeamSlot};

impl From<&Player> for PlayerResponse {
    fn from(player: &Player) -> Self {
        PlayerResponse {
            id: player.id,
            team_id: player.team_id,
            name: player.name.clone(),
            position: player.position.into(),
            busy: player.busy,
        }
    }
}

impl From<&Team> for TeamResponse {
    fn from(team: &Team) -> Self {
        TeamResponse {
            id: team.id,
            players: team.players.iter().map(PlayerResponse::from).collect(),
        }
    }
}

impl From<&GameSet> for SetResponse {
    fn from(set: &GameSet) -> Self {
        SetResponse {
            number: set.number,
            points_a: set.points_a,
            points_b: set.points_b,
        }
    }
}

impl TryFrom<&Match> for MatchResponse {
    type Error = EngineError;

    fn try_from(m: &Match) -> Result<Self, Self::Error> {
        let (Some(team_a), Some(team_b)) = (m.team(TeamSlot::A), m.team(TeamSlot::B)) else {
            return Err(EngineError::InvariantViolation(format!(
                "match {} has {} teams",
                m.id,
                m.teams.len()
            )));
        };
        Ok(MatchResponse {
            id: m.id,
            date: m.date,
            team_a: team_a.into(),
            team_b: team_b.into(),
            sets: m.sets_in_order().iter().map(SetResponse::from).collect(),
            serving_team: m.serving_team,
            serve_side: m.serve_side.into(),
            winning_team: m.winning_team,
            status: m.status.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine;
    use crate::entities::Side;
    use birdie_sdk::objects::{MatchStatus as SdkMatchStatus, Side as SdkSide};
    use time::macros::date;

    fn team(id: i64) -> Team {
        Team {
            id,
            players: (0..2)
                .map(|slot| Player {
                    id: id * 10 + slot as i64,
                    team_id: id,
                    name: format!("p{slot}"),
                    position: Team::initial_position(slot),
                    busy: false,
                })
                .collect(),
        }
    }

    #[test]
    fn test_match_response() {
        let mut m =
            engine::start_match(team(1), team(2), TeamSlot::B, Side::Left, date!(2024 - 03 - 02))
                .unwrap();
        for _ in 0..21 {
            engine::award_point(&mut m, TeamSlot::A).unwrap();
        }
        m.sets.reverse();

        let response = MatchResponse::try_from(&m).unwrap();
        assert_eq!(response.id, m.id);
        assert_eq!(response.team_a.id, 1);
        assert_eq!(response.team_b.players[1].id, 21);
        assert!(response.team_b.players.iter().all(|p| p.busy));
        assert_eq!(
            response.sets.iter().map(|s| s.number).collect::<Vec<_>>(),
            vec![1, 2]
        );
        assert_eq!(response.current_set().unwrap().points_a, 0);
        assert_eq!(response.serving_team, Some(TeamSlot::A));
        assert_eq!(response.status, SdkMatchStatus::Ongoing);
        assert_eq!(response.winning_team, None);

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["status"], "ONGOING");
        assert_eq!(json["team_a"]["players"][0]["position"], SdkSide::Right.to_string());
    }
}
