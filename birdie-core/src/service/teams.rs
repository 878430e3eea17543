use kanau::processor::Processor;

use crate::engine::{EngineError, Player, Team};
use crate::entities::players::{GetPlayerById, ListPlayers};
use crate::entities::teams::{CreateTeam, DeleteTeam, GetTeams, ListTeams, TeamHasMatches};

use super::{MatchService, ServiceError, validate_player_names};

impl MatchService {
    pub async fn create_team(&self, player_names: Vec<String>) -> Result<Team, ServiceError> {
        let player_names = validate_player_names(player_names)?;
        let team = self.db().process(CreateTeam { player_names }).await?;
        tracing::info!(team_id = team.id, "Team created");
        Ok(team)
    }

    pub async fn get_team(&self, team_id: i64) -> Result<Team, ServiceError> {
        self.db()
            .process(GetTeams {
                team_ids: vec![team_id],
            })
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| ServiceError::team_not_found(team_id))
    }

    pub async fn list_teams(&self) -> Result<Vec<Team>, ServiceError> {
        Ok(self.db().process(ListTeams).await?)
    }

    /// Delete a team that has never played. Teams referenced by a match are
    /// kept so the match history stays intact; the foreign keys on `matches`
    /// back this up against a match started in between.
    pub async fn delete_team(&self, team_id: i64) -> Result<(), ServiceError> {
        let db = self.db();
        if db.process(TeamHasMatches { team_id }).await? {
            return Err(EngineError::InvalidState(format!(
                "team {team_id} has matches and cannot be deleted"
            ))
            .into());
        }
        if !db.process(DeleteTeam { team_id }).await? {
            return Err(ServiceError::team_not_found(team_id));
        }
        tracing::info!(team_id, "Team deleted");
        Ok(())
    }

    pub async fn get_player(&self, player_id: i64) -> Result<Player, ServiceError> {
        self.db()
            .process(GetPlayerById { player_id })
            .await?
            .map(Player::from)
            .ok_or_else(|| ServiceError::NotFound(format!("player {player_id}")))
    }

    pub async fn list_players(&self) -> Result<Vec<Player>, ServiceError> {
        let players = self.db().process(ListPlayers).await?;
        Ok(players.into_iter().map(Player::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use sqlx::PgPool;

    use super::*;
    use crate::engine::TeamSlot;
    use crate::entities::Side;

    #[sqlx::test(migrations = "../migrations")]
    async fn test_created_team_is_stored(pool: PgPool) {
        let service = MatchService::new(pool);
        let team = service
            .create_team(vec![" Ann ".to_string(), "Bo".to_string()])
            .await
            .unwrap();

        assert_eq!(team.players.len(), 2);
        assert_eq!(team.players[0].name, "Ann");
        assert_eq!(team.players[0].position, Side::Right);
        assert_eq!(team.players[1].position, Side::Left);
        assert!(team.players.iter().all(|p| !p.busy && p.team_id == team.id));

        assert_eq!(service.get_team(team.id).await.unwrap(), team);
        assert_eq!(service.list_teams().await.unwrap(), vec![team.clone()]);
        let player = service.get_player(team.players[1].id).await.unwrap();
        assert_eq!(player, team.players[1]);
        assert_eq!(service.list_players().await.unwrap(), team.players);
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn test_invalid_team_is_not_stored(pool: PgPool) {
        let service = MatchService::new(pool);
        let err = service
            .create_team(vec!["Ann".to_string()])
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        assert!(service.list_teams().await.unwrap().is_empty());
        assert!(matches!(
            service.get_team(1).await,
            Err(ServiceError::NotFound(_))
        ));
        assert!(matches!(
            service.get_player(1).await,
            Err(ServiceError::NotFound(_))
        ));
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn test_team_with_matches_cannot_be_deleted(pool: PgPool) {
        let service = MatchService::new(pool);
        let a = service
            .create_team(vec!["Ann".to_string(), "Bo".to_string()])
            .await
            .unwrap();
        let b = service
            .create_team(vec!["Cy".to_string(), "Di".to_string()])
            .await
            .unwrap();
        let idle = service
            .create_team(vec!["Ed".to_string(), "Flo".to_string()])
            .await
            .unwrap();
        service
            .start_match(a.id, b.id, TeamSlot::A, Side::Right)
            .await
            .unwrap();

        assert!(matches!(
            service.delete_team(a.id).await,
            Err(ServiceError::Engine(EngineError::InvalidState(_)))
        ));
        service.delete_team(idle.id).await.unwrap();
        assert!(matches!(
            service.delete_team(idle.id).await,
            Err(ServiceError::NotFound(_))
        ));
        assert!(matches!(
            service.get_player(idle.players[0].id).await,
            Err(ServiceError::NotFound(_))
        ));
        assert_eq!(service.list_teams().await.unwrap().len(), 2);
    }
}
