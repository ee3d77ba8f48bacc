use minefield_common::protocol::GameUpdate;
use tracing::{info, instrument};

use super::Engine;
use crate::{
    data::PlayerRecord,
    error::Result,
    identity::Identity,
    store::Transaction,
};

impl Engine {
    /// Adds `identity` to the game, or refreshes its profile if already joined.
    /// A returning player keeps their score.
    #[instrument(level = "trace", skip(self, identity), fields(uid = %identity.uid))]
    pub async fn join_game(&self, game_id: &str, identity: &Identity) -> Result<()> {
        let ((player, returning), version) = self
            .transact(game_id, |snapshot| {
                let existing = snapshot.players.get(&identity.uid);
                let mut player = PlayerRecord::new(identity);
                if let Some(existing) = existing {
                    player.score = existing.score;
                }

                let transaction =
                    Transaction::at(snapshot.version).put_player(identity.uid.clone(), player.clone());
                Ok((transaction, (player, existing.is_some())))
            })
            .await?;

        if returning {
            info!("Player {} rejoined game {}", identity.uid, game_id);
        } else {
            info!("Player {} joined game {}", identity.uid, game_id);
        }

        self.notifier.publish(
            game_id,
            GameUpdate::PlayerJoined {
                version,
                player: player.view(&identity.uid),
            },
        );
        Ok(())
    }
}
