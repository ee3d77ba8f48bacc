use std::sync::Arc;

use dashmap::DashMap;
use minefield_common::protocol::GameUpdate;
use tokio::sync::broadcast::{
    self,
    error::{RecvError, TryRecvError},
};
use tracing::trace;

const CHANNEL_CAPACITY: usize = 64;

type Channels = Arc<DashMap<String, broadcast::Sender<GameUpdate>>>;

/// Fan-out of committed game changes to in-process subscribers.
///
/// A game's channel exists only while it has at least one [`Subscription`].
#[derive(Clone, Default)]
pub struct Notifier {
    channels: Channels,
}

/// Live feed of one game's updates. Dropping the last one for a game
/// releases that game's channel.
pub struct Subscription {
    game_id: String,
    receiver: broadcast::Receiver<GameUpdate>,
    channels: Channels,
}

impl Subscription {
    pub async fn recv(&mut self) -> Result<GameUpdate, RecvError> {
        self.receiver.recv().await
    }

    pub fn try_recv(&mut self) -> Result<GameUpdate, TryRecvError> {
        self.receiver.try_recv()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        // Our own receiver is still alive here, hence `<= 1`.
        self.channels
            .remove_if(&self.game_id, |_, sender| sender.receiver_count() <= 1);
    }
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, game_id: &str) -> Subscription {
        let receiver = self
            .channels
            .entry(game_id.to_string())
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
            .subscribe();

        Subscription {
            game_id: game_id.to_string(),
            receiver,
            channels: Arc::clone(&self.channels),
        }
    }

    pub fn publish(&self, game_id: &str, update: GameUpdate) {
        let sent = match self.channels.get(game_id) {
            Some(sender) => sender.send(update),
            None => return,
        };

        match sent {
            Ok(receivers) => trace!("Published update for {} to {} receivers", game_id, receivers),
            Err(_) => {
                trace!("No live receivers for {}, dropping channel", game_id);
                self.channels
                    .remove_if(game_id, |_, sender| sender.receiver_count() == 0);
            }
        }
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }
}
