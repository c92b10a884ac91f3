//! Game activity (Discord) import producer.
//!
//! Yields one gaming session per guild where the user currently has a game
//! activity. Session ids combine guild, activity and start time so repeated
//! syncs of the same running game update one entry instead of adding more.

use super::source::{ClientResult, SourceError, SourceProducer, SourceResult};
use crate::model::daily::PartialDailyStats;
use crate::model::entry::{GamePlatform, GameSession};
use crate::model::keys::DayKey;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{debug, warn};
use std::sync::Arc;

pub const DISCORD_SOURCE_ID: &str = "discord";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Guild {
    pub id: String,
    pub name: String,
}

/// A running game as reported by the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawGameActivity {
    pub id: String,
    pub name: String,
    /// Unix epoch milliseconds.
    pub created_at_ms: i64,
}

/// External game-platform API.
#[async_trait]
pub trait GameActivityClient: Send + Sync {
    async fn list_guilds(&self) -> ClientResult<Vec<Guild>>;
    /// The current game activity in `guild_id`, if any.
    async fn current_activity(&self, guild_id: &str) -> ClientResult<Option<RawGameActivity>>;
}

pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

pub struct GameActivityProducer<C: GameActivityClient> {
    client: C,
    clock: Clock,
}

impl<C: GameActivityClient> GameActivityProducer<C> {
    pub fn new(client: C) -> Self {
        Self::with_clock(client, Arc::new(Utc::now))
    }

    pub fn with_clock(client: C, clock: Clock) -> Self {
        Self { client, clock }
    }
}

#[async_trait]
impl<C: GameActivityClient> SourceProducer for GameActivityProducer<C> {
    fn source_id(&self) -> &str {
        DISCORD_SOURCE_ID
    }

    async fn produce(&self, date: DayKey) -> SourceResult<PartialDailyStats> {
        let fetch_err = |err: super::source::ClientError| {
            SourceError::fetch(DISCORD_SOURCE_ID, err.to_string())
        };

        let guilds = self.client.list_guilds().await.map_err(fetch_err)?;
        let now = (self.clock)();

        let mut sessions = Vec::new();
        for guild in guilds {
            let Some(activity) = self
                .client
                .current_activity(&guild.id)
                .await
                .map_err(fetch_err)?
            else {
                continue;
            };

            let Some(started_at) = DateTime::from_timestamp_millis(activity.created_at_ms) else {
                warn!(
                    "event=source_fetch module=sync source={} status=skipped reason=bad_timestamp guild={}",
                    DISCORD_SOURCE_ID, guild.id
                );
                continue;
            };

            sessions.push(GameSession {
                id: format!("{}-{}-{}", guild.id, activity.id, activity.created_at_ms),
                platform: GamePlatform::Discord,
                title: activity.name,
                duration_minutes: elapsed_minutes(started_at, now),
                timestamp: started_at,
                guild_name: Some(guild.name),
            });
        }

        debug!(
            "event=source_fetch module=sync source={} date={} gaming={}",
            DISCORD_SOURCE_ID,
            date,
            sessions.len()
        );

        Ok(PartialDailyStats {
            gaming: Some(sessions),
            ..PartialDailyStats::default()
        })
    }
}

/// Whole minutes since `started_at`, never less than one.
fn elapsed_minutes(started_at: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    let minutes = (now - started_at).num_milliseconds() as f64 / 60_000.0;
    minutes.round().max(1.0)
}
