use crate::journal::JournalSession;
use dashmap::DashMap;
use rand::{distributions::Alphanumeric, thread_rng, Rng};
use std::{
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::time::interval;
use tracing::debug;

const SESSION_ID_LENGTH: usize = 24;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    pub fn generate() -> Self {
        Self(
            thread_rng()
                .sample_iter(&Alphanumeric)
                .take(SESSION_ID_LENGTH)
                .map(char::from)
                .collect(),
        )
    }

    /// Accepts only values this process could have generated.
    pub fn parse(raw: &str) -> Option<Self> {
        (raw.len() == SESSION_ID_LENGTH && raw.chars().all(|c| c.is_ascii_alphanumeric()))
            .then(|| Self(raw.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

struct Entry {
    journal: JournalSession,
    last_seen: Instant,
}

#[derive(Clone, Default)]
pub struct SessionStore {
    map: Arc<DashMap<SessionId, Entry>>,
}

impl SessionStore {
    /// Runs `f` against the session's journal, creating it on first use.
    pub fn with_journal<R>(&self, id: &SessionId, f: impl FnOnce(&mut JournalSession) -> R) -> R {
        let mut entry = self.map.entry(id.clone()).or_insert_with(|| Entry {
            journal: JournalSession::default(),
            last_seen: Instant::now(),
        });
        entry.last_seen = Instant::now();
        f(&mut entry.journal)
    }

    pub fn prune_idle(&self, max_idle: Duration) -> usize {
        let before = self.map.len();
        self.map.retain(|_, entry| entry.last_seen.elapsed() < max_idle);
        before.saturating_sub(self.map.len())
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn spawn_pruner(&self, max_idle: Duration) {
        let store = self.clone();
        tokio::spawn(async move {
            let mut ticker = interval(max_idle.max(Duration::from_secs(1)));
            loop {
                ticker.tick().await;
                let pruned = store.prune_idle(max_idle);
                if pruned > 0 {
                    debug!(
                        "Pruned {pruned} idle journal sessions, {} remain",
                        store.len()
                    );
                }
            }
        });
    }
}
