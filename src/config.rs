use crate::dispatch::ProgressSettings;
use envconfig::Envconfig;
use std::time::Duration;

#[derive(Envconfig)]
pub struct Config {
    #[envconfig(from = "LISTEN_ADDRESS", default = "0.0.0.0:8989")]
    pub listen_address: String,

    #[envconfig(
        from = "WEBHOOK_URL",
        default = "https://sleep.zeabur.app/webhook/c8f29e8a-3796-43f8-940a-23b061039ff2"
    )]
    pub webhook_url: String,

    /// Kept slightly below the progress ceiling so the call resolves first.
    #[envconfig(from = "WEBHOOK_TIMEOUT_SECS", default = "95")]
    pub webhook_timeout_secs: u64,

    #[envconfig(from = "PROGRESS_TICK_MILLIS", default = "1000")]
    pub progress_tick_millis: u64,

    #[envconfig(from = "PROGRESS_MAX_TICKS", default = "100")]
    pub progress_max_ticks: u32,

    #[envconfig(from = "DRIVE_BASE_URL", default = "https://drive.google.com")]
    pub drive_base_url: String,

    #[envconfig(from = "SESSION_IDLE_SECS", default = "3600")]
    pub session_idle_secs: u64,
}

impl Config {
    pub fn webhook_timeout(&self) -> Duration {
        Duration::from_secs(self.webhook_timeout_secs)
    }

    pub fn progress(&self) -> ProgressSettings {
        ProgressSettings {
            tick: Duration::from_millis(self.progress_tick_millis),
            max_ticks: self.progress_max_ticks,
        }
    }

    pub fn session_idle(&self) -> Duration {
        Duration::from_secs(self.session_idle_secs)
    }
}
