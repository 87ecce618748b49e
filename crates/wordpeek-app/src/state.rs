use wordpeek_config::Config;
use wordpeek_core::EnabledState;

pub struct AppState {
    pub config: Config,
    pub enabled: EnabledState,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let enabled = EnabledState::new(config.enabled);

        Self { config, enabled }
    }
}
