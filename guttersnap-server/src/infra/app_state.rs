use std::{fmt, sync::Arc};

use crate::{
    infra::config::Config, relay::MailRelay, uploads::UploadStore,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub relay: Arc<dyn MailRelay>,
    pub uploads: UploadStore,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("relay", &self.relay.name())
            .field("uploads", &self.uploads)
            .finish_non_exhaustive()
    }
}

impl AppState {
    pub fn new(
        config: Config,
        relay: Arc<dyn MailRelay>,
        uploads: UploadStore,
    ) -> Self {
        Self {
            config: Arc::new(config),
            relay,
            uploads,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}
