pub mod http_server;
pub mod use_case_initializer;

use crate::application::ports::input::nlp_port::NlpPort;
use crate::config::Settings;
use std::sync::Arc;

pub async fn setup_and_run(config: Settings, nlp: Arc<dyn NlpPort>) -> std::io::Result<()> {
    let config = Arc::new(config);
    http_server::run_http_server(config, nlp).await
}
