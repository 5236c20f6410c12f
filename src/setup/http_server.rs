use std::sync::Arc;
use actix_web::{middleware, web, App, HttpServer};
use log::info;
use crate::application::ports::input::nlp_port::NlpPort;
use crate::config::Settings;
use crate::infrastructure::web::prediction_controller;
use crate::setup::use_case_initializer::{initialize_use_cases, UseCases};

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub use_cases: UseCases,
}

pub async fn run_http_server(config: Arc<Settings>, nlp: Arc<dyn NlpPort>) -> std::io::Result<()> {
    let model = nlp.model_info();
    let app_state = web::Data::new(AppState {
        settings: config.clone(),
        use_cases: initialize_use_cases(nlp),
    });

    let payload_limit = config.server.payload_limit;
    let address = config.bind_address();
    info!(
        "Serving model {} ({}) with the {:?} API on {}",
        model.name, model.language, config.api.variant, address
    );

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .app_data(app_state.clone())
            .app_data(web::PayloadConfig::new(payload_limit))
            .configure(prediction_controller::configure)
    })
    .bind(address)?
    .run()
    .await
}
