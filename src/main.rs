// src/main.rs
use clap::Parser;
use env_logger::Env;
use log::info;
use std::io;
use std::sync::Arc;
use xmi_annotator::application::ports::input::nlp_port::NlpPort;
use xmi_annotator::infrastructure::adapters::input::lexicon_nlp_adapter::LexiconNlpAdapter;
use xmi_annotator::setup::setup_and_run;
use xmi_annotator::Settings;

#[derive(Parser, Debug)]
#[command(name = "xmi-annotator", version, about = "NER and POS recommender for XMI documents")]
struct Opt {
    /// Configuration file; `APP_` environment variables override its values.
    #[arg(short, long, default_value = "config.yml")]
    config: String,

    /// Lexicon model JSON file, overriding `model.path`.
    #[arg(short, long)]
    model: Option<String>,

    #[arg(long)]
    host: Option<String>,

    #[arg(short, long)]
    port: Option<u16>,
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    let opt = Opt::parse();
    let mut config = match Settings::load(&opt.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Failed to load configuration: {:?}", e);
            std::process::exit(1);
        }
    };

    if let Some(model) = opt.model {
        config.model.path = Some(model);
    }
    if let Some(host) = opt.host {
        config.server.host = host;
    }
    if let Some(port) = opt.port {
        config.server.port = port;
    }

    env_logger::Builder::from_env(Env::default().default_filter_or(config.logging.level.as_str())).init();
    info!("Loaded configuration: {:?}", config);

    let adapter = match &config.model.path {
        Some(path) => {
            info!("Loading lexicon model from {}", path);
            LexiconNlpAdapter::load(path)
        }
        None => LexiconNlpAdapter::bundled(),
    }
    .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))?;
    let nlp: Arc<dyn NlpPort> = Arc::new(adapter);

    setup_and_run(config, nlp).await
}
