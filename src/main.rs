mod app;
mod browser;
mod components;
mod dom;
mod logging;
mod views;

use leptos::prelude::*;
use liftlog_core::AppConfig;
use tracing::error;

use app::App;

fn main() {
    let mut config = browser::read_config();
    logging::init(&config.log_level);

    if let Err(e) = config.validate(views::CONTROLLERS) {
        error!("Invalid app config, using defaults: {}", e);
        config = AppConfig::default();
    }
    if let Some(worker) = &config.service_worker {
        browser::register_service_worker(worker);
    }

    leptos::mount::mount_to_body(move || view! { <App config=config.clone() /> });
}
