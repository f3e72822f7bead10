use groundwater_map_plugin::{app, config::PluginConfig, logging};

fn main() -> iced::Result {
    logging::init_logging();

    let config = match PluginConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(error = %e, "falling back to default configuration");
            PluginConfig::default()
        }
    };

    let shell = match app::PluginApp::new(config) {
        Ok(shell) => shell,
        Err(e) => {
            tracing::error!(error = %e, "cannot start");
            std::process::exit(1);
        }
    };

    iced::application(move || shell.clone().boot(), app::update, app::view)
        .title("Groundwater Map")
        .run()
}
