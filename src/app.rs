use std::sync::{Arc, Mutex, PoisonError};

use iced::Task;
use tracing::{info, warn};

use crate::api::ApiClient;
use crate::application::{InitOutcome, MapContextInitializer, MapRuntime, SharedConfig};
use crate::config::PluginConfig;
use crate::domain::{AppError, DownloadAction, MapCommand};
use crate::plugin::{GroundwaterPlugin, EFFECT_NAME, PLUGIN_NAME, STATE_KEY};
use crate::ui::{PageView, UiMessage};

/// Stands in for the host map: records commands and logs them.
#[derive(Default)]
pub struct CommandLog {
    commands: Mutex<Vec<MapCommand>>,
}

impl CommandLog {
    pub fn commands(&self) -> Vec<MapCommand> {
        self.commands
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl MapRuntime for CommandLog {
    fn dispatch(&self, command: MapCommand) {
        match serde_json::to_string(&command) {
            Ok(json) => info!(command = %json, "map command"),
            Err(e) => warn!(error = %e, "map command not serializable"),
        }
        self.commands
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(command);
    }
}

#[derive(Clone)]
pub struct PluginApp {
    view: PageView,
    plugin: GroundwaterPlugin<ApiClient>,
    initializer: MapContextInitializer,
    shared_config: SharedConfig,
    map_log: Arc<CommandLog>,
    page_url: String,
}

#[derive(Debug, Clone)]
pub enum Message {
    Ui(UiMessage),
    /// Lifecycle event from any collaborator
    Lifecycle(DownloadAction),
    /// Navigation to the download endpoint settled
    Navigated(Result<(), String>),
    /// Map context initializer finished
    ContextReady(Result<InitOutcome, String>),
}

impl PluginApp {
    pub fn new(config: PluginConfig) -> Result<Self, AppError> {
        let client = ApiClient::new(config.api.clone()).map_err(|e| AppError::Api(e.to_string()))?;
        let download_url = client
            .download_request_url()
            .map_err(|e| AppError::Config(e.to_string()))?;
        let origin = client.origin();
        info!(
            plugin = PLUGIN_NAME,
            state = STATE_KEY,
            effect = EFFECT_NAME,
            %download_url,
            "registering download plugin"
        );

        let shared_config = SharedConfig::new();
        let map_log = Arc::new(CommandLog::default());
        let initializer = MapContextInitializer::new(
            client.clone(),
            shared_config.clone(),
            map_log.clone(),
            config.map_resource.clone(),
        )
        .with_ready_delay(config.map_ready_delay);

        let view = PageView {
            resource_id: config.resource_id(),
            ..PageView::default()
        };

        Ok(Self {
            view,
            plugin: GroundwaterPlugin::new(client, download_url, origin),
            initializer,
            shared_config,
            map_log,
            page_url: config.page_url,
        })
    }

    /// Initial state plus the one-time map setup task
    pub fn boot(self) -> (Self, Task<Message>) {
        let initializer = self.initializer.clone();
        let page_url = self.page_url.clone();
        let task = Task::perform(
            async move {
                initializer
                    .run(&page_url)
                    .await
                    .map_err(|e| e.to_string())
            },
            Message::ContextReady,
        );
        (self, task)
    }

    fn dispatch(&mut self, action: DownloadAction) -> Task<Message> {
        match self.plugin.dispatch(action) {
            Some(navigation) => Task::perform(
                async move { navigation.await.map_err(|e| e.to_string()) },
                Message::Navigated,
            ),
            None => Task::none(),
        }
    }
}

pub fn update(app: &mut PluginApp, message: Message) -> Task<Message> {
    match message {
        Message::Ui(UiMessage::DownloadPressed) => {
            app.view.status_message = "Requesting download...".to_string();
            return app.dispatch(DownloadAction::requested());
        }
        Message::Ui(UiMessage::CloseModal) => {
            return app.dispatch(DownloadAction::modal_closed());
        }
        Message::Lifecycle(action) => {
            return app.dispatch(action);
        }
        Message::Navigated(result) => match result {
            Ok(()) => {
                info!("download request sent");
                app.view.status_message = "Download requested".to_string();
            }
            Err(e) => {
                warn!(error = %e, "download request failed");
                app.view.status_message = format!("Download request failed: {}", e);
                app.plugin.navigation_failed();
            }
        },
        Message::ContextReady(result) => match result {
            Ok(InitOutcome::Skipped) => {
                app.view.status_message = "Not a groundwater page".to_string();
            }
            Ok(InitOutcome::Initialized(report)) => {
                info!(
                    commands = report.commands_issued,
                    layers_cached = report.layers_cached,
                    layers_failed = report.layers_failed,
                    "map context ready"
                );
                app.view.view_params = app.shared_config.view_params();
                app.view.layers_cached = app
                    .shared_config
                    .layer_attributes()
                    .map_or(0, |cache| cache.len());
                app.view.status_message =
                    format!("Map commands sent: {}", app.map_log.commands().len());
            }
            Err(e) => {
                warn!(error = %e, "user context unavailable, map left unscoped");
                app.view.status_message = "Map context unavailable".to_string();
            }
        },
    }
    Task::none()
}

pub fn view(app: &PluginApp) -> iced::Element<'_, Message> {
    app.view.view(app.plugin.state()).map(Message::Ui)
}
