pub mod download_trigger;
pub mod map_context;
pub mod shared_config;

pub use download_trigger::{DownloadTrigger, Navigator, TriggerState};
pub use map_context::{InitOutcome, InitReport, MapContextInitializer, MapRuntime};
pub use shared_config::SharedConfig;
