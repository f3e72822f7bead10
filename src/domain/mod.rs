pub mod error;
pub mod lifecycle;
pub mod model;

pub use error::AppError;
pub use lifecycle::{reduce, DownloadAction};
pub use model::{DownloadSession, Extent, LayerConfig, MapCommand, MapResource, Padding};
