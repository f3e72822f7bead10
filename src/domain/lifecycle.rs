//! Download request lifecycle: the events and the reducer over [`DownloadSession`].
//!
//! The reducer accepts every event in every state. It does not check that a
//! request was issued before a finish or error arrives.

use super::model::DownloadSession;

/// Path of the server page that reports download progress for a task.
pub const DOWNLOAD_STATUS_PATH: &str = "/groundwater/download";

/// Lifecycle events consumed by [`reduce`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadAction {
    /// The user asked for the dataset.
    Requested,
    /// The server accepted the request and started task `task_id`.
    Finished { task_id: String },
    /// The request was refused, typically because the user is not signed in.
    Error,
    /// The user dismissed the modal.
    ModalClosed,
}

impl DownloadAction {
    pub fn requested() -> Self {
        DownloadAction::Requested
    }

    pub fn finished(task_id: impl Into<String>) -> Self {
        DownloadAction::Finished {
            task_id: task_id.into(),
        }
    }

    pub fn error() -> Self {
        DownloadAction::Error
    }

    pub fn modal_closed() -> Self {
        DownloadAction::ModalClosed
    }

    /// Wire name of the event on the host's event bus.
    pub fn kind(&self) -> &'static str {
        match self {
            DownloadAction::Requested => "DOWNLOAD_IGRAC_DATA",
            DownloadAction::Finished { .. } => "FINISH_DOWNLOADING_IGRAC_DATA",
            DownloadAction::Error => "IGRAC_DOWNLOAD_ERROR",
            DownloadAction::ModalClosed => "CLOSE_DOWNLOAD_MODAL",
        }
    }
}

/// Applies `action` to `state`.
///
/// `origin` is the scheme/host/port of the site, used to print the absolute
/// status link in the progress message.
pub fn reduce(state: &DownloadSession, action: &DownloadAction, origin: &str) -> DownloadSession {
    match action {
        DownloadAction::Requested => DownloadSession {
            is_downloading: true,
            ..state.clone()
        },
        DownloadAction::Finished { task_id } => DownloadSession {
            is_downloading: false,
            data: progress_html(task_id, origin),
            enabled: true,
            ..state.clone()
        },
        DownloadAction::Error => DownloadSession {
            data: error_html().to_string(),
            enabled: true,
            ..state.clone()
        },
        DownloadAction::ModalClosed => DownloadSession {
            is_downloading: false,
            data: String::new(),
            enabled: false,
            ..state.clone()
        },
    }
}

/// Relative link to the status page of `task_id`.
pub fn status_link(task_id: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(task_id.as_bytes()).collect();
    format!("{}?task_id={}", DOWNLOAD_STATUS_PATH, encoded)
}

pub fn progress_html(task_id: &str, origin: &str) -> String {
    let link = status_link(task_id);
    format!(
        "<div><h1>Download has been started</h1> <hr> \
         <p> Please check this page to see the progress of the download : <br/>\
         <a target=\"_blank\" href=\"{link}\">{origin}{link}</a></p></div>",
        link = link,
        origin = origin.trim_end_matches('/'),
    )
}

pub fn error_html() -> &'static str {
    "<div><h1>Download Error</h1> <hr> \
     <p> Please sign in first before downloading the data</p></div>"
}
