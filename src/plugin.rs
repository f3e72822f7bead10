//! The download plugin as the host sees it: one state slice, one reducer and
//! one effect, registered under fixed names.

use futures::future::BoxFuture;
use url::Url;

use crate::api;
use crate::application::download_trigger::{DownloadTrigger, Navigator, TriggerState};
use crate::domain::{reduce, DownloadAction, DownloadSession};

pub const PLUGIN_NAME: &str = "IgracDownload";
pub const STATE_KEY: &str = "igracDownloadReducers";
pub const EFFECT_NAME: &str = "startDownloadingIGRACData";

#[derive(Clone)]
pub struct GroundwaterPlugin<N> {
    session: DownloadSession,
    trigger: DownloadTrigger<N>,
    origin: String,
}

impl<N: Navigator> GroundwaterPlugin<N> {
    /// `origin` is printed in front of the status link of a started download.
    pub fn new(navigator: N, download_url: Url, origin: impl Into<String>) -> Self {
        Self {
            session: DownloadSession::default(),
            trigger: DownloadTrigger::new(navigator, download_url),
            origin: origin.into(),
        }
    }

    pub fn state(&self) -> &DownloadSession {
        &self.session
    }

    pub fn trigger_state(&self) -> &TriggerState {
        self.trigger.state()
    }

    /// Reduce `action` into the session, then hand it to the effect.
    /// The returned navigation, if any, is for the host to run.
    pub fn dispatch(&mut self, action: DownloadAction) -> Option<BoxFuture<'static, api::Result<()>>> {
        tracing::debug!(kind = action.kind(), "dispatch");
        self.session = reduce(&self.session, &action, &self.origin);
        self.trigger.react(&action)
    }

    /// The navigation started by a request failed and the page is still here.
    /// Re-arms the effect and shows the download error in the modal.
    pub fn navigation_failed(&mut self) {
        self.trigger.navigation_failed();
        self.session = reduce(&self.session, &DownloadAction::error(), &self.origin);
    }
}
