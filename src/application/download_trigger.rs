//! Effect that sends the browser to the download-request endpoint.
//!
//! The navigation replaces the page, so the trigger has no way back: once it
//! has fired it stays in [`TriggerState::Navigated`] and ignores everything.
//! The one exception is a navigation that never left the page, reported
//! through [`DownloadTrigger::navigation_failed`]. It never emits `Finished`
//! or `Error` itself; whoever learns the outcome dispatches those.

use futures::future::BoxFuture;
use tracing::{debug, info, warn};
use url::Url;

use crate::api::{self, ApiClient};
use crate::domain::DownloadAction;

/// Performs a full navigation to `target`.
pub trait Navigator: Send + Sync {
    fn navigate(&self, target: Url) -> BoxFuture<'static, api::Result<()>>;
}

impl Navigator for ApiClient {
    fn navigate(&self, target: Url) -> BoxFuture<'static, api::Result<()>> {
        let client = self.clone();
        Box::pin(async move { client.open(target).await })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerState {
    Armed,
    Navigated { target: Url },
}

#[derive(Clone)]
pub struct DownloadTrigger<N> {
    navigator: N,
    target: Url,
    state: TriggerState,
}

impl<N: Navigator> DownloadTrigger<N> {
    pub fn new(navigator: N, target: Url) -> Self {
        Self {
            navigator,
            target,
            state: TriggerState::Armed,
        }
    }

    pub fn state(&self) -> &TriggerState {
        &self.state
    }

    /// React to a lifecycle event. Returns the navigation to run, if any.
    pub fn react(&mut self, action: &DownloadAction) -> Option<BoxFuture<'static, api::Result<()>>> {
        if *action != DownloadAction::Requested {
            return None;
        }

        match &self.state {
            TriggerState::Armed => {
                info!(url = %self.target, "navigating to download request");
                self.state = TriggerState::Navigated {
                    target: self.target.clone(),
                };
                Some(self.navigator.navigate(self.target.clone()))
            }
            TriggerState::Navigated { target } => {
                debug!(url = %target, "download already requested, ignoring");
                None
            }
        }
    }

    /// The navigation failed before the page was replaced. Arms the trigger again.
    pub fn navigation_failed(&mut self) {
        if let TriggerState::Navigated { target } = &self.state {
            warn!(url = %target, "navigation did not happen, re-arming");
        }
        self.state = TriggerState::Armed;
    }
}
