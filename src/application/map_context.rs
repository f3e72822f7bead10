//! One-shot map setup for the groundwater pages.
//!
//! On a matching page the initializer scopes map requests to the current user,
//! focuses the map on the user's extent once the map is up, and loads the
//! attribute schema of every groundwater well layer into shared config.

use std::sync::Arc;
use std::time::Duration;

use futures::stream::{FuturesUnordered, StreamExt};
use tracing::{debug, info};

use crate::api::{self, ApiClient};
use crate::domain::{Extent, LayerConfig, MapCommand, MapResource};
use crate::utils::{canonical_layer_name, contains_ignore_case, url_matches_any};

use super::shared_config::{LayerAttributeCache, SharedConfig};

/// Page URL fragments on which the initializer acts.
pub const PAGE_PATTERNS: [&str; 3] = ["groundwater-well", "well-and-monitoring-data", "view/ggmn"];

/// Layer ids containing this (any case) are groundwater well layers.
pub const WELL_LAYER_MARKER: &str = "groundwater_well";

/// Time the host map needs after page load before it accepts commands.
pub const DEFAULT_MAP_READY_DELAY: Duration = Duration::from_millis(3000);

/// The host map runtime.
pub trait MapRuntime: Send + Sync {
    fn dispatch(&self, command: MapCommand);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitReport {
    pub view_params: String,
    pub commands_issued: usize,
    pub layers_cached: usize,
    pub layers_failed: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitOutcome {
    /// The page is not one of the groundwater pages.
    Skipped,
    Initialized(InitReport),
}

#[derive(Clone)]
pub struct MapContextInitializer {
    client: ApiClient,
    config: SharedConfig,
    runtime: Arc<dyn MapRuntime>,
    resource: MapResource,
    ready_delay: Duration,
}

impl MapContextInitializer {
    pub fn new(
        client: ApiClient,
        config: SharedConfig,
        runtime: Arc<dyn MapRuntime>,
        resource: MapResource,
    ) -> Self {
        Self {
            client,
            config,
            runtime,
            resource,
            ready_delay: DEFAULT_MAP_READY_DELAY,
        }
    }

    pub fn with_ready_delay(mut self, ready_delay: Duration) -> Self {
        self.ready_delay = ready_delay;
        self
    }

    pub fn applies_to(page_url: &str) -> bool {
        url_matches_any(page_url, &PAGE_PATTERNS)
    }

    /// Run the setup for `page_url`.
    ///
    /// Errors fetching the user identifier are returned as-is and nothing
    /// else is attempted. Per-layer attribute failures are not errors.
    pub async fn run(&self, page_url: &str) -> api::Result<InitOutcome> {
        if !Self::applies_to(page_url) {
            debug!(page_url, "page is not a groundwater page, skipping map setup");
            return Ok(InitOutcome::Skipped);
        }

        let user = self.client.get_user_context().await?;
        let view_params = user.view_params();
        self.config.set_view_params(&view_params);
        info!(%view_params, has_extent = user.extent.is_some(), "map requests scoped to user");

        let (commands_issued, (layers_cached, layers_failed)) =
            futures::join!(self.focus_map(user.extent), self.load_layer_attributes());

        Ok(InitOutcome::Initialized(InitReport {
            view_params,
            commands_issued,
            layers_cached,
            layers_failed,
        }))
    }

    fn well_layers(&self) -> impl Iterator<Item = &LayerConfig> {
        self.resource.layers.iter().filter(|layer| {
            layer
                .id
                .as_deref()
                .is_some_and(|id| contains_ignore_case(id, WELL_LAYER_MARKER))
        })
    }

    /// Zoom to `extent` and select the well layer. Returns the number of commands sent.
    async fn focus_map(&self, extent: Option<Extent>) -> usize {
        let Some(extent) = extent else {
            return 0;
        };

        tokio::time::sleep(self.ready_delay).await;

        self.runtime.dispatch(MapCommand::zoom_to(extent));
        let mut issued = 1;

        if let Some(id) = self.well_layers().find_map(|layer| layer.id.clone()) {
            self.runtime.dispatch(MapCommand::select_layer(id));
            issued += 1;
        }

        issued
    }

    /// Fetch every well layer's attributes concurrently and publish the cache
    /// after each response. Returns `(cached, failed)`.
    async fn load_layer_attributes(&self) -> (usize, usize) {
        let mut pending: FuturesUnordered<_> = self
            .well_layers()
            .map(|layer| {
                let name = layer.name.clone();
                async move {
                    let result = self
                        .client
                        .get_layer_attributes(&canonical_layer_name(&name))
                        .await;
                    (name, result)
                }
            })
            .collect();

        let mut cache = LayerAttributeCache::new();
        let mut failed = 0;

        while let Some((name, result)) = pending.next().await {
            match result {
                Ok(schema) => {
                    cache.insert(name, schema);
                }
                Err(e) => {
                    debug!(layer = %name, error = %e, "layer attributes unavailable");
                    failed += 1;
                }
            }
            self.config.set_layer_attributes(&cache);
        }

        (cache.len(), failed)
    }
}
