use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use tracing::{debug, info};

use civdash_compute::{AnalysisConfig, Dashboard, Pipeline, PipelineMetrics};
use civdash_core::validate_series;
use civdash_storage::{SeriesCache, SeriesSource};

/// One configured source, its cache, and the trend/anomaly pipeline.
pub struct App {
    source: Arc<dyn SeriesSource>,
    cache: SeriesCache,
    pipeline: Pipeline,
}

impl App {
    pub fn new(
        source: Arc<dyn SeriesSource>,
        cache: SeriesCache,
        analysis: AnalysisConfig,
    ) -> Self {
        Self {
            source,
            cache,
            pipeline: Pipeline::new(analysis),
        }
    }

    /// Load (through the cache), validate, annotate and build the view model.
    pub async fn refresh(&mut self) -> Result<Dashboard> {
        let id = self.source.id();
        let points = self
            .cache
            .get_or_load(self.source.as_ref())
            .await
            .with_context(|| format!("failed to load series from {}", id))?;

        validate_series(&points).with_context(|| format!("invalid series in {}", id))?;

        let annotated = self.pipeline.run(&points);
        let dashboard = Dashboard::build(annotated)
            .with_context(|| format!("no data points in {}", id))?;

        info!(
            source = %id,
            points = dashboard.points.len(),
            anomalies = dashboard.anomalies.len(),
            "dashboard refreshed"
        );
        Ok(dashboard)
    }

    /// Drop the cached series so the next refresh reloads it.
    pub fn invalidate(&self) {
        let id = self.source.id();
        if self.cache.invalidate(&id) {
            debug!(source = %id, "series will be reloaded");
        }
    }

    /// When the currently cached series was loaded from the source.
    pub fn loaded_at(&self) -> Option<DateTime<Utc>> {
        self.cache.loaded_at(&self.source.id())
    }

    pub fn metrics(&self) -> &PipelineMetrics {
        &self.pipeline.metrics
    }
}
