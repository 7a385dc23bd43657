use std::sync::Arc;

use log::{debug, warn};

use aware_core::model::content_timestamp;

use crate::api::AwarenessApi;

/// Derives the version of the authoritative content from its newest
/// headline.
#[derive(Clone)]
pub struct FreshnessOracle {
    api: Arc<dyn AwarenessApi>,
}

impl FreshnessOracle {
    #[must_use]
    pub fn new(api: Arc<dyn AwarenessApi>) -> Self {
        Self { api }
    }

    /// Newest headline timestamp of the served slides, in epoch millis.
    ///
    /// 0 means unknown: no slides, no parsable timestamps, or the fetch failed.
    pub async fn current_content_timestamp(&self) -> i64 {
        match self.api.slides().await {
            Ok(slides) => {
                let timestamp = content_timestamp(&slides);
                debug!("content timestamp {timestamp} from {} slides", slides.len());
                timestamp
            }
            Err(err) => {
                warn!("could not fetch slides for content timestamp: {err}");
                0
            }
        }
    }
}
