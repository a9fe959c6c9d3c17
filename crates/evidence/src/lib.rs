//! Evidence providers for PaperForge.
//!
//! Both implement `paperforge_core::EvidenceProvider`; which one the pipeline
//! uses is decided by `evidence.provider` in the configuration.

pub mod google;
pub mod openalex;

pub use google::GoogleSearchProvider;
pub use openalex::OpenAlexProvider;

use paperforge_config::{AppConfig, GOOGLE_PROVIDER};
use paperforge_core::evidence::EvidenceProvider;
use std::sync::Arc;
use std::time::Duration;

/// Build the evidence provider named by `config.evidence.provider`.
///
/// Unknown names fall back to OpenAlex; `AppConfig::validate` rejects them
/// before this is reached.
pub fn build_from_config(config: &AppConfig) -> Arc<dyn EvidenceProvider> {
    let evidence = &config.evidence;
    let timeout = Duration::from_secs(evidence.timeout_secs);

    if evidence.provider == GOOGLE_PROVIDER {
        Arc::new(
            GoogleSearchProvider::new(
                evidence.google_api_key.clone(),
                evidence.google_cse_id.clone(),
            )
            .with_timeout(timeout),
        )
    } else {
        Arc::new(OpenAlexProvider::new(evidence.openalex_mailto.clone()).with_timeout(timeout))
    }
}
