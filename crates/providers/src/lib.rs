//! Synthesis engine implementations for PaperForge.
//!
//! All engines implement the `paperforge_core::Provider` trait.
//! The router builds the configured engine at startup.

pub mod amplify;
pub mod openai_compat;
pub mod router;

pub use amplify::AmplifyProvider;
pub use openai_compat::OpenAiCompatProvider;
pub use router::build_from_config;

use paperforge_core::error::SynthesisError;

/// Classify a transport-level reqwest failure.
pub(crate) fn map_send_error(e: reqwest::Error) -> SynthesisError {
    if e.is_timeout() {
        SynthesisError::Timeout(e.to_string())
    } else {
        SynthesisError::Network(e.to_string())
    }
}
