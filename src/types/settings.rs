//! Inference settings shared by model-backed agents.

use bon::Builder;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Settings forwarded to the model boundary on each turn.
///
/// `timeout` bounds a single model call; the session driver enforces it
/// with [`tokio::time::timeout`]. When unset, a 60 second default applies.
#[derive(Debug, Clone, Builder, Serialize, Deserialize, Default, PartialEq)]
pub struct InferenceSettings {
    pub temperature: Option<f64>,
    pub max_tokens: Option<u32>,
    pub seed: Option<u64>,
    pub stop_sequences: Option<Vec<String>>,
    pub timeout: Option<Duration>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_fields() {
        let settings = InferenceSettings::builder()
            .temperature(0.7)
            .seed(42)
            .timeout(Duration::from_secs(60))
            .build();
        assert_eq!(settings.temperature, Some(0.7));
        assert_eq!(settings.seed, Some(42));
        assert_eq!(settings.timeout, Some(Duration::from_secs(60)));
        assert_eq!(settings.max_tokens, None);
    }

    #[test]
    fn default_leaves_everything_unset() {
        let settings = InferenceSettings::default();
        assert_eq!(settings, InferenceSettings::builder().build());
    }
}
