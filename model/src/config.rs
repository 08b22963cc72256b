use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// The traveled trace only records a new point after moving more than this, in kilometers.
    pub trace_threshold_km: f64,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            // Half a meter
            trace_threshold_km: 0.0005,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_use_defaults() {
        let config: PlaybackConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, PlaybackConfig::default());

        let config: PlaybackConfig =
            serde_json::from_str(r#"{"trace_threshold_km": 0.01}"#).unwrap();
        assert_eq!(config.trace_threshold_km, 0.01);
    }
}
