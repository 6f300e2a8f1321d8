//! Typed board configuration

use crate::{error::ConfigError, ConfigResult};
use clientdesk_board::{
    builtin_lane_table, DragConfig, HttpGatewayConfig, Lane, LaneMeta, LaneTable,
    DEFAULT_ACTIVATION_DISTANCE, DEFAULT_ACTIVITY_CAPACITY,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Default per-request timeout for the HTTP gateway
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Everything the board reads at startup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub drag: DragSettings,
    pub gateway: GatewaySettings,
    /// Number of commit attempts kept in the activity log
    pub activity_capacity: usize,
    /// Label/icon replacements keyed by lane
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub lanes: BTreeMap<Lane, LaneOverride>,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            drag: DragSettings::default(),
            gateway: GatewaySettings::default(),
            activity_capacity: DEFAULT_ACTIVITY_CAPACITY,
            lanes: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DragSettings {
    /// Pixels the pointer must travel before a press becomes a drag
    pub activation_distance: f64,
}

impl Default for DragSettings {
    fn default() -> Self {
        Self {
            activation_distance: DEFAULT_ACTIVATION_DISTANCE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewaySettings {
    /// REST base URL; without it only the in-memory gateway is available
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    pub timeout_ms: u64,
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaneOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl BoardConfig {
    /// Reject values the board cannot work with
    pub fn validate(&self) -> ConfigResult<()> {
        let distance = self.drag.activation_distance;
        if !distance.is_finite() || distance < 0.0 {
            return Err(ConfigError::invalid_value(
                "drag.activation_distance",
                format!("must be a non-negative number, got {}", distance),
            ));
        }
        if self.gateway.timeout_ms == 0 {
            return Err(ConfigError::invalid_value(
                "gateway.timeout_ms",
                "must be greater than zero",
            ));
        }
        if let Some(url) = &self.gateway.base_url {
            if url.trim().is_empty() {
                return Err(ConfigError::invalid_value("gateway.base_url", "is empty"));
            }
        }
        for (lane, o) in &self.lanes {
            if o.label.as_deref().is_some_and(|l| l.trim().is_empty()) {
                return Err(ConfigError::invalid_value(
                    format!("lanes.{}.label", lane),
                    "is empty",
                ));
            }
        }
        Ok(())
    }

    pub fn drag_config(&self) -> DragConfig {
        DragConfig {
            activation_distance: self.drag.activation_distance,
        }
    }

    /// Built-in lane table with configured labels and icons applied
    pub fn lane_table(&self) -> LaneTable {
        let builtin = builtin_lane_table();
        let overrides: Vec<LaneMeta> = self
            .lanes
            .iter()
            .filter_map(|(lane, o)| {
                let current = builtin.get(*lane)?;
                Some(LaneMeta::new(
                    *lane,
                    o.label.clone().unwrap_or_else(|| current.label.clone()),
                    o.icon.clone().unwrap_or_default(),
                ))
            })
            .collect();

        builtin.with_overrides(&overrides)
    }

    /// HTTP gateway settings, when a base URL is configured
    pub fn http_gateway(&self) -> Option<HttpGatewayConfig> {
        let base_url = self.gateway.base_url.as_ref()?;
        Some(
            HttpGatewayConfig::new(base_url.clone())
                .with_timeout(Duration::from_millis(self.gateway.timeout_ms)),
        )
    }
}
