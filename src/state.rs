//! Utilities for saving a plugin's state so it can be restored later.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A plain, unnormalized value for a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamValue {
    F32(f32),
    Bool(bool),
}

/// A plugin's state so it can be restored at a later point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginState {
    /// The version of the plugin that saved this state.
    pub version: String,
    /// The plugin's parameter values keyed by parameter ID. These are stored unnormalized so the
    /// old values are recalled when a parameter's range gets extended.
    pub params: BTreeMap<String, ParamValue>,
    /// The index of the selected program.
    #[serde(default)]
    pub program: usize,
}

impl PluginState {
    /// Serialize the state to JSON.
    pub fn to_bytes(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }

    /// Deserialize a state previously created with [`to_bytes()`][Self::to_bytes()].
    pub fn from_bytes(bytes: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_are_tagged_in_json() {
        let state = PluginState {
            version: String::from("0.1.0"),
            params: BTreeMap::from([
                (String::from("bypass"), ParamValue::Bool(true)),
                (String::from("gain"), ParamValue::F32(-6.0)),
            ]),
            program: 0,
        };

        let json = String::from_utf8(state.to_bytes().unwrap()).unwrap();
        assert_eq!(
            json,
            r#"{"version":"0.1.0","params":{"bypass":{"bool":true},"gain":{"f32":-6.0}},"program":0}"#
        );
    }

    #[test]
    fn missing_program_defaults_to_first() {
        let state =
            PluginState::from_bytes(br#"{"version":"0.1.0","params":{"gain":{"f32":3.0}}}"#)
                .unwrap();
        assert_eq!(state.program, 0);
        assert_eq!(state.params["gain"], ParamValue::F32(3.0));
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(PluginState::from_bytes(b"not json").is_err());
        assert!(PluginState::from_bytes(br#"{"params":{}}"#).is_err());
    }
}
