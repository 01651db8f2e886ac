use thiserror::Error;
use xuantuo_bot::{BotDifficulty, BotParams, HeuristicPolicy, Policy};

use crate::config::{AgentConfig, AgentKind};

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("invalid heuristic parameter for agent '{name}': {message}")]
    InvalidHeuristicParam { name: String, message: String },
}

impl AgentError {
    fn heuristic(name: &str, message: impl Into<String>) -> Self {
        AgentError::InvalidHeuristicParam {
            name: name.to_string(),
            message: message.into(),
        }
    }
}

/// Parsed agent definition that can spawn a fresh policy per hand.
pub(super) struct AgentBlueprint {
    pub(super) name: String,
    implementation: AgentImplementation,
}

enum AgentImplementation {
    Heuristic(HeuristicOptions),
}

impl AgentBlueprint {
    pub(super) fn from_configs(configs: &[AgentConfig]) -> Result<Vec<Self>, AgentError> {
        configs.iter().map(Self::from_config).collect()
    }

    fn from_config(config: &AgentConfig) -> Result<Self, AgentError> {
        let implementation = match config.kind {
            AgentKind::Heuristic => AgentImplementation::Heuristic(HeuristicOptions::from_params(
                &config.name,
                &config.params,
            )?),
        };

        Ok(Self {
            name: config.name.clone(),
            implementation,
        })
    }

    pub(super) fn difficulty(&self) -> BotDifficulty {
        match &self.implementation {
            AgentImplementation::Heuristic(opts) => opts.difficulty,
        }
    }

    pub(super) fn spawn_policy(&self, seed: u64) -> Box<dyn Policy> {
        match &self.implementation {
            AgentImplementation::Heuristic(opts) => {
                Box::new(HeuristicPolicy::new(opts.difficulty, opts.params, seed))
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct HeuristicOptions {
    difficulty: BotDifficulty,
    params: BotParams,
}

impl HeuristicOptions {
    fn from_params(name: &str, params: &serde_yaml::Value) -> Result<Self, AgentError> {
        let mut options = Self {
            difficulty: BotDifficulty::Normal,
            params: BotParams::default(),
        };
        if params.is_null() {
            return Ok(options);
        }

        let mapping = params
            .as_mapping()
            .ok_or_else(|| AgentError::heuristic(name, "expected mapping for heuristic params"))?;

        for (key, value) in mapping {
            let Some(key) = key.as_str() else {
                return Err(AgentError::heuristic(name, "parameter names must be strings"));
            };
            match key {
                "difficulty" => {
                    let text = value
                        .as_str()
                        .ok_or_else(|| AgentError::heuristic(name, "difficulty must be a string"))?;
                    options.difficulty = match text.to_ascii_lowercase().as_str() {
                        "easy" | "weakest" => BotDifficulty::Easy,
                        "normal" | "default" => BotDifficulty::Normal,
                        other => {
                            return Err(AgentError::heuristic(
                                name,
                                format!("unknown difficulty '{other}'"),
                            ));
                        }
                    };
                }
                "kou_le_chance" => {
                    let chance = value
                        .as_f64()
                        .filter(|chance| (0.0..=1.0).contains(chance))
                        .ok_or_else(|| {
                            AgentError::heuristic(name, "kou_le_chance must be within 0.0..=1.0")
                        })?;
                    options.params = options.params.with_kou_le_chance(chance);
                }
                "strong_pair_threshold" => {
                    let threshold = value
                        .as_i64()
                        .filter(|threshold| (100..=125).contains(threshold))
                        .ok_or_else(|| {
                            AgentError::heuristic(
                                name,
                                "strong_pair_threshold must be within 100..=125",
                            )
                        })?;
                    options.params.strong_pair_threshold = threshold as i16;
                }
                other => {
                    return Err(AgentError::heuristic(
                        name,
                        format!("unknown parameter '{other}'"),
                    ));
                }
            }
        }

        Ok(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping(entries: &[(&str, serde_yaml::Value)]) -> serde_yaml::Value {
        serde_yaml::Value::Mapping(serde_yaml::Mapping::from_iter(entries.iter().map(
            |(key, value)| (serde_yaml::Value::String((*key).into()), value.clone()),
        )))
    }

    #[test]
    fn heuristic_params_default_to_normal() {
        let options = HeuristicOptions::from_params("bot", &serde_yaml::Value::Null).unwrap();
        assert_eq!(options.difficulty, BotDifficulty::Normal);
        assert_eq!(options.params, BotParams::default());
    }

    #[test]
    fn heuristic_params_parse_overrides() {
        let params = mapping(&[
            ("difficulty", serde_yaml::Value::String("Easy".into())),
            ("kou_le_chance", serde_yaml::Value::from(0.4)),
            ("strong_pair_threshold", serde_yaml::Value::from(110)),
        ]);
        let options = HeuristicOptions::from_params("bot", &params).unwrap();
        assert_eq!(options.difficulty, BotDifficulty::Easy);
        assert_eq!(options.params.kou_le_chance, 0.4);
        assert_eq!(options.params.strong_pair_threshold, 110);
    }

    #[test]
    fn out_of_range_chance_is_rejected() {
        let params = mapping(&[("kou_le_chance", serde_yaml::Value::from(1.5))]);
        let err = HeuristicOptions::from_params("bot", &params).unwrap_err();
        assert!(err.to_string().contains("kou_le_chance"));
    }

    #[test]
    fn unknown_parameter_is_rejected() {
        let params = mapping(&[("style", serde_yaml::Value::String("cautious".into()))]);
        assert!(HeuristicOptions::from_params("bot", &params).is_err());
    }
}
