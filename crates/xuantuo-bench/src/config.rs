use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::Level;

const SEAT_COUNT: usize = 3;
const RUN_ID_ALLOWED: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789._-";

/// Root benchmark configuration loaded from YAML.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BenchmarkConfig {
    pub run_id: String,
    pub deals: DealConfig,
    /// One agent per seat, in `Player`, `AiLeft`, `AiRight` order.
    pub agents: Vec<AgentConfig>,
    pub outputs: OutputsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl BenchmarkConfig {
    /// Load and validate a YAML configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref().to_path_buf();
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(source) => return Err(ConfigError::Read { source, path }),
        };
        let mut cfg: BenchmarkConfig = match serde_yaml::from_str(&text) {
            Ok(cfg) => cfg,
            Err(source) => return Err(ConfigError::Parse { source, path }),
        };
        if let Err(source) = cfg.validate() {
            return Err(ConfigError::Invalid { path, source });
        }
        Ok(cfg)
    }

    /// Validate the configuration without performing I/O.
    pub fn validate(&mut self) -> Result<(), ValidationError> {
        validate_run_id(&self.run_id)?;
        self.deals.validate()?;
        self.outputs.validate(&self.run_id)?;
        self.logging.normalize();
        validate_agents(&mut self.agents)?;
        Ok(())
    }

    /// Resolve output templates (e.g., `{run_id}` placeholders) into concrete paths.
    pub fn resolved_outputs(&self) -> ResolvedOutputs {
        ResolvedOutputs {
            jsonl: resolve_template(&self.run_id, &self.outputs.jsonl),
            summary_md: resolve_template(&self.run_id, &self.outputs.summary_md),
        }
    }
}

/// Deal sampling configuration block.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct DealConfig {
    pub seed: Option<u64>,
    pub hands: usize,
    /// Coin balances carry from one hand to the next when set.
    #[serde(default = "default_carry_balances")]
    pub carry_balances: bool,
}

impl DealConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        match self.hands {
            0 => Err(invalid("deals.hands", "number of hands must be greater than zero")),
            _ => Ok(()),
        }
    }
}

fn default_carry_balances() -> bool {
    true
}

/// Definition of the automaton sitting in one seat.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct AgentConfig {
    pub name: String,
    pub kind: AgentKind,
    #[serde(default)]
    pub params: serde_yaml::Value,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AgentKind {
    Heuristic,
}

/// Output artifact configuration.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct OutputsConfig {
    pub jsonl: String,
    pub summary_md: String,
}

impl OutputsConfig {
    fn validate(&self, run_id: &str) -> Result<(), ValidationError> {
        let paths = [
            ("outputs.jsonl", &self.jsonl),
            ("outputs.summary_md", &self.summary_md),
        ];
        for (field, template) in paths {
            if template.trim().is_empty() {
                return Err(invalid(field, "path must not be empty"));
            }
            if resolve_template(run_id, template).file_name().is_none() {
                return Err(invalid(field, "path must name a file"));
            }
        }
        Ok(())
    }
}

/// Logging configuration defaults to disabled structured logs.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default)]
    pub enable_structured: bool,
    #[serde(default = "default_tracing_level")]
    pub tracing_level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enable_structured: false,
            tracing_level: default_tracing_level(),
        }
    }
}

impl LoggingConfig {
    fn normalize(&mut self) {
        if self.tracing_level.trim().is_empty() {
            self.tracing_level = default_tracing_level();
        }
    }

    /// Parsed `tracing_level`; `None` when it names no level.
    pub fn level(&self) -> Option<Level> {
        self.tracing_level.trim().parse().ok()
    }
}

fn default_tracing_level() -> String {
    "info".to_string()
}

fn validate_run_id(run_id: &str) -> Result<(), ValidationError> {
    if run_id.trim().is_empty() {
        return Err(invalid("run_id", "run_id must not be empty"));
    }
    if !run_id.chars().all(|c| RUN_ID_ALLOWED.contains(c)) {
        return Err(invalid(
            "run_id",
            "run_id may only contain alphanumeric characters, '.', '_' or '-'",
        ));
    }
    Ok(())
}

/// Exactly one uniquely named agent per seat. Missing params become an
/// empty mapping.
fn validate_agents(agents: &mut [AgentConfig]) -> Result<(), ValidationError> {
    if agents.len() != SEAT_COUNT {
        return Err(invalid(
            "agents",
            format!("exactly {SEAT_COUNT} agents are required, found {}", agents.len()),
        ));
    }

    let mut seen = HashSet::new();
    for (seat, agent) in agents.iter_mut().enumerate() {
        let field = format!("agents[{seat}].name");
        let name = agent.name.trim();
        if name.is_empty() {
            return Err(invalid(field, "agent name must not be empty"));
        }
        if !name.chars().all(|c| RUN_ID_ALLOWED.contains(c)) {
            return Err(invalid(field, format!("agent name '{name}' contains invalid characters")));
        }
        if !seen.insert(name.to_string()) {
            return Err(invalid("agents", format!("agent name '{name}' defined more than once")));
        }

        if agent.params.is_null() {
            agent.params = serde_yaml::Value::Mapping(Default::default());
        }
    }

    Ok(())
}

fn resolve_template(run_id: &str, template: &str) -> PathBuf {
    PathBuf::from(template.replace("{run_id}", run_id))
}

/// Fully resolved output paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOutputs {
    pub jsonl: PathBuf,
    pub summary_md: PathBuf,
}

/// Errors surfaced when loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("{} is not a valid bench config: {source}", .path.display())]
    Invalid {
        path: PathBuf,
        #[source]
        source: ValidationError,
    },
}

impl ConfigError {
    pub fn path(&self) -> &Path {
        let (ConfigError::Read { path, .. }
        | ConfigError::Parse { path, .. }
        | ConfigError::Invalid { path, .. }) = self;
        path
    }
}

/// Validation failures captured with contextual metadata.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{field}: {message}")]
    InvalidField { field: String, message: String },
}

fn invalid(field: impl Into<String>, message: impl Into<String>) -> ValidationError {
    ValidationError::InvalidField {
        field: field.into(),
        message: message.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(yaml: &str) -> BenchmarkConfig {
        serde_yaml::from_str(yaml).expect("yaml parses")
    }

    fn failing_field(err: ValidationError) -> String {
        let ValidationError::InvalidField { field, .. } = err;
        field
    }

    const BASIC_YAML: &str = r#"
run_id: "table_smoke"
deals:
  seed: 123
  hands: 16
agents:
  - name: "player"
    kind: "heuristic"
    params:
      difficulty: "normal"
  - name: "left"
    kind: "heuristic"
    params:
      difficulty: "easy"
  - name: "right"
    kind: "heuristic"
    params:
      kou_le_chance: 0.5
outputs:
  jsonl: "bench/out/{run_id}/hands.jsonl"
  summary_md: "bench/out/{run_id}/summary.md"
logging:
  enable_structured: true
  tracing_level: "debug"
"#;

    #[test]
    fn loads_and_validates_basic_config() {
        let mut cfg = parse(BASIC_YAML);
        cfg.validate().expect("validate");

        assert!(cfg.deals.carry_balances);
        assert!(cfg.logging.enable_structured);
        assert_eq!(cfg.logging.level(), Some(Level::DEBUG));

        let outputs = cfg.resolved_outputs();
        assert_eq!(
            outputs.jsonl,
            PathBuf::from("bench/out/table_smoke/hands.jsonl")
        );
    }

    #[test]
    fn rejects_wrong_seat_count() {
        let yaml = BASIC_YAML.replace(
            "  - name: \"right\"\n    kind: \"heuristic\"\n    params:\n      kou_le_chance: 0.5\n",
            "",
        );
        let mut cfg = parse(&yaml);
        let err = cfg.validate().expect_err("two agents should fail");
        assert_eq!(failing_field(err), "agents");
    }

    #[test]
    fn rejects_duplicate_agents() {
        let yaml = BASIC_YAML.replace("name: \"left\"", "name: \"player\"");
        let mut cfg = parse(&yaml);
        let err = cfg.validate().expect_err("duplicate agents should fail");
        assert_eq!(failing_field(err), "agents");
    }

    #[test]
    fn rejects_invalid_run_id() {
        let yaml = BASIC_YAML.replace("table_smoke", "table smoke");
        let mut cfg = parse(&yaml);
        let err = cfg.validate().expect_err("invalid run id");
        assert_eq!(failing_field(err), "run_id");
    }

    #[test]
    fn rejects_zero_hands() {
        let yaml = BASIC_YAML.replace("hands: 16", "hands: 0");
        let mut cfg = parse(&yaml);
        let err = cfg.validate().expect_err("zero hands");
        assert_eq!(failing_field(err), "deals.hands");
    }

    #[test]
    fn outputs_resolve_template_multiple_occurrences() {
        let yaml = BASIC_YAML.replace(
            "bench/out/{run_id}/summary.md",
            "bench/out/{run_id}/{run_id}/summary.md",
        );
        let mut cfg = parse(&yaml);
        cfg.validate().expect("valid");
        let outputs = cfg.resolved_outputs();
        assert_eq!(
            outputs.summary_md,
            PathBuf::from("bench/out/table_smoke/table_smoke/summary.md")
        );
    }

    #[test]
    fn rejects_blank_agent_name_by_seat() {
        let yaml = BASIC_YAML.replace("name: \"left\"", "name: \"  \"");
        let mut cfg = parse(&yaml);
        let err = cfg.validate().expect_err("blank name");
        assert_eq!(failing_field(err), "agents[1].name");
    }

    #[test]
    fn from_path_reports_the_failing_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let good = dir.path().join("bench.yaml");
        fs::write(&good, BASIC_YAML).expect("write config");
        let cfg = BenchmarkConfig::from_path(&good).expect("loads");
        assert_eq!(cfg.agents.len(), 3);

        let bad = dir.path().join("bad.yaml");
        fs::write(&bad, BASIC_YAML.replace("hands: 16", "hands: 0")).expect("write config");
        let err = BenchmarkConfig::from_path(&bad).expect_err("zero hands");
        assert!(matches!(err, ConfigError::Invalid { .. }));
        assert_eq!(err.path(), bad.as_path());

        let missing = dir.path().join("missing.yaml");
        let err = BenchmarkConfig::from_path(&missing).expect_err("missing file");
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn blank_tracing_level_falls_back_to_info() {
        let yaml = BASIC_YAML.replace("tracing_level: \"debug\"", "tracing_level: \" \"");
        let mut cfg = parse(&yaml);
        cfg.validate().expect("valid");
        assert_eq!(cfg.logging.level(), Some(Level::INFO));
    }
}
