use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::comparison::{default_issue_groups, InsightPolicy, IssueGroup};
use crate::core::{Error, Result};
use crate::data::{FieldMapping, MappingPreset};
use crate::insights::{default_flows, FlowDefinition};
use crate::io::output::OutputFormat;
use crate::ranking::{NoisePolicy, DEFAULT_MIN_LABEL_CHARS};
use crate::report::{ReportOptions, DEFAULT_TOP_N};

/// Root configuration structure for reviewlens
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewlensConfig {
    /// Narrative thresholds
    #[serde(default)]
    pub thresholds: InsightPolicy,

    #[serde(default)]
    pub ranking: RankingConfig,

    /// Keyword groups compared across sides
    #[serde(default = "default_issue_groups")]
    pub issue_groups: Vec<IssueGroup>,

    /// User-flow definitions
    #[serde(default = "default_flows")]
    pub flows: Vec<FlowDefinition>,

    /// Dataset field mapping
    #[serde(default)]
    pub mapping: MappingConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

impl Default for ReviewlensConfig {
    fn default() -> Self {
        Self {
            thresholds: InsightPolicy::default(),
            ranking: RankingConfig::default(),
            issue_groups: default_issue_groups(),
            flows: default_flows(),
            mapping: MappingConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl ReviewlensConfig {
    /// Check every section; the first problem found is returned.
    pub fn validate(&self) -> Result<()> {
        self.thresholds.validate()?;
        self.ranking.validate()?;
        for group in &self.issue_groups {
            group.validate()?;
        }
        for flow in &self.flows {
            flow.validate()?;
        }
        self.mapping.field_mapping()?;
        Ok(())
    }

    /// Pipeline options; `top_n` overrides the configured ranking size.
    pub fn report_options(&self, top_n: Option<usize>) -> ReportOptions {
        ReportOptions {
            top_n: top_n.unwrap_or(self.ranking.default_top_n),
            policy: self.thresholds.clone(),
            noise: self.ranking.noise_policy(),
            issue_groups: self.issue_groups.clone(),
            flows: self.flows.clone(),
            ..ReportOptions::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingConfig {
    /// Entries per ranking unless overridden
    #[serde(default = "default_top_n")]
    pub default_top_n: usize,

    /// Shorter category labels are treated as noise
    #[serde(default = "default_min_label_chars")]
    pub min_label_chars: usize,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            default_top_n: default_top_n(),
            min_label_chars: default_min_label_chars(),
        }
    }
}

impl RankingConfig {
    pub fn noise_policy(&self) -> NoisePolicy {
        NoisePolicy::new(self.min_label_chars)
    }

    pub fn validate(&self) -> Result<()> {
        if self.default_top_n == 0 {
            return Err(Error::Validation(
                "ranking.default_top_n must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

fn default_top_n() -> usize {
    DEFAULT_TOP_N
}

fn default_min_label_chars() -> usize {
    DEFAULT_MIN_LABEL_CHARS
}

/// `[mapping]`: a preset plus per-field source-key overrides.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MappingConfig {
    #[serde(default)]
    pub preset: MappingPreset,

    /// Canonical field name → source keys tried in order
    #[serde(default)]
    pub fields: BTreeMap<String, Vec<String>>,
}

impl MappingConfig {
    pub fn field_mapping(&self) -> Result<FieldMapping> {
        let mut mapping = self.preset.mapping();
        for (field, keys) in &self.fields {
            mapping.override_field(field, keys.clone())?;
        }
        Ok(mapping)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub default_format: OutputFormat,
}
