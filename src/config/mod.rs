//! Configuration loading and management for Org Audit
//!
//! Architecture: Anti-Corruption Layer - Configuration translates external YAML formats
//! - Raw YAML structures are converted to clean policy objects
//! - Default policies are embedded in the domain, not infrastructure
//! - Every loaded configuration is validated before use

use crate::domain::{OrgError, OrgResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// File names searched in the working directory when no config path is given
pub const DEFAULT_CONFIG_FILES: [&str; 3] = ["org_audit.yaml", "org_audit.yml", ".org_audit.yaml"];

/// Main configuration structure for Org Audit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Configuration format version
    pub version: String,
    /// Salary band for managers
    #[serde(default)]
    pub salary: SalaryPolicy,
    /// Reporting depth limit
    #[serde(default)]
    pub reporting: ReportingPolicy,
}

/// Allowed salary band relative to the average of a manager's direct reports
///
/// A manager is compliant when
/// `avg * (1 + min_premium) <= salary <= avg * (1 + max_premium)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SalaryPolicy {
    pub min_premium: f64,
    pub max_premium: f64,
}

impl SalaryPolicy {
    pub fn min_multiplier(&self) -> f64 {
        1.0 + self.min_premium
    }

    pub fn max_multiplier(&self) -> f64 {
        1.0 + self.max_premium
    }
}

impl Default for SalaryPolicy {
    fn default() -> Self {
        Self {
            min_premium: 0.20,
            max_premium: 0.50,
        }
    }
}

/// Maximum number of managers allowed between an employee and the root
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportingPolicy {
    pub max_managers: usize,
}

impl Default for ReportingPolicy {
    fn default() -> Self {
        Self { max_managers: 4 }
    }
}

impl AuditConfig {
    /// Load configuration from a YAML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> OrgResult<Self> {
        let contents = fs::read_to_string(&path).map_err(|e| {
            OrgError::config(format!(
                "Failed to read config file '{}': {}",
                path.as_ref().display(),
                e
            ))
        })?;

        let config: Self = serde_yaml::from_str(&contents).map_err(|e| {
            OrgError::config(format!(
                "Failed to parse config file '{}': {}",
                path.as_ref().display(),
                e
            ))
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from string content
    pub fn load_from_str(content: &str) -> OrgResult<Self> {
        let config: Self = serde_yaml::from_str(content)
            .map_err(|e| OrgError::config(format!("Failed to parse config: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Look for one of [`DEFAULT_CONFIG_FILES`] under `dir`
    pub fn discover_in<P: AsRef<Path>>(dir: P) -> OrgResult<Option<Self>> {
        for name in DEFAULT_CONFIG_FILES {
            let candidate = dir.as_ref().join(name);
            if candidate.is_file() {
                tracing::debug!("Loading configuration from {}", candidate.display());
                return Self::load_from_file(candidate).map(Some);
            }
        }
        Ok(None)
    }

    /// Validate the configuration
    pub fn validate(&self) -> OrgResult<()> {
        if self.version != "1.0" {
            return Err(OrgError::config(format!(
                "Unsupported configuration version '{}', expected 1.0",
                self.version
            )));
        }

        let SalaryPolicy {
            min_premium,
            max_premium,
        } = self.salary;
        if !min_premium.is_finite() || !max_premium.is_finite() {
            return Err(OrgError::config("Salary premiums must be finite numbers"));
        }
        if min_premium < 0.0 {
            return Err(OrgError::config(format!(
                "Minimum salary premium cannot be negative, got {min_premium}"
            )));
        }
        if min_premium > max_premium {
            return Err(OrgError::config(format!(
                "Minimum salary premium {min_premium} exceeds maximum {max_premium}"
            )));
        }

        Ok(())
    }

    /// Convert to JSON for serialization
    pub fn to_json(&self) -> OrgResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| OrgError::config(format!("Failed to serialize config: {e}")))
    }

    /// Create a fingerprint of the configuration for report provenance
    pub fn fingerprint(&self) -> String {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();

        self.version.hash(&mut hasher);
        self.salary.min_premium.to_bits().hash(&mut hasher);
        self.salary.max_premium.to_bits().hash(&mut hasher);
        self.reporting.max_managers.hash(&mut hasher);

        format!("{:x}", hasher.finish())
    }
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            salary: SalaryPolicy::default(),
            reporting: ReportingPolicy::default(),
        }
    }
}

/// Configuration builder for programmatic construction
pub struct ConfigBuilder {
    config: AuditConfig,
}

impl ConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            config: AuditConfig::default(),
        }
    }

    pub fn salary_band(mut self, min_premium: f64, max_premium: f64) -> Self {
        self.config.salary = SalaryPolicy {
            min_premium,
            max_premium,
        };
        self
    }

    pub fn max_managers(mut self, max_managers: usize) -> Self {
        self.config.reporting.max_managers = max_managers;
        self
    }

    /// Build the final configuration
    pub fn build(self) -> OrgResult<AuditConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
