use std::{collections::BTreeMap, path::Path};

use serde::{Deserialize, Serialize};

use super::{Priority, RequirementId, TestingDetails};

/// Configuration for test case generation.
///
/// This struct holds settings that control identifier formatting, priority
/// assignment, dependency linking and table rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// The number of digits in the test case sequence number.
    ///
    /// Digits are padded to this width with leading zeros.
    /// For example, '001' (3 digits) or '0001' (4 digits).
    digits: usize,

    /// Words which mark a functional requirement as safety or security
    /// relevant. Matching is case-insensitive on whole words.
    safety_keywords: Vec<String>,

    /// Explicit priorities keyed by requirement ID (e.g. `FR1.1`).
    ///
    /// An override takes precedence over the keyword rule.
    priority_overrides: BTreeMap<String, Priority>,

    /// Whether the integration test case of a requirement depends on its unit
    /// test case.
    pub link_levels: bool,

    /// The text rendered in the 'Dependent Test Cases' column when a test
    /// case has no dependencies.
    pub none_marker: String,

    /// Project and logistics details printed ahead of the table.
    pub testing_details: TestingDetails,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            digits: default_digits(),
            safety_keywords: default_safety_keywords(),
            priority_overrides: BTreeMap::new(),
            link_levels: default_link_levels(),
            none_marker: default_none_marker(),
            testing_details: TestingDetails::default(),
        }
    }
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {e}"))?;
        toml::from_str(&content).map_err(|e| format!("Failed to parse config file: {e}"))
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML or if
    /// the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), String> {
        let content =
            toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize config: {e}"))?;
        std::fs::write(path, content).map_err(|e| format!("Failed to write config file: {e}"))
    }

    /// Returns the number of digits for padding test case sequence numbers.
    #[must_use]
    pub const fn digits(&self) -> usize {
        self.digits
    }

    /// Returns the configured safety keywords.
    #[must_use]
    pub fn safety_keywords(&self) -> &[String] {
        &self.safety_keywords
    }

    /// Returns the priority override for a requirement, if configured.
    #[must_use]
    pub fn priority_override(&self, requirement: &RequirementId) -> Option<Priority> {
        self.priority_overrides
            .get(&requirement.to_string())
            .copied()
    }

    /// Returns every priority override, ordered by requirement ID text.
    pub fn priority_overrides(&self) -> impl Iterator<Item = (&str, Priority)> {
        self.priority_overrides
            .iter()
            .map(|(requirement, priority)| (requirement.as_str(), *priority))
    }

    /// Sets an explicit priority for a requirement.
    ///
    /// Returns the previous override, if any.
    pub fn set_priority_override(
        &mut self,
        requirement: &RequirementId,
        priority: Priority,
    ) -> Option<Priority> {
        self.priority_overrides
            .insert(requirement.to_string(), priority)
    }

    /// Adds a safety keyword.
    ///
    /// Keywords are normalized to lowercase before adding.
    ///
    /// Returns `true` if the keyword was added, `false` if it already existed.
    pub fn add_safety_keyword(&mut self, keyword: &str) -> bool {
        let keyword = keyword.to_lowercase();
        if self.safety_keywords.contains(&keyword) {
            false
        } else {
            self.safety_keywords.push(keyword);
            true
        }
    }
}

const fn default_digits() -> usize {
    3
}

const fn default_link_levels() -> bool {
    true
}

fn default_none_marker() -> String {
    "None".to_string()
}

fn default_safety_keywords() -> Vec<String> {
    [
        "safety",
        "safe",
        "security",
        "secure",
        "emergency",
        "alarm",
        "hazard",
        "fault",
        "failure",
        "collision",
        "fire",
        "authentication",
        "authorization",
        "password",
        "encrypt",
        "encryption",
        "tamper",
        "intrusion",
        "critical",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

/// The serialized versions of the configuration.
/// This allows for future changes to the configuration format and to the domain
/// type without breaking compatibility.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default = "default_digits")]
        digits: usize,

        #[serde(default = "default_safety_keywords")]
        safety_keywords: Vec<String>,

        #[serde(default = "default_link_levels")]
        link_levels: bool,

        #[serde(default = "default_none_marker")]
        none_marker: String,

        #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
        priority_overrides: BTreeMap<String, Priority>,

        #[serde(default, skip_serializing_if = "TestingDetails::is_empty")]
        testing_details: TestingDetails,
    },
}

impl From<Versions> for Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                digits,
                safety_keywords,
                priority_overrides,
                link_levels,
                none_marker,
                testing_details,
            } => Self {
                digits,
                safety_keywords,
                priority_overrides,
                link_levels,
                none_marker,
                testing_details,
            },
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        Self::V1 {
            digits: config.digits,
            safety_keywords: config.safety_keywords,
            priority_overrides: config.priority_overrides,
            link_levels: config.link_levels,
            none_marker: config.none_marker,
            testing_details: config.testing_details,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn load_reads_valid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            b"_version = \"1\"\ndigits = 4\nsafety_keywords = [\"brake\"]\nlink_levels = false\nnone_marker = \"-\"\n\n[priority_overrides]\n\"FR1.1\" = \"P3\"\n",
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();

        assert_eq!(config.digits(), 4);
        assert_eq!(config.safety_keywords(), &["brake".to_string()]);
        assert!(!config.link_levels);
        assert_eq!(config.none_marker, "-");
        assert_eq!(
            config.priority_override(&RequirementId::try_from("FR1.1").unwrap()),
            Some(Priority::P3)
        );
        assert_eq!(
            config.priority_override(&RequirementId::try_from("FR1.2").unwrap()),
            None
        );
    }

    #[test]
    fn load_missing_file_returns_error() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("missing.toml");

        let error = Config::load(&missing).unwrap_err();
        assert!(error.starts_with("Failed to read config file:"));
    }

    #[test]
    fn load_invalid_toml_returns_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"_version = \"1\"\ndigits = \"three\"\n")
            .unwrap();

        let error = Config::load(file.path()).unwrap_err();
        assert!(error.starts_with("Failed to parse config file:"));
    }

    #[test]
    fn unknown_priority_is_rejected() {
        let result: Result<Config, _> =
            toml::from_str("_version = \"1\"\n[priority_overrides]\n\"FR1.1\" = \"P9\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn empty_file_returns_default() {
        let expected = Config::default();
        let actual: Config = toml::from_str(r#"_version = "1""#).unwrap();
        assert_eq!(actual, expected);
    }

    #[test]
    fn testing_details_are_read_from_their_own_table() {
        let config: Config = toml::from_str(
            "_version = \"1\"\n\n[testing_details]\nproject = \"Toll Plaza TP-01\"\ntester = \"R. Rao\"\n",
        )
        .unwrap();

        assert_eq!(config.testing_details.project, "Toll Plaza TP-01");
        assert_eq!(config.testing_details.tester, "R. Rao");
        assert!(config.testing_details.designer.is_empty());
    }

    #[test]
    fn overrides_are_listed_in_key_order() {
        let mut config = Config::default();
        config.set_priority_override(&RequirementId::try_from("NFR1.1").unwrap(), Priority::P1);
        config.set_priority_override(&RequirementId::try_from("CR1.1").unwrap(), Priority::P2);

        let overrides: Vec<(&str, Priority)> = config.priority_overrides().collect();
        assert_eq!(overrides, [("CR1.1", Priority::P2), ("NFR1.1", Priority::P1)]);
    }

    #[test]
    fn save_then_load_preserves_overrides() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("reqtest.toml");

        let mut config = Config::default();
        let id = RequirementId::try_from("NFR2.1").unwrap();
        assert_eq!(config.set_priority_override(&id, Priority::P1), None);
        assert!(config.add_safety_keyword("Brake"));
        assert!(!config.add_safety_keyword("brake"));
        assert!(config.testing_details.set("designer", "A. Kumar".to_string()));
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.priority_override(&id), Some(Priority::P1));
    }
}
