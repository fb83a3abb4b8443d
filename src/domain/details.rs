use serde::{Deserialize, Serialize, Serializer, ser::SerializeMap};

/// The testing details printed ahead of a test case table: project
/// information on the left, test logistics on the right.
///
/// Every field is optional; empty fields are omitted from the output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TestingDetails {
    /// Project name and ID.
    pub project: String,
    /// Features to be tested.
    pub features: String,
    /// References or input documents, with versions.
    pub references: String,
    /// Attributes common to every test case.
    pub common_attributes: String,
    /// Notation used in test case descriptions.
    pub notation: String,
    /// Version of the item under test.
    pub version: String,
    /// Test environment.
    pub environment: String,
    /// Test case designer.
    pub designer: String,
    /// Test case reviewer.
    pub reviewer: String,
    /// Tester.
    pub tester: String,
    /// Test start date.
    pub start_date: String,
    /// Test end date.
    pub end_date: String,
}

impl TestingDetails {
    /// The configuration keys accepted by [`set`](Self::set).
    pub const KEYS: [&'static str; 12] = [
        "project",
        "features",
        "references",
        "common_attributes",
        "notation",
        "version",
        "environment",
        "designer",
        "reviewer",
        "tester",
        "start_date",
        "end_date",
    ];

    /// Whether no detail is filled in.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    /// The filled-in details as `(label, value)` pairs, in display order.
    #[must_use]
    pub fn entries(&self) -> Vec<(&'static str, &str)> {
        [
            ("Project Name and ID", &self.project),
            ("Features to be Tested", &self.features),
            ("References/Input Documents with Version", &self.references),
            ("Common Attributes", &self.common_attributes),
            ("Notation for description", &self.notation),
            ("Version of Item under test", &self.version),
            ("Test Environment", &self.environment),
            ("Test Case Designer", &self.designer),
            ("Test Case Reviewer", &self.reviewer),
            ("Tester", &self.tester),
            ("Test Start Date", &self.start_date),
            ("Test End Date", &self.end_date),
        ]
        .into_iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(label, value)| (label, value.as_str()))
        .collect()
    }

    /// Sets one detail by its configuration key (see [`KEYS`](Self::KEYS)).
    ///
    /// Returns `false` if the key is unknown.
    pub fn set(&mut self, key: &str, value: String) -> bool {
        let field = match key {
            "project" => &mut self.project,
            "features" => &mut self.features,
            "references" => &mut self.references,
            "common_attributes" => &mut self.common_attributes,
            "notation" => &mut self.notation,
            "version" => &mut self.version,
            "environment" => &mut self.environment,
            "designer" => &mut self.designer,
            "reviewer" => &mut self.reviewer,
            "tester" => &mut self.tester,
            "start_date" => &mut self.start_date,
            "end_date" => &mut self.end_date,
            _ => return false,
        };
        *field = value;
        true
    }

    /// The filled-in details as a map keyed by display label, for JSON
    /// output.
    #[must_use]
    pub const fn labelled(&self) -> Labelled<'_> {
        Labelled(self)
    }
}

/// Serializes [`TestingDetails`] as a map from display label to value,
/// omitting empty fields.
#[derive(Debug, Clone, Copy)]
pub struct Labelled<'a>(&'a TestingDetails);

impl Serialize for Labelled<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let entries = self.0.entries();
        let mut map = serializer.serialize_map(Some(entries.len()))?;
        for (label, value) in entries {
            map.serialize_entry(label, value)?;
        }
        map.end()
    }
}
