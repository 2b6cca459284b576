// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Report tree types
//!
//! A report is a two-level tree: suites holding test cases, each case carrying
//! a single pass/fail assertion. Empty suites are never constructed by the
//! synthesizer, so every suite in a [`ReportTree`] holds at least one case.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Ordered sequence of suite reports
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReportTree {
    /// Suites in document order
    pub suites: Vec<SuiteReport>,
}

impl ReportTree {
    /// Create an empty tree
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if no suite ran
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.suites.is_empty()
    }

    /// Number of suites
    #[must_use]
    pub fn len(&self) -> usize {
        self.suites.len()
    }

    /// Iterate over suites in order
    pub fn iter(&self) -> std::slice::Iter<'_, SuiteReport> {
        self.suites.iter()
    }

    /// Total number of cases across all suites
    #[must_use]
    pub fn case_count(&self) -> usize {
        self.suites.iter().map(|s| s.cases.len()).sum()
    }

    /// Number of passing cases
    #[must_use]
    pub fn passed_count(&self) -> usize {
        self.cases().filter(|c| c.passed()).count()
    }

    /// Number of failing cases
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.cases().filter(|c| !c.passed()).count()
    }

    /// Check if every case passed
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.suites.iter().all(SuiteReport::passed)
    }

    /// Failing cases, paired with the name of their suite
    #[must_use]
    pub fn failing_cases(&self) -> Vec<(&str, &CaseReport)> {
        self.suites
            .iter()
            .flat_map(|s| {
                s.cases
                    .iter()
                    .filter(|c| !c.passed())
                    .map(move |c| (s.name.as_str(), c))
            })
            .collect()
    }

    fn cases(&self) -> impl Iterator<Item = &CaseReport> {
        self.suites.iter().flat_map(|s| s.cases.iter())
    }
}

impl<'a> IntoIterator for &'a ReportTree {
    type Item = &'a SuiteReport;
    type IntoIter = std::slice::Iter<'a, SuiteReport>;

    fn into_iter(self) -> Self::IntoIter {
        self.suites.iter()
    }
}

/// A suite node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuiteReport {
    /// Suite name
    pub name: String,
    /// Cases in document order
    pub cases: Vec<CaseReport>,
}

impl SuiteReport {
    /// Create a suite with no cases
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cases: Vec::new(),
        }
    }

    /// Append a case
    pub fn push(&mut self, case: CaseReport) {
        self.cases.push(case);
    }

    /// Check if every case in the suite passed
    #[must_use]
    pub fn passed(&self) -> bool {
        self.cases.iter().all(CaseReport::passed)
    }
}

/// A test case node carrying exactly one assertion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseReport {
    /// Case name
    pub name: String,
    /// The case's assertion
    pub assertion: Assertion,
}

impl CaseReport {
    /// Create a case from its name and assertion
    #[must_use]
    pub fn new(name: impl Into<String>, assertion: Assertion) -> Self {
        Self {
            name: name.into(),
            assertion,
        }
    }

    /// Check if the case passed
    #[must_use]
    pub fn passed(&self) -> bool {
        self.assertion.passed()
    }
}

/// Assertion entries a case can carry
///
/// Serialised with a `type` tag so consumers can dispatch on the entry kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Assertion {
    /// Pass/fail outcome with free-form content
    #[serde(rename = "RawAssertion")]
    Raw(RawAssertion),
}

impl Assertion {
    /// Check if the assertion passed
    #[must_use]
    pub fn passed(&self) -> bool {
        match self {
            Self::Raw(raw) => raw.passed,
        }
    }

    /// Human-readable description of the assertion
    #[must_use]
    pub fn description(&self) -> &str {
        match self {
            Self::Raw(raw) => &raw.description,
        }
    }

    /// The assertion's content
    #[must_use]
    pub fn content(&self) -> &AssertionContent {
        match self {
            Self::Raw(raw) => &raw.content,
        }
    }
}

impl From<RawAssertion> for Assertion {
    fn from(raw: RawAssertion) -> Self {
        Self::Raw(raw)
    }
}

/// A pass/fail assertion with description and content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawAssertion {
    /// Whether the assertion passed
    pub passed: bool,
    /// Description (the case name)
    pub description: String,
    /// Error text for failures, otherwise the reported duration
    pub content: AssertionContent,
}

/// Content attached to a raw assertion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AssertionContent {
    /// Duration reported by the binary
    Duration(f64),
    /// Error text reported by the binary
    Error(String),
}

impl fmt::Display for AssertionContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Duration(d) => write!(f, "{d}"),
            Self::Error(e) => f.write_str(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use similar_asserts::assert_eq;

    fn case(name: &str, passed: bool) -> CaseReport {
        let content = if passed {
            AssertionContent::Duration(0.1)
        } else {
            AssertionContent::Error("failed".to_string())
        };
        CaseReport::new(
            name,
            RawAssertion {
                passed,
                description: name.to_string(),
                content,
            }
            .into(),
        )
    }

    fn sample_tree() -> ReportTree {
        let mut arrays = SuiteReport::new("Arrays");
        arrays.push(case("canSort", true));
        arrays.push(case("canSlice", false));
        let mut compiler = SuiteReport::new("Compiler");
        compiler.push(case("canInline", true));

        ReportTree {
            suites: vec![arrays, compiler],
        }
    }

    #[test]
    fn test_tree_counts() {
        let tree = sample_tree();
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.case_count(), 3);
        assert_eq!(tree.passed_count(), 2);
        assert_eq!(tree.failed_count(), 1);
        assert!(!tree.all_passed());
    }

    #[test]
    fn test_failing_cases() {
        let tree = sample_tree();
        let failing = tree.failing_cases();
        assert_eq!(failing.len(), 1);
        assert_eq!(failing[0].0, "Arrays");
        assert_eq!(failing[0].1.name, "canSlice");
    }

    #[test]
    fn test_suite_passed() {
        let tree = sample_tree();
        assert!(!tree.suites[0].passed());
        assert!(tree.suites[1].passed());
    }

    #[test]
    fn test_empty_tree() {
        let tree = ReportTree::new();
        assert!(tree.is_empty());
        assert!(tree.all_passed());
        assert_eq!(tree.case_count(), 0);
    }

    #[test]
    fn test_assertion_json_format() {
        let tree = sample_tree();
        let json = serde_json::to_value(&tree).expect("serialize");
        let first = &json[0]["cases"][0]["assertion"];
        assert_eq!(first["type"], json!("RawAssertion"));
        assert_eq!(first["passed"], json!(true));
        assert_eq!(first["description"], json!("canSort"));
        assert_eq!(first["content"], json!(0.1));

        let failed = &json[0]["cases"][1]["assertion"];
        assert_eq!(failed["content"], json!("failed"));
    }

    #[test]
    fn test_content_display() {
        assert_eq!(AssertionContent::Duration(0.25).to_string(), "0.25");
        assert_eq!(
            AssertionContent::Error("assertion X failed".into()).to_string(),
            "assertion X failed"
        );
    }
}
