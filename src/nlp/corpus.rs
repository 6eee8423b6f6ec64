//! Intent labels and the canonical phrasings the classifier is trained on.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Coarse category of question being asked.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum IntentLabel {
    SelectAll,
    SelectWithCondition,
    Count,
    Aggregate,
    Join,
    Unknown,
}

impl IntentLabel {
    /// Labels the classifier can be trained on; `Unknown` is never predicted directly.
    pub const TRAINED: [IntentLabel; 5] = [
        IntentLabel::SelectAll,
        IntentLabel::SelectWithCondition,
        IntentLabel::Count,
        IntentLabel::Aggregate,
        IntentLabel::Join,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SelectAll => "select_all",
            Self::SelectWithCondition => "select_with_condition",
            Self::Count => "count",
            Self::Aggregate => "aggregate",
            Self::Join => "join",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for IntentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IntentLabel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "select_all" => Ok(Self::SelectAll),
            "select_with_condition" => Ok(Self::SelectWithCondition),
            "count" => Ok(Self::Count),
            "aggregate" => Ok(Self::Aggregate),
            "join" => Ok(Self::Join),
            "unknown" => Ok(Self::Unknown),
            other => Err(format!("unrecognised intent label: {other}")),
        }
    }
}

/// Canonical example phrases per intent, in training order.
pub const INTENT_PATTERNS: &[(IntentLabel, &[&str])] = &[
    (
        IntentLabel::SelectAll,
        &[
            "show all employees",
            "list all employees",
            "get all employees",
            "display all employees",
            "show all departments",
            "list all departments",
            "get all departments",
            "show all projects",
            "list all projects",
            "get all projects",
        ],
    ),
    (
        IntentLabel::SelectWithCondition,
        &[
            "show employees in IT department",
            "get employees with salary greater than 50000",
            "list employees hired after 2020",
            "show employees in engineering",
            "get high salary employees",
            "find employees in marketing",
            "show recent hires",
            "list senior employees",
        ],
    ),
    (
        IntentLabel::Count,
        &[
            "how many employees",
            "count employees",
            "number of employees",
            "total employees",
            "how many departments",
            "count departments",
            "how many projects",
            "count projects",
        ],
    ),
    (
        IntentLabel::Aggregate,
        &[
            "average salary",
            "maximum salary",
            "minimum salary",
            "total salary",
            "sum of salaries",
            "highest paid employee",
            "lowest paid employee",
            "average employee salary",
        ],
    ),
    (
        IntentLabel::Join,
        &[
            "show employees with their departments",
            "list employees and departments",
            "get employee department information",
            "show department wise employees",
            "employees with department names",
        ],
    ),
];

/// Flatten the corpus into `(label, phrase)` pairs.
pub fn examples() -> impl Iterator<Item = (IntentLabel, &'static str)> {
    INTENT_PATTERNS
        .iter()
        .flat_map(|(label, phrases)| phrases.iter().map(move |phrase| (*label, *phrase)))
}
