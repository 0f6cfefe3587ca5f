use serde::{Deserialize, Serialize};
use std::fmt;
use tooltime_types::UnifiedEvent;

use crate::numeric::share;
use crate::tally::Tally;

// Tool families counted by the classifier, matched on raw names
const BASH_TOOLS: &[&str] = &["Bash", "shell", "shell_command", "exec_command", "exec"];
const EDIT_TOOLS: &[&str] = &["Edit", "edit"];
const WRITE_TOOLS: &[&str] = &["Write", "write"];
const READ_TOOLS: &[&str] = &["Read", "read"];
const SEARCH_TOOLS: &[&str] = &["Glob", "Grep"];
const PLAN_MODE_TOOLS: &[&str] = &["EnterPlanMode", "ExitPlanMode"];

/// Session archetype
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionClass {
    Planning,
    Debugging,
    Building,
    Reviewing,
    Exploring,
    Other,
}

impl SessionClass {
    pub fn as_str(self) -> &'static str {
        match self {
            SessionClass::Planning => "planning",
            SessionClass::Debugging => "debugging",
            SessionClass::Building => "building",
            SessionClass::Reviewing => "reviewing",
            SessionClass::Exploring => "exploring",
            SessionClass::Other => "other",
        }
    }
}

impl fmt::Display for SessionClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification cutoffs. Ratios are strict lower bounds unless named `max`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierThresholds {
    /// Plan-mode and planning-skill calls over all calls
    pub planning_ratio: f64,
    /// Minimum errors (inclusive) for the error-rate debugging rule
    pub debug_min_errors: usize,
    pub debug_error_rate: f64,
    /// Bash-family share for the shell-heavy debugging rule
    pub bash_ratio: f64,
    /// Errors must exceed this for the shell-heavy debugging rule
    pub bash_min_errors: usize,
    /// Edit + Write share
    pub building_ratio: f64,
    /// Read share with no Edit or Write at all
    pub reviewing_ratio: f64,
    /// Read + Glob + Grep share
    pub exploring_ratio: f64,
    pub exploring_max_edit_ratio: f64,
    /// Skill names (last `:` segment) that count as planning
    pub planning_skills: Vec<String>,
}

impl Default for ClassifierThresholds {
    fn default() -> Self {
        Self {
            planning_ratio: 0.10,
            debug_min_errors: 3,
            debug_error_rate: 0.15,
            bash_ratio: 0.40,
            bash_min_errors: 3,
            building_ratio: 0.25,
            reviewing_ratio: 0.50,
            exploring_ratio: 0.55,
            exploring_max_edit_ratio: 0.10,
            planning_skills: ["brainstorm", "writing-plans", "strategy", "write-plan"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

/// Rule-based session classifier; first matching rule wins:
/// planning, debugging, building, reviewing, exploring, other.
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    thresholds: ClassifierThresholds,
}

impl Classifier {
    pub fn new(thresholds: ClassifierThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &ClassifierThresholds {
        &self.thresholds
    }

    fn is_planning_skill(&self, skill: Option<&str>) -> bool {
        let Some(skill) = skill else {
            return false;
        };
        let name = skill.rsplit(':').next().unwrap_or(skill);
        self.thresholds.planning_skills.iter().any(|s| s == name)
    }

    pub fn classify(&self, events: &[&UnifiedEvent]) -> SessionClass {
        let t = &self.thresholds;
        let tools: Tally<&str> = events
            .iter()
            .filter(|e| e.is_call())
            .map(|e| e.tool.as_str())
            .collect();
        let total = tools.total();
        if total == 0 {
            return SessionClass::Other;
        }

        let family = |names: &[&str]| names.iter().map(|n| tools.get(n)).sum::<usize>();
        // Errors are counted over the whole session, any tool
        let errors = events.iter().filter(|e| e.is_error()).count();

        let planning = family(PLAN_MODE_TOOLS)
            + events
                .iter()
                .filter(|e| e.is_call() && self.is_planning_skill(e.skill.as_deref()))
                .count();
        if planning > 0 && share(planning, total) > t.planning_ratio {
            return SessionClass::Planning;
        }

        if errors >= t.debug_min_errors && share(errors, total) > t.debug_error_rate {
            return SessionClass::Debugging;
        }
        if share(family(BASH_TOOLS), total) > t.bash_ratio && errors > t.bash_min_errors {
            return SessionClass::Debugging;
        }

        let edits = family(EDIT_TOOLS);
        let writes = family(WRITE_TOOLS);
        if share(edits + writes, total) > t.building_ratio {
            return SessionClass::Building;
        }

        let reads = family(READ_TOOLS);
        if share(reads, total) > t.reviewing_ratio && edits + writes == 0 {
            return SessionClass::Reviewing;
        }

        if share(reads + family(SEARCH_TOOLS), total) > t.exploring_ratio
            && share(edits, total) < t.exploring_max_edit_ratio
        {
            return SessionClass::Exploring;
        }

        SessionClass::Other
    }
}
