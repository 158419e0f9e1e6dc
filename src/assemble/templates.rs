//! Descriptor templates for the two study task kinds.

use clap::ValueEnum;
use std::fmt;

use super::inbox::{Inbox, InboxMeta};
use super::sampler::PermutationConfig;
use crate::descriptor::{DescriptorWriter, SectionBuilder, SessionKind};
use crate::error::ConfigError;

/// Leading items of a configuration that form the calibration group.
pub const CALIBRATION_SIZE: usize = 2;

/// Group names: traditional tool first, AI-assisted tool second.
pub const GROUPS: (&str, &str) = ("yellow", "blue");

/// A named pair of condition assignments for the experimental slice.
/// Configuration `i` uses `assignments[i % assignments.len()]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pattern {
    pub name: &'static str,
    pub assignments: [[bool; 4]; 2],
}

impl Pattern {
    pub fn for_config(&self, index: usize) -> &[bool] {
        &self.assignments[index % self.assignments.len()]
    }

    /// Items a configuration needs: the calibration pair plus one per slot.
    pub fn config_length(&self) -> usize {
        CALIBRATION_SIZE + self.assignments[0].len()
    }
}

const ALL_OR_NOTHING: [[bool; 4]; 2] = [[true, true, true, true], [false, false, false, false]];
const HALF_SPLIT: [[bool; 4]; 2] = [[true, true, false, false], [false, false, true, true]];

const COMMITMENT_PATTERNS: &[Pattern] = &[
    Pattern {
        name: "fixedacc",
        assignments: ALL_OR_NOTHING,
    },
    Pattern {
        name: "between",
        assignments: HALF_SPLIT,
    },
];

const SEARCH_PATTERNS: &[Pattern] = &[
    Pattern {
        name: "between",
        assignments: HALF_SPLIT,
    },
    Pattern {
        name: "within",
        assignments: ALL_OR_NOTHING,
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TaskKind {
    Commitment,
    Search,
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Commitment => "commitment",
            Self::Search => "search",
        })
    }
}

impl TaskKind {
    pub fn patterns(self) -> &'static [Pattern] {
        match self {
            Self::Commitment => COMMITMENT_PATTERNS,
            Self::Search => SEARCH_PATTERNS,
        }
    }

    pub fn default_pattern(self) -> &'static Pattern {
        &self.patterns()[0]
    }

    pub fn pattern(self, name: &str) -> Result<&'static Pattern, ConfigError> {
        self.patterns()
            .iter()
            .find(|p| p.name == name)
            .ok_or_else(|| ConfigError::UnknownPattern {
                name: name.to_string(),
                task: self.to_string(),
                expected: self
                    .patterns()
                    .iter()
                    .map(|p| p.name)
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }

    fn system_name(self) -> &'static str {
        match self {
            Self::Commitment => "Event Detector",
            Self::Search => "Smart Search",
        }
    }

    fn action(self) -> &'static str {
        match self {
            Self::Commitment => "tag-event",
            Self::Search => "flag",
        }
    }

    fn traditional_intro(self, num_tasks: usize) -> Vec<String> {
        let mut lines = vec![
            "In this group of tasks, you will be using a traditional email management tool.".to_string(),
        ];
        match self {
            Self::Commitment => lines.extend([
                "In each task session, you will be presented with a fictitious email inbox. Your task will be to identify (and tag) event commitments of the inbox owner.".to_string(),
                "- An email is considered an event if contains a time and involves an active choice to attend. The time may be specific (2/15 10:00am) or vague (this weekend). \n- Passive situations (\"power outage 5-6pm\") or deadlines alone are not considered events. \n- If the same event involves multiple emails, you should tag all of them.".to_string(),
                "There will be 5-15 event commitment emails to identify in each task.".to_string(),
            ]),
            Self::Search => lines.extend([
                "In each task session, you will be presented with a fictitious email inbox. Your task will be to find an email as specified by the task instructions and then flag the email using the interface.".to_string(),
                "As the inboxes are fairly large, you can make use of the search bar when searching for the email.".to_string(),
                "There is only 1 target email to be found. If you believe multiple emails match the task criteria, flag the most relevant one.".to_string(),
            ]),
        }
        lines.push(format!("This section contains a total of {} tasks.", num_tasks));
        lines
    }

    fn assisted_intro(self, num_tasks: usize) -> Vec<String> {
        let mut lines = match self {
            Self::Commitment => vec![
                "In this section, you will see the same interface again, but in addition there is also an AI feature that can detect some of the commitments. The AI feature may be imperfect, so you should still pay attention and correct errors when needed.".to_string(),
                "As before, your task will be to find and tag all the event commitment in the inbox.".to_string(),
            ],
            Self::Search => vec![
                "In this section, you will see the same interface again, but the search bar now incorporates AI features that are designed to assist you in finding relevant emails. The AI features may be imperfect, so you should still pay attention to the results.".to_string(),
                "As before, your task will be to find an email as specified by the task instructions and flag it through the interface.".to_string(),
            ],
        };
        lines.push(format!("This section contains a total of {} tasks.", num_tasks));
        lines
    }
}

/// Which half of a configuration a task belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    Calibration,
    Experiment,
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Calibration => "calibration",
            Self::Experiment => "experiment",
        })
    }
}

/// Inputs for one task block.
pub struct TaskSlot<'a> {
    pub inbox: &'a Inbox,
    pub meta: &'a InboxMeta,
    pub group: &'a str,
    pub condition: Condition,
    pub assisted: bool,
    pub index: usize,
}

fn instruction_section(name: &str, title: &str, desc: Vec<String>) -> SectionBuilder {
    SectionBuilder::new(SessionKind::Interstitial, format!("{}-inst", name))
        .scalar("title", title)
        .scalar("group", name)
        .desc(desc)
}

/// Build the task block for one inbox.
pub fn task_section(kind: TaskKind, pattern: &Pattern, slot: &TaskSlot<'_>) -> SectionBuilder {
    let messages = slot.inbox.message_ids().collect::<Vec<_>>().join(",");
    let baseline = slot.condition == Condition::Calibration;
    let section = SectionBuilder::new(SessionKind::Task, format!("{}-{}", slot.condition, slot.index))
        .scalar("task", kind)
        .scalar("group", slot.group)
        .scalar("usePerf", slot.assisted);

    match kind {
        TaskKind::Commitment => section
            .list("actions", [kind.action()])
            .scalar("systemName", kind.system_name())
            .desc(slot.meta.inst.iter().cloned())
            .list("messages", [format!("raw-list: {}", messages)])
            .scalar("isBaseline", baseline)
            .list(
                "commitments",
                slot.inbox.gold.iter().map(|id| format!("{} | pending | | ", id)),
            ),
        TaskKind::Search => {
            // Calibration tasks are always stable; experiment tasks follow the pattern.
            let stable = baseline || pattern.name == "between";
            section
                .scalar("isBaseline", baseline)
                .scalar("isStable", stable)
                .list("actions", [kind.action()])
                .scalar("systemName", kind.system_name())
                .desc(slot.meta.inst.iter().cloned())
                .list("messages", [format!("raw-list: {}", messages)])
                .list("promoted", slot.inbox.gold.iter().cloned())
        }
    }
}

/// Lookup of inbox data by item name.
pub trait InboxLookup {
    fn lookup(&self, name: &str) -> Option<(&Inbox, &InboxMeta)>;
}

impl InboxLookup for super::inbox::InboxSet {
    fn lookup(&self, name: &str) -> Option<(&Inbox, &InboxMeta)> {
        self.get(name)
    }
}

/// Emit the full descriptor for one sampled configuration.
pub fn render_config(
    kind: TaskKind,
    pattern: &Pattern,
    config: &PermutationConfig,
    assignment: &[bool],
    inboxes: &impl InboxLookup,
) -> Result<String, ConfigError> {
    let items = config.items();
    if items.len() != CALIBRATION_SIZE + assignment.len() {
        return Err(ConfigError::PatternLength {
            pattern: pattern.name.to_string(),
            length: items.len(),
            expected: CALIBRATION_SIZE + assignment.len(),
        });
    }
    let (traditional, assisted) = GROUPS;
    let (calibration, experiment) = items.split_at(CALIBRATION_SIZE);

    let mut writer = DescriptorWriter::new()
        .section(SectionBuilder::new(SessionKind::Training, "training").scalar("for", kind))
        .section(instruction_section(
            traditional,
            "Traditional Tool",
            kind.traditional_intro(calibration.len()),
        ));

    let lookup = |name: &str| {
        inboxes
            .lookup(name)
            .ok_or_else(|| ConfigError::MissingManifestEntry(name.to_string()))
    };

    for (i, name) in calibration.iter().enumerate() {
        let (inbox, meta) = lookup(name)?;
        writer.push(task_section(
            kind,
            pattern,
            &TaskSlot {
                inbox,
                meta,
                group: traditional,
                condition: Condition::Calibration,
                assisted: false,
                index: i,
            },
        ));
    }

    writer.push(instruction_section(
        assisted,
        "AI-assisted Tool",
        kind.assisted_intro(experiment.len()),
    ));
    for (i, (name, &ai)) in experiment.iter().zip(assignment).enumerate() {
        let (inbox, meta) = lookup(name)?;
        writer.push(task_section(
            kind,
            pattern,
            &TaskSlot {
                inbox,
                meta,
                group: assisted,
                condition: Condition::Experiment,
                assisted: ai,
                index: i,
            },
        ));
    }

    Ok(writer.to_string())
}
