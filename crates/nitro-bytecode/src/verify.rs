//! Static checks over a loaded template
//!
//! None of these make a template unloadable. Out-of-range operands are
//! reported again at render time; this pass finds them ahead of a request.
//! Data operands are never checked here since the data slice is per call.

use std::collections::BTreeSet;
use std::fmt;

use crate::instruction::Instruction;
use crate::operand::ComponentId;
use crate::template::Template;

/// How serious a finding is
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// May be fine depending on how the component is reached
    Warning,
    /// Fails whenever the instruction executes
    Error,
}

/// A finding from [`Template::verify`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyIssue {
    /// `CopySnippet` operand past the end of the snippet table
    SnippetOutOfRange {
        /// Component holding the instruction
        component: ComponentId,
        /// Absolute instruction index
        pc: u32,
        /// Offending operand
        index: u32,
    },
    /// `PushComponent` names an undeclared component
    UnknownComponent {
        /// Component holding the instruction
        component: ComponentId,
        /// Absolute instruction index
        pc: u32,
        /// Offending operand
        target: u32,
    },
    /// `ExecComponent` with no earlier push in the same component; only an
    /// ancestor can have supplied the id
    ExecWithoutPush {
        /// Component holding the instruction
        component: ComponentId,
        /// Absolute instruction index
        pc: u32,
    },
}

impl VerifyIssue {
    /// Severity of the finding
    pub fn severity(&self) -> Severity {
        match self {
            Self::ExecWithoutPush { .. } => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

impl fmt::Display for VerifyIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SnippetOutOfRange {
                component,
                pc,
                index,
            } => write!(f, "component {component} pc {pc}: snippet {index} out of range"),
            Self::UnknownComponent {
                component,
                pc,
                target,
            } => write!(f, "component {component} pc {pc}: push of unknown component #{target}"),
            Self::ExecWithoutPush { component, pc } => write!(
                f,
                "component {component} pc {pc}: exec relies on a push from an enclosing component"
            ),
        }
    }
}

impl Template {
    /// Check static operands of every component
    pub fn verify(&self) -> Vec<VerifyIssue> {
        let mut issues = Vec::new();
        let snippet_count = self.snippets().len() as u64;
        let component_count = self.components().len() as u64;
        let slotted = self.slotted_components();

        for (component, range) in self.components().iter() {
            // Pushes made so far in this component and not yet consumed
            let mut pending: u32 = 0;
            let instructions = &self.instructions()[range.as_range()];

            for (offset, instruction) in instructions.iter().enumerate() {
                let pc = range.start + offset as u32;
                match instruction {
                    Instruction::CopySnippet { snippet } => {
                        if snippet.index() as u64 >= snippet_count {
                            issues.push(VerifyIssue::SnippetOutOfRange {
                                component,
                                pc,
                                index: snippet.index(),
                            });
                        }
                    }
                    Instruction::CopyData { .. } => {}
                    Instruction::PushComponent { component: target } => {
                        if target.index() as u64 >= component_count {
                            issues.push(VerifyIssue::UnknownComponent {
                                component,
                                pc,
                                target: target.index(),
                            });
                        }
                        pending += 1;
                    }
                    Instruction::ExecComponent => {
                        if pending == 0 {
                            if !slotted.contains(&component) {
                                issues.push(VerifyIssue::ExecWithoutPush { component, pc });
                            }
                        } else {
                            pending -= 1;
                        }
                    }
                }
            }
        }

        issues
    }

    /// Components executed while their caller still has pushes pending.
    ///
    /// These are layouts with a slot: the caller pushes the content first
    /// and the layout's own `ExecComponent` pops it.
    fn slotted_components(&self) -> BTreeSet<ComponentId> {
        let mut slotted = BTreeSet::new();
        for (_, range) in self.components().iter() {
            let mut stack = Vec::new();
            for instruction in &self.instructions()[range.as_range()] {
                match instruction {
                    Instruction::PushComponent { component } => stack.push(*component),
                    Instruction::ExecComponent => match stack.pop() {
                        Some(callee) if !stack.is_empty() => {
                            slotted.insert(callee);
                        }
                        _ => {}
                    },
                    _ => {}
                }
            }
        }
        slotted
    }
}
