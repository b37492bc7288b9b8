use crate::field::{FieldSpec, ScriptRecord, Target};
use crate::script::{self, Script};
use anyhow::{bail, Result};
use colored::*;
use serde::{Deserialize, Serialize};
use std::rc::Rc;
use structlist_core::Value;
use tracing::{debug, info, warn};

/// A broken guarantee found during verification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Violation {
    /// The typed mirror no longer matches the front view
    OutOfSync {
        /// Step after which the mismatch was seen
        step: usize,
    },
    /// A failed step changed one of the views
    PartialMutation {
        /// The failing step
        step: usize,
        /// The error it reported
        error: String,
    },
}

/// Result of verifying a script
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VerifyReport {
    /// Steps executed
    pub steps: usize,
    /// Steps that returned an error
    pub rejected: usize,
    /// Guarantees that did not hold
    pub violations: Vec<Violation>,
}

impl VerifyReport {
    /// True if nothing was violated
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }
}

type Views = (Vec<Value>, Option<Vec<Value>>);

fn views(target: &Target) -> Views {
    (target.sequence().values().to_vec(), target.mirror())
}

fn identical(a: &[Value], b: &[Value]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.is_identical(y))
}

fn unchanged(before: &Views, after: &Views) -> bool {
    let mirrors = match (&before.1, &after.1) {
        (Some(x), Some(y)) => identical(x, y),
        (None, None) => true,
        _ => false,
    };
    identical(&before.0, &after.0) && mirrors
}

/// Replay every step, checking after each one that the views agree and that
/// failed steps left both views untouched
pub fn check(script: &Script, spec: &FieldSpec) -> Result<VerifyReport> {
    let record = Rc::new(ScriptRecord);
    let mut target = Target::build(spec, &record, script.initial.clone())?;
    let mut report = VerifyReport::default();

    for (index, step) in script.steps.iter().enumerate() {
        let before = views(&target);
        let outcome = step.apply(target.sequence_mut());
        report.steps += 1;

        if let Err(e) = outcome {
            debug!("Step {} ({}) rejected: {}", index, step.describe(), e);
            report.rejected += 1;
            if !unchanged(&before, &views(&target)) {
                warn!("Step {} failed but changed the list", index);
                report.violations.push(Violation::PartialMutation {
                    step: index,
                    error: e.to_string(),
                });
            }
        }

        if !target.is_synchronized() {
            warn!("Typed mirror out of sync after step {}", index);
            report.violations.push(Violation::OutOfSync { step: index });
        }
    }

    Ok(report)
}

pub fn execute(input: &str, spec: &FieldSpec) -> Result<()> {
    info!("Verifying script: {}", input);

    let script = script::load(input)?;
    let report = check(&script, spec)?;

    println!("\n=== Verification Results ===");
    println!("Steps executed:     {}", report.steps);
    println!("Rejected steps:     {}", report.rejected);

    if report.is_clean() {
        println!("{} Views stayed synchronized through every step", "✓".green());
        return Ok(());
    }

    println!(
        "{} {} violations found",
        "✗".red(),
        report.violations.len().to_string().red()
    );
    for violation in &report.violations {
        match violation {
            Violation::OutOfSync { step } => println!("  step {}: typed mirror out of sync", step),
            Violation::PartialMutation { step, error } => {
                println!("  step {}: failed ({}) but mutated the list", step, error)
            }
        }
    }
    bail!("{} violations found", report.violations.len())
}
