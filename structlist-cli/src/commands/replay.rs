use crate::field::{FieldSpec, ScriptRecord, Target};
use crate::script::{self, Script};
use anyhow::{bail, Context, Result};
use colored::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::rc::Rc;
use structlist_core::Value;
use tracing::{info, warn};

/// Outcome of one replayed step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepOutcome {
    /// Position in the script
    pub index: usize,
    /// Rendered operation
    pub op: String,
    /// Return value on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// Error message on failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Front view after the step
    pub front: Vec<Value>,
    /// Typed mirror after the step (absent for a standalone list)
    pub back: Option<Vec<Value>>,
}

/// Full replay report, also the `--output` JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayReport {
    /// Declared list type
    pub field_type: String,
    /// Per-step outcomes
    pub steps: Vec<StepOutcome>,
    /// Final front view
    pub front: Vec<Value>,
    /// Final typed mirror
    pub back: Option<Vec<Value>>,
}

impl ReplayReport {
    /// Number of steps that returned an error
    pub fn failures(&self) -> usize {
        self.steps.iter().filter(|s| s.error.is_some()).count()
    }
}

/// Replay `script` against a fresh field described by `spec`
///
/// Stops at the first failing step unless `keep_going` is set.
pub fn run(script: &Script, spec: &FieldSpec, keep_going: bool) -> Result<ReplayReport> {
    let record = Rc::new(ScriptRecord);
    let mut target = Target::build(spec, &record, script.initial.clone())?;
    let mut steps = Vec::with_capacity(script.steps.len());

    for (index, step) in script.steps.iter().enumerate() {
        let outcome = step.apply(target.sequence_mut());
        let failed = outcome.is_err();
        let (result, error) = match outcome {
            Ok(value) => (Some(value), None),
            Err(e) => {
                warn!("Step {} ({}) failed: {}", index, step.describe(), e);
                (None, Some(e.to_string()))
            }
        };

        steps.push(StepOutcome {
            index,
            op: step.describe(),
            result,
            error,
            front: target.sequence().values().to_vec(),
            back: target.mirror(),
        });

        if failed && !keep_going {
            break;
        }
    }

    Ok(ReplayReport {
        field_type: target.describe(),
        steps,
        front: target.sequence().values().to_vec(),
        back: target.mirror(),
    })
}

fn render(values: &[Value]) -> String {
    Value::List(values.to_vec()).to_string()
}

pub fn execute(input: &str, spec: &FieldSpec, output: Option<&str>, keep_going: bool) -> Result<()> {
    info!("Replaying script: {}", input);

    let script = script::load(input)?;
    let report = run(&script, spec, keep_going)?;

    println!("\n=== Replay: {} ===", report.field_type);
    for step in &report.steps {
        match &step.error {
            None => println!("{} {:>3}  {}", "✓".green(), step.index, step.op),
            Some(e) => println!("{} {:>3}  {}  {}", "✗".red(), step.index, step.op, e.red()),
        }
        println!("       front: {}", render(&step.front));
        if let Some(back) = &step.back {
            println!("       back:  {}", render(back));
        }
    }

    if let Some(output_path) = output {
        let json = serde_json::to_string_pretty(&report)
            .with_context(|| "Failed to serialize replay report")?;
        fs::write(output_path, json)
            .with_context(|| format!("Failed to write output file: {}", output_path))?;
        info!("Replay report written to: {}", output_path);
    }

    let failures = report.failures();
    println!("\n=== Summary ===");
    println!("Steps replayed:     {}", report.steps.len());
    println!("Failed steps:       {}", failures);

    if failures > 0 && !keep_going {
        bail!("replay stopped at a failing step");
    }
    Ok(())
}
