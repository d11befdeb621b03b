//! Scan script replay.
//!
//! A script is one step per line:
//!
//! ```text
//! # comment
//! qr QR123            raw read (any code kind or reader type)
//! ean-13 890123456789
//! manual Manual123    manual entry
//! wait 600            pause for 600ms
//! reset               re-enter the capture view
//! ```

use std::fmt;
use std::time::Duration;

use crate::domain::{CodeKind, RawScanEvent};
use crate::error::{Result, ScanlogError};
use crate::pipeline::{ScanOutcome, ScanPipeline};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptStep {
    Scan { kind: CodeKind, value: String },
    Manual(String),
    Wait(Duration),
    Reset,
}

impl fmt::Display for ScriptStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScriptStep::Scan { kind, value } => write!(f, "{} {}", kind, value),
            ScriptStep::Manual(code) => write!(f, "manual {}", code),
            ScriptStep::Wait(duration) => write!(f, "wait {}", duration.as_millis()),
            ScriptStep::Reset => f.write_str("reset"),
        }
    }
}

/// A parsed step and the script line it came from (1-based).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptLine {
    pub line: usize,
    pub step: ScriptStep,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Scan(ScanOutcome),
    /// The step was rejected with a recoverable error (e.g. empty manual
    /// code, classification unavailable)
    Rejected(String),
    Waited(Duration),
    Reset,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepReport {
    pub line: usize,
    pub step: ScriptStep,
    pub outcome: StepOutcome,
}

/// Parse a whole script. Blank lines and `#` comments are skipped.
pub fn parse_script(text: &str) -> Result<Vec<ScriptLine>> {
    let mut lines = Vec::new();
    for (idx, raw) in text.lines().enumerate() {
        let line = idx + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let step = parse_step(trimmed)
            .map_err(|e| ScanlogError::InvalidInput(format!("line {}: {}", line, e)))?;
        lines.push(ScriptLine { line, step });
    }
    Ok(lines)
}

fn parse_step(line: &str) -> Result<ScriptStep> {
    let (command, rest) = match line.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    };

    match command.to_ascii_lowercase().as_str() {
        "reset" => Ok(ScriptStep::Reset),
        "wait" => {
            let ms = rest
                .parse::<u64>()
                .map_err(|e| ScanlogError::InvalidInput(format!("bad wait {:?}: {}", rest, e)))?;
            Ok(ScriptStep::Wait(Duration::from_millis(ms)))
        }
        "manual" => Ok(ScriptStep::Manual(rest.to_string())),
        _ => {
            let kind = command.parse::<CodeKind>()?;
            Ok(ScriptStep::Scan {
                kind,
                value: rest.to_string(),
            })
        }
    }
}

/// Drive a pipeline through a parsed script.
///
/// Validation and classification failures are reported per step; storage
/// failures abort the run.
pub async fn run_script(pipeline: &ScanPipeline, script: &[ScriptLine]) -> Result<Vec<StepReport>> {
    let mut reports = Vec::with_capacity(script.len());

    for ScriptLine { line, step } in script {
        let outcome = match step {
            ScriptStep::Scan { kind, value } => {
                let event = RawScanEvent::new(value.clone(), *kind);
                settle_errors(pipeline.on_raw_scan(event).await)?
            }
            ScriptStep::Manual(code) => settle_errors(pipeline.submit_manual(code).await)?,
            ScriptStep::Wait(duration) => {
                tokio::time::sleep(*duration).await;
                StepOutcome::Waited(*duration)
            }
            ScriptStep::Reset => {
                pipeline.reset_capture()?;
                StepOutcome::Reset
            }
        };

        tracing::debug!(line, outcome = ?outcome, "Script step");
        reports.push(StepReport {
            line: *line,
            step: step.clone(),
            outcome,
        });
    }

    Ok(reports)
}

fn settle_errors(result: Result<ScanOutcome>) -> Result<StepOutcome> {
    match result {
        Ok(outcome) => Ok(StepOutcome::Scan(outcome)),
        Err(e @ (ScanlogError::Validation(_) | ScanlogError::ClassificationUnavailable(_))) => {
            Ok(StepOutcome::Rejected(e.to_string()))
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::CaptureSettings;
    use crate::classify::StaticDecider;
    use crate::domain::DiscardReason;
    use crate::pipeline::PipelineSettings;
    use std::sync::Arc;

    const SCRIPT: &str = "\
# morning round
qr QR123
qr QR123
wait 600
qr QR123
ean-13 890123456789

manual Manual123
reset
qr QR123
";

    #[test]
    fn test_parse_script() {
        let script = parse_script(SCRIPT).unwrap();
        assert_eq!(script.len(), 8);
        assert_eq!(script[0].line, 2);
        assert_eq!(
            script[0].step,
            ScriptStep::Scan {
                kind: CodeKind::OpticalQr,
                value: "QR123".to_string()
            }
        );
        assert_eq!(script[2].step, ScriptStep::Wait(Duration::from_millis(600)));
        assert_eq!(
            script[4].step,
            ScriptStep::Scan {
                kind: CodeKind::OpticalLinear,
                value: "890123456789".to_string()
            }
        );
        assert_eq!(script[5].step, ScriptStep::Manual("Manual123".to_string()));
        assert_eq!(script[6].step, ScriptStep::Reset);
    }

    #[test]
    fn test_step_display_reparses() {
        let script = parse_script(SCRIPT).unwrap();
        let text: Vec<String> = script.iter().map(|l| l.step.to_string()).collect();
        let again = parse_script(&text.join("\n")).unwrap();
        let steps: Vec<_> = again.into_iter().map(|l| l.step).collect();
        let original: Vec<_> = script.into_iter().map(|l| l.step).collect();
        assert_eq!(steps, original);
    }

    #[test]
    fn test_parse_blank_scan_value() {
        let script = parse_script("qr").unwrap();
        assert_eq!(
            script[0].step,
            ScriptStep::Scan {
                kind: CodeKind::OpticalQr,
                value: String::new()
            }
        );
    }

    #[test]
    fn test_parse_errors_carry_line_number() {
        let err = parse_script("qr A\nwait soon\n").unwrap_err();
        assert!(err.to_string().contains("line 2"));

        let err = parse_script("\n\npdf417 XYZ").unwrap_err();
        assert!(err.to_string().contains("line 3"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_script() {
        let pipeline = ScanPipeline::new(
            Arc::new(StaticDecider::accept_all()),
            PipelineSettings {
                capture: CaptureSettings {
                    settle_delay: Duration::from_millis(500),
                },
                ..PipelineSettings::default()
            },
        );
        let script = parse_script(SCRIPT).unwrap();
        let reports = run_script(&pipeline, &script).await.unwrap();

        let outcomes: Vec<_> = reports.iter().map(|r| r.outcome.clone()).collect();
        assert!(matches!(&outcomes[0], StepOutcome::Scan(o) if o.is_logged()));
        assert_eq!(
            outcomes[1],
            StepOutcome::Scan(ScanOutcome::Discarded(DiscardReason::Busy))
        );
        assert_eq!(
            outcomes[3],
            StepOutcome::Scan(ScanOutcome::Discarded(DiscardReason::Duplicate))
        );
        assert!(matches!(&outcomes[4], StepOutcome::Scan(o) if o.is_logged()));
        // Still processing the barcode, but manual entry is not debounced
        assert!(matches!(&outcomes[5], StepOutcome::Scan(o) if o.is_logged()));
        assert_eq!(outcomes[6], StepOutcome::Reset);
        assert!(matches!(&outcomes[7], StepOutcome::Scan(o) if o.is_logged()));

        assert_eq!(pipeline.snapshot().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_run_script_reports_rejected_manual() {
        let pipeline = ScanPipeline::new(Arc::new(StaticDecider::accept_all()), PipelineSettings::default());
        let script = parse_script("manual").unwrap();
        let reports = run_script(&pipeline, &script).await.unwrap();
        assert!(matches!(reports[0].outcome, StepOutcome::Rejected(_)));
    }
}
