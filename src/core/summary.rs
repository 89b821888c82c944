//! Run summary: counts, success rate and the printed table

use crate::checks::{CheckResult, Criticality};
use crate::ui::{Painter, Status};
use serde::Serialize;

/// Width the check name is padded to in the summary table
const NAME_WIDTH: usize = 25;

/// Aggregate of one validation run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
  pub total: usize,
  pub passed_count: usize,
  pub failed_count: usize,
  /// passed / total as a percentage; 0.0 when nothing ran
  pub success_rate: f64,
  /// At least one result and no failures
  pub overall_success: bool,
}

impl RunSummary {
  /// Pure function of the result sequence
  pub fn compute(results: &[CheckResult]) -> Self {
    let total = results.len();
    let passed_count = results.iter().filter(|r| r.passed).count();
    let failed_count = total - passed_count;
    let success_rate = if total == 0 {
      0.0
    } else {
      passed_count as f64 / total as f64 * 100.0
    };

    Self {
      total,
      passed_count,
      failed_count,
      success_rate,
      overall_success: total > 0 && failed_count == 0,
    }
  }

  /// Summary over critical results only
  pub fn compute_critical(results: &[CheckResult]) -> Self {
    let critical: Vec<CheckResult> = results
      .iter()
      .filter(|r| r.criticality == Criticality::Critical)
      .cloned()
      .collect();
    Self::compute(&critical)
  }

  /// Summary table listing every result, followed by the totals of `self`
  pub fn render(&self, results: &[CheckResult], painter: Painter) -> String {
    let mut lines = vec![painter.banner("VALIDATION SUMMARY"), String::new()];

    for result in results {
      let (status, tag) = if result.passed {
        (Status::Pass, "PASSED")
      } else {
        (Status::Fail, "FAILED")
      };
      lines.push(painter.line(status, &format!("{:<width$} {}", result.name, tag, width = NAME_WIDTH)));
    }

    if self.total == 0 {
      lines.push(painter.line(Status::Warn, "No validations were run"));
      return lines.join("\n");
    }

    lines.push(String::new());
    lines.push(painter.bold(&format!(
      "{} Success Rate: {:.1}% ({}/{})",
      Status::Progress.marker(),
      self.success_rate,
      self.passed_count,
      self.total
    )));

    if self.overall_success {
      lines.push(painter.line(Status::Pass, "All validations passed!"));
    } else {
      lines.push(painter.line(Status::Fail, &format!("{} validation(s) failed", self.failed_count)));
    }

    lines.join("\n")
  }
}

/// Compute the summary of `results` and print its table
pub fn summarize(results: &[CheckResult], painter: Painter) -> RunSummary {
  let summary = RunSummary::compute(results);
  println!("{}", summary.render(results, painter));
  summary
}
