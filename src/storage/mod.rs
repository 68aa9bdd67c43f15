use std::fs;
use std::path::Path;

use crate::error::HarnessError;
use crate::testing::RunReport;

pub fn save_report(path: &Path, report: &RunReport) -> Result<(), HarnessError> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| HarnessError::Io {
            path: parent.display().to_string(),
            source,
        })?;
    }

    let raw = serde_json::to_string_pretty(report)?;
    fs::write(path, raw).map_err(|source| HarnessError::Io {
        path: path.display().to_string(),
        source,
    })
}

pub fn render_json(report: &RunReport) -> Result<String, HarnessError> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Per-step pass/fail lines followed by a summary.
pub fn render_text(report: &RunReport) -> String {
    let mut lines = Vec::new();

    for step in &report.steps {
        let label = if step.passed() { "PASS" } else { "FAIL" };
        let target = match (&step.method, &step.path) {
            (Some(method), Some(path)) => format!(" ({method} {path})"),
            _ => String::new(),
        };
        lines.push(format!(
            "[{label}] {}. {}{target} {}ms",
            step.order, step.name, step.duration_ms
        ));

        for result in step.failed_assertions() {
            lines.push(format!("       {}", result.message));
        }
        if let Some(error) = &step.error {
            lines.push(format!("       {error}"));
        }
        if !step.passed()
            && let Some(body) = step.body.as_deref().filter(|body| !body.is_empty())
        {
            lines.push(format!("       body: {body}"));
        }
    }

    lines.push(String::new());
    lines.push(format!(
        "{} passed, {} failed, {} total ({}ms)",
        report.passed, report.failed, report.total, report.duration_ms
    ));
    lines.join("\n")
}
