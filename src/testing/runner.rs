use std::time::Instant;

use serde::Serialize;
use tracing::{info, warn};

use super::steps::{RunContext, Step};
use super::AssertionResult;
use crate::auth::bootstrap;
use crate::environment::HarnessConfig;
use crate::error::HarnessError;
use crate::http::client::Session;

const REPORT_BODY_CHARS: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepOutcome {
    Passed,
    Failed,
}

/// Outcome of one step, including what the server actually returned.
#[derive(Debug, Clone, Serialize)]
pub struct StepReport {
    pub order: usize,
    pub step: Step,
    pub name: &'static str,
    pub method: Option<String>,
    pub path: Option<String>,
    pub outcome: StepOutcome,
    pub status: Option<u16>,
    pub body: Option<String>,
    pub assertions: Vec<AssertionResult>,
    pub error: Option<String>,
    pub duration_ms: u128,
}

impl StepReport {
    pub fn passed(&self) -> bool {
        self.outcome == StepOutcome::Passed
    }

    pub fn failed_assertions(&self) -> impl Iterator<Item = &AssertionResult> {
        self.assertions.iter().filter(|result| !result.passed)
    }
}

/// Summary report for a suite run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub duration_ms: u128,
    pub steps: Vec<StepReport>,
}

impl RunReport {
    pub fn success(&self) -> bool {
        self.failed == 0
    }

    fn push(&mut self, step: StepReport) {
        self.total += 1;
        if step.passed() {
            self.passed += 1;
        } else {
            self.failed += 1;
        }
        self.steps.push(step);
    }
}

/// Executes steps one after another against a single session.
pub struct Runner<'a> {
    session: &'a Session,
}

impl<'a> Runner<'a> {
    pub fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// Run every step of `plan` in order. A failed step is reported and the
    /// run continues with the next one; nothing is retried.
    pub async fn run(&self, plan: &[Step], ctx: &mut RunContext) -> RunReport {
        let started = Instant::now();
        let mut report = RunReport::default();

        for (index, step) in plan.iter().copied().enumerate() {
            let step_report = self.run_step(index + 1, step, ctx).await;
            report.push(step_report);
        }

        report.duration_ms = started.elapsed().as_millis();
        info!(
            total = report.total,
            passed = report.passed,
            failed = report.failed,
            duration_ms = report.duration_ms as u64,
            "suite finished"
        );
        report
    }

    async fn run_step(&self, order: usize, step: Step, ctx: &mut RunContext) -> StepReport {
        info!(order, step = step.name(), "running step");
        let started = Instant::now();
        let mut report = StepReport {
            order,
            step,
            name: step.name(),
            method: None,
            path: None,
            outcome: StepOutcome::Failed,
            status: None,
            body: None,
            assertions: Vec::new(),
            error: None,
            duration_ms: 0,
        };

        let request = match step.request(ctx) {
            Ok(request) => request,
            Err(err) => return finish_failed(report, err, started),
        };
        report.method = Some(request.method.to_string());
        report.path = Some(request.path.clone());

        let response = match self.session.execute(&request).await {
            Ok(response) => response,
            Err(err) => return finish_failed(report, err, started),
        };

        report.status = Some(response.status);
        report.body = Some(response.body_excerpt(REPORT_BODY_CHARS));
        report.assertions = step
            .assertions()
            .iter()
            .map(|assertion| assertion.evaluate(&response))
            .collect();
        step.capture(ctx, &response);

        if report.assertions.iter().all(|result| result.passed) {
            report.outcome = StepOutcome::Passed;
            info!(order, step = step.name(), status = response.status, "step passed");
        } else {
            for result in report.failed_assertions() {
                warn!(order, step = step.name(), "{}", result.message);
            }
        }

        report.duration_ms = started.elapsed().as_millis();
        report
    }
}

fn finish_failed(mut report: StepReport, err: HarnessError, started: Instant) -> StepReport {
    warn!(order = report.order, step = report.name, error = %err, "step failed");
    report.error = Some(err.to_string());
    report.outcome = StepOutcome::Failed;
    report.duration_ms = started.elapsed().as_millis();
    report
}

/// Authenticate once, run the configured plan, then release the session.
///
/// Bootstrap failures abort before any step runs.
pub async fn run_suite(config: &HarnessConfig) -> Result<RunReport, HarnessError> {
    let session = bootstrap(config).await?;
    info!(base_url = %session.base_url(), "session ready");

    let plan = Step::plan(config.extended);
    let mut ctx = RunContext::new().with_missing_idea_id(config.missing_idea_id.clone());
    let report = Runner::new(&session).run(&plan, &mut ctx).await;

    drop(session);
    Ok(report)
}
