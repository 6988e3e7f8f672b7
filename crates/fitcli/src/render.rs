use fitcore::{EvaluationResult, Role, Stage, SubmissionEvent};
use fitruntime::ControllerConfig;
use std::fmt::Write;

const BAR_WIDTH: usize = 20;

/// How well a role score reads in the report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Strong,
    Moderate,
    Weak,
}

impl Severity {
    pub fn from_score(score: u8) -> Self {
        if score >= 75 {
            Severity::Strong
        } else if score >= 50 {
            Severity::Moderate
        } else {
            Severity::Weak
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Severity::Strong => "strong",
            Severity::Moderate => "moderate",
            Severity::Weak => "weak",
        }
    }
}

pub fn score_bar(score: u8) -> String {
    let filled = (score.min(100) as usize * BAR_WIDTH + 50) / 100;
    format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
}

/// One line of progress output for an event, if it deserves one
pub fn progress_line(event: &SubmissionEvent) -> Option<String> {
    match event {
        SubmissionEvent::SubmissionStarted { .. } => Some("▶️  Generating report".to_string()),
        SubmissionEvent::StageEntered { stage, .. } => Some(format!(
            "  ⚡ [{}/{}] {}",
            stage.position(),
            Stage::ALL.len(),
            stage
        )),
        SubmissionEvent::SubmissionCompleted { duration_ms, .. } => {
            Some(format!("✨ Report ready in {}ms", duration_ms))
        }
        SubmissionEvent::SubmissionFailed { error, .. } => Some(format!(
            "💥 Something went wrong. Please try again. ({})",
            error
        )),
        SubmissionEvent::SubmissionDiscarded { .. } => Some("⏹  Submission cancelled".to_string()),
        SubmissionEvent::DocumentRequested { .. } => {
            Some("📄 No resume selected, choose a PDF to continue".to_string())
        }
    }
}

pub fn render_report(result: &EvaluationResult) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "📊 Role Clarity Report");
    let _ = writeln!(out);
    let best_fit = result
        .best_fit
        .as_deref()
        .or_else(|| result.best_role().map(|r| r.role.as_str()))
        .unwrap_or("-");
    let _ = writeln!(out, "   Best fit: {}", best_fit);
    let _ = writeln!(out);

    for role in &result.roles {
        render_role(&mut out, role);
    }

    let _ = writeln!(out, "📝 Summary");
    let _ = writeln!(out, "   {}", result.summary);
    out
}

fn render_role(out: &mut String, role: &Role) {
    let severity = Severity::from_score(role.score);
    let _ = writeln!(out, "  • {}", role.role);
    let _ = writeln!(
        out,
        "    {} {:>3}/100 ({})",
        score_bar(role.score),
        role.score,
        severity.label()
    );

    if !role.matched_skills.is_empty() {
        let skills: Vec<&str> = role.matched_skills.iter().map(String::as_str).collect();
        let _ = writeln!(out, "    ✅ Strengths: {}", skills.join(", "));
    }
    if !role.missing_skills.is_empty() {
        let skills: Vec<&str> = role.missing_skills.iter().map(String::as_str).collect();
        let _ = writeln!(out, "    ❌ Skill gaps: {}", skills.join(", "));
    }
    for (index, step) in role.improvement_steps.iter().enumerate() {
        let _ = writeln!(out, "    {}. {}", index + 1, step);
    }
    let _ = writeln!(out);
}

pub fn render_schedule(config: &ControllerConfig) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "⏱  Stage schedule");
    let _ = writeln!(out, "   {:>6}ms  {}", 0, Stage::Parsing);
    for step in config.schedule.steps() {
        let _ = writeln!(out, "   {:>6}ms  {}", step.offset_ms, step.stage);
    }
    let _ = writeln!(out, "   Minimum duration: {}ms", config.minimum_duration_ms);
    out
}
