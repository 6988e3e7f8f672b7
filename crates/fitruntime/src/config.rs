use fitcore::{FitError, Stage};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Upper bound on buffered progress events per subscriber
pub const MAX_EVENT_BUFFER: usize = 65_536;

/// A single scheduled transition, relative to the submission start
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageStep {
    pub offset_ms: u64,
    pub stage: Stage,
}

impl StageStep {
    pub fn new(offset_ms: u64, stage: Stage) -> Self {
        Self { offset_ms, stage }
    }

    pub fn offset(&self) -> Duration {
        Duration::from_millis(self.offset_ms)
    }
}

/// Table of delayed stage transitions.
///
/// `Stage::Parsing` is always entered at start, so it never appears here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StageSchedule {
    steps: Vec<StageStep>,
}

impl StageSchedule {
    pub fn new(steps: Vec<StageStep>) -> fitcore::Result<Self> {
        let schedule = Self { steps };
        schedule.validate()?;
        Ok(schedule)
    }

    pub fn steps(&self) -> &[StageStep] {
        &self.steps
    }

    /// Every stage after `Parsing` appears exactly once, in order, at strictly increasing offsets.
    pub fn validate(&self) -> fitcore::Result<()> {
        let mut previous = StageStep::new(0, Stage::Parsing);
        for (index, step) in self.steps.iter().enumerate() {
            let expected = previous.stage.next();
            if Some(step.stage) != expected {
                return Err(FitError::Config(format!(
                    "Schedule step {} targets {:?}, expected {:?} after {:?}",
                    index, step.stage, expected, previous.stage
                )));
            }
            if index > 0 && step.offset_ms <= previous.offset_ms {
                return Err(FitError::Config(format!(
                    "Schedule step {} fires at {}ms, not after the previous step at {}ms",
                    index, step.offset_ms, previous.offset_ms
                )));
            }
            previous = *step;
        }

        if previous.stage.next().is_some() {
            return Err(FitError::Config(format!(
                "Schedule ends at {:?}, never reaching {:?}",
                previous.stage,
                Stage::BuildingScorecards
            )));
        }
        Ok(())
    }
}

impl Default for StageSchedule {
    fn default() -> Self {
        Self {
            steps: vec![
                StageStep::new(1000, Stage::ExtractingSkills),
                StageStep::new(2500, Stage::Evaluating),
                StageStep::new(4500, Stage::BuildingScorecards),
            ],
        }
    }
}

/// Configuration for the submission controller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    pub schedule: StageSchedule,
    /// Completion is never reported earlier than this after the submission starts
    pub minimum_duration_ms: u64,
    pub event_buffer_size: usize,
}

impl ControllerConfig {
    pub fn minimum_duration(&self) -> Duration {
        Duration::from_millis(self.minimum_duration_ms)
    }

    pub fn validate(&self) -> fitcore::Result<()> {
        self.schedule.validate()?;
        if self.event_buffer_size == 0 || self.event_buffer_size > MAX_EVENT_BUFFER {
            return Err(FitError::Config(format!(
                "event_buffer_size must be between 1 and {}, got {}",
                MAX_EVENT_BUFFER, self.event_buffer_size
            )));
        }
        Ok(())
    }

    /// Buffer size actually handed to the event bus
    pub fn effective_event_buffer(&self) -> usize {
        self.event_buffer_size.clamp(1, MAX_EVENT_BUFFER)
    }

    pub fn from_json_str(json: &str) -> fitcore::Result<Self> {
        let config: ControllerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load overrides from a JSON file; omitted fields keep their defaults
    pub fn from_file(path: impl AsRef<Path>) -> fitcore::Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            schedule: StageSchedule::default(),
            minimum_duration_ms: 3000,
            event_buffer_size: 1000,
        }
    }
}
