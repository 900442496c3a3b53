// SPDX-FileCopyrightText: 2026 Apinox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::ids::{TestCaseId, TestStepId, TestSuiteId};
use super::request::Request;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestSuite {
    id: TestSuiteId,
    name: String,
    test_cases: Vec<TestCase>,
}

impl TestSuite {
    pub fn new(id: TestSuiteId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            test_cases: Vec::new(),
        }
    }

    pub fn id(&self) -> &TestSuiteId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn test_cases(&self) -> &[TestCase] {
        &self.test_cases
    }

    pub fn test_cases_mut(&mut self) -> &mut Vec<TestCase> {
        &mut self.test_cases
    }
}

/// An ordered sequence of test steps. Step order is load-bearing and must
/// survive every save/load cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCase {
    id: TestCaseId,
    name: String,
    steps: Vec<TestStep>,
}

impl TestCase {
    pub fn new(id: TestCaseId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            steps: Vec::new(),
        }
    }

    pub fn id(&self) -> &TestCaseId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn steps(&self) -> &[TestStep] {
        &self.steps
    }

    pub fn steps_mut(&mut self) -> &mut Vec<TestStep> {
        &mut self.steps
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestStep {
    id: TestStepId,
    name: String,
    config: StepConfig,
}

impl TestStep {
    pub fn new(id: TestStepId, name: impl Into<String>, config: StepConfig) -> Self {
        Self {
            id,
            name: name.into(),
            config,
        }
    }

    pub fn id(&self) -> &TestStepId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn config(&self) -> &StepConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut StepConfig {
        &mut self.config
    }
}

/// Variant payload of a test step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepConfig {
    /// Executes an embedded copy of a request (not a reference into the
    /// project tree).
    Request { request: Request },
    /// Runs user-authored script source.
    Script {
        script_name: Option<String>,
        source: String,
    },
    /// Pauses the run for a fixed duration.
    Delay { millis: u64 },
}

impl StepConfig {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Request { .. } => "request",
            Self::Script { .. } => "script",
            Self::Delay { .. } => "delay",
        }
    }
}
