//! Read access to the sleep-training feature's stored program and assessment.
//!
//! Unlike the other repositories these reads surface parse failures, so the
//! chat context assembler can decide how to fail soft.

use anyhow::Result;
use shared::{SleepAssessment, SleepTrainingProgram};

use crate::storage::scoped::ScopedStore;

pub const SLEEP_TRAINING_PROGRAM_KEY: &str = "sleep_training_program";
pub const SLEEP_ASSESSMENT_KEY: &str = "sleep_assessment";

#[derive(Clone)]
pub struct SleepTrainingRepository {
    store: ScopedStore,
}

impl SleepTrainingRepository {
    pub fn new(store: ScopedStore) -> Self {
        Self { store }
    }

    pub fn load_program(&self) -> Result<Option<SleepTrainingProgram>> {
        self.store.read_json(SLEEP_TRAINING_PROGRAM_KEY)
    }

    pub fn load_assessment(&self) -> Result<Option<SleepAssessment>> {
        self.store.read_json(SLEEP_ASSESSMENT_KEY)
    }

    pub fn save_program(&self, program: &SleepTrainingProgram) -> Result<()> {
        self.store.write_json(SLEEP_TRAINING_PROGRAM_KEY, program)
    }

    pub fn save_assessment(&self, assessment: &SleepAssessment) -> Result<()> {
        self.store.write_json(SLEEP_ASSESSMENT_KEY, assessment)
    }
}
