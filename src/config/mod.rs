#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::core::ConfigProvider;
use crate::domain::model::{PresentationPolicy, SubjectId, MAX_POOLS_PER_ROUND};
use crate::utils::error::{DrawError, Result};
use crate::utils::validation::{
    validate_non_empty, validate_non_empty_string, validate_range, validate_unique, Validate,
};
use serde::{Deserialize, Serialize};

pub const DEFAULT_DICE_FACES: u32 = 100;

/// Number of subjects that never count towards the free refusals.
const NON_REFUSABLE_SUBJECTS: usize = 5;

fn default_dice_faces() -> u32 {
    DEFAULT_DICE_FACES
}

/// 未設定時，免罰拒絕次數 = 題目數 - 5
pub fn default_max_refuse(subject_count: usize) -> usize {
    subject_count.saturating_sub(NON_REFUSABLE_SUBJECTS)
}

/// 引擎使用的抽籤設定
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrawConfig {
    pub subjects: Vec<SubjectId>,
    pub format: Vec<usize>,
    #[serde(default)]
    pub max_refuse: Option<usize>,
    #[serde(default = "default_dice_faces")]
    pub dice_faces: u32,
    #[serde(default)]
    pub presentation: PresentationPolicy,
    #[serde(default)]
    pub seed: Option<u64>,
}

impl DrawConfig {
    pub fn new(subjects: Vec<SubjectId>, format: Vec<usize>) -> Self {
        Self {
            subjects,
            format,
            max_refuse: None,
            dice_faces: DEFAULT_DICE_FACES,
            presentation: PresentationPolicy::default(),
            seed: None,
        }
    }

    pub fn with_max_refuse(mut self, max_refuse: usize) -> Self {
        self.max_refuse = Some(max_refuse);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_presentation(mut self, presentation: PresentationPolicy) -> Self {
        self.presentation = presentation;
        self
    }

    pub fn max_refuse(&self) -> usize {
        self.max_refuse
            .unwrap_or_else(|| default_max_refuse(self.subjects.len()))
    }

    pub fn from_provider<C: ConfigProvider>(provider: &C) -> Self {
        Self {
            subjects: provider.subjects().to_vec(),
            format: provider.format().to_vec(),
            max_refuse: Some(provider.max_refuse()),
            dice_faces: provider.dice_faces(),
            presentation: provider.presentation(),
            seed: provider.seed(),
        }
    }
}

impl ConfigProvider for DrawConfig {
    fn subjects(&self) -> &[SubjectId] {
        &self.subjects
    }

    fn max_refuse(&self) -> usize {
        self.max_refuse()
    }

    fn format(&self) -> &[usize] {
        &self.format
    }

    fn dice_faces(&self) -> u32 {
        self.dice_faces
    }

    fn presentation(&self) -> PresentationPolicy {
        self.presentation
    }

    fn seed(&self) -> Option<u64> {
        self.seed
    }
}

impl Validate for DrawConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty("draw.subjects", &self.subjects)?;
        for subject in &self.subjects {
            validate_non_empty_string("draw.subjects", subject.as_str())?;
        }
        validate_unique("draw.subjects", &self.subjects)?;

        validate_non_empty("draw.format", &self.format)?;
        validate_range("draw.format", self.format.len(), 1, MAX_POOLS_PER_ROUND)?;
        for &size in &self.format {
            validate_range("draw.format", size, 3, 5)?;
        }

        validate_range("draw.dice_faces", self.dice_faces, 2, u32::MAX)?;

        // 每隊至少要有一題可抽
        let largest_pool = self.format.iter().copied().max().unwrap_or(0);
        if self.subjects.len() <= largest_pool {
            return Err(DrawError::ConfigValidationError {
                field: "draw.subjects".to_string(),
                message: format!(
                    "{} subjects cannot serve a pool of {} teams over two rounds",
                    self.subjects.len(),
                    largest_pool
                ),
            });
        }

        Ok(())
    }
}
