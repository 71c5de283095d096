use crate::config::{default_max_refuse, DrawConfig, DEFAULT_DICE_FACES};
use crate::core::ConfigProvider;
use crate::domain::model::{PresentationPolicy, SubjectId, TeamId};
use crate::utils::error::{DrawError, Result};
use crate::utils::validation::{
    validate_format, validate_range, validate_required_field, validate_unique, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub draw: DrawSection,
    pub teams: TeamsSection,
    pub simulation: Option<SimulationConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrawSection {
    pub subjects: Option<Vec<SubjectId>>,
    pub subjects_file: Option<String>, // 一行一題
    pub format: Vec<usize>,
    pub max_refuse: Option<usize>,
    pub dice_faces: Option<u32>,
    pub presentation: Option<PresentationPolicy>,
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamsSection {
    pub roster: Vec<TeamId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub accept_rate: Option<f64>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入設定，subjects_file 以設定檔所在目錄為基準
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(DrawError::IoError)?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        Self::parse(&content, base_dir)
    }

    /// 從 TOML 字串解析設定，subjects_file 以目前目錄為基準
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Self::parse(content, Path::new("."))
    }

    fn parse(content: &str, base_dir: &Path) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        let mut config: TomlConfig = toml::from_str(&processed_content)?;

        if config.draw.subjects.is_none() {
            if let Some(file) = &config.draw.subjects_file {
                config.draw.subjects = Some(load_subjects(base_dir.join(file))?);
            }
        }

        Ok(config)
    }

    /// 替換環境變數 (例如 ${DRAW_SEED})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| DrawError::ConfigValidationError {
            field: "env_substitution".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn roster(&self) -> &[TeamId] {
        &self.teams.roster
    }

    pub fn accept_rate(&self) -> f64 {
        self.simulation
            .as_ref()
            .and_then(|s| s.accept_rate)
            .unwrap_or(0.5)
    }

    pub fn to_draw_config(&self) -> Result<DrawConfig> {
        validate_required_field("draw.subjects", &self.draw.subjects)?;
        Ok(DrawConfig::from_provider(self))
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_required_field("draw.subjects", &self.draw.subjects)?;
        validate_unique("teams.roster", &self.teams.roster)?;
        validate_format("draw.format", &self.draw.format, self.teams.roster.len())?;
        validate_range("simulation.accept_rate", self.accept_rate(), 0.0, 1.0)?;

        DrawConfig::from_provider(self).validate()
    }
}

impl ConfigProvider for TomlConfig {
    fn subjects(&self) -> &[SubjectId] {
        self.draw.subjects.as_deref().unwrap_or(&[])
    }

    fn max_refuse(&self) -> usize {
        self.draw
            .max_refuse
            .unwrap_or_else(|| default_max_refuse(self.subjects().len()))
    }

    fn format(&self) -> &[usize] {
        &self.draw.format
    }

    fn dice_faces(&self) -> u32 {
        self.draw.dice_faces.unwrap_or(DEFAULT_DICE_FACES)
    }

    fn presentation(&self) -> PresentationPolicy {
        self.draw.presentation.unwrap_or_default()
    }

    fn seed(&self) -> Option<u64> {
        self.draw.seed
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

/// Reads a subject catalog, one subject per non-empty line.
pub fn load_subjects<P: AsRef<Path>>(path: P) -> Result<Vec<SubjectId>> {
    let content = std::fs::read_to_string(path.as_ref())?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(SubjectId::from)
        .collect())
}
