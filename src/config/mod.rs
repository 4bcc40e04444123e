pub mod cli;
pub mod toml_config;

use crate::core::ConfigProvider;
use crate::domain::model::{AtlasDefaults, Dialect, ParseMode};
use crate::utils::error::{AtlasError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_positive_number, validate_range, Validate,
};

/// 一次轉換使用的完整設定
#[derive(Debug, Clone)]
pub struct ConversionConfig {
    pub input_path: String,
    pub output_dir: Option<String>,
    pub dialects: Vec<Dialect>,
    pub parse_mode: ParseMode,
    pub defaults: AtlasDefaults,
}

impl ConversionConfig {
    /// 預設輸出全部 dialect，auto 解析，檔案寫在輸入檔旁邊
    pub fn new(input_path: impl Into<String>) -> Self {
        Self {
            input_path: input_path.into(),
            output_dir: None,
            dialects: Dialect::ALL.to_vec(),
            parse_mode: ParseMode::default(),
            defaults: AtlasDefaults::default(),
        }
    }
}

impl ConfigProvider for ConversionConfig {
    fn input_path(&self) -> &str {
        &self.input_path
    }

    fn output_dir(&self) -> Option<&str> {
        self.output_dir.as_deref()
    }

    fn dialects(&self) -> &[Dialect] {
        &self.dialects
    }

    fn parse_mode(&self) -> ParseMode {
        self.parse_mode
    }

    fn defaults(&self) -> &AtlasDefaults {
        &self.defaults
    }
}

impl Validate for ConversionConfig {
    fn validate(&self) -> Result<()> {
        validate_path("input", &self.input_path)?;
        if let Some(dir) = &self.output_dir {
            validate_path("output_dir", dir)?;
        }

        if self.dialects.is_empty() {
            return Err(AtlasError::ConfigValidationError {
                field: "dialects".to_string(),
                message: "at least one output dialect is required".to_string(),
            });
        }

        validate_positive_number("defaults.width", self.defaults.size.w, 1)?;
        validate_positive_number("defaults.height", self.defaults.size.h, 1)?;
        validate_non_empty_string("defaults.version", &self.defaults.version)?;
        validate_non_empty_string("defaults.texture_file_name", &self.defaults.texture_file_name)?;
        validate_range("defaults.scale", self.defaults.scale, 0.01, 64.0)?;
        Ok(())
    }
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, clap::Parser)]
#[command(name = "plist-atlas")]
#[command(about = "Convert texture-packer plist atlases into engine sprite-sheet JSON")]
pub struct CliConfig {
    #[arg(help = "Path to the .plist file")]
    pub input: String,

    #[arg(long, value_enum, value_delimiter = ',', help = "Output dialects (default: all)")]
    pub dialect: Vec<Dialect>,

    #[arg(long, value_enum, help = "Plist parsing strategy (default: auto)")]
    pub parse_mode: Option<ParseMode>,

    #[arg(long, help = "Write JSON here instead of beside the input")]
    pub output_dir: Option<String>,

    #[arg(long, help = "TOML configuration file")]
    pub config: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// TOML 設定檔先套用，命令列參數優先
    pub fn resolve(&self) -> Result<ConversionConfig> {
        let mut config = ConversionConfig::new(self.input.clone());

        if let Some(path) = &self.config {
            let file = toml_config::TomlConfig::from_file(path)?;
            file.validate()?;
            file.apply_to(&mut config);
        }

        if !self.dialect.is_empty() {
            config.dialects = self.dialect.clone();
        }
        if let Some(mode) = self.parse_mode {
            config.parse_mode = mode;
        }
        if let Some(dir) = &self.output_dir {
            config.output_dir = Some(dir.clone());
        }
        Ok(config)
    }
}
