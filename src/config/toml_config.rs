use crate::config::ConversionConfig;
use crate::domain::model::{Dialect, ParseMode};
use crate::utils::error::{AtlasError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_positive_number, validate_range, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    pub defaults: Option<DefaultsConfig>,
    pub output: Option<OutputConfig>,
    pub parse: Option<ParseConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DefaultsConfig {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub version: Option<String>,
    pub texture_file_name: Option<String>,
    pub scale: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    pub dialects: Option<Vec<Dialect>>,
    pub directory: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParseConfig {
    pub mode: Option<ParseMode>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(|e| AtlasError::ConfigError {
            message: format!(
                "cannot read config file {}: {}",
                path.as_ref().display(),
                e
            ),
        })?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| AtlasError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${ATLAS_OUT})，未設定的變數保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = regex::Regex::new(r"\$\{([^}]+)\}").map_err(|e| AtlasError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 把設定檔中有填的值覆蓋到 `config`
    pub fn apply_to(&self, config: &mut ConversionConfig) {
        if let Some(defaults) = &self.defaults {
            if let Some(width) = defaults.width {
                config.defaults.size.w = width;
            }
            if let Some(height) = defaults.height {
                config.defaults.size.h = height;
            }
            if let Some(version) = &defaults.version {
                config.defaults.version = version.clone();
            }
            if let Some(name) = &defaults.texture_file_name {
                config.defaults.texture_file_name = name.clone();
            }
            if let Some(scale) = defaults.scale {
                config.defaults.scale = scale;
            }
        }

        if let Some(output) = &self.output {
            if let Some(dialects) = &output.dialects {
                config.dialects = dialects.clone();
            }
            if let Some(directory) = &output.directory {
                config.output_dir = Some(directory.clone());
            }
        }

        if let Some(mode) = self.parse.as_ref().and_then(|p| p.mode) {
            config.parse_mode = mode;
        }
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        if let Some(defaults) = &self.defaults {
            if let Some(width) = defaults.width {
                validate_positive_number("defaults.width", width, 1)?;
            }
            if let Some(height) = defaults.height {
                validate_positive_number("defaults.height", height, 1)?;
            }
            if let Some(version) = &defaults.version {
                validate_non_empty_string("defaults.version", version)?;
            }
            if let Some(name) = &defaults.texture_file_name {
                validate_non_empty_string("defaults.texture_file_name", name)?;
            }
            if let Some(scale) = defaults.scale {
                validate_range("defaults.scale", scale, 0.01, 64.0)?;
            }
        }

        if let Some(output) = &self.output {
            if matches!(&output.dialects, Some(d) if d.is_empty()) {
                return Err(AtlasError::InvalidConfigValueError {
                    field: "output.dialects".to_string(),
                    value: "[]".to_string(),
                    reason: "Valid dialects: pixi, phaser, pixijs".to_string(),
                });
            }
            if let Some(directory) = &output.directory {
                validate_path("output.directory", directory)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Size;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_toml_config() {
        let toml_content = r#"
[defaults]
width = 1024
height = 512
version = "2.1.0"
texture_file_name = "sheet"
scale = 0.5

[output]
dialects = ["phaser", "pixijs"]
directory = "dist/atlases"

[parse]
mode = "strict"
"#;

        let file = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(file.validate().is_ok());

        let mut config = ConversionConfig::new("a.plist");
        file.apply_to(&mut config);

        assert_eq!(config.defaults.size, Size { w: 1024, h: 512 });
        assert_eq!(config.defaults.version, "2.1.0");
        assert_eq!(config.defaults.texture_file_name, "sheet");
        assert_eq!(config.defaults.scale, 0.5);
        assert_eq!(config.dialects, vec![Dialect::Phaser, Dialect::Pixijs]);
        assert_eq!(config.output_dir.as_deref(), Some("dist/atlases"));
        assert_eq!(config.parse_mode, ParseMode::Strict);
    }

    #[test]
    fn test_partial_config_keeps_other_defaults() {
        let file = TomlConfig::from_toml_str("[defaults]\nwidth = 4096\n").unwrap();

        let mut config = ConversionConfig::new("a.plist");
        file.apply_to(&mut config);

        assert_eq!(config.defaults.size, Size { w: 4096, h: 2048 });
        assert_eq!(config.dialects, Dialect::ALL.to_vec());
        assert_eq!(config.parse_mode, ParseMode::Auto);
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("PLIST_ATLAS_TEST_OUT", "build/json");

        let content = "[output]\ndirectory = \"${PLIST_ATLAS_TEST_OUT}\"\n";
        let file = TomlConfig::from_toml_str(content).unwrap();
        assert_eq!(
            file.output.unwrap().directory.as_deref(),
            Some("build/json")
        );

        std::env::remove_var("PLIST_ATLAS_TEST_OUT");
    }

    #[test]
    fn test_config_validation() {
        let file = TomlConfig::from_toml_str("[output]\ndialects = []\n").unwrap();
        assert!(file.validate().is_err());

        let file = TomlConfig::from_toml_str("[defaults]\nwidth = 0\n").unwrap();
        assert!(file.validate().is_err());

        assert!(TomlConfig::from_toml_str("[output]\ndialects = [\"unity\"]\n").is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[parse]\nmode = \"tolerant\"\n")
            .unwrap();

        let file = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(file.parse.unwrap().mode, Some(ParseMode::Tolerant));
    }
}
