//! 配置加载
//!
//! 按顺序查找 `./shoplist.toml` 和 `~/.config/shoplist/config.toml`，
//! 缺失的字段使用默认值。配置只包含应用设置，清单内容从不落盘。

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::models::InvalidQuantityPolicy;

const LOCAL_CONFIG_FILE: &str = "shoplist.toml";

/// 配置根结构
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub list: ListConfig,
    pub ui: UiConfig,
    pub logging: LoggingConfig,
}

/// 清单行为
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ListConfig {
    /// 添加时数量无法解析: "reject" 或 "zero"
    pub invalid_quantity: InvalidQuantityPolicy,
}

/// 界面设置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// 删除前是否需要确认
    pub confirm_delete: bool,
    /// 列表中显示条目 id
    pub show_ids: bool,
}

/// 日志设置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub enabled: bool,
    pub level: String,
    /// 日志文件路径，默认 ~/.local/share/shoplist/shoplist.log
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            level: "info".to_string(),
            file: None,
        }
    }
}

impl LoggingConfig {
    pub fn level_filter(&self) -> Result<log::LevelFilter> {
        log::LevelFilter::from_str(&self.level)
            .map_err(|_| anyhow!("无效的日志级别 '{}'", self.level))
    }
}

impl Config {
    /// 加载配置，找不到文件时返回默认值
    pub fn load() -> Result<Self> {
        match Self::find_config_file() {
            Some(path) => Self::load_from_file(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("无法读取配置文件 {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("配置文件有误 {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn find_config_file() -> Option<PathBuf> {
        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.exists() {
            return Some(local);
        }

        dirs::config_dir()
            .map(|dir| dir.join("shoplist").join("config.toml"))
            .filter(|path| path.exists())
    }

    pub fn validate(&self) -> Result<()> {
        self.logging.level_filter()?;
        Ok(())
    }
}
