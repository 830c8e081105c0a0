//! 文件日志
//!
//! 终端被 TUI 占用，日志只写入文件。

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};

use crate::config::LoggingConfig;

/// 获取数据目录路径 (~/.local/share/shoplist/)
fn data_dir() -> Result<PathBuf> {
    let data_dir = dirs::data_dir()
        .ok_or_else(|| anyhow!("无法获取用户数据目录"))?
        .join("shoplist");

    fs::create_dir_all(&data_dir)
        .with_context(|| format!("无法创建目录 {}", data_dir.display()))?;

    Ok(data_dir)
}

/// 日志文件路径，未配置时使用数据目录
pub fn log_path(config: &LoggingConfig) -> Result<PathBuf> {
    match &config.file {
        Some(path) => Ok(path.clone()),
        None => Ok(data_dir()?.join("shoplist.log")),
    }
}

fn build_dispatch(config: &LoggingConfig) -> Result<fern::Dispatch> {
    let path = log_path(config)?;
    let file = fern::log_file(&path)
        .with_context(|| format!("无法打开日志文件 {}", path.display()))?;

    Ok(fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {} {}] {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(config.level_filter()?)
        .chain(file))
}

/// 按配置初始化全局日志；未启用时什么都不做
pub fn init(config: &LoggingConfig) -> Result<()> {
    if !config.enabled {
        return Ok(());
    }

    build_dispatch(config)?
        .apply()
        .context("日志已经初始化")?;
    log::info!("logging to {}", log_path(config)?.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_logging_is_noop() {
        assert!(init(&LoggingConfig::default()).is_ok());
    }

    #[test]
    fn test_dispatch_opens_configured_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.log");
        let config = LoggingConfig {
            enabled: true,
            level: "debug".to_string(),
            file: Some(path.clone()),
        };

        assert_eq!(log_path(&config).unwrap(), path);
        assert!(build_dispatch(&config).is_ok());
        assert!(path.exists());
    }

    #[test]
    fn test_bad_level_fails() {
        let dir = tempfile::tempdir().unwrap();
        let config = LoggingConfig {
            enabled: true,
            level: "chatty".to_string(),
            file: Some(dir.path().join("test.log")),
        };
        assert!(build_dispatch(&config).is_err());
    }
}
