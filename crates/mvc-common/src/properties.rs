//! 启动属性配置
//!
//! 扁平的键值属性集，对应启动配置文件的一次性读取。
//! 核心只消费扫描根包一个键，其余键对核心透明。

use crate::errors::{ConfigError, ConfigResult};
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::path::Path;

/// 扫描根包的属性键
pub const SCAN_PACKAGE_KEY: &str = "scanPackage";

/// 扁平键值属性集
#[derive(Debug, Clone, Default)]
pub struct Properties {
    values: BTreeMap<String, String>,
}

impl Properties {
    /// 创建空属性集
    pub fn new() -> Self {
        Self::default()
    }

    /// 从属性文本解析
    ///
    /// 每行一条 `key=value`；`#` 或 `!` 开头的行与空行忽略；
    /// 没有 `=` 的行按空值键处理。
    pub fn from_text(text: &str) -> Self {
        let mut values = BTreeMap::new();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
                continue;
            }
            let (key, value) = line.split_once('=').unwrap_or((line, ""));
            values.insert(key.trim().to_string(), value.trim().to_string());
        }
        Self { values }
    }

    /// 从属性文件加载
    pub fn load_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.display().to_string(),
            });
        }
        let text = std::fs::read_to_string(path)?;
        Ok(Self::from_text(&text))
    }

    /// 设置属性值
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// 构建器风格的设置
    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    /// 读取属性值
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// 读取扫描根包，缺失即启动期致命错误
    pub fn scan_package(&self) -> ConfigResult<&str> {
        self.get(SCAN_PACKAGE_KEY)
            .filter(|value| !value.is_empty())
            .ok_or(ConfigError::KeyNotFound {
                key: SCAN_PACKAGE_KEY.to_string(),
            })
    }

    /// 将整个属性集绑定到具体类型
    pub fn bind<T>(&self) -> ConfigResult<T>
    where
        T: DeserializeOwned,
    {
        let object = serde_json::Value::Object(
            self.values
                .iter()
                .map(|(k, v)| (k.clone(), serde_json::Value::String(v.clone())))
                .collect(),
        );
        Ok(serde_json::from_value(object)?)
    }

    /// 属性条目数量
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// 属性集是否为空
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_properties_text() {
        let properties = Properties::from_text(
            "# 应用配置\nscanPackage=demo\n\n! 注释\nappName = light-mvc\nflagOnly\n",
        );
        assert_eq!(properties.get(SCAN_PACKAGE_KEY), Some("demo"));
        assert_eq!(properties.get("appName"), Some("light-mvc"));
        assert_eq!(properties.get("flagOnly"), Some(""));
        assert_eq!(properties.len(), 3);
    }

    #[test]
    fn test_missing_scan_package_is_error() {
        let properties = Properties::from_text("appName=demo\n");
        assert!(matches!(
            properties.scan_package(),
            Err(ConfigError::KeyNotFound { .. })
        ));
    }

    #[test]
    fn test_load_file_roundtrip() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "scanPackage=demo").unwrap();
        writeln!(file, "appName=light-mvc").unwrap();

        let properties = Properties::load_file(file.path()).unwrap();
        assert_eq!(properties.scan_package().unwrap(), "demo");
        assert_eq!(properties.get("appName"), Some("light-mvc"));
    }

    #[test]
    fn test_load_missing_file_is_error() {
        let result = Properties::load_file("/no/such/application.properties");
        assert!(matches!(result, Err(ConfigError::FileNotFound { .. })));
    }

    #[test]
    fn test_bind_to_typed_config() {
        #[derive(serde::Deserialize)]
        struct AppConfig {
            #[serde(rename = "scanPackage")]
            scan_package: String,
        }

        let properties = Properties::from_text("scanPackage=demo");
        let config: AppConfig = properties.bind().unwrap();
        assert_eq!(config.scan_package, "demo");
    }
}
