//! 错误类型定义

use thiserror::Error;

/// 装箱的通用错误类型
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件不存在: {path}")]
    FileNotFound { path: String },

    #[error("配置文件读取失败: {source}")]
    FileReadError {
        #[from]
        source: std::io::Error,
    },

    #[error("配置键不存在: {key}")]
    KeyNotFound { key: String },

    #[error("配置绑定失败: {source}")]
    BindError {
        #[from]
        source: serde_json::Error,
    },
}

/// 组件扫描错误类型
///
/// 扫描失败视为致命错误，整个初始化流程随之中止。
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("扫描根包无法解析: {root}")]
    RootNotFound { root: String },

    #[error("扫描根包不合法: {root:?}")]
    InvalidRoot { root: String },
}

/// 组件注册错误类型
///
/// 任一候选无法注册即中止整个容器构建，不产生部分容器。
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("候选类型无法解析: {qualified_name}")]
    TypeResolution { qualified_name: String },

    #[error("组件实例化失败: {qualified_name}, 原因: {source}")]
    Instantiation {
        qualified_name: String,
        source: BoxError,
    },

    #[error("服务组件既无显式名称也未实现任何能力: {qualified_name}")]
    UnnamedService { qualified_name: String },
}

/// 请求分发错误类型
///
/// 仅影响当前请求，不波及共享注册表与其他请求。
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("处理器组件未注册: {component_name}")]
    HandlerNotRegistered { component_name: String },

    #[error("参数绑定失败: {parameter}, 值: {value}")]
    ParameterBinding { parameter: String, value: String },

    #[error("处理器执行失败: {path}, 原因: {source}")]
    HandlerFailed {
        path: String,
        #[source]
        source: BoxError,
    },
}

/// 响应写出错误类型
#[derive(Error, Debug)]
pub enum ResponseError {
    #[error("响应写出失败: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

/// 框架顶层错误类型
#[derive(Error, Debug)]
pub enum MvcError {
    #[error("配置错误: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },

    #[error("扫描错误: {source}")]
    Scan {
        #[from]
        source: ScanError,
    },

    #[error("注册错误: {source}")]
    Registry {
        #[from]
        source: RegistryError,
    },

    #[error("框架启动失败: {message}")]
    BootstrapFailed { message: String },
}

/// 结果类型别名
pub type ConfigResult<T> = Result<T, ConfigError>;
pub type ScanResult<T> = Result<T, ScanError>;
pub type RegistryResult<T> = Result<T, RegistryError>;
pub type DispatchResult<T> = Result<T, DispatchError>;
pub type ResponseResult<T> = Result<T, ResponseError>;
pub type MvcResult<T> = Result<T, MvcError>;
