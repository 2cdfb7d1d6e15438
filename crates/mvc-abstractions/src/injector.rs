//! 依赖注入器抽象接口

use crate::registry::ComponentRegistry;
use crate::warnings::BuildWarning;
use async_trait::async_trait;

/// 依赖注入器 trait
///
/// 就地绑定每个注册实例声明的注入点。目标缺失不致命：
/// 字段保持未设置，并以警告形式上报。注入点之间没有顺序依赖，
/// 引用直接绑定而非递归解析。
#[async_trait]
pub trait DependencyInjector: Send + Sync {
    /// 对注册表中的全部实例执行注入，返回产生的警告
    async fn inject(&self, registry: &ComponentRegistry) -> Vec<BuildWarning>;

    /// 获取注入器名称
    fn name(&self) -> &str;
}
