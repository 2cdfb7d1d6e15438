//! 组件扫描器抽象接口

use async_trait::async_trait;
use mvc_common::ScanResult;

/// 组件扫描器 trait
///
/// 从指定根包递归发现候选组件的完全限定名称。
/// 返回顺序必须跨运行确定（字典序），扫描失败视为致命错误。
#[async_trait]
pub trait ComponentScanner: Send + Sync {
    /// 扫描根包，返回候选限定名称序列
    async fn scan(&self, root_package: &str) -> ScanResult<Vec<String>>;

    /// 获取扫描器名称
    fn name(&self) -> &str;

    /// 检查是否支持指定的扫描目标
    fn supports(&self, root_package: &str) -> bool;
}
