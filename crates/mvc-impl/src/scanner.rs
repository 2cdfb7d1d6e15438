//! 组件扫描器实现

use async_trait::async_trait;
use mvc_abstractions::ComponentScanner;
use mvc_common::{DefinitionCatalog, ScanError, ScanResult};
use std::sync::Arc;
use tracing::debug;

/// 基于定义目录的组件扫描器
///
/// 递归遍历目录中以指定根包开头的命名空间，按字典序返回
/// 全部候选限定名称。根包无法解析即致命，初始化流程整体中止。
pub struct CatalogScanner {
    catalog: Arc<DefinitionCatalog>,
}

impl CatalogScanner {
    /// 创建新的扫描器
    pub fn new(catalog: Arc<DefinitionCatalog>) -> Self {
        Self { catalog }
    }
}

#[async_trait]
impl ComponentScanner for CatalogScanner {
    async fn scan(&self, root_package: &str) -> ScanResult<Vec<String>> {
        let root = root_package.trim();
        if root.is_empty() {
            return Err(ScanError::InvalidRoot {
                root: root_package.to_string(),
            });
        }
        if !self.catalog.contains_root(root) {
            return Err(ScanError::RootNotFound {
                root: root.to_string(),
            });
        }

        let names = self.catalog.names_under(root);
        debug!("扫描根包 {} 完成，发现 {} 个候选", root, names.len());
        Ok(names)
    }

    fn name(&self) -> &str {
        "CatalogScanner"
    }

    fn supports(&self, root_package: &str) -> bool {
        !root_package.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mvc_common::ComponentDefinition;

    fn catalog() -> Arc<DefinitionCatalog> {
        Arc::new(
            DefinitionCatalog::new()
                .with_definition(ComponentDefinition::unmarked("demo::b::Beta"))
                .with_definition(ComponentDefinition::unmarked("demo::a::Alpha"))
                .with_definition(ComponentDefinition::unmarked("other::Gamma")),
        )
    }

    #[tokio::test]
    async fn test_scan_is_lexicographic_and_scoped() {
        let scanner = CatalogScanner::new(catalog());
        let names = scanner.scan("demo").await.unwrap();
        assert_eq!(names, vec!["demo::a::Alpha", "demo::b::Beta"]);
    }

    #[tokio::test]
    async fn test_scan_unknown_root_is_fatal() {
        let scanner = CatalogScanner::new(catalog());
        assert!(matches!(
            scanner.scan("missing").await,
            Err(ScanError::RootNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_scan_blank_root_is_invalid() {
        let scanner = CatalogScanner::new(catalog());
        assert!(!scanner.supports("  "));
        assert!(matches!(
            scanner.scan("  ").await,
            Err(ScanError::InvalidRoot { .. })
        ));
    }
}
