//! 依赖注入器实现

use async_trait::async_trait;
use mvc_abstractions::{BuildWarning, ComponentRegistry, DependencyInjector};
use tracing::{debug, warn};

/// 基于注册表的依赖注入器
///
/// 按名称字典序遍历全部注册实例，逐个解析注入点：
/// 显式名称优先，否则用字段声明类型的限定名称；目标缺失时
/// 字段保持未设置并上报警告。同一实例可能以多个名称登记，
/// 注入点会被重复执行，赋值闭包需要幂等。
#[derive(Debug, Default)]
pub struct RegistryInjector;

impl RegistryInjector {
    /// 创建新的注入器
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DependencyInjector for RegistryInjector {
    async fn inject(&self, registry: &ComponentRegistry) -> Vec<BuildWarning> {
        let mut warnings = Vec::new();

        for (name, entry) in registry.iter() {
            for point in entry.definition().injection_points() {
                let target = point.target_name();
                let Some(dependency) = registry.get(target) else {
                    warn!("注入缺口: {}.{} 的目标 {} 未注册", name, point.field(), target);
                    warnings.push(BuildWarning::InjectionGap {
                        component: name.clone(),
                        field: point.field().to_string(),
                        target: target.to_string(),
                    });
                    continue;
                };

                let bound = dependency
                    .bind_candidates()
                    .any(|candidate| point.assign(entry.instance(), candidate));
                if bound {
                    debug!("注入完成: {}.{} <- {}", name, point.field(), target);
                } else {
                    warn!(
                        "注入类型不兼容: {}.{} 无法绑定 {}",
                        name,
                        point.field(),
                        target
                    );
                    warnings.push(BuildWarning::IncompatibleDependency {
                        component: name.clone(),
                        field: point.field().to_string(),
                        target: target.to_string(),
                    });
                }
            }
        }

        warnings
    }

    fn name(&self) -> &str {
        "RegistryInjector"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::CatalogRegistryBuilder;
    use crate::test_support::{demo_action_definition, demo_catalog, DemoAction, QUALIFIED_SERVICE};
    use mvc_abstractions::RegistryBuilder;
    use mvc_common::DefinitionCatalog;
    use std::sync::Arc;

    async fn build_registry(catalog: Arc<DefinitionCatalog>) -> ComponentRegistry {
        let builder = CatalogRegistryBuilder::new(Arc::clone(&catalog));
        let candidates = catalog.names_under("demo");
        builder.build(&candidates).await.unwrap().0
    }

    #[tokio::test]
    async fn test_injected_field_holds_registry_reference() {
        let registry = build_registry(demo_catalog()).await;
        let warnings = RegistryInjector::new().inject(&registry).await;
        assert!(warnings.is_empty());

        let action_entry = registry.get("demoAction").unwrap();
        let action = action_entry.instance().downcast_ref::<DemoAction>().unwrap();
        let injected = action.greeting.get().expect("注入后字段应已绑定");

        // 引用同一性：绑定的是注册表条目自身的共享引用
        let service_entry = registry.get(QUALIFIED_SERVICE).unwrap();
        assert_eq!(
            Arc::as_ptr(injected) as *const (),
            Arc::as_ptr(service_entry.instance()) as *const ()
        );
    }

    #[tokio::test]
    async fn test_missing_target_leaves_field_unset() {
        // 只登记处理器，不登记服务
        let mut catalog = DefinitionCatalog::new();
        catalog.register(demo_action_definition());
        let registry = build_registry(Arc::new(catalog)).await;

        let warnings = RegistryInjector::new().inject(&registry).await;
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].is_injection_gap());

        let action_entry = registry.get("demoAction").unwrap();
        let action = action_entry.instance().downcast_ref::<DemoAction>().unwrap();
        assert!(action.greeting.get().is_none());
    }
}
