//! 路由表构建器实现

use async_trait::async_trait;
use mvc_abstractions::{
    compose_route_path, BuildWarning, ComponentRegistry, Route, RouteTable, RouteTableBuilder,
};
use mvc_common::ComponentKind;
use tracing::{info, warn};

/// 基于处理器声明的路由表构建器
///
/// 遍历注册表中的处理器条目（名称字典序），把类型级基础路径与
/// 方法级路径组合成规范化路径。冲突路径由后处理者覆盖并上报警告。
#[derive(Debug, Default)]
pub struct HandlerRouteBuilder;

impl HandlerRouteBuilder {
    /// 创建新的路由表构建器
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl RouteTableBuilder for HandlerRouteBuilder {
    async fn build_routes(&self, registry: &ComponentRegistry) -> (RouteTable, Vec<BuildWarning>) {
        let mut table = RouteTable::new();
        let mut warnings = Vec::new();

        for (name, entry) in registry.iter() {
            let ComponentKind::Handler { base_path } = &entry.descriptor().kind else {
                continue;
            };
            let base = base_path.as_deref().unwrap_or("");

            for spec in entry.definition().routes() {
                let path = compose_route_path(base, spec.path());
                let kept = format!("{}.{}", name, spec.descriptor().name);
                let route = Route::new(path.clone(), name.clone(), spec);

                if let Some(replaced) = table.insert(route) {
                    let replaced = format!("{}.{}", replaced.owner_name(), replaced.descriptor().name);
                    warn!("路由冲突: {}, {} 被 {} 覆盖", path, replaced, kept);
                    warnings.push(BuildWarning::RouteCollision {
                        path,
                        replaced,
                        kept,
                    });
                } else {
                    info!("映射路由: {} -> {}", path, kept);
                }
            }
        }

        (table, warnings)
    }

    fn name(&self) -> &str {
        "HandlerRouteBuilder"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::CatalogRegistryBuilder;
    use crate::test_support::demo_catalog;
    use mvc_abstractions::RegistryBuilder;
    use mvc_common::{ComponentDefinition, DefinitionCatalog, ParamSpec, ResponseWriter, RouteSpec};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_routes_composed_from_base_and_method_path() {
        let catalog = demo_catalog();
        let builder = CatalogRegistryBuilder::new(Arc::clone(&catalog));
        let candidates = catalog.names_under("demo");
        let (registry, _) = builder.build(&candidates).await.unwrap();

        let (table, warnings) = HandlerRouteBuilder::new().build_routes(&registry).await;
        assert!(warnings.is_empty());
        assert!(table.lookup("/demo/get").is_some());
        assert!(table.lookup("/demo/add").is_some());
        assert!(table.lookup("/demo/delete").is_some());
        assert_eq!(table.lookup("/demo/get").unwrap().owner_name(), "demoAction");
    }

    #[tokio::test]
    async fn test_colliding_paths_keep_last_processed() {
        // 两个方法级路径规范化到同一条 /demo/add
        let definition = ComponentDefinition::handler("demo::action::DemoAction")
            .with_base_path("/demo")
            .with_constructor(|| Ok(Arc::new(()) as mvc_common::SharedInstance))
            .with_route(
                RouteSpec::new("add", "add", |_, _, response, _| {
                    response.write(b"first")?;
                    Ok(())
                })
                .with_param(ParamSpec::Request),
            )
            .with_route(
                RouteSpec::new("add_again", "//add", |_, _, response, _| {
                    response.write(b"second")?;
                    Ok(())
                })
                .with_param(ParamSpec::Request),
            );

        let mut catalog = DefinitionCatalog::new();
        catalog.register(definition);
        let catalog = Arc::new(catalog);

        let builder = CatalogRegistryBuilder::new(Arc::clone(&catalog));
        let candidates = catalog.names_under("demo");
        let (registry, _) = builder.build(&candidates).await.unwrap();

        let (table, warnings) = HandlerRouteBuilder::new().build_routes(&registry).await;
        assert_eq!(table.len(), 1);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].is_route_collision());

        // 保留的是后处理的方法
        let route = table.lookup("/demo/add").unwrap();
        assert_eq!(route.descriptor().name, "add_again");
    }
}
