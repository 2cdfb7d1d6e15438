//! 框架启动器
//!
//! 初始化四阶段严格按序执行，全部完成之前不接收任何请求；
//! 任一致命错误立即中止，不产生可用的上下文。

use crate::context::MvcContext;
use chrono::Utc;
use mvc_abstractions::{
    BuildReport, ComponentScanner, DependencyInjector, RegistryBuilder, RouteTableBuilder,
};
use mvc_common::{DefinitionCatalog, MvcResult, Properties};
use mvc_impl::{CatalogRegistryBuilder, CatalogScanner, HandlerRouteBuilder, RegistryInjector};
use std::sync::Arc;
use tracing::{info, warn};

/// MVC 框架启动器
///
/// 持有组件定义目录与启动属性，一次性执行完整初始化流程。
pub struct MvcBootstrapper {
    catalog: Arc<DefinitionCatalog>,
    properties: Properties,
}

impl MvcBootstrapper {
    /// 创建新的启动器
    pub fn new(catalog: DefinitionCatalog, properties: Properties) -> Self {
        Self {
            catalog: Arc::new(catalog),
            properties,
        }
    }

    /// 执行初始化流程并产出应用上下文
    pub async fn bootstrap(self) -> MvcResult<MvcContext> {
        let started_at = Utc::now();
        info!("开始初始化 MVC 框架");

        // 第一步：从启动属性读取扫描根包
        let scan_package = self.properties.scan_package()?.to_string();

        // 第二步：扫描根包下的全部候选类型
        let scanner = CatalogScanner::new(Arc::clone(&self.catalog));
        let candidates = scanner.scan(&scan_package).await?;
        info!("扫描根包 {} 完成，共 {} 个候选", scan_package, candidates.len());

        // 第三步：实例化被标记的组件并构建注册表
        let builder = CatalogRegistryBuilder::new(Arc::clone(&self.catalog));
        let (registry, mut warnings) = builder.build(&candidates).await?;

        // 第四步：依赖注入
        let injector = RegistryInjector::new();
        warnings.extend(injector.inject(&registry).await);

        // 第五步：构建路由表
        let route_builder = HandlerRouteBuilder::new();
        let (routes, route_warnings) = route_builder.build_routes(&registry).await;
        warnings.extend(route_warnings);

        let finished_at = Utc::now();
        let report = BuildReport {
            started_at,
            finished_at,
            scanned: candidates.len(),
            registered: registry.len(),
            routes: routes.len(),
            warnings,
        };
        for warning in &report.warnings {
            warn!("构建警告: {}", warning);
        }
        info!(
            "MVC 框架初始化完成: {} 个组件, {} 条路由, 耗时 {} ms",
            report.registered,
            report.routes,
            report.duration().num_milliseconds()
        );

        Ok(MvcContext::new(
            Arc::new(registry),
            Arc::new(routes),
            Arc::new(self.properties),
            report,
        ))
    }
}
