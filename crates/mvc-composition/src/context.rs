//! 应用上下文

use mvc_abstractions::{BindingMode, BuildReport, ComponentRegistry, RouteTable};
use mvc_common::Properties;
use mvc_impl::TableDispatcher;
use std::sync::Arc;

/// MVC 应用上下文
///
/// 初始化流程的全部产出：组件注册表、路由表、启动属性与构建报告。
/// 在启动时创建一次，之后作为只读结构按引用传递给分发器，
/// 不存在任何进程级全局状态。
#[derive(Debug)]
pub struct MvcContext {
    registry: Arc<ComponentRegistry>,
    routes: Arc<RouteTable>,
    properties: Arc<Properties>,
    report: BuildReport,
}

impl MvcContext {
    pub(crate) fn new(
        registry: Arc<ComponentRegistry>,
        routes: Arc<RouteTable>,
        properties: Arc<Properties>,
        report: BuildReport,
    ) -> Self {
        Self {
            registry,
            routes,
            properties,
            report,
        }
    }

    /// 组件注册表
    pub fn registry(&self) -> &Arc<ComponentRegistry> {
        &self.registry
    }

    /// 路由表
    pub fn routes(&self) -> &Arc<RouteTable> {
        &self.routes
    }

    /// 启动属性
    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    /// 构建报告
    pub fn report(&self) -> &BuildReport {
        &self.report
    }

    /// 创建默认绑定模式的请求分发器
    pub fn dispatcher(&self) -> TableDispatcher {
        TableDispatcher::new(Arc::clone(&self.registry), Arc::clone(&self.routes))
    }

    /// 创建指定绑定模式的请求分发器
    pub fn dispatcher_with_mode(&self, mode: BindingMode) -> TableDispatcher {
        self.dispatcher().with_binding_mode(mode)
    }
}
