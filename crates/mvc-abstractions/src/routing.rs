//! 路由表抽象
//!
//! 路径规范化算法与路由表结构。路由表在初始化时一次性构建，
//! 之后只读共享。

use crate::registry::ComponentRegistry;
use crate::warnings::BuildWarning;
use async_trait::async_trait;
use mvc_common::{
    BoundArg, BoxError, HandlerInvoker, MethodDescriptor, RequestContext, ResponseWriter,
    RouteSpec, SharedInstance,
};
use std::collections::BTreeMap;
use std::fmt;

/// 路径规范化：保证单个前导分隔符并折叠连续分隔符
///
/// 不剥除尾部分隔符；两段均为空时恰好得到根路径 `/`。
/// 幂等：`normalize_path(normalize_path(p)) == normalize_path(p)`。
pub fn normalize_path(path: &str) -> String {
    let mut normalized = String::with_capacity(path.len() + 1);
    normalized.push('/');
    let mut prev_slash = true;
    for ch in path.chars() {
        if ch == '/' {
            if !prev_slash {
                normalized.push('/');
            }
            prev_slash = true;
        } else {
            normalized.push(ch);
            prev_slash = false;
        }
    }
    normalized
}

/// 组合类型级基础路径与方法级路径
pub fn compose_route_path(base_path: &str, method_path: &str) -> String {
    normalize_path(&format!("/{base_path}/{method_path}"))
}

/// 规范化请求路径：剥除部署上下文前缀后做同一路径规范化
pub fn normalize_request_path(path: &str, context_prefix: &str) -> String {
    let stripped = if context_prefix.is_empty() {
        path
    } else {
        path.strip_prefix(context_prefix).unwrap_or(path)
    };
    normalize_path(stripped)
}

/// 路由
///
/// 规范化路径到（所属组件名称, 方法描述符）的一条映射。
#[derive(Clone)]
pub struct Route {
    path: String,
    owner_name: String,
    descriptor: MethodDescriptor,
    invoker: HandlerInvoker,
}

impl Route {
    /// 由路由声明创建路由
    pub fn new(path: impl Into<String>, owner_name: impl Into<String>, spec: &RouteSpec) -> Self {
        Self {
            path: path.into(),
            owner_name: owner_name.into(),
            descriptor: spec.descriptor().clone(),
            invoker: spec.invoker(),
        }
    }

    /// 规范化路径
    pub fn path(&self) -> &str {
        &self.path
    }

    /// 所属组件的解析名称
    pub fn owner_name(&self) -> &str {
        &self.owner_name
    }

    /// 方法描述符
    pub fn descriptor(&self) -> &MethodDescriptor {
        &self.descriptor
    }

    /// 调用处理器方法
    pub fn invoke(
        &self,
        owner: &SharedInstance,
        ctx: &RequestContext,
        response: &mut dyn ResponseWriter,
        args: &[BoundArg],
    ) -> Result<(), BoxError> {
        (self.invoker)(owner, ctx, response, args)
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("path", &self.path)
            .field("owner_name", &self.owner_name)
            .field("descriptor", &self.descriptor)
            .finish()
    }
}

/// 路由表
///
/// 路径唯一；冲突路径由后注册者覆盖（覆盖情况由构建器上报警告）。
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: BTreeMap<String, Route>,
}

impl RouteTable {
    /// 创建空路由表
    pub fn new() -> Self {
        Self::default()
    }

    /// 插入路由，返回被覆盖的旧路由
    pub fn insert(&mut self, route: Route) -> Option<Route> {
        self.routes.insert(route.path().to_string(), route)
    }

    /// 精确匹配查找（调用方负责先行规范化）
    pub fn lookup(&self, normalized_path: &str) -> Option<&Route> {
        self.routes.get(normalized_path)
    }

    /// 全部已注册路径（字典序）
    pub fn paths(&self) -> Vec<&str> {
        self.routes.keys().map(String::as_str).collect()
    }

    /// 路由数量
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// 路由表是否为空
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

/// 路由表构建器 trait
#[async_trait]
pub trait RouteTableBuilder: Send + Sync {
    /// 从注册表中的处理器构建路由表
    async fn build_routes(&self, registry: &ComponentRegistry) -> (RouteTable, Vec<BuildWarning>);

    /// 获取构建器名称
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_collapses_duplicate_separators() {
        assert_eq!(normalize_path("//a///b/"), "/a/b/");
        assert_eq!(normalize_path("demo/get"), "/demo/get");
        assert_eq!(normalize_path(""), "/");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for path in ["//a///b/", "/demo/get", "", "///", "a//b"] {
            let once = normalize_path(path);
            assert_eq!(normalize_path(&once), once);
        }
    }

    #[test]
    fn test_compose_route_path() {
        assert_eq!(compose_route_path("/demo", "get"), "/demo/get");
        assert_eq!(compose_route_path("demo", "/get"), "/demo/get");
        assert_eq!(compose_route_path("", ""), "/");
        assert_eq!(compose_route_path("/demo", "delete"), "/demo/delete");
    }

    #[test]
    fn test_normalize_request_path_strips_prefix() {
        assert_eq!(normalize_request_path("/app/demo//get", "/app"), "/demo/get");
        assert_eq!(normalize_request_path("/demo/get", ""), "/demo/get");
        assert_eq!(normalize_request_path("/other/demo", "/app"), "/other/demo");
    }
}
