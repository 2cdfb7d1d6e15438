//! 构建阶段警告与报告
//!
//! 历史实现中静默发生的覆盖与缺口在这里成为可观测、可断言的结果。

use chrono::{DateTime, Utc};
use std::fmt;

/// 构建阶段警告
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildWarning {
    /// 两个组件解析到同一注册名称，后者覆盖前者
    DuplicateComponentName {
        /// 冲突的注册名称
        name: String,
        /// 被覆盖组件的限定名称
        replaced: String,
        /// 保留组件的限定名称
        kept: String,
    },
    /// 注入目标名称不在注册表中，字段保持未设置
    InjectionGap {
        /// 宿主组件的注册名称
        component: String,
        /// 字段标识
        field: String,
        /// 解析出的目标名称
        target: String,
    },
    /// 注入目标存在但与字段声明类型不兼容
    IncompatibleDependency {
        /// 宿主组件的注册名称
        component: String,
        /// 字段标识
        field: String,
        /// 解析出的目标名称
        target: String,
    },
    /// 两个处理器方法规范化到同一路径，后处理者覆盖前者
    RouteCollision {
        /// 冲突的规范化路径
        path: String,
        /// 被覆盖的 组件名.方法名
        replaced: String,
        /// 保留的 组件名.方法名
        kept: String,
    },
}

impl fmt::Display for BuildWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateComponentName { name, replaced, kept } => {
                write!(f, "注册名称冲突: {name}, {replaced} 被 {kept} 覆盖")
            }
            Self::InjectionGap { component, field, target } => {
                write!(f, "注入缺口: {component}.{field} 的目标 {target} 未注册")
            }
            Self::IncompatibleDependency { component, field, target } => {
                write!(f, "注入类型不兼容: {component}.{field} 无法绑定 {target}")
            }
            Self::RouteCollision { path, replaced, kept } => {
                write!(f, "路由冲突: {path}, {replaced} 被 {kept} 覆盖")
            }
        }
    }
}

impl BuildWarning {
    /// 是否为路由冲突警告
    pub fn is_route_collision(&self) -> bool {
        matches!(self, Self::RouteCollision { .. })
    }

    /// 是否为注入缺口警告
    pub fn is_injection_gap(&self) -> bool {
        matches!(self, Self::InjectionGap { .. })
    }
}

/// 构建报告
///
/// 一次初始化流程的统计信息与全部警告。
#[derive(Debug, Clone)]
pub struct BuildReport {
    /// 初始化开始时间
    pub started_at: DateTime<Utc>,
    /// 初始化结束时间
    pub finished_at: DateTime<Utc>,
    /// 扫描到的候选数量
    pub scanned: usize,
    /// 注册表条目数量
    pub registered: usize,
    /// 路由表条目数量
    pub routes: usize,
    /// 全部构建警告
    pub warnings: Vec<BuildWarning>,
}

impl BuildReport {
    /// 初始化耗时
    pub fn duration(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }

    /// 是否产生过警告
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// 按谓词筛选警告
    pub fn warnings_where<P>(&self, predicate: P) -> Vec<&BuildWarning>
    where
        P: Fn(&BuildWarning) -> bool,
    {
        self.warnings.iter().filter(|w| predicate(w)).collect()
    }
}
