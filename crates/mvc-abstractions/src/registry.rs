//! 组件注册表抽象
//!
//! 注册表在初始化时一次性构建，之后作为只读共享结构被所有
//! 请求线程并发访问，不需要任何锁。

use crate::warnings::BuildWarning;
use async_trait::async_trait;
use mvc_common::{
    ComponentDefinition, ComponentDescriptor, RegistryResult, SharedInstance,
};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// 注册表条目
///
/// 持有组件的具体实例、按能力暴露的视图以及派生的描述符。
/// 能力视图与具体实例指向同一份数据。
#[derive(Clone)]
pub struct RegistryEntry {
    instance: SharedInstance,
    views: Vec<(String, SharedInstance)>,
    descriptor: ComponentDescriptor,
    definition: Arc<ComponentDefinition>,
}

impl RegistryEntry {
    /// 创建新的注册表条目
    pub fn new(
        instance: SharedInstance,
        descriptor: ComponentDescriptor,
        definition: Arc<ComponentDefinition>,
    ) -> Self {
        Self {
            instance,
            views: Vec::new(),
            descriptor,
            definition,
        }
    }

    /// 追加一个能力视图
    pub fn with_view(mut self, qualified_name: impl Into<String>, view: SharedInstance) -> Self {
        self.views.push((qualified_name.into(), view));
        self
    }

    /// 具体组件实例
    pub fn instance(&self) -> &SharedInstance {
        &self.instance
    }

    /// 能力视图列表
    pub fn views(&self) -> &[(String, SharedInstance)] {
        &self.views
    }

    /// 组件描述符
    pub fn descriptor(&self) -> &ComponentDescriptor {
        &self.descriptor
    }

    /// 来源组件定义
    pub fn definition(&self) -> &Arc<ComponentDefinition> {
        &self.definition
    }

    /// 依赖绑定的候选序列：先具体实例，再各能力视图
    pub fn bind_candidates(&self) -> impl Iterator<Item = &SharedInstance> {
        std::iter::once(&self.instance).chain(self.views.iter().map(|(_, view)| view))
    }
}

impl fmt::Debug for RegistryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryEntry")
            .field("descriptor", &self.descriptor)
            .field("views", &self.views.iter().map(|(n, _)| n).collect::<Vec<_>>())
            .finish()
    }
}

/// 组件注册表
///
/// 解析名称到组件实例的有序映射。键非空且唯一；
/// 有序存放保证注入与路由构建阶段的遍历顺序跨运行一致。
#[derive(Debug, Clone, Default)]
pub struct ComponentRegistry {
    entries: BTreeMap<String, RegistryEntry>,
}

impl ComponentRegistry {
    /// 创建空注册表
    pub fn new() -> Self {
        Self::default()
    }

    /// 插入条目，返回被覆盖的旧条目
    pub fn insert(&mut self, name: impl Into<String>, entry: RegistryEntry) -> Option<RegistryEntry> {
        self.entries.insert(name.into(), entry)
    }

    /// 按解析名称查找条目
    pub fn get(&self, name: &str) -> Option<&RegistryEntry> {
        self.entries.get(name)
    }

    /// 是否存在指定名称的条目
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// 按名称字典序遍历全部条目
    pub fn iter(&self) -> impl Iterator<Item = (&String, &RegistryEntry)> {
        self.entries.iter()
    }

    /// 全部解析名称（字典序）
    pub fn names(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }

    /// 条目数量
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 注册表是否为空
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// 容器构建器 trait
///
/// 把候选限定名称序列构建为完整注册表。任一候选失败即中止，
/// 不产生部分容器；非致命情况以警告形式返回。
#[async_trait]
pub trait RegistryBuilder: Send + Sync {
    /// 构建注册表
    async fn build(
        &self,
        candidates: &[String],
    ) -> RegistryResult<(ComponentRegistry, Vec<BuildWarning>)>;

    /// 获取构建器名称
    fn name(&self) -> &str;
}
