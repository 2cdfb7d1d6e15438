//! 组件模型定义
//!
//! 运行时没有注解反射，元数据标记以显式登记表的形式在启动时提供：
//! 每个组件类型对应一条 [`ComponentDefinition`]，携带分类标记、零参构造器、
//! 能力绑定、注入点与路由声明；[`DefinitionCatalog`] 汇总全部定义并
//! 暴露命名空间树供扫描器遍历。

use crate::errors::BoxError;
use crate::metadata::{ComponentDescriptor, ComponentKind, TypeInfo, PACKAGE_SEPARATOR};
use crate::request::{BoundArg, RequestContext, ResponseWriter};
use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// 共享组件实例
pub type SharedInstance = Arc<dyn Any + Send + Sync>;

/// 零参构造器函数类型
pub type ConstructorFn = Arc<dyn Fn() -> Result<SharedInstance, BoxError> + Send + Sync>;

/// 能力暴露函数类型：将具体实例重新包装为对应的能力 trait 对象
pub type CapabilityExposure =
    Arc<dyn Fn(&SharedInstance) -> Option<SharedInstance> + Send + Sync>;

/// 字段赋值函数类型：(宿主实例, 候选依赖) -> 是否完成绑定
pub type FieldAssigner = Arc<dyn Fn(&SharedInstance, &SharedInstance) -> bool + Send + Sync>;

/// 处理器调用函数类型
pub type HandlerInvoker = Arc<
    dyn Fn(
            &SharedInstance,
            &RequestContext,
            &mut dyn ResponseWriter,
            &[BoundArg],
        ) -> Result<(), BoxError>
        + Send
        + Sync,
>;

/// 方法参数声明
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamSpec {
    /// 声明类型为请求对象
    Request,
    /// 声明类型为响应对象
    Response,
    /// 文本标量参数
    Text {
        /// 声明的参数名称
        name: String,
    },
    /// 整数标量参数
    Integer {
        /// 声明的参数名称
        name: String,
    },
    /// 其他声明类型，保持未绑定
    Other {
        /// 声明类型的限定名称
        declared_type: String,
    },
}

impl ParamSpec {
    /// 创建文本参数声明
    pub fn text(name: impl Into<String>) -> Self {
        Self::Text { name: name.into() }
    }

    /// 创建整数参数声明
    pub fn integer(name: impl Into<String>) -> Self {
        Self::Integer { name: name.into() }
    }

    /// 创建不受支持类型的参数声明
    pub fn other(declared_type: impl Into<String>) -> Self {
        Self::Other {
            declared_type: declared_type.into(),
        }
    }

    /// 标量参数的声明名称
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Text { name } | Self::Integer { name } => Some(name),
            _ => None,
        }
    }
}

/// 方法描述符：方法名与有序参数类型列表
#[derive(Debug, Clone)]
pub struct MethodDescriptor {
    /// 方法名称
    pub name: String,
    /// 有序参数声明
    pub params: Vec<ParamSpec>,
}

/// 路由声明
///
/// 对应方法级路由标记：路径值、方法描述符与调用闭包。
#[derive(Clone)]
pub struct RouteSpec {
    path: String,
    descriptor: MethodDescriptor,
    invoker: HandlerInvoker,
}

impl RouteSpec {
    /// 创建新的路由声明
    pub fn new<F>(method_name: impl Into<String>, path: impl Into<String>, invoker: F) -> Self
    where
        F: Fn(
                &SharedInstance,
                &RequestContext,
                &mut dyn ResponseWriter,
                &[BoundArg],
            ) -> Result<(), BoxError>
            + Send
            + Sync
            + 'static,
    {
        Self {
            path: path.into(),
            descriptor: MethodDescriptor {
                name: method_name.into(),
                params: Vec::new(),
            },
            invoker: Arc::new(invoker),
        }
    }

    /// 追加一个参数声明
    pub fn with_param(mut self, param: ParamSpec) -> Self {
        self.descriptor.params.push(param);
        self
    }

    /// 方法级路径值
    pub fn path(&self) -> &str {
        &self.path
    }

    /// 方法描述符
    pub fn descriptor(&self) -> &MethodDescriptor {
        &self.descriptor
    }

    /// 调用闭包句柄
    pub fn invoker(&self) -> HandlerInvoker {
        Arc::clone(&self.invoker)
    }
}

impl fmt::Debug for RouteSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteSpec")
            .field("path", &self.path)
            .field("descriptor", &self.descriptor)
            .field("invoker", &"<function>")
            .finish()
    }
}

/// 能力绑定
///
/// 服务组件实现的每个能力（trait）对应一条绑定，
/// 暴露闭包负责把具体实例重新包装为该能力的 trait 对象。
#[derive(Clone)]
pub struct CapabilityBinding {
    qualified_name: String,
    exposure: CapabilityExposure,
}

impl CapabilityBinding {
    /// 创建新的能力绑定
    pub fn new<F>(qualified_name: impl Into<String>, exposure: F) -> Self
    where
        F: Fn(&SharedInstance) -> Option<SharedInstance> + Send + Sync + 'static,
    {
        Self {
            qualified_name: qualified_name.into(),
            exposure: Arc::new(exposure),
        }
    }

    /// 能力的完全限定名称
    pub fn qualified_name(&self) -> &str {
        &self.qualified_name
    }

    /// 将具体实例包装为该能力视图
    pub fn expose(&self, instance: &SharedInstance) -> Option<SharedInstance> {
        (self.exposure)(instance)
    }
}

impl fmt::Debug for CapabilityBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CapabilityBinding")
            .field("qualified_name", &self.qualified_name)
            .field("exposure", &"<function>")
            .finish()
    }
}

/// 注入点
///
/// 对应字段级注入标记：字段标识、可选显式目标名称、声明类型与赋值闭包。
/// 赋值闭包把注册表中的共享引用写入宿主实例的字段槽位，
/// 不需要绕过任何可见性限制。
#[derive(Clone)]
pub struct InjectionPoint {
    field: String,
    explicit_name: Option<String>,
    declared_type: String,
    assigner: FieldAssigner,
}

impl InjectionPoint {
    /// 创建新的注入点
    pub fn new<F>(field: impl Into<String>, declared_type: impl Into<String>, assigner: F) -> Self
    where
        F: Fn(&SharedInstance, &SharedInstance) -> bool + Send + Sync + 'static,
    {
        Self {
            field: field.into(),
            explicit_name: None,
            declared_type: declared_type.into(),
            assigner: Arc::new(assigner),
        }
    }

    /// 设置显式目标名称
    pub fn with_explicit_name(mut self, name: impl Into<String>) -> Self {
        self.explicit_name = Some(name.into());
        self
    }

    /// 字段标识
    pub fn field(&self) -> &str {
        &self.field
    }

    /// 声明类型的完全限定名称
    pub fn declared_type(&self) -> &str {
        &self.declared_type
    }

    /// 解析注入目标名称：显式名称（非空白）优先，否则用声明类型名称
    pub fn target_name(&self) -> &str {
        match self.explicit_name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name,
            _ => &self.declared_type,
        }
    }

    /// 尝试把候选依赖绑定到宿主字段
    pub fn assign(&self, owner: &SharedInstance, candidate: &SharedInstance) -> bool {
        (self.assigner)(owner, candidate)
    }
}

impl fmt::Debug for InjectionPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InjectionPoint")
            .field("field", &self.field)
            .field("explicit_name", &self.explicit_name)
            .field("declared_type", &self.declared_type)
            .field("assigner", &"<function>")
            .finish()
    }
}

/// 组件定义
///
/// 一个组件类型的全部元数据标记的显式形式。
#[derive(Clone)]
pub struct ComponentDefinition {
    type_info: TypeInfo,
    kind: ComponentKind,
    constructor: Option<ConstructorFn>,
    capabilities: Vec<CapabilityBinding>,
    injection_points: Vec<InjectionPoint>,
    routes: Vec<RouteSpec>,
}

impl ComponentDefinition {
    fn new(qualified_name: impl Into<String>, kind: ComponentKind) -> Self {
        Self {
            type_info: TypeInfo::new(qualified_name),
            kind,
            constructor: None,
            capabilities: Vec::new(),
            injection_points: Vec::new(),
            routes: Vec::new(),
        }
    }

    /// 创建处理器定义
    pub fn handler(qualified_name: impl Into<String>) -> Self {
        Self::new(qualified_name, ComponentKind::Handler { base_path: None })
    }

    /// 创建服务定义
    pub fn service(qualified_name: impl Into<String>) -> Self {
        Self::new(qualified_name, ComponentKind::Service { name: None })
    }

    /// 创建未标记类型定义
    pub fn unmarked(qualified_name: impl Into<String>) -> Self {
        Self::new(qualified_name, ComponentKind::Unmarked)
    }

    /// 设置处理器的类型级基础路径
    pub fn with_base_path(mut self, base: impl Into<String>) -> Self {
        if let ComponentKind::Handler { base_path } = &mut self.kind {
            *base_path = Some(base.into());
        }
        self
    }

    /// 设置服务的显式注册名称
    pub fn with_declared_name(mut self, name: impl Into<String>) -> Self {
        if let ComponentKind::Service { name: declared } = &mut self.kind {
            *declared = Some(name.into());
        }
        self
    }

    /// 设置零参构造器
    pub fn with_constructor<F>(mut self, constructor: F) -> Self
    where
        F: Fn() -> Result<SharedInstance, BoxError> + Send + Sync + 'static,
    {
        self.constructor = Some(Arc::new(constructor));
        self
    }

    /// 追加能力绑定
    pub fn with_capability(mut self, capability: CapabilityBinding) -> Self {
        self.capabilities.push(capability);
        self
    }

    /// 追加注入点
    pub fn with_injection_point(mut self, point: InjectionPoint) -> Self {
        self.injection_points.push(point);
        self
    }

    /// 追加路由声明
    pub fn with_route(mut self, route: RouteSpec) -> Self {
        self.routes.push(route);
        self
    }

    /// 类型信息
    pub fn type_info(&self) -> &TypeInfo {
        &self.type_info
    }

    /// 组件分类
    pub fn kind(&self) -> &ComponentKind {
        &self.kind
    }

    /// 派生组件描述符
    pub fn descriptor(&self) -> ComponentDescriptor {
        ComponentDescriptor::new(&self.type_info, self.kind.clone())
    }

    /// 调用零参构造器创建实例
    pub fn construct(&self) -> Result<SharedInstance, BoxError> {
        match &self.constructor {
            Some(constructor) => constructor(),
            None => Err(format!("组件未提供构造器: {}", self.type_info.qualified_name).into()),
        }
    }

    /// 能力绑定列表
    pub fn capabilities(&self) -> &[CapabilityBinding] {
        &self.capabilities
    }

    /// 注入点列表
    pub fn injection_points(&self) -> &[InjectionPoint] {
        &self.injection_points
    }

    /// 路由声明列表
    pub fn routes(&self) -> &[RouteSpec] {
        &self.routes
    }
}

impl fmt::Debug for ComponentDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentDefinition")
            .field("type_info", &self.type_info)
            .field("kind", &self.kind)
            .field("constructor", &self.constructor.as_ref().map(|_| "<function>"))
            .field("capabilities", &self.capabilities)
            .field("injection_points", &self.injection_points)
            .field("routes", &self.routes)
            .finish()
    }
}

/// 组件定义目录
///
/// 启动时登记的全部组件定义，按完全限定名称有序存放；
/// 同时充当扫描器遍历的命名空间树。
#[derive(Debug, Default)]
pub struct DefinitionCatalog {
    definitions: BTreeMap<String, Arc<ComponentDefinition>>,
}

impl DefinitionCatalog {
    /// 创建空目录
    pub fn new() -> Self {
        Self::default()
    }

    /// 登记一条组件定义（同名覆盖）
    pub fn register(&mut self, definition: ComponentDefinition) {
        self.definitions.insert(
            definition.type_info().qualified_name.clone(),
            Arc::new(definition),
        );
    }

    /// 构建器风格的登记
    pub fn with_definition(mut self, definition: ComponentDefinition) -> Self {
        self.register(definition);
        self
    }

    /// 按完全限定名称查找定义
    pub fn lookup(&self, qualified_name: &str) -> Option<Arc<ComponentDefinition>> {
        self.definitions.get(qualified_name).cloned()
    }

    /// 判断根包下是否存在任何定义
    pub fn contains_root(&self, root: &str) -> bool {
        let prefix = format!("{root}{PACKAGE_SEPARATOR}");
        self.definitions
            .keys()
            .any(|name| name == root || name.starts_with(&prefix))
    }

    /// 列出根包下全部限定名称（字典序）
    pub fn names_under(&self, root: &str) -> Vec<String> {
        let prefix = format!("{root}{PACKAGE_SEPARATOR}");
        self.definitions
            .keys()
            .filter(|name| *name == root || name.starts_with(&prefix))
            .cloned()
            .collect()
    }

    /// 已登记的定义数量
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// 目录是否为空
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}
