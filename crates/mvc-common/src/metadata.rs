//! 元数据定义
//!
//! 提供组件类型信息与分类标记

/// 包路径分隔符
pub const PACKAGE_SEPARATOR: &str = "::";

/// 类型信息
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeInfo {
    /// 完全限定类型名称，如 `demo::action::DemoAction`
    pub qualified_name: String,
}

impl TypeInfo {
    /// 创建新的类型信息
    pub fn new(qualified_name: impl Into<String>) -> Self {
        Self {
            qualified_name: qualified_name.into(),
        }
    }

    /// 获取简短的类型名称（不包含包路径）
    pub fn simple_name(&self) -> &str {
        self.qualified_name
            .rsplit(PACKAGE_SEPARATOR)
            .next()
            .unwrap_or(&self.qualified_name)
    }

    /// 获取默认的注册名称：简单名称首字母小写
    pub fn component_name(&self) -> String {
        lower_first(self.simple_name())
    }
}

/// 仅转换首字母为小写
pub fn lower_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// 组件分类标记
///
/// 对应类型级元数据标记：处理器、服务或未标记。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComponentKind {
    /// 请求处理器，可声明类型级基础路径
    Handler {
        /// 类型级路由标记携带的基础路径
        base_path: Option<String>,
    },
    /// 服务组件，可声明显式注册名称
    Service {
        /// 显式注册名称
        name: Option<String>,
    },
    /// 未标记类型，注册阶段直接忽略
    Unmarked,
}

impl ComponentKind {
    /// 是否为处理器
    pub fn is_handler(&self) -> bool {
        matches!(self, Self::Handler { .. })
    }

    /// 是否为服务
    pub fn is_service(&self) -> bool {
        matches!(self, Self::Service { .. })
    }

    /// 处理器的基础路径（非处理器返回 None）
    pub fn base_path(&self) -> Option<&str> {
        match self {
            Self::Handler { base_path } => base_path.as_deref(),
            _ => None,
        }
    }

    /// 服务的显式名称（空白视为未声明）
    pub fn declared_name(&self) -> Option<&str> {
        match self {
            Self::Service { name } => name.as_deref().map(str::trim).filter(|n| !n.is_empty()),
            _ => None,
        }
    }
}

/// 组件描述符
///
/// 每个候选类型在扫描分类时派生一次，之后不再变化。
#[derive(Debug, Clone)]
pub struct ComponentDescriptor {
    /// 完全限定类型名称
    pub qualified_name: String,
    /// 组件分类
    pub kind: ComponentKind,
    /// 显式声明的注册名称（仅服务组件可能有）
    pub declared_name: Option<String>,
}

impl ComponentDescriptor {
    /// 根据类型信息与分类派生描述符
    pub fn new(type_info: &TypeInfo, kind: ComponentKind) -> Self {
        let declared_name = kind.declared_name().map(str::to_string);
        Self {
            qualified_name: type_info.qualified_name.clone(),
            kind,
            declared_name,
        }
    }
}
