//! 请求分发器抽象接口

use async_trait::async_trait;
use mvc_common::{DispatchResult, RequestContext, ResponseWriter};

/// 标量参数绑定模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BindingMode {
    /// 按声明的参数名称查找请求值（默认行为）
    #[default]
    ByName,
    /// 兼容模式：遍历全部请求参数，最后一个条目覆盖所有标量参数。
    /// 该模式逐位复刻历史行为，仅用于行为对齐测试。
    LastValueWins,
}

/// 分发结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// 处理器已执行，响应体由处理器写出
    Completed,
    /// 规范化路径未命中路由表
    NotFound,
}

/// 请求分发器 trait
///
/// 初始化完成后可被任意多个请求任务并发调用；
/// 分发过程对注册表与路由表只读。
#[async_trait]
pub trait RequestDispatcher: Send + Sync {
    /// 分发一次请求
    async fn dispatch(
        &self,
        ctx: &RequestContext,
        response: &mut dyn ResponseWriter,
    ) -> DispatchResult<DispatchOutcome>;
}
