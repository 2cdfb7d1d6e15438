//! 请求分发器实现

use async_trait::async_trait;
use mvc_abstractions::{
    normalize_request_path, BindingMode, ComponentRegistry, DispatchOutcome, RequestDispatcher,
    Route, RouteTable,
};
use mvc_common::{
    render_values, BoundArg, DispatchError, DispatchResult, ParamSpec, RequestContext,
    ResponseResult, ResponseWriter,
};
use std::sync::Arc;
use tracing::{debug, error, info};
use uuid::Uuid;

/// 未命中路由时写出的响应体
pub const NOT_FOUND_BODY: &str = "404 Not Found";

/// 分发故障响应体的前缀
pub const ERROR_BODY_PREFIX: &str = "500 Exception, Details:";

/// 基于路由表的请求分发器
///
/// 持有初始化阶段产出的只读共享结构，可被任意多个请求任务并发调用。
pub struct TableDispatcher {
    registry: Arc<ComponentRegistry>,
    routes: Arc<RouteTable>,
    binding_mode: BindingMode,
}

impl TableDispatcher {
    /// 创建新的分发器
    pub fn new(registry: Arc<ComponentRegistry>, routes: Arc<RouteTable>) -> Self {
        Self {
            registry,
            routes,
            binding_mode: BindingMode::default(),
        }
    }

    /// 设置标量参数绑定模式
    pub fn with_binding_mode(mut self, mode: BindingMode) -> Self {
        self.binding_mode = mode;
        self
    }

    /// 当前绑定模式
    pub fn binding_mode(&self) -> BindingMode {
        self.binding_mode
    }

    /// 解析一个标量参数的原始文本值
    fn scalar_value(&self, ctx: &RequestContext, declared_name: &str) -> Option<String> {
        match self.binding_mode {
            BindingMode::ByName => ctx.values_of(declared_name).map(render_values),
            // 兼容模式：遍历全部请求参数，最后一个条目覆盖所有标量参数
            BindingMode::LastValueWins => ctx
                .parameters()
                .last()
                .map(|(_, values)| render_values(values)),
        }
    }

    /// 按方法描述符逐位绑定调用参数
    fn bind_args(&self, route: &Route, ctx: &RequestContext) -> DispatchResult<Vec<BoundArg>> {
        let mut args = Vec::with_capacity(route.descriptor().params.len());
        for param in &route.descriptor().params {
            let bound = match param {
                ParamSpec::Request => BoundArg::Request,
                ParamSpec::Response => BoundArg::Response,
                ParamSpec::Text { name } => BoundArg::Text(self.scalar_value(ctx, name)),
                ParamSpec::Integer { name } => match self.scalar_value(ctx, name) {
                    None => BoundArg::Integer(None),
                    Some(raw) => {
                        let parsed =
                            raw.parse::<i64>()
                                .map_err(|_| DispatchError::ParameterBinding {
                                    parameter: name.clone(),
                                    value: raw.clone(),
                                })?;
                        BoundArg::Integer(Some(parsed))
                    }
                },
                ParamSpec::Other { .. } => BoundArg::Unbound,
            };
            args.push(bound);
        }
        Ok(args)
    }

    /// 分发并把结果写回响应：未命中写 404 字面量，故障写诊断体
    pub async fn serve(
        &self,
        ctx: &RequestContext,
        response: &mut dyn ResponseWriter,
    ) -> ResponseResult<()> {
        match self.dispatch(ctx, response).await {
            Ok(DispatchOutcome::Completed) => Ok(()),
            Ok(DispatchOutcome::NotFound) => response.write(NOT_FOUND_BODY.as_bytes()),
            Err(fault) => {
                error!("请求分发失败: {}", fault);
                response.write(render_error_body(&fault).as_bytes())
            }
        }
    }
}

#[async_trait]
impl RequestDispatcher for TableDispatcher {
    async fn dispatch(
        &self,
        ctx: &RequestContext,
        response: &mut dyn ResponseWriter,
    ) -> DispatchResult<DispatchOutcome> {
        let request_id = Uuid::new_v4();
        let path = normalize_request_path(ctx.path(), ctx.context_prefix());

        let Some(route) = self.routes.lookup(&path) else {
            info!("未命中路由: {} (请求 {})", path, request_id);
            return Ok(DispatchOutcome::NotFound);
        };

        let args = self.bind_args(route, ctx)?;

        let Some(owner) = self.registry.get(route.owner_name()) else {
            return Err(DispatchError::HandlerNotRegistered {
                component_name: route.owner_name().to_string(),
            });
        };

        debug!(
            "分发请求 {} : {} -> {}.{}",
            request_id,
            path,
            route.owner_name(),
            route.descriptor().name
        );
        route
            .invoke(owner.instance(), ctx, response, &args)
            .map_err(|source| DispatchError::HandlerFailed { path, source })?;

        Ok(DispatchOutcome::Completed)
    }
}

/// 展开分发故障的诊断条目：错误链逐层一条
pub fn error_trace(fault: &DispatchError) -> Vec<String> {
    let mut frames = vec![fault.to_string()];
    let mut source = std::error::Error::source(fault);
    while let Some(cause) = source {
        frames.push(cause.to_string());
        source = cause.source();
    }
    frames
}

/// 渲染分发故障响应体
///
/// 诊断条目剥除 `[`、`]` 字符后逐行写出，行以 CRLF 分隔。
pub fn render_error_body(fault: &DispatchError) -> String {
    let lines: Vec<String> = error_trace(fault)
        .iter()
        .map(|frame| frame.replace(['[', ']'], ""))
        .collect();
    format!("{ERROR_BODY_PREFIX}\r\n{}", lines.join("\r\n"))
}
