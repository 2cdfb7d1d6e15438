//! 测试夹具：演示处理器与问候服务组件

use mvc_common::{
    BoundArg, CapabilityBinding, ComponentDefinition, DefinitionCatalog, InjectionPoint,
    ParamSpec, ResponseWriter, RouteSpec, SharedInstance,
};
use once_cell::sync::OnceCell;
use std::sync::Arc;

pub const QUALIFIED_ACTION: &str = "demo::action::DemoAction";
pub const QUALIFIED_SERVICE: &str = "demo::service::GreetingCapability";
pub const QUALIFIED_PLAIN: &str = "demo::plain::PlainType";

/// 问候能力
pub trait GreetingCapability: Send + Sync + std::fmt::Debug {
    fn greet(&self, name: &str) -> String;
}

/// 问候服务实现
#[derive(Debug, Default)]
pub struct GreetingService;

impl GreetingCapability for GreetingService {
    fn greet(&self, name: &str) -> String {
        format!("hello{name}")
    }
}

/// 演示处理器
#[derive(Debug, Default)]
pub struct DemoAction {
    pub greeting: OnceCell<Arc<dyn GreetingCapability>>,
}

/// 演示处理器的组件定义：基础路径 `/demo`，路由 get/add/delete/boom
pub fn demo_action_definition() -> ComponentDefinition {
    ComponentDefinition::handler(QUALIFIED_ACTION)
        .with_base_path("/demo")
        .with_constructor(|| Ok(Arc::new(DemoAction::default()) as SharedInstance))
        .with_injection_point(InjectionPoint::new(
            "greeting",
            QUALIFIED_SERVICE,
            |owner, candidate| {
                let Some(action) = owner.downcast_ref::<DemoAction>() else {
                    return false;
                };
                let Some(view) = candidate.downcast_ref::<Arc<dyn GreetingCapability>>() else {
                    return false;
                };
                action.greeting.set(Arc::clone(view)).ok();
                true
            },
        ))
        .with_route(
            RouteSpec::new("get", "get", |owner, _ctx, response, args| {
                let action = owner
                    .downcast_ref::<DemoAction>()
                    .ok_or("处理器类型不匹配")?;
                let name = args.get(2).map(BoundArg::text_or_default).unwrap_or_default();
                let body = match action.greeting.get() {
                    Some(service) => service.greet(&name),
                    None => format!("hello{name}"),
                };
                response.write(body.as_bytes())?;
                Ok(())
            })
            .with_param(ParamSpec::Request)
            .with_param(ParamSpec::Response)
            .with_param(ParamSpec::text("name")),
        )
        .with_route(
            RouteSpec::new("add", "add", |owner, _ctx, response, args| {
                owner
                    .downcast_ref::<DemoAction>()
                    .ok_or("处理器类型不匹配")?;
                let number1 = args.get(2).map(BoundArg::integer_or_default).unwrap_or_default();
                let number2 = args.get(3).map(BoundArg::integer_or_default).unwrap_or_default();
                let body = format!("{number1}+{number2}={}", number1 + number2);
                response.write(body.as_bytes())?;
                Ok(())
            })
            .with_param(ParamSpec::Request)
            .with_param(ParamSpec::Response)
            .with_param(ParamSpec::integer("number1"))
            .with_param(ParamSpec::integer("number2")),
        )
        .with_route(
            RouteSpec::new("delete", "delete", |owner, _ctx, _response, _args| {
                owner
                    .downcast_ref::<DemoAction>()
                    .ok_or("处理器类型不匹配")?;
                Ok(())
            })
            .with_param(ParamSpec::Request)
            .with_param(ParamSpec::Response)
            .with_param(ParamSpec::integer("id"))
            .with_param(ParamSpec::other("demo::model::AuditTrail")),
        )
        .with_route(
            RouteSpec::new("boom", "boom", |_owner, _ctx, _response, _args| {
                Err("模拟的处理器故障".into())
            })
            .with_param(ParamSpec::Request)
            .with_param(ParamSpec::Response),
        )
}

/// 问候服务的组件定义：未声明名称，按能力登记
pub fn greeting_service_definition() -> ComponentDefinition {
    ComponentDefinition::service("demo::service::GreetingService")
        .with_constructor(|| Ok(Arc::new(GreetingService) as SharedInstance))
        .with_capability(CapabilityBinding::new(QUALIFIED_SERVICE, |instance| {
            let concrete = Arc::clone(instance).downcast::<GreetingService>().ok()?;
            let view: Arc<dyn GreetingCapability> = concrete;
            Some(Arc::new(view) as SharedInstance)
        }))
}

/// 演示用定义目录：处理器 + 服务 + 未标记类型
pub fn demo_catalog() -> Arc<DefinitionCatalog> {
    let mut catalog = DefinitionCatalog::new();
    catalog.register(demo_action_definition());
    catalog.register(greeting_service_definition());
    catalog.register(ComponentDefinition::unmarked(QUALIFIED_PLAIN));
    Arc::new(catalog)
}
