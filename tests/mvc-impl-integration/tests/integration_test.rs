//! 容器各阶段的跨 crate 集成测试
//!
//! 覆盖显式命名服务的注册与注入、只读共享结构的并发分发。

use mvc_abstractions::{
    ComponentScanner, DependencyInjector, DispatchOutcome, RegistryBuilder, RequestDispatcher,
    RouteTableBuilder,
};
use mvc_common::{
    BoundArg, BufferedResponse, CapabilityBinding, ComponentDefinition, DefinitionCatalog,
    InjectionPoint, ParamSpec, RequestContext, ResponseWriter, RouteSpec, SharedInstance,
};
use mvc_impl::{
    CatalogRegistryBuilder, CatalogScanner, HandlerRouteBuilder, RegistryInjector, TableDispatcher,
};
use once_cell::sync::OnceCell;
use std::sync::Arc;

const MEMBER_CAPABILITY: &str = "shop::service::MemberCapability";

/// 会员查询能力
trait MemberCapability: Send + Sync + std::fmt::Debug {
    fn find(&self, keyword: &str) -> String;
}

/// 会员服务：声明了显式注册名称
#[derive(Debug, Default)]
struct MemberService;

impl MemberCapability for MemberService {
    fn find(&self, keyword: &str) -> String {
        format!("member:{keyword}")
    }
}

/// 订单处理器：按显式名称注入会员服务
#[derive(Debug, Default)]
struct OrderAction {
    members: OnceCell<Arc<dyn MemberCapability>>,
}

fn member_service_definition() -> ComponentDefinition {
    ComponentDefinition::service("shop::service::MemberService")
        .with_declared_name("memberService")
        .with_constructor(|| Ok(Arc::new(MemberService) as SharedInstance))
        .with_capability(CapabilityBinding::new(MEMBER_CAPABILITY, |instance| {
            let concrete = Arc::clone(instance).downcast::<MemberService>().ok()?;
            let view: Arc<dyn MemberCapability> = concrete;
            Some(Arc::new(view) as SharedInstance)
        }))
}

fn order_action_definition() -> ComponentDefinition {
    ComponentDefinition::handler("shop::action::OrderAction")
        .with_base_path("/order")
        .with_constructor(|| Ok(Arc::new(OrderAction::default()) as SharedInstance))
        .with_injection_point(
            InjectionPoint::new("members", MEMBER_CAPABILITY, |owner, candidate| {
                let Some(action) = owner.downcast_ref::<OrderAction>() else {
                    return false;
                };
                let Some(view) = candidate.downcast_ref::<Arc<dyn MemberCapability>>() else {
                    return false;
                };
                action.members.set(Arc::clone(view)).ok();
                true
            })
            .with_explicit_name("memberService"),
        )
        .with_route(
            RouteSpec::new("list", "list", |owner, _ctx, response, args| {
                let action = owner
                    .downcast_ref::<OrderAction>()
                    .ok_or("处理器类型不匹配")?;
                let keyword = args.get(2).map(BoundArg::text_or_default).unwrap_or_default();
                let body = match action.members.get() {
                    Some(service) => service.find(&keyword),
                    None => "member:unknown".to_string(),
                };
                response.write(body.as_bytes())?;
                Ok(())
            })
            .with_param(ParamSpec::Request)
            .with_param(ParamSpec::Response)
            .with_param(ParamSpec::text("keyword")),
        )
}

fn shop_catalog() -> Arc<DefinitionCatalog> {
    Arc::new(
        DefinitionCatalog::new()
            .with_definition(order_action_definition())
            .with_definition(member_service_definition()),
    )
}

async fn build_dispatcher(catalog: Arc<DefinitionCatalog>) -> TableDispatcher {
    let scanner = CatalogScanner::new(Arc::clone(&catalog));
    let candidates = scanner.scan("shop").await.unwrap();

    let builder = CatalogRegistryBuilder::new(Arc::clone(&catalog));
    let (registry, warnings) = builder.build(&candidates).await.unwrap();
    assert!(warnings.is_empty());

    RegistryInjector::new().inject(&registry).await;
    let (routes, _) = HandlerRouteBuilder::new().build_routes(&registry).await;
    TableDispatcher::new(Arc::new(registry), Arc::new(routes))
}

#[tokio::test]
async fn test_named_service_registered_exactly_once() {
    let catalog = shop_catalog();
    let scanner = CatalogScanner::new(Arc::clone(&catalog));
    let candidates = scanner.scan("shop").await.unwrap();

    let builder = CatalogRegistryBuilder::new(Arc::clone(&catalog));
    let (registry, _) = builder.build(&candidates).await.unwrap();

    // 显式名称优先，不再按能力限定名登记
    assert!(registry.contains("memberService"));
    assert!(!registry.contains(MEMBER_CAPABILITY));
    assert!(registry.contains("orderAction"));
    assert_eq!(registry.len(), 2);
}

#[tokio::test]
async fn test_explicit_name_injection_holds_registry_reference() {
    let catalog = shop_catalog();
    let scanner = CatalogScanner::new(Arc::clone(&catalog));
    let candidates = scanner.scan("shop").await.unwrap();

    let builder = CatalogRegistryBuilder::new(Arc::clone(&catalog));
    let (registry, _) = builder.build(&candidates).await.unwrap();
    let warnings = RegistryInjector::new().inject(&registry).await;
    assert!(warnings.is_empty());

    let action = registry
        .get("orderAction")
        .unwrap()
        .instance()
        .downcast_ref::<OrderAction>()
        .unwrap();
    let injected = action.members.get().expect("注入后字段应已绑定");

    let service_entry = registry.get("memberService").unwrap();
    assert_eq!(
        Arc::as_ptr(injected) as *const (),
        Arc::as_ptr(service_entry.instance()) as *const ()
    );
}

#[tokio::test]
async fn test_dispatch_through_injected_named_service() {
    let dispatcher = build_dispatcher(shop_catalog()).await;
    let ctx = RequestContext::parse("/order/list?keyword=bob");
    let mut response = BufferedResponse::new();

    let outcome = dispatcher.dispatch(&ctx, &mut response).await.unwrap();
    assert_eq!(outcome, DispatchOutcome::Completed);
    assert_eq!(response.body_string(), "member:bob");
}

#[tokio::test]
async fn test_concurrent_dispatch_over_shared_context() {
    let dispatcher = Arc::new(build_dispatcher(shop_catalog()).await);

    let mut handles = Vec::new();
    for index in 0..8 {
        let dispatcher = Arc::clone(&dispatcher);
        handles.push(tokio::spawn(async move {
            let ctx = RequestContext::parse(&format!("/order/list?keyword=user{index}"));
            let mut response = BufferedResponse::new();
            let outcome = dispatcher.dispatch(&ctx, &mut response).await.unwrap();
            assert_eq!(outcome, DispatchOutcome::Completed);
            assert_eq!(response.body_string(), format!("member:user{index}"));
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }
}
