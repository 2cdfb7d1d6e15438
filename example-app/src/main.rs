//! # 示例应用程序
//!
//! 演示如何使用 LightMVC 容器：登记演示组件、执行初始化流程，
//! 并把若干示例请求送入分发器。网络监听由外部传输层负责，
//! 这里直接以内存请求演示完整的分发语义。

use anyhow::Context;
use clap::Parser;
use mvc_abstractions::BindingMode;
use mvc_common::{
    BoundArg, BufferedResponse, CapabilityBinding, ComponentDefinition, DefinitionCatalog,
    InjectionPoint, ParamSpec, Properties, RequestContext, ResponseWriter, RouteSpec,
    SharedInstance,
};
use mvc_composition::{MvcBootstrapper, MvcContext};
use once_cell::sync::OnceCell;
use std::sync::Arc;
use tracing::info;

/// 命令行参数
#[derive(Parser, Debug)]
#[command(name = "example-app")]
#[command(about = "LightMVC 示例应用")]
struct Args {
    /// 启动属性文件路径
    #[arg(short, long, default_value = "config/application.properties")]
    config: String,

    /// 启用历史兼容的标量参数绑定模式
    #[arg(long)]
    compat_binding: bool,

    /// 日志级别
    #[arg(long, default_value = "info")]
    log_level: String,
}

/// 问候能力
trait GreetingCapability: Send + Sync + std::fmt::Debug {
    fn greet(&self, name: &str) -> String;
}

/// 问候服务：未声明名称，按能力限定名登记
#[derive(Debug, Default)]
struct DemoGreetingService;

impl GreetingCapability for DemoGreetingService {
    fn greet(&self, name: &str) -> String {
        format!("hello{name}")
    }
}

const GREETING_CAPABILITY: &str = "demo::service::GreetingCapability";

/// 演示处理器：基础路径 /demo，注入问候服务
#[derive(Debug, Default)]
struct DemoAction {
    greeting: OnceCell<Arc<dyn GreetingCapability>>,
}

impl DemoAction {
    fn greet(&self, name: &str) -> String {
        match self.greeting.get() {
            Some(service) => service.greet(name),
            None => format!("hello{name}"),
        }
    }
}

/// 登记全部演示组件定义
fn build_catalog() -> DefinitionCatalog {
    DefinitionCatalog::new()
        .with_definition(demo_action_definition())
        .with_definition(greeting_service_definition())
}

fn demo_action_definition() -> ComponentDefinition {
    ComponentDefinition::handler("demo::action::DemoAction")
        .with_base_path("/demo")
        .with_constructor(|| Ok(Arc::new(DemoAction::default()) as SharedInstance))
        .with_injection_point(InjectionPoint::new(
            "greeting",
            GREETING_CAPABILITY,
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
                response.write(action.greet(&name).as_bytes())?;
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
            .with_param(ParamSpec::integer("id")),
        )
}

fn greeting_service_definition() -> ComponentDefinition {
    ComponentDefinition::service("demo::service::DemoGreetingService")
        .with_constructor(|| Ok(Arc::new(DemoGreetingService) as SharedInstance))
        .with_capability(CapabilityBinding::new(GREETING_CAPABILITY, |instance| {
            let concrete = Arc::clone(instance)
                .downcast::<DemoGreetingService>()
                .ok()?;
            let view: Arc<dyn GreetingCapability> = concrete;
            Some(Arc::new(view) as SharedInstance)
        }))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 初始化日志
    tracing_subscriber::fmt()
        .with_env_filter(args.log_level.clone())
        .init();

    info!("启动 LightMVC 示例应用");

    // 读取启动属性：文件存在则加载，否则使用内置缺省
    let properties = if std::path::Path::new(&args.config).exists() {
        Properties::load_file(&args.config).context("加载启动属性失败")?
    } else {
        info!("属性文件 {} 不存在，使用内置缺省配置", args.config);
        Properties::from_text("scanPackage=demo")
    };

    // 初始化：扫描 -> 注册 -> 注入 -> 路由表
    let context = MvcBootstrapper::new(build_catalog(), properties)
        .bootstrap()
        .await
        .context("框架初始化失败")?;

    // 演示请求分发
    demonstrate_dispatch(&context, args.compat_binding).await?;

    info!("示例应用结束");
    Ok(())
}

/// 演示请求分发功能
async fn demonstrate_dispatch(context: &MvcContext, compat_binding: bool) -> anyhow::Result<()> {
    let mode = if compat_binding {
        BindingMode::LastValueWins
    } else {
        BindingMode::ByName
    };
    let dispatcher = context.dispatcher_with_mode(mode);

    let samples = [
        "/demo/get?name=bob",
        "/demo/add?number1=4&number2=6",
        "/demo/delete?id=7",
        "/demo/missing",
    ];

    for sample in samples {
        let ctx = RequestContext::parse(sample);
        let mut response = BufferedResponse::new();
        let handle = response.handle();
        dispatcher.serve(&ctx, &mut response).await?;
        info!("请求 {} -> 响应 {:?}", sample, handle.body_string());
    }

    Ok(())
}
