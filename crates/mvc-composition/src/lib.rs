//! # MVC 组合层
//!
//! 把扫描、注册、注入、路由表构建四个阶段按严格顺序组合成一次完整的
//! 初始化流程，产出只读的应用上下文供请求分发使用。
//!
//! ## 基本使用
//!
//! ```rust,no_run
//! use mvc_common::{DefinitionCatalog, Properties, RequestContext, BufferedResponse};
//! use mvc_composition::MvcBootstrapper;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let catalog = DefinitionCatalog::new();
//!     let properties = Properties::from_text("scanPackage=demo");
//!
//!     // 初始化：扫描 -> 注册 -> 注入 -> 路由表
//!     let context = MvcBootstrapper::new(catalog, properties).bootstrap().await?;
//!
//!     // 每个请求只读使用初始化产出的结构
//!     let dispatcher = context.dispatcher();
//!     let ctx = RequestContext::parse("/demo/get?name=bob");
//!     let mut response = BufferedResponse::new();
//!     dispatcher.serve(&ctx, &mut response).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod bootstrapper;
pub mod context;

pub use bootstrapper::MvcBootstrapper;
pub use context::MvcContext;

// 重新导出错误类型
pub use mvc_common::MvcError;
