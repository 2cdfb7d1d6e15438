//! 请求/响应边界定义
//!
//! 请求上下文与响应写出器均由外部传输层持有，核心只读使用。

use crate::errors::{ResponseError, ResponseResult};
use parking_lot::Mutex;
use std::sync::Arc;

/// 请求上下文
///
/// 参数表保持插入顺序，同名参数的多个值合并到同一条目。
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    /// 原始请求路径
    path: String,
    /// 部署上下文前缀
    context_prefix: String,
    /// 多值参数表（保持插入顺序）
    parameters: Vec<(String, Vec<String>)>,
}

impl RequestContext {
    /// 创建新的请求上下文
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            context_prefix: String::new(),
            parameters: Vec::new(),
        }
    }

    /// 从 `path?a=1&b=2` 形式的请求目标解析上下文
    ///
    /// 传输层的便捷入口，不做百分号解码。
    pub fn parse(target: &str) -> Self {
        match target.split_once('?') {
            Some((path, query)) => {
                let mut ctx = Self::new(path);
                for pair in query.split('&').filter(|p| !p.is_empty()) {
                    let (name, value) = pair.split_once('=').unwrap_or((pair, ""));
                    ctx.append_parameter(name, value);
                }
                ctx
            }
            None => Self::new(target),
        }
    }

    /// 设置部署上下文前缀
    pub fn with_context_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.context_prefix = prefix.into();
        self
    }

    /// 追加一个参数值
    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.append_parameter(&name.into(), &value.into());
        self
    }

    fn append_parameter(&mut self, name: &str, value: &str) {
        if let Some((_, values)) = self.parameters.iter_mut().find(|(n, _)| n == name) {
            values.push(value.to_string());
        } else {
            self.parameters
                .push((name.to_string(), vec![value.to_string()]));
        }
    }

    /// 请求路径
    pub fn path(&self) -> &str {
        &self.path
    }

    /// 部署上下文前缀
    pub fn context_prefix(&self) -> &str {
        &self.context_prefix
    }

    /// 完整参数表（插入顺序）
    pub fn parameters(&self) -> &[(String, Vec<String>)] {
        &self.parameters
    }

    /// 按名称查找参数值序列
    pub fn values_of(&self, name: &str) -> Option<&[String]> {
        self.parameters
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, values)| values.as_slice())
    }
}

/// 多值参数的文本渲染：逗号拼接
pub fn render_values(values: &[String]) -> String {
    values.join(",")
}

/// 已绑定的调用参数
///
/// 分发器按方法描述符逐位绑定后交给处理器调用闭包。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoundArg {
    /// 请求对象占位（调用闭包直接使用活动上下文）
    Request,
    /// 响应对象占位（调用闭包直接使用响应写出器）
    Response,
    /// 文本参数，缺失时为 None
    Text(Option<String>),
    /// 整数参数，缺失时保持零值语义（None）
    Integer(Option<i64>),
    /// 声明类型不受支持，保持未绑定
    Unbound,
}

impl BoundArg {
    /// 文本参数值，缺失时为空串
    pub fn text_or_default(&self) -> String {
        match self {
            Self::Text(Some(value)) => value.clone(),
            _ => String::new(),
        }
    }

    /// 整数参数值，缺失时为零
    pub fn integer_or_default(&self) -> i64 {
        match self {
            Self::Integer(Some(value)) => *value,
            _ => 0,
        }
    }
}

/// 响应写出器
///
/// 由外部传输层实现并持有；写出失败以 [`ResponseError`] 上浮。
/// 底层资源的释放依赖实现自身的 Drop 语义，任何失败路径都不泄漏。
pub trait ResponseWriter: Send {
    /// 写出响应体字节
    fn write(&mut self, bytes: &[u8]) -> ResponseResult<()>;
}

/// 内存缓冲响应
///
/// 测试与演示用实现，可克隆句柄在分发完成后读取写入内容。
#[derive(Debug, Clone, Default)]
pub struct BufferedResponse {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl BufferedResponse {
    /// 创建新的缓冲响应
    pub fn new() -> Self {
        Self::default()
    }

    /// 获取共享读取句柄
    pub fn handle(&self) -> Self {
        self.clone()
    }

    /// 读取已写入内容的文本形式
    pub fn body_string(&self) -> String {
        String::from_utf8_lossy(&self.buffer.lock()).into_owned()
    }

    /// 取出已写入的全部字节并清空缓冲
    pub fn take(&self) -> Vec<u8> {
        std::mem::take(&mut *self.buffer.lock())
    }
}

impl ResponseWriter for BufferedResponse {
    fn write(&mut self, bytes: &[u8]) -> Result<(), ResponseError> {
        self.buffer.lock().extend_from_slice(bytes);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_request_target() {
        let ctx = RequestContext::parse("/demo/get?name=bob&tag=a&tag=b");
        assert_eq!(ctx.path(), "/demo/get");
        assert_eq!(ctx.values_of("name"), Some(&["bob".to_string()][..]));
        assert_eq!(
            ctx.values_of("tag"),
            Some(&["a".to_string(), "b".to_string()][..])
        );
        assert_eq!(ctx.parameters().len(), 2);
    }

    #[test]
    fn test_render_values_joins_with_comma() {
        let values = vec!["a".to_string(), "b".to_string()];
        assert_eq!(render_values(&values), "a,b");
        assert_eq!(render_values(&[]), "");
    }

    #[test]
    fn test_buffered_response_collects_writes() {
        let mut response = BufferedResponse::new();
        let handle = response.handle();
        response.write(b"hello").unwrap();
        response.write(b"bob").unwrap();
        assert_eq!(handle.body_string(), "hellobob");
    }
}
