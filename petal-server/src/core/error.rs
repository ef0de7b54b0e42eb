use thiserror::Error;

/// 服务器启动/运行期错误
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),
}

/// 服务器层的 Result 类型别名
pub type Result<T> = std::result::Result<T, ServerError>;
