//! 服务器级错误

use thiserror::Error;

/// 服务器启动/运行错误
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Startup error: {0}")]
    Startup(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// 服务器级 Result 别名
pub type Result<T> = std::result::Result<T, ServerError>;
