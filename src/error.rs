//! Error types for byte-channel
//!
//! byte-channel 的错误类型

use std::io;
use thiserror::Error as ThisError;

/// Error type for buffer and channel operations
///
/// 缓冲区与通道操作的错误类型
///
/// Buffer contract violations (`BufferOverflow`, `BufferUnderflow`,
/// `InvalidMarkState`, `ReadOnlyBuffer`, `InvalidArgument`) are reported before any
/// byte or cursor is touched, so a failed call leaves the buffer unchanged.
///
/// 缓冲区契约违例在修改任何字节或游标之前报告，失败的调用不会改变缓冲区状态。
#[derive(Debug, ThisError)]
pub enum Error {
    /// Malformed construction or cursor parameters
    ///
    /// 构造参数或游标参数非法
    #[error("invalid argument: {reason} / 参数非法: {reason}")]
    InvalidArgument { reason: String },

    /// A write would push `position` past `limit`
    ///
    /// 写入会使 `position` 越过 `limit`
    #[error(
        "buffer overflow: {requested} bytes requested, {remaining} remaining / 缓冲区溢出：请求 {requested} 字节，剩余 {remaining} 字节"
    )]
    BufferOverflow { requested: usize, remaining: usize },

    /// A read would push `position` past `limit`
    ///
    /// 读取会使 `position` 越过 `limit`
    #[error(
        "buffer underflow: {requested} bytes requested, {remaining} remaining / 缓冲区下溢：请求 {requested} 字节，剩余 {remaining} 字节"
    )]
    BufferUnderflow { requested: usize, remaining: usize },

    /// `reset()` called while no mark is set
    ///
    /// 未设置 mark 时调用了 `reset()`
    ///
    /// [`flip`](crate::ByteBuffer::flip), [`rewind`](crate::ByteBuffer::rewind) and
    /// [`clear`](crate::ByteBuffer::clear) discard the mark, so a `reset()` after any of
    /// them also fails with this error.
    ///
    /// [`flip`](crate::ByteBuffer::flip)、[`rewind`](crate::ByteBuffer::rewind) 和
    /// [`clear`](crate::ByteBuffer::clear) 会丢弃 mark，之后调用 `reset()` 同样返回此错误。
    #[error("mark is not set / 未设置标记")]
    InvalidMarkState,

    /// Mutation attempted on a read-only buffer
    ///
    /// 尝试修改只读缓冲区
    #[error("buffer is read-only / 缓冲区为只读")]
    ReadOnlyBuffer,

    /// Operation on a channel that has already been closed
    ///
    /// 对已关闭的通道进行操作
    #[error("channel is closed / 通道已关闭")]
    ClosedChannel,

    /// I/O error
    ///
    /// I/O 错误
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    pub(crate) fn invalid_argument(reason: impl Into<String>) -> Self {
        Error::InvalidArgument {
            reason: reason.into(),
        }
    }
}

/// Convert from Error to io::Error for compatibility
///
/// 从 Error 转换到 io::Error 以保持兼容性
impl From<Error> for io::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::Io(io_err) => io_err,
            Error::ClosedChannel => io::Error::new(io::ErrorKind::NotConnected, err.to_string()),
            Error::ReadOnlyBuffer => {
                io::Error::new(io::ErrorKind::PermissionDenied, err.to_string())
            }
            Error::BufferOverflow { .. } => {
                io::Error::new(io::ErrorKind::WriteZero, err.to_string())
            }
            Error::BufferUnderflow { .. } => {
                io::Error::new(io::ErrorKind::UnexpectedEof, err.to_string())
            }
            Error::InvalidArgument { .. } | Error::InvalidMarkState => {
                io::Error::new(io::ErrorKind::InvalidInput, err.to_string())
            }
        }
    }
}

/// Result type alias using our custom Error type
///
/// 使用自定义 Error 类型的 Result 类型别名
pub type Result<T> = std::result::Result<T, Error>;
