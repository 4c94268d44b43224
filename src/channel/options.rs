//! Copy configuration
//!
//! 复制配置

use std::num::NonZeroUsize;
use crate::buffer::Allocation;

/// Default size of the buffered-loop buffer
///
/// 缓冲循环使用的默认缓冲区大小
pub const DEFAULT_BUFFER_SIZE: NonZeroUsize = NonZeroUsize::new(1024).unwrap();

/// How bytes move from the source file to the destination file
///
/// 字节从源文件移动到目标文件的方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CopyStrategy {
    /// Fill a user-space buffer from the source, drain it into the destination, repeat
    ///
    /// 从源文件填充用户态缓冲区，再写入目标文件，循环往复
    #[default]
    Buffered,

    /// Map both files and copy between the two views
    ///
    /// 映射两个文件，在两个视图之间直接复制
    Mapped,

    /// Hand the whole range to the I/O layer in one transfer call
    ///
    /// 通过一次传输调用将整个范围交给 I/O 层
    Transfer,
}

/// Options for [`FileCopier`](super::FileCopier)
///
/// [`FileCopier`](super::FileCopier) 的选项
///
/// # Examples
///
/// ```
/// use byte_channel::{Allocation, CopyOptions, CopyStrategy};
/// use std::num::NonZeroUsize;
///
/// let options = CopyOptions::default()
///     .with_strategy(CopyStrategy::Buffered)
///     .with_buffer_size(NonZeroUsize::new(4096).unwrap())
///     .with_allocation(Allocation::Direct);
///
/// assert_eq!(options.buffer_size.get(), 4096);
/// assert!(options.overwrite);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CopyOptions {
    /// Strategy used by [`FileCopier::copy`](super::FileCopier::copy)
    ///
    /// [`FileCopier::copy`](super::FileCopier::copy) 使用的策略
    pub strategy: CopyStrategy,

    /// Capacity of the buffer used by the buffered loop
    ///
    /// 缓冲循环所用缓冲区的容量
    pub buffer_size: NonZeroUsize,

    /// Allocation origin of the buffered-loop buffer
    ///
    /// 缓冲循环所用缓冲区的分配方式
    pub allocation: Allocation,

    /// Truncate an existing destination instead of failing
    ///
    /// 截断已存在的目标文件，而不是返回错误
    pub overwrite: bool,
}

impl Default for CopyOptions {
    fn default() -> Self {
        Self {
            strategy: CopyStrategy::default(),
            buffer_size: DEFAULT_BUFFER_SIZE,
            allocation: Allocation::default(),
            overwrite: true,
        }
    }
}

impl CopyOptions {
    pub fn with_strategy(mut self, strategy: CopyStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_buffer_size(mut self, buffer_size: NonZeroUsize) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    pub fn with_allocation(mut self, allocation: Allocation) -> Self {
        self.allocation = allocation;
        self
    }

    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }
}
