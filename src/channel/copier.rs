//! Whole-file copy over file channels
//!
//! 基于文件通道的整文件复制

use std::path::Path;
use tracing::{debug, trace};
use super::file_channel::{FileChannel, MapMode};
use super::options::{CopyOptions, CopyStrategy};
use crate::buffer::ByteBuffer;
use crate::error::{Error, Result};

/// Copies files with one of the [`CopyStrategy`] variants
///
/// 使用 [`CopyStrategy`] 之一复制文件
///
/// Every strategy produces a destination byte-identical to the source. The
/// destination is created, or truncated when [`CopyOptions::overwrite`] is set.
///
/// 每种策略都会产生与源文件逐字节相同的目标文件。目标文件会被创建，
/// 在设置 [`CopyOptions::overwrite`] 时已存在的文件会被截断。
///
/// # Resource Release
///
/// Channels are closed in reverse order of opening. Both closes are attempted
/// even if the first fails; the first failure is returned. On an early error,
/// channels still open are closed by `Drop`, again in reverse order.
///
/// # 资源释放
///
/// 通道按打开的逆序关闭。即使第一个关闭失败，也会尝试关闭第二个，并返回第一个错误。
/// 提前出错时，仍打开的通道由 `Drop` 按逆序关闭。
///
/// # Examples
///
/// ```
/// use byte_channel::{CopyOptions, CopyStrategy, FileCopier, Result};
/// # use tempfile::tempdir;
/// # fn main() -> Result<()> {
/// # let dir = tempdir()?;
/// # let source = dir.path().join("1.jpg");
/// # let destination = dir.path().join("2.jpg");
/// std::fs::write(&source, vec![7u8; 5000])?;
///
/// let copier = FileCopier::new(CopyOptions::default().with_strategy(CopyStrategy::Mapped));
/// let copied = copier.copy(&source, &destination)?;
///
/// assert_eq!(copied, 5000);
/// assert_eq!(std::fs::read(&destination)?, std::fs::read(&source)?);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct FileCopier {
    options: CopyOptions,
}

impl FileCopier {
    pub fn new(options: CopyOptions) -> Self {
        Self { options }
    }

    #[inline]
    pub fn options(&self) -> &CopyOptions {
        &self.options
    }

    /// Copy `source` to `destination` with the configured strategy
    ///
    /// 使用配置的策略将 `source` 复制到 `destination`
    ///
    /// # Returns
    /// Number of bytes copied
    ///
    /// # 返回值
    /// 复制的字节数
    pub fn copy(&self, source: impl AsRef<Path>, destination: impl AsRef<Path>) -> Result<u64> {
        match self.options.strategy {
            CopyStrategy::Buffered => self.copy_buffered(source, destination),
            CopyStrategy::Mapped => self.copy_mapped(source, destination),
            CopyStrategy::Transfer => self.copy_transfer(source, destination),
        }
    }

    /// Copy through a single user-space buffer
    ///
    /// 通过单个用户态缓冲区复制
    ///
    /// Loop: read into the buffer, `flip`, write it out, `clear`, until the
    /// source reports end of stream.
    ///
    /// 循环：读取到缓冲区，`flip`，写出，`clear`，直到源通道到达流末尾。
    pub fn copy_buffered(
        &self,
        source: impl AsRef<Path>,
        destination: impl AsRef<Path>,
    ) -> Result<u64> {
        let (source, destination) = (source.as_ref(), destination.as_ref());
        debug!(
            strategy = "buffered",
            source = %source.display(),
            destination = %destination.display(),
            buffer_size = self.options.buffer_size.get(),
            "copy started"
        );

        let mut input = FileChannel::open_read(source)?;
        let mut output = self.open_destination(destination)?;
        let mut buffer =
            ByteBuffer::allocate_with(self.options.buffer_size.get(), self.options.allocation)?;

        let mut copied = 0u64;
        while let Some(read) = input.read(&mut buffer)? {
            // Switch to drain mode
            // 切换到读取模式
            buffer.flip();
            let written = output.write(&mut buffer)?;
            trace!(read, written, "chunk copied");
            copied += written as u64;
            buffer.clear();
        }

        close_in_reverse(|| output.close(), || input.close())?;
        debug!(strategy = "buffered", bytes = copied, "copy finished");
        Ok(copied)
    }

    /// Copy between memory-mapped views of both files
    ///
    /// 在两个文件的内存映射视图之间复制
    ///
    /// The source is mapped read-only and the destination read-write, both
    /// sized to the source length; bytes move view to view with no
    /// intermediate buffer.
    ///
    /// 源文件以只读方式映射，目标文件以读写方式映射，大小均为源文件长度；
    /// 字节在视图之间直接移动，不经过中间缓冲区。
    pub fn copy_mapped(
        &self,
        source: impl AsRef<Path>,
        destination: impl AsRef<Path>,
    ) -> Result<u64> {
        let (source, destination) = (source.as_ref(), destination.as_ref());
        debug!(
            strategy = "mapped",
            source = %source.display(),
            destination = %destination.display(),
            "copy started"
        );

        let mut input = FileChannel::open_read(source)?;
        let mut output = self.open_destination(destination)?;

        let size = input.size()?;
        let len = usize::try_from(size).map_err(|_| {
            Error::invalid_argument(format!("source of {size} bytes cannot be mapped"))
        })?;

        {
            let mut source_view = input.map(MapMode::ReadOnly, 0, len)?;
            let mut destination_view = output.map(MapMode::ReadWrite, 0, len)?;
            destination_view.put_buffer(&mut source_view)?;
            destination_view.force()?;
        }

        close_in_reverse(|| output.close(), || input.close())?;
        debug!(strategy = "mapped", bytes = size, "copy finished");
        Ok(size)
    }

    /// Copy with a single channel-to-channel transfer
    ///
    /// 通过一次通道间传输复制
    pub fn copy_transfer(
        &self,
        source: impl AsRef<Path>,
        destination: impl AsRef<Path>,
    ) -> Result<u64> {
        let (source, destination) = (source.as_ref(), destination.as_ref());
        debug!(
            strategy = "transfer",
            source = %source.display(),
            destination = %destination.display(),
            "copy started"
        );

        let mut input = FileChannel::open_read(source)?;
        let mut output = self.open_destination(destination)?;

        let size = input.size()?;
        let copied = input.transfer_to(0, size, &mut output)?;

        close_in_reverse(|| output.close(), || input.close())?;
        debug!(strategy = "transfer", bytes = copied, "copy finished");
        Ok(copied)
    }

    fn open_destination(&self, path: &Path) -> Result<FileChannel> {
        if self.options.overwrite {
            FileChannel::create(path)
        } else {
            FileChannel::create_new(path)
        }
    }
}

/// Run `close_last` then `close_first`, returning the first failure
///
/// 先执行 `close_last` 再执行 `close_first`，返回第一个错误
///
/// `close_first` runs even when `close_last` fails.
///
/// 即使 `close_last` 失败，`close_first` 也会执行。
pub(super) fn close_in_reverse(
    close_last: impl FnOnce() -> Result<()>,
    close_first: impl FnOnce() -> Result<()>,
) -> Result<()> {
    let last = close_last();
    let first = close_first();
    last.and(first)
}
