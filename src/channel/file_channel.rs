//! File channel built on std::fs::File and memmap2
//!
//! 基于 std::fs::File 和 memmap2 的文件通道

use memmap2::MmapOptions;
use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use tracing::warn;
use crate::buffer::{ByteBuffer, Storage};
use crate::error::{Error, Result};

/// Access mode of a mapped view
///
/// 映射视图的访问模式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MapMode {
    /// Puts on the view fail with `ReadOnlyBuffer`
    ///
    /// 对视图写入返回 `ReadOnlyBuffer`
    ReadOnly,

    /// Puts on the view reach the file; the file grows to fit the view
    ///
    /// 对视图的写入会落到文件中；文件会扩展到能容纳视图
    ReadWrite,
}

/// Open file endpoint that moves bytes through [`ByteBuffer`]s
///
/// 通过 [`ByteBuffer`] 传输字节的已打开文件端点
///
/// A channel does not store data. [`read`](Self::read) fills the remaining window
/// of a buffer, [`write`](Self::write) drains it, and [`transfer_to`](Self::transfer_to)
/// moves bytes between two channels without a user-space buffer.
///
/// 通道本身不存储数据。[`read`](Self::read) 填充缓冲区的剩余窗口，
/// [`write`](Self::write) 将其写出，[`transfer_to`](Self::transfer_to)
/// 在两个通道之间传输字节而不经过用户态缓冲区。
///
/// # Closing
///
/// [`close`](Self::close) is idempotent. A channel still open when dropped is
/// closed by `Drop`; a failure there is logged and otherwise ignored.
///
/// # 关闭
///
/// [`close`](Self::close) 可以重复调用。析构时仍处于打开状态的通道会由 `Drop` 关闭，
/// 失败时只记录日志。
///
/// # Examples
///
/// ```
/// use byte_channel::{ByteBuffer, FileChannel, Result};
/// # use tempfile::tempdir;
/// # fn main() -> Result<()> {
/// # let dir = tempdir()?;
/// # let path = dir.path().join("channel.bin");
/// let mut channel = FileChannel::create(&path)?;
///
/// let mut buffer = ByteBuffer::allocate(64)?;
/// buffer.put(b"hello channel")?;
/// buffer.flip();
/// channel.write(&mut buffer)?;
/// assert_eq!(channel.size()?, 13);
///
/// channel.close()?;
/// channel.close()?; // No-op
///                   // 无操作
/// # Ok(())
/// # }
/// ```
pub struct FileChannel {
    /// `None` once closed
    ///
    /// 关闭后为 `None`
    file: Option<File>,
    path: PathBuf,
    writable: bool,
}

impl FileChannel {
    /// Open an existing file for reading
    ///
    /// 以只读方式打开已存在的文件
    pub fn open_read(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with(path.as_ref(), OpenOptions::new().read(true), false)
    }

    /// Open a file for writing only, creating it or truncating it
    ///
    /// 以只写方式打开文件，不存在则创建，已存在则截断
    ///
    /// A write-only channel cannot back a mapped view.
    ///
    /// 只写通道不能用于映射视图。
    pub fn open_write(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with(
            path.as_ref(),
            OpenOptions::new().write(true).create(true).truncate(true),
            true,
        )
    }

    /// Open a file for reading and writing, creating it if missing
    ///
    /// 以读写方式打开文件，不存在则创建
    ///
    /// Existing contents are kept.
    ///
    /// 已有内容会被保留。
    pub fn open_read_write(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with(
            path.as_ref(),
            OpenOptions::new().read(true).write(true).create(true),
            true,
        )
    }

    /// Create a file for reading and writing, truncating it if it exists
    ///
    /// 以读写方式创建文件，已存在则截断
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with(
            path.as_ref(),
            OpenOptions::new().read(true).write(true).create(true).truncate(true),
            true,
        )
    }

    /// Create a new file for reading and writing
    ///
    /// 以读写方式创建新文件
    ///
    /// # Errors
    /// Returns `Io` with `AlreadyExists` if the file exists
    ///
    /// # Errors
    /// 如果文件已存在，返回 `AlreadyExists` 类型的 `Io` 错误
    pub fn create_new(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with(
            path.as_ref(),
            OpenOptions::new().read(true).write(true).create_new(true),
            true,
        )
    }

    fn open_with(path: &Path, options: &OpenOptions, writable: bool) -> Result<Self> {
        let file = options.open(path)?;
        Ok(Self {
            file: Some(file),
            path: path.to_path_buf(),
            writable,
        })
    }

    #[inline]
    fn file(&self) -> Result<&File> {
        self.file.as_ref().ok_or(Error::ClosedChannel)
    }

    /// Path the channel was opened with
    ///
    /// 打开通道时使用的路径
    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        self.file.is_some()
    }

    /// Read into the remaining window of `dst`
    ///
    /// 读取数据到 `dst` 的剩余窗口
    ///
    /// # Returns
    /// - `Some(n)`: `n` bytes were read and `dst.position()` advanced by `n`
    /// - `Some(0)`: `dst` had no remaining space
    /// - `None`: end of stream
    ///
    /// # 返回值
    /// - `Some(n)`：读取了 `n` 字节，`dst.position()` 前移 `n`
    /// - `Some(0)`：`dst` 没有剩余空间
    /// - `None`：已到达流末尾
    pub fn read(&mut self, dst: &mut ByteBuffer) -> Result<Option<usize>> {
        let mut file = self.file()?;
        if !dst.has_remaining() {
            return Ok(Some(0));
        }

        let window = dst.as_mut_slice()?;
        let read = loop {
            match file.read(window) {
                Ok(read) => break read,
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(err.into()),
            }
        };

        if read == 0 {
            return Ok(None);
        }
        dst.advance(read)?;
        Ok(Some(read))
    }

    /// Write the whole remaining window of `src`
    ///
    /// 写出 `src` 的整个剩余窗口
    ///
    /// Returns the number of bytes written; `src.position()` reaches `src.limit()`.
    ///
    /// 返回写入的字节数；`src.position()` 前移到 `src.limit()`。
    pub fn write(&mut self, src: &mut ByteBuffer) -> Result<usize> {
        let mut file = self.file()?;
        let written = src.remaining();
        file.write_all(src.as_slice())?;
        src.advance(written)?;
        Ok(written)
    }

    /// Current size of the file
    ///
    /// 文件当前大小
    pub fn size(&self) -> Result<u64> {
        Ok(self.file()?.metadata()?.len())
    }

    /// Current file position
    ///
    /// 当前文件位置
    pub fn position(&self) -> Result<u64> {
        let mut file = self.file()?;
        Ok(file.stream_position()?)
    }

    /// Move the file position
    ///
    /// 移动文件位置
    ///
    /// A position past the end is allowed; a later write extends the file.
    ///
    /// 允许位置超出文件末尾；之后的写入会扩展文件。
    pub fn set_position(&mut self, position: u64) -> Result<()> {
        let mut file = self.file()?;
        file.seek(SeekFrom::Start(position))?;
        Ok(())
    }

    /// Shrink the file to `size` bytes
    ///
    /// 将文件缩小到 `size` 字节
    ///
    /// Larger sizes leave the file untouched. The position is pulled down to
    /// `size` if it lies beyond it.
    ///
    /// 更大的 `size` 不改变文件。如果位置超出 `size`，则被拉回到 `size`。
    pub fn truncate(&mut self, size: u64) -> Result<()> {
        let mut file = self.file()?;
        if size < file.metadata()?.len() {
            file.set_len(size)?;
        }
        if file.stream_position()? > size {
            file.seek(SeekFrom::Start(size))?;
        }
        Ok(())
    }

    /// Transfer up to `count` bytes starting at `offset` into `target`
    ///
    /// 从 `offset` 开始将至多 `count` 个字节传输到 `target`
    ///
    /// Bytes land at the target's current position, which advances. This
    /// channel's position is left unchanged. The copy runs through
    /// [`std::io::copy`], which uses `copy_file_range`/`sendfile` on Linux.
    ///
    /// 字节写入目标通道的当前位置，目标位置随之前移；本通道的位置不变。
    /// 复制通过 [`std::io::copy`] 完成，在 Linux 上使用 `copy_file_range`/`sendfile`。
    ///
    /// # Returns
    /// Number of bytes transferred; 0 if `offset` is at or past the end
    ///
    /// # 返回值
    /// 传输的字节数；如果 `offset` 位于或超出文件末尾则为 0
    pub fn transfer_to(&self, offset: u64, count: u64, target: &mut FileChannel) -> Result<u64> {
        let source = self.file()?;
        let mut destination = target.file()?;

        let size = source.metadata()?.len();
        if offset >= size {
            return Ok(0);
        }
        let count = count.min(size - offset);

        let mut cursor = source;
        let saved = cursor.stream_position()?;
        cursor.seek(SeekFrom::Start(offset))?;

        let copied = io::copy(&mut source.take(count), &mut destination);
        // Restore the position even when the copy failed
        // 即使复制失败也恢复位置
        let restored = cursor.seek(SeekFrom::Start(saved));

        let copied = copied?;
        restored?;
        Ok(copied)
    }

    /// Transfer up to `count` bytes from `source` into this file at `position`
    ///
    /// 从 `source` 传输至多 `count` 个字节到本文件的 `position` 处
    ///
    /// Bytes are read from the source's current position, which advances.
    /// This channel's position is left unchanged. Nothing is transferred if
    /// `position` is past the end of this file.
    ///
    /// 从源通道的当前位置读取，源位置随之前移；本通道的位置不变。
    /// 如果 `position` 超出本文件末尾，则不传输任何数据。
    pub fn transfer_from(
        &mut self,
        source: &mut FileChannel,
        position: u64,
        count: u64,
    ) -> Result<u64> {
        let mut destination = self.file()?;
        let reader = source.file()?;

        if position > destination.metadata()?.len() {
            return Ok(0);
        }

        let saved = destination.stream_position()?;
        destination.seek(SeekFrom::Start(position))?;

        let copied = io::copy(&mut reader.take(count), &mut destination);
        let restored = destination.seek(SeekFrom::Start(saved));

        let copied = copied?;
        restored?;
        Ok(copied)
    }

    /// Map `len` bytes starting at `offset` into a buffer view
    ///
    /// 将从 `offset` 开始的 `len` 个字节映射为缓冲区视图
    ///
    /// The view is a direct [`ByteBuffer`] with `position = 0` and
    /// `limit = capacity = len`. A read-write view grows the file to
    /// `offset + len` if needed; [`ByteBuffer::force`] writes it back. A zero
    /// length yields an empty heap-backed view.
    ///
    /// 视图是一个直接 [`ByteBuffer`]，`position = 0`、`limit = capacity = len`。
    /// 读写视图在需要时会将文件扩展到 `offset + len`；[`ByteBuffer::force`] 将其写回。
    /// 长度为 0 时返回一个空的堆视图。
    ///
    /// # Examples
    ///
    /// ```
    /// use byte_channel::{FileChannel, MapMode, Result};
    /// # use tempfile::tempdir;
    /// # fn main() -> Result<()> {
    /// # let dir = tempdir()?;
    /// # let path = dir.path().join("mapped.bin");
    /// let channel = FileChannel::create(&path)?;
    ///
    /// let mut view = channel.map(MapMode::ReadWrite, 0, 5)?;
    /// view.put(b"hello")?;
    /// view.force()?;
    ///
    /// assert_eq!(std::fs::read(&path)?, b"hello");
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    /// - Returns `InvalidArgument` if a read-only view would extend past the end of the file
    /// - Returns `Io` with `PermissionDenied` for a read-write view of a read-only channel
    /// - Returns `Io` if the mapping fails
    ///
    /// # Errors
    /// - 如果只读视图超出文件末尾，返回 `InvalidArgument`
    /// - 对只读通道请求读写视图时，返回 `PermissionDenied` 类型的 `Io` 错误
    /// - 如果映射失败，返回 `Io`
    pub fn map(&self, mode: MapMode, offset: u64, len: usize) -> Result<ByteBuffer> {
        let file = self.file()?;
        if len == 0 {
            return Ok(ByteBuffer::from_storage(Storage::Heap(Box::default()), true));
        }

        let end = u64::try_from(len)
            .ok()
            .and_then(|len| offset.checked_add(len))
            .ok_or_else(|| {
                Error::invalid_argument(format!("region {offset}+{len} overflows u64"))
            })?;
        let size = file.metadata()?.len();

        let storage = match mode {
            MapMode::ReadOnly => {
                if end > size {
                    return Err(Error::invalid_argument(format!(
                        "read-only region ending at {end} exceeds file size {size}"
                    )));
                }
                // Safety: The mapping is only read through the returned buffer
                // Safety: 映射只通过返回的缓冲区读取
                let mmap = unsafe { MmapOptions::new().offset(offset).len(len).map(file)? };
                Storage::MappedReadOnly(mmap)
            }
            MapMode::ReadWrite => {
                if !self.writable {
                    return Err(Error::Io(io::Error::new(
                        io::ErrorKind::PermissionDenied,
                        "channel is not open for writing",
                    )));
                }
                if end > size {
                    file.set_len(end)?;
                }
                // Safety: The returned buffer owns the only mutable view of this region
                // Safety: 返回的缓冲区持有该区域唯一的可变视图
                let mmap = unsafe { MmapOptions::new().offset(offset).len(len).map_mut(file)? };
                Storage::MappedReadWrite(mmap)
            }
        };

        Ok(ByteBuffer::from_storage(storage, true))
    }

    /// Close the channel
    ///
    /// 关闭通道
    ///
    /// Writable channels are synced to disk first. Calling `close` again is a no-op.
    /// The handle is released even when the sync fails.
    ///
    /// 可写通道会先同步到磁盘。重复调用 `close` 无操作。即使同步失败，句柄也会被释放。
    pub fn close(&mut self) -> Result<()> {
        match self.file.take() {
            Some(file) if self.writable => Ok(file.sync_all()?),
            _ => Ok(()),
        }
    }
}

impl Drop for FileChannel {
    fn drop(&mut self) {
        if let Err(err) = self.close() {
            warn!(path = %self.path.display(), error = %err, "failed to close channel");
        }
    }
}

impl std::fmt::Debug for FileChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileChannel")
            .field("path", &self.path)
            .field("writable", &self.writable)
            .field("open", &self.is_open())
            .finish()
    }
}
