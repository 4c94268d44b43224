//! Fixed-capacity byte buffer with cursor bookkeeping
//!
//! 带游标管理的定长字节缓冲区

use std::fmt;
use std::ops::Range;
use super::storage::{Allocation, Storage};
use crate::error::{Error, Result};

/// Fixed-capacity byte buffer with `capacity`/`limit`/`position`/`mark` cursors
///
/// 带 `capacity`/`limit`/`position`/`mark` 四个游标的定长字节缓冲区
///
/// The buffer is filled with `put*`, switched to drain mode with [`flip`](Self::flip),
/// drained with `get*`, and switched back to fill mode with [`clear`](Self::clear)
/// or [`compact`](Self::compact).
///
/// 通过 `put*` 写入，调用 [`flip`](Self::flip) 切换到读取模式，通过 `get*` 读取，
/// 再通过 [`clear`](Self::clear) 或 [`compact`](Self::compact) 切换回写入模式。
///
/// # Invariants
///
/// `0 <= mark <= position <= limit <= capacity` whenever `mark` is set, and
/// `0 <= position <= limit <= capacity` always. Every mutating operation checks
/// its preconditions first; a failed call leaves the buffer untouched.
///
/// # 不变式
///
/// 设置 `mark` 时 `0 <= mark <= position <= limit <= capacity`，
/// 任何时候 `0 <= position <= limit <= capacity`。
/// 每个修改操作都先检查前置条件，失败的调用不会改变缓冲区。
///
/// # Non-erasure
///
/// [`clear`](Self::clear), [`flip`](Self::flip) and [`rewind`](Self::rewind) only move
/// cursors. Bytes written earlier stay in the backing region and become readable again
/// once the cursors expose them.
///
/// # 不擦除
///
/// [`clear`](Self::clear)、[`flip`](Self::flip) 和 [`rewind`](Self::rewind) 只移动游标。
/// 之前写入的字节仍留在底层区域中，游标再次覆盖它们时即可重新读取。
///
/// # Examples
///
/// ```
/// use byte_channel::{ByteBuffer, Result};
/// # fn main() -> Result<()> {
/// let mut buffer = ByteBuffer::allocate(1024)?;
/// buffer.put(b"abcde")?;
/// assert_eq!(buffer.position(), 5);
///
/// // Switch to drain mode
/// // 切换到读取模式
/// buffer.flip();
/// assert_eq!(buffer.limit(), 5);
/// assert_eq!(buffer.get(buffer.remaining())?, b"abcde");
///
/// // Old bytes survive clear()
/// // clear() 之后旧数据依然存在
/// buffer.clear();
/// assert_eq!(buffer.get_u8()?, b'a');
/// # Ok(())
/// # }
/// ```
pub struct ByteBuffer {
    storage: Storage,
    direct: bool,
    capacity: usize,
    limit: usize,
    position: usize,
    mark: Option<usize>,
}

impl ByteBuffer {
    /// Allocate a heap buffer
    ///
    /// 分配堆缓冲区
    ///
    /// The new buffer has `position = 0`, `limit = capacity` and no mark.
    /// All bytes are zero.
    ///
    /// 新缓冲区 `position = 0`、`limit = capacity`，未设置 mark，所有字节为 0。
    ///
    /// # Errors
    /// - Returns `InvalidArgument` if `capacity` exceeds `isize::MAX`
    /// - Returns `Io` with `OutOfMemory` if the allocator refuses the request
    ///
    /// # Errors
    /// - 如果 `capacity` 超过 `isize::MAX`，返回 `InvalidArgument`
    /// - 如果分配器拒绝分配，返回 `OutOfMemory` 类型的 `Io` 错误
    pub fn allocate(capacity: usize) -> Result<Self> {
        Self::allocate_with(capacity, Allocation::Heap)
    }

    /// Allocate a direct buffer backed by an anonymous OS mapping
    ///
    /// 分配由匿名操作系统映射支撑的直接缓冲区
    ///
    /// # Errors
    /// - Returns `InvalidArgument` if `capacity` exceeds `isize::MAX`
    /// - Returns `Io` if the mapping cannot be created
    ///
    /// # Errors
    /// - 如果 `capacity` 超过 `isize::MAX`，返回 `InvalidArgument`
    /// - 如果无法创建映射，返回 `Io`
    pub fn allocate_direct(capacity: usize) -> Result<Self> {
        Self::allocate_with(capacity, Allocation::Direct)
    }

    /// Allocate a buffer with an explicit allocation origin
    ///
    /// 按指定的分配方式分配缓冲区
    pub fn allocate_with(capacity: usize, allocation: Allocation) -> Result<Self> {
        let storage = Storage::allocate(capacity, allocation)?;
        Ok(Self::from_storage(storage, allocation == Allocation::Direct))
    }

    /// Wrap existing bytes in a heap buffer
    ///
    /// 用已有字节构造堆缓冲区
    ///
    /// `capacity` and `limit` equal `bytes.len()`, `position` is 0.
    ///
    /// `capacity` 和 `limit` 等于 `bytes.len()`，`position` 为 0。
    pub fn wrap(bytes: Vec<u8>) -> Self {
        Self::from_storage(Storage::Heap(bytes.into_boxed_slice()), false)
    }

    pub(crate) fn from_storage(storage: Storage, direct: bool) -> Self {
        let capacity = storage.bytes().len();
        Self {
            storage,
            direct,
            capacity,
            limit: capacity,
            position: 0,
            mark: None,
        }
    }

    /// Get the capacity
    ///
    /// 获取容量
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Get the limit
    ///
    /// 获取界限
    #[inline]
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Get the position
    ///
    /// 获取位置
    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Number of bytes between `position` and `limit`
    ///
    /// `position` 与 `limit` 之间的字节数
    #[inline]
    pub fn remaining(&self) -> usize {
        self.limit - self.position
    }

    #[inline]
    pub fn has_remaining(&self) -> bool {
        self.remaining() > 0
    }

    /// Whether the bytes live outside the process heap
    ///
    /// 字节是否位于进程堆之外
    ///
    /// True for direct buffers and for file mappings.
    ///
    /// 直接缓冲区和文件映射返回 true。
    #[inline]
    pub fn is_direct(&self) -> bool {
        self.direct
    }

    #[inline]
    pub fn is_read_only(&self) -> bool {
        self.storage.is_read_only()
    }

    /// Set `position`
    ///
    /// 设置 `position`
    ///
    /// The mark is discarded if it lies beyond the new position.
    ///
    /// 如果 mark 大于新位置，则丢弃 mark。
    ///
    /// # Errors
    /// Returns `InvalidArgument` if `position > limit`
    ///
    /// # Errors
    /// 如果 `position > limit`，返回 `InvalidArgument`
    pub fn set_position(&mut self, position: usize) -> Result<()> {
        if position > self.limit {
            return Err(Error::invalid_argument(format!(
                "position {position} exceeds limit {}",
                self.limit
            )));
        }
        if self.mark.is_some_and(|mark| mark > position) {
            self.mark = None;
        }
        self.position = position;
        Ok(())
    }

    /// Set `limit`
    ///
    /// 设置 `limit`
    ///
    /// `position` is pulled down to the new limit if it lies beyond it, and the
    /// mark is discarded if it lies beyond the new limit.
    ///
    /// 如果 `position` 大于新界限则被拉回到新界限；如果 mark 大于新界限则丢弃。
    ///
    /// # Errors
    /// Returns `InvalidArgument` if `limit > capacity`
    ///
    /// # Errors
    /// 如果 `limit > capacity`，返回 `InvalidArgument`
    pub fn set_limit(&mut self, limit: usize) -> Result<()> {
        if limit > self.capacity {
            return Err(Error::invalid_argument(format!(
                "limit {limit} exceeds capacity {}",
                self.capacity
            )));
        }
        if self.position > limit {
            self.position = limit;
        }
        if self.mark.is_some_and(|mark| mark > limit) {
            self.mark = None;
        }
        self.limit = limit;
        Ok(())
    }

    /// Switch from fill mode to drain mode
    ///
    /// 从写入模式切换到读取模式
    ///
    /// Sets `limit = position`, `position = 0` and discards the mark.
    ///
    /// 设置 `limit = position`、`position = 0`，并丢弃 mark。
    pub fn flip(&mut self) -> &mut Self {
        self.limit = self.position;
        self.position = 0;
        self.mark = None;
        self
    }

    /// Replay the current drain window
    ///
    /// 重新读取当前窗口
    ///
    /// Sets `position = 0` and discards the mark; `limit` is unchanged.
    ///
    /// 设置 `position = 0` 并丢弃 mark；`limit` 不变。
    pub fn rewind(&mut self) -> &mut Self {
        self.position = 0;
        self.mark = None;
        self
    }

    /// Switch back to fill mode
    ///
    /// 切换回写入模式
    ///
    /// Sets `position = 0`, `limit = capacity` and discards the mark. Bytes are
    /// not erased.
    ///
    /// 设置 `position = 0`、`limit = capacity` 并丢弃 mark。字节不会被擦除。
    pub fn clear(&mut self) -> &mut Self {
        self.position = 0;
        self.limit = self.capacity;
        self.mark = None;
        self
    }

    /// Remember the current position
    ///
    /// 记录当前位置
    pub fn mark(&mut self) -> &mut Self {
        self.mark = Some(self.position);
        self
    }

    /// Restore the position saved by [`mark`](Self::mark)
    ///
    /// 恢复到 [`mark`](Self::mark) 记录的位置
    ///
    /// The mark is kept, so `reset()` may be called repeatedly.
    ///
    /// mark 会被保留，可以重复调用 `reset()`。
    ///
    /// # Errors
    /// Returns `InvalidMarkState` if no mark is set
    ///
    /// # Errors
    /// 如果未设置 mark，返回 `InvalidMarkState`
    pub fn reset(&mut self) -> Result<()> {
        let mark = self.mark.ok_or(Error::InvalidMarkState)?;
        self.position = mark;
        Ok(())
    }

    /// Write `src` at `position` and advance
    ///
    /// 在 `position` 处写入 `src` 并前移位置
    ///
    /// # Errors
    /// - Returns `ReadOnlyBuffer` for read-only buffers
    /// - Returns `BufferOverflow` if `src.len() > remaining()`; nothing is written
    ///
    /// # Errors
    /// - 只读缓冲区返回 `ReadOnlyBuffer`
    /// - 如果 `src.len() > remaining()`，返回 `BufferOverflow`，不写入任何数据
    pub fn put(&mut self, src: &[u8]) -> Result<()> {
        let range = self.claim_put(src.len())?;
        self.storage.bytes_mut()?[range].copy_from_slice(src);
        Ok(())
    }

    /// Write a single byte
    ///
    /// 写入单个字节
    pub fn put_u8(&mut self, byte: u8) -> Result<()> {
        self.put(&[byte])
    }

    /// Drain all remaining bytes of `src` into this buffer
    ///
    /// 将 `src` 的全部剩余字节写入本缓冲区
    ///
    /// Both positions advance by `src.remaining()`.
    ///
    /// 两个缓冲区的位置都前移 `src.remaining()`。
    ///
    /// # Errors
    /// Returns `BufferOverflow` if `src.remaining() > self.remaining()`; neither
    /// buffer is modified
    ///
    /// # Errors
    /// 如果 `src.remaining() > self.remaining()`，返回 `BufferOverflow`，两个缓冲区都不变
    pub fn put_buffer(&mut self, src: &mut ByteBuffer) -> Result<()> {
        let len = src.remaining();
        let dst_range = self.claim_put(len)?;
        let src_range = src.claim_get(len)?;
        self.storage.bytes_mut()?[dst_range].copy_from_slice(&src.storage.bytes()[src_range]);
        Ok(())
    }

    /// Read `count` bytes from `position` and advance
    ///
    /// 从 `position` 读取 `count` 个字节并前移位置
    ///
    /// # Errors
    /// Returns `BufferUnderflow` if `count > remaining()`; position is unchanged
    ///
    /// # Errors
    /// 如果 `count > remaining()`，返回 `BufferUnderflow`，位置不变
    pub fn get(&mut self, count: usize) -> Result<Vec<u8>> {
        let range = self.claim_get(count)?;
        Ok(self.storage.bytes()[range].to_vec())
    }

    /// Read a single byte
    ///
    /// 读取单个字节
    pub fn get_u8(&mut self) -> Result<u8> {
        let range = self.claim_get(1)?;
        Ok(self.storage.bytes()[range.start])
    }

    /// Read `length` bytes into `dst[offset..offset + length]`
    ///
    /// 读取 `length` 个字节到 `dst[offset..offset + length]`
    ///
    /// # Errors
    /// - Returns `InvalidArgument` if the region does not fit in `dst`
    /// - Returns `BufferUnderflow` if `length > remaining()`
    ///
    /// # Errors
    /// - 如果目标区域超出 `dst`，返回 `InvalidArgument`
    /// - 如果 `length > remaining()`，返回 `BufferUnderflow`
    pub fn get_into(&mut self, dst: &mut [u8], offset: usize, length: usize) -> Result<()> {
        let end = offset
            .checked_add(length)
            .filter(|&end| end <= dst.len())
            .ok_or_else(|| {
                Error::invalid_argument(format!(
                    "region {offset}+{length} does not fit destination of {} bytes",
                    dst.len()
                ))
            })?;
        let range = self.claim_get(length)?;
        dst[offset..end].copy_from_slice(&self.storage.bytes()[range]);
        Ok(())
    }

    /// Fill `dst` entirely
    ///
    /// 填满 `dst`
    pub fn get_slice(&mut self, dst: &mut [u8]) -> Result<()> {
        let length = dst.len();
        self.get_into(dst, 0, length)
    }

    /// Move the remaining bytes to the front and switch to fill mode
    ///
    /// 将剩余字节移动到开头并切换到写入模式
    ///
    /// Afterwards `position = old remaining()`, `limit = capacity`, and the mark
    /// is discarded.
    ///
    /// 之后 `position = 原 remaining()`、`limit = capacity`，并丢弃 mark。
    pub fn compact(&mut self) -> Result<()> {
        let window = self.position..self.limit;
        let remaining = window.len();
        self.storage.bytes_mut()?.copy_within(window, 0);
        self.position = remaining;
        self.limit = self.capacity;
        self.mark = None;
        Ok(())
    }

    /// The `[position, limit)` window
    ///
    /// `[position, limit)` 窗口
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.storage.bytes()[self.position..self.limit]
    }

    /// The `[position, limit)` window, mutably
    ///
    /// `[position, limit)` 可变窗口
    #[inline]
    pub fn as_mut_slice(&mut self) -> Result<&mut [u8]> {
        let window = self.position..self.limit;
        Ok(&mut self.storage.bytes_mut()?[window])
    }

    /// Write a file-backed buffer back to its file
    ///
    /// 将文件映射缓冲区写回文件
    ///
    /// No-op for heap, direct and read-only buffers.
    ///
    /// 对堆缓冲区、直接缓冲区和只读缓冲区无操作。
    pub fn force(&self) -> Result<()> {
        self.storage.flush()
    }

    /// Advance `position` by `len` without touching bytes
    ///
    /// 前移 `position` `len` 个字节，不访问数据
    pub(crate) fn advance(&mut self, len: usize) -> Result<()> {
        self.claim_get(len).map(|_| ())
    }

    /// Check a put of `len` bytes and reserve its range
    ///
    /// 检查写入 `len` 字节并预留范围
    fn claim_put(&mut self, len: usize) -> Result<Range<usize>> {
        if self.is_read_only() {
            return Err(Error::ReadOnlyBuffer);
        }
        let remaining = self.remaining();
        if len > remaining {
            return Err(Error::BufferOverflow {
                requested: len,
                remaining,
            });
        }
        let start = self.position;
        self.position += len;
        Ok(start..self.position)
    }

    /// Check a get of `len` bytes and reserve its range
    ///
    /// 检查读取 `len` 字节并预留范围
    fn claim_get(&mut self, len: usize) -> Result<Range<usize>> {
        let remaining = self.remaining();
        if len > remaining {
            return Err(Error::BufferUnderflow {
                requested: len,
                remaining,
            });
        }
        let start = self.position;
        self.position += len;
        Ok(start..self.position)
    }
}

impl fmt::Debug for ByteBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ByteBuffer")
            .field("storage", &self.storage.kind())
            .field("position", &self.position)
            .field("limit", &self.limit)
            .field("capacity", &self.capacity)
            .field("mark", &self.mark)
            .finish()
    }
}
