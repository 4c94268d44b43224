//! Backing storage for byte buffers
//!
//! 字节缓冲区的底层存储

use memmap2::{Mmap, MmapMut};
use std::io;
use crate::error::{Error, Result};

/// Where the bytes of a newly allocated buffer live
///
/// 新分配缓冲区的字节所在位置
///
/// - `Heap`: ordinary process-heap allocation
/// - `Direct`: anonymous page-aligned OS mapping, outside heap bookkeeping
///
/// - `Heap`: 普通的进程堆分配
/// - `Direct`: 匿名、页对齐的操作系统映射，不经过堆分配器
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Allocation {
    #[default]
    Heap,
    Direct,
}

/// Byte region owned by a [`ByteBuffer`](super::ByteBuffer)
///
/// [`ByteBuffer`](super::ByteBuffer) 持有的字节区域
pub(crate) enum Storage {
    /// Heap allocation
    ///
    /// 堆分配
    Heap(Box<[u8]>),

    /// Anonymous mapping backing a direct buffer
    ///
    /// 直接缓冲区使用的匿名映射
    Anonymous(MmapMut),

    /// Writable view of a file region
    ///
    /// 文件区域的可写视图
    MappedReadWrite(MmapMut),

    /// Read-only view of a file region
    ///
    /// 文件区域的只读视图
    MappedReadOnly(Mmap),
}

impl Storage {
    /// Allocate `capacity` zeroed bytes
    ///
    /// 分配 `capacity` 个清零字节
    pub(crate) fn allocate(capacity: usize, allocation: Allocation) -> Result<Self> {
        if capacity > isize::MAX as usize {
            return Err(Error::invalid_argument(format!(
                "capacity {capacity} exceeds isize::MAX"
            )));
        }

        match allocation {
            Allocation::Heap => {
                // Report allocator refusal the same way a failed mapping is reported
                // 与映射失败一样报告分配器拒绝分配
                let mut bytes = Vec::new();
                bytes
                    .try_reserve_exact(capacity)
                    .map_err(|_| io::Error::from(io::ErrorKind::OutOfMemory))?;
                bytes.resize(capacity, 0);
                Ok(Storage::Heap(bytes.into_boxed_slice()))
            }
            // An empty region has nothing to map
            // 空区域无需映射
            Allocation::Direct if capacity == 0 => Ok(Storage::Heap(Box::default())),
            Allocation::Direct => Ok(Storage::Anonymous(MmapMut::map_anon(capacity)?)),
        }
    }

    #[inline]
    pub(crate) fn bytes(&self) -> &[u8] {
        match self {
            Storage::Heap(bytes) => &bytes[..],
            Storage::Anonymous(mmap) | Storage::MappedReadWrite(mmap) => &mmap[..],
            Storage::MappedReadOnly(mmap) => &mmap[..],
        }
    }

    /// Mutable access, or `ReadOnlyBuffer` for read-only views
    ///
    /// 可变访问；只读视图返回 `ReadOnlyBuffer`
    #[inline]
    pub(crate) fn bytes_mut(&mut self) -> Result<&mut [u8]> {
        match self {
            Storage::Heap(bytes) => Ok(&mut bytes[..]),
            Storage::Anonymous(mmap) | Storage::MappedReadWrite(mmap) => Ok(&mut mmap[..]),
            Storage::MappedReadOnly(_) => Err(Error::ReadOnlyBuffer),
        }
    }

    #[inline]
    pub(crate) fn is_read_only(&self) -> bool {
        matches!(self, Storage::MappedReadOnly(_))
    }

    /// Synchronously write a file-backed view back to its file
    ///
    /// 将文件映射视图同步写回文件
    pub(crate) fn flush(&self) -> Result<()> {
        match self {
            Storage::MappedReadWrite(mmap) => Ok(mmap.flush()?),
            _ => Ok(()),
        }
    }

    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Storage::Heap(_) => "Heap",
            Storage::Anonymous(_) => "Anonymous",
            Storage::MappedReadWrite(_) => "MappedReadWrite",
            Storage::MappedReadOnly(_) => "MappedReadOnly",
        }
    }
}
