//! Cursor-based byte buffers and file channels
//!
//! 基于游标的字节缓冲区与文件通道
//!
//! This library provides a fixed-capacity [`ByteBuffer`] with the classic
//! `capacity`/`limit`/`position`/`mark` cursor model, a [`FileChannel`] that moves
//! bytes between files and buffers, and a [`FileCopier`] that copies whole files
//! through a buffer loop, memory-mapped views, or a direct channel transfer.
//!
//! 本库提供采用经典 `capacity`/`limit`/`position`/`mark` 游标模型的定长
//! [`ByteBuffer`]，在文件与缓冲区之间传输字节的 [`FileChannel`]，以及通过缓冲循环、
//! 内存映射视图或通道直接传输来复制整个文件的 [`FileCopier`]。
//!
//! # Features
//!
//! - **Checked cursors**: Every put/get is bounds-checked against `limit`; a failed call changes nothing
//! - **Heap or direct**: Buffers live on the heap or in an anonymous page-aligned mapping
//! - **Mapped views**: File regions map straight into buffers, read-only or read-write
//! - **Kernel-side transfer**: Channel-to-channel copies avoid user-space buffers where the OS allows
//! - **Scoped release**: Channels close on every exit path, in reverse order of opening
//!
//! # 特性
//!
//! - **游标检查**：每次 put/get 都会根据 `limit` 做边界检查，失败的调用不改变任何状态
//! - **堆或直接内存**：缓冲区可位于堆上，或位于匿名、页对齐的映射中
//! - **映射视图**：文件区域可直接映射为只读或读写缓冲区
//! - **内核态传输**：在操作系统支持时，通道间复制不经过用户态缓冲区
//! - **作用域释放**：通道在所有退出路径上按打开的逆序关闭
//!
//! # Quick Start
//!
//! ## 快速开始
//!
//! ```
//! use byte_channel::{ByteBuffer, CopyOptions, CopyStrategy, FileCopier, Result};
//! # use tempfile::tempdir;
//! # fn main() -> Result<()> {
//! # let dir = tempdir()?;
//! # let source = dir.path().join("1.jpg");
//! # let destination = dir.path().join("3.jpg");
//!
//! // Fill, flip, drain
//! // 写入、切换、读取
//! let mut buffer = ByteBuffer::allocate(1024)?;
//! buffer.put(b"abcde")?;
//! buffer.flip();
//! assert_eq!(buffer.get(2)?, b"ab");
//!
//! // Copy a file with a direct channel transfer
//! // 通过通道直接传输复制文件
//! std::fs::write(&source, b"file content")?;
//! let copier = FileCopier::new(CopyOptions::default().with_strategy(CopyStrategy::Transfer));
//! copier.copy(&source, &destination)?;
//! assert_eq!(std::fs::read(&destination)?, b"file content");
//! # Ok(())
//! # }
//! ```
//!
//! # Main Types
//!
//! - [`ByteBuffer`]: Fixed-capacity buffer with cursor bookkeeping
//! - [`FileChannel`]: Open file that reads into and writes from buffers
//! - [`FileCopier`]: Whole-file copy with a configurable [`CopyStrategy`]
//! - [`CopyOptions`]: Strategy, buffer size and allocation settings
//!
//! # 主要类型
//!
//! - [`ByteBuffer`][]: 带游标管理的定长缓冲区
//! - [`FileChannel`][]: 可读入和写出缓冲区的已打开文件
//! - [`FileCopier`][]: 可配置 [`CopyStrategy`] 的整文件复制
//! - [`CopyOptions`][]: 策略、缓冲区大小和分配方式设置

mod buffer;
mod channel;
mod error;

pub use buffer::{Allocation, ByteBuffer};
pub use channel::{CopyOptions, CopyStrategy, DEFAULT_BUFFER_SIZE, FileChannel, FileCopier, MapMode};
pub use error::{Error, Result};
