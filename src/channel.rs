//! File channels and whole-file copy
//!
//! 文件通道与整文件复制
//!
//! A [`FileChannel`] connects a file to [`ByteBuffer`](crate::ByteBuffer)s. It
//! stores no data itself; bytes move through a buffer, through a mapped view,
//! or directly from one channel to another.
//!
//! [`FileChannel`] 将文件与 [`ByteBuffer`](crate::ByteBuffer) 连接起来。
//! 通道本身不存储数据；字节通过缓冲区、映射视图或通道间直接传输来移动。
//!
//! [`FileCopier`] builds on channels to copy a whole file with one of three
//! strategies:
//! 1. [`CopyStrategy::Buffered`]: read/flip/write/clear loop over one buffer
//! 2. [`CopyStrategy::Mapped`]: copy between memory-mapped views of both files
//! 3. [`CopyStrategy::Transfer`]: one channel-to-channel transfer call
//!
//! [`FileCopier`] 基于通道以三种策略之一复制整个文件：
//! 1. [`CopyStrategy::Buffered`]：在单个缓冲区上循环 读取/flip/写出/clear
//! 2. [`CopyStrategy::Mapped`]：在两个文件的内存映射视图之间复制
//! 3. [`CopyStrategy::Transfer`]：一次通道间传输调用
//!
//! ```
//! use byte_channel::{ByteBuffer, FileChannel, Result};
//! # use tempfile::tempdir;
//! # fn main() -> Result<()> {
//! # let dir = tempdir()?;
//! # let source = dir.path().join("1.jpg");
//! # let destination = dir.path().join("2.jpg");
//! # std::fs::write(&source, b"channel copy")?;
//! let mut input = FileChannel::open_read(&source)?;
//! let mut output = FileChannel::create(&destination)?;
//! let mut buffer = ByteBuffer::allocate(1024)?;
//!
//! while input.read(&mut buffer)?.is_some() {
//!     buffer.flip();
//!     output.write(&mut buffer)?;
//!     buffer.clear();
//! }
//!
//! output.close()?;
//! input.close()?;
//! assert_eq!(std::fs::read(&destination)?, b"channel copy");
//! # Ok(())
//! # }
//! ```

mod copier;
mod file_channel;
mod options;


pub use copier::FileCopier;
pub use file_channel::{FileChannel, MapMode};
pub use options::{CopyOptions, CopyStrategy, DEFAULT_BUFFER_SIZE};
