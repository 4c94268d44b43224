//! Cursor-based byte buffers
//!
//! 基于游标的字节缓冲区
//!
//! A [`ByteBuffer`] is a fixed-capacity byte region with four cursors:
//! - `capacity`: fixed at creation
//! - `limit`: bytes at or beyond it cannot be read or written
//! - `position`: next byte to read or write
//! - `mark`: optional saved position restored by `reset()`
//!
//! [`ByteBuffer`] 是带四个游标的定长字节区域：
//! - `capacity`：创建时确定，不可改变
//! - `limit`：界限，界限之后的数据不能读写
//! - `position`：下一个读写的位置
//! - `mark`：可选的已保存位置，通过 `reset()` 恢复
//!
//! `0 <= mark <= position <= limit <= capacity`
//!
//! # Heap and Direct Buffers
//!
//! [`ByteBuffer::allocate`] places bytes on the process heap.
//! [`ByteBuffer::allocate_direct`] places them in an anonymous page-aligned OS
//! mapping, which I/O calls can use without an intermediate copy. Both behave
//! identically otherwise.
//!
//! # 堆缓冲区与直接缓冲区
//!
//! [`ByteBuffer::allocate`] 在进程堆上分配字节。
//! [`ByteBuffer::allocate_direct`] 在匿名、页对齐的操作系统映射中分配，
//! I/O 调用可以直接使用而无需中间拷贝。除此之外两者行为一致。
//!
//! ```
//! use byte_channel::{ByteBuffer, Result};
//! # fn main() -> Result<()> {
//! let mut buffer = ByteBuffer::allocate_direct(1024)?;
//! assert!(buffer.is_direct());
//!
//! buffer.put(b"abcde")?;
//! buffer.flip();
//!
//! let mut dst = [0u8; 5];
//! buffer.get_into(&mut dst, 0, 2)?;
//! buffer.mark();
//! buffer.get_into(&mut dst, 2, 2)?;
//! assert_eq!(buffer.position(), 4);
//!
//! buffer.reset()?;
//! assert_eq!(buffer.position(), 2);
//! assert_eq!(buffer.remaining(), 3);
//! # Ok(())
//! # }
//! ```

mod byte_buffer;
mod storage;

#[cfg(test)]
mod tests;

pub use byte_buffer::ByteBuffer;
pub use storage::Allocation;
pub(crate) use storage::Storage;
