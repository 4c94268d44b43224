//! 缓冲区测试模块

use super::*;
use crate::error::Error;

/// 基本游标操作测试
#[cfg(test)]
mod cursor_tests {
    use super::*;

    #[test]
    fn test_allocate_initial_state() {
        let buffer = ByteBuffer::allocate(1024).unwrap();

        assert_eq!(buffer.position(), 0);
        assert_eq!(buffer.limit(), 1024);
        assert_eq!(buffer.capacity(), 1024);
        assert_eq!(buffer.remaining(), 1024);
        assert!(buffer.has_remaining());
        assert!(!buffer.is_direct());
        assert!(!buffer.is_read_only());
    }

    #[test]
    fn test_allocate_zero_capacity() {
        let mut buffer = ByteBuffer::allocate(0).unwrap();

        assert_eq!(buffer.capacity(), 0);
        assert!(!buffer.has_remaining());
        assert!(matches!(
            buffer.put_u8(1),
            Err(Error::BufferOverflow { requested: 1, remaining: 0 })
        ));
    }

    #[test]
    fn test_allocate_rejects_oversized_capacity() {
        let result = ByteBuffer::allocate(usize::MAX);
        assert!(matches!(result, Err(Error::InvalidArgument { .. })));
    }

    #[test]
    fn test_put_advances_position() {
        let mut buffer = ByteBuffer::allocate(1024).unwrap();

        buffer.put(b"abcde").unwrap();
        assert_eq!(buffer.position(), 5);
        assert_eq!(buffer.limit(), 1024);
        assert_eq!(buffer.capacity(), 1024);
    }

    #[test]
    fn test_flip_get_rewind_clear() {
        let mut buffer = ByteBuffer::allocate(1024).unwrap();
        buffer.put(b"abcde").unwrap();

        // 切换读取模式
        buffer.flip();
        assert_eq!(buffer.position(), 0);
        assert_eq!(buffer.limit(), 5);

        // 读取有效数据
        let data = buffer.get(buffer.limit()).unwrap();
        assert_eq!(data, b"abcde");
        assert_eq!(buffer.position(), 5);
        assert_eq!(buffer.limit(), 5);

        // 重读
        buffer.rewind();
        assert_eq!(buffer.position(), 0);
        assert_eq!(buffer.limit(), 5);
        assert_eq!(buffer.get(5).unwrap(), b"abcde");

        // 清空：数据仍然存在，只是处于“被遗忘”状态
        buffer.clear();
        assert_eq!(buffer.position(), 0);
        assert_eq!(buffer.limit(), 1024);
        assert_eq!(buffer.get_u8().unwrap(), b'a');
    }

    #[test]
    fn test_clear_does_not_erase() {
        let mut buffer = ByteBuffer::allocate(8).unwrap();
        buffer.put(b"stale!").unwrap();
        buffer.clear();
        buffer.put(b"ne").unwrap();

        // 只覆盖了前两个字节
        buffer.set_limit(6).unwrap();
        buffer.set_position(0).unwrap();
        assert_eq!(buffer.as_slice(), b"neale!");
    }

    #[test]
    fn test_mark_and_reset() {
        let mut buffer = ByteBuffer::allocate(1024).unwrap();
        buffer.put(b"abcde").unwrap();
        buffer.flip();

        let mut dst = vec![0u8; buffer.limit()];
        buffer.get_into(&mut dst, 0, 2).unwrap();
        assert_eq!(&dst[0..2], b"ab");
        assert_eq!(buffer.position(), 2);

        // 记录当前 position
        buffer.mark();

        buffer.get_into(&mut dst, 2, 2).unwrap();
        assert_eq!(&dst[2..4], b"cd");
        assert_eq!(buffer.position(), 4);

        buffer.reset().unwrap();
        assert_eq!(buffer.position(), 2);
        assert!(buffer.has_remaining());
        assert_eq!(buffer.remaining(), 3);

        // mark 保留，可以再次 reset
        buffer.get_u8().unwrap();
        buffer.reset().unwrap();
        assert_eq!(buffer.position(), 2);
    }

    #[test]
    fn test_reset_without_mark() {
        let mut buffer = ByteBuffer::allocate(16).unwrap();
        assert!(matches!(buffer.reset(), Err(Error::InvalidMarkState)));
    }

    #[test]
    fn test_mark_discarded_by_flip_rewind_clear() {
        let mut buffer = ByteBuffer::allocate(16).unwrap();
        buffer.put(b"abc").unwrap();

        buffer.mark();
        buffer.flip();
        assert!(matches!(buffer.reset(), Err(Error::InvalidMarkState)));

        buffer.mark();
        buffer.rewind();
        assert!(matches!(buffer.reset(), Err(Error::InvalidMarkState)));

        buffer.mark();
        buffer.clear();
        assert!(matches!(buffer.reset(), Err(Error::InvalidMarkState)));
    }

    #[test]
    fn test_overflow_leaves_state_unchanged() {
        let mut buffer = ByteBuffer::allocate(4).unwrap();
        buffer.put(b"ab").unwrap();
        buffer.mark();

        let result = buffer.put(b"cde");
        assert!(matches!(
            result,
            Err(Error::BufferOverflow { requested: 3, remaining: 2 })
        ));
        assert_eq!(buffer.position(), 2);
        assert_eq!(buffer.limit(), 4);

        // 没有部分写入
        buffer.flip();
        assert_eq!(buffer.limit(), 2);
        buffer.clear();
        buffer.set_position(2).unwrap();
        assert_eq!(buffer.as_slice(), &[0, 0]);
    }

    #[test]
    fn test_underflow_leaves_state_unchanged() {
        let mut buffer = ByteBuffer::allocate(8).unwrap();
        buffer.put(b"abc").unwrap();
        buffer.flip();

        assert!(matches!(
            buffer.get(4),
            Err(Error::BufferUnderflow { requested: 4, remaining: 3 })
        ));
        assert_eq!(buffer.position(), 0);

        buffer.get(3).unwrap();
        assert!(matches!(buffer.get_u8(), Err(Error::BufferUnderflow { .. })));
        assert_eq!(buffer.position(), 3);
    }

    #[test]
    fn test_get_into_rejects_region_outside_destination() {
        let mut buffer = ByteBuffer::wrap(b"abcdef".to_vec());
        let mut dst = [0u8; 4];

        assert!(matches!(
            buffer.get_into(&mut dst, 3, 2),
            Err(Error::InvalidArgument { .. })
        ));
        assert!(matches!(
            buffer.get_into(&mut dst, usize::MAX, 2),
            Err(Error::InvalidArgument { .. })
        ));
        assert_eq!(buffer.position(), 0);

        buffer.get_slice(&mut dst).unwrap();
        assert_eq!(&dst, b"abcd");
    }

    #[test]
    fn test_set_position_and_limit() {
        let mut buffer = ByteBuffer::allocate(10).unwrap();

        assert!(matches!(buffer.set_limit(11), Err(Error::InvalidArgument { .. })));

        buffer.set_position(8).unwrap();
        buffer.mark();

        // limit 小于 position 时 position 被拉回，mark 被丢弃
        buffer.set_limit(5).unwrap();
        assert_eq!(buffer.position(), 5);
        assert_eq!(buffer.limit(), 5);
        assert!(matches!(buffer.reset(), Err(Error::InvalidMarkState)));

        assert!(matches!(buffer.set_position(6), Err(Error::InvalidArgument { .. })));

        buffer.set_position(4).unwrap();
        buffer.mark();
        buffer.set_position(2).unwrap();
        assert!(matches!(buffer.reset(), Err(Error::InvalidMarkState)));
    }

    #[test]
    fn test_compact() {
        let mut buffer = ByteBuffer::allocate(8).unwrap();
        buffer.put(b"abcdef").unwrap();
        buffer.flip();
        buffer.get(2).unwrap();

        buffer.compact().unwrap();
        assert_eq!(buffer.position(), 4);
        assert_eq!(buffer.limit(), 8);

        buffer.put(b"gh").unwrap();
        buffer.flip();
        assert_eq!(buffer.as_slice(), b"cdefgh");
    }

    #[test]
    fn test_put_buffer() {
        let mut src = ByteBuffer::wrap(b"hello world".to_vec());
        src.set_position(6).unwrap();
        let mut dst = ByteBuffer::allocate(8).unwrap();

        dst.put_buffer(&mut src).unwrap();
        assert_eq!(dst.position(), 5);
        assert!(!src.has_remaining());

        dst.flip();
        assert_eq!(dst.as_slice(), b"world");
    }

    #[test]
    fn test_put_buffer_overflow_leaves_both_unchanged() {
        let mut src = ByteBuffer::wrap(vec![7u8; 16]);
        let mut dst = ByteBuffer::allocate(8).unwrap();

        assert!(matches!(
            dst.put_buffer(&mut src),
            Err(Error::BufferOverflow { requested: 16, remaining: 8 })
        ));
        assert_eq!(src.position(), 0);
        assert_eq!(dst.position(), 0);
    }

    #[test]
    fn test_as_mut_slice_writes_window() {
        let mut buffer = ByteBuffer::allocate(4).unwrap();
        buffer.set_position(1).unwrap();
        buffer.set_limit(3).unwrap();
        buffer.as_mut_slice().unwrap().copy_from_slice(b"xy");

        buffer.clear();
        assert_eq!(buffer.as_slice(), &[0, b'x', b'y', 0]);
    }

    #[test]
    fn test_debug_output() {
        let buffer = ByteBuffer::allocate(16).unwrap();
        let debug = format!("{buffer:?}");
        assert!(debug.contains("Heap"));
        assert!(debug.contains("capacity: 16"));
    }
}

/// 直接缓冲区测试
#[cfg(test)]
mod direct_tests {
    use super::*;

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn test_refused_allocation_is_reported_for_heap_and_direct() {
        // 64 TiB：超出可分配范围，但不超过 isize::MAX
        let capacity = 1usize << 46;

        for allocation in [Allocation::Heap, Allocation::Direct] {
            match ByteBuffer::allocate_with(capacity, allocation) {
                Err(Error::Io(err)) => {
                    assert_eq!(err.kind(), std::io::ErrorKind::OutOfMemory, "{allocation:?}")
                }
                other => panic!("expected OutOfMemory for {allocation:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_allocate_direct() {
        let mut buffer = ByteBuffer::allocate_direct(1024).unwrap();
        assert!(buffer.is_direct());
        assert_eq!(buffer.capacity(), 1024);

        buffer.put(b"direct").unwrap();
        buffer.flip();
        assert_eq!(buffer.get(6).unwrap(), b"direct");
    }

    #[test]
    fn test_allocate_direct_zero_capacity() {
        let buffer = ByteBuffer::allocate_direct(0).unwrap();
        assert!(buffer.is_direct());
        assert_eq!(buffer.capacity(), 0);
    }

    #[test]
    fn test_direct_and_heap_behave_identically() {
        for allocation in [Allocation::Heap, Allocation::Direct] {
            let mut buffer = ByteBuffer::allocate_with(32, allocation).unwrap();
            assert_eq!(buffer.is_direct(), allocation == Allocation::Direct);

            buffer.put(b"0123456789").unwrap();
            buffer.flip();
            buffer.get(3).unwrap();
            buffer.compact().unwrap();
            buffer.flip();
            assert_eq!(buffer.as_slice(), b"3456789");
        }
    }
}

/// 属性测试
#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::collection::vec;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn allocate_yields_fill_mode(capacity in 0usize..4096) {
            let buffer = ByteBuffer::allocate(capacity).unwrap();
            prop_assert_eq!(buffer.position(), 0);
            prop_assert_eq!(buffer.limit(), capacity);
            prop_assert_eq!(buffer.remaining(), capacity);
        }

        #[test]
        fn puts_concatenate_and_flip_returns_them(
            chunks in vec(vec(any::<u8>(), 0..64), 0..16)
        ) {
            let total: usize = chunks.iter().map(Vec::len).sum();
            let mut buffer = ByteBuffer::allocate(1024).unwrap();

            for chunk in &chunks {
                buffer.put(chunk).unwrap();
            }
            prop_assert_eq!(buffer.position(), total);

            buffer.flip();
            let limit = buffer.limit();
            let drained = buffer.get(buffer.remaining()).unwrap();
            prop_assert_eq!(drained, chunks.concat());
            prop_assert_eq!(buffer.position(), total);
            prop_assert_eq!(buffer.limit(), limit);
        }

        #[test]
        fn rewind_replays_identical_reads(
            data in vec(any::<u8>(), 1..256),
            steps in vec(1usize..16, 1..8)
        ) {
            let mut buffer = ByteBuffer::wrap(data);
            let limit = buffer.limit();

            let read = |buffer: &mut ByteBuffer| {
                steps
                    .iter()
                    .map(|&step| buffer.get(step.min(buffer.remaining())).unwrap())
                    .collect::<Vec<_>>()
            };

            let first = read(&mut buffer);
            buffer.rewind();
            prop_assert_eq!(buffer.position(), 0);
            prop_assert_eq!(buffer.limit(), limit);
            let second = read(&mut buffer);
            prop_assert_eq!(first, second);
        }

        #[test]
        fn reset_restores_marked_position(
            start in 0usize..64,
            reads in 0usize..32,
            writes in vec(any::<u8>(), 0..32)
        ) {
            let mut buffer = ByteBuffer::allocate(128).unwrap();
            buffer.set_position(start).unwrap();
            buffer.mark();

            buffer.get(reads).unwrap();
            buffer.put(&writes).unwrap();

            buffer.reset().unwrap();
            prop_assert_eq!(buffer.position(), start);
        }

        #[test]
        fn overflowing_put_changes_nothing(
            filled in 0usize..32,
            extra in 1usize..32
        ) {
            let mut buffer = ByteBuffer::allocate(32).unwrap();
            buffer.put(&vec![1u8; filled]).unwrap();

            let oversized = vec![2u8; 32 - filled + extra];
            let is_overflow = matches!(buffer.put(&oversized), Err(Error::BufferOverflow { .. }));
            prop_assert!(is_overflow);
            prop_assert_eq!(buffer.position(), filled);

            buffer.clear();
            prop_assert!(buffer.as_slice().iter().all(|&b| b != 2));
        }
    }
}
