use codeset::buffer::{Buffer, BufferError, ByteBuffer, ByteOrder, CharBuffer, IntBuffer};
use proptest::prelude::*;

#[test]
fn allocate_starts_empty_for_filling() {
    let buffer = ByteBuffer::allocate(8);

    assert_eq!(buffer.capacity(), 8);
    assert_eq!(buffer.position(), 0);
    assert_eq!(buffer.limit(), 8);
    assert_eq!(buffer.marked(), None);
    assert!(!buffer.is_read_only());
}

#[test]
fn put_flip_get() {
    let mut buffer = ByteBuffer::allocate(4);
    buffer.put(1).unwrap().put(2).unwrap().put(3).unwrap();
    buffer.flip();

    assert_eq!(buffer.limit(), 3);
    assert_eq!(buffer.get(), Ok(1));
    assert_eq!(buffer.get(), Ok(2));
    assert_eq!(buffer.get(), Ok(3));
    assert_eq!(buffer.get(), Err(BufferError::Underflow));
}

#[test]
fn put_past_limit_overflows_without_side_effects() {
    let mut buffer = ByteBuffer::allocate(2);
    buffer.put_slice(&[1, 2]).unwrap();

    assert_eq!(buffer.put(3).unwrap_err(), BufferError::Overflow);
    assert_eq!(buffer.position(), 2);

    buffer.clear();
    assert_eq!(buffer.put_slice(&[1, 2, 3]).unwrap_err(), BufferError::Overflow);
    assert_eq!(buffer.position(), 0);
}

#[test]
fn mark_and_reset() {
    let mut buffer = IntBuffer::wrap(vec![10, 20, 30, 40]);
    assert_eq!(buffer.reset().unwrap_err(), BufferError::InvalidMark);

    buffer.set_position(1).unwrap().mark();
    buffer.get().unwrap();
    buffer.get().unwrap();
    buffer.reset().unwrap();
    assert_eq!(buffer.position(), 1);

    // Moving the position before the mark discards it.
    buffer.set_position(0).unwrap();
    assert_eq!(buffer.marked(), None);
}

#[test]
fn set_limit_clamps_position_and_mark() {
    let mut buffer = ByteBuffer::allocate(10);
    buffer.set_position(8).unwrap().mark();
    buffer.set_limit(5).unwrap();

    assert_eq!(buffer.position(), 5);
    assert_eq!(buffer.marked(), None);
    assert_eq!(
        buffer.set_limit(11).unwrap_err(),
        BufferError::OutOfRange {
            index: 11,
            bound: 10
        }
    );
    assert_eq!(
        buffer.set_position(6).unwrap_err(),
        BufferError::OutOfRange { index: 6, bound: 5 }
    );
}

#[test]
fn absolute_access_is_bounded_by_limit() {
    let mut buffer = ByteBuffer::wrap(vec![0; 4]);
    buffer.set_limit(2).unwrap();

    buffer.put_at(1, 7).unwrap();
    assert_eq!(buffer.get_at(1), Ok(7));
    assert!(matches!(buffer.get_at(2), Err(BufferError::OutOfRange { .. })));
    assert!(matches!(buffer.put_at(3, 1), Err(BufferError::OutOfRange { .. })));
    assert_eq!(buffer.position(), 0);
}

#[test]
fn wrap_range_positions_on_window() {
    let buffer = ByteBuffer::wrap_range(vec![1, 2, 3, 4, 5], 1, 3).unwrap();

    assert_eq!(buffer.capacity(), 5);
    assert_eq!(buffer.position(), 1);
    assert_eq!(buffer.limit(), 4);
    assert_eq!(buffer.to_vec(), [2, 3, 4]);

    assert!(ByteBuffer::wrap_range(vec![1, 2], 1, 2).is_err());
}

#[test]
fn slice_shares_store() {
    let mut buffer = ByteBuffer::wrap(vec![1, 2, 3, 4, 5]);
    buffer.set_position(2).unwrap();

    let mut slice = buffer.slice();
    assert_eq!(slice.capacity(), 3);
    assert_eq!(slice.position(), 0);
    assert!(slice.shares_store(&buffer));

    slice.put(9).unwrap();
    assert_eq!(buffer.get_at(2), Ok(9));

    buffer.put_at(4, 8).unwrap();
    assert_eq!(slice.get_at(2), Ok(8));
}

#[test]
fn slice_range_ignores_position() {
    let buffer = ByteBuffer::wrap(vec![1, 2, 3, 4, 5]);
    let slice = buffer.slice_range(1, 2).unwrap();

    assert_eq!(slice.to_vec(), [2, 3]);
    assert!(buffer.slice_range(4, 2).is_err());
}

#[test]
fn huge_ranges_are_out_of_range() {
    let buffer = ByteBuffer::allocate(4);
    assert_eq!(
        buffer.slice_range(1, usize::MAX).unwrap_err(),
        BufferError::OutOfRange {
            index: usize::MAX,
            bound: 4
        }
    );
    assert!(matches!(
        ByteBuffer::wrap_range(vec![0; 4], 2, usize::MAX - 1),
        Err(BufferError::OutOfRange { .. })
    ));
}

#[test]
fn duplicate_has_independent_cursors() {
    let mut buffer = ByteBuffer::wrap(vec![1, 2, 3]);
    buffer.set_order(ByteOrder::LittleEndian);

    let mut copy = buffer.duplicate();
    copy.get().unwrap();

    assert_eq!(copy.position(), 1);
    assert_eq!(buffer.position(), 0);
    assert_eq!(copy.order(), ByteOrder::BigEndian);
}

#[test]
fn read_only_view_rejects_writes() {
    let mut buffer = ByteBuffer::wrap(vec![1, 2, 3]);
    let mut view = buffer.as_read_only();

    assert!(view.is_read_only());
    assert_eq!(view.put(0).unwrap_err(), BufferError::ReadOnly);
    assert_eq!(view.put_at(0, 0).unwrap_err(), BufferError::ReadOnly);
    assert_eq!(view.compact().unwrap_err(), BufferError::ReadOnly);

    buffer.put(7).unwrap();
    assert_eq!(view.get(), Ok(7));
}

#[test]
fn compact_moves_remaining_to_front() {
    let mut buffer = ByteBuffer::wrap(vec![1, 2, 3, 4, 5]);
    buffer.set_position(3).unwrap();
    buffer.compact().unwrap();

    assert_eq!(buffer.position(), 2);
    assert_eq!(buffer.limit(), 5);

    buffer.flip();
    assert_eq!(buffer.to_vec(), [4, 5]);
}

#[test]
fn put_buffer_between_overlapping_views() {
    let mut buffer = ByteBuffer::wrap(vec![1, 2, 3, 4, 5]);
    let mut src = buffer.slice_range(1, 3).unwrap();

    buffer.put_buffer(&mut src).unwrap();

    assert!(!src.has_remaining());
    buffer.rewind();
    assert_eq!(buffer.to_vec(), [2, 3, 4, 4, 5]);
}

#[test]
fn equality_compares_remaining() {
    let mut a = ByteBuffer::wrap(vec![9, 1, 2]);
    let b = ByteBuffer::wrap(vec![1, 2]);
    assert_ne!(a, b);

    a.set_position(1).unwrap();
    assert_eq!(a, b);
}

#[test]
fn typed_access_honours_order() {
    let mut buffer = ByteBuffer::allocate(8);
    buffer.put_u32(0x0102_0304).unwrap();
    buffer.set_order(ByteOrder::LittleEndian);
    buffer.put_u16(0x0506).unwrap();
    buffer.flip();

    assert_eq!(buffer.to_vec(), [1, 2, 3, 4, 6, 5]);
    assert_eq!(buffer.get_u32_at(0), Ok(0x0403_0201));
    assert_eq!(buffer.get_u16_at(6).unwrap_err(), BufferError::OutOfRange { index: 6, bound: 6 });

    buffer.set_order(ByteOrder::BigEndian);
    assert_eq!(buffer.get_f32().map(f32::to_bits), Ok(0x0102_0304));
}

#[test]
fn char_buffer_strings() {
    let mut wrapped = CharBuffer::wrap_str("héllo");
    assert!(wrapped.is_read_only());
    assert!(wrapped.is_frozen());
    assert_eq!(wrapped.put(0).unwrap_err(), BufferError::ReadOnly);
    assert_eq!(wrapped.to_string(), "héllo");

    let mut buffer = CharBuffer::allocate(3);
    assert_eq!(buffer.put_str("four").unwrap_err(), BufferError::Overflow);
    buffer.put_str("\u{1F600}").unwrap();
    buffer.flip();
    assert_eq!(buffer.remaining(), 2);
    assert_eq!(buffer.to_string_lossy(), "\u{1F600}");
}

#[derive(Debug, Clone)]
enum Op {
    Get,
    Put(u8),
    SetPosition(usize),
    SetLimit(usize),
    Mark,
    Reset,
    Clear,
    Flip,
    Rewind,
    Compact,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        Just(Op::Get),
        any::<u8>().prop_map(Op::Put),
        (0..20usize).prop_map(Op::SetPosition),
        (0..20usize).prop_map(Op::SetLimit),
        Just(Op::Mark),
        Just(Op::Reset),
        Just(Op::Clear),
        Just(Op::Flip),
        Just(Op::Rewind),
        Just(Op::Compact),
    ]
}

fn check_invariant(buffer: &Buffer<u8>) {
    let position = buffer.position();
    assert!(buffer.marked().is_none_or(|mark| mark <= position));
    assert!(position <= buffer.limit());
    assert!(buffer.limit() <= buffer.capacity());
}

proptest! {
    #[test]
    fn cursors_stay_ordered(capacity in 0..16usize, ops in prop::collection::vec(op(), 0..64)) {
        let mut buffer = ByteBuffer::allocate(capacity);

        for op in ops {
            let (position, limit, mark) = (buffer.position(), buffer.limit(), buffer.marked());

            let failed = match op {
                Op::Get => buffer.get().is_err(),
                Op::Put(value) => buffer.put(value).is_err(),
                Op::SetPosition(p) => buffer.set_position(p).is_err(),
                Op::SetLimit(l) => buffer.set_limit(l).is_err(),
                Op::Mark => { buffer.mark(); false }
                Op::Reset => buffer.reset().is_err(),
                Op::Clear => { buffer.clear(); false }
                Op::Flip => { buffer.flip(); false }
                Op::Rewind => { buffer.rewind(); false }
                Op::Compact => buffer.compact().is_err(),
            };

            if failed {
                prop_assert_eq!((buffer.position(), buffer.limit(), buffer.marked()), (position, limit, mark));
            }
            check_invariant(&buffer);
        }
    }

    #[test]
    fn flip_exposes_what_was_written(values in prop::collection::vec(any::<u8>(), 0..32), extra in 0..8usize) {
        let mut buffer = ByteBuffer::allocate(values.len() + extra);
        buffer.put_slice(&values).unwrap();
        buffer.flip();

        prop_assert_eq!(buffer.limit(), values.len());
        prop_assert_eq!(buffer.to_vec(), values);
    }

    #[test]
    fn compact_preserves_unread(values in prop::collection::vec(any::<u8>(), 1..32), read in 0..32usize) {
        let read = read % values.len();
        let mut buffer = ByteBuffer::wrap(values.clone());
        buffer.set_position(read).unwrap();
        buffer.compact().unwrap();

        prop_assert_eq!(buffer.position(), values.len() - read);
        buffer.flip();
        prop_assert_eq!(buffer.to_vec(), &values[read..]);
    }
}
