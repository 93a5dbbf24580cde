//! Integration tests: buffer lifecycle against instrumented backends.
//!
//! Double-free detection is asserted against `QuarantineBackend`, which
//! keeps released blocks mapped so reading a freed header is sound.

use bril_rt_alloc::{array_info, check_index, AllocError, ArrayAllocator, ArrayInfo};
use bril_rt_core::ErrorKind;
use bril_rt_test_utils::{CountingBackend, QuarantineBackend};
use proptest::prelude::*;

#[test]
fn second_free_is_reported_as_double_free() {
    let alloc = ArrayAllocator::with_backend(QuarantineBackend::new(), true);
    let ptr = alloc.allocate(4, 8).unwrap();
    // SAFETY: the quarantine keeps the block mapped after the first free.
    unsafe {
        alloc.free(ptr.as_ptr()).unwrap();
        let err = alloc.free(ptr.as_ptr()).unwrap_err();
        assert_eq!(
            err,
            AllocError::DoubleFree {
                address: ptr.as_ptr() as usize
            }
        );
        assert_eq!(err.kind(), ErrorKind::ContractViolation);
    }
    // The failed free released nothing further.
    assert_eq!(alloc.backend().quarantined(), 1);
    assert_eq!(alloc.stats().frees, 1);
}

#[test]
fn queries_after_free_report_use_after_free() {
    let alloc = ArrayAllocator::with_backend(QuarantineBackend::new(), true);
    let ptr = alloc.allocate(2, 8).unwrap();
    // SAFETY: the quarantine keeps the block mapped after the free.
    unsafe {
        alloc.free(ptr.as_ptr()).unwrap();
        assert_eq!(
            array_info(ptr.as_ptr()),
            Err(AllocError::UseAfterFree {
                address: ptr.as_ptr() as usize
            })
        );
        assert!(matches!(
            check_index(ptr.as_ptr(), 0),
            Err(AllocError::UseAfterFree { .. })
        ));
    }
}

#[test]
fn zero_length_double_free_is_detected() {
    let alloc = ArrayAllocator::with_backend(QuarantineBackend::new(), true);
    let ptr = alloc.allocate(0, 1).unwrap();
    // SAFETY: quarantined as above.
    unsafe {
        alloc.free(ptr.as_ptr()).unwrap();
        assert!(matches!(
            alloc.free(ptr.as_ptr()),
            Err(AllocError::DoubleFree { .. })
        ));
    }
}

#[test]
fn header_and_elements_share_one_block() {
    let alloc = ArrayAllocator::with_backend(CountingBackend::new(), true);
    let ptr = alloc.allocate(10, 8).unwrap();
    assert_eq!(alloc.backend().outstanding(), 1);
    assert_eq!(alloc.backend().outstanding_bytes(), 32 + 80);
    // SAFETY: ptr is live.
    unsafe { alloc.free(ptr.as_ptr()) }.unwrap();
    assert_eq!(alloc.backend().outstanding(), 0);
    assert_eq!(alloc.backend().outstanding_bytes(), 0);
}

#[test]
fn rejected_requests_never_reach_the_backend() {
    let alloc = ArrayAllocator::with_backend(CountingBackend::new(), true);
    assert!(alloc.allocate(-1, 8).is_err());
    assert!(alloc.allocate(1, 0).is_err());
    assert!(alloc.allocate(1, -4).is_err());
    assert!(alloc.allocate(i64::MAX, i64::MAX).is_err());
    assert_eq!(alloc.backend().acquired(), 0);
}

#[test]
fn non_zeroed_allocator_still_records_metadata() {
    let alloc = ArrayAllocator::with_backend(CountingBackend::new(), false);
    let mut buf = alloc.allocate_buffer(6, 2).unwrap();
    assert!(buf.as_bytes().iter().all(|&b| b == 0));
    buf.as_bytes_mut().fill(7);
    assert_eq!(
        buf.info(),
        ArrayInfo {
            length: 6,
            element_width: 2
        }
    );
    drop(buf);
    assert_eq!(alloc.backend().outstanding(), 0);
}

/// One step of an allocation script.
#[derive(Clone, Debug)]
enum Op {
    Alloc { length: i64, width: i64 },
    /// Free the live buffer at this position (modulo live count).
    Free(usize),
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0i64..256, prop::sample::select(vec![1i64, 2, 4, 8, 16]))
            .prop_map(|(length, width)| Op::Alloc { length, width }),
        any::<usize>().prop_map(Op::Free),
    ]
}

proptest! {
    #[test]
    fn allocate_free_round_trip_leaves_no_outstanding_blocks(
        length in 0i64..4096,
        width in 1i64..32,
    ) {
        let alloc = ArrayAllocator::with_backend(CountingBackend::new(), true);
        let ptr = alloc.allocate(length, width).unwrap();
        // SAFETY: ptr is live until freed below.
        unsafe {
            let info = array_info(ptr.as_ptr()).unwrap();
            prop_assert_eq!(info.length, length as u64);
            prop_assert_eq!(info.element_width, width as u64);
            alloc.free(ptr.as_ptr()).unwrap();
        }
        prop_assert_eq!(alloc.backend().outstanding(), 0);
        prop_assert_eq!(alloc.live(), 0);
    }

    #[test]
    fn metadata_survives_full_element_writes(
        length in 0i64..1024,
        width in 1i64..16,
        fill in any::<u8>(),
    ) {
        let alloc = ArrayAllocator::system();
        let ptr = alloc.allocate(length, width).unwrap();
        // SAFETY: length * width writable bytes follow ptr.
        unsafe {
            std::ptr::write_bytes(ptr.as_ptr(), fill, (length * width) as usize);
            prop_assert_eq!(array_info(ptr.as_ptr()).unwrap().length, length as u64);
            alloc.free(ptr.as_ptr()).unwrap();
        }
    }

    #[test]
    fn interleaved_scripts_balance(ops in prop::collection::vec(arb_op(), 1..64)) {
        let alloc = ArrayAllocator::with_backend(CountingBackend::new(), true);
        let mut live = Vec::new();
        for op in ops {
            match op {
                Op::Alloc { length, width } => {
                    let ptr = alloc.allocate(length, width).unwrap();
                    live.push((ptr, length as u64));
                }
                Op::Free(i) if !live.is_empty() => {
                    let (ptr, length) = live.swap_remove(i % live.len());
                    // SAFETY: ptr is live and removed from the list.
                    unsafe {
                        prop_assert_eq!(array_info(ptr.as_ptr()).unwrap().length, length);
                        alloc.free(ptr.as_ptr()).unwrap();
                    }
                }
                Op::Free(_) => {}
            }
            prop_assert_eq!(alloc.live(), live.len());
            prop_assert_eq!(alloc.backend().outstanding(), live.len());
        }
        for (ptr, _) in live {
            // SAFETY: every remaining pointer is live.
            unsafe { alloc.free(ptr.as_ptr()) }.unwrap();
        }
        prop_assert_eq!(alloc.backend().outstanding(), 0);
    }
}
