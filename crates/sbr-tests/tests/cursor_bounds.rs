//! Cursor arithmetic and bounds enforcement.
//!
//! The cursor is monotonically non-decreasing, advances by exactly the
//! resolved byte count of each completed operation, and never exceeds the
//! source size. A read that would cross the end fails the whole program
//! synchronously, before any fetch, and abandons everything queued after
//! it — including programs declared from a later batch whose cumulative
//! reads exceed what is left.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use sbr_reader::ReadError;
use sbr_tests::reader;

#[tokio::test]
async fn cursor_tracks_the_sum_of_resolved_counts() {
    let mut r = reader(&[0u8; 16]);
    assert_eq!(r.position(), 0);

    r.read_u8("a").commit().await.unwrap();
    assert_eq!(r.position(), 1);

    r.read_u16("b").skip(3).commit().await.unwrap();
    assert_eq!(r.position(), 6);

    r.read_u32("c").with_count(2).commit().await.unwrap();
    assert_eq!(r.position(), 14);

    r.read_bytes_to_end("rest").commit().await.unwrap();
    assert_eq!(r.position(), 16);
    assert_eq!(r.remaining(), 0);
}

#[tokio::test]
async fn exact_fit_is_accepted_one_byte_over_is_not() {
    let mut r = reader(&[0u8; 4]);
    r.read_u32("fits").commit().await.unwrap();
    assert_eq!(r.position(), 4);

    let result = r.read_u8("over").commit().await;
    assert!(matches!(
        result,
        Err(ReadError::BoundsExceeded {
            cursor: 4,
            requested: 1,
            total: 4
        })
    ));
    // The rejection happened at dequeue; the cursor never moved.
    assert_eq!(r.position(), 4);
}

#[tokio::test]
async fn later_operations_never_run_after_a_bounds_failure() {
    let ran = Arc::new(AtomicUsize::new(0));
    let (r1, r2) = (Arc::clone(&ran), Arc::clone(&ran));

    let mut r = reader(&[1, 2, 3, 4]);
    let result = r
        .read_bytes_with(2, move |_| {
            r1.fetch_add(1, Ordering::SeqCst);
        })
        .read_u32("too_far")
        .read_bytes_with(1, move |_| {
            r2.fetch_add(1, Ordering::SeqCst);
        })
        .commit()
        .await;

    assert!(matches!(result, Err(ReadError::BoundsExceeded { .. })));
    // Only the operation before the violation completed.
    assert_eq!(ran.load(Ordering::SeqCst), 1);
    assert_eq!(r.pending_ops(), 0);
}

#[tokio::test]
async fn a_second_batch_over_the_remainder_is_a_fresh_bounds_violation() {
    let mut r = reader(&[0u8; 6]);
    r.read_u32("head").commit().await.unwrap();
    assert_eq!(r.remaining(), 2);

    // Two bytes remain; a program asking for four must fail outright —
    // no lenient truncation, no partial record.
    let result = r.read_u16("a").read_u16("b").commit().await;
    assert!(matches!(
        result,
        Err(ReadError::BoundsExceeded {
            cursor: 6,
            requested: 2,
            total: 6
        })
    ));

    // The reader stays usable and the failed batch left nothing behind.
    let record = r.read_bytes_to_end("tail").commit().await.unwrap();
    assert!(!record.contains("a"));
    assert_eq!(record.get("tail").unwrap().as_bytes(), Some(&[][..]));
}

#[tokio::test]
async fn remainder_reads_cannot_overrun() {
    // A remainder read resolves to exactly what is left, so it is always
    // in bounds — even when nothing is left.
    let mut r = reader(b"xy");
    let record = r
        .read_bytes("both", 2)
        .read_bytes_to_end("nothing")
        .commit()
        .await
        .unwrap();

    assert_eq!(record.get("nothing").unwrap().as_bytes(), Some(&[][..]));
    assert_eq!(r.position(), 2);
}

#[tokio::test]
async fn overflowing_width_times_count_is_a_bounds_error() {
    // A count so large that width * count does not fit in a u64 cannot
    // fit in any source either. It must be rejected the same way as an
    // ordinary over-read, not wrap around the cursor arithmetic.
    let mut r = reader(&[0u8; 8]);
    let result = r.read_u32("huge").with_count((1usize << 62) + 1).commit().await;

    assert!(matches!(result, Err(ReadError::BoundsExceeded { .. })));
    assert_eq!(r.position(), 0);
    assert_eq!(r.pending_ops(), 0);
}

#[tokio::test]
async fn skip_past_the_end_fails_like_any_read() {
    let mut r = reader(&[0u8; 3]);
    let result = r.skip(4).commit().await;
    assert!(matches!(
        result,
        Err(ReadError::BoundsExceeded {
            cursor: 0,
            requested: 4,
            total: 3
        })
    ));
}
