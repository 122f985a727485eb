mod property_idempotence;

/// Iterations per property; CI runs more, miri far fewer.
fn quickcheck_tests() -> u64 {
    #[cfg(not(any(miri, feature = "test-fast")))]
    let tests = if is_ci::cached() { 20_000 } else { 2_000 };
    #[cfg(any(miri, feature = "test-fast"))]
    let tests = 10;
    tests
}
