#![no_main]
use std::cell::RefCell;

use arbitrary::{Arbitrary, Unstructured};
use libfuzzer_sys::{fuzz_mutator, fuzz_target, fuzzer_mutate};
use pathnorm::{Growth, PathBuffer, is_absolute};
use rand::rngs::SmallRng;
use rand::{Rng, RngCore, SeedableRng};

const HEADER: usize = 2; // 1 flag + 1 capacity slack

thread_local! {
    static RNG: RefCell<SmallRng> = RefCell::new(SmallRng::from_os_rng());
}

/// Working directories the absolute pass resolves against.
static CWD_TABLE: &[&str] = &["/home/user", "C:\\work\\sub", "d:", "file://srv", "/"];

/// One path piece. Weighted towards the bytes the rewrite loops react to.
#[derive(Debug, Arbitrary)]
enum Piece {
    Slash,
    Backslash,
    Dot,
    DotDot,
    Drive(u8),
    Colon,
    Protocol,
    Segment(u8),
    Raw(u8),
}

impl Piece {
    fn write(&self, out: &mut Vec<u8>) {
        match self {
            Piece::Slash => out.push(b'/'),
            Piece::Backslash => out.push(b'\\'),
            Piece::Dot => out.push(b'.'),
            Piece::DotDot => out.extend_from_slice(b".."),
            Piece::Drive(letter) => out.extend_from_slice(&[b'a' + letter % 26, b':']),
            Piece::Colon => out.push(b':'),
            Piece::Protocol => out.extend_from_slice(b"file://"),
            Piece::Segment(len) => out.extend((0..len % 6).map(|i| b'a' + i)),
            Piece::Raw(byte) => out.push(*byte),
        }
    }
}

fn with_rng<F, R>(f: F) -> R
where
    F: FnOnce(&mut SmallRng) -> R,
{
    RNG.with(|cell| f(&mut cell.borrow_mut()))
}

fn mutator(data: &mut [u8], size: usize, max_size: usize, seed: u32) -> usize {
    if size < HEADER || seed.is_multiple_of(10) {
        data[0] = with_rng(|rng| rng.next_u32() as u8);
        data[1] = with_rng(|rng| rng.random_range(0..8));

        let mut prefix = HEADER;
        while prefix < size.max(HEADER + 1) && prefix < max_size {
            prefix += append_pieces(&mut data[prefix..], max_size - prefix);
        }
        prefix
    } else {
        fuzzer_mutate(data, size, max_size)
    }
}

/// Writes a run of path pieces into `buf`, never more than `limit` bytes.
fn append_pieces(buf: &mut [u8], limit: usize) -> usize {
    let pieces = loop {
        let seed: Vec<u8> = with_rng(|rng| {
            let n = rng.random_range(1..64);
            (0..n).map(|_| rng.random::<u8>()).collect()
        });
        match Vec::<Piece>::arbitrary(&mut Unstructured::new(&seed)) {
            Ok(pieces) if !pieces.is_empty() => break pieces,
            _ => continue,
        }
    };

    let mut bytes = Vec::new();
    for piece in &pieces {
        piece.write(&mut bytes);
    }
    let len = bytes.len().min(limit);
    buf[..len].copy_from_slice(&bytes[..len]);
    len
}

fuzz_mutator!(|data: &mut [u8], size: usize, max_size: usize, seed: u32| {
    mutator(data, size, max_size, seed)
});

fn normalize(data: &[u8]) {
    if data.len() < HEADER {
        return;
    }
    let flags = data[0];
    let slack = usize::from(data[1] % 8);
    let path = &data[HEADER..];
    let growth = Growth::from(flags & 1 != 0);

    let mut buf = PathBuffer::with_capacity(path, path.len() + slack);
    let capacity = buf.capacity();
    let once = buf.clean(growth).to_owned();
    assert!(buf.len() <= buf.capacity());
    if !growth.is_permitted() {
        assert_eq!(buf.capacity(), capacity, "refused growth reallocated");
    }

    if growth.is_permitted() {
        assert_eq!(pathnorm::clean(&once), once, "clean is not idempotent");
    }

    let cwd = CWD_TABLE[usize::from(flags >> 1) % CWD_TABLE.len()];
    let mut buf = PathBuffer::with_capacity(path, path.len() + slack);
    let resolved = buf.absolute(cwd, growth).to_owned();
    if growth.is_permitted() {
        assert!(is_absolute(&resolved), "{resolved:?} is not absolute");
    }
}

fuzz_target!(|data: &[u8]| normalize(data));
