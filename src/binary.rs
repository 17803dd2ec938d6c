//! Byte-for-byte comparison, for inputs treated as binary.

use std::io::{self, Read};

use log::debug;

use crate::input::Input;
use crate::types::DiffError;

fn gcd(mut a: usize, mut b: usize) -> usize {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Least common multiple of two block sizes, falling back to the larger
/// one if the product would overflow.
pub fn buffer_lcm(a: usize, b: usize) -> usize {
    let (a, b) = (a.max(1), b.max(1));
    (a / gcd(a, b)).checked_mul(b).unwrap_or(a.max(b))
}

// Read until `buf` is full or the input ends.
fn fill(input: &mut Input, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match input.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

/// Whether two inputs differ as byte streams.
///
/// Regular inputs of different sizes differ without reading; the same
/// stream never differs from itself and is not read either.
pub fn binary_files_differ(inputs: &mut [Input; 2]) -> Result<bool, DiffError> {
    if let (Some(s0), Some(s1)) = (inputs[0].size(), inputs[1].size()) {
        if s0 != s1 {
            debug!("binary: sizes differ ({} vs {})", s0, s1);
            return Ok(true);
        }
    }
    if inputs[0].id().is_same(&inputs[1].id()) {
        return Ok(false);
    }

    let size = buffer_lcm(inputs[0].block_size(), inputs[1].block_size());
    let mut bufs = [vec![0u8; size], vec![0u8; size]];
    let mut offset = 0u64;
    loop {
        let [b0, b1] = &mut bufs;
        let [in0, in1] = &mut *inputs;
        let n0 = fill(in0, b0).map_err(|e| DiffError::io(in0.name(), e))?;
        let n1 = fill(in1, b1).map_err(|e| DiffError::io(in1.name(), e))?;
        if n0 != n1 || b0[..n0] != b1[..n1] {
            debug!("binary: first difference in block at byte {}", offset);
            return Ok(true);
        }
        if n0 == 0 {
            return Ok(false);
        }
        offset += n0 as u64;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::StreamId;

    struct Unreadable;

    impl Read for Unreadable {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            panic!("stream was read");
        }
    }

    #[test]
    fn test_buffer_lcm() {
        assert_eq!(buffer_lcm(4096, 4096), 4096);
        assert_eq!(buffer_lcm(4096, 6144), 12288);
        assert_eq!(buffer_lcm(0, 512), 512);
        assert_eq!(buffer_lcm(usize::MAX, usize::MAX - 1), usize::MAX);
    }

    #[test]
    fn test_one_byte_difference() {
        let mut a = vec![7u8; 10_000];
        let b = a.clone();
        a[9_999] = 8;
        let mut inputs = [Input::from_bytes("a", a), Input::from_bytes("b", b)];
        assert!(binary_files_differ(&mut inputs).unwrap());
    }

    #[test]
    fn test_equal_streams_across_block_sizes() {
        let data: Vec<u8> = (0..50_000u32).map(|i| (i * 7 % 256) as u8).collect();
        let mut inputs = [
            Input::from_reader("a", Box::new(io::Cursor::new(data.clone())), StreamId::Anonymous)
                .with_block_size(1000),
            Input::from_reader("b", Box::new(io::Cursor::new(data)), StreamId::Anonymous)
                .with_block_size(1536),
        ];
        assert!(!binary_files_differ(&mut inputs).unwrap());
    }

    #[test]
    fn test_prefix_differs() {
        let mut inputs = [
            Input::from_reader("a", Box::new(io::Cursor::new(b"abc".to_vec())), StreamId::Anonymous),
            Input::from_reader("b", Box::new(io::Cursor::new(b"abcd".to_vec())), StreamId::Anonymous),
        ];
        assert!(binary_files_differ(&mut inputs).unwrap());
    }

    #[test]
    fn test_size_mismatch_not_read() {
        let mut inputs = [
            Input::from_bytes("a", vec![0; 3]),
            Input::from_bytes("b", vec![0; 4]),
        ];
        assert!(binary_files_differ(&mut inputs).unwrap());
    }

    #[test]
    fn test_same_stream_not_read() {
        let mut inputs = [
            Input::from_reader("a", Box::new(Unreadable), StreamId::Handle(1)),
            Input::from_reader("a", Box::new(Unreadable), StreamId::Handle(1)),
        ];
        assert!(!binary_files_differ(&mut inputs).unwrap());
    }
}
