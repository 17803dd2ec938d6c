//! Input sources and line splitting.
//!
//! Regular files are memory-mapped; stdin, pipes and devices are read
//! through `std::io::Read`, buffering only what has been asked for.

use std::fs::{File, Metadata};
use std::io::{self, Read};
use std::path::Path;

use memmap2::Mmap;

use crate::types::{DiffError, BINARY_BUF_SIZE};

/// Identity of the stream behind an input, used to recognise a file
/// compared against itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StreamId {
    Stdin,
    File { dev: u64, ino: u64 },
    /// Caller-assigned identity for in-memory or custom readers.
    Handle(u64),
    /// Never the same as anything, itself included.
    Anonymous,
}

impl StreamId {
    pub fn is_same(&self, other: &StreamId) -> bool {
        !matches!(self, StreamId::Anonymous) && self == other
    }
}

enum Source {
    Mapped(Mmap),
    Owned(Vec<u8>),
    Stream(Box<dyn Read>),
}

/// One side of a comparison.
pub struct Input {
    name: String,
    id: StreamId,
    size: Option<u64>,
    block_size: usize,
    source: Source,
    // Bytes pulled from a stream source so far.
    buffer: Vec<u8>,
    // Read cursor for the `Read` impl.
    pos: usize,
    eof: bool,
}

impl Input {
    /// Open `path`; `-` names standard input.
    pub fn open(path: impl AsRef<Path>) -> Result<Input, DiffError> {
        let path = path.as_ref();
        let name = path.display().to_string();
        if name == "-" {
            return Ok(Input::stdin());
        }

        let file = File::open(path).map_err(|e| DiffError::io(&name, e))?;
        let meta = file.metadata().map_err(|e| DiffError::io(&name, e))?;
        let id = stream_id(&meta);
        let block_size = block_size(&meta);

        // Zero-length regular files may still produce data (procfs), so only
        // non-empty ones are trusted for their size and mapped.
        if meta.is_file() && meta.len() > 0 {
            // SAFETY: the mapping is read-only and lives no longer than this
            // Input; concurrent truncation by another process is not guarded.
            let mmap = unsafe { Mmap::map(&file) }.map_err(|e| DiffError::io(&name, e))?;
            return Ok(Input::with_source(name, id, Some(meta.len()), block_size, Source::Mapped(mmap)));
        }
        Ok(Input::with_source(name, id, None, block_size, Source::Stream(Box::new(file))))
    }

    pub fn stdin() -> Input {
        Input::with_source(
            "-".to_string(),
            StreamId::Stdin,
            None,
            BINARY_BUF_SIZE,
            Source::Stream(Box::new(io::stdin())),
        )
    }

    /// An in-memory input of known size, with no stream identity.
    pub fn from_bytes(name: impl Into<String>, data: Vec<u8>) -> Input {
        let size = data.len() as u64;
        Input::with_source(name.into(), StreamId::Anonymous, Some(size), BINARY_BUF_SIZE, Source::Owned(data))
    }

    /// A stream of unknown size.
    pub fn from_reader(name: impl Into<String>, reader: Box<dyn Read>, id: StreamId) -> Input {
        Input::with_source(name.into(), id, None, BINARY_BUF_SIZE, Source::Stream(reader))
    }

    pub fn with_block_size(mut self, block_size: usize) -> Input {
        self.block_size = block_size.max(1);
        self
    }

    fn with_source(name: String, id: StreamId, size: Option<u64>, block_size: usize, source: Source) -> Input {
        let eof = !matches!(source, Source::Stream(_));
        Input { name, id, size, block_size, source, buffer: Vec::new(), pos: 0, eof }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn id(&self) -> StreamId {
        self.id
    }

    /// Size in bytes when the input is a regular file (or in memory).
    pub fn size(&self) -> Option<u64> {
        self.size
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    fn data(&self) -> &[u8] {
        match &self.source {
            Source::Mapped(m) => &m[..],
            Source::Owned(v) => &v[..],
            Source::Stream(_) => &self.buffer[..],
        }
    }

    // Pull from a stream until `want` bytes are buffered or it ends.
    fn pull(&mut self, want: usize) -> io::Result<()> {
        let Source::Stream(reader) = &mut self.source else {
            return Ok(());
        };
        let mut chunk = vec![0u8; BINARY_BUF_SIZE];
        while !self.eof && self.buffer.len() < want {
            match reader.read(&mut chunk) {
                Ok(0) => self.eof = true,
                Ok(n) => self.buffer.extend_from_slice(&chunk[..n]),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }

    /// Up to the first `n` bytes of the input.
    pub fn peek(&mut self, n: usize) -> Result<&[u8], DiffError> {
        self.pull(n).map_err(|e| DiffError::io(&self.name, e))?;
        let data = self.data();
        Ok(&data[..n.min(data.len())])
    }

    /// The whole input.
    pub fn contents(&mut self) -> Result<&[u8], DiffError> {
        self.pull(usize::MAX).map_err(|e| DiffError::io(&self.name, e))?;
        Ok(self.data())
    }
}

/// Serves the buffered prefix first, then reads a stream source directly.
/// Once a stream has been read past its buffered prefix, `contents` no
/// longer sees the whole input.
impl Read for Input {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let data = self.data();
        if self.pos < data.len() {
            let n = buf.len().min(data.len() - self.pos);
            buf[..n].copy_from_slice(&data[self.pos..self.pos + n]);
            self.pos += n;
            return Ok(n);
        }
        match &mut self.source {
            Source::Stream(reader) if !self.eof => {
                let n = reader.read(buf)?;
                if n == 0 && !buf.is_empty() {
                    self.eof = true;
                }
                self.pos += n;
                Ok(n)
            }
            _ => Ok(0),
        }
    }
}

#[cfg(unix)]
fn stream_id(meta: &Metadata) -> StreamId {
    use std::os::unix::fs::MetadataExt;
    StreamId::File { dev: meta.dev(), ino: meta.ino() }
}

#[cfg(not(unix))]
fn stream_id(_meta: &Metadata) -> StreamId {
    StreamId::Anonymous
}

#[cfg(unix)]
fn block_size(meta: &Metadata) -> usize {
    use std::os::unix::fs::MetadataExt;
    match meta.blksize() {
        0 => BINARY_BUF_SIZE,
        n => n as usize,
    }
}

#[cfg(not(unix))]
fn block_size(_meta: &Metadata) -> usize {
    BINARY_BUF_SIZE
}

// ============================================================================
// Lines
// ============================================================================

/// The lines of one input, without their terminators.
#[derive(Debug, Default)]
pub struct Lines<'a> {
    pub lines: Vec<&'a [u8]>,
    /// The last line has no terminating newline.
    pub missing_newline: bool,
}

impl<'a> Lines<'a> {
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn get(&self, i: usize) -> &'a [u8] {
        self.lines[i]
    }

    /// Whether line `i` is the unterminated last line.
    pub fn is_incomplete(&self, i: usize) -> bool {
        self.missing_newline && i + 1 == self.lines.len()
    }
}

/// Split on `\n`.
pub fn split_lines(data: &[u8]) -> Lines<'_> {
    let mut lines: Vec<&[u8]> = data.split(|&b| b == b'\n').collect();
    // `split` yields a trailing empty piece after a final newline.
    let missing_newline = match lines.last().map(|last| last.is_empty()) {
        Some(true) => {
            lines.pop();
            false
        }
        Some(false) => true,
        None => false,
    };
    Lines { lines, missing_newline }
}
