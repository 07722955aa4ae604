use std::collections::VecDeque;
use std::io;
use std::path::Path;

use async_trait::async_trait;
use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncReadExt, BufReader};

/// Stream of raw plate symbols feeding the supplier.
///
/// Implementations return bytes unvalidated; the supplier decides what a
/// bad symbol means.
#[async_trait]
pub trait PlateSource: Send + 'static {
    /// Next symbol, or `None` once the stream is exhausted.
    async fn next_symbol(&mut self) -> io::Result<Option<u8>>;
}

/// Buffered byte-at-a-time reader over any async byte stream.
pub struct ReaderSource<R> {
    reader: BufReader<R>,
}

impl<R: AsyncRead + Unpin + Send + 'static> ReaderSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader: BufReader::new(reader),
        }
    }
}

impl ReaderSource<File> {
    pub async fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = File::open(path).await?;
        Ok(Self::new(file))
    }
}

#[async_trait]
impl<R: AsyncRead + Unpin + Send + 'static> PlateSource for ReaderSource<R> {
    async fn next_symbol(&mut self) -> io::Result<Option<u8>> {
        match self.reader.read_u8().await {
            Ok(symbol) => Ok(Some(symbol)),
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Ok(None),
            Err(e) => Err(e),
        }
    }
}

/// In-memory symbol sequence.
#[derive(Clone, Debug, Default)]
pub struct ScriptedSource {
    symbols: VecDeque<u8>,
}

impl ScriptedSource {
    pub fn new(symbols: impl AsRef<[u8]>) -> Self {
        Self {
            symbols: symbols.as_ref().iter().copied().collect(),
        }
    }

    /// `meals` rounds of `PCD`: exactly one plate of each type per meal.
    pub fn balanced(meals: u64) -> Self {
        Self::new("PCD".repeat(meals as usize))
    }

    pub fn remaining(&self) -> usize {
        self.symbols.len()
    }
}

#[async_trait]
impl PlateSource for ScriptedSource {
    async fn next_symbol(&mut self) -> io::Result<Option<u8>> {
        Ok(self.symbols.pop_front())
    }
}
