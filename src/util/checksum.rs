use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};

use bytes::Bytes;
use futures::StreamExt;
use futures_core::{ready, Stream};
use pin_project_lite::pin_project;
use sha1::{Digest, Sha1};
use tokio::fs::File;
use tokio_util::io::ReaderStream;
use tracing::trace;

use crate::util::fs::write_atomically;

/// A digest algorithm that is fed a stream chunk by chunk
pub trait StreamDigest: Send {
    fn add_data(&mut self, data: &Bytes);

    /// lowercase hex representation of the digest over all data added so far
    fn hex_digest(&self) -> String;

    /// extension of the checksum file written next to a file, e.g. "sha1"
    fn file_extension(&self) -> &'static str;
}

pub struct Sha1StreamDigest {
    hasher: Sha1,
}
impl Sha1StreamDigest {
    pub fn new() -> Sha1StreamDigest {
        Sha1StreamDigest {
            hasher: Default::default(),
        }
    }
}
impl StreamDigest for Sha1StreamDigest {
    fn add_data(&mut self, data: &Bytes) {
        self.hasher.update(data);
    }

    fn hex_digest(&self) -> String {
        hex::encode(self.hasher.clone().finalize())
    }

    fn file_extension(&self) -> &'static str {
        "sha1"
    }
}

pub struct Md5StreamDigest {
    context: md5::Context,
}
impl Md5StreamDigest {
    pub fn new() -> Md5StreamDigest {
        Md5StreamDigest {
            context: md5::Context::new(),
        }
    }
}
impl StreamDigest for Md5StreamDigest {
    fn add_data(&mut self, data: &Bytes) {
        self.context.consume(data);
    }

    fn hex_digest(&self) -> String {
        let hash: [u8;16] = self.context.clone()
            .compute()
            .into();
        hex::encode(hash)
    }

    fn file_extension(&self) -> &'static str {
        "md5"
    }
}

pub type SharedDigests = Arc<Mutex<Vec<Box<dyn StreamDigest>>>>;

pin_project! {
    /// Passes a byte stream through unchanged while feeding every chunk to a set of digests.
    ///
    /// The digests are shared so they can be inspected after the stream was consumed by
    ///  someone else (e.g. written to a file).
    pub struct ChecksummingStream<S> {
        #[pin]
        inner: S,
        digests: SharedDigests,
    }
}
impl<S> ChecksummingStream<S> {
    pub fn new(inner: S, digests: SharedDigests) -> ChecksummingStream<S> {
        ChecksummingStream {
            inner,
            digests,
        }
    }
}

impl<S: Stream<Item = anyhow::Result<Bytes>>> Stream for ChecksummingStream<S> {
    type Item = anyhow::Result<Bytes>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.project();
        let inner = ready!(this.inner.poll_next(cx));
        if let Some(Ok(data)) = &inner {
            if let Ok(mut digests) = this.digests.lock() {
                for digest in digests.iter_mut() {
                    digest.add_data(data);
                }
            }
        }
        Poll::Ready(inner)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// md5 and sha1 - the checksums maven repositories carry for every file
pub fn default_digests() -> SharedDigests {
    Arc::new(Mutex::new(vec![
        Box::new(Md5StreamDigest::new()) as Box<dyn StreamDigest>,
        Box::new(Sha1StreamDigest::new()),
    ]))
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Checksum {
    pub file_extension: &'static str,
    pub hex: String,
}

pub fn collect_checksums(digests: &SharedDigests) -> anyhow::Result<Vec<Checksum>> {
    let digests = digests.lock()
        .map_err(|_| anyhow::Error::msg("checksum state is poisoned"))?;
    Ok(digests.iter()
        .map(|d| Checksum { file_extension: d.file_extension(), hex: d.hex_digest() })
        .collect())
}

pub fn file_stream(file: File) -> impl Stream<Item = anyhow::Result<Bytes>> + Send {
    ReaderStream::new(file)
        .map(|chunk| chunk.map_err(anyhow::Error::from))
}

/// Computes md5 and sha1 of a file's content
pub async fn file_checksums(path: &Path) -> anyhow::Result<Vec<Checksum>> {
    let digests = default_digests();
    let mut stream = Box::pin(ChecksummingStream::new(file_stream(File::open(path).await?), digests.clone()));
    while let Some(chunk) = stream.next().await {
        chunk?;
    }
    collect_checksums(&digests)
}

/// Writes `<file>.md5` and `<file>.sha1` next to a file, returning the paths written
pub async fn write_checksum_files(path: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    for checksum in file_checksums(path).await? {
        let mut checksum_path = path.as_os_str().to_owned();
        checksum_path.push(".");
        checksum_path.push(checksum.file_extension);
        let checksum_path = PathBuf::from(checksum_path);

        trace!("writing {} checksum {} to {}", checksum.file_extension, checksum.hex, checksum_path.display());
        write_atomically(&checksum_path, checksum.hex.as_bytes()).await?;
        written.push(checksum_path);
    }
    Ok(written)
}
