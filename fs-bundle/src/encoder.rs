use std::{
    fs::File,
    io::{BufRead, BufReader, Read, Write},
    path::{Path, PathBuf},
};

use base64::{engine::general_purpose, write::EncoderWriter};

use data_asset::{mime_for_path, AssetId};
use data_error::{BlitError, Result, WriteStage};

const KILOBYTE: usize = 1024;

/// Size of the read buffer used while streaming a file into the output
pub const DEFAULT_READ_CAPACITY: usize = 64 * KILOBYTE;

/// An image scheduled for encoding: where it lives and how it is named
/// on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedAsset {
    pub id: AssetId,
    pub mime: &'static str,
    pub path: PathBuf,
}

impl PlannedAsset {
    /// Derive id and MIME of the image at `path`
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        Ok(PlannedAsset {
            id: AssetId::from_path(path)?,
            mime: mime_for_path(path),
            path: path.to_path_buf(),
        })
    }
}

/// Streams image files as base64 into a sink.
///
/// Files are never loaded whole: the reader holds at most `capacity` bytes
/// and the base64 stage flushes to the sink as it fills, so memory stays
/// bounded by one read chunk no matter how large the file is.
#[derive(Debug, Clone, Copy)]
pub struct AssetEncoder {
    capacity: usize,
}

impl Default for AssetEncoder {
    fn default() -> Self {
        AssetEncoder {
            capacity: DEFAULT_READ_CAPACITY,
        }
    }
}

impl AssetEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        AssetEncoder {
            capacity: capacity.max(1),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Encode the file at `path` into `sink`, returning the number of
    /// source bytes read
    pub fn stream_file<W: Write>(
        &self,
        path: &Path,
        sink: &mut W,
    ) -> Result<u64> {
        log::trace!("Encoding {:?}", path);

        let file = File::open(path).map_err(|source| BlitError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        self.stream(file, path, sink)
    }

    /// Encode everything `source` yields into `sink`
    ///
    /// `path` only names the source in errors.
    pub fn stream<R: Read, W: Write>(
        &self,
        source: R,
        path: &Path,
        sink: &mut W,
    ) -> Result<u64> {
        let read_error = |source| BlitError::Read {
            path: path.to_path_buf(),
            source,
        };
        let write_error = |source| {
            BlitError::write(
                WriteStage::Payload,
                Some(path.to_path_buf()),
                source,
            )
        };

        let mut reader = BufReader::with_capacity(self.capacity, source);
        let mut encoder = EncoderWriter::new(sink, &general_purpose::STANDARD);

        let mut bytes_read: u64 = 0;
        loop {
            let chunk = reader.fill_buf().map_err(read_error)?;
            let len = chunk.len();
            if len == 0 {
                break;
            }
            encoder.write_all(chunk).map_err(write_error)?;
            reader.consume(len);
            bytes_read += len as u64;
        }
        encoder.finish().map_err(write_error)?;

        log::trace!("{} bytes have been encoded from {:?}", bytes_read, path);
        Ok(bytes_read)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine;
    use std::{cell::RefCell, io, rc::Rc};

    #[derive(Debug, PartialEq)]
    enum Event {
        Read(usize),
        Write(usize),
    }

    /// Reader that logs how much each call was asked for
    struct LoggingReader {
        data: io::Cursor<Vec<u8>>,
        log: Rc<RefCell<Vec<Event>>>,
    }

    impl Read for LoggingReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.log.borrow_mut().push(Event::Read(buf.len()));
            self.data.read(buf)
        }
    }

    /// Sink that logs the size of every write it receives
    struct LoggingSink {
        out: Vec<u8>,
        log: Rc<RefCell<Vec<Event>>>,
    }

    impl Write for LoggingSink {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.log.borrow_mut().push(Event::Write(buf.len()));
            self.out.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    struct BrokenSink;

    impl Write for BrokenSink {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "sink closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn streams_with_bounded_buffers() {
        let capacity = 1024;
        let data: Vec<u8> =
            (0..capacity * 8).map(|i| (i % 251) as u8).collect();
        let log = Rc::new(RefCell::new(Vec::new()));

        let reader = LoggingReader {
            data: io::Cursor::new(data.clone()),
            log: log.clone(),
        };
        let mut sink = LoggingSink {
            out: Vec::new(),
            log: log.clone(),
        };

        let encoder = AssetEncoder::with_capacity(capacity);
        let read = encoder
            .stream(reader, Path::new("big.png"), &mut sink)
            .unwrap();
        assert_eq!(read, data.len() as u64);
        assert_eq!(
            sink.out,
            general_purpose::STANDARD.encode(&data).into_bytes()
        );

        let log = log.borrow();
        // no single read or write ever holds the whole file
        for event in log.iter() {
            match event {
                Event::Read(n) => assert!(*n <= capacity),
                Event::Write(n) => assert!(*n < data.len()),
            }
        }

        // output starts flowing before the input is exhausted
        let first_write = log
            .iter()
            .position(|e| matches!(e, Event::Write(_)))
            .unwrap();
        let last_read = log
            .iter()
            .rposition(|e| matches!(e, Event::Read(_)))
            .unwrap();
        assert!(first_write < last_read);
    }

    #[test]
    fn empty_source_encodes_to_nothing() {
        let mut out = Vec::new();
        let read = AssetEncoder::new()
            .stream(io::empty(), Path::new("empty.png"), &mut out)
            .unwrap();
        assert_eq!(read, 0);
        assert!(out.is_empty());
    }

    #[test]
    fn write_failure_names_payload_stage_and_file() {
        let err = AssetEncoder::new()
            .stream(
                io::Cursor::new(vec![7u8; 4096]),
                Path::new("/icons/a.png"),
                &mut BrokenSink,
            )
            .unwrap_err();

        match err {
            BlitError::Write { stage, path, .. } => {
                assert_eq!(stage, WriteStage::Payload);
                assert_eq!(path, Some(PathBuf::from("/icons/a.png")));
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = AssetEncoder::new()
            .stream_file(
                Path::new("/definitely/not/here.png"),
                &mut Vec::new(),
            )
            .unwrap_err();
        assert!(matches!(err, BlitError::Read { .. }));
    }

    #[test]
    fn planned_asset_uses_stem_and_extension() {
        let asset = PlannedAsset::from_path("/icons/logo.svg").unwrap();
        assert_eq!(asset.id.as_str(), "logo");
        assert_eq!(asset.mime, "image/svg+xml");
    }
}
