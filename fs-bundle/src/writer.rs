use std::io::Write;

use data_asset::wire;
use data_error::{BlitError, Result, WriteStage};

use crate::encoder::{AssetEncoder, PlannedAsset};

/// Serializes planned assets into a generated buffer, one record at a time.
///
/// Each record is written completely (header, streamed payload, trailer)
/// before the next one starts, so the writer never holds more than the
/// record in flight.
pub struct BufferWriter<W: Write> {
    sink: W,
    encoder: AssetEncoder,
    inline: bool,
    records: usize,
    bytes_read: u64,
}

impl<W: Write> BufferWriter<W> {
    /// Write the preamble into `sink` and return a writer ready for records
    pub fn begin(
        mut sink: W,
        encoder: AssetEncoder,
        use_object_urls: bool,
        inline: bool,
    ) -> Result<Self> {
        let preamble = wire::preamble(use_object_urls, inline);
        sink.write_all(preamble.as_bytes())
            .map_err(|e| BlitError::write(WriteStage::Preamble, None, e))?;

        Ok(BufferWriter {
            sink,
            encoder,
            inline,
            records: 0,
            bytes_read: 0,
        })
    }

    /// Append one record, streaming its payload from disk
    pub fn write_record(&mut self, asset: &PlannedAsset) -> Result<()> {
        let path = Some(asset.path.clone());

        let first = self.records == 0;
        let header = wire::record_header(asset.id.as_str(), asset.mime, first)?;
        self.sink
            .write_all(header.as_bytes())
            .map_err(|e| {
                BlitError::write(WriteStage::Header, path.clone(), e)
            })?;

        self.bytes_read += self
            .encoder
            .stream_file(&asset.path, &mut self.sink)?;

        self.sink
            .write_all(wire::RECORD_TRAILER.as_bytes())
            .map_err(|e| BlitError::write(WriteStage::Trailer, path, e))?;

        self.records += 1;
        log::trace!("Record {:?} has been written", asset.id);
        Ok(())
    }

    /// Number of records written so far
    pub fn records(&self) -> usize {
        self.records
    }

    /// Number of source bytes streamed so far
    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    /// Close the ingestion call, flush and hand the sink back
    pub fn finish(mut self) -> Result<W> {
        let flush_error = |e| BlitError::write(WriteStage::Flush, None, e);

        self.sink
            .write_all(wire::epilogue(self.inline).as_bytes())
            .map_err(flush_error)?;
        self.sink.flush().map_err(flush_error)?;

        Ok(self.sink)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_asset::{AssetRecord, WireBuffer};
    use std::{fs, io, path::PathBuf};
    use tempdir::TempDir;

    /// Sink accepting a fixed number of bytes before failing
    struct LimitedSink {
        out: Vec<u8>,
        limit: usize,
    }

    impl Write for LimitedSink {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.out.len() + buf.len() > self.limit {
                return Err(io::Error::new(io::ErrorKind::Other, "full"));
            }
            self.out.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn planned(dir: &TempDir, name: &str, bytes: &[u8]) -> PlannedAsset {
        let path = dir.path().join(name);
        fs::write(&path, bytes).unwrap();
        PlannedAsset::from_path(path).unwrap()
    }

    #[test]
    fn writes_records_in_order() {
        let dir = TempDir::new("writer").unwrap();
        let a = planned(&dir, "a.png", b"first image");
        let b = planned(&dir, "b.gif", b"second image");

        let mut writer =
            BufferWriter::begin(Vec::new(), AssetEncoder::new(), true, false)
                .unwrap();
        writer.write_record(&a).unwrap();
        writer.write_record(&b).unwrap();
        assert_eq!(writer.records(), 2);
        assert_eq!(writer.bytes_read(), 23);

        let out = writer.finish().unwrap();
        let parsed = WireBuffer::parse(std::str::from_utf8(&out).unwrap())
            .unwrap();

        assert_eq!(
            parsed,
            WireBuffer::new(
                true,
                vec![
                    AssetRecord::from_bytes("a", "image/png", b"first image"),
                    AssetRecord::from_bytes("b", "image/gif", b"second image"),
                ]
            )
        );
    }

    #[test]
    fn empty_buffer_is_still_a_valid_program() {
        let writer =
            BufferWriter::begin(Vec::new(), AssetEncoder::new(), false, true)
                .unwrap();
        let out = writer.finish().unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            r#"<script type="text/javascript">BLITTER.parseBuffer([]);</script>"#
        );
    }

    #[test]
    fn failure_reports_stage_and_file() {
        let dir = TempDir::new("writer").unwrap();
        let a = planned(&dir, "a.png", &[1u8; 8192]);

        let preamble_len = wire::preamble(false, false).len();
        let sink = LimitedSink {
            out: Vec::new(),
            limit: preamble_len + 100,
        };
        let mut writer =
            BufferWriter::begin(sink, AssetEncoder::new(), false, false)
                .unwrap();

        match writer.write_record(&a).unwrap_err() {
            BlitError::Write { stage, path, .. } => {
                assert_eq!(stage, WriteStage::Payload);
                assert_eq!(path, Some(a.path.clone()));
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn preamble_failure_has_no_file() {
        let sink = LimitedSink {
            out: Vec::new(),
            limit: 0,
        };
        let result =
            BufferWriter::begin(sink, AssetEncoder::new(), true, false);
        assert!(matches!(
            result,
            Err(BlitError::Write {
                stage: WriteStage::Preamble,
                path: None,
                ..
            })
        ));
    }

    #[test]
    fn unreadable_source_is_a_read_error() {
        let asset = PlannedAsset {
            id: "ghost".into(),
            mime: "image/png",
            path: PathBuf::from("/no/such/ghost.png"),
        };
        let mut writer =
            BufferWriter::begin(Vec::new(), AssetEncoder::new(), false, false)
                .unwrap();
        assert!(matches!(
            writer.write_record(&asset),
            Err(BlitError::Read { .. })
        ));
    }
}
