//! Record framing for the frame log: a little-endian `u32` payload length
//! followed by the payload bytes.

use std::io::{self, BufRead, ErrorKind, Read, Write};

use super::FrameStoreError;

const HEADER_LEN: usize = 4;

pub(crate) fn write_record(out: &mut impl Write, payload: &[u8]) -> Result<(), FrameStoreError> {
    let len = u32::try_from(payload.len())
        .map_err(|_| FrameStoreError::Corrupt("frame larger than 4GiB".into()))?;
    out.write_all(&len.to_le_bytes())?;
    out.write_all(payload)?;
    Ok(())
}

/// Pulls records off a buffered reader. End of input exactly on a record
/// boundary is the end of the log; anywhere else it is corruption.
pub(crate) struct RecordReader<R> {
    inner: R,
    offset: u64,
}

impl<R: BufRead> RecordReader<R> {
    pub(crate) fn new(inner: R) -> Self {
        Self { inner, offset: 0 }
    }

    pub(crate) fn next_record(&mut self) -> Result<Option<Vec<u8>>, FrameStoreError> {
        if self.inner.fill_buf()?.is_empty() {
            return Ok(None);
        }
        let mut header = [0u8; HEADER_LEN];
        self.inner
            .read_exact(&mut header)
            .map_err(|err| truncated(err, "length header", self.offset))?;
        let len = u32::from_le_bytes(header) as usize;
        let mut payload = vec![0u8; len];
        self.inner
            .read_exact(&mut payload)
            .map_err(|err| truncated(err, "frame payload", self.offset))?;
        self.offset += (HEADER_LEN + len) as u64;
        Ok(Some(payload))
    }
}

fn truncated(err: io::Error, part: &str, offset: u64) -> FrameStoreError {
    if err.kind() == ErrorKind::UnexpectedEof {
        FrameStoreError::Corrupt(format!("truncated {part} in record at byte {offset}"))
    } else {
        err.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::BufReader;

    /// Hands out at most one byte per read call.
    struct Trickle<'a>(&'a [u8]);

    impl Read for Trickle<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.0.is_empty() || buf.is_empty() {
                return Ok(0);
            }
            buf[0] = self.0[0];
            self.0 = &self.0[1..];
            Ok(1)
        }
    }

    fn framed(payloads: &[&[u8]]) -> Vec<u8> {
        let mut out = Vec::new();
        for payload in payloads {
            write_record(&mut out, payload).unwrap();
        }
        out
    }

    fn read_all(bytes: &[u8]) -> Result<Vec<Vec<u8>>, FrameStoreError> {
        let mut reader = RecordReader::new(BufReader::with_capacity(1, Trickle(bytes)));
        let mut records = Vec::new();
        while let Some(record) = reader.next_record()? {
            records.push(record);
        }
        Ok(records)
    }

    #[test]
    fn short_reads_still_yield_whole_records() {
        let bytes = framed(&[b"first", b"", b"third record"]);
        let records = read_all(&bytes).unwrap();
        assert_eq!(
            records,
            vec![b"first".to_vec(), Vec::new(), b"third record".to_vec()]
        );
    }

    #[test]
    fn empty_input_is_an_empty_log() {
        assert!(read_all(&[]).unwrap().is_empty());
    }

    #[test]
    fn partial_header_after_a_record_is_corrupt() {
        let mut bytes = framed(&[b"ok"]);
        bytes.extend_from_slice(&[9, 0]);
        match read_all(&bytes) {
            Err(FrameStoreError::Corrupt(msg)) => {
                assert_eq!(msg, "truncated length header in record at byte 6");
            }
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[test]
    fn short_payload_is_corrupt() {
        let mut bytes = framed(&[b"abcdef"]);
        bytes.truncate(bytes.len() - 2);
        assert!(matches!(
            read_all(&bytes),
            Err(FrameStoreError::Corrupt(msg)) if msg.contains("frame payload")
        ));
    }
}
