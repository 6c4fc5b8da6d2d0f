//! Byte stream plumbing shared by every codec: exact reads that tolerate short reads, the int32
//! length prefix and the per-thread scratch buffer used to stage single fixed-width values.

use crate::error::{DecodeError, EncodeError};
use std::cell::RefCell;
use std::io::{ErrorKind, Read, Write};
use tracing::debug;

/// Size of the staging buffer used for bulk copies of strings and primitive arrays.
pub const CHUNK_SIZE: usize = 4096;

/// Size of the per-thread scratch buffer, the width of the largest primitive.
pub const SCRATCH_LEN: usize = 16;

thread_local! {
    static SCRATCH: RefCell<[u8; SCRATCH_LEN]> = const { RefCell::new([0; SCRATCH_LEN]) };
}

/// Runs `f` with this thread's scratch buffer. A reader or writer that re-enters the codec while
/// the buffer is lent out gets a stack buffer instead.
#[inline]
pub(crate) fn with_scratch<T>(f: impl FnOnce(&mut [u8; SCRATCH_LEN]) -> T) -> T {
    SCRATCH.with(|cell| match cell.try_borrow_mut() {
        Ok(mut buf) => f(&mut buf),
        Err(_) => f(&mut [0; SCRATCH_LEN]),
    })
}

/// Fills `buf` completely, accumulating short reads. A zero-length read before `buf` is full
/// means the stream ended and yields `DecodeError::Eof`.
pub fn read_full<R: Read + ?Sized>(r: &mut R, buf: &mut [u8]) -> Result<(), DecodeError> {
    let mut tot = 0;
    while tot < buf.len() {
        match r.read(&mut buf[tot..]) {
            Ok(0) => {
                let left = buf.len() - tot;
                debug!(read = tot, left, "stream ended before value was complete");
                return Err(DecodeError::Eof { read: tot, left });
            }
            Ok(read) => tot += read,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(DecodeError::Io(e)),
        }
    }
    Ok(())
}

/// Writes an int32 length prefix. Returns the number of written bytes.
pub fn write_len<W: Write + ?Sized>(len: usize, w: &mut W) -> Result<usize, EncodeError> {
    let prefix = i32::try_from(len).map_err(|_| EncodeError::Length(len))?;
    w.write_all(&prefix.to_le_bytes())?;
    Ok(std::mem::size_of::<i32>())
}

/// Reads an int32 length prefix.
pub fn read_len<R: Read + ?Sized>(r: &mut R) -> Result<usize, DecodeError> {
    let mut buf = [0u8; std::mem::size_of::<i32>()];
    read_full(r, &mut buf)?;
    let prefix = i32::from_le_bytes(buf);
    usize::try_from(prefix).map_err(|_| {
        debug!(prefix, "rejecting negative length prefix");
        DecodeError::Length(prefix)
    })
}


#[cfg(test)]
mod tests {
    use super::testing::ShortReader;
    use super::*;
    use std::io::{self, Cursor};

    struct Interrupting<R> {
        inner: R,
        interrupt: bool,
    }

    impl<R: Read> Read for Interrupting<R> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.interrupt = !self.interrupt;
            if self.interrupt {
                Err(io::Error::new(ErrorKind::Interrupted, "again"))
            } else {
                self.inner.read(buf)
            }
        }
    }

    #[test]
    fn accumulates_short_reads() {
        let mut r = ShortReader(Cursor::new(vec![1, 2, 3, 4, 5]));
        let mut buf = [0u8; 4];
        read_full(&mut r, &mut buf).unwrap();
        assert_eq!([1, 2, 3, 4], buf);
    }

    #[test]
    fn eof_reports_progress() {
        let mut r = ShortReader(Cursor::new(vec![1, 2]));
        let mut buf = [0u8; 8];
        match read_full(&mut r, &mut buf) {
            Err(DecodeError::Eof { read, left }) => assert_eq!((2, 6), (read, left)),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn retries_interrupted() {
        let mut r = Interrupting { inner: Cursor::new(vec![7, 8]), interrupt: false };
        let mut buf = [0u8; 2];
        read_full(&mut r, &mut buf).unwrap();
        assert_eq!([7, 8], buf);
    }

    #[test]
    fn length_prefix() {
        let mut buf = Vec::new();
        assert_eq!(4, write_len(0x0102, &mut buf).unwrap());
        assert_eq!(vec![0x02, 0x01, 0x00, 0x00], buf);
        assert_eq!(0x0102, read_len(&mut Cursor::new(&buf)).unwrap());
        assert!(matches!(write_len(i32::MAX as usize + 1, &mut buf), Err(EncodeError::Length(_))));
    }

    #[test]
    fn negative_length_prefix() {
        let buf = (-1i32).to_le_bytes();
        assert!(matches!(read_len(&mut Cursor::new(&buf)), Err(DecodeError::Length(-1))));
    }

    #[test]
    fn scratch_is_reentrant() {
        let inner = with_scratch(|outer| {
            outer[0] = 0xaa;
            with_scratch(|nested| {
                nested[0] = 0x55;
                nested[0]
            })
        });
        assert_eq!(0x55, inner);
        assert_eq!(0xaa, with_scratch(|buf| buf[0]));
    }
}
