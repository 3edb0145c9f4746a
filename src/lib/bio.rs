//! Buffered reading and writing of program text.
//!
//! `BioReader` layers byte pushback, rune reading and delimiter-based line
//! reading over a `BufReader`; `BioWriter` wraps a `BufWriter` and flushes
//! before any seek or offset query so positions always reflect what has been
//! written.

use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::Path;

const REPLACEMENT: char = '\u{fffd}';

pub struct BioReader<R> {
    r: BufReader<R>,
    // Most recent bytes returned by getc, newest first; None records EOF.
    unget: [Option<u8>; 2],
    num_unget: usize,
    last_rune: Option<char>,
    pending_rune: Option<char>,
    linelen: usize,
}

impl BioReader<File> {
    pub fn open<P: AsRef<Path>>(path: P) -> io::Result<BioReader<File>> {
        Ok(BioReader::new(File::open(path)?))
    }
}

impl<R: Read> BioReader<R> {
    pub fn new(inner: R) -> BioReader<R> {
        BioReader {
            r: BufReader::new(inner),
            unget: [None; 2],
            num_unget: 0,
            last_rune: None,
            pending_rune: None,
            linelen: 0,
        }
    }

    fn next_byte(&mut self) -> Option<u8> {
        let byte = match self.r.fill_buf() {
            Ok(buf) if !buf.is_empty() => buf[0],
            _ => return None,
        };
        self.r.consume(1);
        Some(byte)
    }

    fn peek_byte(&mut self) -> Option<u8> {
        match self.r.fill_buf() {
            Ok(buf) if !buf.is_empty() => Some(buf[0]),
            _ => None,
        }
    }

    /// Next byte, or None at end of input or on a read error.
    pub fn getc(&mut self) -> Option<u8> {
        if self.num_unget > 0 {
            self.num_unget -= 1;
            return self.unget[self.num_unget];
        }
        let c = self.next_byte();
        self.unget[1] = self.unget[0];
        self.unget[0] = c;
        c
    }

    /// Pushes back the byte most recently returned by `getc`. Up to two bytes
    /// can be pushed back; they are seen only by `getc`.
    pub fn ungetc(&mut self) {
        if self.num_unget < self.unget.len() {
            self.num_unget += 1;
        }
    }

    /// Next UTF-8 encoded character. A malformed sequence reads as U+FFFD.
    pub fn getrune(&mut self) -> Option<char> {
        if let Some(c) = self.pending_rune.take() {
            self.last_rune = Some(c);
            return Some(c);
        }
        let first = self.next_byte()?;
        let width = match first {
            0x00..=0x7f => 1,
            0xc0..=0xdf => 2,
            0xe0..=0xef => 3,
            0xf0..=0xf7 => 4,
            _ => 1,
        };
        let mut bytes = vec![first];
        while bytes.len() < width {
            match self.peek_byte() {
                Some(b) if b & 0xc0 == 0x80 => {
                    self.r.consume(1);
                    bytes.push(b);
                }
                _ => break,
            }
        }
        let c = match ::std::str::from_utf8(&bytes) {
            Ok(s) => s.chars().next().unwrap_or(REPLACEMENT),
            Err(_) => REPLACEMENT,
        };
        self.last_rune = Some(c);
        Some(c)
    }

    /// Makes the next `getrune` return the character it last returned.
    pub fn ungetrune(&mut self) {
        if let Some(c) = self.last_rune.take() {
            self.pending_rune = Some(c);
        }
    }

    /// Reads through the next `delim`, which is kept. The last line of the
    /// input may lack it. None at end of input.
    pub fn rdline(&mut self, delim: u8) -> io::Result<Option<String>> {
        let mut line = vec![];
        let n = self.r.read_until(delim, &mut line)?;
        self.linelen = n;
        if n == 0 {
            return Ok(None);
        }
        Ok(Some(String::from_utf8_lossy(&line).into_owned()))
    }

    /// Like `rdline`, dropping the delimiter when `cut` is set.
    pub fn rdstr(&mut self, delim: u8, cut: bool) -> io::Result<Option<String>> {
        let line = self.rdline(delim)?;
        Ok(line.map(|mut s| {
            if cut && s.as_bytes().last() == Some(&delim) {
                s.pop();
            }
            s
        }))
    }

    /// Length in bytes, delimiter included, of the last line read.
    pub fn linelen(&self) -> usize {
        self.linelen
    }

    /// Fills as much of `buf` as the input allows.
    pub fn read_full(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.r.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(ref e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e),
            }
        }
        Ok(filled)
    }
}

impl<R: Read + Seek> BioReader<R> {
    /// Seeks the underlying input; `SeekFrom::Current` is relative to what
    /// this reader has handed out, not to what it has buffered.
    pub fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.num_unget = 0;
        self.pending_rune = None;
        self.r.seek(pos)
    }
}

impl<R: Read> Read for BioReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.r.read(buf)
    }
}

pub struct BioWriter<W: Write> {
    w: BufWriter<W>,
}

impl BioWriter<File> {
    pub fn create<P: AsRef<Path>>(path: P) -> io::Result<BioWriter<File>> {
        Ok(BioWriter::new(File::create(path)?))
    }
}

impl<W: Write> BioWriter<W> {
    pub fn new(inner: W) -> BioWriter<W> {
        BioWriter { w: BufWriter::new(inner) }
    }

    pub fn write_str(&mut self, s: &str) -> io::Result<usize> {
        self.w.write_all(s.as_bytes())?;
        Ok(s.len())
    }

    pub fn putc(&mut self, c: u8) -> io::Result<()> {
        self.w.write_all(&[c])
    }

    /// Flushes and hands back the underlying writer.
    pub fn term(self) -> io::Result<W> {
        self.w.into_inner().map_err(io::Error::from)
    }
}

impl<W: Write + Seek> BioWriter<W> {
    pub fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.w.flush()?;
        self.w.get_mut().seek(pos)
    }

    /// Current output offset, counting everything written so far.
    pub fn offset(&mut self) -> io::Result<u64> {
        self.seek(SeekFrom::Current(0))
    }
}

impl<W: Write> Write for BioWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.w.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.w.flush()
    }
}

/// Whether `path` names something that exists.
pub fn access<P: AsRef<Path>>(path: P) -> bool {
    fs::metadata(path).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn getc_pushback_replays_in_order() {
        let mut b = BioReader::new(Cursor::new(b"xyz".to_vec()));
        assert_eq!(b.getc(), Some(b'x'));
        assert_eq!(b.getc(), Some(b'y'));
        b.ungetc();
        b.ungetc();
        assert_eq!(b.getc(), Some(b'x'));
        assert_eq!(b.getc(), Some(b'y'));
        assert_eq!(b.getc(), Some(b'z'));
        assert_eq!(b.getc(), None);
        b.ungetc();
        assert_eq!(b.getc(), None);
    }

    #[test]
    fn runes_decode_utf8() {
        let mut b = BioReader::new(Cursor::new("aé€😀".as_bytes().to_vec()));
        assert_eq!(b.getrune(), Some('a'));
        assert_eq!(b.getrune(), Some('é'));
        assert_eq!(b.getrune(), Some('€'));
        b.ungetrune();
        assert_eq!(b.getrune(), Some('€'));
        assert_eq!(b.getrune(), Some('😀'));
        assert_eq!(b.getrune(), None);
    }

    #[test]
    fn malformed_rune_is_replacement() {
        let mut b = BioReader::new(Cursor::new(vec![0xe2, b'a']));
        assert_eq!(b.getrune(), Some(REPLACEMENT));
        assert_eq!(b.getrune(), Some('a'));
    }

    #[test]
    fn lines_keep_or_cut_delimiter() {
        let mut b = BioReader::new(Cursor::new(b"one\ntwo\nend".to_vec()));
        assert_eq!(b.rdline(b'\n').unwrap(), Some("one\n".to_string()));
        assert_eq!(b.linelen(), 4);
        assert_eq!(b.rdstr(b'\n', true).unwrap(), Some("two".to_string()));
        assert_eq!(b.rdstr(b'\n', true).unwrap(), Some("end".to_string()));
        assert_eq!(b.rdline(b'\n').unwrap(), None);
    }

    #[test]
    fn seek_accounts_for_buffered_bytes() {
        let mut b = BioReader::new(Cursor::new(b"0123456789".to_vec()));
        assert_eq!(b.getc(), Some(b'0'));
        assert_eq!(b.seek(SeekFrom::Current(2)).unwrap(), 3);
        assert_eq!(b.getc(), Some(b'3'));
    }

    #[test]
    fn writer_offset_includes_buffered_output() {
        let mut w = BioWriter::new(Cursor::new(vec![]));
        w.write_str("abc").unwrap();
        w.putc(b'd').unwrap();
        assert_eq!(w.offset().unwrap(), 4);
        w.seek(SeekFrom::Start(1)).unwrap();
        w.putc(b'B').unwrap();
        let out = w.term().unwrap().into_inner();
        assert_eq!(out, b"aBcd".to_vec());
    }
}
