use std::borrow::Cow;
use std::fmt;
use std::fmt::Write;
use std::io;
use std::str::from_utf8;

use byteorder::{BigEndian, ByteOrder, WriteBytesExt};

use super::Error;

const POINTER: u8 = 0b1100_0000;
const MAX_LABEL_LEN: usize = 63;

/// A domain name, either borrowed from a received packet or built from text.
///
/// Packet names may use compression pointers into `original`; they are
/// validated once by `scan` so later walks cannot fail.
#[derive(Debug, Clone)]
pub enum Name<'a> {
    FromPacket {
        labels: &'a [u8],
        /// The whole packet. Compression offsets are relative to it.
        original: &'a [u8],
    },

    FromStr(Cow<'a, str>),
}

impl<'a> Name<'a> {
    /// Reads the name at the start of `data`, which must be a subslice of
    /// `original`. Returns the name and the number of bytes it occupies in
    /// `data`.
    pub fn scan(data: &'a [u8], original: &'a [u8]) -> Result<(Name<'a>, usize), Error> {
        let base = (data.as_ptr() as usize).wrapping_sub(original.as_ptr() as usize);
        let mut pos = 0;
        loop {
            let byte = *data.get(pos).ok_or(Error::UnexpectedEOF)?;
            if byte == 0 {
                return Ok((
                    Name::FromPacket {
                        labels: &data[..pos + 1],
                        original,
                    },
                    pos + 1,
                ));
            } else if byte & POINTER == POINTER {
                if data.len() < pos + 2 {
                    return Err(Error::UnexpectedEOF);
                }
                let off = (BigEndian::read_u16(&data[pos..pos + 2]) & !0xC000) as usize;
                // Only backwards pointers, so a malicious packet cannot loop.
                if off >= base + pos {
                    return Err(Error::BadPointer);
                }
                Name::scan(&original[off..], original)?;
                return Ok((
                    Name::FromPacket {
                        labels: &data[..pos + 2],
                        original,
                    },
                    pos + 2,
                ));
            } else if byte & POINTER == 0 {
                let end = pos + byte as usize + 1;
                if end >= data.len() {
                    return Err(Error::UnexpectedEOF);
                }
                if !data[pos + 1..end].is_ascii() {
                    return Err(Error::LabelIsNotAscii);
                }
                pos = end;
            } else {
                return Err(Error::UnknownLabelFormat);
            }
        }
    }

    pub fn from_str<T: Into<Cow<'a, str>>>(name: T) -> Name<'a> {
        Name::FromStr(name.into())
    }

    /// Collects the labels of this name, following compression pointers.
    pub fn labels(&self) -> Vec<&str> {
        match *self {
            Name::FromPacket { labels, original } => {
                let mut out = Vec::new();
                let mut data = labels;
                let mut pos = 0;
                loop {
                    let byte = data[pos];
                    if byte == 0 {
                        return out;
                    } else if byte & POINTER == POINTER {
                        let off = (BigEndian::read_u16(&data[pos..pos + 2]) & !0xC000) as usize;
                        data = &original[off..];
                        pos = 0;
                    } else {
                        let end = pos + byte as usize + 1;
                        // scan() checked every label is ASCII
                        out.push(from_utf8(&data[pos + 1..end]).unwrap_or_default());
                        pos = end;
                    }
                }
            }
            Name::FromStr(ref name) => name.split('.').filter(|l| !l.is_empty()).collect(),
        }
    }

    /// Writes the name in uncompressed wire form.
    pub fn write_to<T: io::Write>(&self, writer: &mut T) -> io::Result<()> {
        for label in self.labels() {
            if label.len() > MAX_LABEL_LEN {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("label {:?} is longer than {} bytes", label, MAX_LABEL_LEN),
                ));
            }
            writer.write_u8(label.len() as u8)?;
            writer.write_all(label.as_bytes())?;
        }
        writer.write_u8(0)
    }
}

impl<'a> fmt::Display for Name<'a> {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        for (i, label) in self.labels().into_iter().enumerate() {
            if i != 0 {
                fmt.write_char('.')?;
            }
            fmt.write_str(label)?;
        }
        Ok(())
    }
}

impl<'a> PartialEq for Name<'a> {
    fn eq(&self, other: &Name) -> bool {
        let ours = self.labels();
        let theirs = other.labels();
        ours.len() == theirs.len()
            && ours
                .iter()
                .zip(theirs.iter())
                .all(|(a, b)| a.eq_ignore_ascii_case(b))
    }
}

impl<'a> Eq for Name<'a> {}
