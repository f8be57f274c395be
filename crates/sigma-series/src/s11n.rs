//! Saving and loading series.
//!
//! A stream is a raw preamble (magic bytes and a format tag) followed by a
//! header carrying the archive version and the Rust type name of the
//! series, then the series itself. Portable formats encode header and body
//! as JSON, binary formats with bincode. The whole stream may be wrapped in
//! a bzip2, gzip or zlib codec.
//!
//! Binary archives are read into memory first and decoded with a size
//! limit equal to their length, so a corrupt length prefix fails cleanly
//! instead of triggering a huge allocation.

use std::fmt;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use bincode::Options;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::coefficient::Coefficient;
use crate::error::{Result, SeriesError};
use crate::key::Key;
use crate::series::Series;

const MAGIC: &[u8; 5] = b"SIGMA";
const VERSION: u32 = 1;

/// Encoding of the archive.
///
/// The names follow the usual archive suffixes, but there are only two
/// encodings underneath: the portable formats are JSON (`serde_json`) and
/// the binary formats are `bincode`. The `Msgpack*` variants are not
/// MessagePack on the wire; they differ from the `Boost*` ones only in the
/// format tag, so an archive loads back only under the format it was saved
/// with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SaveFormat {
    /// Portable archive, JSON.
    BoostPortable,
    /// Binary archive, bincode.
    BoostBinary,
    /// Portable archive, JSON under its own tag.
    MsgpackPortable,
    /// Binary archive, bincode under its own tag.
    MsgpackBinary,
}

impl SaveFormat {
    /// All formats.
    pub const ALL: [Self; 4] = [
        Self::BoostPortable,
        Self::BoostBinary,
        Self::MsgpackPortable,
        Self::MsgpackBinary,
    ];

    /// Filename suffix, without the dot.
    #[must_use]
    pub fn suffix(self) -> &'static str {
        match self {
            Self::BoostPortable => "boostp",
            Self::BoostBinary => "boostb",
            Self::MsgpackPortable => "mpackp",
            Self::MsgpackBinary => "mpackb",
        }
    }

    /// Returns true for the byte-stable formats.
    #[must_use]
    pub fn is_portable(self) -> bool {
        matches!(self, Self::BoostPortable | Self::MsgpackPortable)
    }

    fn tag(self) -> u8 {
        match self {
            Self::BoostPortable => 0,
            Self::BoostBinary => 1,
            Self::MsgpackPortable => 2,
            Self::MsgpackBinary => 3,
        }
    }

    fn from_tag(tag: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.tag() == tag)
    }

    fn from_suffix(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.suffix() == s)
    }
}

impl fmt::Display for SaveFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

/// Compression applied on top of the archive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Compression {
    /// Uncompressed.
    #[default]
    None,
    /// bzip2.
    Bzip2,
    /// gzip.
    Gzip,
    /// zlib, with the `.zip` suffix.
    Zlib,
}

impl Compression {
    /// All compression methods.
    pub const ALL: [Self; 4] = [Self::None, Self::Bzip2, Self::Gzip, Self::Zlib];

    /// Filename suffix, without the dot; `None` for no compression.
    #[must_use]
    pub fn suffix(self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::Bzip2 => Some("bz2"),
            Self::Gzip => Some("gz"),
            Self::Zlib => Some("zip"),
        }
    }

    fn from_suffix(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.suffix() == Some(s))
    }
}

#[derive(Serialize, Deserialize)]
struct Header {
    version: u32,
    type_name: String,
}

fn io_error(e: std::io::Error) -> SeriesError {
    SeriesError::invalid(format!("i/o failure while processing an archive: {e}"))
}

fn corrupt(e: impl fmt::Display) -> SeriesError {
    SeriesError::invalid(format!("corrupt archive: {e}"))
}

// Fixed-width integers and trailing bytes allowed: the layout of plain
// `bincode::serialize`, with the options spelled out so reads can be limited.
fn bincode_options() -> impl Options + Copy {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .allow_trailing_bytes()
}

/// Writes `s` to `writer`.
///
/// # Errors
///
/// `InvalidArgument` when encoding or writing fails.
pub fn save<C, K, W>(s: &Series<C, K>, writer: W, format: SaveFormat, compression: Compression) -> Result<()>
where
    C: Coefficient,
    K: Key,
    W: Write,
{
    debug!(%format, ?compression, terms = s.len(), "saving series");
    match compression {
        Compression::None => {
            let mut w = writer;
            write_archive(s, &mut w, format)?;
            w.flush().map_err(io_error)
        }
        Compression::Bzip2 => {
            let mut enc = bzip2::write::BzEncoder::new(writer, bzip2::Compression::best());
            write_archive(s, &mut enc, format)?;
            enc.finish().map_err(io_error)?.flush().map_err(io_error)
        }
        Compression::Gzip => {
            let mut enc = flate2::write::GzEncoder::new(writer, flate2::Compression::default());
            write_archive(s, &mut enc, format)?;
            enc.finish().map_err(io_error)?.flush().map_err(io_error)
        }
        Compression::Zlib => {
            let mut enc = flate2::write::ZlibEncoder::new(writer, flate2::Compression::default());
            write_archive(s, &mut enc, format)?;
            enc.finish().map_err(io_error)?.flush().map_err(io_error)
        }
    }
}

fn write_archive<C: Coefficient, K: Key>(s: &Series<C, K>, w: &mut dyn Write, format: SaveFormat) -> Result<()> {
    w.write_all(MAGIC).map_err(io_error)?;
    w.write_all(&[format.tag()]).map_err(io_error)?;
    let header = Header {
        version: VERSION,
        type_name: std::any::type_name::<Series<C, K>>().to_string(),
    };
    if format.is_portable() {
        serde_json::to_writer(&mut *w, &header).map_err(corrupt)?;
        w.write_all(b"\n").map_err(io_error)?;
        serde_json::to_writer(&mut *w, s).map_err(corrupt)?;
    } else {
        bincode_options().serialize_into(&mut *w, &header).map_err(corrupt)?;
        bincode_options().serialize_into(&mut *w, s).map_err(corrupt)?;
    }
    Ok(())
}

/// Reads a series of type `Series<C, K>` from `reader`.
///
/// # Errors
///
/// `TypeMismatch` when the archive was written in another format or by
/// another series type, `InvalidArgument` for truncated or corrupt data.
pub fn load<C, K, R>(reader: R, format: SaveFormat, compression: Compression) -> Result<Series<C, K>>
where
    C: Coefficient,
    K: Key,
    R: Read,
{
    debug!(%format, ?compression, "loading series");
    match compression {
        Compression::None => read_archive(reader, format),
        Compression::Bzip2 => read_archive(bzip2::read::BzDecoder::new(reader), format),
        Compression::Gzip => read_archive(flate2::read::GzDecoder::new(reader), format),
        Compression::Zlib => read_archive(flate2::read::ZlibDecoder::new(reader), format),
    }
}

fn read_archive<C: Coefficient, K: Key, R: Read>(mut r: R, format: SaveFormat) -> Result<Series<C, K>> {
    let mut preamble = [0u8; 6];
    r.read_exact(&mut preamble).map_err(io_error)?;
    if &preamble[..5] != MAGIC {
        return Err(SeriesError::invalid("the stream is not a series archive"));
    }
    let found = SaveFormat::from_tag(preamble[5]).ok_or_else(|| corrupt("unknown format tag"))?;
    if found != format {
        return Err(SeriesError::type_mismatch(format!(
            "the archive was saved as '{found}' but is being loaded as '{format}'"
        )));
    }
    let expected = std::any::type_name::<Series<C, K>>();
    if format.is_portable() {
        let mut de = serde_json::Deserializer::from_reader(r);
        let header = Header::deserialize(&mut de).map_err(corrupt)?;
        check_header(&header, expected)?;
        let s = Series::<C, K>::deserialize(&mut de).map_err(corrupt)?;
        de.end().map_err(corrupt)?;
        Ok(s)
    } else {
        let mut bytes = Vec::new();
        r.read_to_end(&mut bytes).map_err(io_error)?;
        let limit = u64::try_from(bytes.len()).map_err(corrupt)?;
        let options = bincode_options().with_limit(limit);
        let mut rest = bytes.as_slice();
        let header: Header = options.deserialize_from(&mut rest).map_err(corrupt)?;
        check_header(&header, expected)?;
        options.deserialize_from(&mut rest).map_err(corrupt)
    }
}

fn check_header(header: &Header, expected: &str) -> Result<()> {
    if header.version != VERSION {
        return Err(corrupt(format!("unsupported archive version {}", header.version)));
    }
    if header.type_name != expected {
        return Err(SeriesError::type_mismatch(format!(
            "the archive holds a '{}', not a '{expected}'",
            header.type_name
        )));
    }
    Ok(())
}

/// Infers format and compression from a filename such as `p.boostb.bz2`.
///
/// # Errors
///
/// `InvalidArgument` when the suffixes are not recognised.
pub fn detect_format(path: &Path) -> Result<(SaveFormat, Compression)> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| SeriesError::invalid(format!("unable to deduce the archive format of {}", path.display())))?;
    let mut parts = name.rsplit('.');
    let last = parts.next().unwrap_or_default();
    let (compression, fmt_suffix) = match Compression::from_suffix(last) {
        Some(c) => (c, parts.next().unwrap_or_default()),
        None => (Compression::None, last),
    };
    let format = SaveFormat::from_suffix(fmt_suffix).ok_or_else(|| {
        SeriesError::invalid(format!(
            "unable to deduce the archive format of '{name}': unknown suffix '{fmt_suffix}'"
        ))
    })?;
    Ok((format, compression))
}

/// Saves `s` to `path`, with format and compression taken from its suffix.
///
/// # Errors
///
/// `InvalidArgument` for unknown suffixes or i/o failures.
pub fn save_file<C: Coefficient, K: Key>(s: &Series<C, K>, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let (format, compression) = detect_format(path)?;
    save_file_with(s, path, format, compression)
}

/// Saves `s` to `path` with an explicit format and compression.
///
/// # Errors
///
/// `InvalidArgument` for i/o failures.
pub fn save_file_with<C: Coefficient, K: Key>(
    s: &Series<C, K>,
    path: impl AsRef<Path>,
    format: SaveFormat,
    compression: Compression,
) -> Result<()> {
    let file = File::create(path.as_ref()).map_err(io_error)?;
    save(s, BufWriter::new(file), format, compression)
}

/// Loads a series from `path`, with format and compression taken from its
/// suffix.
///
/// # Errors
///
/// As [`load`], plus `InvalidArgument` for unknown suffixes.
pub fn load_file<C: Coefficient, K: Key>(path: impl AsRef<Path>) -> Result<Series<C, K>> {
    let path = path.as_ref();
    let (format, compression) = detect_format(path)?;
    load_file_with(path, format, compression)
}

/// Loads a series from `path` with an explicit format and compression.
///
/// # Errors
///
/// As [`load`].
pub fn load_file_with<C: Coefficient, K: Key>(
    path: impl AsRef<Path>,
    format: SaveFormat,
    compression: Compression,
) -> Result<Series<C, K>> {
    let file = File::open(path.as_ref()).map_err(io_error)?;
    load(BufReader::new(file), format, compression)
}
