//! Input loading and report writing

use std::{
    fmt,
    fs::File,
    io::{self, BufReader, Read, Write},
    path::PathBuf,
};

use serde_json::{Map, Value};

use crate::{scan::Report, Result, ScanError};

/// Where the input document comes from
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Source {
    #[default]
    Stdin,
    Path(PathBuf),
}

impl Source {
    /// `None` and `"-"` mean standard input; anything else is a path.
    pub fn from_arg(arg: Option<&str>) -> Self {
        match arg {
            None | Some("-") => Source::Stdin,
            Some(path) => Source::Path(PathBuf::from(path)),
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Stdin => f.write_str("<stdin>"),
            Source::Path(p) => write!(f, "{}", p.display()),
        }
    }
}

/// Load the symbol → bars mapping.
///
/// A document whose top level is not an object yields an empty mapping.
pub fn load(source: &Source) -> Result<Map<String, Value>> {
    match source {
        Source::Stdin => load_from_reader(io::stdin().lock()),
        Source::Path(path) => {
            let file = File::open(path).map_err(|error| ScanError::Io {
                source_name: source.to_string(),
                error,
            })?;
            load_from_reader(BufReader::new(file))
        }
    }
}

/// Like [`load`], for any reader.
pub fn load_from_reader<R: Read>(reader: R) -> Result<Map<String, Value>> {
    let document: Value = serde_json::from_reader(reader)?;
    match document {
        Value::Object(map) => Ok(map),
        _ => Ok(Map::new()),
    }
}

/// Write the report as one pretty-printed JSON document followed by a newline.
pub fn write_report<W: Write>(report: &Report, mut writer: W) -> Result<()> {
    let io_err = |error| ScanError::Io {
        source_name: "<output>".to_string(),
        error,
    };
    serde_json::to_writer_pretty(&mut writer, report).map_err(|e| io_err(io::Error::from(e)))?;
    writer.write_all(b"\n").map_err(io_err)?;
    writer.flush().map_err(io_err)
}
