//! Open modes for guarded files

use std::fmt;
use std::fs::OpenOptions;
use std::str::FromStr;

/// How a guarded file is opened once the lock is held.
///
/// The string forms follow the usual `fopen` conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    /// `r`: read only, file must exist
    Read,
    /// `w`: write only, created or truncated
    Write,
    /// `a`: append only, created if absent
    Append,
    /// `r+`: read and write, file must exist
    ReadWrite,
    /// `a+`: read and append, created if absent
    ReadAppend,
}

impl OpenMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            OpenMode::Read => "r",
            OpenMode::Write => "w",
            OpenMode::Append => "a",
            OpenMode::ReadWrite => "r+",
            OpenMode::ReadAppend => "a+",
        }
    }

    pub fn is_writable(&self) -> bool {
        !matches!(self, OpenMode::Read)
    }

    pub(crate) fn open_options(&self) -> OpenOptions {
        let mut options = OpenOptions::new();
        match self {
            OpenMode::Read => options.read(true),
            OpenMode::Write => options.write(true).create(true).truncate(true),
            OpenMode::Append => options.append(true).create(true),
            OpenMode::ReadWrite => options.read(true).write(true),
            OpenMode::ReadAppend => options.read(true).append(true).create(true),
        };
        options
    }
}

impl fmt::Display for OpenMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OpenMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "r" | "rb" => Ok(OpenMode::Read),
            "w" | "wb" => Ok(OpenMode::Write),
            "a" | "ab" => Ok(OpenMode::Append),
            "r+" | "rb+" | "r+b" => Ok(OpenMode::ReadWrite),
            "a+" | "ab+" | "a+b" => Ok(OpenMode::ReadAppend),
            _ => Err(format!("Invalid open mode: {s}")),
        }
    }
}
