use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use serde::{Serialize, Serializer};

use crate::error::FileNameError;

/// `<group>_<sequence>.jpg`, the group carries no digits
const FILE_NAME_PATTERN: &str = r"^(?P<name>[^\d]+)_(?P<number>\d+)\.(?i:jpg)$";

fn file_name_regex() -> Result<&'static Regex, FileNameError> {
    static PATTERN: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(FILE_NAME_PATTERN))
        .as_ref()
        .map_err(|e| FileNameError::Pattern(e.clone()))
}

/// An image on disk together with the page it belongs to
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageFile {
    /// Serialized lossily, directories need not be UTF-8
    #[serde(serialize_with = "serialize_path_lossy")]
    pub path: PathBuf,
    pub file_name: String,
    pub group_name: String,
    pub sequence_number: u64,
}

impl ImageFile {
    /// Parses the file name part of `path`
    pub fn from_path(path: impl Into<PathBuf>) -> Result<Self, FileNameError> {
        let path = path.into();
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| FileNameError::NoFileName { path: path.clone() })?
            .to_string();

        let (group_name, sequence_number) = parse_file_name(&file_name)?;

        Ok(Self {
            path,
            file_name,
            group_name,
            sequence_number,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn serialize_path_lossy<S: Serializer>(path: &Path, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&path.to_string_lossy())
}

/// Splits `mona_12.jpg` into `("mona", 12)`
pub fn parse_file_name(file_name: &str) -> Result<(String, u64), FileNameError> {
    let mismatch = || FileNameError::Mismatch {
        file_name: file_name.to_string(),
    };

    let captures = file_name_regex()?.captures(file_name).ok_or_else(mismatch)?;
    let name = captures.name("name").ok_or_else(mismatch)?.as_str();
    let number = captures
        .name("number")
        .ok_or_else(mismatch)?
        .as_str()
        .parse::<u64>()
        .map_err(|_| mismatch())?;

    Ok((name.to_string(), number))
}
