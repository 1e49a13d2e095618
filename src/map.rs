// SPDX-License-Identifier: GPL-3.0-or-later

//! The public facade: owns a map image and exposes the two passes as methods.

use std::fs;
use std::path::Path;

use crate::address::{read_struct, translate_main};
use crate::error::OpenError;
use crate::header::{IndexHeader, MapHeader};
use crate::rename::{rename, ClassNamer, ReferenceMap};

/// An opened map image. Carries the buffer even when `error` is set, so a
/// caller willing to proceed at their own risk still has something to work with.
pub struct MapHandle {
    buffer: Vec<u8>,
    error: OpenError,
}

impl MapHandle {
    /// Validates `buffer`'s header and index pointer without copying it
    /// anywhere else; the handle takes ownership.
    pub fn open(buffer: Vec<u8>) -> Self {
        let error = validate(&buffer).err().unwrap_or(OpenError::Ok);
        Self { buffer, error }
    }

    /// Reads the whole file at `path` and validates it as [`Self::open`] does.
    pub fn open_path<P: AsRef<Path>>(path: P) -> Self {
        match fs::read(path) {
            Ok(buffer) => Self::open(buffer),
            Err(_) => Self {
                buffer: Vec::new(),
                error: OpenError::InvalidPath,
            },
        }
    }

    /// The validation outcome from opening.
    pub fn error(&self) -> OpenError {
        self.error
    }

    /// The current buffer contents.
    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    /// Runs the class-recovery walk, replacing this handle's buffer with the result.
    pub fn deprotect(&mut self) {
        self.buffer = crate::deprotect::deprotect(&self.buffer);
    }

    /// Runs name synthesis, replacing this handle's buffer with the result.
    pub fn rename(&mut self, class_namer: &dyn ClassNamer, reference_maps: &[ReferenceMap]) {
        self.buffer = rename(&self.buffer, class_namer, reference_maps);
    }

    /// Writes the current buffer to `path`.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        fs::write(path, &self.buffer)
    }
}

fn validate(buffer: &[u8]) -> Result<(), OpenError> {
    let header = read_struct::<MapHeader>(buffer, 0).ok_or(OpenError::InvalidHeader)?;
    if !header.is_integrity_valid() {
        return Err(OpenError::InvalidHeader);
    }
    let index_offset = header.index_offset as usize;
    let index_header = read_struct::<IndexHeader>(buffer, index_offset).ok_or(OpenError::InvalidIndexPointer)?;
    let main_magic = header.main_magic();
    translate_main(index_header.tag_index_pointer, main_magic, buffer.len())
        .map_err(|_| OpenError::InvalidIndexPointer)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_of_empty_buffer_reports_invalid_header() {
        let handle = MapHandle::open(Vec::new());
        assert_eq!(handle.error(), OpenError::InvalidHeader);
    }

    #[test]
    fn open_path_of_missing_file_reports_invalid_path() {
        let handle = MapHandle::open_path("/nonexistent/path/does/not/exist.map");
        assert_eq!(handle.error(), OpenError::InvalidPath);
    }
}
