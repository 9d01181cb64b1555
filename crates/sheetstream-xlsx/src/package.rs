//! Access to the parts of an OPC (zip) package

use std::io::{BufRead, BufReader, Read, Seek, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::error::{XlsxError, XlsxResult};

/// Read side of a package: named parts in a zip archive
pub struct PackageReader<R: Read + Seek> {
    archive: ZipArchive<R>,
}

impl<R: Read + Seek> PackageReader<R> {
    /// Open a package, reading the zip central directory
    pub fn new(reader: R) -> XlsxResult<Self> {
        let archive = ZipArchive::new(reader)?;
        log::debug!("opened package with {} parts", archive.len());
        Ok(Self { archive })
    }

    /// Check whether a part exists
    pub fn has_part(&self, name: &str) -> bool {
        self.archive.index_for_name(name).is_some()
    }

    /// Names of every part in archive order
    pub fn list_parts(&self) -> Vec<String> {
        self.archive.file_names().map(str::to_string).collect()
    }

    /// Open a part for streaming reads
    ///
    /// A part that does not exist is [`XlsxError::InvalidFile`].
    pub fn open_part(&mut self, name: &str) -> XlsxResult<impl BufRead + '_> {
        match self.archive.by_name(name) {
            Ok(file) => Ok(BufReader::new(file)),
            Err(zip::result::ZipError::FileNotFound) => {
                Err(XlsxError::InvalidFile(format!("missing part '{}'", name)))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Open a part only if it exists
    pub fn open_optional_part(&mut self, name: &str) -> XlsxResult<Option<impl BufRead + '_>> {
        if !self.has_part(name) {
            return Ok(None);
        }
        self.open_part(name).map(Some)
    }
}

/// Write side of a package
pub struct PackageWriter<W: Write + Seek> {
    zip: ZipWriter<W>,
    options: SimpleFileOptions,
    parts: Vec<String>,
}

impl<W: Write + Seek> PackageWriter<W> {
    /// Start a new package
    pub fn new(writer: W, compression: CompressionMethod) -> Self {
        Self {
            zip: ZipWriter::new(writer),
            options: SimpleFileOptions::default().compression_method(compression),
            parts: Vec::new(),
        }
    }

    /// Start a part, returning a writer for its content
    ///
    /// The part stays open until the next `create_part` or [`finish`](Self::finish).
    pub fn create_part(&mut self, name: &str) -> XlsxResult<impl Write + '_> {
        if self.parts.iter().any(|p| p == name) {
            return Err(XlsxError::InvalidFile(format!("duplicate part '{}'", name)));
        }
        self.zip.start_file(name, self.options)?;
        self.parts.push(name.to_string());
        Ok(&mut self.zip)
    }

    /// Write a whole part at once
    pub fn write_part(&mut self, name: &str, content: &[u8]) -> XlsxResult<()> {
        self.create_part(name)?.write_all(content)?;
        Ok(())
    }

    /// Names of the parts created so far
    pub fn parts(&self) -> &[String] {
        &self.parts
    }

    /// Write the central directory and return the underlying writer
    pub fn finish(self) -> XlsxResult<W> {
        log::debug!("finishing package with {} parts", self.parts.len());
        Ok(self.zip.finish()?)
    }
}
