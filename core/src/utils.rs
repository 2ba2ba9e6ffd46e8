//! Shared file utilities.

use std::{
    fs::File,
    io::{self, BufRead as _},
    path::Path,
};

use flate2::bufread::MultiGzDecoder;
use tempfile::NamedTempFile;

const GZIP_MAGIC_NUMBER: [u8; 2] = [0x1f, 0x8b];

/// Opens a file for buffered reading, decompressing it if it is gzipped.
pub fn open<P>(path: P) -> io::Result<Box<dyn io::BufRead>>
where
    P: AsRef<Path>,
{
    let mut reader = io::BufReader::new(File::open(path)?);

    if reader.fill_buf()?.starts_with(&GZIP_MAGIC_NUMBER) {
        log::debug!("Detected gzip compression");

        Ok(Box::new(io::BufReader::new(MultiGzDecoder::new(reader))))
    } else {
        Ok(Box::new(reader))
    }
}

/// Writes a file by writing to a temporary file in the same directory, and then renaming it to
/// the provided path once writing succeeded.
///
/// On error, the temporary file is removed and any existing file at the path is left untouched.
pub fn write_atomically<P, F>(path: P, write: F) -> io::Result<()>
where
    P: AsRef<Path>,
    F: FnOnce(&mut io::BufWriter<NamedTempFile>) -> io::Result<()>,
{
    let path = path.as_ref();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut writer = io::BufWriter::new(NamedTempFile::new_in(dir)?);
    write(&mut writer)?;

    let file = writer.into_inner().map_err(|e| e.into_error())?;
    file.persist(path).map_err(|e| e.error)?;

    log::debug!("Wrote '{}'", path.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::{
        fs,
        io::{Read as _, Write as _},
    };

    use flate2::{write::GzEncoder, Compression};

    #[test]
    fn test_write_atomically() -> io::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("out.txt");

        write_atomically(&path, |writer| writer.write_all(b"hello\n"))?;

        assert_eq!(fs::read_to_string(&path)?, "hello\n");

        Ok(())
    }

    #[test]
    fn test_write_atomically_error_keeps_existing() -> io::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("out.txt");
        fs::write(&path, "old\n")?;

        let result = write_atomically(&path, |writer| {
            writer.write_all(b"partial")?;
            Err(io::Error::new(io::ErrorKind::Other, "failed"))
        });

        assert!(result.is_err());
        assert_eq!(fs::read_to_string(&path)?, "old\n");
        assert_eq!(fs::read_dir(dir.path())?.count(), 1);

        Ok(())
    }

    #[test]
    fn test_open_plain_and_gzipped() -> io::Result<()> {
        let dir = tempfile::tempdir()?;

        let plain = dir.path().join("plain.txt");
        fs::write(&plain, "a b\n")?;

        let gzipped = dir.path().join("gzipped.txt.gz");
        let mut encoder = GzEncoder::new(File::create(&gzipped)?, Compression::default());
        encoder.write_all(b"a b\n")?;
        encoder.finish()?;

        for path in [plain, gzipped] {
            let mut s = String::new();
            open(path)?.read_to_string(&mut s)?;
            assert_eq!(s, "a b\n");
        }

        Ok(())
    }
}
