//! Container format detection from file signatures.

use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{GridReadError, GridReadResult};

const HDF5_SIGNATURE: &[u8; 8] = b"\x89HDF\r\n\x1a\n";
const HDF4_SIGNATURE: &[u8; 4] = b"\x0e\x03\x13\x01";

/// HDF5 allows a user block before the superblock; the signature may sit at
/// offset 0 or any power of two from 512.
const HDF5_SIGNATURE_OFFSETS: [usize; 4] = [0, 512, 1024, 2048];

/// Container formats the readers understand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GridFormat {
    /// HDF5, including netCDF-4 and HDF-EOS5
    Hdf5,
    /// HDF4, including HDF-EOS2 (AIRS, MODIS)
    Hdf4,
    /// netCDF classic / 64-bit offset / CDF5
    NetCdf,
}

impl GridFormat {
    /// Identify a container from its leading bytes.
    pub fn from_magic(header: &[u8]) -> Option<Self> {
        if header.starts_with(HDF4_SIGNATURE) {
            return Some(Self::Hdf4);
        }
        if header.len() >= 4 && &header[..3] == b"CDF" && matches!(header[3], 1 | 2 | 5) {
            return Some(Self::NetCdf);
        }
        for offset in HDF5_SIGNATURE_OFFSETS {
            if header.len() >= offset + HDF5_SIGNATURE.len()
                && &header[offset..offset + HDF5_SIGNATURE.len()] == HDF5_SIGNATURE
            {
                return Some(Self::Hdf5);
            }
        }
        None
    }

    /// Read the file header and identify its container.
    pub fn detect<P: AsRef<Path>>(path: P) -> GridReadResult<Self> {
        let path = path.as_ref();
        let mut header = Vec::with_capacity(2056);
        File::open(path)?.take(2056).read_to_end(&mut header)?;

        Self::from_magic(&header).ok_or_else(|| {
            GridReadError::UnsupportedFormat(format!(
                "{} is not an HDF4, HDF5 or netCDF file",
                path.display()
            ))
        })
    }
}

impl fmt::Display for GridFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hdf5 => write!(f, "HDF5"),
            Self::Hdf4 => write!(f, "HDF4"),
            Self::NetCdf => write!(f, "netCDF"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_magic_hdf4() {
        assert_eq!(
            GridFormat::from_magic(&[0x0e, 0x03, 0x13, 0x01, 0x00]),
            Some(GridFormat::Hdf4)
        );
    }

    #[test]
    fn test_magic_hdf5_with_user_block() {
        let mut header = vec![0u8; 512];
        header.extend_from_slice(HDF5_SIGNATURE);
        assert_eq!(GridFormat::from_magic(&header), Some(GridFormat::Hdf5));
        assert_eq!(GridFormat::from_magic(HDF5_SIGNATURE), Some(GridFormat::Hdf5));
    }

    #[test]
    fn test_magic_netcdf_classic() {
        assert_eq!(GridFormat::from_magic(b"CDF\x01rest"), Some(GridFormat::NetCdf));
        assert_eq!(GridFormat::from_magic(b"CDF\x02"), Some(GridFormat::NetCdf));
        assert_eq!(GridFormat::from_magic(b"CDF\x03"), None);
    }

    #[test]
    fn test_magic_unknown() {
        assert_eq!(GridFormat::from_magic(b"GRIB"), None);
        assert_eq!(GridFormat::from_magic(&[]), None);
    }

    #[test]
    fn test_detect_text_file_is_unsupported() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"not a grid file").unwrap();

        let result = GridFormat::detect(file.path());
        assert!(matches!(result, Err(GridReadError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_detect_missing_file_is_io_error() {
        let result = GridFormat::detect("/nonexistent/AIRS.2024.01.01.hdf");
        assert!(matches!(result, Err(GridReadError::IoError(_))));
    }
}
