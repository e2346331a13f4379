//! Fake product trees on disk.
//!
//! Products carry real names and headers but no payload; only discovery
//! and lazy loading can be exercised against them.

use std::fs;
use std::path::{Path, PathBuf};

use crate::fixtures::{self, names, times, ManifestSpec};

/// Payload files found in a typical OLCI Level-1B SAFE directory.
const OLCI_PAYLOAD_FILES: [&str; 4] = [
    "Oa01_radiance.nc",
    "Oa17_radiance.nc",
    "tie_meteo.nc",
    "geo_coordinates.nc",
];

/// Create a SAFE directory `root/name` with the given manifest.
pub fn write_sen3_product(root: &Path, name: &str, manifest: &ManifestSpec) -> PathBuf {
    let dir = root.join(name);
    fs::create_dir_all(&dir).expect("Failed to create SAFE directory");
    fs::write(dir.join("xfdumanifest.xml"), manifest.to_xml()).expect("Failed to write manifest");
    for payload in OLCI_PAYLOAD_FILES {
        fs::write(dir.join(payload), b"CDF\x01").expect("Failed to write payload stub");
    }
    dir
}

/// OLCI L1B ERR product with a complete manifest.
pub fn write_olci_err(root: &Path) -> PathBuf {
    write_sen3_product(root, names::OLCI_ERR, &ManifestSpec::olci_err())
}

/// SAFE directory without its manifest.
pub fn write_sen3_without_manifest(root: &Path, name: &str) -> PathBuf {
    let dir = root.join(name);
    fs::create_dir_all(&dir).expect("Failed to create SAFE directory");
    dir
}

/// Create an MSG native file `root/name` starting with `header`.
pub fn write_seviri_product(root: &Path, name: &str, header: &[u8]) -> PathBuf {
    let path = root.join(name);
    let mut bytes = header.to_vec();
    // Binary records follow the ASCII header in real files.
    bytes.extend_from_slice(&[0u8, 1, 2, 0xff, 0xfe, 0x10, 0x00]);
    fs::write(&path, bytes).expect("Failed to write SEVIRI file");
    path
}

/// SEVIRI product with sensing times and sub-satellite longitude 0.
pub fn write_seviri(root: &Path) -> PathBuf {
    let header = fixtures::seviri_header(
        Some(times::SEVIRI_START),
        Some(times::SEVIRI_END),
        Some(0.0),
    );
    write_seviri_product(root, names::SEVIRI, &header)
}

/// Create an EPS native file `root/name` from an MPHR.
pub fn write_ascat_product(root: &Path, name: &str, mphr: &[u8]) -> PathBuf {
    let path = root.join(name);
    let mut bytes = mphr.to_vec();
    // Start of the next record (a GIADR), never part of the header.
    bytes.extend_from_slice(&[5u8, 1, 1, 0, 0, 0, 0, 40]);
    fs::write(&path, bytes).expect("Failed to write EPS file");
    path
}

/// ASCAT SOMO25 product with `rows` scan lines.
pub fn write_ascat(root: &Path, rows: usize) -> PathBuf {
    let mphr = fixtures::eps_mphr(
        "ASCA",
        Some(times::ASCAT_START),
        Some(times::ASCAT_END),
        Some(rows),
    );
    write_ascat_product(root, names::ASCAT, &mphr)
}

/// ASCAT product wrapped in a directory `root/wrapper`.
pub fn write_wrapped_ascat(root: &Path, wrapper: &str, rows: usize) -> PathBuf {
    let dir = root.join(wrapper);
    fs::create_dir_all(&dir).expect("Failed to create wrapper directory");
    write_ascat(&dir, rows);
    dir
}

/// Plain file that no family recognizes.
pub fn write_unrelated_file(root: &Path, name: &str) -> PathBuf {
    let path = root.join(name);
    fs::write(&path, b"not a product\n").expect("Failed to write file");
    path
}
