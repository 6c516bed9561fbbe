//! CRS information stored in LAS/LAZ variable length records.

use las::{Header, Vlr};

pub const PROJECTION_USER_ID: &str = "LASF_Projection";
/// OGC coordinate system WKT
pub const WKT_RECORD_ID: u16 = 2112;
/// GeoTIFF GeoKeyDirectoryTag
pub const GEO_KEY_DIRECTORY_RECORD_ID: u16 = 34735;

const PROJECTED_CS_TYPE_GEO_KEY: u16 = 3072;
const GEOGRAPHIC_TYPE_GEO_KEY: u16 = 2048;
const USER_DEFINED: u16 = 32767;

/// The CRS definition carried by the file, if any.
///
/// A WKT record wins over GeoTIFF keys. Malformed records are ignored.
pub fn embedded_crs(header: &Header) -> Option<String> {
    let records: Vec<&Vlr> = header
        .vlrs()
        .iter()
        .chain(header.evlrs().iter())
        .filter(|vlr| vlr.user_id.trim_end_matches('\0') == PROJECTION_USER_ID)
        .collect();

    let wkt = records
        .iter()
        .filter(|vlr| vlr.record_id == WKT_RECORD_ID)
        .find_map(|vlr| wkt_from_bytes(&vlr.data));
    if wkt.is_some() {
        return wkt;
    }

    records
        .iter()
        .filter(|vlr| vlr.record_id == GEO_KEY_DIRECTORY_RECORD_ID)
        .find_map(|vlr| epsg_from_geo_keys(&vlr.data))
        .map(|code| format!("EPSG:{code}"))
}

pub fn wkt_from_bytes(data: &[u8]) -> Option<String> {
    let text = std::str::from_utf8(data).ok()?;
    let text = text.trim_end_matches('\0').trim();
    (!text.is_empty()).then(|| text.to_string())
}

/// Reads the EPSG code from a GeoKeyDirectory.
///
/// Layout is u16 little endian: a 4 word header whose last word is the key
/// count, then 4 words per key (id, location, count, value). Only keys stored
/// inline (location 0) are considered.
pub fn epsg_from_geo_keys(data: &[u8]) -> Option<u16> {
    let words: Vec<u16> = data
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect();
    let key_count = *words.get(3)? as usize;
    let keys = words.get(4..4 + key_count * 4)?;

    let lookup = |id: u16| {
        keys.chunks_exact(4)
            .find(|key| key[0] == id && key[1] == 0)
            .map(|key| key[3])
    };

    // A projected key decides on its own: the geographic key of a projected
    // CRS is only its base datum, not the CRS of the coordinates.
    let code = lookup(PROJECTED_CS_TYPE_GEO_KEY).or_else(|| lookup(GEOGRAPHIC_TYPE_GEO_KEY))?;
    (code != 0 && code != USER_DEFINED).then_some(code)
}
