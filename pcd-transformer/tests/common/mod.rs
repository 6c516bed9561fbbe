use std::path::{Path, PathBuf};

use las::{point::Classification, Builder, Vlr, Writer};

/// GeoKeyDirectory VLR declaring `ProjectedCSTypeGeoKey = code`.
pub fn projected_geo_keys(code: u16) -> Vlr {
    let words: [u16; 8] = [1, 1, 0, 1, 3072, 0, 1, code];
    Vlr {
        user_id: "LASF_Projection".to_string(),
        record_id: 34735,
        description: String::new(),
        data: words.iter().flat_map(|w| w.to_le_bytes()).collect(),
    }
}

pub fn write_las(dir: &Path, name: &str, points: &[[f64; 3]], vlrs: Vec<Vlr>) -> PathBuf {
    let path = dir.join(name);
    let mut builder = Builder::from((1, 2));
    builder.vlrs = vlrs;
    let header = builder.into_header().unwrap();
    let mut writer = Writer::from_path(&path, header).unwrap();
    for &[x, y, z] in points {
        writer
            .write_point(las::Point {
                x,
                y,
                z,
                classification: Classification::Ground,
                ..Default::default()
            })
            .unwrap();
    }
    writer.close().unwrap();
    path
}

pub fn assert_close(actual: [f64; 3], expected: [f64; 3], tolerance: f64) {
    for axis in 0..3 {
        assert!(
            (actual[axis] - expected[axis]).abs() < tolerance,
            "axis {axis}: {actual:?} != {expected:?}"
        );
    }
}
