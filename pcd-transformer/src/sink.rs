use pcd_core::pointcloud::{
    point::Coord,
    result::{BatchImport, ReprojectionResult},
};

/// Host side of an import: places the anchor, then each file under it.
pub trait SceneSink {
    type Error;

    fn place_anchor(&mut self, anchor: Coord) -> Result<(), Self::Error>;

    /// `offset` is the file's midpoint relative to the anchor.
    fn place_file(&mut self, file: &ReprojectionResult, offset: Coord) -> Result<(), Self::Error>;
}

/// Hands a finished batch to `sink`, anchor first, files in input order.
pub fn commit<S: SceneSink>(batch: &BatchImport, sink: &mut S) -> Result<(), S::Error> {
    sink.place_anchor(batch.anchor)?;
    for (file, offset) in batch.files.iter().zip(batch.offsets()) {
        sink.place_file(file, offset)?;
    }
    Ok(())
}
