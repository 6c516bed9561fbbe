use coordinate_transformer::{Crs, CrsBackend};

use crate::transform::{
    center::CenterTransform, projection::ReprojectTransform, scale::ScaleTransform,
    CompositeTransform, Transform,
};

pub trait TransformBuilder {
    fn build(&self) -> Box<dyn Transform + '_>;
}

/// Reprojection followed by the optional scale and centering stages.
pub struct PipelineBuilder<'a> {
    backend: &'a dyn CrsBackend,
    target: Crs,
    scale: f64,
    centering: bool,
}

impl<'a> PipelineBuilder<'a> {
    pub fn new(backend: &'a dyn CrsBackend, target: Crs) -> Self {
        Self {
            backend,
            target,
            scale: 1.0,
            centering: true,
        }
    }

    pub fn scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    pub fn centering(mut self, centering: bool) -> Self {
        self.centering = centering;
        self
    }
}

impl TransformBuilder for PipelineBuilder<'_> {
    fn build(&self) -> Box<dyn Transform + '_> {
        let mut transforms: Vec<Box<dyn Transform + '_>> = vec![
            Box::new(ReprojectTransform::new(self.backend, self.target.clone())),
            Box::new(ScaleTransform::new(self.scale)),
        ];
        if self.centering {
            transforms.push(Box::new(CenterTransform::new()));
        }

        Box::new(CompositeTransform::new(transforms))
    }
}
