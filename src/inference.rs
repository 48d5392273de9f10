use image::imageops::FilterType;
use image::DynamicImage;
use ndarray::Array4;
use std::path::Path;
use tract_onnx::prelude::*;

/// Class labels in training order; the model's output width matches this table.
pub const CLASS_NAMES: [&str; 4] = [
    "Mild Dementia",
    "Moderate Dementia",
    "Non Demented",
    "Very mild Dementia",
];

/// Input resolution the model was exported with.
pub const IMAGE_SIZE: u32 = 128;

type OnnxModel = SimplePlan<TypedFact, Box<dyn TypedOp>, TypedModel>;

/// A loaded, optimized ONNX plan. Read-only after construction, so it can be
/// shared across worker threads without locking.
pub struct Classifier {
    model: OnnxModel,
}

impl Classifier {
    /// Loads the ONNX artifact and prepares an optimized runnable plan bound
    /// to CPU execution. Called once at startup; failure here is fatal.
    pub fn load(path: &Path) -> TractResult<Self> {
        let model = tract_onnx::onnx()
            .model_for_path(path)?
            .with_input_fact(
                0,
                InferenceFact::dt_shape(f32::datum_type(), tvec!(1, 3, 128, 128)),
            )?
            .into_optimized()?
            .into_runnable()?;
        Ok(Classifier { model })
    }

    /// Runs one forward pass (batch size 1) and returns the arg-max index
    /// over the output scores.
    pub fn predict(&self, img: &DynamicImage) -> TractResult<usize> {
        let input = preprocess(img);
        let size = IMAGE_SIZE as usize;
        let tensor =
            tract_ndarray::Array4::from_shape_vec((1, 3, size, size), input.into_raw_vec())?
                .into_tensor();

        let result = self.model.run(tvec!(tensor.into()))?;
        let scores: Vec<f32> = result[0].to_array_view::<f32>()?.iter().copied().collect();
        Ok(argmax(&scores))
    }
}

/// Mirrors the training transform: stretch to 128x128, scale pixels to
/// [0, 1], then normalize each channel with mean 0.5 and std 0.5. Must stay
/// identical to the transform used at training time.
pub fn preprocess(img: &DynamicImage) -> Array4<f32> {
    let size = IMAGE_SIZE as usize;
    let resized = img.resize_exact(IMAGE_SIZE, IMAGE_SIZE, FilterType::Triangle);
    let rgb = resized.to_rgb8();

    let mut tensor = Array4::zeros((1, 3, size, size));
    for (x, y, pixel) in rgb.enumerate_pixels() {
        for c in 0..3 {
            let value = (pixel[c] as f32 / 255.0 - 0.5) / 0.5;
            tensor[[0, c, y as usize, x as usize]] = value;
        }
    }
    tensor
}

/// Index of the largest score; ties go to the lower index.
pub fn argmax(scores: &[f32]) -> usize {
    let mut best = 0;
    for (i, &score) in scores.iter().enumerate().skip(1) {
        if score > scores[best] {
            best = i;
        }
    }
    best
}
