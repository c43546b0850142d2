// ============================================================
// Layer 5 - Host Data <-> Tensors
// ============================================================
// The only place where plain Vec<f32> data crosses into or out
// of burn tensors for the use cases.

use burn::prelude::*;

/// Builds a `[batch, channels, height, width]` tensor from
/// row-major pixels. `pixels.len()` must equal the product of `dims`.
pub fn images_from_pixels<B: Backend>(
    pixels: Vec<f32>,
    dims:   [usize; 4],
    device: &B::Device,
) -> Tensor<B, 4> {
    Tensor::from_data(TensorData::new(pixels, dims), device)
}

/// Reads a `[rows, cols]` tensor back as one `Vec` per row.
pub fn rows<B: Backend>(x: Tensor<B, 2>) -> Vec<Vec<f32>> {
    let [_, cols] = x.dims();
    let flat: Vec<f32> = x.into_data().iter::<f32>().collect();
    flat.chunks(cols.max(1)).map(|row| row.to_vec()).collect()
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type TestBackend = NdArray;

    #[test]
    fn test_images_keep_row_major_order() {
        let pixels: Vec<f32> = (0..2 * 3 * 4).map(|v| v as f32).collect();
        let x = images_from_pixels::<TestBackend>(pixels, [2, 1, 3, 4], &Default::default());

        assert_eq!(x.dims(), [2, 1, 3, 4]);
        // Second sample, row 1, column 2
        let v: Vec<f32> = x.slice([1..2, 0..1, 1..2, 2..3]).into_data().iter::<f32>().collect();
        assert_eq!(v, vec![12.0 + 4.0 + 2.0]);
    }

    #[test]
    fn test_rows_split_by_column_count() {
        let x = Tensor::<TestBackend, 2>::from_floats([[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]], &Default::default());
        assert_eq!(rows(x), vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]);
    }
}
