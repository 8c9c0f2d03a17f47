use rand::Rng;

use crate::models::HEATMAP_CELLS;

/// Full width of the per-cell noise: each cell moves by up to ±0.75.
const NOISE_SPAN: f64 = 1.5;

/// 28 cells of bullish (+) / bearish (-) intensity in [-1, 1], scattered around
/// the bias implied by the bullish probability. Not derived from the image.
pub fn synthesize_heatmap(bullish_probability: i32) -> Vec<f64> {
    synthesize_heatmap_with(&mut rand::thread_rng(), bullish_probability)
}

pub fn synthesize_heatmap_with<R: Rng + ?Sized>(rng: &mut R, bullish_probability: i32) -> Vec<f64> {
    let bias = (bullish_probability as f64 - 50.0) / 50.0;

    (0..HEATMAP_CELLS)
        .map(|_| {
            let noise = (rng.gen::<f64>() - 0.5) * NOISE_SPAN;
            (bias + noise).clamp(-1.0, 1.0)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_length_and_range_for_all_probabilities() {
        let mut rng = StdRng::seed_from_u64(42);
        for p in 0..=100 {
            let cells = synthesize_heatmap_with(&mut rng, p);
            assert_eq!(cells.len(), HEATMAP_CELLS);
            assert!(cells.iter().all(|v| (-1.0..=1.0).contains(v)), "out of range for {}", p);
        }
    }

    #[test]
    fn test_out_of_range_probability_is_clamped() {
        let cells = synthesize_heatmap(250);
        assert!(cells.iter().all(|v| *v == 1.0));

        let cells = synthesize_heatmap(-100);
        assert!(cells.iter().all(|v| *v == -1.0));
    }

    #[test]
    fn test_bias_shifts_cells() {
        let mut rng = StdRng::seed_from_u64(1);
        let bullish = synthesize_heatmap_with(&mut rng, 90);
        // bias 0.8, so no cell can fall below 0.05
        assert!(bullish.iter().all(|v| *v >= 0.05));

        let bearish = synthesize_heatmap_with(&mut rng, 10);
        assert!(bearish.iter().all(|v| *v <= -0.05));
    }

    #[test]
    fn test_not_constant() {
        let cells = synthesize_heatmap(50);
        let first = cells[0];
        assert!(cells.iter().any(|v| *v != first));
    }
}
