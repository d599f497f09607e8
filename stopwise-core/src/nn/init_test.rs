#[cfg(test)]
mod tests {
    use crate::nn::activation::Activation;
    use crate::nn::init::{glorot_uniform, zero_bias};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_glorot_bounds() {
        let mut rng = StdRng::seed_from_u64(1234);
        let w = glorot_uniform(&mut rng, 30, 20, Activation::Tanh).unwrap();
        assert_eq!(w.shape(), [30, 20]);
        let bound = (6.0f32 / 50.0).sqrt();
        assert!(w.as_slice().iter().all(|&v| v >= -bound && v <= bound));
        // Not degenerate
        assert!(w.abs_sum() > 0.0);
    }

    #[test]
    fn test_glorot_sigmoid_is_scaled() {
        let mut a = StdRng::seed_from_u64(7);
        let mut b = StdRng::seed_from_u64(7);
        let tanh_w = glorot_uniform(&mut a, 4, 3, Activation::Tanh).unwrap();
        let sigm_w = glorot_uniform(&mut b, 4, 3, Activation::Sigmoid).unwrap();
        for (t, s) in tanh_w.as_slice().iter().zip(sigm_w.as_slice()) {
            assert!((s - 4.0 * t).abs() < 1e-6);
        }
    }

    #[test]
    fn test_glorot_is_deterministic_per_seed() {
        let w1 = glorot_uniform(&mut StdRng::seed_from_u64(42), 5, 5, Activation::Tanh).unwrap();
        let w2 = glorot_uniform(&mut StdRng::seed_from_u64(42), 5, 5, Activation::Tanh).unwrap();
        assert_eq!(w1, w2);
    }

    #[test]
    fn test_glorot_zero_fan() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(glorot_uniform(&mut rng, 0, 3, Activation::Tanh).is_err());
    }

    #[test]
    fn test_zero_bias() {
        let b = zero_bias(4);
        assert_eq!(b.shape(), [1, 4]);
        assert!(b.as_slice().iter().all(|&x| x == 0.0));
    }
}
