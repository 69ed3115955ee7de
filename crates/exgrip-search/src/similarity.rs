//! Vector similarity helpers.

/// Multiplier applied to cosine similarity, matching CLIP's logit scale.
pub const LOGIT_SCALE: f32 = 100.0;

#[must_use]
pub fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Euclidean length of a vector.
#[must_use]
pub fn norm(v: &[f32]) -> f32 {
    dot(v, v).sqrt()
}

/// Cosine similarity in `[-1, 1]`. Zero vectors score 0.
#[must_use]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let denominator = norm(a) * norm(b);
    if denominator == 0.0 {
        0.0
    } else {
        dot(a, b) / denominator
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_cosine_similarity() {
        assert!(close(cosine_similarity(&[1.0, 0.0], &[3.0, 0.0]), 1.0));
        assert!(close(cosine_similarity(&[1.0, 0.0], &[0.0, 2.0]), 0.0));
        assert!(close(cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]), -1.0));
        assert!(close(
            cosine_similarity(&[1.0, 0.0], &[1.0, 1.0]),
            std::f32::consts::FRAC_1_SQRT_2
        ));
    }

    #[test]
    fn test_zero_vector_scores_zero() {
        assert!(close(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0));
    }

    #[test]
    fn test_norm_and_dot() {
        assert!(close(norm(&[3.0, 4.0]), 5.0));
        assert!(close(dot(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]), 32.0));
    }
}
