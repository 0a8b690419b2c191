// Utility functions shared by the scoring pools

/// Per-day exponential decay: `factor` applied once per elapsed day.
/// Future timestamps clamp to zero elapsed days.
pub fn daily_decay(age_days: i64, factor: f64) -> f64 {
    factor.powi(age_days.max(0) as i32)
}

/// Banded author-standing multiplier. High-reputation authors get a slight
/// boost, low bands a discount, mid stays neutral.
pub fn reputation_multiplier(current: f64) -> f64 {
    if current >= 90.0 {
        1.1
    } else if current >= 50.0 {
        1.0
    } else if current >= 25.0 {
        0.9
    } else {
        0.8
    }
}

/// Cosine similarity between two embedding vectors.
///
/// Formula: cos(a, b) = Σ(a[i] × b[i]) / (||a|| × ||b||)
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        f64::from(dot_product / (norm_a * norm_b))
    }
}
