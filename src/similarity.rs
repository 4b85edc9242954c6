// ===== demofit/src/similarity.rs =====
use strum_macros::{Display, EnumString};
use tracing::warn;

/// Similarity metric used to compare a county's target demographics against
/// its descriptor-derived reconstruction. Parsed from the CLI via strum, so
/// an unknown method name fails at argument parsing with no fallback.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Method {
    L1,
    L2,
    Cosine,
    #[default]
    Js,
}

/// Divide each element by the p-norm of the vector. No-op if the norm is zero.
pub fn normalize(vec: &mut [f64], p: f64) {
    let norm = if p == 1.0 {
        vec.iter().map(|v| v.abs()).sum::<f64>()
    } else if p == 2.0 {
        vec.iter().map(|v| v * v).sum::<f64>().sqrt()
    } else {
        vec.iter()
            .map(|v| v.abs().powf(p))
            .sum::<f64>()
            .powf(1.0 / p)
    };

    if norm == 0.0 {
        return;
    }
    for v in vec.iter_mut() {
        *v /= norm;
    }
}

// Kullback-Leibler divergence in bits. Asymmetric: KL(P,Q) != KL(Q,P).
// Terms where either side is zero contribute 0, not NaN.
fn kl(p: &[f64], q: &[f64]) -> f64 {
    p.iter()
        .zip(q.iter())
        .filter(|(&pi, &qi)| pi > 0.0 && qi > 0.0)
        .map(|(&pi, &qi)| pi * (pi / qi).log2())
        .sum()
}

/// Compare an expected and actual demographic vector, returning a similarity
/// in [0, 1].
///
/// A length mismatch is reported and scores 0 rather than aborting the run.
/// An all-zero actual vector against a nonzero expected vector is a total
/// miss and scores 0 regardless of method.
pub fn compare_demographics(expected: &[f64], actual: &[f64], method: Method) -> f64 {
    if expected.len() != actual.len() {
        warn!(
            "compared vectors have different lengths: {} != {}",
            expected.len(),
            actual.len()
        );
        return 0.0;
    }

    if actual.iter().sum::<f64>() == 0.0 && expected.iter().sum::<f64>() != 0.0 {
        return 0.0;
    }

    let mut e = expected.to_vec();
    let mut a = actual.to_vec();

    match method {
        Method::L1 => {
            // Manhattan distance over L1-normalized vectors; max distance is 2
            normalize(&mut e, 1.0);
            normalize(&mut a, 1.0);
            let dist: f64 = e.iter().zip(a.iter()).map(|(x, y)| (x - y).abs()).sum();
            (1.0 - dist / 2.0).clamp(0.0, 1.0)
        }
        Method::L2 => {
            // Euclidean distance over L2-normalized vectors; max distance is √2
            normalize(&mut e, 2.0);
            normalize(&mut a, 2.0);
            let dist: f64 = e
                .iter()
                .zip(a.iter())
                .map(|(x, y)| (x - y) * (x - y))
                .sum::<f64>()
                .sqrt();
            (1.0 - dist / std::f64::consts::SQRT_2).clamp(0.0, 1.0)
        }
        Method::Cosine => {
            // Both vectors normalized, so cosine similarity is just the dot
            // product. Vectors are non-negative, so the clamp only absorbs
            // floating-point overshoot.
            normalize(&mut e, 2.0);
            normalize(&mut a, 2.0);
            e.iter()
                .zip(a.iter())
                .map(|(x, y)| x * y)
                .sum::<f64>()
                .clamp(0.0, 1.0)
        }
        Method::Js => {
            normalize(&mut e, 1.0);
            normalize(&mut a, 1.0);
            let m: Vec<f64> = e
                .iter()
                .zip(a.iter())
                .map(|(x, y)| (x + y) / 2.0)
                .collect();
            let js = (kl(&e, &m) + kl(&a, &m)) / 2.0;
            (1.0 - js).clamp(0.0, 1.0)
        }
    }
}
