//! Similarity scoring between generated results.

/// Returns a similarity score in `[0, 1]` between two results.
///
/// The score is the normalised character-level Levenshtein similarity:
/// symmetric, `1.0` for identical inputs (including two empty strings),
/// and decreasing as the texts share fewer characters in sequence.
#[must_use]
pub fn similarity(a: &str, b: &str) -> f64 {
    strsim::normalized_levenshtein(a, b)
}

/// Returns `true` when `latest` repeats `previous` above `threshold`.
#[must_use]
pub fn is_repetition(latest: &str, previous: &str, threshold: f64) -> bool {
    similarity(latest, previous) > threshold
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLES: &[&str] = &[
        "",
        "The door creaks open.",
        "The door is stuck.",
        "A dragon swoops down from the mountain and roars.",
        "Nothing happens.",
    ];

    #[test]
    fn test_similarity_is_reflexive() {
        for sample in SAMPLES {
            assert!((similarity(sample, sample) - 1.0).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn test_similarity_is_symmetric() {
        for a in SAMPLES {
            for b in SAMPLES {
                assert!((similarity(a, b) - similarity(b, a)).abs() < f64::EPSILON);
            }
        }
    }

    #[test]
    fn test_similarity_is_bounded() {
        for a in SAMPLES {
            for b in SAMPLES {
                let score = similarity(a, b);
                assert!((0.0..=1.0).contains(&score), "{a:?} vs {b:?} = {score}");
            }
        }
    }

    #[test]
    fn test_similarity_grows_with_shared_text() {
        let base = "The goblin snarls and raises its club.";
        let near = "The goblin snarls and raises its axe.";
        let far = "You find a quiet meadow full of flowers.";
        assert!(similarity(base, near) > similarity(base, far));
    }

    #[test]
    fn test_is_repetition_is_strict() {
        assert!(is_repetition("same", "same", 0.9));
        assert!(!is_repetition("same", "same", 1.0));
        assert!(!is_repetition("The door creaks open.", "The door is stuck.", 0.9));
    }
}
