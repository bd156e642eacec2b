use crate::models::CanonicalFixture;
use std::collections::HashMap;

/// Flags every fixture whose natural key occurs more than once in the batch.
/// Order and length are untouched; flags are recomputed from scratch, so
/// running it again gives the same result.
pub fn flag_duplicates(fixtures: &mut [CanonicalFixture]) -> usize {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for fixture in fixtures.iter() {
        *counts.entry(fixture.natural_key.as_str()).or_insert(0) += 1;
    }

    let repeated: Vec<bool> = fixtures
        .iter()
        .map(|f| counts.get(f.natural_key.as_str()).copied().unwrap_or(0) > 1)
        .collect();

    for (fixture, is_duplicate) in fixtures.iter_mut().zip(repeated) {
        fixture.is_duplicate = is_duplicate;
    }

    fixtures.iter().filter(|f| f.is_duplicate).count()
}

/// The flagged subsequence, in batch order
pub fn duplicates(fixtures: &[CanonicalFixture]) -> Vec<&CanonicalFixture> {
    fixtures.iter().filter(|f| f.is_duplicate).collect()
}
