use crate::core::types::{ExtendedAlignment, RangeError, SeedMatch};

/// Extend a seed without gaps to the edge of the shorter side on the left and on the right.
///
/// The left extension is bounded by whichever of the query or reference start is
/// closer to 0. On the right, `min(query_length - query_end, reference_length - ref_end)`
/// counts one past the last index, so the extended ends are inclusive and land exactly
/// on the last position of the limiting sequence.
///
/// # Errors
///
/// Returns `RangeError::InvertedSeed` when a seed start lies after its end,
/// `RangeError::GappedSeed` when the seed spans differ in length, and
/// `RangeError::Seed` when the seed is not inside both sequences.
pub fn extend(
    seed: &SeedMatch,
    query_length: usize,
    reference_length: usize,
) -> Result<ExtendedAlignment, RangeError> {
    if seed.query_start > seed.query_end || seed.ref_start > seed.ref_end {
        return Err(RangeError::InvertedSeed(*seed));
    }

    if seed.query_end >= query_length || seed.ref_end >= reference_length {
        return Err(RangeError::Seed {
            seed: *seed,
            query_length,
            reference_length,
        });
    }

    // Both windows are indexed with the same offsets during scoring
    if seed.query_end - seed.query_start != seed.ref_end - seed.ref_start {
        return Err(RangeError::GappedSeed(*seed));
    }

    let left = seed.query_start.min(seed.ref_start);
    let right = (query_length - seed.query_end).min(reference_length - seed.ref_end);

    let alignment = ExtendedAlignment {
        query_start: seed.query_start - left,
        query_end: seed.query_end + right - 1,
        ref_start: seed.ref_start - left,
        ref_end: seed.ref_end + right - 1,
    };

    debug_assert_eq!(
        alignment.query_end - alignment.query_start,
        alignment.ref_end - alignment.ref_start
    );

    Ok(alignment)
}
