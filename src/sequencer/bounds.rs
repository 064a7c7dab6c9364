use super::SequenceError;

/// Floor midpoint strictly between `lower` and `upper`.
pub(super) fn between(lower: i64, upper: i64) -> Result<i64, SequenceError> {
    let sum = i128::from(lower).saturating_add(i128::from(upper));
    let exhausted = SequenceError::GapExhausted { lower, upper };
    let mid = i64::try_from(sum.div_euclid(2)).map_err(|_| exhausted.clone())?;
    if lower < mid && mid < upper {
        Ok(mid)
    } else {
        Err(exhausted)
    }
}

/// `ordinal - gap`, unless that would not sort strictly before `ordinal`.
pub(super) fn below(ordinal: i64, gap: i64) -> Result<i64, SequenceError> {
    ordinal
        .checked_sub(gap)
        .ok_or(SequenceError::GapExhausted {
            lower: i64::MIN,
            upper: ordinal,
        })
}

/// `ordinal + gap`, unless that would overflow.
pub(super) fn above(ordinal: i64, gap: i64) -> Result<i64, SequenceError> {
    ordinal
        .checked_add(gap)
        .ok_or(SequenceError::GapExhausted {
            lower: ordinal,
            upper: i64::MAX,
        })
}
