use bson::Bson;

/// Field name under which the derived rating is exposed.
pub const AVERAGE_RATING_FIELD: &str = "averageRating";

/// Path of the numeric scores the rating averages.
pub const GRADE_SCORE_PATH: &str = "grades.score";

/// Arithmetic mean of `scores`, or `0.0` when there are none.
///
/// This is the only place the rating is computed: the aggregation stage that
/// sorts listings and the per-document serializer both call it.
#[must_use]
pub fn average_rating<I>(scores: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    let (sum, n) = scores.into_iter().fold((0.0f64, 0usize), |(s, n), x| (s + x, n + 1));
    if n == 0 {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let n = n as f64;
    sum / n
}

/// Numeric view of a BSON value; non-numbers yield `None`.
#[must_use]
pub fn bson_number(v: &Bson) -> Option<f64> {
    match v {
        Bson::Int32(i) => Some(f64::from(*i)),
        #[allow(clippy::cast_precision_loss)]
        Bson::Int64(i) => Some(*i as f64),
        Bson::Double(f) => Some(*f),
        _ => None,
    }
}
