use bson::{Bson, Document as BsonDocument};

use super::eval::{compare_docs, eval_filter, resolve_path};
use super::types::{Filter, Pipeline, Stage};
use crate::restaurant::rating::{average_rating, bson_number};

/// Runs `pipeline` over `docs` and returns the resulting documents.
///
/// Leading `Match` stages are evaluated against the borrowed collection so
/// non-matching documents are never cloned. Sorting is stable: documents that
/// compare equal keep their collection order.
pub fn run_pipeline(docs: &[BsonDocument], pipeline: &Pipeline) -> Vec<BsonDocument> {
    let lead = pipeline.stages.iter().take_while(|s| matches!(s, Stage::Match(_))).count();
    let (leading, rest) = pipeline.stages.split_at(lead);
    let mut out: Vec<BsonDocument> = docs
        .iter()
        .filter(|d| {
            leading.iter().all(|s| match s {
                Stage::Match(f) => eval_filter(d, f),
                _ => true,
            })
        })
        .cloned()
        .collect();

    for stage in rest {
        match stage {
            Stage::Match(f) => out.retain(|d| eval_filter(d, f)),
            Stage::AddAverage { field, source } => {
                for d in &mut out {
                    let avg =
                        average_rating(resolve_path(d, source).into_iter().filter_map(bson_number));
                    d.insert(field.clone(), Bson::Double(avg));
                }
            }
            Stage::Sort(spec) => out.sort_by(|a, b| compare_docs(a, b, spec)),
            Stage::Skip(n) => {
                if *n >= out.len() {
                    out.clear();
                } else {
                    out.drain(..*n);
                }
            }
            Stage::Limit(n) => out.truncate(*n),
        }
    }
    log::trace!(
        "pipeline stages={} input={} output={}",
        pipeline.stages.len(),
        docs.len(),
        out.len()
    );
    out
}

#[must_use]
pub fn count_docs(docs: &[BsonDocument], filter: &Filter) -> usize {
    docs.iter().filter(|d| eval_filter(d, filter)).count()
}

#[must_use]
pub fn find_one(docs: &[BsonDocument], filter: &Filter) -> Option<BsonDocument> {
    docs.iter().find(|d| eval_filter(d, filter)).cloned()
}
