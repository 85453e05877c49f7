use bson::{Bson, Document as BsonDocument};
use std::cmp::Ordering;

use super::types::{Filter, MAX_PATH_DEPTH, MAX_SORT_FIELDS, Order, SortSpec};

pub fn eval_filter(doc: &BsonDocument, filter: &Filter) -> bool {
    match filter {
        Filter::True => true,
        Filter::And(fs) => fs.iter().all(|f| eval_filter(doc, f)),
        Filter::Eq { path, value } => {
            resolve_path(doc, path).into_iter().any(|v| v == value || array_contains(v, value))
        }
        Filter::In { path, values } => {
            resolve_path(doc, path).into_iter().any(|v| is_in_set(v, values))
        }
        Filter::Regex { path, regex } => resolve_path(doc, path).into_iter().any(|v| match v {
            Bson::String(s) => regex.is_match(s),
            Bson::Array(items) => {
                items.iter().any(|i| matches!(i, Bson::String(s) if regex.is_match(s)))
            }
            _ => false,
        }),
    }
}

pub fn compare_docs(a: &BsonDocument, b: &BsonDocument, sort: &[SortSpec]) -> Ordering {
    for s in sort.iter().take(MAX_SORT_FIELDS) {
        let va = resolve_path(a, &s.field).into_iter().next();
        let vb = resolve_path(b, &s.field).into_iter().next();
        let ord = match (va, vb) {
            (Some(x), Some(y)) => compare_bson(x, y),
            (Some(_), None) => Ordering::Greater,
            (None, Some(_)) => Ordering::Less,
            (None, None) => Ordering::Equal,
        };
        if ord != Ordering::Equal {
            return if s.order == Order::Asc { ord } else { ord.reverse() };
        }
    }
    Ordering::Equal
}

fn is_in_set(v: &Bson, set: &[Bson]) -> bool {
    set.contains(v) || set.iter().any(|x| array_contains(v, x))
}

fn array_contains(v: &Bson, x: &Bson) -> bool {
    matches!(v, Bson::Array(items) if items.contains(x))
}

/// All values reachable through a dotted `path`. Intermediate arrays of
/// sub-documents are walked element by element.
pub fn resolve_path<'a>(doc: &'a BsonDocument, path: &str) -> Vec<&'a Bson> {
    let mut out = Vec::new();
    if path.is_empty() || path.len() > 1024 {
        return out;
    }
    let parts: Vec<&str> = path.split('.').collect();
    if parts.len() > MAX_PATH_DEPTH {
        return out;
    }
    collect_path(doc, &parts, &mut out);
    out
}

fn collect_path<'a>(doc: &'a BsonDocument, parts: &[&str], out: &mut Vec<&'a Bson>) {
    let Some((head, rest)) = parts.split_first() else {
        return;
    };
    let Some(v) = doc.get(*head) else {
        return;
    };
    if rest.is_empty() {
        out.push(v);
        return;
    }
    match v {
        Bson::Document(d) => collect_path(d, rest, out),
        Bson::Array(items) => {
            for item in items {
                if let Bson::Document(d) = item {
                    collect_path(d, rest, out);
                }
            }
        }
        _ => {}
    }
}

pub fn compare_bson(a: &Bson, b: &Bson) -> Ordering {
    use bson::Bson as T;
    fn as_f64_num(x: &T) -> Option<f64> {
        match x {
            T::Int32(i) => Some(f64::from(*i)),
            #[allow(clippy::cast_precision_loss)]
            T::Int64(i) => Some(*i as f64),
            T::Double(f) => Some(*f),
            _ => None,
        }
    }
    if let (Some(x), Some(y)) = (as_f64_num(a), as_f64_num(b)) {
        return x.total_cmp(&y);
    }
    match (a, b) {
        (T::String(x), T::String(y)) => x.cmp(y),
        (T::Boolean(x), T::Boolean(y)) => x.cmp(y),
        (T::DateTime(x), T::DateTime(y)) => x.cmp(y),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

fn type_rank(v: &Bson) -> u8 {
    use bson::Bson as T;
    match v {
        T::MinKey => 0,
        T::Null | T::Undefined => 1,
        T::Int32(_) | T::Int64(_) | T::Double(_) | T::Decimal128(_) => 2,
        T::String(_) | T::Symbol(_) => 3,
        T::Document(_) => 4,
        T::Array(_) => 5,
        T::Binary(_) => 6,
        T::ObjectId(_) => 7,
        T::Boolean(_) => 8,
        T::DateTime(_) => 9,
        T::Timestamp(_) => 10,
        T::RegularExpression(_) => 11,
        T::MaxKey => 255,
        _ => 12,
    }
}
