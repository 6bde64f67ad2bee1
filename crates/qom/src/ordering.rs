//! Sorting evaluated node-tuples by the orderings of a query.

use crate::ast::{Order, Ordering};
use crate::engine::{Evaluator, NodeTuple};
use crate::error::EvalError;
use crate::operators::natural_order;
use itertools::Itertools;
use std::cmp;
use sylvan_traits::TreeNavigator;
use sylvan_types::Value;

type SortKey = Vec<Option<Value>>;

fn sort_key<T: TreeNavigator + ?Sized>(
    evaluator: &Evaluator<'_, T>,
    orderings: &[Ordering],
    tuple: &NodeTuple<T::Node>,
) -> Result<SortKey, EvalError> {
    orderings
        .iter()
        .map(|ordering| match evaluator.operand_values(ordering.operand(), tuple) {
            Ok(values) => Ok(values.into_iter().next()),
            Err(EvalError::SelectorNotBound(_)) => Ok(None),
            Err(e) => Err(e),
        })
        .collect()
}

fn compare_keys(a: &SortKey, b: &SortKey, orderings: &[Ordering]) -> cmp::Ordering {
    for ((x, y), ordering) in a.iter().zip(b).zip(orderings) {
        // Missing values sort lowest.
        let natural = match (x, y) {
            (None, None) => cmp::Ordering::Equal,
            (None, Some(_)) => cmp::Ordering::Less,
            (Some(_), None) => cmp::Ordering::Greater,
            (Some(x), Some(y)) => natural_order(x, y),
        };
        let directed = match ordering.order() {
            Order::Ascending => natural,
            Order::Descending => natural.reverse(),
        };
        if directed != cmp::Ordering::Equal {
            return directed;
        }
    }
    cmp::Ordering::Equal
}

/// Sorts tuples by the first value of each ordering operand.
///
/// The sort is stable. A tuple whose ordering operand has no value (or reads
/// an unbound selector) sorts before all others in ascending order.
pub fn sort_tuples<T: TreeNavigator + ?Sized>(
    evaluator: &Evaluator<'_, T>,
    orderings: &[Ordering],
    tuples: Vec<NodeTuple<T::Node>>,
) -> Result<Vec<NodeTuple<T::Node>>, EvalError> {
    if orderings.is_empty() {
        return Ok(tuples);
    }
    let keyed: Vec<(SortKey, NodeTuple<T::Node>)> = tuples
        .into_iter()
        .map(|tuple| Ok((sort_key(evaluator, orderings, &tuple)?, tuple)))
        .collect::<Result<_, EvalError>>()?;
    Ok(keyed
        .into_iter()
        .sorted_by(|(a, _), (b, _)| compare_keys(a, b, orderings))
        .map(|(_, tuple)| tuple)
        .collect())
}
