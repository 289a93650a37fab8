//! Deterministic mapping from variable name to gradient slot.

use super::ledger::Inputs;

/// The Variable Ordering Resolver.
///
/// Assigns every input name its rank in ascending lexicographic order, so the
/// gradient vector of an `eval_grad` call is laid out as `[d/d(name_0), ...]`
/// with `name_0 < name_1 < ...`. Built once per top-level evaluation and
/// threaded through the recursive descent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableOrder {
    // Sorted, unique (keys of a map are unique).
    names: Vec<String>,
}

impl VariableOrder {
    pub fn from_inputs(inputs: &Inputs) -> Self {
        let mut names: Vec<String> = inputs.keys().cloned().collect();
        names.sort_unstable();
        Self { names }
    }

    /// Builds an order from an arbitrary name list, dropping duplicates.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut names: Vec<String> = names.into_iter().map(Into::into).collect();
        names.sort_unstable();
        names.dedup();
        Self { names }
    }

    /// Gradient slot of `name`, or `None` if it is not part of this order.
    #[inline]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.binary_search_by(|known| known.as_str().cmp(name)).ok()
    }

    pub fn len(&self) -> usize { self.names.len() }
    pub fn is_empty(&self) -> bool { self.names.is_empty() }
    pub fn names(&self) -> &[String] { &self.names }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(pairs: &[(&str, f64)]) -> Inputs {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_ranks_follow_lexicographic_order() {
        let order = VariableOrder::from_inputs(&inputs(&[("z", 4.0), ("x", 2.0), ("y", 3.0)]));
        assert_eq!(order.names(), ["x", "y", "z"]);
        assert_eq!(order.index_of("x"), Some(0));
        assert_eq!(order.index_of("y"), Some(1));
        assert_eq!(order.index_of("z"), Some(2));
        assert_eq!(order.index_of("w"), None);
    }

    #[test]
    fn test_ordering_is_bytewise_not_case_folded() {
        let order = VariableOrder::from_inputs(&inputs(&[("b", 0.0), ("B", 0.0), ("a", 0.0), ("a1", 0.0)]));
        assert_eq!(order.names(), ["B", "a", "a1", "b"]);
    }

    #[test]
    fn test_empty_inputs_give_empty_order() {
        let order = VariableOrder::from_inputs(&Inputs::new());
        assert!(order.is_empty());
        assert_eq!(order.index_of("x"), None);
    }

    #[test]
    fn test_from_names_dedups() {
        let order = VariableOrder::from_names(["y", "x", "y"]);
        assert_eq!(order.len(), 2);
        assert_eq!(order.index_of("y"), Some(1));
    }
}
