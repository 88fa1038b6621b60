//! Pattern matching with wildcards.
//!
//! A pattern is an ordinary expression that may contain wildcards. Each
//! wildcard binds to an arbitrary subexpression, and a wildcard that occurs
//! more than once must bind to equal subexpressions everywhere. Operands of
//! sums and products match in any order.

use crate::eval;
use crate::ex::Ex;
use crate::kind::TypeTag;

/// Wildcard bindings produced by a successful match.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Bindings {
    pairs: Vec<(Ex, Ex)>,
}

impl Bindings {
    /// Creates an empty binding set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The value bound to `wildcard`.
    #[must_use]
    pub fn get(&self, wildcard: &Ex) -> Option<&Ex> {
        self.pairs
            .iter()
            .find(|(w, _)| w.is_equal(wildcard))
            .map(|(_, v)| v)
    }

    /// Number of bound wildcards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Returns true if nothing is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Iterates over `(wildcard, value)` pairs in binding order.
    pub fn iter(&self) -> impl Iterator<Item = (&Ex, &Ex)> {
        self.pairs.iter().map(|(w, v)| (w, v))
    }

    /// The bindings as a list of equations `wildcard == value`.
    #[must_use]
    pub fn to_lst(&self) -> Ex {
        Ex::lst(
            self.pairs
                .iter()
                .map(|(w, v)| Ex::equation(w.clone(), v.clone())),
        )
    }

    pub(crate) fn insert(&mut self, wildcard: Ex, value: Ex) {
        self.pairs.push((wildcard, value));
    }

    pub(crate) fn truncate(&mut self, len: usize) {
        self.pairs.truncate(len);
    }

    pub(crate) fn wildcards(&self) -> Vec<Ex> {
        self.pairs.iter().map(|(w, _)| w.clone()).collect()
    }

    pub(crate) fn values(&self) -> Vec<Ex> {
        self.pairs.iter().map(|(_, v)| v.clone()).collect()
    }
}

fn is_wildcard(e: &Ex) -> bool {
    e.tag() == TypeTag::Wildcard
}

/// Returns true if `pattern` contains a wildcard anywhere.
pub(crate) fn has_wildcard(pattern: &Ex) -> bool {
    is_wildcard(pattern) || pattern.ops().iter().any(has_wildcard)
}

/// Matches `e` against `pattern`, extending `bindings`.
///
/// On failure `bindings` is restored to what it was on entry.
pub(crate) fn match_with(e: &Ex, pattern: &Ex, bindings: &mut Bindings) -> bool {
    let mark = bindings.len();
    if matches(e, pattern, bindings) {
        true
    } else {
        bindings.truncate(mark);
        false
    }
}

fn matches(e: &Ex, pattern: &Ex, bindings: &mut Bindings) -> bool {
    if is_wildcard(pattern) {
        if let Some(bound) = bindings.get(pattern) {
            return bound.is_equal(e);
        }
        bindings.insert(pattern.clone(), e.clone());
        return true;
    }
    if !has_wildcard(pattern) {
        return e.is_equal(pattern);
    }
    if !e.node().same_payload(pattern.node()) {
        return false;
    }
    match pattern.tag() {
        TypeTag::Add | TypeTag::Mul => match_commutative(e, pattern, bindings),
        _ => {
            if e.nops() != pattern.nops() {
                return false;
            }
            e.ops()
                .iter()
                .zip(pattern.ops())
                .all(|(op, p)| matches(op, p, bindings))
        }
    }
}

/// Operands of a sum or product in any order.
///
/// The first bare wildcard among the pattern's operands absorbs whatever the
/// other pattern operands leave over.
fn match_commutative(e: &Ex, pattern: &Ex, bindings: &mut Bindings) -> bool {
    let rest = pattern.ops().iter().position(is_wildcard);
    let fixed: Vec<&Ex> = pattern
        .ops()
        .iter()
        .enumerate()
        .filter(|(i, _)| Some(*i) != rest)
        .map(|(_, p)| p)
        .collect();
    let ops = e.ops();
    let fits = match rest {
        Some(_) => ops.len() >= fixed.len(),
        None => ops.len() == fixed.len(),
    };
    if !fits {
        return false;
    }
    let mut state = Assignment {
        ops,
        fixed: &fixed,
        rest: rest.map(|i| &pattern.ops()[i]),
        sum: pattern.tag() == TypeTag::Add,
        used: vec![false; ops.len()],
    };
    state.assign(0, bindings)
}

struct Assignment<'a> {
    ops: &'a [Ex],
    fixed: &'a [&'a Ex],
    rest: Option<&'a Ex>,
    sum: bool,
    used: Vec<bool>,
}

impl Assignment<'_> {
    fn assign(&mut self, i: usize, bindings: &mut Bindings) -> bool {
        if i == self.fixed.len() {
            return self.bind_rest(bindings);
        }
        for j in 0..self.ops.len() {
            if self.used[j] {
                continue;
            }
            let mark = bindings.len();
            if matches(&self.ops[j], self.fixed[i], bindings) {
                self.used[j] = true;
                if self.assign(i + 1, bindings) {
                    return true;
                }
                self.used[j] = false;
            }
            bindings.truncate(mark);
        }
        false
    }

    fn bind_rest(&self, bindings: &mut Bindings) -> bool {
        let Some(wildcard) = self.rest else {
            return true;
        };
        let leftover = self
            .ops
            .iter()
            .zip(&self.used)
            .filter(|(_, used)| !**used)
            .map(|(op, _)| op.clone());
        let value = if self.sum {
            eval::add(leftover)
        } else {
            match eval::mul(leftover) {
                Ok(v) => v,
                Err(_) => return false,
            }
        };
        matches(&value, wildcard, bindings)
    }
}

/// Returns true if `e` or any of its subexpressions matches `pattern`.
pub(crate) fn has(e: &Ex, pattern: &Ex) -> bool {
    let mut bindings = Bindings::new();
    if match_with(e, pattern, &mut bindings) {
        return true;
    }
    e.ops().iter().any(|op| has(op, pattern))
}

/// Every distinct subexpression matching `pattern`, sorted.
///
/// The search does not descend into a subexpression that matched.
pub(crate) fn find(e: &Ex, pattern: &Ex) -> Vec<Ex> {
    let mut found = Vec::new();
    collect(e, pattern, &mut found);
    found.sort_by(Ex::compare);
    found.dedup_by(|a, b| a.is_equal(b));
    found
}

fn collect(e: &Ex, pattern: &Ex, found: &mut Vec<Ex>) {
    let mut bindings = Bindings::new();
    if match_with(e, pattern, &mut bindings) {
        found.push(e.clone());
        return;
    }
    for op in e.ops() {
        collect(op, pattern, found);
    }
}
