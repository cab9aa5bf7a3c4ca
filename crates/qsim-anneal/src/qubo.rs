//! QUBO problem representation.
//!
//! A problem is a map from keys to weights. A key naming one variable
//! (`"x0"`) is a linear term; a key naming two comma-separated variables
//! (`"x0,x1"`) is a quadratic term. The energy of an assignment is
//!
//! ```text
//! E(x) = Σ linear_i · x_i + Σ quadratic_ij · x_i · x_j
//! ```

use std::collections::{BTreeMap, BTreeSet};

use crate::error::{AnnealError, AnnealResult};

/// A parsed QUBO problem with variables indexed in sorted-name order.
#[derive(Debug, Clone, PartialEq)]
pub struct QuboProblem {
    variables: Vec<String>,
    linear: Vec<f64>,
    /// Merged `(i, j, weight)` terms with `i < j`.
    quadratic: Vec<(usize, usize, f64)>,
    /// Per variable: every `(other, weight)` it is coupled to.
    neighbors: Vec<Vec<(usize, f64)>>,
}

enum Term<'a> {
    Linear(&'a str),
    Quadratic(&'a str, &'a str),
}

fn parse_key(key: &str) -> AnnealResult<Term<'_>> {
    let parse_err = |reason: &str| AnnealError::Parse {
        key: key.to_string(),
        reason: reason.to_string(),
    };
    let names: Vec<&str> = key.split(',').map(str::trim).collect();
    if names.iter().any(|n| n.is_empty()) {
        return Err(parse_err("empty variable name"));
    }
    match names.as_slice() {
        [a] => Ok(Term::Linear(*a)),
        [a, b] if a == b => Ok(Term::Linear(*a)),
        [a, b] => Ok(Term::Quadratic(*a, *b)),
        _ => Err(parse_err("a term names one or two variables")),
    }
}

impl QuboProblem {
    /// Parse `(key, weight)` pairs.
    ///
    /// Duplicate terms are summed. `"a,a"` is folded into the linear term of
    /// `a`, since `a² = a` for binary variables.
    pub fn from_coefficients<'a, I>(coefficients: I) -> AnnealResult<Self>
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        let mut terms = Vec::new();
        let mut names = BTreeSet::new();
        for (key, weight) in coefficients {
            if !weight.is_finite() {
                return Err(AnnealError::Parse {
                    key: key.to_string(),
                    reason: format!("weight {weight} is not finite"),
                });
            }
            let term = parse_key(key)?;
            match term {
                Term::Linear(a) => {
                    names.insert(a);
                }
                Term::Quadratic(a, b) => {
                    names.insert(a);
                    names.insert(b);
                }
            }
            terms.push((term, weight));
        }
        if names.is_empty() {
            return Err(AnnealError::EmptyProblem);
        }

        let index: BTreeMap<&str, usize> = names.iter().enumerate().map(|(i, n)| (*n, i)).collect();
        let index_of = |name: &str| index[name];
        let variables: Vec<String> = names.iter().map(|s| (*s).to_string()).collect();

        let mut linear = vec![0.0; variables.len()];
        let mut pairs: BTreeMap<(usize, usize), f64> = BTreeMap::new();
        for (term, weight) in terms {
            match term {
                Term::Linear(a) => linear[index_of(a)] += weight,
                Term::Quadratic(a, b) => {
                    let (i, j) = (index_of(a), index_of(b));
                    *pairs.entry((i.min(j), i.max(j))).or_insert(0.0) += weight;
                }
            }
        }

        let mut neighbors = vec![Vec::new(); variables.len()];
        let quadratic: Vec<_> = pairs.into_iter().map(|((i, j), w)| (i, j, w)).collect();
        for &(i, j, w) in &quadratic {
            neighbors[i].push((j, w));
            neighbors[j].push((i, w));
        }

        Ok(Self {
            variables,
            linear,
            quadratic,
            neighbors,
        })
    }

    /// Parse a name-keyed map.
    pub fn from_map(coefficients: &BTreeMap<String, f64>) -> AnnealResult<Self> {
        Self::from_coefficients(coefficients.iter().map(|(k, &v)| (k.as_str(), v)))
    }

    /// Number of distinct variables.
    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    /// Variable names, in index order.
    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    /// Linear weight of each variable.
    pub fn linear(&self) -> &[f64] {
        &self.linear
    }

    /// Merged quadratic terms.
    pub fn quadratic(&self) -> &[(usize, usize, f64)] {
        &self.quadratic
    }

    /// Total energy of an assignment.
    pub fn energy(&self, assignment: &[bool]) -> f64 {
        let linear: f64 = self
            .linear
            .iter()
            .zip(assignment)
            .filter(|(_, set)| **set)
            .map(|(w, _)| w)
            .sum();
        let quadratic: f64 = self
            .quadratic
            .iter()
            .filter(|(i, j, _)| assignment[*i] && assignment[*j])
            .map(|(_, _, w)| w)
            .sum();
        linear + quadratic
    }

    /// Energy change from flipping variable `k`.
    pub fn flip_delta(&self, assignment: &[bool], k: usize) -> f64 {
        let field = self.linear[k]
            + self.neighbors[k]
                .iter()
                .filter(|(j, _)| assignment[*j])
                .map(|(_, w)| w)
                .sum::<f64>();
        if assignment[k] { -field } else { field }
    }

    /// Map an assignment back to variable names.
    pub fn solution(&self, assignment: &[bool]) -> BTreeMap<String, u8> {
        self.variables
            .iter()
            .zip(assignment)
            .map(|(name, &set)| (name.clone(), u8::from(set)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn problem(terms: &[(&'static str, f64)]) -> QuboProblem {
        QuboProblem::from_coefficients(terms.iter().copied()).unwrap()
    }

    #[test]
    fn test_linear_and_quadratic_terms() {
        let p = problem(&[("x0", -1.0), ("x1", 2.0), ("x0,x1", 3.0)]);
        assert_eq!(p.variables(), ["x0", "x1"]);
        assert_eq!(p.energy(&[false, false]), 0.0);
        assert_eq!(p.energy(&[true, false]), -1.0);
        assert_eq!(p.energy(&[true, true]), 4.0);
    }

    #[test]
    fn test_whitespace_and_duplicates() {
        let p = problem(&[("a , b", 1.0), ("b,a", 2.0), ("a,a", -5.0), ("a", 1.0)]);
        assert_eq!(p.num_variables(), 2);
        assert_eq!(p.linear(), [-4.0, 0.0]);
        assert_eq!(p.quadratic(), [(0, 1, 3.0)]);
    }

    #[test]
    fn test_quadratic_only_variables_are_collected() {
        let p = problem(&[("y,z", 1.0)]);
        assert_eq!(p.variables(), ["y", "z"]);
        assert_eq!(p.linear(), [0.0, 0.0]);
    }

    #[test]
    fn test_parse_errors() {
        for key in ["", "a,", ",b", "a,b,c", " , "] {
            assert!(
                matches!(
                    QuboProblem::from_coefficients([(key, 1.0)]),
                    Err(AnnealError::Parse { .. })
                ),
                "key {key:?} should be rejected"
            );
        }
        assert!(matches!(
            QuboProblem::from_coefficients([("a", f64::NAN)]),
            Err(AnnealError::Parse { .. })
        ));
        assert_eq!(
            QuboProblem::from_coefficients(std::iter::empty()),
            Err(AnnealError::EmptyProblem)
        );
    }

    #[test]
    fn test_flip_delta_matches_energy_difference() {
        let p = problem(&[("a", 1.5), ("b", -2.0), ("c", 0.5), ("a,b", -1.0), ("b,c", 4.0)]);
        let mut x = vec![true, false, true];
        for k in 0..3 {
            let before = p.energy(&x);
            let delta = p.flip_delta(&x, k);
            x[k] = !x[k];
            assert!((p.energy(&x) - before - delta).abs() < 1e-12);
        }
    }

    #[test]
    fn test_solution_names() {
        let p = problem(&[("x1", 1.0), ("x0", 1.0)]);
        let solution = p.solution(&[true, false]);
        assert_eq!(solution["x0"], 1);
        assert_eq!(solution["x1"], 0);
    }
}
