//! Weighted sums of Pauli strings.
//!
//! The text form is a `+`-separated list of terms; each term is a
//! `*`-separated product of Pauli factors (`X3`, `y0`, `Z12`) and optional
//! real coefficients:
//!
//! ```text
//! Z0 + X1 + 0.5*Z0*Z1 + -1.2*Y2
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::qubit::QubitId;

/// A single-qubit Pauli operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pauli {
    X,
    Y,
    Z,
}

impl Pauli {
    fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'X' => Some(Pauli::X),
            'Y' => Some(Pauli::Y),
            'Z' => Some(Pauli::Z),
            _ => None,
        }
    }
}

impl fmt::Display for Pauli {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = match self {
            Pauli::X => 'X',
            Pauli::Y => 'Y',
            Pauli::Z => 'Z',
        };
        write!(f, "{c}")
    }
}

/// `coefficient · P_a ⊗ P_b ⊗ …`; qubits not listed carry the identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PauliTerm {
    pub coefficient: f64,
    pub factors: Vec<(QubitId, Pauli)>,
}

impl PauliTerm {
    /// Build a term, rejecting repeated qubits and non-finite coefficients.
    pub fn new(
        coefficient: f64,
        factors: impl IntoIterator<Item = (QubitId, Pauli)>,
    ) -> IrResult<Self> {
        let term = Self {
            coefficient,
            factors: factors.into_iter().collect(),
        };
        term.validate()?;
        Ok(term)
    }

    fn validate(&self) -> IrResult<()> {
        if !self.coefficient.is_finite() {
            return Err(IrError::InvalidHamiltonian(format!(
                "non-finite coefficient {} in '{self}'",
                self.coefficient
            )));
        }
        for (pos, (qubit, _)) in self.factors.iter().enumerate() {
            if self.factors[..pos].iter().any(|(q, _)| q == qubit) {
                return Err(IrError::InvalidHamiltonian(format!(
                    "qubit {qubit} appears twice in '{self}'"
                )));
            }
        }
        Ok(())
    }
}

impl fmt::Display for PauliTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.coefficient)?;
        for (qubit, pauli) in &self.factors {
            write!(f, "*{pauli}{}", qubit.0)?;
        }
        Ok(())
    }
}

impl FromStr for PauliTerm {
    type Err = IrError;

    fn from_str(text: &str) -> IrResult<Self> {
        let text = text.trim();
        if text.is_empty() {
            return Err(IrError::InvalidHamiltonian("empty term".into()));
        }

        let mut coefficient = 1.0;
        let mut factors = Vec::new();
        for token in text.split('*').map(str::trim) {
            let mut chars = token.chars();
            let pauli = chars.next().and_then(Pauli::from_char);
            match pauli {
                Some(pauli) => {
                    let index: u32 = chars.as_str().parse().map_err(|_| {
                        IrError::InvalidHamiltonian(format!("bad factor '{token}' in '{text}'"))
                    })?;
                    factors.push((QubitId(index), pauli));
                }
                None => {
                    let value: f64 = token.parse().map_err(|_| {
                        IrError::InvalidHamiltonian(format!("bad factor '{token}' in '{text}'"))
                    })?;
                    coefficient *= value;
                }
            }
        }
        Self::new(coefficient, factors)
    }
}

/// A Hamiltonian `Σ_k c_k P_k`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PauliSum {
    terms: Vec<PauliTerm>,
}

impl PauliSum {
    /// Build a sum from validated terms. At least one term must act on a
    /// qubit.
    pub fn new(terms: Vec<PauliTerm>) -> IrResult<Self> {
        for term in &terms {
            term.validate()?;
        }
        if terms.iter().all(|t| t.factors.is_empty()) {
            return Err(IrError::InvalidHamiltonian(
                "Hamiltonian acts on no qubit".into(),
            ));
        }
        Ok(Self { terms })
    }

    /// The terms, in input order.
    pub fn terms(&self) -> &[PauliTerm] {
        &self.terms
    }

    /// One past the highest qubit index any term touches.
    pub fn num_qubits(&self) -> u32 {
        self.terms
            .iter()
            .flat_map(|t| t.factors.iter())
            .map(|(q, _)| q.0 + 1)
            .max()
            .unwrap_or(0)
    }
}

impl FromStr for PauliSum {
    type Err = IrError;

    fn from_str(text: &str) -> IrResult<Self> {
        let terms = text
            .split('+')
            .map(str::parse)
            .collect::<IrResult<Vec<PauliTerm>>>()?;
        Self::new(terms)
    }
}
