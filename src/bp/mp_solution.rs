/// values below this are zero, values within it of 1 are one
pub const EPS: f64 = 1e-6;

/** Solution of one restricted master solve: objective, the active
columns keyed by their pool id, and (in LP mode) one dual per cluster. */
#[derive(Debug, Clone)]
pub struct MpSolution {
    /// objective value
    pub obj_value: f64,
    /// (pool id, value) of every column above the tolerance
    pub columns: Vec<(u32, f64)>,
    /// covering-row duals, empty after a MIP solve
    pub duals: Vec<f64>,
}

impl MpSolution {
    /// true iff every active column sits at 1 within the tolerance
    pub fn is_integer(&self) -> bool {
        self.columns.iter().all(|&(_, value)| (value - 1.0).abs() < EPS)
    }

    /// the active (pool id, value) pairs
    pub fn active_columns(&self) -> &[(u32, f64)] {
        &self.columns
    }

    /// value of one column, zero when inactive
    pub fn value_of(&self, id: u32) -> f64 {
        self.columns.iter().find(|&&(c, _)| c == id).map_or(0.0, |&(_, v)| v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integrality_is_checked_within_tolerance() {
        let integral = MpSolution {
            obj_value: 2.0,
            columns: vec![(0, 1.0), (3, 1.0 - 1e-9)],
            duals: vec![],
        };
        assert!(integral.is_integer());
        let fractional =
            MpSolution { obj_value: 1.5, columns: vec![(0, 0.5), (1, 1.0)], duals: vec![] };
        assert!(!fractional.is_integer());
        assert!((fractional.value_of(0) - 0.5).abs() < EPS);
        assert_eq!(fractional.value_of(9), 0.0);
    }
}
