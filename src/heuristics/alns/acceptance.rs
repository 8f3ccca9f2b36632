use fastrand::Rng;

use crate::params::{AcceptanceKind, AlnsParams};

/** ALNS acceptance criterion for a repaired solution. */
#[derive(Debug, Clone, Copy)]
pub enum Acceptance {
    /// take every move
    Everything,
    /// take a move iff it does not worsen the current score
    NonDeteriorating,
    /** take worsening moves with probability `p0 · iter / N`; improving
    and equal moves always pass */
    WorseAccept {
        /// the p0 factor
        initial_probability: f32,
        /// the N the iteration count is normalised by
        total_iterations: u32,
    },
}

impl Acceptance {
    /// builds the configured criterion
    pub fn from_params(kind: AcceptanceKind, alns: &AlnsParams, total_iterations: u32) -> Self {
        match kind {
            AcceptanceKind::AcceptEverything => Self::Everything,
            AcceptanceKind::AcceptNonDeteriorating => Self::NonDeteriorating,
            AcceptanceKind::WorseAccept => Self::WorseAccept {
                initial_probability: alns.wa_initial_probability,
                total_iterations,
            },
        }
    }

    /// decides on an incumbent scored against the current solution
    pub fn accept(&self, current: usize, incumbent: usize, iteration: u32, rng: &mut Rng) -> bool {
        match *self {
            Self::Everything => true,
            Self::NonDeteriorating => incumbent <= current,
            Self::WorseAccept { initial_probability, total_iterations } => {
                incumbent <= current
                    || rng.f32()
                        < initial_probability * iteration as f32 / total_iterations as f32
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_deteriorating_rejects_worsening() {
        let mut rng = Rng::with_seed(7);
        assert!(Acceptance::NonDeteriorating.accept(5, 5, 1, &mut rng));
        assert!(Acceptance::NonDeteriorating.accept(5, 4, 1, &mut rng));
        assert!(!Acceptance::NonDeteriorating.accept(5, 6, 1, &mut rng));
    }

    #[test]
    fn worse_accept_always_takes_improvements() {
        let mut rng = Rng::with_seed(7);
        let wa = Acceptance::WorseAccept { initial_probability: 0.0, total_iterations: 100 };
        assert!(wa.accept(5, 4, 50, &mut rng));
        // zero probability: worsening never passes
        assert!(!wa.accept(5, 6, 50, &mut rng));
    }
}
