//! Tumour growth simulation parameters.

/// Parameter set for the stochastic growth rule.
///
/// All fields are plain and public: set them directly before or between
/// runs. They must not be mutated while a run is in flight — that is a
/// caller contract, not a checked error.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GrowthParams {
    /// Survival probability per update. A cell whose survival roll fails
    /// dies immediately and awakens its dormant neighbours.
    pub ps: f64,
    /// Proliferation probability per update, gated by [`np`](Self::np).
    pub pp: f64,
    /// Migration probability per update, rolled only when the cell does
    /// not proliferate.
    pub pm: f64,
    /// Proliferation threshold: consecutive successful proliferation rolls
    /// a cell must accumulate before it actually divides.
    pub np: u32,
    /// Division budget: proliferation events a cell may perform before it
    /// dies. Newly proliferated (and newly seeded) cells start with this
    /// budget.
    pub rho: u32,
}

impl Default for GrowthParams {
    fn default() -> Self {
        Self {
            ps: 0.99,
            pp: 0.8,
            pm: 0.2,
            np: 5,
            rho: 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_parameter_values() {
        let p = GrowthParams::default();
        assert_eq!(p.ps, 0.99);
        assert_eq!(p.pp, 0.8);
        assert_eq!(p.pm, 0.2);
        assert_eq!(p.np, 5);
        assert_eq!(p.rho, 2);
    }
}
