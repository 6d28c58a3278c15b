//! Continuous linear state-space model and its zero-order-hold discretization.
//!
//! ```text
//! dx/dt = A·x + B·u + c
//! ```
//!
//! `u` is the applied voltage; `c` is a constant disturbance (gravity).
//! Discretization uses the Van Loan block exponential
//!
//! ```text
//! exp([[A, B, c], [0, 0, 0], [0, 0, 0]] · dt) = [[Ad, Bd, cd], [0, 1, 0], [0, 0, 1]]
//! ```
//!
//! which is exact for piecewise-constant input and stays well-conditioned
//! when `A` is singular (the elevator's position row).

use nalgebra::{DMatrix, SMatrix, SVector};

/// Continuous-time model with `N` states and one voltage input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearSystem<const N: usize> {
    pub a: SMatrix<f64, N, N>,
    pub b: SVector<f64, N>,
    pub c: SVector<f64, N>,
}

/// Zero-order-hold discretization of a [`LinearSystem`] at a fixed `dt`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiscreteSystem<const N: usize> {
    pub ad: SMatrix<f64, N, N>,
    pub bd: SVector<f64, N>,
    pub cd: SVector<f64, N>,
    pub dt: f64,
}

impl<const N: usize> LinearSystem<N> {
    pub fn new(a: SMatrix<f64, N, N>, b: SVector<f64, N>, c: SVector<f64, N>) -> Self {
        Self { a, b, c }
    }

    /// Continuous state derivative at `x` under input `u`.
    #[inline]
    pub fn derivative(&self, x: &SVector<f64, N>, u: f64) -> SVector<f64, N> {
        self.a * x + self.b * u + self.c
    }

    /// Discretize with a zero-order hold on `u` over `dt`.
    pub fn discretize(&self, dt: f64) -> DiscreteSystem<N> {
        let size = N + 2;
        let mut m = DMatrix::<f64>::zeros(size, size);
        for i in 0..N {
            for j in 0..N {
                m[(i, j)] = self.a[(i, j)] * dt;
            }
            m[(i, N)] = self.b[i] * dt;
            m[(i, N + 1)] = self.c[i] * dt;
        }

        let e = m.exp();

        DiscreteSystem {
            ad: SMatrix::<f64, N, N>::from_fn(|i, j| e[(i, j)]),
            bd: SVector::<f64, N>::from_fn(|i, _| e[(i, N)]),
            cd: SVector::<f64, N>::from_fn(|i, _| e[(i, N + 1)]),
            dt,
        }
    }
}

impl<const N: usize> DiscreteSystem<N> {
    /// Next state after holding `u` for one period.
    #[inline]
    pub fn step(&self, x: &SVector<f64, N>, u: f64) -> SVector<f64, N> {
        self.ad * x + self.bd * u + self.cd
    }
}

/// Discretization cache keyed on `dt`.
///
/// The control loop runs at a fixed period, so the block exponential is
/// normally computed once.
#[derive(Debug, Clone)]
pub(crate) struct Discretized<const N: usize> {
    system: LinearSystem<N>,
    cached: Option<DiscreteSystem<N>>,
}

impl<const N: usize> Discretized<N> {
    pub(crate) fn new(system: LinearSystem<N>) -> Self {
        Self {
            system,
            cached: None,
        }
    }

    pub(crate) fn system(&self) -> &LinearSystem<N> {
        &self.system
    }

    pub(crate) fn at(&mut self, dt: f64) -> &DiscreteSystem<N> {
        if self.cached.as_ref().is_some_and(|d| d.dt != dt) {
            self.cached = None;
        }
        let system = &self.system;
        self.cached.get_or_insert_with(|| system.discretize(dt))
    }
}

// ─── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{Matrix1, Matrix2, Vector1, Vector2};

    #[test]
    fn first_order_matches_analytic() {
        // v' = a v + b u
        let (a, b) = (-5.0, 10.0);
        let sys = LinearSystem::new(Matrix1::new(a), Vector1::new(b), Vector1::zeros());
        let d = sys.discretize(0.02);
        let ad = (a * 0.02_f64).exp();
        assert!((d.ad[(0, 0)] - ad).abs() < 1e-12);
        assert!((d.bd[0] - (ad - 1.0) / a * b).abs() < 1e-12);
        assert!(d.cd[0].abs() < 1e-15);
    }

    #[test]
    fn double_integrator_is_exact() {
        // x'' = u + c with A singular.
        let sys = LinearSystem::new(
            Matrix2::new(0.0, 1.0, 0.0, 0.0),
            Vector2::new(0.0, 1.0),
            Vector2::new(0.0, -9.81),
        );
        let dt = 0.1;
        let d = sys.discretize(dt);
        let x = d.step(&Vector2::new(1.0, 2.0), 3.0);
        let accel = 3.0 - 9.81;
        assert!((x[0] - (1.0 + 2.0 * dt + 0.5 * accel * dt * dt)).abs() < 1e-12);
        assert!((x[1] - (2.0 + accel * dt)).abs() < 1e-12);
    }

    #[test]
    fn stiff_pole_is_stable() {
        // Back-EMF pole far beyond 1/dt must not blow up.
        let sys = LinearSystem::new(
            Matrix2::new(0.0, 1.0, 0.0, -600.0),
            Vector2::new(0.0, 14.0),
            Vector2::zeros(),
        );
        let mut d = Discretized::new(sys);
        let mut x = Vector2::zeros();
        for _ in 0..500 {
            x = d.at(0.02).step(&x, 12.0);
        }
        // Terminal velocity B·u / |A22|.
        assert!((x[1] - 14.0 * 12.0 / 600.0).abs() < 1e-9);
    }

    #[test]
    fn cache_follows_dt() {
        let sys = LinearSystem::new(Matrix1::new(-1.0), Vector1::new(1.0), Vector1::zeros());
        let mut d = Discretized::new(sys);
        let a1 = d.at(0.02).ad[(0, 0)];
        let a2 = d.at(0.01).ad[(0, 0)];
        assert!(a1 < a2);
        assert_eq!(d.at(0.01).dt, 0.01);
        assert_eq!(d.system().a[(0, 0)], -1.0);
    }

    #[test]
    fn derivative_evaluates_model() {
        let sys = LinearSystem::new(Matrix1::new(-2.0), Vector1::new(3.0), Vector1::new(1.0));
        let dx = sys.derivative(&Vector1::new(1.0), 2.0);
        assert!((dx[0] - (-2.0 + 6.0 + 1.0)).abs() < 1e-12);
    }
}
