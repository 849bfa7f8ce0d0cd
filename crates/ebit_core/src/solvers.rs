use crate::derivative::RateField;

/// Classic Runge-Kutta 4th Order stepper over a species' charge-state populations.
///
/// The stage buffers are owned by the species and reused for every step. `tmp` holds
/// the trial population of the most recent stage, which is also what decay coupling
/// of the preceding species reads.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RK4 {
    pub k1: Vec<f64>,
    pub k2: Vec<f64>,
    pub k3: Vec<f64>,
    pub k4: Vec<f64>,
    pub tmp: Vec<f64>,
}

impl RK4 {
    pub fn new(dim: usize) -> Self {
        Self {
            k1: vec![0.0; dim],
            k2: vec![0.0; dim],
            k3: vec![0.0; dim],
            k4: vec![0.0; dim],
            tmp: vec![0.0; dim],
        }
    }

    /// Advances `source` by one step of size `step` and writes the result to `dest`.
    /// Only charge states 0..=Z of `dest` are written.
    pub fn step(&mut self, field: &RateField, step: f64, source: &[f64], dest: &mut [f64]) {
        // k1 = h f(y)
        field.evaluate(source, source, 0.0, step, &mut self.tmp, &mut self.k1);
        // k2 = h f(y + k1/2)
        field.evaluate(source, &self.k1, 0.5, step, &mut self.tmp, &mut self.k2);
        // k3 = h f(y + k2/2)
        field.evaluate(source, &self.k2, 0.5, step, &mut self.tmp, &mut self.k3);
        // k4 = h f(y + k3)
        field.evaluate(source, &self.k3, 1.0, step, &mut self.tmp, &mut self.k4);

        // y_next = y + (k1 + 2k2 + 2k3 + k4) / 6
        for q in 0..=field.z {
            dest[q] = source[q]
                + ((1.0 / 6.0) * (self.k1[q] + (2.0 * (self.k2[q] + self.k3[q])) + self.k4[q]));
        }
    }
}
