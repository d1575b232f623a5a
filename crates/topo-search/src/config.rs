use serde::{Deserialize, Serialize};
use topo_core::errors::{ErrorInfo, TopoError};

/// Nudged elastic band settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NebConfig {
    /// Intermediate images per unit distance between the endpoints.
    #[serde(default = "default_image_density")]
    pub image_density: f64,
    /// Lower limit on intermediate images.
    #[serde(default = "default_min_images")]
    pub min_images: usize,
    /// Upper limit on intermediate images.
    #[serde(default = "default_max_images")]
    pub max_images: usize,
    /// Initial spring constant between neighbouring images.
    #[serde(default = "default_force_constant")]
    pub force_constant: f64,
    /// Multiplier applied to the spring constant when spacing is uneven.
    #[serde(default = "default_force_constant_growth")]
    pub force_constant_growth: f64,
    /// Ceiling for the adapted spring constant.
    #[serde(default = "default_max_force_constant")]
    pub max_force_constant: f64,
    /// Largest tolerated ratio between the longest and shortest segment.
    #[serde(default = "default_spacing_tolerance")]
    pub spacing_tolerance: f64,
    /// Maximum per-image force at convergence.
    #[serde(default = "default_neb_conv_crit")]
    pub conv_crit: f64,
    /// Relaxation iteration budget.
    #[serde(default = "default_neb_iterations")]
    pub max_iterations: usize,
    /// Initial FIRE time step.
    #[serde(default = "default_time_step")]
    pub time_step: f64,
    /// Largest FIRE time step.
    #[serde(default = "default_max_time_step")]
    pub max_time_step: f64,
    /// Largest image displacement per iteration, as a fraction of the mean segment length.
    #[serde(default = "default_max_step_fraction")]
    pub max_step_fraction: f64,
}

fn default_image_density() -> f64 {
    10.0
}

fn default_min_images() -> usize {
    3
}

fn default_max_images() -> usize {
    30
}

fn default_force_constant() -> f64 {
    10.0
}

fn default_force_constant_growth() -> f64 {
    2.0
}

fn default_max_force_constant() -> f64 {
    500.0
}

fn default_spacing_tolerance() -> f64 {
    2.0
}

fn default_neb_conv_crit() -> f64 {
    1e-2
}

fn default_neb_iterations() -> usize {
    2000
}

fn default_time_step() -> f64 {
    0.05
}

fn default_max_time_step() -> f64 {
    0.5
}

fn default_max_step_fraction() -> f64 {
    0.2
}

impl Default for NebConfig {
    fn default() -> Self {
        Self {
            image_density: default_image_density(),
            min_images: default_min_images(),
            max_images: default_max_images(),
            force_constant: default_force_constant(),
            force_constant_growth: default_force_constant_growth(),
            max_force_constant: default_max_force_constant(),
            spacing_tolerance: default_spacing_tolerance(),
            conv_crit: default_neb_conv_crit(),
            max_iterations: default_neb_iterations(),
            time_step: default_time_step(),
            max_time_step: default_max_time_step(),
            max_step_fraction: default_max_step_fraction(),
        }
    }
}

/// Hybrid eigenvector-following settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HefConfig {
    /// Gradient norm below which a saddle is converged.
    #[serde(default = "default_hef_conv_crit")]
    pub conv_crit: f64,
    /// Iteration budget.
    #[serde(default = "default_ts_steps")]
    pub ts_steps: usize,
    /// Cap on the uphill step along the mode.
    #[serde(default = "default_max_uphill_step_size")]
    pub max_uphill_step_size: f64,
    /// Fixed uphill step taken while the lowest eigenvalue is not negative.
    #[serde(default = "default_positive_eigenvalue_step")]
    pub positive_eigenvalue_step: f64,
    /// Displacement along the mode used to find the connected minima.
    #[serde(default = "default_pushoff")]
    pub pushoff: f64,
    /// Eigenvalues below `-eigenvalue_tolerance` count as negative.
    #[serde(default = "default_eigenvalue_tolerance")]
    pub eigenvalue_tolerance: f64,
    /// Iteration budget of each minimisation in the orthogonal subspace.
    #[serde(default = "default_max_subspace_iterations")]
    pub max_subspace_iterations: usize,
    /// Relative step of the finite-difference Hessian.
    #[serde(default = "default_fd_step")]
    pub fd_step: f64,
    /// Reject saddles lying on the domain boundary.
    #[serde(default = "default_true")]
    pub reject_bounds: bool,
    /// Distance to a face that counts as lying on the boundary.
    #[serde(default = "default_bounds_tolerance")]
    pub bounds_tolerance: f64,
}

fn default_hef_conv_crit() -> f64 {
    1e-5
}

fn default_ts_steps() -> usize {
    100
}

fn default_max_uphill_step_size() -> f64 {
    0.3
}

fn default_positive_eigenvalue_step() -> f64 {
    0.1
}

fn default_pushoff() -> f64 {
    1e-2
}

fn default_eigenvalue_tolerance() -> f64 {
    1e-5
}

fn default_max_subspace_iterations() -> usize {
    20
}

fn default_fd_step() -> f64 {
    topo_core::hessian::DEFAULT_FD_STEP
}

fn default_true() -> bool {
    true
}

fn default_bounds_tolerance() -> f64 {
    1e-6
}

impl Default for HefConfig {
    fn default() -> Self {
        Self {
            conv_crit: default_hef_conv_crit(),
            ts_steps: default_ts_steps(),
            max_uphill_step_size: default_max_uphill_step_size(),
            positive_eigenvalue_step: default_positive_eigenvalue_step(),
            pushoff: default_pushoff(),
            eigenvalue_tolerance: default_eigenvalue_tolerance(),
            max_subspace_iterations: default_max_subspace_iterations(),
            fd_step: default_fd_step(),
            reject_bounds: true,
            bounds_tolerance: default_bounds_tolerance(),
        }
    }
}

/// Perturbation step settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepTakerConfig {
    /// Largest displacement per coordinate.
    #[serde(default = "default_max_displacement")]
    pub max_displacement: f64,
    /// Interpret `max_displacement` as a fraction of each dimension's range.
    #[serde(default = "default_true")]
    pub proportional: bool,
}

fn default_max_displacement() -> f64 {
    0.5
}

impl Default for StepTakerConfig {
    fn default() -> Self {
        Self {
            max_displacement: default_max_displacement(),
            proportional: true,
        }
    }
}

/// Basin-hopping settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasinHoppingConfig {
    /// Number of perturb-minimise-accept iterations.
    #[serde(default = "default_n_steps")]
    pub n_steps: usize,
    /// Metropolis temperature; zero never accepts uphill moves.
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    /// Perturbation settings.
    #[serde(default)]
    pub step: StepTakerConfig,
    /// Discard minima stuck on a face with a non-vanishing gradient.
    #[serde(default = "default_true")]
    pub reject_bounds_minima: bool,
    /// Distance to a face that counts as lying on the boundary.
    #[serde(default = "default_bounds_tolerance")]
    pub bounds_tolerance: f64,
    /// Raw gradient norm above which a boundary minimum is rejected.
    #[serde(default = "default_bounds_gradient_tolerance")]
    pub bounds_gradient_tolerance: f64,
    /// Steps between step-size adjustments; zero disables adaptation.
    #[serde(default)]
    pub adjust_interval: usize,
    /// Factor in `(0, 1)` applied to shrink the step, or divided to grow it.
    #[serde(default = "default_adjust_factor")]
    pub adjust_factor: f64,
    /// Acceptance rate the adaptation steers toward.
    #[serde(default = "default_target_acceptance")]
    pub target_acceptance: f64,
}

fn default_n_steps() -> usize {
    100
}

fn default_temperature() -> f64 {
    1.0
}

fn default_bounds_gradient_tolerance() -> f64 {
    1e-3
}

fn default_adjust_factor() -> f64 {
    0.9
}

fn default_target_acceptance() -> f64 {
    0.5
}

impl Default for BasinHoppingConfig {
    fn default() -> Self {
        Self {
            n_steps: default_n_steps(),
            temperature: default_temperature(),
            step: StepTakerConfig::default(),
            reject_bounds_minima: true,
            bounds_tolerance: default_bounds_tolerance(),
            bounds_gradient_tolerance: default_bounds_gradient_tolerance(),
            adjust_interval: 0,
            adjust_factor: default_adjust_factor(),
            target_acceptance: default_target_acceptance(),
        }
    }
}

pub(crate) fn invalid(code: &str, message: &str, key: &str, value: f64) -> TopoError {
    TopoError::Config(ErrorInfo::new(code, message).with_context(key, value.to_string()))
}

impl NebConfig {
    /// Checks ranges that would make relaxation meaningless.
    pub fn validate(&self) -> Result<(), TopoError> {
        if self.min_images == 0 || self.max_images < self.min_images {
            return Err(TopoError::Config(
                ErrorInfo::new("neb-images", "need 1 <= min_images <= max_images")
                    .with_context("min_images", self.min_images.to_string())
                    .with_context("max_images", self.max_images.to_string()),
            ));
        }
        if !(self.force_constant > 0.0) {
            return Err(invalid(
                "neb-force-constant",
                "force constant must be positive",
                "force_constant",
                self.force_constant,
            ));
        }
        if !(self.time_step > 0.0 && self.max_time_step >= self.time_step) {
            return Err(invalid(
                "neb-time-step",
                "need 0 < time_step <= max_time_step",
                "time_step",
                self.time_step,
            ));
        }
        Ok(())
    }
}

impl HefConfig {
    /// Checks ranges that would make the search meaningless.
    pub fn validate(&self) -> Result<(), TopoError> {
        if !(self.conv_crit > 0.0) {
            return Err(invalid(
                "hef-conv-crit",
                "convergence criterion must be positive",
                "conv_crit",
                self.conv_crit,
            ));
        }
        if !(self.pushoff > 0.0) {
            return Err(invalid("hef-pushoff", "pushoff must be positive", "pushoff", self.pushoff));
        }
        if !(self.max_uphill_step_size > 0.0) {
            return Err(invalid(
                "hef-uphill-step",
                "uphill step cap must be positive",
                "max_uphill_step_size",
                self.max_uphill_step_size,
            ));
        }
        Ok(())
    }
}

impl BasinHoppingConfig {
    /// Checks ranges that would make the run meaningless.
    pub fn validate(&self) -> Result<(), TopoError> {
        if !(self.temperature >= 0.0) {
            return Err(invalid(
                "bh-temperature",
                "temperature must be non-negative",
                "temperature",
                self.temperature,
            ));
        }
        if !(self.step.max_displacement > 0.0) {
            return Err(invalid(
                "bh-displacement",
                "max displacement must be positive",
                "max_displacement",
                self.step.max_displacement,
            ));
        }
        if self.adjust_interval > 0 && !(self.adjust_factor > 0.0 && self.adjust_factor < 1.0) {
            return Err(invalid(
                "bh-adjust-factor",
                "adjust factor must lie in (0, 1)",
                "adjust_factor",
                self.adjust_factor,
            ));
        }
        Ok(())
    }
}
