//! Delayed-neutron and decay-heat reference data.
//!
//! Six-group delayed-neutron parameters follow Keepin's fits for fission of
//! U-235 and Pu-239 in thermal and fast spectra. Decay heat uses an
//! eleven-group fit for U-235 thermal fission.

use std::fmt;
use std::str::FromStr;

use crate::error::{KineticsError, KineticsResult};

/// Number of delayed-neutron precursor groups in the tables.
pub const PRECURSOR_GROUPS: usize = 6;
/// Number of decay-heat groups in the tables.
pub const DECAY_HEAT_GROUPS: usize = 11;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FissionIsotope {
    U235,
    Pu239,
}

impl FissionIsotope {
    pub const ALL: [FissionIsotope; 2] = [FissionIsotope::U235, FissionIsotope::Pu239];

    pub fn as_str(self) -> &'static str {
        match self {
            FissionIsotope::U235 => "u235",
            FissionIsotope::Pu239 => "pu239",
        }
    }
}

impl fmt::Display for FissionIsotope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FissionIsotope {
    type Err = KineticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['-', '_'], "").as_str() {
            "u235" => Ok(FissionIsotope::U235),
            "pu239" => Ok(FissionIsotope::Pu239),
            _ => Err(KineticsError::UnknownIsotope {
                name: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Spectrum {
    Thermal,
    Fast,
}

impl Spectrum {
    pub const ALL: [Spectrum; 2] = [Spectrum::Thermal, Spectrum::Fast];

    pub fn as_str(self) -> &'static str {
        match self {
            Spectrum::Thermal => "thermal",
            Spectrum::Fast => "fast",
        }
    }

    /// Prompt neutron generation time Λ [s].
    pub fn generation_time(self) -> f64 {
        match self {
            Spectrum::Thermal => 1.0e-4,
            Spectrum::Fast => 1.0e-6,
        }
    }
}

impl fmt::Display for Spectrum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Spectrum {
    type Err = KineticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "thermal" => Ok(Spectrum::Thermal),
            "fast" => Ok(Spectrum::Fast),
            _ => Err(KineticsError::UnknownSpectrum {
                name: s.to_string(),
            }),
        }
    }
}

struct PrecursorTable {
    beta: f64,
    abundances: [f64; PRECURSOR_GROUPS],
    lambdas: [f64; PRECURSOR_GROUPS],
}

const U235_THERMAL: PrecursorTable = PrecursorTable {
    beta: 0.0065,
    abundances: [0.033, 0.219, 0.196, 0.395, 0.115, 0.042],
    lambdas: [0.0124, 0.0305, 0.111, 0.301, 1.14, 3.01],
};

const U235_FAST: PrecursorTable = PrecursorTable {
    beta: 0.0064,
    abundances: [0.038, 0.213, 0.188, 0.407, 0.128, 0.026],
    lambdas: [0.0127, 0.0317, 0.115, 0.311, 1.40, 3.87],
};

const PU239_THERMAL: PrecursorTable = PrecursorTable {
    beta: 0.0021,
    abundances: [0.035, 0.298, 0.211, 0.326, 0.086, 0.044],
    lambdas: [0.0128, 0.0301, 0.124, 0.325, 1.12, 2.69],
};

const PU239_FAST: PrecursorTable = PrecursorTable {
    beta: 0.0020,
    abundances: [0.038, 0.280, 0.216, 0.328, 0.103, 0.035],
    lambdas: [0.0129, 0.0311, 0.134, 0.331, 1.26, 3.21],
};

const U235_DECAY_LAMBDAS: [f64; DECAY_HEAT_GROUPS] = [
    1.772, 0.5774, 6.743e-2, 6.214e-3, 4.739e-4, 4.810e-5, 5.344e-6, 5.726e-7, 1.036e-7, 2.959e-8,
    7.585e-10,
];

const U235_DECAY_KAPPAS: [f64; DECAY_HEAT_GROUPS] = [
    0.00299, 0.00825, 0.01550, 0.01935, 0.01165, 0.00645, 0.00231, 0.00164, 0.00085, 0.00043,
    0.00057,
];

/// Map a configured group count onto the only supported values `{0, supported}`.
fn group_count(
    what: &'static str,
    count: i64,
    supported: usize,
    options: &'static str,
) -> KineticsResult<usize> {
    match usize::try_from(count) {
        Ok(0) => Ok(0),
        Ok(n) if n == supported => Ok(n),
        _ => Err(KineticsError::UnsupportedGroupCount {
            what,
            count,
            options,
        }),
    }
}

/// Delayed-neutron parameters for the selected number of groups.
#[derive(Debug, Clone, PartialEq)]
pub struct PrecursorData {
    betas: Vec<f64>,
    lambdas: Vec<f64>,
    generation_time: f64,
}

impl PrecursorData {
    /// Look up data for `(isotope, spectrum)` with `n_groups` ∈ {0, 6}.
    ///
    /// Zero groups yields prompt-only kinetics with β = 0.
    pub fn lookup(
        isotope: FissionIsotope,
        spectrum: Spectrum,
        n_groups: i64,
    ) -> KineticsResult<Self> {
        let n = group_count("precursor", n_groups, PRECURSOR_GROUPS, "0, 6")?;
        let table = match (isotope, spectrum) {
            (FissionIsotope::U235, Spectrum::Thermal) => &U235_THERMAL,
            (FissionIsotope::U235, Spectrum::Fast) => &U235_FAST,
            (FissionIsotope::Pu239, Spectrum::Thermal) => &PU239_THERMAL,
            (FissionIsotope::Pu239, Spectrum::Fast) => &PU239_FAST,
        };
        Ok(Self {
            betas: table.abundances[..n]
                .iter()
                .map(|a| a * table.beta)
                .collect(),
            lambdas: table.lambdas[..n].to_vec(),
            generation_time: spectrum.generation_time(),
        })
    }

    pub fn groups(&self) -> usize {
        self.betas.len()
    }

    pub fn betas(&self) -> &[f64] {
        &self.betas
    }

    pub fn lambdas(&self) -> &[f64] {
        &self.lambdas
    }

    /// Total delayed fraction β = Σ βᵢ.
    pub fn beta(&self) -> f64 {
        self.betas.iter().sum()
    }

    /// Prompt neutron generation time Λ [s].
    pub fn generation_time(&self) -> f64 {
        self.generation_time
    }
}

/// Decay-heat group parameters: decay constants λₖ and fractions κₖ.
#[derive(Debug, Clone, PartialEq)]
pub struct DecayHeatData {
    lambdas: Vec<f64>,
    kappas: Vec<f64>,
}

impl DecayHeatData {
    /// Look up data for `isotope` with `n_groups` ∈ {0, 11}.
    ///
    /// The tables are spectrum-independent; `spectrum` is only reported in
    /// the error when an isotope has no data.
    pub fn lookup(
        isotope: FissionIsotope,
        spectrum: Spectrum,
        n_groups: i64,
    ) -> KineticsResult<Self> {
        let n = group_count("decay heat", n_groups, DECAY_HEAT_GROUPS, "0, 11")?;
        if n == 0 {
            return Ok(Self {
                lambdas: Vec::new(),
                kappas: Vec::new(),
            });
        }
        match isotope {
            FissionIsotope::U235 => Ok(Self {
                lambdas: U235_DECAY_LAMBDAS.to_vec(),
                kappas: U235_DECAY_KAPPAS.to_vec(),
            }),
            FissionIsotope::Pu239 => Err(KineticsError::MissingData {
                what: "decay heat",
                isotope,
                spectrum,
            }),
        }
    }

    pub fn groups(&self) -> usize {
        self.kappas.len()
    }

    pub fn lambdas(&self) -> &[f64] {
        &self.lambdas
    }

    pub fn kappas(&self) -> &[f64] {
        &self.kappas
    }

    /// Σ κₖ: the share of power released as decay heat at equilibrium.
    pub fn kappa_total(&self) -> f64 {
        self.kappas.iter().sum()
    }
}
