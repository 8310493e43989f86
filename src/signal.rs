use std::fmt;

/// The two series stored in a vital log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignalKind {
    /// Single-lead ECG waveform, one value per row.
    Ecg,
    /// Tri-axial accelerometer, three consecutive rows per sample.
    Accel,
}

impl SignalKind {
    pub const ALL: [SignalKind; 2] = [SignalKind::Ecg, SignalKind::Accel];

    /// `ZLOGGEDDATA.ZTYPE` discriminator.
    pub fn type_code(self) -> i64 {
        match self {
            Self::Ecg => 8,
            Self::Accel => 1,
        }
    }

    pub fn file_suffix(self) -> &'static str {
        match self {
            Self::Ecg => ".ecg_i.csv",
            Self::Accel => ".acc_i.csv",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Ecg => "ecg",
            Self::Accel => "accel",
        }
    }
}

impl fmt::Display for SignalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
