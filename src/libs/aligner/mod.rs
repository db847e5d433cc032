use std::fmt;

pub mod pymol;

pub use pymol::PymolAligner;

/// The external structural-alignment toolkit, seen as a capability.
///
/// The toolkit keeps one shared working context of named objects, so an
/// implementation is inherently single-threaded: callers must load a
/// structure before using it and delete it as soon as the current pair is
/// done. Taking the aligner as `&mut dyn Aligner` lets tests substitute a
/// fake for the real subprocess.
pub trait Aligner {
    /// Load a structure file into the working context under `name`.
    fn load(&mut self, path: &str, name: &str) -> Result<(), AlignerError>;

    /// Superpose the alpha-carbon atoms of object `mobile` onto those of
    /// object `target` and return the resulting RMSD.
    fn align(&mut self, mobile: &str, target: &str) -> Result<f64, AlignerError>;

    /// Remove a named object from the working context.
    fn delete(&mut self, name: &str) -> Result<(), AlignerError>;
}

/// Errors from the alignment toolkit.
///
/// `Load` and `Align` are per-structure / per-pair conditions the pairwise
/// builder recovers from; `Protocol` means the toolkit itself is gone
/// (unreachable executable, dead subprocess, broken pipe) and aborts the run.
#[derive(Debug)]
pub enum AlignerError {
    Load {
        path: String,
        message: String,
    },
    Align {
        mobile: String,
        target: String,
        message: String,
    },
    Protocol(String),
}

impl fmt::Display for AlignerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlignerError::Load { path, message } => {
                write!(f, "can not load structure {}: {}", path, message)
            }
            AlignerError::Align {
                mobile,
                target,
                message,
            } => {
                write!(f, "can not align {} onto {}: {}", mobile, target, message)
            }
            AlignerError::Protocol(msg) => write!(f, "aligner failure: {}", msg),
        }
    }
}

impl std::error::Error for AlignerError {}
