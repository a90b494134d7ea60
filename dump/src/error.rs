//! Errors that abort a render pass.

use crate::Identity;

/// Error returned when a render pass cannot complete.
///
/// Values that cannot be represented and absent values are never errors:
/// they render as `not implemented` and `undefined` leaves. Only identity
/// bookkeeping going inconsistent or the sink failing stops a pass.
#[derive(Debug)]
#[non_exhaustive]
pub enum DumpError {
    /// A dereference would alias an identity to itself.
    ///
    /// This points at a defect in a domain adapter, e.g. calling
    /// [`Dumper::tagged`](crate::Dumper::tagged) with the union as its own case.
    SelfAlias {
        /// The identity that was both the outer and the inner value.
        identity: Identity,
    },

    /// Resolving an identity revisited an identity already seen in the chain.
    AliasCycle {
        /// The identity resolution started from.
        identity: Identity,
        /// The chain that was followed, ending with the revisited identity.
        chain: Vec<Identity>,
    },

    /// Writing to the output sink failed.
    Fmt(core::fmt::Error),

    /// Writing an output file failed.
    Io(std::io::Error),
}

impl core::fmt::Display for DumpError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            DumpError::SelfAlias { identity } => {
                write!(f, "cannot alias {identity} to itself")
            }
            DumpError::AliasCycle { identity, chain } => {
                write!(f, "alias cycle while resolving {identity}: ")?;
                for (i, step) in chain.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" -> ")?;
                    }
                    write!(f, "{step}")?;
                }
                Ok(())
            }
            DumpError::Fmt(_) => f.write_str("failed to write to the output sink"),
            DumpError::Io(err) => write!(f, "failed to write output file: {err}"),
        }
    }
}

impl core::error::Error for DumpError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            DumpError::Fmt(err) => Some(err),
            DumpError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<core::fmt::Error> for DumpError {
    fn from(err: core::fmt::Error) -> Self {
        DumpError::Fmt(err)
    }
}

impl From<std::io::Error> for DumpError {
    fn from(err: std::io::Error) -> Self {
        DumpError::Io(err)
    }
}
