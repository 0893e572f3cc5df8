//! Error types for the misgen core library.
//!
//! Defines error enums exposed by the public API and a convenient result alias.

use std::{fmt, io};

use thiserror::Error;

use crate::instance::VertexId;

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            #[must_use]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// An error produced while building, reading or writing an [`crate::Instance`].
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum InstanceError {
    /// Reading or writing the instance stream failed.
    #[error("instance i/o failed: {source}")]
    Io {
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// The instance stream did not contain a vertex-count header.
    #[error("instance input is missing the vertex count header")]
    MissingHeader,
    /// A line could not be parsed as a header or an edge.
    #[error("line {line} is malformed: `{content}`")]
    MalformedLine {
        /// One-based line number of the offending line.
        line: usize,
        /// Raw contents of the offending line.
        content: String,
    },
    /// An edge referenced a vertex outside the instance.
    #[error("vertex {vertex} is out of range for an instance with {vertex_count} vertices")]
    VertexOutOfRange {
        /// The offending vertex identifier.
        vertex: u64,
        /// Number of vertices declared by the instance.
        vertex_count: usize,
    },
    /// An instance file declared more vertices than a reader accepts.
    #[error("instance declares {declared} vertices but at most {max} can be read")]
    VertexCountTooLarge {
        /// Vertex count taken from the header.
        declared: usize,
        /// Largest accepted vertex count.
        max: usize,
    },
    /// The vertex table could not be allocated.
    #[error("failed to allocate storage for {vertices} vertices")]
    AllocationFailed {
        /// Number of vertices requested.
        vertices: usize,
    },
    /// The instance declared more vertices or edges than identifiers can address.
    #[error("instance needs {count} identifiers but at most {max} are addressable", max = VertexId::MAX)]
    TooManyElements {
        /// Number of identifiers requested.
        count: usize,
    },
}

define_error_codes! {
    /// Stable codes describing [`InstanceError`] variants.
    enum InstanceErrorCode for InstanceError {
        /// Reading or writing the instance stream failed.
        Io => Io { .. } => "INSTANCE_IO",
        /// The instance stream did not contain a vertex-count header.
        MissingHeader => MissingHeader => "INSTANCE_MISSING_HEADER",
        /// A line could not be parsed as a header or an edge.
        MalformedLine => MalformedLine { .. } => "INSTANCE_MALFORMED_LINE",
        /// An edge referenced a vertex outside the instance.
        VertexOutOfRange => VertexOutOfRange { .. } => "INSTANCE_VERTEX_OUT_OF_RANGE",
        /// An instance file declared more vertices than a reader accepts.
        VertexCountTooLarge => VertexCountTooLarge { .. } => "INSTANCE_VERTEX_COUNT_TOO_LARGE",
        /// The vertex table could not be allocated.
        AllocationFailed => AllocationFailed { .. } => "INSTANCE_ALLOCATION_FAILED",
        /// The instance declared more elements than identifiers can address.
        TooManyElements => TooManyElements { .. } => "INSTANCE_TOO_MANY_ELEMENTS",
    }
}

impl From<io::Error> for InstanceError {
    fn from(source: io::Error) -> Self {
        Self::Io { source }
    }
}

/// Error type produced when configuring or running a [`crate::GraphSampler`].
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum SamplerError {
    /// Probabilities must be finite and within `[0, 1]`.
    #[error("probability must lie within [0, 1] (got {got})")]
    InvalidProbability {
        /// The invalid probability supplied by the caller.
        got: f64,
    },
    /// The lattice has more cells than can be enumerated.
    #[error("a {x}x{y} lattice has too many cells to sample")]
    LatticeTooLarge {
        /// Lattice width.
        x: u32,
        /// Lattice height.
        y: u32,
    },
    /// The vertex-count range is empty.
    #[error("vertex range is empty: min_n={min_n} exceeds max_n={max_n}")]
    InvalidVertexRange {
        /// Lower bound of the requested range.
        min_n: u32,
        /// Upper bound of the requested range.
        max_n: u32,
    },
    /// Converting the sampled graph into an [`crate::Instance`] failed.
    #[error(transparent)]
    Instance {
        /// Underlying instance error.
        #[from]
        source: InstanceError,
    },
}

define_error_codes! {
    /// Stable codes describing [`SamplerError`] variants.
    enum SamplerErrorCode for SamplerError {
        /// Probabilities must be finite and within `[0, 1]`.
        InvalidProbability => InvalidProbability { .. } => "SAMPLER_INVALID_PROBABILITY",
        /// The lattice has more cells than can be enumerated.
        LatticeTooLarge => LatticeTooLarge { .. } => "SAMPLER_LATTICE_TOO_LARGE",
        /// The vertex-count range is empty.
        InvalidVertexRange => InvalidVertexRange { .. } => "SAMPLER_INVALID_VERTEX_RANGE",
        /// Converting the sampled graph into an instance failed.
        InstanceFailure => Instance { .. } => "SAMPLER_INSTANCE_FAILURE",
    }
}

impl SamplerError {
    /// Retrieve the inner [`InstanceErrorCode`] when the error originated in instance conversion.
    #[must_use]
    pub const fn instance_code(&self) -> Option<InstanceErrorCode> {
        match self {
            Self::Instance { source } => Some(source.code()),
            _ => None,
        }
    }
}

/// Validates that `value` is a usable probability.
pub(crate) fn check_probability(value: f64) -> Result<f64> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(SamplerError::InvalidProbability { got: value })
    }
}

/// Convenient alias for results returned by the sampling API.
pub type Result<T> = core::result::Result<T, SamplerError>;

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    #[case(0.0)]
    #[case(0.5)]
    #[case(1.0)]
    fn check_probability_accepts_unit_interval(#[case] value: f64) {
        let accepted = check_probability(value).expect("probability must be accepted");
        assert_eq!(accepted, value);
    }

    #[rstest]
    #[case(-0.1)]
    #[case(1.000_001)]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    fn check_probability_rejects_out_of_range(#[case] value: f64) {
        let err = check_probability(value).expect_err("probability must be rejected");
        assert_eq!(err.code(), SamplerErrorCode::InvalidProbability);
    }

    #[test]
    fn instance_code_is_forwarded() {
        let err = SamplerError::from(InstanceError::MissingHeader);
        assert_eq!(err.code().as_str(), "SAMPLER_INSTANCE_FAILURE");
        assert_eq!(err.instance_code(), Some(InstanceErrorCode::MissingHeader));
        assert_eq!(
            SamplerError::InvalidVertexRange { min_n: 3, max_n: 1 }.instance_code(),
            None
        );
    }
}
