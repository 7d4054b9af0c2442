//! Error types for axis-controller.
//!
//! Every error is handled locally and surfaced to the host as a single
//! `ERROR <reason>` line. The `Display` impls produce that reason text.

use core::fmt;

/// Result type alias using the library's Error type.
pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for all axis-controller operations.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Configuration parsing or validation error
    Config(ConfigError),
    /// Protocol line could not be turned into a command
    Command(CommandError),
    /// Motion request rejected or aborted
    Motion(MotionError),
    /// Pin, timer or pulse peripheral failure
    Hardware(HardwareError),
}

/// Broad classification used by the host-facing protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Unknown command letter, unknown sub-command or unusable line.
    MalformedCommand,
    /// Numeric argument outside the command's valid domain.
    OutOfRange,
    /// Reverse move attempted while the home/limit sensor is asserted.
    BlockedMotion,
    /// Closed-loop correction could not bring the axis within tolerance.
    ExcessivePositionError,
    /// Configuration problem.
    Config,
    /// Peripheral failure.
    Hardware,
}

/// Configuration-related errors.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Failed to parse TOML configuration
    ParseError(heapless::String<128>),
    /// A ratio or rate that must be strictly positive was not
    NotPositive {
        /// Offending field name
        field: &'static str,
        /// Offending value
        value: f32,
    },
    /// A `[min, max]` range with `min >= max`
    InvalidRange {
        /// Range name
        field: &'static str,
        /// Configured minimum
        min: f32,
        /// Configured maximum
        max: f32,
    },
    /// A fraction that must lie in `(0, 1]` did not
    InvalidFraction {
        /// Offending field name
        field: &'static str,
        /// Offending value
        value: f32,
    },
    /// Position tolerance must be smaller than the maximum allowed error
    ToleranceExceedsMaxError {
        /// Configured tolerance
        tolerance: f32,
        /// Configured maximum error
        max_error: f32,
    },
    /// File I/O error (std only)
    #[cfg(feature = "std")]
    IoError(heapless::String<128>),
}

/// Command parsing and validation errors.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandError {
    /// First character does not select any command
    UnknownCommand,
    /// Axis command family with an unknown sub-command letter
    UnknownSubcommand {
        /// Motor number of the family (1, 2, ...)
        axis: u8,
    },
    /// Inbound line exceeded the receive buffer
    LineTooLong,
    /// Inbound line was not valid ASCII/UTF-8
    InvalidEncoding,
    /// Spindle speed outside the configured range
    RpmOutOfRange {
        /// Requested speed
        rpm: i32,
        /// Minimum accepted speed
        min: u16,
        /// Maximum accepted speed
        max: u16,
    },
    /// Feed velocity outside the configured range
    FeedVelocityOutOfRange {
        /// Requested velocity in mm/s
        velocity: f32,
        /// Minimum accepted velocity
        min: f32,
        /// Maximum accepted velocity
        max: f32,
    },
    /// Positioning velocity must be strictly positive
    VelocityNotPositive(f32),
}

/// Motion request and closed-loop errors.
#[derive(Debug, Clone, PartialEq)]
pub enum MotionError {
    /// Reverse move refused because the home sensor is asserted
    HomeActive {
        /// Motor number
        axis: u8,
    },
    /// Encoder-measured error exceeded the maximum allowed error
    PositionErrorTooLarge {
        /// Measured error (target - actual)
        error: f32,
        /// Commanded target position
        target: f32,
        /// Encoder position
        actual: f32,
    },
    /// Correction rounds exhausted without reaching tolerance
    CorrectionLimit {
        /// Rounds performed
        rounds: u8,
        /// Remaining error
        error: f32,
    },
}

/// Peripheral errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HardwareError {
    /// GPIO pin operation failed
    Pin,
    /// Tick timer could not be reprogrammed
    Timer,
    /// Pulse generator could not be reprogrammed
    PulseOutput,
}

impl Error {
    /// Classify the error for protocol handling.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Config(_) => ErrorKind::Config,
            Error::Command(e) => match e {
                CommandError::RpmOutOfRange { .. }
                | CommandError::FeedVelocityOutOfRange { .. }
                | CommandError::VelocityNotPositive(_) => ErrorKind::OutOfRange,
                _ => ErrorKind::MalformedCommand,
            },
            Error::Motion(MotionError::HomeActive { .. }) => ErrorKind::BlockedMotion,
            Error::Motion(_) => ErrorKind::ExcessivePositionError,
            Error::Hardware(_) => ErrorKind::Hardware,
        }
    }

    /// Whether this error is a mechanical-fault alarm that stopped the axis.
    pub fn is_alarm(&self) -> bool {
        self.kind() == ErrorKind::ExcessivePositionError
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(e) => write!(f, "Configuration error: {}", e),
            Error::Command(e) => write!(f, "{}", e),
            Error::Motion(e) => write!(f, "{}", e),
            Error::Hardware(e) => write!(f, "{}", e),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            ConfigError::NotPositive { field, value } => {
                write!(f, "{} must be > 0, got {}", field, value)
            }
            ConfigError::InvalidRange { field, min, max } => {
                write!(f, "Invalid {} range: min ({}) must be < max ({})", field, min, max)
            }
            ConfigError::InvalidFraction { field, value } => {
                write!(f, "{} must be in (0, 1], got {}", field, value)
            }
            ConfigError::ToleranceExceedsMaxError { tolerance, max_error } => write!(
                f,
                "Position tolerance {} must be < max position error {}",
                tolerance, max_error
            ),
            #[cfg(feature = "std")]
            ConfigError::IoError(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::UnknownCommand => write!(f, "Unknown command"),
            CommandError::UnknownSubcommand { axis } => write!(f, "M{} unknown subcommand", axis),
            CommandError::LineTooLong => write!(f, "Line too long"),
            CommandError::InvalidEncoding => write!(f, "Invalid line encoding"),
            CommandError::RpmOutOfRange { rpm, min, max } => {
                write!(f, "M1 RPM out of range ({}-{}): {}", min, max, rpm)
            }
            CommandError::FeedVelocityOutOfRange { velocity, min, max } => write!(
                f,
                "M2 velocity out of range ({}-{} mm/s): {:.1}",
                min, max, velocity
            ),
            CommandError::VelocityNotPositive(v) => write!(f, "Velocity must be > 0: {:.3}", v),
        }
    }
}

impl fmt::Display for MotionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MotionError::HomeActive { axis } => write!(f, "M{}_HOME_ACTIVE", axis),
            MotionError::PositionErrorTooLarge { error, target, actual } => write!(
                f,
                "Position error too large: {:.3} in (target: {:.3}, actual: {:.3})",
                error, target, actual
            ),
            MotionError::CorrectionLimit { rounds, error } => write!(
                f,
                "Correction did not converge after {} rounds: {:.4} in",
                rounds, error
            ),
        }
    }
}

impl fmt::Display for HardwareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HardwareError::Pin => write!(f, "GPIO pin operation failed"),
            HardwareError::Timer => write!(f, "Tick timer operation failed"),
            HardwareError::PulseOutput => write!(f, "Pulse output operation failed"),
        }
    }
}

// Conversion impls
impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl From<CommandError> for Error {
    fn from(e: CommandError) -> Self {
        Error::Command(e)
    }
}

impl From<MotionError> for Error {
    fn from(e: MotionError) -> Self {
        Error::Motion(e)
    }
}

impl From<HardwareError> for Error {
    fn from(e: HardwareError) -> Self {
        Error::Hardware(e)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

#[cfg(feature = "std")]
impl std::error::Error for CommandError {}

#[cfg(feature = "std")]
impl std::error::Error for MotionError {}

#[cfg(feature = "std")]
impl std::error::Error for HardwareError {}
