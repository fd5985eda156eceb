use thiserror::Error;

macro_rules! config_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Configuration {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Configuration {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// Pattern matching and wildcard equality never produce errors: the absence of a match is a
/// normal `false`/`None` outcome. Errors are only raised by the layers that *require* a match
/// (hook application and class dispatch) and by hook registration, which validates hooks before
/// any class is transformed.
///
/// # Error Categories
///
/// ## Registration Errors
/// - [`Error::Configuration`] - A hook refers to a member the owning type does not declare, or is
///   otherwise malformed
/// - [`Error::EmptyPattern`] - A search pattern without instructions
/// - [`Error::OperandMismatch`] - An instruction carries an operand that does not fit its opcode
/// - [`Error::UnknownOpcode`] - An opcode outside the JVM instruction set
/// - [`Error::RegistrationClosed`] - A hook was registered after dispatch began
///
/// ## Label Errors
/// - [`Error::DuplicateLabel`] - The same label anchor occurs twice in one method body
/// - [`Error::UndefinedLabel`] - A jump refers to a label that has no anchor
///
/// ## Dispatch Errors
/// - [`Error::TargetNotFound`] - The hooked method does not exist in the class
/// - [`Error::PatternNotFound`] - A required pattern did not match
/// - [`Error::HookFailed`] - Aggregated failure of one dispatch pass
///
/// # Examples
///
/// ```rust,no_run
/// use bytehook::{Error, pattern::Pattern};
///
/// match Pattern::new(Vec::new()) {
///     Ok(_) => println!("pattern accepted"),
///     Err(Error::EmptyPattern) => eprintln!("patterns need at least one instruction"),
///     Err(e) => eprintln!("Other error: {}", e),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// A hook definition is invalid.
    ///
    /// Raised at registration time, before any class is transformed. The most common cause is a
    /// symbol mapping whose member is not declared by its owning type under either name variant.
    /// The error includes the source location where the problem was detected.
    ///
    /// # Fields
    ///
    /// * `message` - Detailed description of the configuration problem
    /// * `file` - Source file where the error was detected
    /// * `line` - Source line where the error was detected
    #[error("Configuration - {file}:{line}: {message}")]
    Configuration {
        /// The message to be printed for the Configuration error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// A pattern was built from an empty instruction list.
    #[error("A pattern must contain at least one instruction")]
    EmptyPattern,

    /// An instruction's operand does not fit its opcode.
    ///
    /// For example `aload` carrying a field reference instead of a local slot.
    #[error("Operand mismatch for '{mnemonic}': expected {expected}, found {found}")]
    OperandMismatch {
        /// Mnemonic of the offending instruction
        mnemonic: &'static str,
        /// The operand kind the opcode requires
        expected: String,
        /// The operand kind that was supplied
        found: String,
    },

    /// The opcode is not part of the JVM instruction set.
    #[error("Unknown opcode - 0x{0:02X}")]
    UnknownOpcode(u8),

    /// A label anchor was placed twice in the same method body.
    #[error("Duplicate label - {0}")]
    DuplicateLabel(String),

    /// A jump refers to a label that was never anchored.
    #[error("Undefined label - {0}")]
    UndefinedLabel(String),

    /// Hooks can only be registered before the first class is transformed.
    #[error("Hook registration is closed, dispatch has already begun")]
    RegistrationClosed,

    /// The hooked method was not found in the class being transformed.
    #[error("Hook '{hook}': no method {name}{descriptor} in {class}")]
    TargetNotFound {
        /// Name of the hook
        hook: String,
        /// Class that was searched
        class: String,
        /// Resolved physical method name
        name: String,
        /// Method descriptor
        descriptor: String,
    },

    /// A seek or replace operation found no match for its pattern.
    ///
    /// Edits performed by earlier operations of the same hook may already have been applied.
    #[error("Hook '{hook}': pattern not found by operation #{op_index} ({pattern})")]
    PatternNotFound {
        /// Name of the hook
        hook: String,
        /// Index of the failing operation within the hook
        op_index: usize,
        /// Rendered pattern that failed to match
        pattern: String,
    },

    /// One or more hooks failed while transforming a class.
    ///
    /// Each failure is a [`Error::TargetNotFound`], [`Error::PatternNotFound`],
    /// [`Error::DuplicateLabel`] or [`Error::UndefinedLabel`].
    #[error("{} hook(s) failed while transforming {class}: {}", .failures.len(), join(.failures))]
    HookFailed {
        /// Class that was transformed
        class: String,
        /// The error of each failed hook, in dispatch order
        failures: Vec<Error>,
    },
}

fn join(errors: &[Error]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
