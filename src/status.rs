// Keygate: Status codes
//
// Every gateway outcome collapses to one of these codes. The numeric values
// are the Security framework `OSStatus` codes that the native keychain API
// reports, so a code read from a log means the same thing on every platform.

use std::borrow::Cow;
use std::fmt;

/// Outcome of a gateway operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum Status {
    Success = 0,
    /// The platform has no facility for the requested operation.
    Unimplemented = -4,
    /// Empty or malformed service/key, or an invalid configuration value.
    InvalidParameter = -50,
    /// The user dismissed the authentication challenge.
    UserCancelled = -128,
    /// Anything the other codes do not describe.
    InternalComponent = -2070,
    /// The credential store could not be reached.
    NotAvailable = -25291,
    /// The store or the user refused access.
    AccessDenied = -25293,
    ItemNotFound = -25300,
    /// A stored value exists but could not be decoded.
    Decode = -26275,
}

impl Status {
    /// All codes the gateway can produce.
    pub const ALL: [Status; 9] = [
        Status::Success,
        Status::Unimplemented,
        Status::InvalidParameter,
        Status::UserCancelled,
        Status::InternalComponent,
        Status::NotAvailable,
        Status::AccessDenied,
        Status::ItemNotFound,
        Status::Decode,
    ];

    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn from_code(code: i32) -> Option<Self> {
        Self::ALL.iter().copied().find(|s| s.code() == code)
    }

    pub fn is_success(self) -> bool {
        self == Status::Success
    }

    /// Stable human-readable description.
    pub fn message(self) -> &'static str {
        match self {
            Status::Success => "no error",
            Status::Unimplemented => "the operation is not supported on this platform",
            Status::InvalidParameter => "one or more parameters passed to the function were not valid",
            Status::UserCancelled => "the user cancelled the operation",
            Status::InternalComponent => "an internal component failed",
            Status::NotAvailable => "no credential store is available",
            Status::AccessDenied => "access denied: authorization or authentication failed",
            Status::ItemNotFound => "the specified item could not be found in the keychain",
            Status::Decode => "unable to decode the provided data",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message(), self.code())
    }
}

/// Describe any integer status. Total: unknown codes get a fallback text
/// instead of an error, so it is safe to call from logging paths.
pub fn describe(code: i32) -> Cow<'static, str> {
    match Status::from_code(code) {
        Some(status) => Cow::Borrowed(status.message()),
        None => Cow::Owned(format!("unknown status ({})", code)),
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
