//! Error queue checking around every device call.
//!
//! Synchronous GL errors are only observable through `glGetError`, and a flag
//! raised by one call stays in the queue until somebody reads it. Every call is
//! therefore wrapped: the queue is drained first, the call runs, and whatever
//! is in the queue afterwards belongs to that call.

use std::cell::Cell;
use std::fmt;
use std::panic::Location;

use gl::types::GLenum;
use thiserror::Error;

/// What happens when a wrapped call leaves an error in the queue.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Panic with the call site, like a debugger break.
    Panic,
    /// Log the error and carry on.
    Log,
    /// Hand the error back to the caller.
    Return,
}

impl Default for ErrorPolicy {
    fn default() -> Self {
        if cfg!(debug_assertions) {
            ErrorPolicy::Panic
        } else {
            ErrorPolicy::Log
        }
    }
}

thread_local! {
    // GL contexts are current on one thread, so the policy lives there too.
    static POLICY: Cell<ErrorPolicy> = Cell::new(ErrorPolicy::default());
}

pub fn set_error_policy(policy: ErrorPolicy) {
    POLICY.with(|p| p.set(policy));
}

pub fn error_policy() -> ErrorPolicy {
    POLICY.with(|p| p.get())
}

#[derive(Debug, Error)]
pub enum GlError {
    #[error("{code} in {call} at {file}:{line}")]
    Call {
        code: ErrorCode,
        call: &'static str,
        file: &'static str,
        line: u32,
    },
}

impl GlError {
    pub fn code(&self) -> ErrorCode {
        match self {
            GlError::Call { code, .. } => *code,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ErrorCode(pub GLenum);

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self.0 {
            gl::INVALID_ENUM => "GL_INVALID_ENUM",
            gl::INVALID_VALUE => "GL_INVALID_VALUE",
            gl::INVALID_OPERATION => "GL_INVALID_OPERATION",
            gl::INVALID_FRAMEBUFFER_OPERATION => "GL_INVALID_FRAMEBUFFER_OPERATION",
            gl::OUT_OF_MEMORY => "GL_OUT_OF_MEMORY",
            gl::STACK_UNDERFLOW => "GL_STACK_UNDERFLOW",
            gl::STACK_OVERFLOW => "GL_STACK_OVERFLOW",
            other => return write!(f, "GL error {:#06x}", other),
        };

        write!(f, "{} ({:#06x})", name, self.0)
    }
}

/// Runs a device call between a queue drain and a queue check.
///
/// `call` is the textual form used in reports. The reported file and line
/// are the caller's.
#[track_caller]
pub fn checked<T>(call: &'static str, f: impl FnOnce() -> T) -> Result<T, GlError> {
    let location = Location::caller();

    drain(device_error);
    let value = f();
    check(call, location, error_policy(), device_error)?;

    Ok(value)
}

fn device_error() -> GLenum {
    unsafe { gl::GetError() }
}

/// Reads the queue until it reports `GL_NO_ERROR`. Returns how many flags
/// were discarded.
pub fn drain(mut next: impl FnMut() -> GLenum) -> usize {
    let mut discarded = 0;

    while next() != gl::NO_ERROR {
        discarded += 1;
    }

    discarded
}

/// Inspects the queue after a call and applies `policy` to the first error.
///
/// The remaining flags are drained so they are not blamed on the next call.
pub fn check(
    call: &'static str,
    location: &'static Location<'static>,
    policy: ErrorPolicy,
    mut next: impl FnMut() -> GLenum,
) -> Result<(), GlError> {
    let first = next();
    if first == gl::NO_ERROR {
        return Ok(());
    }

    let extra = drain(next);

    let err = GlError::Call {
        code: ErrorCode(first),
        call,
        file: location.file(),
        line: location.line(),
    };

    match policy {
        ErrorPolicy::Panic => panic!("{err}"),
        ErrorPolicy::Log => {
            log::error!("{err}");
            if extra > 0 {
                log::error!("{extra} more error flag(s) raised by {call}");
            }
            Ok(())
        }
        ErrorPolicy::Return => Err(err),
    }
}
