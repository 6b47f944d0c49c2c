use std::cell::RefCell;
use std::ffi::CString;

use tok_sampler::SamplerError;

use crate::types::TokStatus;

thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

/// Store an error message for later retrieval via `tok_last_error`.
pub fn set_last_error(msg: String) {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = CString::new(msg).ok();
    });
}

/// Take the last error message, leaving `None` in its place.
pub fn take_last_error() -> Option<CString> {
    LAST_ERROR.with(|e| e.borrow_mut().take())
}

/// Record `err` as the last error and map it to a status code.
pub fn report(err: SamplerError) -> TokStatus {
    let status = match err {
        SamplerError::InvalidParameter { .. } => TokStatus::ErrorInvalidParameter,
        SamplerError::InvalidConfiguration(_) => TokStatus::ErrorInvalidConfiguration,
        SamplerError::NoValidToken(_) => TokStatus::ErrorNoValidToken,
        SamplerError::SamplingFailure(_) => TokStatus::ErrorSamplingFailure,
    };
    set_last_error(err.to_string());
    status
}
