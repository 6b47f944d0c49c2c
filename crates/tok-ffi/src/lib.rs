mod error;
mod types;

pub use error::*;
pub use types::*;

use std::ffi::CString;
use std::os::raw::c_char;
use std::panic::AssertUnwindSafe;

use tok_sampler::{Sampler, SamplerConfig};

/// Opaque sampler handle owned by the C caller.
///
/// A handle is not safe to use from two threads at once; create one per
/// generation stream.
pub struct TokSampler {
    inner: Box<dyn Sampler>,
}

/// Execute a closure that returns a `TokStatus`, catching any panics
/// and converting them into `TokStatus::ErrorInternal`.
fn catch_panic<F: FnOnce() -> TokStatus>(f: F) -> TokStatus {
    match std::panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(status) => status,
        Err(_) => {
            set_last_error("internal panic".to_string());
            TokStatus::ErrorInternal
        }
    }
}

/// Validate `params` and create a sampler.
///
/// On success, writes a heap-allocated `TokSampler` pointer into `*out`
/// and returns `TokStatus::Ok`. The caller must later call
/// `tok_sampler_destroy` to free it.
#[no_mangle]
pub unsafe extern "C" fn tok_sampler_create(
    params: TokSamplerParams,
    out: *mut *mut TokSampler,
) -> TokStatus {
    catch_panic(|| {
        if out.is_null() {
            set_last_error("out is null".to_string());
            return TokStatus::ErrorInvalidArgument;
        }

        let inner = match SamplerConfig::from(params).build() {
            Ok(s) => s,
            Err(e) => return report(e),
        };

        let handle = Box::new(TokSampler { inner });
        unsafe {
            *out = Box::into_raw(handle);
        }
        TokStatus::Ok
    })
}

/// Destroy a sampler previously created by `tok_sampler_create`.
///
/// Passing a null pointer is a no-op and returns `TokStatus::Ok`.
#[no_mangle]
pub unsafe extern "C" fn tok_sampler_destroy(sampler: *mut TokSampler) -> TokStatus {
    if sampler.is_null() {
        return TokStatus::Ok;
    }
    drop(Box::from_raw(sampler));
    TokStatus::Ok
}

/// Pick the next token from `n_logits` logits.
///
/// `logits` must point to `n_logits` floats indexed by token id. On success
/// the selected id is written to `*token_out`.
#[no_mangle]
pub unsafe extern "C" fn tok_sampler_sample(
    sampler: *mut TokSampler,
    logits: *const f32,
    n_logits: usize,
    token_out: *mut u32,
) -> TokStatus {
    catch_panic(|| {
        if sampler.is_null() || token_out.is_null() || (logits.is_null() && n_logits > 0) {
            set_last_error("null argument".to_string());
            return TokStatus::ErrorInvalidArgument;
        }
        let sampler = unsafe { &mut *sampler };
        let logits: &[f32] = if n_logits == 0 {
            &[]
        } else {
            unsafe { std::slice::from_raw_parts(logits, n_logits) }
        };

        match sampler.inner.sample(logits) {
            Ok(token) => {
                unsafe { *token_out = token };
                TokStatus::Ok
            }
            Err(e) => report(e),
        }
    })
}

/// Report whether a sampler is greedy or weighted.
#[no_mangle]
pub unsafe extern "C" fn tok_sampler_kind(
    sampler: *const TokSampler,
    kind_out: *mut TokSamplerKind,
) -> TokStatus {
    if sampler.is_null() || kind_out.is_null() {
        set_last_error("null argument".to_string());
        return TokStatus::ErrorInvalidArgument;
    }
    *kind_out = (*sampler).inner.kind().into();
    TokStatus::Ok
}

/// Retrieve the last error message.
///
/// Returns a pointer to a C string describing the most recent error on this
/// thread, or null if no error has occurred. The caller must free the
/// returned string with `tok_free_string`.
#[no_mangle]
pub extern "C" fn tok_last_error() -> *mut c_char {
    match error::take_last_error() {
        Some(e) => e.into_raw(),
        None => std::ptr::null_mut(),
    }
}

/// Free a string previously returned by `tok_last_error`.
#[no_mangle]
pub unsafe extern "C" fn tok_free_string(s: *mut c_char) {
    if !s.is_null() {
        drop(CString::from_raw(s));
    }
}
