//! Constant-time comparison of signature material.

use subtle::ConstantTimeEq;

/// Compare two byte slices without short-circuiting on the first difference.
///
/// Length is not secret: slices of different length return false immediately.
pub fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}
