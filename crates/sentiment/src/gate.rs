use lens_core::{Analytics, UserRole};

/// Analytics are visible only when a payload is present and the caller is an
/// Admin. Evaluated before anything in the payload is read.
pub fn can_view(role: Option<UserRole>, payload: Option<&Analytics>) -> bool {
    payload.is_some() && role.is_some_and(|r| r.is_admin())
}
