pub mod guard;

pub use guard::{check_permission, requires_auth};
