pub mod admin_access;
pub mod auth_redirect;
