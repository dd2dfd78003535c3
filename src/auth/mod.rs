pub mod extractor;
pub mod jwt;

/// Capabilities a principal can carry in its token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    AccessAdmin,
}

impl Capability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::AccessAdmin => "access_admin",
        }
    }
}
