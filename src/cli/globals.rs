use secrecy::SecretString;

/// Process-wide settings that handlers need besides the database pool: the
/// token signing secret and the privileged value handed to admins.
#[derive(Clone)]
pub struct GlobalArgs {
    pub secret: SecretString,
    pub flag: String,
}

impl GlobalArgs {
    #[must_use]
    pub fn new(secret: SecretString, flag: String) -> Self {
        Self { secret, flag }
    }
}

impl std::fmt::Debug for GlobalArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlobalArgs")
            .field("secret", &"***")
            .field("flag", &self.flag)
            .finish()
    }
}
