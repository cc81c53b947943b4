//! Short code generation

use crate::utils::{SHORT_CODE_LENGTH, generate_random_code};

/// Produces candidate short codes.
///
/// Implementations never look at storage; uniqueness is settled by the
/// caller's existence check and the store's unique constraint.
pub trait CodeGenerator: Send + Sync + 'static {
    fn generate(&self) -> String;
}

/// 8 letters drawn uniformly from `a-zA-Z`
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomCodeGenerator;

impl CodeGenerator for RandomCodeGenerator {
    fn generate(&self) -> String {
        generate_random_code(SHORT_CODE_LENGTH)
    }
}
