//! One-time code generation

use rand::{rngs::OsRng, Rng};

/// Produces fixed-width decimal codes
pub trait CodeGenerator: Send + Sync {
    /// Return a code of exactly `length` ASCII digits
    fn generate(&self, length: usize) -> String;
}

/// Uniform codes from the operating system CSPRNG
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomCodeGenerator;

impl CodeGenerator for RandomCodeGenerator {
    fn generate(&self, length: usize) -> String {
        (0..length)
            .map(|_| char::from(b'0' + OsRng.gen_range(0..10u8)))
            .collect()
    }
}

/// Always returns the same code
#[derive(Debug, Clone)]
pub struct FixedCodeGenerator {
    code: String,
}

impl FixedCodeGenerator {
    pub fn new(code: impl Into<String>) -> Self {
        Self { code: code.into() }
    }
}

impl CodeGenerator for FixedCodeGenerator {
    fn generate(&self, _length: usize) -> String {
        self.code.clone()
    }
}
