//! Codec configuration.
//!
//! Decoders receive an [`EncodingConfig`] explicitly when they are built. A
//! decoder without one reports that it is not configured instead of reaching
//! for process-wide state.

use std::sync::Arc;

use crate::registry::CodecRegistry;

/// Shared, read-only codec configuration.
#[derive(Debug, Clone)]
pub struct EncodingConfig {
    registry: Arc<CodecRegistry>,
}

impl EncodingConfig {
    /// Creates a configuration around a fully populated registry.
    #[must_use]
    pub fn new(registry: CodecRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }

    /// Configuration with the built-in bank and staking messages.
    #[must_use]
    pub fn standard() -> Self {
        Self::new(CodecRegistry::with_standard_msgs())
    }

    /// The message registry used by both the Amino and protobuf codecs.
    #[must_use]
    pub fn registry(&self) -> &CodecRegistry {
        &self.registry
    }
}
