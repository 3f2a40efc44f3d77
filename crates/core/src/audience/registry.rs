use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::comment::{Biz, CommentError};

use super::OwnerLookup;

/// Owner lookups keyed by business type, fixed at construction.
///
/// A business type without a registered lookup is rejected with
/// [`CommentError::InvalidBiz`]; there is no fallback handler.
#[derive(Clone, Default)]
pub struct OwnerRegistry {
    lookups: HashMap<Biz, Arc<dyn OwnerLookup>>,
}

impl OwnerRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the lookup for a business type, replacing any previous one.
    pub fn with(mut self, biz: Biz, lookup: Arc<dyn OwnerLookup>) -> Self {
        self.lookups.insert(biz, lookup);
        self
    }

    /// Returns the lookup for a business type.
    pub fn get(&self, biz: Biz) -> Result<&dyn OwnerLookup, CommentError> {
        self.lookups
            .get(&biz)
            .map(|lookup| lookup.as_ref())
            .ok_or(CommentError::InvalidBiz(biz))
    }

    /// Registered business types, in code order.
    pub fn registered(&self) -> Vec<Biz> {
        let mut bizs: Vec<Biz> = self.lookups.keys().copied().collect();
        bizs.sort();
        bizs
    }
}

impl fmt::Debug for OwnerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OwnerRegistry")
            .field("registered", &self.registered())
            .finish()
    }
}
