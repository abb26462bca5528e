//! Entry point that hands out reactive proxies for a connected grid.

use crate::client::{GridInstance, MapKey, MapValue};
use crate::error::GridError;
use crate::rx::atomic_long::RxAtomicLong;
use crate::rx::map::RxMap;
use std::sync::Arc;
use tracing::debug;

const RX_GRID_TAG: &str = "RxGrid:";
const RX_GRID_FN_FROM_INSTANCE_TAG: &str = "from_instance():";

/// Entry point that wraps a connected [`GridInstance`] and hands out reactive
/// proxies.
pub struct RxGrid<G> {
    delegate: Arc<G>,
}

impl<G> Clone for RxGrid<G> {
    fn clone(&self) -> Self {
        Self {
            delegate: self.delegate.clone(),
        }
    }
}

impl<G: GridInstance> RxGrid<G> {
    pub fn from_instance(instance: Arc<G>) -> Self {
        debug!(
            "{RX_GRID_TAG}:{RX_GRID_FN_FROM_INSTANCE_TAG} wrapping instance {}",
            instance.name()
        );
        Self { delegate: instance }
    }

    pub fn delegate(&self) -> &Arc<G> {
        &self.delegate
    }

    pub fn get_atomic_long(&self, name: &str) -> RxAtomicLong<G::AtomicLong> {
        RxAtomicLong::new(self.delegate.get_atomic_long(name))
    }

    pub fn get_map<K: MapKey, V: MapValue>(
        &self,
        name: &str,
    ) -> Result<RxMap<G::Map<K, V>>, GridError> {
        self.delegate.get_map::<K, V>(name).map(RxMap::new)
    }
}
