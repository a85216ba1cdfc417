use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use hashbrown::HashMap;

use crate::event::NativeId;
use crate::scene::SceneShared;

/// Native window identity to scene mapping. Lives on the dispatcher
/// thread; only its size is shared, for `Display::open_windows`.
pub(crate) struct Registry {
    scenes: HashMap<NativeId, Arc<SceneShared>>,
    published: Arc<AtomicUsize>,
}

impl Registry {
    pub(crate) fn new(published: Arc<AtomicUsize>) -> Self {
        Self {
            scenes: HashMap::new(),
            published,
        }
    }

    pub(crate) fn insert(&mut self, id: NativeId, scene: Arc<SceneShared>) {
        self.scenes.insert(id, scene);
        self.publish();
    }

    pub(crate) fn get(&self, id: NativeId) -> Option<Arc<SceneShared>> {
        self.scenes.get(&id).cloned()
    }

    pub(crate) fn contains(&self, id: NativeId) -> bool {
        self.scenes.contains_key(&id)
    }

    pub(crate) fn remove(&mut self, id: NativeId) -> Option<Arc<SceneShared>> {
        let removed = self.scenes.remove(&id);
        self.publish();
        removed
    }

    pub(crate) fn ids(&self) -> Vec<NativeId> {
        self.scenes.keys().copied().collect()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    fn publish(&self) {
        self.published.store(self.scenes.len(), Ordering::SeqCst);
    }
}
