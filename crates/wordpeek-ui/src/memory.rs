use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use wordpeek_types::{Point, Size};

use crate::element::Element;
use crate::surface::{AudioId, NodeId, Surface};

#[derive(Debug, Clone, PartialEq)]
pub struct MountedNode {
    pub tree: Element,
    pub at: Point,
}

#[derive(Default)]
struct MemoryState {
    next_id: u64,
    nodes: BTreeMap<NodeId, MountedNode>,
    audio: BTreeMap<AudioId, String>,
    played: Vec<String>,
    mutations: usize,
}

/// In-memory surface that records everything drawn on it
pub struct MemorySurface {
    state: Mutex<MemoryState>,
    available: AtomicBool,
    viewport: Size,
    measured: Option<Size>,
}

impl MemorySurface {
    pub fn new(viewport: Size) -> Self {
        Self {
            state: Mutex::new(MemoryState::default()),
            available: AtomicBool::new(true),
            viewport,
            measured: None,
        }
    }

    /// Make `measure` report `size` for every node
    pub fn with_measured_size(mut self, size: Size) -> Self {
        self.measured = Some(size);
        self
    }

    /// Simulate the host context going away (or coming back)
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    pub fn mounted(&self) -> Vec<MountedNode> {
        self.state().nodes.values().cloned().collect()
    }

    pub fn mounted_count(&self) -> usize {
        self.state().nodes.len()
    }

    /// The only mounted node, `None` if there are zero or several
    pub fn single(&self) -> Option<MountedNode> {
        let state = self.state();
        if state.nodes.len() != 1 {
            return None;
        }
        state.nodes.values().next().cloned()
    }

    pub fn live_audio_count(&self) -> usize {
        self.state().audio.len()
    }

    pub fn played(&self) -> Vec<String> {
        self.state().played.clone()
    }

    /// Number of mount/update/move/unmount calls so far
    pub fn mutation_count(&self) -> usize {
        self.state().mutations
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Surface for MemorySurface {
    fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    fn viewport(&self) -> Size {
        self.viewport
    }

    fn mount(&self, root: &Element, at: Point) -> NodeId {
        let mut state = self.state();
        state.next_id += 1;
        state.mutations += 1;
        let id = NodeId(state.next_id);
        state.nodes.insert(
            id,
            MountedNode {
                tree: root.clone(),
                at,
            },
        );
        id
    }

    fn update(&self, node: NodeId, root: &Element) {
        let mut state = self.state();
        state.mutations += 1;
        if let Some(mounted) = state.nodes.get_mut(&node) {
            mounted.tree = root.clone();
        }
    }

    fn move_to(&self, node: NodeId, at: Point) {
        let mut state = self.state();
        state.mutations += 1;
        if let Some(mounted) = state.nodes.get_mut(&node) {
            mounted.at = at;
        }
    }

    fn measure(&self, _node: NodeId) -> Option<Size> {
        self.measured
    }

    fn unmount(&self, node: NodeId) {
        let mut state = self.state();
        state.mutations += 1;
        state.nodes.remove(&node);
    }

    fn load_audio(&self, url: &str) -> Option<AudioId> {
        let mut state = self.state();
        state.next_id += 1;
        let id = AudioId(state.next_id);
        state.audio.insert(id, url.to_string());
        Some(id)
    }

    fn play_audio(&self, audio: AudioId) {
        let mut state = self.state();
        if let Some(url) = state.audio.get(&audio).cloned() {
            state.played.push(url);
        }
    }

    fn release_audio(&self, audio: AudioId) {
        self.state().audio.remove(&audio);
    }
}
