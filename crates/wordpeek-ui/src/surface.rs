use wordpeek_types::{Point, Size};

use crate::element::Element;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AudioId(pub u64);

/// Host the popup is drawn on
pub trait Surface: Send + Sync {
    /// `false` once the host context is gone; nothing else may be called then
    fn is_available(&self) -> bool {
        true
    }

    /// Visible area
    fn viewport(&self) -> Size;

    /// Attach `root` at `at`
    fn mount(&self, root: &Element, at: Point) -> NodeId;

    /// Replace the content of a mounted node
    fn update(&self, node: NodeId, root: &Element);

    fn move_to(&self, node: NodeId, at: Point);

    /// Rendered size, `None` if the host can't measure
    fn measure(&self, node: NodeId) -> Option<Size>;

    fn unmount(&self, node: NodeId);

    fn load_audio(&self, url: &str) -> Option<AudioId>;

    fn play_audio(&self, audio: AudioId);

    fn release_audio(&self, audio: AudioId);
}
