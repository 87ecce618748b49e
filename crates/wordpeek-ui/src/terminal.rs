use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

use wordpeek_types::{Point, Size};

use crate::element::Element;
use crate::surface::{AudioId, NodeId, Surface};
use crate::view::ERROR_CLASS;

/// Surface that prints the popup to stdout, used by the CLI
pub struct TerminalSurface {
    viewport: Size,
    next_id: AtomicU64,
    nodes: Mutex<HashMap<NodeId, (Element, Point)>>,
    audio: Mutex<HashMap<AudioId, String>>,
}

impl TerminalSurface {
    pub fn new(viewport: Size) -> Self {
        Self {
            viewport,
            next_id: AtomicU64::new(1),
            nodes: Mutex::new(HashMap::new()),
            audio: Mutex::new(HashMap::new()),
        }
    }

    fn nodes(&self) -> MutexGuard<'_, HashMap<NodeId, (Element, Point)>> {
        self.nodes.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn audio(&self) -> MutexGuard<'_, HashMap<AudioId, String>> {
        self.audio.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn draw(&self, node: NodeId) {
        if let Some((tree, at)) = self.nodes().get(&node)
            && at.x >= 0.0
        {
            println!("{}", render(tree, *at));
        }
    }
}

/// Text rendition of a popup tree
pub fn render(tree: &Element, at: Point) -> String {
    let title = tree
        .find("wordpeek-title")
        .map(|t| t.text.as_str())
        .unwrap_or_default();

    let mut lines = vec![format!("┌─ {title} ─ [×]   @ ({:.0}, {:.0})", at.x, at.y)];

    if let Some(body) = tree.find("wordpeek-body") {
        for row in &body.children {
            let text = row.text_content();
            if text.is_empty() {
                continue;
            }
            let marker = if row.has_class(ERROR_CLASS) { "! " } else { "" };
            lines.push(format!("│ {marker}{text}"));
        }
    }

    lines.push("└─".to_string());
    lines.join("\n")
}

impl Surface for TerminalSurface {
    fn viewport(&self) -> Size {
        self.viewport
    }

    fn mount(&self, root: &Element, at: Point) -> NodeId {
        let id = NodeId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.nodes().insert(id, (root.clone(), at));
        self.draw(id);
        id
    }

    fn update(&self, node: NodeId, root: &Element) {
        if let Some(entry) = self.nodes().get_mut(&node) {
            entry.0 = root.clone();
        }
        self.draw(node);
    }

    fn move_to(&self, node: NodeId, at: Point) {
        if let Some(entry) = self.nodes().get_mut(&node) {
            entry.1 = at;
        }
        self.draw(node);
    }

    fn measure(&self, _node: NodeId) -> Option<Size> {
        None
    }

    fn unmount(&self, node: NodeId) {
        if self.nodes().remove(&node).is_some() {
            println!("(popup closed)");
        }
    }

    fn load_audio(&self, url: &str) -> Option<AudioId> {
        let id = AudioId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.audio().insert(id, url.to_string());
        Some(id)
    }

    fn play_audio(&self, audio: AudioId) {
        if let Some(url) = self.audio().get(&audio) {
            println!("🔊 {url}");
        }
    }

    fn release_audio(&self, audio: AudioId) {
        self.audio().remove(&audio);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_skips_empty_rows_and_marks_errors() {
        let mut def = Element::new("div", "wordpeek-def").with_text("Word not found");
        def.add_class(ERROR_CLASS);

        let tree = Element::new("div", "wordpeek-popup")
            .child(
                Element::new("div", "wordpeek-header")
                    .child(Element::new("span", "wordpeek-title").with_text("WordPeek")),
            )
            .child(
                Element::new("div", "wordpeek-body")
                    .child(Element::new("div", "wordpeek-word").with_text("zzyzx"))
                    .child(Element::new("div", "wordpeek-pos"))
                    .child(def),
            );

        let text = render(&tree, Point::new(115.0, 65.0));
        assert_eq!(
            text,
            "┌─ WordPeek ─ [×]   @ (115, 65)\n│ zzyzx\n│ ! Word not found\n└─"
        );
    }
}
