use std::sync::Arc;

use wordpeek_config::popup::PopupConfig;
use wordpeek_core::{DefinitionEntry, LookupToken};
use wordpeek_types::{Point, Rect, Size};

use crate::element::Element;
use crate::layout::place;
use crate::surface::{AudioId, NodeId, Surface};

pub const POPUP_CLASS: &str = "wordpeek-popup";
pub const PHONETIC_CLASS: &str = "wordpeek-phonetic";
pub const POS_CLASS: &str = "wordpeek-pos";
pub const DEF_CLASS: &str = "wordpeek-def";
pub const EXAMPLE_CLASS: &str = "wordpeek-example";
pub const AUDIO_CLASS: &str = "wordpeek-audio";
pub const ERROR_CLASS: &str = "wordpeek-error";

pub const PHONETIC_PLACEHOLDER: &str = "Loading...";
pub const DEFINITION_PLACEHOLDER: &str = "Fetching definition...";

/// Off-screen spot used to measure before the real position is known
const OFFSCREEN: Point = Point {
    x: -9999.0,
    y: -9999.0,
};

/// One popup on the surface.
///
/// Releases its node and audio when destroyed or dropped, whichever comes
/// first.
pub struct PopupHandle {
    surface: Arc<dyn Surface>,
    tree: Element,
    node: Option<NodeId>,
    audio: Option<AudioId>,
    bounds: Option<Rect>,
    destroyed: bool,
}

impl PopupHandle {
    pub fn tree(&self) -> &Element {
        &self.tree
    }

    pub fn is_attached(&self) -> bool {
        self.node.is_some()
    }

    pub fn bounds(&self) -> Option<Rect> {
        self.bounds
    }

    pub fn has_audio(&self) -> bool {
        self.audio.is_some()
    }

    fn refresh(&self) {
        if let Some(node) = self.node
            && self.surface.is_available()
        {
            self.surface.update(node, &self.tree);
        }
    }

    fn release(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;

        let node = self.node.take();
        let audio = self.audio.take();
        self.bounds = None;

        if !self.surface.is_available() {
            tracing::debug!("surface gone, nothing to release");
            return;
        }
        if let Some(audio) = audio {
            self.surface.release_audio(audio);
        }
        if let Some(node) = node {
            self.surface.unmount(node);
        }
    }
}

impl Drop for PopupHandle {
    fn drop(&mut self) {
        self.release();
    }
}

/// Builds and updates the popup on a [`Surface`]
pub struct PopupView {
    surface: Arc<dyn Surface>,
    config: PopupConfig,
}

impl PopupView {
    pub fn new(surface: Arc<dyn Surface>, config: PopupConfig) -> Self {
        Self { surface, config }
    }

    pub fn is_available(&self) -> bool {
        self.surface.is_available()
    }

    /// Build the loading-state popup for `token`; not attached until [`Self::position`]
    pub fn create(&self, token: &LookupToken) -> PopupHandle {
        let header = Element::new("div", "wordpeek-header")
            .child(Element::new("span", "wordpeek-title").with_text(self.config.title.clone()))
            .child(Element::new("button", "wordpeek-close").with_text("×"));

        let body = Element::new("div", "wordpeek-body")
            .child(Element::new("div", "wordpeek-word").with_text(token.as_str()))
            .child(Element::new("div", PHONETIC_CLASS).with_text(PHONETIC_PLACEHOLDER))
            .child(Element::new("div", POS_CLASS))
            .child(Element::new("div", DEF_CLASS).with_text(DEFINITION_PLACEHOLDER));

        PopupHandle {
            surface: self.surface.clone(),
            tree: Element::new("div", POPUP_CLASS).child(header).child(body),
            node: None,
            audio: None,
            bounds: None,
            destroyed: false,
        }
    }

    /// Attach (if needed) and place the popup next to `anchor`
    pub fn position(&self, handle: &mut PopupHandle, anchor: Point) {
        if handle.destroyed || !self.surface.is_available() {
            return;
        }

        let node = match handle.node {
            Some(node) => node,
            None => {
                let node = self.surface.mount(&handle.tree, OFFSCREEN);
                handle.node = Some(node);
                node
            }
        };

        let size = self.surface.measure(node).unwrap_or(Size::new(
            self.config.default_width,
            self.config.default_height,
        ));
        let at = place(anchor, size, self.surface.viewport(), &self.config);

        self.surface.move_to(node, at);
        handle.bounds = Some(Rect::new(at, size));
    }

    pub fn show_success(&self, handle: &mut PopupHandle, entry: &DefinitionEntry) {
        if handle.destroyed || !self.surface.is_available() {
            return;
        }

        let audio = entry
            .audio_url
            .as_deref()
            .and_then(|url| self.surface.load_audio(url));
        if let Some(previous) = std::mem::replace(&mut handle.audio, audio) {
            self.surface.release_audio(previous);
        }

        if let Some(phonetic) = handle.tree.find_mut(PHONETIC_CLASS) {
            phonetic.text = entry.phonetic.clone();
            phonetic.children.clear();
            if handle.audio.is_some() {
                phonetic
                    .children
                    .push(Element::new("button", AUDIO_CLASS).with_text("🔊"));
            }
        }
        if let Some(pos) = handle.tree.find_mut(POS_CLASS) {
            pos.text = entry.part_of_speech.clone();
        }
        if let Some(def) = handle.tree.find_mut(DEF_CLASS) {
            def.text = entry.definition.clone();
        }
        if let Some(example) = &entry.example
            && let Some(body) = handle.tree.find_mut("wordpeek-body")
        {
            body.children
                .push(Element::new("div", EXAMPLE_CLASS).with_text(format!("\"{example}\"")));
        }

        handle.refresh();
    }

    pub fn show_error(&self, handle: &mut PopupHandle, message: &str) {
        if handle.destroyed || !self.surface.is_available() {
            return;
        }

        if let Some(phonetic) = handle.tree.find_mut(PHONETIC_CLASS) {
            phonetic.text.clear();
        }
        if let Some(def) = handle.tree.find_mut(DEF_CLASS) {
            def.text = message.to_string();
            def.add_class(ERROR_CLASS);
        }

        handle.refresh();
    }

    pub fn play_audio(&self, handle: &PopupHandle) {
        if let Some(audio) = handle.audio
            && self.surface.is_available()
        {
            self.surface.play_audio(audio);
        }
    }

    /// Whether `point` falls on the popup
    pub fn contains(&self, handle: &PopupHandle, point: Point) -> bool {
        handle.bounds.is_some_and(|b| b.contains(point))
    }

    /// Detach the popup and release its audio. Safe to call more than once.
    pub fn destroy(&self, handle: &mut PopupHandle) {
        handle.release();
    }
}
