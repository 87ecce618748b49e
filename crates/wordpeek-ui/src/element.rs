/// Minimal DOM-like node used to describe the popup
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Element {
    pub tag: &'static str,
    pub classes: Vec<String>,
    pub text: String,
    pub children: Vec<Element>,
}

impl Element {
    pub fn new(tag: &'static str, class: &str) -> Self {
        Self {
            tag,
            classes: vec![class.to_string()],
            text: String::new(),
            children: Vec::new(),
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn add_class(&mut self, class: &str) {
        if !self.has_class(class) {
            self.classes.push(class.to_string());
        }
    }

    /// Depth-first search by class
    pub fn find(&self, class: &str) -> Option<&Element> {
        if self.has_class(class) {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(class))
    }

    pub fn find_mut(&mut self, class: &str) -> Option<&mut Element> {
        if self.has_class(class) {
            return Some(self);
        }
        self.children.iter_mut().find_map(|c| c.find_mut(class))
    }

    /// Own text followed by the text of all descendants
    pub fn text_content(&self) -> String {
        let mut out = self.text.clone();
        for child in &self.children {
            out.push_str(&child.text_content());
        }
        out
    }
}
