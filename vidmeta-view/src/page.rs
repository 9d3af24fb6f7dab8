use crate::render::{RenderTarget, Slot};

/// In-memory page: what the terminal UI draws and the CLI prints.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageState {
    input: String,
    error_text: String,
    error_visible: bool,
    details_visible: bool,
    slots: [String; 5],
    thumbnail_src: String,
    thumbnail_href: String,
}

impl PageState {
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Direct access for line editing.
    pub fn input_mut(&mut self) -> &mut String {
        &mut self.input
    }

    pub fn error_text(&self) -> &str {
        &self.error_text
    }

    pub fn error_visible(&self) -> bool {
        self.error_visible
    }

    pub fn details_visible(&self) -> bool {
        self.details_visible
    }

    pub fn slot(&self, slot: Slot) -> &str {
        &self.slots[slot.index()]
    }

    pub fn thumbnail_src(&self) -> &str {
        &self.thumbnail_src
    }

    pub fn thumbnail_href(&self) -> &str {
        &self.thumbnail_href
    }
}

impl RenderTarget for PageState {
    fn set_input(&mut self, value: &str) {
        value.clone_into(&mut self.input);
    }

    fn set_error_text(&mut self, text: &str) {
        text.clone_into(&mut self.error_text);
    }

    fn set_error_visible(&mut self, visible: bool) {
        self.error_visible = visible;
    }

    fn set_details_visible(&mut self, visible: bool) {
        self.details_visible = visible;
    }

    fn set_slot(&mut self, slot: Slot, text: &str) {
        text.clone_into(&mut self.slots[slot.index()]);
    }

    fn set_thumbnail_src(&mut self, url: &str) {
        url.clone_into(&mut self.thumbnail_src);
    }

    fn set_thumbnail_href(&mut self, url: &str) {
        url.clone_into(&mut self.thumbnail_href);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slots_are_independent() {
        let mut page = PageState::default();
        page.set_slot(Slot::Title, "T");
        page.set_slot(Slot::Duration, "00:03:45");
        assert_eq!(page.slot(Slot::Title), "T");
        assert_eq!(page.slot(Slot::Duration), "00:03:45");
        for slot in [Slot::Description, Slot::VideoId, Slot::PublishedAt] {
            assert_eq!(page.slot(slot), "");
        }
    }

    #[test]
    fn input_can_be_edited_in_place() {
        let mut page = PageState::default();
        page.input_mut().push_str("https://youtu.be/");
        page.input_mut().push_str("abc123");
        assert_eq!(page.input(), "https://youtu.be/abc123");
        page.set_input("");
        assert_eq!(page.input(), "");
    }
}
