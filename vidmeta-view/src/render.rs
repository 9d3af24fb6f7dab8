/// Text slots of the details panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Title,
    Description,
    VideoId,
    PublishedAt,
    Duration,
}

impl Slot {
    pub const ALL: [Slot; 5] = [
        Slot::Title,
        Slot::Description,
        Slot::VideoId,
        Slot::PublishedAt,
        Slot::Duration,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Slot::Title => "Title",
            Slot::Description => "Description",
            Slot::VideoId => "Video ID",
            Slot::PublishedAt => "Published",
            Slot::Duration => "Duration",
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Slot::Title => 0,
            Slot::Description => 1,
            Slot::VideoId => 2,
            Slot::PublishedAt => 3,
            Slot::Duration => 4,
        }
    }
}

/// Capabilities the controller needs from a page.
///
/// Text is always plain text; implementations must not interpret markup.
pub trait RenderTarget {
    fn set_input(&mut self, value: &str);
    fn set_error_text(&mut self, text: &str);
    fn set_error_visible(&mut self, visible: bool);
    fn set_details_visible(&mut self, visible: bool);
    fn set_slot(&mut self, slot: Slot, text: &str);
    fn set_thumbnail_src(&mut self, url: &str);
    fn set_thumbnail_href(&mut self, url: &str);
}
