use crate::backend::{ExtractBackend, ExtractError};
use crate::date::format_published_at;
use crate::render::{RenderTarget, Slot};
use vidmeta_common::{DEFAULT_WATCH_HOST, ExtractionResult};

const PLACEHOLDER_HREF: &str = "#";

/// Rendering knobs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewOptions {
    pub watch_host: String,
    /// `strftime` pattern for the publication date.
    pub date_format: String,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            watch_host: DEFAULT_WATCH_HOST.to_string(),
            date_format: "%-m/%-d/%Y".to_string(),
        }
    }
}

/// Identifies the submission an outcome belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// A validated submission waiting for its backend call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRequest {
    pub ticket: Ticket,
    /// Trimmed input.
    pub url: String,
}

/// Drives a [`RenderTarget`] from user actions and backend outcomes.
///
/// Every user action (submit, reset, rejected input) moves the sequence
/// forward; [`ViewController::finish`] drops outcomes for anything but the
/// latest ticket, so a slow response never overwrites a newer page state.
pub struct ViewController<R> {
    target: R,
    options: ViewOptions,
    seq: u64,
}

impl<R: RenderTarget> ViewController<R> {
    /// Take ownership of the page and reset it.
    pub fn new(target: R, options: ViewOptions) -> Self {
        let mut view = Self {
            target,
            options,
            seq: 0,
        };
        view.reset();
        view
    }

    pub fn target(&self) -> &R {
        &self.target
    }

    pub fn target_mut(&mut self) -> &mut R {
        &mut self.target
    }

    pub fn into_target(self) -> R {
        self.target
    }

    pub fn options(&self) -> &ViewOptions {
        &self.options
    }

    /// Validate raw input and, if usable, clear the page and issue a ticket.
    ///
    /// Returns `None` after showing the validation error; no request should be
    /// made in that case.
    pub fn begin(&mut self, raw: &str) -> Option<PendingRequest> {
        let url = raw.trim();
        if url.is_empty() {
            self.seq += 1;
            tracing::debug!(target: "vidmeta::view", "view.submit.empty_input");
            self.render_failure(&ExtractError::EmptyInput);
            return None;
        }

        let url = url.to_string();
        self.reset();
        tracing::info!(target: "vidmeta::view", seq = self.seq, url = %url, "view.submit");
        Some(PendingRequest {
            ticket: Ticket(self.seq),
            url,
        })
    }

    /// Render the outcome of `ticket`. Returns `false` when the ticket is
    /// stale and nothing was rendered.
    pub fn finish(
        &mut self,
        ticket: Ticket,
        outcome: Result<ExtractionResult, ExtractError>,
    ) -> bool {
        if ticket.0 != self.seq {
            tracing::debug!(
                target: "vidmeta::view",
                ticket = ticket.0,
                current = self.seq,
                ok = outcome.is_ok(),
                "view.outcome.stale"
            );
            return false;
        }

        match outcome {
            Ok(result) => self.render_success(&result),
            Err(err) => {
                tracing::warn!(target: "vidmeta::view", error = %err, ?err, "view.extract.failed");
                self.render_failure(&err);
            }
        }
        true
    }

    /// Validate, call `backend`, render. For callers that can await inline.
    pub async fn submit<B>(
        &mut self,
        backend: &B,
        raw: &str,
    ) -> Result<ExtractionResult, ExtractError>
    where
        B: ExtractBackend + ?Sized,
    {
        let Some(pending) = self.begin(raw) else {
            return Err(ExtractError::EmptyInput);
        };
        let outcome = backend.extract(&pending.url).await;
        self.finish(pending.ticket, outcome.clone());
        outcome
    }

    pub fn render_success(&mut self, result: &ExtractionResult) {
        let published = format_published_at(&result.published_at, &self.options.date_format);
        let href = result.watch_url(&self.options.watch_host);

        let t = &mut self.target;
        t.set_details_visible(true);
        t.set_slot(Slot::Title, &result.title);
        t.set_thumbnail_src(&result.thumbnail_url);
        t.set_thumbnail_href(&href);
        t.set_slot(Slot::Description, &result.description);
        t.set_slot(Slot::Duration, &result.duration_formatted);
        t.set_slot(Slot::PublishedAt, &published);
        t.set_slot(Slot::VideoId, &result.video_id);
        t.set_error_visible(false);
    }

    pub fn render_failure(&mut self, err: &ExtractError) {
        let t = &mut self.target;
        t.set_error_text(&err.banner_text());
        t.set_error_visible(true);
        t.set_details_visible(false);
    }

    /// Clear input, banner and every slot. Outcomes still in flight become stale.
    pub fn reset(&mut self) {
        self.seq += 1;
        let t = &mut self.target;
        t.set_input("");
        t.set_error_text("");
        t.set_error_visible(false);
        t.set_details_visible(false);
        for slot in Slot::ALL {
            t.set_slot(slot, "");
        }
        t.set_thumbnail_src("");
        t.set_thumbnail_href(PLACEHOLDER_HREF);
    }
}
