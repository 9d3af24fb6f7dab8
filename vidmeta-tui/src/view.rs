use crate::{app::App, styles};
use anyhow::Result;
use ratatui::{
    Frame, Terminal,
    backend::Backend,
    layout::{Constraint, Direction, Layout, Position, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};
use textwrap::wrap;
use unicode_width::UnicodeWidthStr;
use vidmeta_view::{PageState, Slot};

const HINT: &str = "Paste a YouTube link and press Enter.";
const LABEL_WIDTH: usize = 11;

pub fn draw<B: Backend>(term: &mut Terminal<B>, app: &mut App) -> Result<()> {
    let mut limit = 0;
    term.draw(|frame| limit = render(frame, app))?;
    app.set_scroll_limit(limit);
    Ok(())
}

/// Draw the whole page. Returns the largest useful description scroll offset.
pub fn render(frame: &mut Frame, app: &App) -> u16 {
    let page = app.page();
    let banner_height = if page.error_visible() { 3 } else { 0 };

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(banner_height),
            Constraint::Min(3),
            Constraint::Length(3),
        ])
        .split(frame.area());

    let header = Paragraph::new(Line::from(Span::styled(
        " YouTube Metadata Extractor ",
        styles::header(),
    )));
    frame.render_widget(header, layout[0]);

    let input_box = Paragraph::new(page.input())
        .block(Block::default().borders(Borders::ALL).title(" YouTube URL "));
    frame.render_widget(Clear, layout[1]);
    frame.render_widget(input_box, layout[1]);

    let caret_x = layout[1].x + 1 + visual_caret_col(page.input(), app.cursor());
    frame.set_cursor_position(Position {
        x: caret_x.min(layout[1].right().saturating_sub(2)),
        y: layout[1].y + 1,
    });

    if page.error_visible() {
        let banner = Paragraph::new(page.error_text())
            .style(styles::error())
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).title(" Error "));
        frame.render_widget(banner, layout[2]);
    }

    let limit = if page.details_visible() {
        render_details(frame, page, app.scroll(), layout[3])
    } else {
        let hint = Paragraph::new(Span::styled(HINT, styles::dim()))
            .block(Block::default().borders(Borders::ALL).title(" Details "));
        frame.render_widget(hint, layout[3]);
        0
    };

    let status_line = Line::from(vec![
        Span::raw(" "),
        Span::styled(app.spinner(), styles::busy()),
        Span::raw(" "),
        if app.busy() > 0 {
            Span::styled("Extracting…", styles::busy())
        } else {
            Span::styled("Ready", styles::idle())
        },
        Span::styled(
            "  • Enter extract  Esc clear  ↑↓ scroll  Ctrl-C quit",
            styles::dim(),
        ),
    ]);
    let status = Paragraph::new(status_line)
        .block(Block::default().borders(Borders::ALL).title(" Status "));
    frame.render_widget(status, layout[4]);

    limit
}

fn render_details(frame: &mut Frame, page: &PageState, scroll: u16, area: Rect) -> u16 {
    let block = Block::default().borders(Borders::ALL).title(" Details ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [fields_area, desc_area] =
        Layout::vertical([Constraint::Length(6), Constraint::Min(1)]).areas(inner);

    let fields = vec![
        field(
            Slot::Title.label(),
            Span::styled(page.slot(Slot::Title), styles::title()),
        ),
        field(
            Slot::VideoId.label(),
            Span::styled(page.slot(Slot::VideoId), styles::value()),
        ),
        field(
            Slot::PublishedAt.label(),
            Span::styled(page.slot(Slot::PublishedAt), styles::value()),
        ),
        field(
            Slot::Duration.label(),
            Span::styled(page.slot(Slot::Duration), styles::value()),
        ),
        field(
            "Thumbnail",
            Span::styled(page.thumbnail_src(), styles::value()),
        ),
        field("Link", Span::styled(page.thumbnail_href(), styles::link())),
    ];
    frame.render_widget(Paragraph::new(fields), fields_area);

    let desc_block = Block::default()
        .borders(Borders::TOP)
        .title(Span::styled(" Description ", styles::label()));
    let text_area = desc_block.inner(desc_area);
    frame.render_widget(desc_block, desc_area);

    let lines = wrap_description(page.slot(Slot::Description), text_area.width as usize);
    let visible = text_area.height as usize;
    let limit = lines.len().saturating_sub(visible);
    let start = (scroll as usize).min(limit);

    let shown: Vec<Line> = lines[start..]
        .iter()
        .take(visible)
        .map(|l| Line::from(l.as_str()))
        .collect();
    frame.render_widget(Paragraph::new(shown).style(styles::value()), text_area);

    u16::try_from(limit).unwrap_or(u16::MAX)
}

fn field<'a>(label: &str, value: Span<'a>) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("{label:<width$}", width = LABEL_WIDTH), styles::label()),
        value,
    ])
}

fn visual_caret_col(input: &str, cursor: usize) -> u16 {
    let before = input.get(..cursor).unwrap_or(input);
    u16::try_from(UnicodeWidthStr::width(before)).unwrap_or(u16::MAX)
}

fn wrap_description(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut out = Vec::new();
    for raw_line in text.split('\n') {
        let raw_line = raw_line.trim_end_matches('\r');
        if raw_line.is_empty() {
            out.push(String::new());
            continue;
        }
        out.extend(wrap(raw_line, width).into_iter().map(|seg| seg.into_owned()));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::backend::TestBackend;
    use vidmeta_common::ExtractionResult;
    use vidmeta_view::ViewOptions;

    fn screen(term: &Terminal<TestBackend>) -> String {
        let buf = term.backend().buffer();
        let width = buf.area.width as usize;
        buf.content()
            .chunks(width)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn press(app: &mut App, code: KeyCode) -> crate::Action {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn app_with(description: &str) -> App {
        let mut app = App::new(ViewOptions::default());
        for ch in "https://youtu.be/abc123".chars() {
            press(&mut app, KeyCode::Char(ch));
        }
        let crate::Action::Submit(pending) = press(&mut app, KeyCode::Enter) else {
            panic!("expected a submission");
        };
        app.complete(
            pending.ticket,
            Ok(ExtractionResult {
                title: "Never <b>Gonna</b>".into(),
                thumbnail_url: "https://i.ytimg.com/vi/abc123/mqdefault.jpg".into(),
                video_id: "abc123".into(),
                description: description.into(),
                duration_formatted: "00:03:45".into(),
                published_at: "2023-05-01".into(),
            }),
        );
        app
    }

    fn terminal() -> Terminal<TestBackend> {
        Terminal::new(TestBackend::new(80, 24)).unwrap()
    }

    #[test]
    fn fresh_page_shows_only_the_hint() {
        let mut term = terminal();
        let mut app = App::new(ViewOptions::default());
        draw(&mut term, &mut app).unwrap();
        let out = screen(&term);
        assert!(out.contains(HINT));
        assert!(!out.contains(" Error "));
        assert!(out.contains("Ready"));
    }

    #[test]
    fn validation_error_draws_the_banner() {
        let mut term = terminal();
        let mut app = App::new(ViewOptions::default());
        press(&mut app, KeyCode::Enter);
        draw(&mut term, &mut app).unwrap();
        let out = screen(&term);
        assert!(out.contains(" Error "));
        assert!(out.contains("Please enter a valid YouTube URL."));
        assert!(out.contains(HINT));
    }

    #[test]
    fn details_show_every_field_verbatim() {
        let mut term = terminal();
        let mut app = app_with("first line <i>kept</i>");
        draw(&mut term, &mut app).unwrap();
        let out = screen(&term);
        assert!(out.contains("Never <b>Gonna</b>"));
        assert!(out.contains("abc123"));
        assert!(out.contains("5/1/2023"));
        assert!(out.contains("00:03:45"));
        assert!(out.contains("https://i.ytimg.com/vi/abc123/mqdefault.jpg"));
        assert!(out.contains("https://www.youtube.com/watch?v=abc123"));
        assert!(out.contains("first line <i>kept</i>"));
        assert!(!out.contains(HINT));
    }

    #[test]
    fn long_descriptions_scroll() {
        let description = (1..=40)
            .map(|n| format!("row-{n:02}"))
            .collect::<Vec<_>>()
            .join("\n");
        let mut term = terminal();
        let mut app = app_with(&description);

        draw(&mut term, &mut app).unwrap();
        let out = screen(&term);
        assert!(out.contains("row-01"));
        assert!(!out.contains("row-40"));

        for _ in 0..20 {
            press(&mut app, KeyCode::PageDown);
        }
        draw(&mut term, &mut app).unwrap();
        let out = screen(&term);
        assert!(out.contains("row-40"));
        assert!(!out.contains("row-01"));
    }

    #[test]
    fn caret_counts_display_width() {
        assert_eq!(visual_caret_col("abc", 2), 2);
        assert_eq!(visual_caret_col("日本", "日".len()), 2);
        assert_eq!(visual_caret_col("abc", 99), 3);
    }

    #[test]
    fn wrapping_keeps_blank_lines() {
        assert_eq!(
            wrap_description("one two three\r\n\nfour", 8),
            vec!["one two", "three", "", "four"]
        );
    }
}
