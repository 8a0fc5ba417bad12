//! Document layout for the scrollable sections and the scroll-spy over it.

use folio_config::SectionConfig;

/// Distance below the top of the viewport at which a section becomes active.
pub const ACTIVE_OFFSET_PX: f32 = 100.0;
/// Scroll distance after which the scroll-to-top indicator appears.
pub const SCROLL_TOP_PX: f32 = 300.0;
/// Scroll distance after which the nav bar turns solid.
pub const NAV_SOLID_PX: f32 = 50.0;

/// Convert a pixel distance to terminal rows, rounding up.
pub fn px_to_rows(px: f32, cell_height_px: f32) -> usize {
    if cell_height_px <= 0.0 || !cell_height_px.is_finite() {
        return 0;
    }
    (px / cell_height_px).ceil().max(0.0) as usize
}

/// Greedy word wrap on character counts. Words longer than `width` are split.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut line = String::new();
        let mut line_len = 0;

        for word in paragraph.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();

            while word.len() > width {
                if line_len > 0 {
                    lines.push(std::mem::take(&mut line));
                    line_len = 0;
                }
                let rest = word.split_off(width);
                lines.push(word.into_iter().collect());
                word = rest;
            }

            let needed = if line_len == 0 {
                word.len()
            } else {
                line_len + 1 + word.len()
            };
            if needed > width {
                lines.push(std::mem::take(&mut line));
                line_len = 0;
            }
            if line_len > 0 {
                line.push(' ');
                line_len += 1;
            }
            line.extend(word.iter());
            line_len += word.len();
        }

        lines.push(line);
    }

    lines
}

/// One row of the laid-out document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Row {
    /// Part of the hero area, drawn separately.
    Hero,
    Blank,
    /// Heading of the section with this index.
    Title(usize),
    Body(String),
}

/// Rows occupied by one section, title included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionSpan {
    pub top: usize,
    pub height: usize,
}

impl SectionSpan {
    pub fn contains(&self, row: usize) -> bool {
        row >= self.top && row < self.top + self.height
    }
}

/// The hero followed by every section, wrapped to a given width.
#[derive(Debug, Clone, Default)]
pub struct Document {
    pub rows: Vec<Row>,
    pub spans: Vec<SectionSpan>,
}

impl Document {
    pub fn layout(sections: &[SectionConfig], width: usize, hero_height: usize) -> Self {
        let mut rows = vec![Row::Hero; hero_height];
        let mut spans = Vec::with_capacity(sections.len());

        for (index, section) in sections.iter().enumerate() {
            let top = rows.len();
            rows.push(Row::Title(index));
            rows.push(Row::Blank);
            rows.extend(wrap(&section.body, width).into_iter().map(|line| {
                if line.is_empty() {
                    Row::Blank
                } else {
                    Row::Body(line)
                }
            }));
            rows.push(Row::Blank);
            spans.push(SectionSpan {
                top,
                height: rows.len() - top,
            });
        }

        Self { rows, spans }
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Largest scroll offset that still fills a viewport of `viewport` rows.
    pub fn max_scroll(&self, viewport: usize) -> usize {
        self.height().saturating_sub(viewport)
    }
}

/// Index of the section whose span contains `scroll + offset`.
pub fn active_section(spans: &[SectionSpan], scroll: usize, offset: usize) -> Option<usize> {
    let probe = scroll + offset;
    spans.iter().rposition(|span| span.contains(probe))
}

/// Scroll position and the section highlighted in the nav bar.
#[derive(Debug, Clone)]
pub struct Navigator {
    scroll: usize,
    active: Option<usize>,
    active_offset: usize,
    scroll_top_rows: usize,
    nav_solid_rows: usize,
}

impl Navigator {
    pub fn new(cell_height_px: f32) -> Self {
        Self {
            scroll: 0,
            active: None,
            active_offset: px_to_rows(ACTIVE_OFFSET_PX, cell_height_px),
            scroll_top_rows: px_to_rows(SCROLL_TOP_PX, cell_height_px),
            nav_solid_rows: px_to_rows(NAV_SOLID_PX, cell_height_px),
        }
    }

    pub fn scroll(&self) -> usize {
        self.scroll
    }

    pub fn active(&self) -> Option<usize> {
        self.active
    }

    /// Scroll by `delta` rows, clamped to the document.
    pub fn scroll_by(&mut self, delta: isize, document: &Document, viewport: usize) {
        let target = self.scroll.saturating_add_signed(delta);
        self.set_scroll(target, document, viewport);
    }

    pub fn scroll_to_top(&mut self, document: &Document, viewport: usize) {
        self.set_scroll(0, document, viewport);
    }

    /// Scroll so section `index` starts at the top and mark it active.
    pub fn jump_to(&mut self, index: usize, document: &Document, viewport: usize) {
        if let Some(span) = document.spans.get(index) {
            self.scroll = span.top.min(document.max_scroll(viewport));
            self.active = Some(index);
        }
    }

    /// Re-clamp after the document or viewport changed size.
    pub fn relayout(&mut self, document: &Document, viewport: usize) {
        self.set_scroll(self.scroll, document, viewport);
    }

    /// Whether the scroll-to-top indicator should be shown.
    pub fn show_scroll_top(&self) -> bool {
        self.scroll > self.scroll_top_rows
    }

    /// Whether the nav bar should use its solid background.
    pub fn nav_solid(&self) -> bool {
        self.scroll > self.nav_solid_rows
    }

    fn set_scroll(&mut self, scroll: usize, document: &Document, viewport: usize) {
        self.scroll = scroll.min(document.max_scroll(viewport));
        // Keep the previous highlight while over the hero
        if let Some(index) = active_section(&document.spans, self.scroll, self.active_offset) {
            self.active = Some(index);
        }
    }
}
