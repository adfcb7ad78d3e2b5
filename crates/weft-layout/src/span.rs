//! Inline flow of text runs and embedded views.
//!
//! A [`SpanLayout`] owns a text buffer and an ordered list of span
//! objects. Text runs reference non-overlapping, ascending byte ranges of
//! the buffer; embedded views reference tree nodes by handle and are
//! placed as atomic boxes. Layout is one forward scan that breaks lines
//! greedily at segment and object boundaries, pulls floated objects out of
//! the flow, and records per-line metrics.

use std::collections::HashMap;
use std::ops::Range;

use serde::{Deserialize, Serialize};
use weft_types::{Canvas, Color, Font, FontMetrics, LayoutConfig, Rect, Size, TextAlignment};

use crate::float::{FloatContext, FloatSide};
use crate::text::{segments, strip_newlines};
use crate::tree::ViewId;

/// Stable identifier of a span object. Unaffected by removal of others.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SpanId(u32);

#[derive(Debug, Clone, PartialEq)]
pub enum SpanContent {
    Text {
        font: Font,
        color: Color,
        /// Byte range in the shared text buffer.
        range: Range<usize>,
    },
    View {
        view: ViewId,
        /// Distance from the view's top edge to its baseline.
        baseline_offset: f32,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpanObject {
    pub id: SpanId,
    pub content: SpanContent,
    pub float: Option<FloatSide>,
}

/// One placed token of a line.
#[derive(Debug, Clone, PartialEq)]
pub struct LinePiece {
    /// Index into the object list.
    pub object: usize,
    /// Buffer range for text; empty for views.
    pub text: Range<usize>,
    /// Offset from the line's left edge.
    pub x: f32,
    pub width: f32,
}

/// Metrics and contents of one wrapped line.
#[derive(Debug, Clone, PartialEq)]
pub struct SpanLine {
    pub object_range: Range<usize>,
    pub text_range: Range<usize>,
    pub top: f32,
    /// Float inset plus alignment offset.
    pub left: f32,
    pub ascent: f32,
    pub descent: f32,
    /// Extent of the line's content, trailing whitespace excluded.
    pub advance_width: f32,
    pub pieces: Vec<LinePiece>,
}

impl SpanLine {
    pub fn height(&self) -> f32 {
        self.ascent + self.descent
    }

    pub fn baseline(&self) -> f32 {
        self.top + self.ascent
    }
}

/// A floated object anchored beside the lines.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedFloat {
    pub object: usize,
    pub rect: Rect,
}

/// Result of laying out a span at one width.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpanLines {
    pub lines: Vec<SpanLine>,
    pub floats: Vec<PlacedFloat>,
    /// Bottom of the last line or the lowest float, whichever is lower.
    pub height: f32,
}

/// Collaborators and inputs of a layout call.
pub struct SpanContext<'a> {
    pub metrics: &'a dyn FontMetrics,
    pub config: &'a LayoutConfig,
    /// Margin-box sizes of embedded views. Missing views count as empty.
    pub sizes: &'a HashMap<ViewId, Size>,
}

impl SpanContext<'_> {
    fn size_of(&self, view: ViewId) -> Size {
        self.sizes.get(&view).copied().unwrap_or(Size::ZERO)
    }
}

#[derive(Debug, Clone, PartialEq)]
struct CacheKey {
    width: f32,
    alignment: TextAlignment,
    hard_breaks: bool,
    sizes: Vec<Size>,
}

/// Ordered text runs and embedded views flowed into lines.
#[derive(Debug, Clone, Default)]
pub struct SpanLayout {
    text: String,
    objects: Vec<SpanObject>,
    next_id: u32,
    alignment: Option<TextAlignment>,
    cache: Option<(CacheKey, SpanLines)>,
}

impl SpanLayout {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&mut self) -> SpanId {
        let id = SpanId(self.next_id);
        self.next_id += 1;
        id
    }

    fn push(&mut self, content: SpanContent) -> SpanId {
        let id = self.next_id();
        self.objects.push(SpanObject {
            id,
            content,
            float: None,
        });
        self.invalidate();
        id
    }

    /// Append a text run.
    pub fn add_text(&mut self, text: &str, font: Font, color: Color) -> SpanId {
        let start = self.text.len();
        self.text.push_str(text);
        let range = start..self.text.len();
        self.push(SpanContent::Text { font, color, range })
    }

    /// Append an embedded view whose baseline sits `baseline_offset` below
    /// its top edge.
    pub fn add_subview(&mut self, view: ViewId, baseline_offset: f32) -> SpanId {
        self.push(SpanContent::View {
            view,
            baseline_offset,
        })
    }

    /// Float an object to one side, or return it to the flow with `None`.
    pub fn set_float(&mut self, id: SpanId, side: Option<FloatSide>) -> bool {
        match self.objects.iter_mut().find(|o| o.id == id) {
            Some(object) => {
                object.float = side;
                self.invalidate();
                true
            },
            None => false,
        }
    }

    /// Remove every object, returning the embedded views. The views are
    /// released to the caller, not destroyed.
    pub fn clear(&mut self) -> Vec<ViewId> {
        let views = self.embedded_views();
        self.objects.clear();
        self.text.clear();
        self.invalidate();
        views
    }

    /// Remove one object by id. Later text ranges shift down over the
    /// removed run.
    pub fn remove(&mut self, id: SpanId) -> Option<SpanObject> {
        let index = self.objects.iter().position(|o| o.id == id)?;
        let object = self.objects.remove(index);
        if let SpanContent::Text { range, .. } = &object.content {
            let removed = range.len();
            self.text.replace_range(range.clone(), "");
            for later in &mut self.objects[index..] {
                if let SpanContent::Text { range, .. } = &mut later.content {
                    range.start -= removed;
                    range.end -= removed;
                }
            }
        }
        self.invalidate();
        Some(object)
    }

    /// Remove every object embedding `view`.
    pub fn remove_subview(&mut self, view: ViewId) -> bool {
        let before = self.objects.len();
        self.objects
            .retain(|o| !matches!(o.content, SpanContent::View { view: v, .. } if v == view));
        let removed = self.objects.len() != before;
        if removed {
            self.invalidate();
        }
        removed
    }

    pub fn set_text_alignment(&mut self, alignment: TextAlignment) {
        self.alignment = Some(alignment);
        self.invalidate();
    }

    pub fn text_alignment(&self) -> Option<TextAlignment> {
        self.alignment
    }

    pub fn objects(&self) -> &[SpanObject] {
        &self.objects
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Embedded views in object order.
    pub fn embedded_views(&self) -> Vec<ViewId> {
        self.objects
            .iter()
            .filter_map(|o| match o.content {
                SpanContent::View { view, .. } => Some(view),
                SpanContent::Text { .. } => None,
            })
            .collect()
    }

    /// Drop cached lines.
    pub fn invalidate(&mut self) {
        self.cache = None;
    }

    /// Lines from the most recent [`layout`](Self::layout) call, if still
    /// valid.
    pub fn cached_lines(&self) -> Option<&SpanLines> {
        self.cache.as_ref().map(|(_, lines)| lines)
    }

    /// Lay out at `width`.
    ///
    /// Results are cached per width, alignment and embedded sizes; the
    /// metrics provider is assumed not to change between calls.
    pub fn layout(&mut self, width: f32, ctx: &SpanContext) -> &SpanLines {
        let alignment = self.alignment.unwrap_or(ctx.config.default_alignment);
        let key = CacheKey {
            width,
            alignment,
            hard_breaks: ctx.config.hard_breaks,
            sizes: self.embedded_views().into_iter().map(|v| ctx.size_of(v)).collect(),
        };
        let lines = match self.cache.take() {
            Some((cached, lines)) if cached == key => {
                log::debug!("span layout cache hit at width {width}");
                lines
            },
            _ => {
                log::debug!("span layout cache miss at width {width}");
                self.flow(width, alignment, ctx)
            },
        };
        &self.cache.insert((key, lines)).1
    }

    /// Widest line when nothing wraps, plus the widths of all floats.
    pub fn preferred_width(&self, ctx: &SpanContext) -> f32 {
        let flowed = self.flow(f32::INFINITY, TextAlignment::Left, ctx);
        let widest = flowed
            .lines
            .iter()
            .map(|l| l.advance_width)
            .fold(0.0_f32, f32::max);
        widest + flowed.floats.iter().map(|f| f.rect.width).sum::<f32>()
    }

    pub fn preferred_height(&mut self, width: f32, ctx: &SpanContext) -> f32 {
        self.layout(width, ctx).height
    }

    pub fn first_baseline(&mut self, width: f32, ctx: &SpanContext) -> Option<f32> {
        self.layout(width, ctx).lines.first().map(SpanLine::baseline)
    }

    pub fn last_baseline(&mut self, width: f32, ctx: &SpanContext) -> Option<f32> {
        self.layout(width, ctx).lines.last().map(SpanLine::baseline)
    }

    /// Margin boxes of embedded views relative to the span's origin.
    pub fn place_views(&mut self, width: f32, ctx: &SpanContext) -> Vec<(ViewId, Rect)> {
        self.layout(width, ctx);
        let Some(lines) = self.cached_lines() else {
            return Vec::new();
        };
        let mut placed = Vec::new();
        for line in &lines.lines {
            for piece in &line.pieces {
                if let SpanContent::View {
                    view,
                    baseline_offset,
                } = self.objects[piece.object].content
                {
                    let size = ctx.size_of(view);
                    let y = line.top + line.ascent - baseline_offset;
                    placed.push((view, Rect::from_size(line.left + piece.x, y, size)));
                }
            }
        }
        for float in &lines.floats {
            if let SpanContent::View { view, .. } = self.objects[float.object].content {
                placed.push((view, float.rect));
            }
        }
        placed
    }

    /// Draw the text of `lines` with the span's origin at `(x, y)`.
    /// Embedded views are painted by their own nodes.
    pub fn render(&self, lines: &SpanLines, canvas: &mut dyn Canvas, x: f32, y: f32) {
        for line in &lines.lines {
            for piece in &line.pieces {
                if let SpanContent::Text { font, color, .. } = &self.objects[piece.object].content {
                    let text = strip_newlines(&self.text[piece.text.clone()]);
                    if !text.trim_end().is_empty() {
                        let baseline_y = y + line.baseline();
                        canvas.draw_text(font, x + line.left + piece.x, baseline_y, text, *color);
                    }
                }
            }
        }
    }

    // ---------------------------------------------------------------
    // Flow
    // ---------------------------------------------------------------

    fn tokens(&self, ctx: &SpanContext) -> Vec<Item> {
        let mut items = Vec::new();
        let mut text_cursor = 0;
        for (index, object) in self.objects.iter().enumerate() {
            match (&object.content, object.float) {
                (SpanContent::Text { font, range, .. }, None) => {
                    let line = ctx.metrics.line_metrics(font);
                    let run = &self.text[range.clone()];
                    for segment in segments(run, ctx.config.hard_breaks) {
                        let body = strip_newlines(&run[segment.range.clone()]);
                        items.push(Item::Token(Token {
                            object: index,
                            text: range.start + segment.range.start
                                ..range.start + segment.range.end,
                            advance: ctx.metrics.measure(font, body).advance_width,
                            visible: ctx.metrics.measure(font, body.trim_end()).advance_width,
                            ascent: line.ascent,
                            descent: line.descent,
                            hard_break: segment.hard_break,
                        }));
                    }
                    text_cursor = range.end;
                },
                (SpanContent::View { view, baseline_offset }, None) => {
                    let size = ctx.size_of(*view);
                    items.push(Item::Token(Token {
                        object: index,
                        text: text_cursor..text_cursor,
                        advance: size.width,
                        visible: size.width,
                        ascent: *baseline_offset,
                        descent: size.height - baseline_offset,
                        hard_break: false,
                    }));
                },
                (SpanContent::Text { font, range, .. }, Some(side)) => {
                    let m = ctx.metrics.measure(font, &self.text[range.clone()]);
                    let size = Size::new(m.advance_width, m.line_height());
                    items.push(Item::Float { object: index, side, size });
                    text_cursor = range.end;
                },
                (SpanContent::View { view, .. }, Some(side)) => {
                    let size = ctx.size_of(*view);
                    items.push(Item::Float { object: index, side, size });
                },
            }
        }
        items
    }

    fn flow(&self, width: f32, alignment: TextAlignment, ctx: &SpanContext) -> SpanLines {
        let mut out = SpanLines::default();
        let mut floats = FloatContext::new();
        let mut pending: Vec<(usize, FloatSide, Size)> = Vec::new();
        let mut line: Option<OpenLine> = None;
        let mut y = 0.0_f32;

        let place_float = |floats: &mut FloatContext,
                           out: &mut SpanLines,
                           (object, side, size): (usize, FloatSide, Size),
                           y: f32| {
            let placed = floats.place(side, size.width, size.height, y, width);
            out.floats.push(PlacedFloat {
                object,
                rect: placed.rect,
            });
        };

        for item in self.tokens(ctx) {
            let token = match item {
                Item::Float { object, side, size } => {
                    // Floats keep source order, so once one is deferred the rest wait too.
                    let anchor = match &mut line {
                        None => Some(y),
                        Some(open) if pending.is_empty() => {
                            open.admit(&floats, side, size, width).then_some(open.top)
                        },
                        Some(_) => None,
                    };
                    match anchor {
                        Some(top) => place_float(&mut floats, &mut out, (object, side, size), top),
                        None => pending.push((object, side, size)),
                    }
                    continue;
                },
                Item::Token(token) => token,
            };

            if let Some(open) = &line
                && open.overflows(&token)
            {
                if let Some(done) = line.take() {
                    y = done.close(alignment, &mut out.lines);
                }
                for float in pending.drain(..) {
                    place_float(&mut floats, &mut out, float, y);
                }
            }

            let open = line.get_or_insert_with(|| {
                let (left, band) = floats.available_width(y, token.ascent + token.descent, width);
                OpenLine::new(y, left, band)
            });
            let hard_break = token.hard_break;
            open.push(token);

            if hard_break && let Some(done) = line.take() {
                y = done.close(alignment, &mut out.lines);
                for float in pending.drain(..) {
                    place_float(&mut floats, &mut out, float, y);
                }
            }
        }

        if let Some(done) = line.take() {
            y = done.close(alignment, &mut out.lines);
        }
        for float in pending.drain(..) {
            place_float(&mut floats, &mut out, float, y);
        }
        out.height = y.max(floats.bottom());
        out
    }
}

enum Item {
    Token(Token),
    Float {
        object: usize,
        side: FloatSide,
        size: Size,
    },
}

/// An unbreakable piece of flow: a text segment or an embedded view.
struct Token {
    object: usize,
    text: Range<usize>,
    /// Advance including trailing whitespace.
    advance: f32,
    /// Advance without trailing whitespace.
    visible: f32,
    ascent: f32,
    descent: f32,
    hard_break: bool,
}

struct OpenLine {
    top: f32,
    band_left: f32,
    band_width: f32,
    x: f32,
    advance_width: f32,
    ascent: f32,
    descent: f32,
    text_range: Option<Range<usize>>,
    pieces: Vec<LinePiece>,
}

impl OpenLine {
    fn new(top: f32, band_left: f32, band_width: f32) -> Self {
        Self {
            top,
            band_left,
            band_width,
            x: 0.0,
            advance_width: 0.0,
            ascent: 0.0,
            descent: 0.0,
            text_range: None,
            pieces: Vec::new(),
        }
    }

    /// Narrow the line for a float anchored at its top, if the float fits
    /// there beside the content already on the line.
    fn admit(&mut self, floats: &FloatContext, side: FloatSide, size: Size, width: f32) -> bool {
        let Some(rect) = floats.slot(side, size.width, size.height, self.top, width) else {
            return false;
        };
        let mut left = self.band_left;
        let mut right = self.band_left + self.band_width;
        match side {
            FloatSide::Left => left = left.max(rect.right()),
            FloatSide::Right => right = right.min(rect.x),
        }
        if self.advance_width > right - left {
            return false;
        }
        self.band_left = left;
        self.band_width = right - left;
        true
    }

    /// The first token of a line always fits.
    fn overflows(&self, token: &Token) -> bool {
        !self.pieces.is_empty() && self.x + token.visible > self.band_width
    }

    fn push(&mut self, token: Token) {
        self.advance_width = self.x + token.visible;
        self.ascent = self.ascent.max(token.ascent);
        self.descent = self.descent.max(token.descent);
        if !token.text.is_empty() {
            self.text_range = Some(match self.text_range.take() {
                Some(r) => r.start..token.text.end,
                None => token.text.clone(),
            });
        }
        self.pieces.push(LinePiece {
            object: token.object,
            text: token.text,
            x: self.x,
            width: token.advance,
        });
        self.x += token.advance;
    }

    /// Finish the line, returning the top of the next one.
    fn close(self, alignment: TextAlignment, lines: &mut Vec<SpanLine>) -> f32 {
        let first = self.pieces.first().map_or(0, |p| p.object);
        let last = self.pieces.last().map_or(0, |p| p.object + 1);
        let text_range = self.text_range.unwrap_or_else(|| {
            let at = self.pieces.first().map_or(0, |p| p.text.start);
            at..at
        });
        let line = SpanLine {
            object_range: first..last,
            text_range,
            top: self.top,
            left: self.band_left + alignment.offset(self.band_width, self.advance_width),
            ascent: self.ascent,
            descent: self.descent,
            advance_width: self.advance_width,
            pieces: self.pieces,
        };
        let next = line.top + line.height();
        lines.push(line);
        next
    }
}
