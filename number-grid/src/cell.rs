use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::cmp;

use cell_grid::{Frame, GridCell, Size};

/// Stroke weight of a [`Font`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FontWeight {
    #[default]
    Regular,
    Bold,
}

/// A system font used to measure label text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Font {
    /// Point size.
    pub size: u32,
    pub weight: FontWeight,
}

impl Font {
    /// The system font at `size` points.
    pub const fn system(size: u32, weight: FontWeight) -> Self {
        Self { size, weight }
    }

    /// Horizontal advance of one glyph (monospaced approximation).
    pub fn advance(&self) -> u32 {
        match self.weight {
            FontWeight::Regular => self.size * 11 / 20,
            FontWeight::Bold => self.size * 3 / 5,
        }
    }

    /// Height of one line of text.
    pub fn line_height(&self) -> u32 {
        self.size * 6 / 5
    }
}

/// An 8-bit RGBA color.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const PURPLE: Color = Color::rgb(128, 0, 128);

    /// An opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Same color with alpha set to `alpha_percent` (0..=100).
    pub const fn with_alpha_percent(self, alpha_percent: u8) -> Self {
        let alpha_percent = if alpha_percent > 100 {
            100
        } else {
            alpha_percent
        };
        Self {
            a: ((alpha_percent as u16 * 255 + 50) / 100) as u8,
            ..self
        }
    }
}

/// A single line of text centered in its parent.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Label {
    text: String,
    font: Font,
}

impl Label {
    /// Creates a label showing `text` in `font`.
    pub fn new(text: impl Into<String>, font: Font) -> Self {
        Self {
            text: text.into(),
            font,
        }
    }

    /// The displayed text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The font the text is measured with.
    pub fn font(&self) -> Font {
        self.font
    }

    /// Size of the text on one line.
    pub fn intrinsic_size(&self) -> Size {
        let glyphs = self.text.chars().count() as u32;
        Size::new(glyphs * self.font.advance(), self.font.line_height())
    }

    /// Frame of the label centered horizontally and vertically in `bounds`.
    pub fn frame_in(&self, bounds: Frame) -> Frame {
        bounds.centered(self.intrinsic_size())
    }
}

/// The view cell content is added to.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContentView {
    pub background: Color,
    subviews: Vec<Label>,
}

impl ContentView {
    pub fn new(background: Color) -> Self {
        Self {
            background,
            subviews: Vec::new(),
        }
    }

    pub fn subviews(&self) -> &[Label] {
        &self.subviews
    }

    /// Appends `label` and returns its position.
    pub fn add_subview(&mut self, label: Label) -> usize {
        self.subviews.push(label);
        self.subviews.len() - 1
    }

    pub fn remove_subview(&mut self, position: usize) -> Option<Label> {
        (position < self.subviews.len()).then(|| self.subviews.remove(position))
    }
}

/// Font of the number label.
pub const NUMBER_FONT: Font = Font::system(24, FontWeight::Bold);

/// Minimum space kept between the number label and the cell edges when the cell sizes itself.
pub const CONTENT_INSET: u32 = 8;

/// A grid cell that shows one integer as centered text.
///
/// The label is rebuilt on every [`NumberCell::set_value`]: the previous one is removed from
/// the content view first, so a recycled cell never accumulates labels.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct NumberCell {
    value: Option<i64>,
    content: ContentView,
    number_view: Option<usize>,
}

impl NumberCell {
    pub fn new() -> Self {
        Self {
            value: None,
            content: ContentView::new(Color::PURPLE.with_alpha_percent(30)),
            number_view: None,
        }
    }

    pub fn value(&self) -> Option<i64> {
        self.value
    }

    /// Assigns the value to display.
    ///
    /// Removes the current label, then (for `Some`) adds a new one with the decimal text of
    /// `value`, centered in the content view.
    pub fn set_value(&mut self, value: Option<i64>) {
        if let Some(position) = self.number_view.take() {
            self.content.remove_subview(position);
        }
        self.value = value;

        let Some(value) = value else {
            return;
        };
        let label = Label::new(value.to_string(), NUMBER_FONT);
        self.number_view = Some(self.content.add_subview(label));
    }

    pub fn label(&self) -> Option<&Label> {
        self.number_view
            .and_then(|position| self.content.subviews().get(position))
    }

    pub fn text(&self) -> Option<&str> {
        self.label().map(Label::text)
    }

    /// Number of labels in the content view.
    pub fn label_count(&self) -> usize {
        self.content.subviews().len()
    }

    pub fn content_view(&self) -> &ContentView {
        &self.content
    }

    /// Frame of the number label inside `bounds` (the cell's content bounds).
    pub fn label_frame(&self, bounds: Frame) -> Option<Frame> {
        self.label().map(|label| label.frame_in(bounds))
    }
}

impl Default for NumberCell {
    fn default() -> Self {
        Self::new()
    }
}

impl GridCell for NumberCell {
    /// Grows the estimate to fit the label plus [`CONTENT_INSET`] on each side.
    fn fitting_size(&self, estimated: Size) -> Size {
        let Some(label) = self.label() else {
            return estimated;
        };
        let text = label.intrinsic_size();
        Size::new(
            cmp::max(estimated.width, text.width + 2 * CONTENT_INSET),
            cmp::max(estimated.height, text.height + 2 * CONTENT_INSET),
        )
    }
}

/// Cells are never persisted; restoring one from an archive is a programming error.
///
/// # Panics
///
/// Always.
#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for NumberCell {
    fn deserialize<D>(_deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        panic!("NumberCell cannot be restored from an archive")
    }
}
