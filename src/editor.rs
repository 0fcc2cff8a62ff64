//! Traits for working with plugin editors.
//!
//! Editors don't draw pixels themselves. They paint into a [`Graphics`] context supplied by
//! whatever windowing toolkit is hosting them. [`DisplayList`] is a `Graphics` implementation that
//! records the draw calls instead, which is what the tests use.

/// An editor for a [`Plugin`][crate::plugin::Plugin]. Editors are passive views: they can read the
/// plugin's parameters but never touch its audio state.
pub trait Editor {
    /// Returns the (current) size of the editor in logical pixels as a `(width, height)` pair.
    fn size(&self) -> (u32, u32);

    /// Paint the editor's contents.
    fn paint(&self, g: &mut dyn Graphics);

    /// Called after the editor's window has been resized. Lay out child components here.
    #[allow(unused_variables)]
    fn resized(&mut self, width: u32, height: u32) {}

    /// Called whenever a specific parameter's value has changed while the editor is open.
    #[allow(unused_variables)]
    fn param_value_changed(&self, id: &str, normalized_value: f32) {}

    /// Called after several parameter values have changed at once, for instance after loading
    /// state.
    fn param_values_changed(&self) {}
}

/// A drawing surface. The subset of operations an editor needs to paint a static view.
pub trait Graphics {
    /// Fill the entire drawing area with a colour.
    fn fill_all(&mut self, colour: Colour);

    /// Set the colour used by subsequent text drawing.
    fn set_colour(&mut self, colour: Colour);

    /// Set the font height in points used by subsequent text drawing.
    fn set_font(&mut self, height: f32);

    /// Draw text inside `area`, squashing it horizontally and breaking it over at most
    /// `max_lines` lines if it doesn't fit.
    fn draw_fitted_text(
        &mut self,
        text: &str,
        area: Rectangle,
        justification: Justification,
        max_lines: u32,
    );
}

/// An 8-bit per channel RGBA colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Colour {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Colour {
    pub const WHITE: Colour = Colour::from_rgb(0xff, 0xff, 0xff);
    pub const BLACK: Colour = Colour::from_rgb(0x00, 0x00, 0x00);
    /// The default window background colour.
    pub const WINDOW_BACKGROUND: Colour = Colour::from_rgb(0x32, 0x3e, 0x44);

    /// An opaque colour.
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xff }
    }
}

/// An integer rectangle in logical pixels.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rectangle {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rectangle {
    /// A rectangle at the origin, used for a component's local bounds.
    pub const fn with_size(width: u32, height: u32) -> Self {
        Self {
            x: 0,
            y: 0,
            width,
            height,
        }
    }
}

/// Where text gets placed within its area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Justification {
    Left,
    Right,
    Centred,
}

/// A single recorded call on a [`DisplayList`].
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    FillAll(Colour),
    SetColour(Colour),
    SetFont(f32),
    DrawFittedText {
        text: String,
        area: Rectangle,
        justification: Justification,
        max_lines: u32,
    },
}

/// A [`Graphics`] implementation that records every call in order.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct DisplayList {
    commands: Vec<DrawCommand>,
}

impl DisplayList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// All text drawn so far, in drawing order.
    pub fn texts(&self) -> impl Iterator<Item = &str> + '_ {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::DrawFittedText { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

impl Graphics for DisplayList {
    fn fill_all(&mut self, colour: Colour) {
        self.commands.push(DrawCommand::FillAll(colour));
    }

    fn set_colour(&mut self, colour: Colour) {
        self.commands.push(DrawCommand::SetColour(colour));
    }

    fn set_font(&mut self, height: f32) {
        self.commands.push(DrawCommand::SetFont(height));
    }

    fn draw_fitted_text(
        &mut self,
        text: &str,
        area: Rectangle,
        justification: Justification,
        max_lines: u32,
    ) {
        self.commands.push(DrawCommand::DrawFittedText {
            text: text.to_owned(),
            area,
            justification,
            max_lines,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_list_records_in_order() {
        let mut list = DisplayList::new();
        list.fill_all(Colour::BLACK);
        list.set_font(12.0);
        list.draw_fitted_text("a", Rectangle::with_size(10, 10), Justification::Left, 1);
        list.draw_fitted_text("b", Rectangle::with_size(10, 10), Justification::Right, 2);

        assert_eq!(list.commands().len(), 4);
        assert_eq!(list.commands()[0], DrawCommand::FillAll(Colour::BLACK));
        assert_eq!(list.texts().collect::<Vec<_>>(), ["a", "b"]);
    }
}
