use crate::editor::{Colour, Editor, Graphics, Justification, Rectangle};
use crate::param::Param;

use super::TemplatePlugin;

/// The text painted in the middle of the editor.
pub const GREETING: &str = "Hello, World!";

const DEFAULT_WIDTH: u32 = 400;
const DEFAULT_HEIGHT: u32 = 300;
const FONT_HEIGHT: f32 = 15.0;

/// A static view painting a greeting. It borrows the plugin it was created for, so it can never
/// outlive it.
pub struct TemplateEditor<'a> {
    plugin: &'a TemplatePlugin,
    width: u32,
    height: u32,
}

impl<'a> TemplateEditor<'a> {
    pub fn new(plugin: &'a TemplatePlugin) -> Self {
        Self {
            plugin,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }

    /// The plugin this editor belongs to.
    pub fn plugin(&self) -> &'a TemplatePlugin {
        self.plugin
    }

    fn local_bounds(&self) -> Rectangle {
        Rectangle::with_size(self.width, self.height)
    }
}

impl Editor for TemplateEditor<'_> {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn paint(&self, g: &mut dyn Graphics) {
        // The editor is opaque, so the whole background needs to be filled
        g.fill_all(Colour::WINDOW_BACKGROUND);

        g.set_colour(Colour::WHITE);
        g.set_font(FONT_HEIGHT);
        g.draw_fitted_text(GREETING, self.local_bounds(), Justification::Centred, 1);
    }

    fn resized(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    fn param_value_changed(&self, id: &str, normalized_value: f32) {
        plugin_trace!("Editor observed '{id}' change to {normalized_value}");
    }

    fn param_values_changed(&self) {
        plugin_trace!(
            "Editor observed gain change to {}",
            self.plugin.template_params().gain.normalized_value()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::{DisplayList, DrawCommand};

    #[test]
    fn paints_greeting_centred() {
        let plugin = TemplatePlugin::default();
        let editor = TemplateEditor::new(&plugin);
        let mut list = DisplayList::new();
        editor.paint(&mut list);

        assert_eq!(
            list.commands(),
            [
                DrawCommand::FillAll(Colour::WINDOW_BACKGROUND),
                DrawCommand::SetColour(Colour::WHITE),
                DrawCommand::SetFont(15.0),
                DrawCommand::DrawFittedText {
                    text: String::from(GREETING),
                    area: Rectangle::with_size(400, 300),
                    justification: Justification::Centred,
                    max_lines: 1,
                },
            ]
        );
    }

    #[test]
    fn resizing_moves_text_bounds() {
        let plugin = TemplatePlugin::default();
        let mut editor = TemplateEditor::new(&plugin);
        editor.resized(800, 600);
        assert_eq!(editor.size(), (800, 600));
        assert!(std::ptr::eq(editor.plugin(), &plugin));

        let mut list = DisplayList::new();
        editor.paint(&mut list);
        assert!(matches!(
            list.commands().last(),
            Some(DrawCommand::DrawFittedText { area, .. }) if *area == Rectangle::with_size(800, 600)
        ));
    }
}
