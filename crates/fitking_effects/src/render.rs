//! Render command generation.
//!
//! Effects describe what to draw as [`RenderCommand`]s; a backend turns
//! them into pixels. Commands are collected per frame and batched by
//! z-index so overlays (the cursor) always land above page content.

use crate::layout::Rect;
use crate::style::{Color, Shadow, SHADOW_LAYERS};

/// A render command for the effects layer.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCommand {
    /// Radial gradient fading from `color` at the center to transparent
    /// at 70% of the radius, then blurred.
    RadialGlow {
        /// Bounds of the light (square).
        bounds: Rect,
        /// Center color.
        color: Color,
        /// Blur radius.
        blur: f32,
        /// Overall opacity multiplier.
        opacity: f32,
    },
    /// Filled circle with optional glow shadows.
    Circle {
        /// Center X.
        cx: f32,
        /// Center Y.
        cy: f32,
        /// Radius.
        radius: f32,
        /// Fill color.
        fill: Color,
        /// Outer shadows.
        shadows: Vec<Shadow>,
        /// Overall opacity multiplier.
        opacity: f32,
    },
    /// Inset ring plus outer glow around a rounded box.
    BorderGlow {
        /// Box bounds.
        bounds: Rect,
        /// Inset ring color.
        ring: Color,
        /// Outer glow.
        glow: Shadow,
        /// Corner radius.
        corner_radius: f32,
        /// Overall opacity multiplier.
        opacity: f32,
    },
    /// Text with layered neon shadows.
    Text {
        /// Text content.
        text: String,
        /// X position.
        x: f32,
        /// Y position (after entrance offset).
        y: f32,
        /// Shadow layers, innermost first.
        shadows: [Shadow; SHADOW_LAYERS],
        /// Overall opacity multiplier.
        opacity: f32,
    },
    /// Scissor rect (clip children).
    PushClip {
        /// Clip bounds.
        bounds: Rect,
    },
    /// Pop scissor rect.
    PopClip,
}

/// A batch of render commands sharing a z-index.
#[derive(Debug, Clone, Default)]
pub struct UIBatch {
    /// Commands in submission order.
    pub commands: Vec<RenderCommand>,
    /// Z-index for sorting.
    pub z_index: i32,
}

/// Collects render commands for one frame.
pub struct UIRenderer {
    /// Commands with their z-index, in submission order.
    commands: Vec<(i32, RenderCommand)>,
    /// Clip stack.
    clip_stack: Vec<Rect>,
    /// Final batches for rendering.
    batches: Vec<UIBatch>,
}

impl UIRenderer {
    /// Z-index for ordinary page content.
    pub const CONTENT_Z: i32 = 0;

    /// Creates a new renderer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            commands: Vec::with_capacity(256),
            clip_stack: Vec::with_capacity(8),
            batches: Vec::with_capacity(4),
        }
    }

    /// Begins a new frame.
    pub fn begin_frame(&mut self) {
        self.commands.clear();
        self.clip_stack.clear();
        self.batches.clear();
    }

    /// Adds a command at content depth.
    pub fn push(&mut self, command: RenderCommand) {
        self.commands.push((Self::CONTENT_Z, command));
    }

    /// Adds a command at an explicit depth.
    pub fn push_at(&mut self, z_index: i32, command: RenderCommand) {
        self.commands.push((z_index, command));
    }

    /// Pushes a clip rect, intersected with the current one.
    pub fn push_clip(&mut self, bounds: Rect) {
        let actual = match self.clip_stack.last() {
            Some(current) => current.intersection(&bounds).unwrap_or(Rect::ZERO),
            None => bounds,
        };

        self.clip_stack.push(actual);
        self.push(RenderCommand::PushClip { bounds: actual });
    }

    /// Pops the current clip rect.
    pub fn pop_clip(&mut self) {
        if self.clip_stack.pop().is_some() {
            self.push(RenderCommand::PopClip);
        }
    }

    /// Returns the current clip rect.
    #[must_use]
    pub fn current_clip(&self) -> Option<Rect> {
        self.clip_stack.last().copied()
    }

    /// Returns the number of commands queued this frame.
    #[must_use]
    pub fn command_count(&self) -> usize {
        self.commands.len()
    }

    /// Ends the frame and returns batches ordered back to front.
    ///
    /// Submission order is kept inside each batch.
    pub fn end_frame(&mut self) -> &[UIBatch] {
        let mut commands = std::mem::take(&mut self.commands);
        commands.sort_by_key(|(z, _)| *z);

        self.batches.clear();
        for (z_index, command) in commands {
            match self.batches.last_mut() {
                Some(batch) if batch.z_index == z_index => batch.commands.push(command),
                _ => self.batches.push(UIBatch {
                    commands: vec![command],
                    z_index,
                }),
            }
        }

        &self.batches
    }
}

impl Default for UIRenderer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dot(cx: f32) -> RenderCommand {
        RenderCommand::Circle {
            cx,
            cy: 0.0,
            radius: 1.0,
            fill: Color::WHITE,
            shadows: Vec::new(),
            opacity: 1.0,
        }
    }

    #[test]
    fn test_renderer_frame() {
        let mut renderer = UIRenderer::new();

        renderer.begin_frame();
        renderer.push(dot(1.0));

        let batches = renderer.end_frame();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].commands.len(), 1);
    }

    #[test]
    fn test_batches_sorted_by_depth() {
        let mut renderer = UIRenderer::new();
        renderer.begin_frame();

        renderer.push_at(9999, dot(1.0));
        renderer.push(dot(2.0));
        renderer.push_at(9998, dot(3.0));
        renderer.push(dot(4.0));

        let batches = renderer.end_frame();
        let depths: Vec<i32> = batches.iter().map(|b| b.z_index).collect();
        assert_eq!(depths, vec![0, 9998, 9999]);
        assert_eq!(batches[0].commands, vec![dot(2.0), dot(4.0)]);
    }

    #[test]
    fn test_clip_stack() {
        let mut renderer = UIRenderer::new();
        renderer.begin_frame();

        renderer.push_clip(Rect::new(0.0, 0.0, 100.0, 100.0));
        renderer.push_clip(Rect::new(50.0, 50.0, 100.0, 100.0));
        assert_eq!(renderer.current_clip(), Some(Rect::new(50.0, 50.0, 50.0, 50.0)));

        renderer.pop_clip();
        renderer.pop_clip();
        assert!(renderer.current_clip().is_none());
        assert_eq!(renderer.command_count(), 4);
    }
}
